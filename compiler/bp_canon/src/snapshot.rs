//! Serialized block-workspace snapshots, as sent by the block editor.
//!
//! The nested shape links siblings through `next`, so a long program is a
//! deeply nested JSON object. Decoding grows the stack per nested block and
//! dropping a [`TreeBlock`] is iterative; the canonicalizer's chain and
//! depth caps are what bound the walk, not the decoder.

use std::fmt;

use bp_stack::ensure_sufficient_stack;
use rustc_hash::FxHashMap;
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// Either snapshot shape. Distinguished by `blocks` being an array (tree)
/// or an object keyed by block id (flat). A snapshot without `blocks` is an
/// empty tree.
#[derive(Clone, Debug)]
pub enum WorkspaceSnapshot {
    Tree(BlockTree),
    Flat(FlatWorkspace),
}

impl<'de> Deserialize<'de> for WorkspaceSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Envelope {
            #[serde(default)]
            blocks: Option<Blocks>,
        }

        Ok(match Envelope::deserialize(deserializer)?.blocks {
            None => WorkspaceSnapshot::Tree(BlockTree::default()),
            Some(Blocks::Tree(blocks)) => WorkspaceSnapshot::Tree(BlockTree { blocks }),
            Some(Blocks::Flat(blocks)) => WorkspaceSnapshot::Flat(FlatWorkspace { blocks }),
        })
    }
}

/// The `blocks` member, dispatched on its JSON type without buffering.
enum Blocks {
    Tree(Vec<TreeBlock>),
    Flat(FxHashMap<String, FlatBlock>),
}

impl<'de> Deserialize<'de> for Blocks {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(BlocksVisitor)
    }
}

struct BlocksVisitor;

impl<'de> Visitor<'de> for BlocksVisitor {
    type Value = Blocks;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array of block stacks or a map of blocks keyed by id")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Blocks, A::Error> {
        let mut blocks = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(block) = seq.next_element::<TreeBlock>()? {
            blocks.push(block);
        }
        Ok(Blocks::Tree(blocks))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Blocks, A::Error> {
        let mut blocks = FxHashMap::default();
        while let Some((id, block)) = map.next_entry::<String, FlatBlock>()? {
            blocks.insert(id, block);
        }
        Ok(Blocks::Flat(blocks))
    }
}

/// Nested snapshot: top-level stacks in editor order.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BlockTree {
    #[serde(default)]
    pub blocks: Vec<TreeBlock>,
}

/// One block of a nested snapshot.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeBlock {
    #[serde(alias = "type")]
    pub kind: String,
    /// First block of the statement slot (`DO` in most editors).
    #[serde(default, deserialize_with = "nested")]
    pub statement: Option<Box<TreeBlock>>,
    /// First block of the else slot of branching constructs.
    #[serde(default, deserialize_with = "nested")]
    pub else_statement: Option<Box<TreeBlock>>,
    /// Leaf of the value/condition slot.
    #[serde(alias = "condition", default, deserialize_with = "nested")]
    pub value: Option<Box<TreeBlock>>,
    /// Iteration count stored directly on a loop block.
    pub times: Option<u32>,
    /// Literal carried by a number leaf.
    pub number: Option<i64>,
    #[serde(default, deserialize_with = "nested")]
    pub next: Option<Box<TreeBlock>>,
}

impl TreeBlock {
    fn take_children(&mut self) -> impl Iterator<Item = Box<TreeBlock>> {
        [
            self.next.take(),
            self.statement.take(),
            self.else_statement.take(),
            self.value.take(),
        ]
        .into_iter()
        .flatten()
    }
}

impl Drop for TreeBlock {
    fn drop(&mut self) {
        let mut pending: Vec<_> = self.take_children().collect();
        while let Some(mut block) = pending.pop() {
            pending.extend(block.take_children());
        }
    }
}

fn nested<'de, D>(deserializer: D) -> Result<Option<Box<TreeBlock>>, D::Error>
where
    D: Deserializer<'de>,
{
    ensure_sufficient_stack(|| Option::<Box<TreeBlock>>::deserialize(deserializer))
}

/// Flat snapshot: every block keyed by id, linked by id.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FlatWorkspace {
    pub blocks: FxHashMap<String, FlatBlock>,
}

/// One block of a flat snapshot. Slot fields hold block ids.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatBlock {
    #[serde(alias = "type", alias = "opcode")]
    pub kind: String,
    pub next: Option<String>,
    pub parent: Option<String>,
    #[serde(default)]
    pub top_level: bool,
    pub statement: Option<String>,
    pub else_statement: Option<String>,
    #[serde(alias = "condition")]
    pub value: Option<String>,
    pub times: Option<u32>,
    pub number: Option<i64>,
    /// Editor position, used to order top-level stacks.
    pub x: Option<f64>,
    pub y: Option<f64>,
}
