//! Block-workspace canonicalization.
//!
//! Turns a snapshot of the visual block editor into a [`ProgramSequence`].
//!
//! # Pipeline Position
//!
//! ```text
//! Block editor → snapshot JSON → **Canonicalize** → bp_match / validator
//! ```
//!
//! # Snapshot Shapes
//!
//! - **Tree** ([`BlockTree`]): each block owns its `next`, `statement`,
//!   `elseStatement` and `value` children.
//! - **Flat** ([`FlatWorkspace`]): an id-keyed block map with `next` id links
//!   and a `topLevel` flag. Links are followed with a visited set, so an id
//!   cycle ends the chain instead of looping.
//!
//! Both shapes are walked depth-first from the first top-level block. The
//! sibling chain becomes one sequence level; statement slots become `body` /
//! `elseBody`; a value slot contributes only its leaf kind (or, for a number
//! literal leaf, the loop count). Kinds are copied verbatim and never
//! validated.

mod flat;
mod snapshot;
mod tree;

use bp_diagnostic::{Diagnostic, ErrorCode, LoadError};
use bp_ir::{ProgramNode, ProgramSequence};
use bp_stack::{MAX_CHAIN_LENGTH, MAX_NESTING_DEPTH};
use serde::Deserialize;
use tracing::{debug, warn};

pub use snapshot::{BlockTree, FlatBlock, FlatWorkspace, TreeBlock, WorkspaceSnapshot};

/// Walk limits. Blocks beyond them are dropped and reported.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CanonLimits {
    pub max_depth: u32,
    pub max_chain_length: usize,
}

impl Default for CanonLimits {
    fn default() -> Self {
        CanonLimits {
            max_depth: MAX_NESTING_DEPTH,
            max_chain_length: MAX_CHAIN_LENGTH,
        }
    }
}

/// Canonical program plus anything that had to be dropped to build it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CanonOutput {
    pub sequence: ProgramSequence,
    pub diagnostics: Vec<Diagnostic>,
}

/// Canonicalize a snapshot with default limits.
pub fn canonicalize(snapshot: &WorkspaceSnapshot) -> CanonOutput {
    canonicalize_with(snapshot, CanonLimits::default())
}

pub fn canonicalize_with(snapshot: &WorkspaceSnapshot, limits: CanonLimits) -> CanonOutput {
    let mut diagnostics = Vec::new();
    let sequence = match snapshot {
        WorkspaceSnapshot::Tree(tree) => tree::canonicalize(tree, limits, &mut diagnostics),
        WorkspaceSnapshot::Flat(flat) => flat::canonicalize(flat, limits, &mut diagnostics),
    };
    debug!(
        top_level = sequence.len(),
        nodes = sequence.node_count(),
        dropped = diagnostics.len(),
        "canonicalized workspace"
    );
    CanonOutput {
        sequence,
        diagnostics,
    }
}

/// Decode a JSON snapshot and canonicalize it.
///
/// Nested `next` chains are not limited by JSON nesting depth; blocks past
/// `limits` are dropped by the walk and reported.
pub fn canonicalize_json(json: &str, limits: CanonLimits) -> Result<CanonOutput, LoadError> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    deserializer.disable_recursion_limit();
    let snapshot = WorkspaceSnapshot::deserialize(&mut deserializer).map_err(LoadError::Snapshot)?;
    deserializer.end().map_err(LoadError::Snapshot)?;
    Ok(canonicalize_with(&snapshot, limits))
}

/// Leaf of a value slot: its kind, plus the literal if it is a number block.
#[derive(Copy, Clone, Debug)]
struct Leaf<'a> {
    kind: &'a str,
    number: Option<i64>,
}

/// Build one node from a block's already-canonicalized parts.
///
/// A number-literal leaf resolves the loop count rather than a condition.
fn assemble(
    kind: &str,
    body: ProgramSequence,
    else_body: ProgramSequence,
    leaf: Option<Leaf<'_>>,
    times: Option<u32>,
) -> ProgramNode {
    let mut node = ProgramNode::new(kind)
        .with_body(body)
        .with_else_body(else_body);
    let count = times.or_else(|| {
        leaf.and_then(|l| l.number)
            .and_then(|n| u32::try_from(n).ok())
    });
    if let Some(Leaf {
        kind: condition,
        number: None,
    }) = leaf
    {
        node = node.with_condition(condition);
    }
    if let Some(count) = count {
        node = node.with_times(count);
    }
    node
}

fn chain_truncated(diagnostics: &mut Vec<Diagnostic>, limit: usize) {
    warn!(limit, "block chain truncated");
    diagnostics.push(Diagnostic::warning(
        ErrorCode::E0002,
        format!("block chain longer than {limit} blocks; the rest was dropped"),
    ));
}

fn nesting_truncated(diagnostics: &mut Vec<Diagnostic>, kind: &str, limit: u32) {
    warn!(kind, limit, "block nesting truncated");
    diagnostics.push(Diagnostic::warning(
        ErrorCode::E0002,
        format!("blocks inside `{kind}` are nested deeper than {limit} levels and were dropped"),
    ));
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
