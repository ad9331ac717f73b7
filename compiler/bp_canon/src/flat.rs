use bp_diagnostic::{Diagnostic, ErrorCode};
use bp_ir::{ProgramNode, ProgramSequence};
use bp_stack::{ensure_sufficient_stack, Depth};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{trace, warn};

use crate::{
    assemble, chain_truncated, nesting_truncated, CanonLimits, FlatBlock, FlatWorkspace, Leaf,
};

pub(crate) fn canonicalize(
    workspace: &FlatWorkspace,
    limits: CanonLimits,
    diagnostics: &mut Vec<Diagnostic>,
) -> ProgramSequence {
    let Some(first) = first_top_level(&workspace.blocks) else {
        return ProgramSequence::empty();
    };
    let mut walker = FlatWalker {
        blocks: &workspace.blocks,
        visited: FxHashSet::default(),
        limits,
        diagnostics,
    };
    walker.chain(Some(first), Depth::with_limit(limits.max_depth))
}

/// Id of the top-level block the program starts from.
///
/// Blocks flagged `topLevel` win; without any flag, parentless blocks are
/// the candidates. Ties break by editor position (top to bottom, then left
/// to right), then by id so the choice never depends on map order.
fn first_top_level(blocks: &FxHashMap<String, FlatBlock>) -> Option<&str> {
    let flagged = blocks.values().any(|b| b.top_level);
    blocks
        .iter()
        .filter(|(_, b)| if flagged { b.top_level } else { b.parent.is_none() })
        .min_by(|(a_id, a), (b_id, b)| {
            let (ay, ax) = position(a);
            let (by, bx) = position(b);
            ay.total_cmp(&by)
                .then(ax.total_cmp(&bx))
                .then_with(|| a_id.cmp(b_id))
        })
        .map(|(id, _)| id.as_str())
}

fn position(block: &FlatBlock) -> (f64, f64) {
    (block.y.unwrap_or(0.0), block.x.unwrap_or(0.0))
}

struct FlatWalker<'w, 'd> {
    blocks: &'w FxHashMap<String, FlatBlock>,
    /// Every block id already placed in the program.
    visited: FxHashSet<&'w str>,
    limits: CanonLimits,
    diagnostics: &'d mut Vec<Diagnostic>,
}

impl<'w> FlatWalker<'w, '_> {
    fn chain(&mut self, first: Option<&'w str>, depth: Depth) -> ProgramSequence {
        let blocks = self.blocks;
        let mut nodes = Vec::new();
        let mut cursor = first;
        while let Some(id) = cursor {
            let Some((key, block)) = blocks.get_key_value(id) else {
                self.broken_link(id, "refers to a block that does not exist");
                break;
            };
            if !self.visited.insert(key.as_str()) {
                self.broken_link(id, "was already visited; the chain loops");
                break;
            }
            if nodes.len() >= self.limits.max_chain_length {
                chain_truncated(self.diagnostics, self.limits.max_chain_length);
                break;
            }
            trace!(id, kind = %block.kind, depth = %depth, "canonicalize block");
            nodes.push(self.block(block, depth));
            cursor = block.next.as_deref();
        }
        ProgramSequence::new(nodes)
    }

    fn block(&mut self, block: &'w FlatBlock, depth: Depth) -> ProgramNode {
        let has_nested = block.statement.is_some() || block.else_statement.is_some();
        let (body, else_body) = match depth.descend() {
            Some(inner) if has_nested => ensure_sufficient_stack(|| {
                (
                    self.chain(block.statement.as_deref(), inner),
                    self.chain(block.else_statement.as_deref(), inner),
                )
            }),
            Some(_) => (ProgramSequence::empty(), ProgramSequence::empty()),
            None => {
                if has_nested {
                    nesting_truncated(self.diagnostics, &block.kind, depth.limit());
                }
                (ProgramSequence::empty(), ProgramSequence::empty())
            }
        };
        let leaf = block.value.as_deref().and_then(|id| self.leaf(id));
        assemble(&block.kind, body, else_body, leaf, block.times)
    }

    fn leaf(&mut self, id: &str) -> Option<Leaf<'w>> {
        let blocks = self.blocks;
        match blocks.get(id) {
            Some(leaf) => Some(Leaf {
                kind: &leaf.kind,
                number: leaf.number,
            }),
            None => {
                self.broken_link(id, "is used as a value but does not exist");
                None
            }
        }
    }

    fn broken_link(&mut self, id: &str, problem: &str) {
        warn!(id, problem, "broken block link");
        self.diagnostics.push(Diagnostic::warning(
            ErrorCode::E0003,
            format!("block `{id}` {problem}"),
        ));
    }
}
