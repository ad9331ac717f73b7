use bp_diagnostic::Diagnostic;
use bp_ir::ProgramSequence;
use bp_stack::{ensure_sufficient_stack, Depth};
use tracing::trace;

use crate::{assemble, chain_truncated, nesting_truncated, BlockTree, CanonLimits, Leaf, TreeBlock};

pub(crate) fn canonicalize(
    tree: &BlockTree,
    limits: CanonLimits,
    diagnostics: &mut Vec<Diagnostic>,
) -> ProgramSequence {
    if tree.blocks.len() > 1 {
        trace!(stacks = tree.blocks.len(), "ignoring detached top-level stacks");
    }
    let mut walker = TreeWalker {
        limits,
        diagnostics,
    };
    walker.chain(tree.blocks.first(), Depth::with_limit(limits.max_depth))
}

struct TreeWalker<'d> {
    limits: CanonLimits,
    diagnostics: &'d mut Vec<Diagnostic>,
}

impl TreeWalker<'_> {
    /// Follow `next` links from `first`, one node per block.
    fn chain(&mut self, first: Option<&TreeBlock>, depth: Depth) -> ProgramSequence {
        let mut nodes = Vec::new();
        let mut cursor = first;
        while let Some(block) = cursor {
            if nodes.len() >= self.limits.max_chain_length {
                chain_truncated(self.diagnostics, self.limits.max_chain_length);
                break;
            }
            trace!(kind = %block.kind, depth = %depth, "canonicalize block");
            nodes.push(self.block(block, depth));
            cursor = block.next.as_deref();
        }
        ProgramSequence::new(nodes)
    }

    fn block(&mut self, block: &TreeBlock, depth: Depth) -> bp_ir::ProgramNode {
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
        let leaf = block.value.as_deref().map(|v| Leaf {
            kind: &v.kind,
            number: v.number,
        });
        assemble(&block.kind, body, else_body, leaf, block.times)
    }
}
