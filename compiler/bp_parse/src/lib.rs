//! Text parser for the blockpath statement language.
//!
//! Turns free-text learner code into the same [`ProgramSequence`] shape the
//! block canonicalizer produces, using the kind table in [`bp_ir::vocab`].
//!
//! # Language
//!
//! ```text
//! await moveForward();
//! repeat(3) { await turnLeft(); }
//! for (let i = 0; i < 4; i++) { jump(); }
//! while (notAtGoal()) {
//!     if (isPathForward()) { moveForward(); } else if (isPathLeft()) { turnLeft(); } else { turnRight(); }
//! }
//! ```
//!
//! `repeat` and integer-bounded `for` both become `repeat_loop`. A `for`
//! counts when its bounds are integer literals, its test is `<`, `<=`, `>`
//! or `>=`, and its update steps by one towards the bound; any other `for`
//! is skipped whole. `while` becomes `while_loop`; `if` becomes `if_only`
//! or, with an `else`, `if_else`.
//!
//! # Failure Handling
//!
//! The parser runs on every keystroke against half-typed code, so it never
//! fails. Lines it cannot use are skipped and listed in
//! [`ParseOutput::skipped`]; a construct without its closing brace extends
//! to the end of the input.

mod header;
mod lines;
mod parser;

use bp_diagnostic::{Diagnostic, ErrorCode};
use bp_ir::ProgramSequence;
use bp_stack::MAX_NESTING_DEPTH;
use tracing::debug;

/// A source line the parser did not turn into a node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SkippedLine {
    /// 1-based source line.
    pub line: usize,
    pub text: String,
    pub code: ErrorCode,
}

impl SkippedLine {
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::warning(
            self.code,
            format!("{}: `{}`", self.code.description(), self.text),
        )
        .with_note(format!("line {}", self.line))
    }
}

/// Parsed program plus the lines that were ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseOutput {
    pub sequence: ProgramSequence,
    pub skipped: Vec<SkippedLine>,
}

/// Parse `source` with the default nesting limit.
pub fn parse(source: &str) -> ParseOutput {
    parse_with_limit(source, MAX_NESTING_DEPTH)
}

/// Parse `source`, dropping constructs nested deeper than `max_depth`.
pub fn parse_with_limit(source: &str, max_depth: u32) -> ParseOutput {
    let lines = lines::logical_lines(source);
    let output = parser::Parser::new(&lines, max_depth).parse();
    debug!(
        lines = lines.len(),
        top_level = output.sequence.len(),
        nodes = output.sequence.node_count(),
        skipped = output.skipped.len(),
        "parsed text program"
    );
    output
}

#[cfg(test)]
mod tests;
