//! Canonical text rendering.
//!
//! Renders a [`ProgramSequence`] as text in the statement language that
//! `bp_parse` reads. For programs built from the vocabulary in
//! [`bp_ir::vocab`], parsing the rendered text gives back the same sequence.
//!
//! # Layout
//!
//! ```text
//! await moveForward();
//! repeat(3) {
//!     await turnLeft();
//! }
//! if (isPathForward()) {
//!     await moveForward();
//! } else {
//!     await turnRight();
//! }
//! ```
//!
//! An `else` branch holding a nested `if` is written out as a nested block,
//! never collapsed to `else if`, so the rendered text re-parses to the same
//! tree. Kinds outside the vocabulary render as a comment line.

pub mod emitter;

use bp_ir::vocab::{self, kinds};
use bp_ir::{ProgramNode, ProgramSequence};
use bp_stack::ensure_sufficient_stack;

pub use emitter::{Emitter, StringEmitter};

/// Spaces per nesting level.
pub const INDENT_WIDTH: usize = 4;

/// Render `sequence` to a string. Empty programs render as `""`.
pub fn render(sequence: &ProgramSequence) -> String {
    let mut emitter = StringEmitter::with_capacity(sequence.node_count() * 24);
    render_to(sequence, &mut emitter);
    emitter.output()
}

/// Render `sequence` into `emitter`, one statement per line.
pub fn render_to<E: Emitter>(sequence: &ProgramSequence, emitter: &mut E) {
    Renderer { emitter }.sequence(sequence, 0);
}

struct Renderer<'e, E: Emitter> {
    emitter: &'e mut E,
}

impl<E: Emitter> Renderer<'_, E> {
    fn sequence(&mut self, sequence: &ProgramSequence, level: usize) {
        for node in sequence {
            self.node(node, level);
        }
    }

    fn node(&mut self, node: &ProgramNode, level: usize) {
        self.emitter.emit_indent(level);
        match node.kind() {
            kinds::REPEAT_LOOP => {
                let count = node.times().map(|t| t.to_string()).unwrap_or_default();
                self.emitter.emit(&format!("repeat({count})"));
                self.block(node.body(), level);
            }
            kinds::WHILE_LOOP => {
                self.header("while", node);
                self.block(node.body(), level);
            }
            kinds::IF_ONLY => {
                self.header("if", node);
                self.block(node.body(), level);
            }
            kinds::IF_ELSE => {
                self.header("if", node);
                self.open(node.body(), level);
                self.emitter.emit_indent(level);
                self.emitter.emit("} else");
                self.block(node.else_body(), level);
            }
            kind => match vocab::action_call(kind) {
                Some(call) => self.emitter.emit(&format!("await {call}();")),
                None => self.emitter.emit(&format!("// unsupported block: {kind}")),
            },
        }
        self.emitter.emit_newline();
    }

    /// `keyword (condition)`; no condition renders as `keyword ()`.
    fn header(&mut self, keyword: &str, node: &ProgramNode) {
        self.emitter.emit(keyword);
        self.emitter.emit_space();
        self.emitter.emit("(");
        if let Some(kind) = node.condition_kind() {
            self.condition(kind);
        }
        self.emitter.emit(")");
    }

    fn condition(&mut self, kind: &str) {
        match vocab::condition_call(kind) {
            Some(call) => self.emitter.emit(&format!("{call}()")),
            None if is_identifier(kind) => self.emitter.emit(&format!("{kind}()")),
            None => self.emitter.emit(kind),
        }
    }

    /// ` {`, the body, and the closing `}` (without trailing newline).
    fn block(&mut self, body: &ProgramSequence, level: usize) {
        self.open(body, level);
        self.emitter.emit_indent(level);
        self.emitter.emit("}");
    }

    fn open(&mut self, body: &ProgramSequence, level: usize) {
        self.emitter.emit(" {");
        self.emitter.emit_newline();
        ensure_sufficient_stack(|| self.sequence(body, level + 1));
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
