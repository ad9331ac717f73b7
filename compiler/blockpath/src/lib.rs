//! blockpath
//!
//! Program-structure matching engine for an educational block-programming
//! game. Learners build a program from blocks (or type the equivalent text);
//! the engine turns either form into a canonical [`ProgramSequence`],
//! compares it with the level's reference patterns, and reports hints,
//! rewards and text/block equivalence.
//!
//! # Pipeline
//!
//! ```text
//! block snapshot ──bp_canon──┐
//!                            ├─► ProgramSequence ──bp_match──► HintInfo / MatchSummary
//! text source ────bp_parse───┘                    └─validate─► ValidationResult
//! ```
//!
//! [`Engine`] is the boundary the game talks to. It is built once per
//! level, holds the level's [`PatternLibrary`], and never panics or returns
//! an error to its caller: failures come back as "no match" results with
//! diagnostics.
//!
//! # Tracing
//!
//! Set `RUST_LOG` (e.g. `RUST_LOG=bp_match=debug`) and call
//! [`init_tracing`] to see match decisions and skipped input.

mod commands;
mod config;
mod engine;
mod library;

use std::sync::Once;

pub use bp_canon::CanonOutput;
pub use bp_diagnostic::{Diagnostic, ErrorCode, LoadError, Severity};
pub use bp_ir::{PatternDefinition, ProgramNode, ProgramSequence};
pub use bp_match::{HintInfo, MatchSummary, ValidationResult};
pub use bp_parse::{ParseOutput, SkippedLine};
pub use commands::{
    canon_file, fmt_file, load_program, match_files, parse_file, validate_files, CommandError,
};
pub use config::EngineConfig;
pub use engine::{Engine, Evaluation, Readiness};
pub use library::{LoadReport, PatternLibrary};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing subscriber for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_indent_lines(true),
                )
                .with(filter)
                .init();
        }
    });
}
