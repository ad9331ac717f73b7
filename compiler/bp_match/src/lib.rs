//! Judgments over canonical programs.
//!
//! # Modules
//!
//! - [`matcher`]: exact and percentage matching against a pattern library,
//!   plus hint-step progress for the selected pattern
//! - [`hint`]: turns a match result into display text and highlighted kinds
//! - [`validate`]: text/block equivalence check that gates running text code
//!
//! Every function here is pure and total: empty programs and empty
//! libraries are ordinary inputs with "no match" results.

pub mod hint;
pub mod matcher;
pub mod validate;

pub use hint::{select_hint, HintInfo};
pub use matcher::{
    best_partial, current_step, exact_match, match_program, percentage_match, MatchResult,
    MatchSummary, PatternScore,
};
pub use validate::{validate, ValidationResult};
