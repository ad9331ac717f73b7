//! Text/block equivalence.
//!
//! A hybrid level lets the learner type code next to the blocks they built.
//! The text may only run when it is the same program as the blocks.

use bp_ir::{compare, CompareMode, ProgramSequence};
use serde::Serialize;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub message: String,
}

impl ValidationResult {
    pub fn invalid(message: impl Into<String>) -> Self {
        ValidationResult {
            is_valid: false,
            message: message.into(),
        }
    }
}

/// Check the parsed text program against the canonicalized blocks.
///
/// On mismatch the message names the first place the text departs from the
/// blocks.
pub fn validate(text: &ProgramSequence, blocks: &ProgramSequence) -> ValidationResult {
    let comparison = compare(text, blocks, CompareMode::Exact);
    if comparison.is_equal() {
        return ValidationResult {
            is_valid: true,
            message: "Text code matches the blocks.".to_owned(),
        };
    }
    let message = match &comparison.divergence {
        Some(divergence) => format!("Text code differs from the blocks at {divergence}"),
        None => "Text code differs from the blocks.".to_owned(),
    };
    debug!(%message, "text and blocks differ");
    ValidationResult::invalid(message)
}
