//! Hint selection.
//!
//! Maps a [`MatchResult`] to the hint panel's contents. The step number
//! picks the message:
//!
//! | `current_step`         | Message                                   |
//! |------------------------|-------------------------------------------|
//! | `0`                    | first hint, as "how to begin"             |
//! | `1..=total_steps`      | that step's hint, as "done / try next"    |
//! | `> total_steps`        | "pattern complete", no highlighted blocks |

use bp_ir::{HintContent, PatternDefinition};
use serde::Serialize;

use crate::MatchResult;

/// Hint panel contents.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HintInfo {
    pub text: String,
    pub show_hint: bool,
    pub current_step: usize,
    pub total_steps: usize,
    pub progress_percent: u8,
    pub pattern_name: Option<String>,
    /// Block kinds to emphasize in the toolbox, sorted.
    pub visual_guide_kinds: Vec<String>,
}

impl HintInfo {
    /// Nothing to show.
    pub fn hidden() -> Self {
        HintInfo::default()
    }
}

/// Hint for the pattern and step chosen by the matcher.
pub fn select_hint(result: &MatchResult<'_>) -> HintInfo {
    match result.hint_pattern {
        Some(pattern) => hint_for(pattern, result.current_step),
        None => HintInfo::hidden(),
    }
}

/// Hint for `pattern` at `step`. A pattern without hints shows nothing.
pub fn hint_for(pattern: &PatternDefinition, step: usize) -> HintInfo {
    let total = pattern.total_steps();
    if total == 0 {
        return HintInfo {
            pattern_name: Some(pattern.name.clone()),
            ..HintInfo::hidden()
        };
    }

    let (text, visual_guide_kinds) = match step {
        0 => (
            format!("How to begin: {}", content_text(&pattern.hints[0].content, pattern)),
            Vec::new(),
        ),
        step if step <= total => {
            let hint = &pattern.hints[step - 1];
            (
                format!(
                    "Step {step} of {total} done. Try next: {}",
                    content_text(&hint.content, pattern)
                ),
                hint.visual_guide_kinds.iter().cloned().collect(),
            )
        }
        _ => (
            format!("Pattern complete: {}!", pattern.name),
            Vec::new(),
        ),
    };

    HintInfo {
        text,
        show_hint: true,
        current_step: step,
        total_steps: total,
        progress_percent: progress_percent(step, total),
        pattern_name: Some(pattern.name.clone()),
        visual_guide_kinds,
    }
}

/// `round(min(step, total) / total * 100)`, half up.
fn progress_percent(step: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let done = step.min(total);
    let scaled = (done * 200 + total) / (total * 2);
    u8::try_from(scaled).unwrap_or(100)
}

/// Question and suggestion joined; a generic line when both are missing.
fn content_text(content: &HintContent, pattern: &PatternDefinition) -> String {
    let parts: Vec<&str> = [content.question.as_deref(), content.suggestion.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        format!("keep building the {} pattern.", pattern.name)
    } else {
        parts.join(" ")
    }
}
