//! Reference patterns and their progressive hints.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ProgramSequence;

/// Text shown for one hint step. Either part may be missing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HintContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// One progressive-disclosure unit of a pattern.
///
/// `check_sequence` is the program expected to exist once this step is done.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HintStep {
    pub check_sequence: ProgramSequence,
    #[serde(default)]
    pub content: HintContent,
    #[serde(default)]
    pub visual_guide_kinds: BTreeSet<String>,
}

/// A reference "good" program with its reward and hints.
///
/// Lower `priority` means a higher-quality pattern and a preferred reward.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternDefinition {
    pub id: String,
    pub name: String,
    pub sequence: ProgramSequence,
    pub weapon_key: String,
    pub priority: u32,
    #[serde(default)]
    pub hints: Vec<HintStep>,
}

impl PatternDefinition {
    pub fn total_steps(&self) -> usize {
        self.hints.len()
    }
}
