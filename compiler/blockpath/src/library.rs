//! Pattern library loading.
//!
//! The level loader hands over a JSON array of pattern entries whose
//! programs arrive as JSON-encoded strings:
//!
//! ```json
//! [{
//!   "id": "corridor",
//!   "name": "Corridor",
//!   "serializedSequence": "[{\"kind\":\"move_forward\"}]",
//!   "weaponKey": "dagger",
//!   "priority": 1,
//!   "hints": [{
//!     "serializedCheckSequence": "[{\"kind\":\"move_forward\"}]",
//!     "content": {"question": "Can you take a step?"},
//!     "visualGuideKinds": ["move_forward"]
//!   }]
//! }]
//! ```
//!
//! Each entry is decoded on its own. A bad entry is skipped and reported;
//! the rest of the library still loads.

use std::collections::BTreeSet;

use bp_diagnostic::{Diagnostic, ErrorCode, LoadError};
use bp_ir::{HintContent, HintStep, PatternDefinition, ProgramSequence};
use serde::Deserialize;
use tracing::{debug, warn};

/// A level's reference patterns, in definition order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatternLibrary {
    patterns: Vec<PatternDefinition>,
}

/// What happened while loading a library.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: Vec<Diagnostic>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPattern {
    #[serde(default)]
    id: Option<String>,
    name: String,
    serialized_sequence: String,
    weapon_key: String,
    priority: u32,
    #[serde(default)]
    hints: Vec<RawHint>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHint {
    serialized_check_sequence: String,
    #[serde(default)]
    content: HintContent,
    #[serde(default)]
    visual_guide_kinds: BTreeSet<String>,
}

impl PatternLibrary {
    pub fn new(patterns: Vec<PatternDefinition>) -> Self {
        PatternLibrary { patterns }
    }

    pub fn patterns(&self) -> &[PatternDefinition] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Decode a library document.
    ///
    /// Fails only when the document itself is not a JSON array; bad entries
    /// are listed in the report instead.
    pub fn from_json(json: &str) -> Result<(PatternLibrary, LoadReport), LoadError> {
        let entries: Vec<serde_json::Value> =
            serde_json::from_str(json).map_err(LoadError::Library)?;

        let mut patterns = Vec::with_capacity(entries.len());
        let mut report = LoadReport::default();
        for (index, entry) in entries.into_iter().enumerate() {
            match decode_entry(index, entry) {
                Ok(pattern) => patterns.push(pattern),
                Err(err) => {
                    warn!(index, error = %err, "skipping pattern");
                    report.skipped.push(err.to_diagnostic());
                }
            }
        }
        report.loaded = patterns.len();
        debug!(
            loaded = report.loaded,
            skipped = report.skipped.len(),
            "loaded pattern library"
        );
        Ok((PatternLibrary::new(patterns), report))
    }
}

fn decode_entry(index: usize, entry: serde_json::Value) -> Result<PatternDefinition, LoadError> {
    let name = entry
        .get("name")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("unnamed")
        .to_owned();
    let pattern_error = |code: ErrorCode, source: serde_json::Error| LoadError::Pattern {
        index,
        name: name.clone(),
        code,
        source,
    };

    let raw: RawPattern =
        serde_json::from_value(entry).map_err(|e| pattern_error(ErrorCode::E2002, e))?;
    let sequence: ProgramSequence = serde_json::from_str(&raw.serialized_sequence)
        .map_err(|e| pattern_error(ErrorCode::E2003, e))?;
    if sequence.is_empty() {
        return Err(LoadError::EmptyPattern {
            index,
            name: raw.name,
        });
    }
    let hints = raw
        .hints
        .into_iter()
        .map(|hint| {
            let check_sequence = serde_json::from_str(&hint.serialized_check_sequence)
                .map_err(|e| pattern_error(ErrorCode::E2005, e))?;
            Ok(HintStep {
                check_sequence,
                content: hint.content,
                visual_guide_kinds: hint.visual_guide_kinds,
            })
        })
        .collect::<Result<Vec<_>, LoadError>>()?;

    Ok(PatternDefinition {
        id: raw.id.unwrap_or_else(|| format!("pattern-{index}")),
        name: raw.name,
        sequence,
        weapon_key: raw.weapon_key,
        priority: raw.priority,
        hints,
    })
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use bp_ir::ProgramNode;
    use pretty_assertions::assert_eq;

    const CORRIDOR: &str = r#"{
        "id": "corridor",
        "name": "Corridor",
        "serializedSequence": "[{\"kind\":\"move_forward\"},{\"kind\":\"turn_left\"}]",
        "weaponKey": "dagger",
        "priority": 1,
        "hints": [{
            "serializedCheckSequence": "[{\"kind\":\"move_forward\"}]",
            "content": {"question": "Can you take a step?"},
            "visualGuideKinds": ["move_forward"]
        }]
    }"#;

    #[test]
    fn loads_entries_in_order() {
        let json = format!(
            r#"[{CORRIDOR}, {{"name": "Loop", "serializedSequence": "[{{\"kind\":\"repeat_loop\",\"times\":3}}]", "weaponKey": "axe", "priority": 2}}]"#
        );
        let (library, report) = PatternLibrary::from_json(&json).unwrap();
        assert_eq!(report, LoadReport { loaded: 2, skipped: Vec::new() });

        let corridor = &library.patterns()[0];
        assert_eq!(corridor.id, "corridor");
        assert_eq!(
            corridor.sequence,
            ProgramSequence::new(vec![ProgramNode::new("move_forward"), ProgramNode::new("turn_left")])
        );
        assert_eq!(corridor.hints[0].content.question.as_deref(), Some("Can you take a step?"));
        assert!(corridor.hints[0].visual_guide_kinds.contains("move_forward"));

        let looped = &library.patterns()[1];
        assert_eq!(looped.id, "pattern-1");
        assert_eq!(looped.sequence.nodes()[0].times(), Some(3));
        assert!(looped.hints.is_empty());
    }

    #[test]
    fn bad_entries_are_skipped_with_codes() {
        let json = format!(
            r#"[
                {{"name": "NoWeapon", "serializedSequence": "[]", "priority": 1}},
                {{"name": "BadSeq", "serializedSequence": "not json", "weaponKey": "w", "priority": 1}},
                {{"name": "Empty", "serializedSequence": "[]", "weaponKey": "w", "priority": 1}},
                {{"name": "BadHint", "serializedSequence": "[{{\"kind\":\"jump\"}}]", "weaponKey": "w", "priority": 1,
                  "hints": [{{"serializedCheckSequence": "{{"}}]}},
                {CORRIDOR}
            ]"#
        );
        let (library, report) = PatternLibrary::from_json(&json).unwrap();
        assert_eq!(library.len(), 1);
        assert_eq!(report.loaded, 1);
        let codes: Vec<ErrorCode> = report.skipped.iter().map(|d| d.code).collect();
        assert_eq!(
            codes,
            vec![ErrorCode::E2002, ErrorCode::E2003, ErrorCode::E2004, ErrorCode::E2005]
        );
        assert!(report.skipped[1].message.contains("BadSeq"));
    }

    #[test]
    fn non_array_document_fails() {
        let err = PatternLibrary::from_json(r#"{"patterns": []}"#).unwrap_err();
        assert_eq!(err.code(), ErrorCode::E2001);
    }

    #[test]
    fn empty_document_is_empty_library() {
        let (library, report) = PatternLibrary::from_json("[]").unwrap();
        assert!(library.is_empty());
        assert_eq!(report, LoadReport::default());
    }
}
