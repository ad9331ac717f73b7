//! Pattern matching.
//!
//! Three questions are asked of the learner's program against a level's
//! pattern library:
//!
//! - Does it *exactly* equal a pattern? ([`exact_match`]) That grants the
//!   pattern's reward.
//! - Which pattern is it *heading towards*? ([`best_partial`]) Scored by
//!   unbroken top-level prefix agreement.
//! - How far along that pattern's hints is it? ([`current_step`])
//!
//! All three go through [`bp_ir::compare`].

use bp_ir::{compare, CompareMode, PatternDefinition, ProgramSequence};
use serde::Serialize;
use tracing::debug;

/// A pattern and the program's percentage score against it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PatternScore<'p> {
    pub pattern: &'p PatternDefinition,
    pub percentage: u8,
}

/// Everything the matcher concluded about one program.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MatchResult<'p> {
    /// First pattern, in library order, deep-equal to the program.
    pub exact: Option<&'p PatternDefinition>,
    /// Best nonzero percentage match under the priority rule.
    pub best: Option<PatternScore<'p>>,
    /// Pattern whose hints apply: the best partial match, else the exact
    /// match, else the top-priority pattern.
    pub hint_pattern: Option<&'p PatternDefinition>,
    /// Progress through `hint_pattern`'s hints. `total_steps + 1` means the
    /// pattern is complete.
    pub current_step: usize,
}

impl MatchResult<'_> {
    /// Result for an empty library, or for input that is not ready yet.
    pub fn none() -> Self {
        MatchResult {
            exact: None,
            best: None,
            hint_pattern: None,
            current_step: 0,
        }
    }

    pub fn summary(&self) -> MatchSummary {
        match self.exact {
            Some(pattern) => MatchSummary {
                matched: true,
                pattern_id: Some(pattern.id.clone()),
                weapon_key: Some(pattern.weapon_key.clone()),
            },
            None => MatchSummary::default(),
        }
    }
}

/// Reward-facing view of a [`MatchResult`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub matched: bool,
    pub pattern_id: Option<String>,
    pub weapon_key: Option<String>,
}

/// First pattern in definition order whose sequence deep-equals `current`.
///
/// An empty program never matches, even against an empty pattern.
pub fn exact_match<'p>(
    current: &ProgramSequence,
    patterns: &'p [PatternDefinition],
) -> Option<&'p PatternDefinition> {
    if current.is_empty() {
        return None;
    }
    patterns
        .iter()
        .find(|pattern| compare(current, &pattern.sequence, CompareMode::Exact).is_equal())
}

/// Prefix score of `current` against one pattern, 0 to 100.
///
/// Any top-level kind mismatch, or `current` running past the end of the
/// pattern, scores 0.
pub fn percentage_match(current: &ProgramSequence, pattern: &PatternDefinition) -> u8 {
    compare(current, &pattern.sequence, CompareMode::PrefixScore).percentage()
}

/// Best-scoring pattern under the priority rule.
///
/// Patterns are visited in ascending `priority` (library order within a
/// priority). The first nonzero score becomes the tentative best; a later
/// pattern replaces it only when it scores strictly higher *and* its
/// priority is no greater than the best's. Since the visit order is
/// ascending, only a same-priority pattern can ever take over.
pub fn best_partial<'p>(
    current: &ProgramSequence,
    patterns: &'p [PatternDefinition],
) -> Option<PatternScore<'p>> {
    let mut ordered: Vec<&PatternDefinition> = patterns.iter().collect();
    ordered.sort_by_key(|pattern| pattern.priority);

    let mut best: Option<PatternScore<'p>> = None;
    for pattern in ordered {
        let percentage = percentage_match(current, pattern);
        if percentage == 0 {
            continue;
        }
        let replaces = match best {
            None => true,
            Some(held) => {
                percentage > held.percentage && pattern.priority <= held.pattern.priority
            }
        };
        if replaces {
            debug!(pattern = %pattern.name, priority = pattern.priority, percentage, "best partial match");
            best = Some(PatternScore {
                pattern,
                percentage,
            });
        }
    }
    best
}

/// Number of leading hint steps whose checkpoint `current` contains.
///
/// Counting stops at the first unsatisfied step. When every step is
/// satisfied and `current` exactly equals the pattern, the result is
/// `total_steps + 1`.
pub fn current_step(current: &ProgramSequence, pattern: &PatternDefinition) -> usize {
    let satisfied = pattern
        .hints
        .iter()
        .take_while(|hint| {
            compare(current, &hint.check_sequence, CompareMode::Containment).is_equal()
        })
        .count();
    let complete = satisfied == pattern.total_steps()
        && !current.is_empty()
        && compare(current, &pattern.sequence, CompareMode::Exact).is_equal();
    if complete {
        satisfied + 1
    } else {
        satisfied
    }
}

/// Run every matcher question for `current` against `patterns`.
pub fn match_program<'p>(
    current: &ProgramSequence,
    patterns: &'p [PatternDefinition],
) -> MatchResult<'p> {
    let exact = exact_match(current, patterns);
    let best = best_partial(current, patterns);

    let (hint_pattern, current_step) = match best.map(|score| score.pattern).or(exact) {
        Some(pattern) => (Some(pattern), current_step(current, pattern)),
        None => (top_priority(patterns), 0),
    };

    debug!(
        exact = exact.map(|p| p.name.as_str()),
        best = best.map(|s| s.pattern.name.as_str()),
        percentage = best.map_or(0, |s| s.percentage),
        hint_pattern = hint_pattern.map(|p| p.name.as_str()),
        current_step,
        "matched program"
    );

    MatchResult {
        exact,
        best,
        hint_pattern,
        current_step,
    }
}

/// Lowest-priority-number pattern, earliest in the library on ties.
fn top_priority(patterns: &[PatternDefinition]) -> Option<&PatternDefinition> {
    patterns.iter().reduce(|best, pattern| {
        if pattern.priority < best.priority {
            pattern
        } else {
            best
        }
    })
}
