//! Structural comparison of two program sequences.
//!
//! One primitive, [`compare`], serves every consumer. The [`CompareMode`]
//! selects how strict the comparison is:
//!
//! - [`CompareMode::PrefixScore`]: top-level kinds only, left to right,
//!   crediting unbroken agreement from the start. Drives percentage scoring.
//! - [`CompareMode::Containment`]: the target (a hint checkpoint) must appear
//!   in the current program as an ordered subsequence, recursively through
//!   nested bodies. Drives hint-step progress.
//! - [`CompareMode::Exact`]: full deep equality at every nesting level.
//!   Drives exact pattern matches and text/block equivalence.
//!
//! The first argument is always the learner's program ("found"), the second
//! the reference it is measured against ("expected").

use std::fmt;

use bp_stack::{ensure_sufficient_stack, Depth};

use crate::{ProgramNode, ProgramSequence};

/// Strictness of a [`compare`] call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CompareMode {
    PrefixScore,
    Containment,
    Exact,
}

/// Overall outcome of a comparison.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Every compared position agreed and both sides ended together
    /// (for containment: every checkpoint node was found).
    Equal,
    /// Every compared position agreed but the current program ended first.
    Prefix,
    /// A position disagreed, or the current program ran past the target.
    Diverged,
}

/// Nested slot of a control construct.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    Body,
    ElseBody,
}

/// One step from a sequence into a nested slot of its `index`-th node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathStep {
    pub index: usize,
    pub slot: Slot,
}

/// What differed at a divergence point.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mismatch {
    Kind {
        expected: String,
        found: String,
    },
    Condition {
        kind: String,
        expected: Option<String>,
        found: Option<String>,
    },
    Times {
        kind: String,
        expected: Option<u32>,
        found: Option<u32>,
    },
    /// The current program ended where the target has `expected`.
    Missing { expected: String },
    /// The current program has `found` where the target ended.
    Extra { found: String },
    /// Nesting exceeded the walk's depth limit.
    TooDeep { limit: u32 },
}

/// First point at which two sequences differ.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Divergence {
    /// Slots entered from the top level down to the differing sequence.
    pub path: Vec<PathStep>,
    /// Position within the differing sequence.
    pub index: usize,
    pub mismatch: Mismatch,
}

/// Result of [`compare`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Comparison {
    pub mode: CompareMode,
    /// Top-level positions (or checkpoint nodes) that agreed.
    pub matched: usize,
    /// Top-level length of the target.
    pub total: usize,
    pub verdict: Verdict,
    /// Where the sides first differ. Present for every verdict except
    /// [`Verdict::Equal`].
    pub divergence: Option<Divergence>,
}

impl Comparison {
    pub fn is_equal(&self) -> bool {
        self.verdict == Verdict::Equal
    }

    /// `round(matched / total * 100)`, or 0 when diverged or the target is empty.
    ///
    /// Rounds half up.
    pub fn percentage(&self) -> u8 {
        if self.verdict == Verdict::Diverged || self.total == 0 {
            return 0;
        }
        let scaled = (self.matched.saturating_mul(200) + self.total) / (self.total * 2);
        u8::try_from(scaled.min(100)).unwrap_or(100)
    }
}

/// Compare `current` against `target` under `mode`.
pub fn compare(current: &ProgramSequence, target: &ProgramSequence, mode: CompareMode) -> Comparison {
    match mode {
        CompareMode::PrefixScore => prefix_score(current, target),
        CompareMode::Containment => containment(current, target),
        CompareMode::Exact => exact(current, target),
    }
}

fn prefix_score(current: &ProgramSequence, target: &ProgramSequence) -> Comparison {
    let mut matched = 0;
    for (found, expected) in current.kinds().zip(target.kinds()) {
        if found != expected {
            let mismatch = Mismatch::Kind {
                expected: expected.to_owned(),
                found: found.to_owned(),
            };
            return diverged(CompareMode::PrefixScore, matched, target.len(), matched, mismatch);
        }
        matched += 1;
    }
    finish_lengths(CompareMode::PrefixScore, current, target, matched)
}

fn exact(current: &ProgramSequence, target: &ProgramSequence) -> Comparison {
    let mut path = Vec::new();
    let mut matched = 0;
    for (index, (found, expected)) in current.iter().zip(target).enumerate() {
        if let Some(divergence) = node_difference(found, expected, Depth::ROOT, &mut path, index) {
            return Comparison {
                mode: CompareMode::Exact,
                matched,
                total: target.len(),
                verdict: Verdict::Diverged,
                divergence: Some(divergence),
            };
        }
        matched += 1;
    }
    finish_lengths(CompareMode::Exact, current, target, matched)
}

/// Verdict once every paired position agreed: only the lengths remain.
fn finish_lengths(
    mode: CompareMode,
    current: &ProgramSequence,
    target: &ProgramSequence,
    matched: usize,
) -> Comparison {
    let total = target.len();
    if let Some(extra) = current.get(total) {
        let mismatch = Mismatch::Extra {
            found: extra.kind().to_owned(),
        };
        return diverged(mode, matched, total, total, mismatch);
    }
    match target.get(current.len()) {
        Some(next) => Comparison {
            mode,
            matched,
            total,
            verdict: Verdict::Prefix,
            divergence: Some(Divergence {
                path: Vec::new(),
                index: current.len(),
                mismatch: Mismatch::Missing {
                    expected: next.kind().to_owned(),
                },
            }),
        },
        None => Comparison {
            mode,
            matched,
            total,
            verdict: Verdict::Equal,
            divergence: None,
        },
    }
}

fn diverged(mode: CompareMode, matched: usize, total: usize, index: usize, mismatch: Mismatch) -> Comparison {
    Comparison {
        mode,
        matched,
        total,
        verdict: Verdict::Diverged,
        divergence: Some(Divergence {
            path: Vec::new(),
            index,
            mismatch,
        }),
    }
}

/// First deep difference between two whole sequences, lengths included.
fn sequence_difference(
    current: &ProgramSequence,
    target: &ProgramSequence,
    depth: Depth,
    path: &mut Vec<PathStep>,
) -> Option<Divergence> {
    for (index, (found, expected)) in current.iter().zip(target).enumerate() {
        if let Some(divergence) = node_difference(found, expected, depth, path, index) {
            return Some(divergence);
        }
    }

    let shared = current.len().min(target.len());
    let mismatch = match (current.get(shared), target.get(shared)) {
        (Some(extra), None) => Mismatch::Extra {
            found: extra.kind().to_owned(),
        },
        (None, Some(missing)) => Mismatch::Missing {
            expected: missing.kind().to_owned(),
        },
        _ => return None,
    };
    Some(Divergence {
        path: path.clone(),
        index: shared,
        mismatch,
    })
}

fn node_difference(
    found: &ProgramNode,
    expected: &ProgramNode,
    depth: Depth,
    path: &mut Vec<PathStep>,
    index: usize,
) -> Option<Divergence> {
    if found.kind() != expected.kind() {
        return divergence_at(
            path,
            index,
            Mismatch::Kind {
                expected: expected.kind().to_owned(),
                found: found.kind().to_owned(),
            },
        );
    }
    if found.condition() != expected.condition() {
        return divergence_at(
            path,
            index,
            Mismatch::Condition {
                kind: expected.kind().to_owned(),
                expected: expected.condition_kind().map(str::to_owned),
                found: found.condition_kind().map(str::to_owned),
            },
        );
    }
    if found.times() != expected.times() {
        return divergence_at(
            path,
            index,
            Mismatch::Times {
                kind: expected.kind().to_owned(),
                expected: expected.times(),
                found: found.times(),
            },
        );
    }

    let slots = [
        (Slot::Body, found.body(), expected.body()),
        (Slot::ElseBody, found.else_body(), expected.else_body()),
    ];
    for (slot, found_body, expected_body) in slots {
        if found_body.is_empty() && expected_body.is_empty() {
            continue;
        }
        let Some(inner) = depth.descend() else {
            return divergence_at(path, index, Mismatch::TooDeep { limit: depth.limit() });
        };
        path.push(PathStep { index, slot });
        let difference =
            ensure_sufficient_stack(|| sequence_difference(found_body, expected_body, inner, path));
        path.pop();
        if difference.is_some() {
            return difference;
        }
    }
    None
}

fn divergence_at(path: &[PathStep], index: usize, mismatch: Mismatch) -> Option<Divergence> {
    Some(Divergence {
        path: path.to_vec(),
        index,
        mismatch,
    })
}

fn containment(current: &ProgramSequence, check: &ProgramSequence) -> Comparison {
    let matched = contained_prefix(current, check, Depth::ROOT);
    match check.get(matched) {
        None => Comparison {
            mode: CompareMode::Containment,
            matched,
            total: check.len(),
            verdict: Verdict::Equal,
            divergence: None,
        },
        Some(missing) => diverged(
            CompareMode::Containment,
            matched,
            check.len(),
            matched,
            Mismatch::Missing {
                expected: missing.kind().to_owned(),
            },
        ),
    }
}

/// How many leading nodes of `check` can be matched, in order, against a
/// subsequence of `program`.
///
/// Greedy leftmost matching is sufficient: a node either satisfies a
/// checkpoint node or not, independent of what else was matched.
fn contained_prefix(program: &ProgramSequence, check: &ProgramSequence, depth: Depth) -> usize {
    let mut candidates = program.iter();
    let mut matched = 0;
    for wanted in check {
        if !candidates.any(|have| satisfies(have, wanted, depth)) {
            break;
        }
        matched += 1;
    }
    matched
}

fn satisfies(have: &ProgramNode, wanted: &ProgramNode, depth: Depth) -> bool {
    if have.kind() != wanted.kind() {
        return false;
    }
    if wanted.condition().is_some_and(|c| have.condition() != Some(c)) {
        return false;
    }
    if wanted.times().is_some_and(|n| have.times() != Some(n)) {
        return false;
    }
    if wanted.body().is_empty() && wanted.else_body().is_empty() {
        return true;
    }
    let Some(inner) = depth.descend() else {
        return false;
    };
    ensure_sufficient_stack(|| {
        contained_prefix(have.body(), wanted.body(), inner) == wanted.body().len()
            && contained_prefix(have.else_body(), wanted.else_body(), inner)
                == wanted.else_body().len()
    })
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn or_none(value: Option<&str>) -> &str {
            value.unwrap_or("no condition")
        }

        match self {
            Mismatch::Kind { expected, found } => write!(f, "expected {expected}, found {found}"),
            Mismatch::Condition {
                kind,
                expected,
                found,
            } => write!(
                f,
                "{kind} condition: expected {}, found {}",
                or_none(expected.as_deref()),
                or_none(found.as_deref())
            ),
            Mismatch::Times {
                kind,
                expected,
                found,
            } => {
                let show = |n: &Option<u32>| n.map_or_else(|| "unbounded".to_owned(), |n| n.to_string());
                write!(f, "{kind} count: expected {}, found {}", show(expected), show(found))
            }
            Mismatch::Missing { expected } => write!(f, "missing {expected}"),
            Mismatch::Extra { found } => write!(f, "unexpected extra {found}"),
            Mismatch::TooDeep { limit } => write!(f, "nesting deeper than {limit} levels"),
        }
    }
}

/// Human-readable location plus mismatch, e.g.
/// `statement 2 in body of statement 1: expected turn_left, found move_forward`.
impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "statement {}", self.index + 1)?;
        for step in self.path.iter().rev() {
            let slot = match step.slot {
                Slot::Body => "body",
                Slot::ElseBody => "else branch",
            };
            write!(f, " in {slot} of statement {}", step.index + 1)?;
        }
        write!(f, ": {}", self.mismatch)
    }
}
