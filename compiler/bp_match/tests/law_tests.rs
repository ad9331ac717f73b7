//! Property-based tests for the matcher's scoring laws.
//!
//! - Prefix law: a correct prefix of length k scores round(k / n * 100); a
//!   wrong element anywhere in it scores 0.
//! - Priority law: between priorities 1 and 2, the priority-1 pattern stays
//!   best whenever it scores at all.
//! - Empty programs score 0 against everything and never match exactly.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    reason = "Proptest macros generate code with these patterns"
)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    reason = "Reference rounding is computed in floating point"
)]

use bp_ir::{PatternDefinition, ProgramNode, ProgramSequence};
use bp_match::{best_partial, exact_match, match_program, percentage_match};
use proptest::prelude::*;

const KINDS: &[&str] = &["move_forward", "turn_left", "turn_right", "jump", "attack"];

fn kinds_strategy(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(KINDS), len)
}

fn sequence(kinds: &[&str]) -> ProgramSequence {
    kinds.iter().map(|k| ProgramNode::new(*k)).collect()
}

fn pattern(id: &str, priority: u32, kinds: &[&str]) -> PatternDefinition {
    PatternDefinition {
        id: id.to_owned(),
        name: id.to_owned(),
        sequence: sequence(kinds),
        weapon_key: format!("{id}_weapon"),
        priority,
        hints: Vec::new(),
    }
}

fn rounded_share(k: usize, n: usize) -> u8 {
    ((k as f64 / n as f64) * 100.0).round() as u8
}

proptest! {
    #[test]
    fn prefix_scores_its_rounded_share(
        target in kinds_strategy(1..12),
        cut in any::<prop::sample::Index>(),
    ) {
        let k = cut.index(target.len() + 1);
        let p = pattern("p", 1, &target);
        let expected = if k == 0 { 0 } else { rounded_share(k, target.len()) };
        prop_assert_eq!(percentage_match(&sequence(&target[..k]), &p), expected);
    }

    #[test]
    fn wrong_element_in_prefix_scores_zero(
        target in kinds_strategy(2..12),
        cut in any::<prop::sample::Index>(),
        at in any::<prop::sample::Index>(),
        shift in 1usize..KINDS.len(),
    ) {
        let k = 1 + cut.index(target.len());
        let mut current: Vec<&str> = target[..k].to_vec();
        let position = at.index(k);
        let original = KINDS.iter().position(|kind| *kind == current[position]).unwrap();
        current[position] = KINDS[(original + shift) % KINDS.len()];
        let p = pattern("p", 1, &target);
        prop_assert_eq!(percentage_match(&sequence(&current), &p), 0);
    }

    #[test]
    fn full_program_matches_exactly_at_100(target in kinds_strategy(1..12)) {
        let p = pattern("p", 1, &target);
        let current = sequence(&target);
        prop_assert_eq!(percentage_match(&current, &p), 100);
        let library = [p];
        prop_assert_eq!(exact_match(&current, &library).map(|p| p.id.as_str()), Some("p"));
    }

    #[test]
    fn priority_one_holds_whenever_it_scores(
        first in kinds_strategy(1..8),
        second in kinds_strategy(1..8),
        current in kinds_strategy(1..8),
        reversed in any::<bool>(),
    ) {
        let p1 = pattern("p1", 1, &first);
        let p2 = pattern("p2", 2, &second);
        let library = if reversed { vec![p2, p1] } else { vec![p1, p2] };
        let current = sequence(&current);
        let p1 = library.iter().find(|p| p.id == "p1").unwrap();
        if percentage_match(&current, p1) > 0 {
            let best = best_partial(&current, &library).unwrap();
            prop_assert_eq!(best.pattern.id.as_str(), "p1");
        }
    }

    #[test]
    fn empty_program_matches_nothing(
        library in prop::collection::vec((kinds_strategy(0..6), 0u32..4), 0..5),
    ) {
        let patterns: Vec<PatternDefinition> = library
            .iter()
            .enumerate()
            .map(|(i, (kinds, priority))| pattern(&format!("p{i}"), *priority, kinds))
            .collect();
        let empty = ProgramSequence::empty();
        for p in &patterns {
            prop_assert_eq!(percentage_match(&empty, p), 0);
        }
        let result = match_program(&empty, &patterns);
        prop_assert!(result.exact.is_none());
        prop_assert!(result.best.is_none());
        prop_assert!(!result.summary().matched);
    }
}
