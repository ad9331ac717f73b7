//! Property-based round-trip tests for the canonical renderer.
//!
//! For any program built from the text vocabulary, rendering it and parsing
//! the result gives back the same program.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use bp_fmt::render;
use bp_ir::vocab::{kinds, ACTIONS, CONDITIONS};
use bp_ir::{ProgramNode, ProgramSequence};
use proptest::prelude::*;

// -- Program Generation Strategies --

fn action_strategy() -> impl Strategy<Value = ProgramNode> {
    prop::sample::select(ACTIONS).prop_map(|entry| ProgramNode::new(entry.kind))
}

fn condition_strategy() -> impl Strategy<Value = Option<&'static str>> {
    prop::option::of(prop::sample::select(CONDITIONS).prop_map(|entry| entry.kind))
}

fn with_condition(node: ProgramNode, condition: Option<&str>) -> ProgramNode {
    match condition {
        Some(kind) => node.with_condition(kind),
        None => node,
    }
}

fn body_strategy(
    inner: impl Strategy<Value = ProgramNode> + Clone,
) -> impl Strategy<Value = ProgramSequence> {
    prop::collection::vec(inner, 0..4).prop_map(ProgramSequence::new)
}

fn node_strategy() -> impl Strategy<Value = ProgramNode> {
    action_strategy().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            (prop::option::of(0u32..20), body_strategy(inner.clone())).prop_map(
                |(times, body)| {
                    let node = ProgramNode::new(kinds::REPEAT_LOOP).with_body(body);
                    match times {
                        Some(times) => node.with_times(times),
                        None => node,
                    }
                }
            ),
            (condition_strategy(), body_strategy(inner.clone())).prop_map(|(cond, body)| {
                with_condition(ProgramNode::new(kinds::WHILE_LOOP).with_body(body), cond)
            }),
            (condition_strategy(), body_strategy(inner.clone())).prop_map(|(cond, body)| {
                with_condition(ProgramNode::new(kinds::IF_ONLY).with_body(body), cond)
            }),
            (
                condition_strategy(),
                body_strategy(inner.clone()),
                body_strategy(inner)
            )
                .prop_map(|(cond, body, else_body)| {
                    with_condition(
                        ProgramNode::new(kinds::IF_ELSE)
                            .with_body(body)
                            .with_else_body(else_body),
                        cond,
                    )
                }),
        ]
    })
}

fn program_strategy() -> impl Strategy<Value = ProgramSequence> {
    prop::collection::vec(node_strategy(), 0..6).prop_map(ProgramSequence::new)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn render_then_parse_is_identity(program in program_strategy()) {
        let text = render(&program);
        let parsed = bp_parse::parse(&text);
        prop_assert!(parsed.skipped.is_empty(), "skipped lines in:\n{}", text);
        prop_assert_eq!(parsed.sequence, program);
    }

    #[test]
    fn render_is_stable(program in program_strategy()) {
        let once = render(&program);
        let twice = render(&bp_parse::parse(&once).sequence);
        prop_assert_eq!(once, twice);
    }
}
