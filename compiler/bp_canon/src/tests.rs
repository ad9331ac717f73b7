use super::*;
use bp_ir::ProgramNode;
use pretty_assertions::assert_eq;

fn seq(kinds: &[&str]) -> ProgramSequence {
    kinds.iter().map(|k| ProgramNode::new(*k)).collect()
}

fn canon(json: &str) -> CanonOutput {
    canonicalize_json(json, CanonLimits::default()).unwrap()
}

// -- Tree snapshots --

#[test]
fn empty_workspace_is_empty_sequence() {
    let out = canon(r#"{"blocks": []}"#);
    assert!(out.sequence.is_empty());
    assert!(out.diagnostics.is_empty());

    let out = canon("{}");
    assert!(out.sequence.is_empty());
}

#[test]
fn sibling_chain_becomes_sequence() {
    let out = canon(
        r#"{"blocks": [{
            "kind": "move_forward",
            "next": {"kind": "move_forward", "next": {"kind": "turn_left"}}
        }]}"#,
    );
    assert_eq!(out.sequence, seq(&["move_forward", "move_forward", "turn_left"]));
}

#[test]
fn statement_and_else_slots_become_bodies() {
    let out = canon(
        r#"{"blocks": [{
            "type": "if_else",
            "condition": {"type": "path_ahead"},
            "statement": {"type": "move_forward"},
            "elseStatement": {"type": "turn_left", "next": {"type": "move_forward"}}
        }]}"#,
    );
    let expected = ProgramSequence::new(vec![ProgramNode::new("if_else")
        .with_condition("path_ahead")
        .with_body(seq(&["move_forward"]))
        .with_else_body(seq(&["turn_left", "move_forward"]))]);
    assert_eq!(out.sequence, expected);
}

#[test]
fn value_slot_records_only_leaf_kind() {
    let out = canon(
        r#"{"blocks": [{
            "kind": "while_loop",
            "value": {"kind": "not_at_goal", "value": {"kind": "ignored_inner"}},
            "statement": {"kind": "move_forward"}
        }]}"#,
    );
    let node = &out.sequence.nodes()[0];
    assert_eq!(node.condition_kind(), Some("not_at_goal"));
}

#[test]
fn loop_count_from_field_or_number_leaf() {
    let out = canon(
        r#"{"blocks": [{
            "kind": "repeat_loop",
            "times": 3,
            "statement": {"kind": "move_forward"},
            "next": {
                "kind": "repeat_loop",
                "value": {"kind": "math_number", "number": 4},
                "statement": {"kind": "turn_right"}
            }
        }]}"#,
    );
    let expected = ProgramSequence::new(vec![
        ProgramNode::new("repeat_loop")
            .with_times(3)
            .with_body(seq(&["move_forward"])),
        ProgramNode::new("repeat_loop")
            .with_times(4)
            .with_body(seq(&["turn_right"])),
    ]);
    assert_eq!(out.sequence, expected);
}

#[test]
fn unknown_kinds_are_preserved() {
    let out = canon(r#"{"blocks": [{"kind": "custom_dance_move"}]}"#);
    assert_eq!(out.sequence, seq(&["custom_dance_move"]));
}

#[test]
fn only_first_top_level_stack_is_walked() {
    let out = canon(r#"{"blocks": [{"kind": "jump"}, {"kind": "attack"}]}"#);
    assert_eq!(out.sequence, seq(&["jump"]));
}

#[test]
fn chain_length_limit_truncates() {
    let out = canonicalize_json(
        r#"{"blocks": [{"kind": "a", "next": {"kind": "b", "next": {"kind": "c"}}}]}"#,
        CanonLimits {
            max_depth: 8,
            max_chain_length: 2,
        },
    )
    .unwrap();
    assert_eq!(out.sequence, seq(&["a", "b"]));
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(out.diagnostics[0].code, ErrorCode::E0002);
}

#[test]
fn nesting_limit_drops_deeper_blocks() {
    let out = canonicalize_json(
        r#"{"blocks": [{
            "kind": "repeat_loop", "times": 2,
            "statement": {"kind": "repeat_loop", "times": 2, "statement": {"kind": "jump"}}
        }]}"#,
        CanonLimits {
            max_depth: 1,
            max_chain_length: 16,
        },
    )
    .unwrap();
    let expected = ProgramSequence::new(vec![ProgramNode::new("repeat_loop")
        .with_times(2)
        .with_body(ProgramSequence::new(vec![ProgramNode::new("repeat_loop").with_times(2)]))]);
    assert_eq!(out.sequence, expected);
    assert_eq!(out.diagnostics[0].code, ErrorCode::E0002);
}

/// A tree snapshot of `n` sibling blocks, each nested in the previous `next`.
fn tree_chain(n: usize) -> String {
    let mut json = String::from(r#"{"blocks": ["#);
    for _ in 1..n {
        json.push_str(r#"{"kind": "move_forward", "next": "#);
    }
    json.push_str(r#"{"kind": "move_forward"}"#);
    json.push_str(&"}".repeat(n - 1));
    json.push_str("]}");
    json
}

#[test]
fn long_tree_chain_decodes_in_full() {
    let out = canon(&tree_chain(200));
    assert_eq!(out.sequence.len(), 200);
    assert!(out.diagnostics.is_empty());
}

#[test]
fn tree_chain_past_default_cap_is_truncated() {
    let out = canon(&tree_chain(MAX_CHAIN_LENGTH + 10));
    assert_eq!(out.sequence.len(), MAX_CHAIN_LENGTH);
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(out.diagnostics[0].code, ErrorCode::E0002);
}

#[test]
fn trailing_garbage_is_load_error() {
    let err = canonicalize_json(r#"{"blocks": []} x"#, CanonLimits::default()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E0001);
}

#[test]
fn malformed_snapshot_is_load_error() {
    let err = canonicalize_json("[1, 2", CanonLimits::default()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E0001);
}

// -- Flat snapshots --

#[test]
fn flat_workspace_follows_id_links() {
    let out = canon(
        r#"{"blocks": {
            "b3": {"opcode": "turn_left", "parent": "b2"},
            "b1": {"opcode": "move_forward", "topLevel": true, "next": "b2"},
            "b2": {"opcode": "repeat_loop", "parent": "b1", "times": 2,
                   "statement": "b4", "next": "b3"},
            "b4": {"opcode": "move_forward", "parent": "b2"}
        }}"#,
    );
    let expected = ProgramSequence::new(vec![
        ProgramNode::new("move_forward"),
        ProgramNode::new("repeat_loop")
            .with_times(2)
            .with_body(seq(&["move_forward"])),
        ProgramNode::new("turn_left"),
    ]);
    assert_eq!(out.sequence, expected);
    assert!(out.diagnostics.is_empty());
}

#[test]
fn flat_workspace_picks_topmost_stack() {
    let out = canon(
        r#"{"blocks": {
            "low": {"kind": "attack", "topLevel": true, "y": 200.0},
            "high": {"kind": "jump", "topLevel": true, "y": 10.0}
        }}"#,
    );
    assert_eq!(out.sequence, seq(&["jump"]));
}

#[test]
fn flat_workspace_without_flags_uses_parentless_block() {
    let out = canon(
        r#"{"blocks": {
            "a": {"kind": "move_forward", "next": "b"},
            "b": {"kind": "turn_right", "parent": "a"}
        }}"#,
    );
    assert_eq!(out.sequence, seq(&["move_forward", "turn_right"]));
}

#[test]
fn flat_cycle_terminates() {
    let out = canon(
        r#"{"blocks": {
            "a": {"kind": "move_forward", "topLevel": true, "next": "b"},
            "b": {"kind": "turn_left", "parent": "a", "next": "a"}
        }}"#,
    );
    assert_eq!(out.sequence, seq(&["move_forward", "turn_left"]));
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(out.diagnostics[0].code, ErrorCode::E0003);
}

#[test]
fn flat_dangling_links_are_reported() {
    let out = canon(
        r#"{"blocks": {
            "a": {"kind": "if_only", "topLevel": true, "condition": "gone", "next": "missing"}
        }}"#,
    );
    assert_eq!(out.sequence, seq(&["if_only"]));
    assert_eq!(out.diagnostics.len(), 2);
    assert!(out.diagnostics.iter().all(|d| d.code == ErrorCode::E0003));
}

#[test]
fn flat_and_tree_shapes_agree() {
    let tree = canon(
        r#"{"blocks": [{"kind": "while_loop", "value": {"kind": "not_at_goal"},
            "statement": {"kind": "move_forward"}}]}"#,
    );
    let flat = canon(
        r#"{"blocks": {
            "w": {"kind": "while_loop", "topLevel": true, "value": "c", "statement": "m"},
            "c": {"kind": "not_at_goal", "parent": "w"},
            "m": {"kind": "move_forward", "parent": "w"}
        }}"#,
    );
    assert_eq!(tree.sequence, flat.sequence);
}
