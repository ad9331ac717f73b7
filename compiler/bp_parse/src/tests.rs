use super::*;
use bp_ir::ProgramNode;
use pretty_assertions::assert_eq;

fn seq(kinds: &[&str]) -> ProgramSequence {
    kinds.iter().map(|k| ProgramNode::new(*k)).collect()
}

fn codes(output: &ParseOutput) -> Vec<(usize, ErrorCode)> {
    output.skipped.iter().map(|s| (s.line, s.code)).collect()
}

#[test]
fn straight_line_actions() {
    let out = parse("await moveForward();\nawait moveForward();\nawait turnLeft();");
    assert_eq!(out.sequence, seq(&["move_forward", "move_forward", "turn_left"]));
    assert!(out.skipped.is_empty());
}

#[test]
fn repeat_on_one_line() {
    let out = parse("repeat(3) { await moveForward(); }");
    let expected = ProgramSequence::new(vec![ProgramNode::new("repeat_loop")
        .with_times(3)
        .with_body(seq(&["move_forward"]))]);
    assert_eq!(out.sequence, expected);
}

#[test]
fn await_and_semicolons_are_optional() {
    let out = parse("moveForward()\nturnRight()\nawait jump()");
    assert_eq!(out.sequence, seq(&["move_forward", "turn_right", "jump"]));
}

#[test]
fn while_with_if_else_inside() {
    let out = parse(
        "while (notAtGoal()) {\n\
         \x20   if (isPathForward()) {\n\
         \x20       await moveForward();\n\
         \x20   } else {\n\
         \x20       await turnLeft();\n\
         \x20   }\n\
         }",
    );
    let expected = ProgramSequence::new(vec![ProgramNode::new("while_loop")
        .with_condition("not_at_goal")
        .with_body(ProgramSequence::new(vec![ProgramNode::new("if_else")
            .with_condition("path_ahead")
            .with_body(seq(&["move_forward"]))
            .with_else_body(seq(&["turn_left"]))]))]);
    assert_eq!(out.sequence, expected);
    assert!(out.skipped.is_empty());
}

#[test]
fn if_without_else_is_if_only() {
    let out = parse("if (isEnemyAhead()) { attack(); }\nmoveForward();");
    let expected = ProgramSequence::new(vec![
        ProgramNode::new("if_only")
            .with_condition("enemy_ahead")
            .with_body(seq(&["attack"])),
        ProgramNode::new("move_forward"),
    ]);
    assert_eq!(out.sequence, expected);
}

#[test]
fn else_if_nests_in_else_branch() {
    let out = parse(
        "if (isPathForward()) { moveForward(); } \
         else if (isPathLeft()) { turnLeft(); } \
         else { turnRight(); }",
    );
    let expected = ProgramSequence::new(vec![ProgramNode::new("if_else")
        .with_condition("path_ahead")
        .with_body(seq(&["move_forward"]))
        .with_else_body(ProgramSequence::new(vec![ProgramNode::new("if_else")
            .with_condition("path_left")
            .with_body(seq(&["turn_left"]))
            .with_else_body(seq(&["turn_right"]))]))]);
    assert_eq!(out.sequence, expected);
}

#[test]
fn for_loop_becomes_repeat() {
    let out = parse("for (let i = 0; i < 4; i++) {\n  moveForward();\n  turnRight();\n}");
    let expected = ProgramSequence::new(vec![ProgramNode::new("repeat_loop")
        .with_times(4)
        .with_body(seq(&["move_forward", "turn_right"]))]);
    assert_eq!(out.sequence, expected);
}

#[test]
fn for_loop_without_integer_bounds_is_skipped_whole() {
    let out = parse("for (const step of steps) {\n  moveForward();\n}\nturnLeft();");
    assert_eq!(out.sequence, seq(&["turn_left"]));
    assert_eq!(codes(&out), vec![(1, ErrorCode::E1004)]);
}

#[test]
fn repeat_without_count_has_no_times() {
    let out = parse("repeat() { jump(); }");
    assert_eq!(out.sequence.nodes()[0].times(), None);
    assert_eq!(out.sequence.nodes()[0].body(), &seq(&["jump"]));
}

#[test]
fn unknown_statements_are_skipped() {
    let out = parse("moveForward();\nfly();\nlet x = 3;\nturnLeft();");
    assert_eq!(out.sequence, seq(&["move_forward", "turn_left"]));
    assert_eq!(
        codes(&out),
        vec![(2, ErrorCode::E1001), (3, ErrorCode::E1001)]
    );
}

#[test]
fn unclosed_body_runs_to_end() {
    let out = parse("moveForward();\nrepeat(2) {\n  turnLeft();\n  jump();");
    let expected = ProgramSequence::new(vec![
        ProgramNode::new("move_forward"),
        ProgramNode::new("repeat_loop")
            .with_times(2)
            .with_body(seq(&["turn_left", "jump"])),
    ]);
    assert_eq!(out.sequence, expected);
    assert_eq!(codes(&out), vec![(2, ErrorCode::E1002)]);
}

#[test]
fn unclosed_outer_body_takes_trailing_lines() {
    let out = parse("repeat(2) {\n  while (notAtGoal()) {\n    jump();\n}\nturnLeft();");
    let expected = ProgramSequence::new(vec![ProgramNode::new("repeat_loop")
        .with_times(2)
        .with_body(ProgramSequence::new(vec![
            ProgramNode::new("while_loop")
                .with_condition("not_at_goal")
                .with_body(seq(&["jump"])),
            ProgramNode::new("turn_left"),
        ]))]);
    assert_eq!(out.sequence, expected);
    assert_eq!(codes(&out), vec![(1, ErrorCode::E1002)]);
}

#[test]
fn stray_closing_brace_is_skipped() {
    let out = parse("moveForward();\n}\nturnLeft();");
    assert_eq!(out.sequence, seq(&["move_forward", "turn_left"]));
    assert_eq!(codes(&out), vec![(2, ErrorCode::E1003)]);
}

#[test]
fn dangling_else_is_skipped() {
    let out = parse("moveForward();\nelse { turnLeft(); }\njump();");
    assert_eq!(out.sequence, seq(&["move_forward", "jump"]));
    assert_eq!(codes(&out), vec![(2, ErrorCode::E1005)]);
}

#[test]
fn unknown_construct_is_skipped_with_body() {
    let out = parse("function go() {\n  moveForward();\n}\njump();");
    assert_eq!(out.sequence, seq(&["jump"]));
    assert_eq!(codes(&out), vec![(1, ErrorCode::E1001)]);
}

#[test]
fn nesting_limit_empties_deeper_bodies() {
    let out = parse_with_limit("repeat(2) {\n  repeat(3) {\n    jump();\n  }\n}", 1);
    let expected = ProgramSequence::new(vec![ProgramNode::new("repeat_loop")
        .with_times(2)
        .with_body(ProgramSequence::new(vec![
            ProgramNode::new("repeat_loop").with_times(3)
        ]))]);
    assert_eq!(out.sequence, expected);
    assert_eq!(codes(&out), vec![(2, ErrorCode::E1006)]);
}

#[test]
fn very_deep_input_is_bounded() {
    let depth = 200;
    let source = format!("{}jump();{}", "repeat(1) {".repeat(depth), "}".repeat(depth));
    let out = parse(&source);
    assert_eq!(out.sequence.len(), 1);
    assert!(out.skipped.iter().any(|s| s.code == ErrorCode::E1006));
}

#[test]
fn empty_and_comment_only_input() {
    assert_eq!(parse(""), ParseOutput::default());
    assert_eq!(parse("// nothing yet\n/* still nothing */"), ParseOutput::default());
}

#[test]
fn skipped_line_diagnostic_names_line() {
    let out = parse("moveForward();\nfly();");
    let diagnostic = out.skipped[0].to_diagnostic();
    assert_eq!(diagnostic.code, ErrorCode::E1001);
    assert!(diagnostic.message.contains("fly()"));
    assert_eq!(diagnostic.notes, vec!["line 2".to_owned()]);
}

#[test]
fn bare_block_after_statement_keeps_the_statement() {
    let out = parse("moveForward()\n{\nturnLeft();\n}");
    assert_eq!(out.sequence, seq(&["move_forward"]));
    assert_eq!(codes(&out), vec![(2, ErrorCode::E1001)]);
}
