//! Kind vocabulary shared by the text parser and the canonical renderer.
//!
//! Block kinds arrive from the editor as opaque strings and are never
//! validated against this table. The table only tells the text side which
//! call text denotes which kind, so it must use exactly the strings the
//! block toolbox emits: equivalence validation compares kinds by string
//! identity.

/// Kinds of the control constructs recognized in text.
pub mod kinds {
    pub const IF_ONLY: &str = "if_only";
    pub const IF_ELSE: &str = "if_else";
    pub const REPEAT_LOOP: &str = "repeat_loop";
    pub const WHILE_LOOP: &str = "while_loop";

    pub const MOVE_FORWARD: &str = "move_forward";
    pub const TURN_LEFT: &str = "turn_left";
    pub const TURN_RIGHT: &str = "turn_right";
    pub const ATTACK: &str = "attack";
    pub const JUMP: &str = "jump";
    pub const COLLECT: &str = "collect_item";

    pub const PATH_AHEAD: &str = "path_ahead";
    pub const PATH_LEFT: &str = "path_left";
    pub const PATH_RIGHT: &str = "path_right";
    pub const ENEMY_AHEAD: &str = "enemy_ahead";
    pub const NOT_AT_GOAL: &str = "not_at_goal";
}

/// One row of the call-text table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct VocabEntry {
    /// Canonical kind, identical to the block toolbox's kind string.
    pub kind: &'static str,
    /// Function name as written in text code (`moveForward` in `await moveForward();`).
    pub call: &'static str,
}

impl VocabEntry {
    const fn new(kind: &'static str, call: &'static str) -> Self {
        VocabEntry { kind, call }
    }
}

/// Action statements.
pub const ACTIONS: &[VocabEntry] = &[
    VocabEntry::new(kinds::MOVE_FORWARD, "moveForward"),
    VocabEntry::new(kinds::TURN_LEFT, "turnLeft"),
    VocabEntry::new(kinds::TURN_RIGHT, "turnRight"),
    VocabEntry::new(kinds::ATTACK, "attack"),
    VocabEntry::new(kinds::JUMP, "jump"),
    VocabEntry::new(kinds::COLLECT, "collectItem"),
];

/// Condition leaves usable in `if (...)` and `while (...)`.
pub const CONDITIONS: &[VocabEntry] = &[
    VocabEntry::new(kinds::PATH_AHEAD, "isPathForward"),
    VocabEntry::new(kinds::PATH_LEFT, "isPathLeft"),
    VocabEntry::new(kinds::PATH_RIGHT, "isPathRight"),
    VocabEntry::new(kinds::ENEMY_AHEAD, "isEnemyAhead"),
    VocabEntry::new(kinds::NOT_AT_GOAL, "notAtGoal"),
];

/// Kind for an action call name.
pub fn action_kind(call: &str) -> Option<&'static str> {
    ACTIONS.iter().find(|e| e.call == call).map(|e| e.kind)
}

/// Call name for an action kind.
pub fn action_call(kind: &str) -> Option<&'static str> {
    ACTIONS.iter().find(|e| e.kind == kind).map(|e| e.call)
}

/// Kind for a condition call name.
pub fn condition_kind(call: &str) -> Option<&'static str> {
    CONDITIONS.iter().find(|e| e.call == call).map(|e| e.kind)
}

/// Call name for a condition kind.
pub fn condition_call(kind: &str) -> Option<&'static str> {
    CONDITIONS.iter().find(|e| e.kind == kind).map(|e| e.call)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_table_round_trips() {
        for entry in ACTIONS {
            assert_eq!(action_kind(entry.call), Some(entry.kind));
            assert_eq!(action_call(entry.kind), Some(entry.call));
        }
    }

    #[test]
    fn condition_table_round_trips() {
        for entry in CONDITIONS {
            assert_eq!(condition_kind(entry.call), Some(entry.kind));
            assert_eq!(condition_call(entry.kind), Some(entry.call));
        }
    }

    #[test]
    fn tables_do_not_overlap() {
        for action in ACTIONS {
            assert!(condition_kind(action.call).is_none());
        }
    }

    #[test]
    fn unknown_names_are_not_mapped() {
        assert_eq!(action_kind("fly"), None);
        assert_eq!(action_call("fly"), None);
        assert_eq!(condition_kind("move_forward"), None);
    }
}
