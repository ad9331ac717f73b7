use std::fmt;

use serde::Serialize;

/// Error codes for all engine diagnostics.
///
/// Format: E#### where first digit indicates the component:
/// - E0xxx: Block-workspace snapshots
/// - E1xxx: Text parsing
/// - E2xxx: Pattern libraries
/// - E9xxx: Internal failures
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize)]
pub enum ErrorCode {
    // Snapshot (E0xxx)
    /// Snapshot is not valid JSON or has neither known shape
    E0001,
    /// Block chain truncated at the nesting or length limit
    E0002,
    /// Block id link is dangling or revisits an earlier block
    E0003,

    // Text (E1xxx)
    /// Unrecognized statement skipped
    E1001,
    /// Construct body has no closing brace
    E1002,
    /// Closing brace without an open construct
    E1003,
    /// `for` loop without integer bounds skipped
    E1004,
    /// `else` without a preceding `if`
    E1005,
    /// Construct nested deeper than the parser's limit
    E1006,

    // Pattern library (E2xxx)
    /// Library document is not a JSON array
    E2001,
    /// Pattern entry is missing required fields
    E2002,
    /// Serialized pattern sequence does not decode
    E2003,
    /// Pattern sequence is empty
    E2004,
    /// Serialized hint check sequence does not decode
    E2005,

    // Internal (E9xxx)
    /// Internal failure caught at a component boundary
    E9001,
}

impl ErrorCode {
    /// Short description, as listed in the variant docs.
    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::E0001 => "snapshot does not decode",
            ErrorCode::E0002 => "block chain truncated",
            ErrorCode::E0003 => "broken block link",
            ErrorCode::E1001 => "unrecognized statement",
            ErrorCode::E1002 => "unclosed block",
            ErrorCode::E1003 => "unmatched closing brace",
            ErrorCode::E1004 => "for loop without integer bounds",
            ErrorCode::E1005 => "else without if",
            ErrorCode::E1006 => "nesting too deep",
            ErrorCode::E2001 => "pattern library does not decode",
            ErrorCode::E2002 => "malformed pattern entry",
            ErrorCode::E2003 => "malformed pattern sequence",
            ErrorCode::E2004 => "empty pattern sequence",
            ErrorCode::E2005 => "malformed hint checkpoint",
            ErrorCode::E9001 => "internal error",
        }
    }

    pub fn is_internal(self) -> bool {
        matches!(self, ErrorCode::E9001)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
