use thiserror::Error;

use crate::{Diagnostic, ErrorCode};

/// Failure to decode collaborator input.
///
/// Components never return this to the UI; it is converted with
/// [`LoadError::to_diagnostic`] and the offending input is skipped.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("workspace snapshot does not decode: {0}")]
    Snapshot(#[source] serde_json::Error),

    #[error("pattern library does not decode: {0}")]
    Library(#[source] serde_json::Error),

    #[error("pattern #{index} ({name}): {source}")]
    Pattern {
        index: usize,
        name: String,
        code: ErrorCode,
        #[source]
        source: serde_json::Error,
    },

    #[error("pattern #{index} ({name}) has an empty sequence")]
    EmptyPattern { index: usize, name: String },
}

impl LoadError {
    pub fn code(&self) -> ErrorCode {
        match self {
            LoadError::Snapshot(_) => ErrorCode::E0001,
            LoadError::Library(_) => ErrorCode::E2001,
            LoadError::Pattern { code, .. } => *code,
            LoadError::EmptyPattern { .. } => ErrorCode::E2004,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::warning(self.code(), self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pattern_maps_to_code() {
        let err = LoadError::EmptyPattern {
            index: 2,
            name: "zigzag".to_string(),
        };
        let diag = err.to_diagnostic();
        assert_eq!(diag.code, ErrorCode::E2004);
        assert_eq!(diag.message, "pattern #2 (zigzag) has an empty sequence");
    }

    #[test]
    fn json_failures_keep_their_source() {
        let source = serde_json::from_str::<Vec<u32>>("{").err();
        let Some(source) = source else {
            panic!("truncated JSON must fail to decode");
        };
        let err = LoadError::Snapshot(source);
        assert_eq!(err.code(), ErrorCode::E0001);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("workspace snapshot does not decode"));
    }
}
