//! The engine boundary.
//!
//! Every entry point here is total. Input that is not there yet gives
//! [`Readiness::NotReady`]; input that cannot be used degrades to an empty
//! program with diagnostics; a panic inside a component is caught, logged
//! and turned into the component's negative result (no match, 0%, hidden
//! hint, invalid).

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use bp_canon::{canonicalize_json, CanonOutput};
use bp_diagnostic::{Diagnostic, ErrorCode, LoadError};
use bp_ir::ProgramSequence;
use bp_match::{
    match_program, select_hint, validate, HintInfo, MatchResult, MatchSummary, ValidationResult,
};
use bp_parse::{parse_with_limit, ParseOutput, SkippedLine};
use serde::Serialize;
use tracing::{debug, error};

use crate::{EngineConfig, LoadReport, PatternLibrary};

/// Result of a call whose inputs may not be initialized yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "result", rename_all = "camelCase")]
pub enum Readiness<T> {
    Ready(T),
    NotReady,
}

impl<T> Readiness<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready(_))
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Readiness::Ready(value) => Some(value),
            Readiness::NotReady => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Readiness<U> {
        match self {
            Readiness::Ready(value) => Readiness::Ready(f(value)),
            Readiness::NotReady => Readiness::NotReady,
        }
    }
}

/// Hint and reward for one program.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub hint: HintInfo,
    #[serde(rename = "match")]
    pub summary: MatchSummary,
    /// Score of the best partial match, 0 when nothing matches.
    pub best_percentage: u8,
}

/// Matching engine for one level.
#[derive(Clone, Debug, Default)]
pub struct Engine {
    config: EngineConfig,
    library: Option<PatternLibrary>,
}

impl Engine {
    /// An engine with no pattern library yet; matching is "not ready".
    pub fn new(config: EngineConfig) -> Self {
        Engine {
            config,
            library: None,
        }
    }

    pub fn with_library(config: EngineConfig, library: PatternLibrary) -> Self {
        Engine {
            config,
            library: Some(library),
        }
    }

    /// Replace the library with one decoded from `json`.
    ///
    /// A document that is not a pattern array leaves the engine with an
    /// empty library and reports why.
    pub fn load_library(&mut self, json: &str) -> LoadReport {
        let (library, report) = match PatternLibrary::from_json(json) {
            Ok(loaded) => loaded,
            Err(err) => {
                error!(error = %err, "pattern library rejected");
                let report = LoadReport {
                    loaded: 0,
                    skipped: vec![err.to_diagnostic()],
                };
                (PatternLibrary::default(), report)
            }
        };
        self.library = Some(library);
        report
    }

    /// Canonicalize a block-workspace snapshot.
    ///
    /// `None` means the workspace is not attached yet. A snapshot that does
    /// not decode yields an empty program and an E0001 diagnostic.
    pub fn canonicalize(&self, snapshot_json: Option<&str>) -> Readiness<CanonOutput> {
        let Some(json) = snapshot_json else {
            return Readiness::NotReady;
        };
        let output = guarded(
            "canonicalize",
            || canonicalize_json(json, self.config.canon_limits()),
            |diagnostic| Ok(degraded_canon(diagnostic)),
        );
        let output = output.unwrap_or_else(|err: LoadError| {
            debug!(error = %err, "snapshot degraded to empty program");
            degraded_canon(err.to_diagnostic())
        });
        self.ready_unless_empty(output, |out| &out.sequence)
    }

    /// Parse text code. `None` means the editor is not attached yet.
    pub fn parse_text(&self, source: Option<&str>) -> Readiness<ParseOutput> {
        let Some(source) = source else {
            return Readiness::NotReady;
        };
        let output = guarded(
            "parse",
            || parse_with_limit(source, self.config.max_depth),
            |_| ParseOutput::default(),
        );
        self.ready_unless_empty(output, |out| &out.sequence)
    }

    /// Hint and reward for `program` against the loaded library.
    pub fn evaluate(&self, program: &ProgramSequence) -> Readiness<Evaluation> {
        let Some(library) = &self.library else {
            return Readiness::NotReady;
        };
        if self.config.treat_empty_as_not_ready && program.is_empty() {
            return Readiness::NotReady;
        }
        Readiness::Ready(guarded(
            "evaluate",
            || {
                let result = match_program(program, library.patterns());
                evaluation(&result)
            },
            |_| Evaluation::default(),
        ))
    }

    /// Hint panel contents for `program`.
    pub fn hint(&self, program: &ProgramSequence) -> Readiness<HintInfo> {
        self.evaluate(program).map(|evaluation| evaluation.hint)
    }

    /// Reward match for `program`.
    pub fn match_summary(&self, program: &ProgramSequence) -> Readiness<MatchSummary> {
        self.evaluate(program).map(|evaluation| evaluation.summary)
    }

    /// Whether text code is the same program as the blocks.
    pub fn validate(&self, text: &ProgramSequence, blocks: &ProgramSequence) -> ValidationResult {
        guarded(
            "validate",
            || validate(text, blocks),
            |diagnostic| ValidationResult::invalid(diagnostic.message),
        )
    }

    /// Parse `source`, canonicalize `snapshot_json`, and validate one
    /// against the other.
    ///
    /// Text lines the parser skipped take no part in the comparison; they
    /// are listed at the end of the message.
    pub fn validate_sources(
        &self,
        source: Option<&str>,
        snapshot_json: Option<&str>,
    ) -> Readiness<ValidationResult> {
        let (Some(source), Some(snapshot)) = (source, snapshot_json) else {
            return Readiness::NotReady;
        };
        let (text, skipped) = match self.parse_text(Some(source)) {
            Readiness::Ready(output) => (output.sequence, output.skipped),
            Readiness::NotReady => (ProgramSequence::empty(), Vec::new()),
        };
        let blocks = match self.canonicalize(Some(snapshot)) {
            Readiness::Ready(output) => output.sequence,
            Readiness::NotReady => ProgramSequence::empty(),
        };
        let mut result = self.validate(&text, &blocks);
        if !skipped.is_empty() {
            result.message = format!("{} {}", result.message, ignored_lines(&skipped));
        }
        Readiness::Ready(result)
    }

    fn ready_unless_empty<T>(
        &self,
        output: T,
        sequence: impl FnOnce(&T) -> &ProgramSequence,
    ) -> Readiness<T> {
        if self.config.treat_empty_as_not_ready && sequence(&output).is_empty() {
            Readiness::NotReady
        } else {
            Readiness::Ready(output)
        }
    }
}

fn evaluation(result: &MatchResult<'_>) -> Evaluation {
    Evaluation {
        hint: select_hint(result),
        summary: result.summary(),
        best_percentage: result.best.map_or(0, |best| best.percentage),
    }
}

fn ignored_lines(skipped: &[SkippedLine]) -> String {
    let lines: Vec<String> = skipped
        .iter()
        .map(|s| format!("line {} `{}`", s.line, s.text))
        .collect();
    format!("Ignored lines: {}.", lines.join(", "))
}

fn degraded_canon(diagnostic: Diagnostic) -> CanonOutput {
    CanonOutput {
        sequence: ProgramSequence::empty(),
        diagnostics: vec![diagnostic],
    }
}

/// Run `operation`, turning a panic into `fallback`'s result.
///
/// The fallback receives an E9001 diagnostic describing the panic.
fn guarded<T>(
    name: &'static str,
    operation: impl FnOnce() -> T,
    fallback: impl FnOnce(Diagnostic) -> T,
) -> T {
    match catch_unwind(AssertUnwindSafe(operation)) {
        Ok(value) => value,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(operation = name, %message, "internal failure caught at engine boundary");
            fallback(
                Diagnostic::error(ErrorCode::E9001, format!("internal error in {name}: {message}"))
                    .with_note("the result was replaced by an empty one"),
            )
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "component panicked".to_string()
    }
}
