//! Command implementations for the `blockpath` CLI.
//!
//! Each command reads its input files, runs the engine, and returns the
//! text to print. Diagnostics about skipped input go to stderr.

use std::fs;
use std::path::{Path, PathBuf};

use bp_ir::ProgramSequence;
use serde::Serialize;
use thiserror::Error;

use crate::{Engine, EngineConfig, Readiness};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

fn read(path: &Path) -> Result<String, CommandError> {
    fs::read_to_string(path).map_err(|source| CommandError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn to_json<T: Serialize>(value: &T) -> Result<String, CommandError> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn is_snapshot(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Read a program from a snapshot (`.json`) or a text source (anything
/// else), reporting skipped input on stderr.
pub fn load_program(engine: &Engine, path: &Path) -> Result<ProgramSequence, CommandError> {
    let contents = read(path)?;
    if is_snapshot(path) {
        Ok(canonicalized(engine, path, &contents))
    } else {
        Ok(parsed(engine, path, &contents))
    }
}

fn canonicalized(engine: &Engine, path: &Path, contents: &str) -> ProgramSequence {
    let output = engine.canonicalize(Some(contents)).ready().unwrap_or_default();
    for diagnostic in &output.diagnostics {
        eprintln!("{}: {diagnostic}", path.display());
    }
    output.sequence
}

fn parsed(engine: &Engine, path: &Path, contents: &str) -> ProgramSequence {
    let output = engine.parse_text(Some(contents)).ready().unwrap_or_default();
    for skipped in &output.skipped {
        eprintln!("{}: {}", path.display(), skipped.to_diagnostic());
    }
    output.sequence
}

/// `blockpath parse <file>`: parsed text program as JSON.
pub fn parse_file(path: &Path) -> Result<String, CommandError> {
    let engine = Engine::new(EngineConfig::default());
    let program = parsed(&engine, path, &read(path)?);
    to_json(&program)
}

/// `blockpath canon <snapshot.json>`: canonical program as JSON.
pub fn canon_file(path: &Path) -> Result<String, CommandError> {
    let engine = Engine::new(EngineConfig::default());
    let program = canonicalized(&engine, path, &read(path)?);
    to_json(&program)
}

/// `blockpath fmt <file>`: canonical text rendering of a program.
pub fn fmt_file(path: &Path) -> Result<String, CommandError> {
    let engine = Engine::new(EngineConfig::default());
    let program = load_program(&engine, path)?;
    Ok(bp_fmt::render(&program))
}

/// `blockpath match <library.json> <program>`: hint and reward as JSON.
pub fn match_files(library: &Path, program: &Path) -> Result<String, CommandError> {
    let mut engine = Engine::new(EngineConfig::default());
    let report = engine.load_library(&read(library)?);
    for diagnostic in &report.skipped {
        eprintln!("{}: {diagnostic}", library.display());
    }
    let program = load_program(&engine, program)?;
    match engine.evaluate(&program) {
        Readiness::Ready(evaluation) => to_json(&evaluation),
        Readiness::NotReady => to_json(&Readiness::<()>::NotReady),
    }
}

/// `blockpath validate <text> <snapshot.json>`: equivalence verdict as JSON.
pub fn validate_files(text: &Path, snapshot: &Path) -> Result<String, CommandError> {
    let engine = Engine::new(EngineConfig::default());
    let source = read(text)?;
    let blocks = read(snapshot)?;
    let verdict = engine.validate_sources(Some(&source), Some(&blocks));
    match verdict {
        Readiness::Ready(result) => to_json(&result),
        Readiness::NotReady => to_json(&Readiness::<()>::NotReady),
    }
}
