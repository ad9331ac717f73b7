//! Canonical program representation for the blockpath engine.
//!
//! Both producers (the block-workspace canonicalizer and the text parser)
//! emit a [`ProgramSequence`]; every consumer (pattern matcher, hint
//! selector, equivalence validator) reads one. Values are built once and
//! never mutated afterwards.
//!
//! # Modules
//!
//! - [`node`]: `ProgramNode` / `ProgramSequence` / `Condition`
//! - [`pattern`]: reference patterns and their progressive hints
//! - [`vocab`]: the kind vocabulary shared by the text parser and renderer
//! - [`compare`]: the single structural comparison primitive

pub mod compare;
pub mod node;
pub mod pattern;
pub mod vocab;

pub use compare::{compare, CompareMode, Comparison, Divergence, Mismatch, PathStep, Slot, Verdict};
pub use node::{Condition, ProgramNode, ProgramSequence};
pub use pattern::{HintContent, HintStep, PatternDefinition};
