//! Diagnostics for the blockpath engine.
//!
//! The engine never fails a caller: everything it cannot use is skipped and
//! reported in-band. This crate provides the vocabulary for those reports:
//!
//! - [`ErrorCode`]: searchable code per failure kind
//! - [`Diagnostic`]: code + message + notes, attached to results
//! - [`LoadError`]: decoding failures for snapshots and pattern libraries,
//!   converted into diagnostics at component boundaries

mod diagnostic;
mod error_code;
mod load_error;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
pub use load_error::LoadError;
