#![forbid(unsafe_code)]
#![allow(unused_assignments)]

use bsv_core::CoreError;
use miette::Diagnostic;
use thiserror::Error;

/// Internal failures of universe construction and constraint building.
///
/// These abort the session; type errors in the checked program are reported
/// through [`crate::CheckReport`] instead.
#[derive(Debug, Error, Diagnostic)]
pub enum VerifyError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Core(#[from] CoreError),

    #[error("cannot build a disjunction of zero expressions")]
    #[diagnostic(code(bsv::verify::empty_disjunction))]
    EmptyDisjunction,

    #[error("unknown type constructor '{name}'")]
    #[diagnostic(code(bsv::verify::unknown_constructor))]
    UnknownConstructor { name: String },

    #[error("constructor '{name}' takes {expected} argument(s), got {found}")]
    #[diagnostic(code(bsv::verify::arity))]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("type '{name}' appears more than once in the type universe")]
    #[diagnostic(code(bsv::verify::duplicate_constructor))]
    DuplicateConstructor { name: String },

    #[error("expression '{expr}' is not boolean")]
    #[diagnostic(code(bsv::verify::not_boolean))]
    NotBoolean { expr: String },
}
