#![forbid(unsafe_code)]
#![allow(unused_assignments)]

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Failures of scope handling and package analysis.
///
/// `ProtocolViolation` and `SynonymArity` are internal-consistency failures:
/// they end the session's current analysis and are not user diagnostics.
#[derive(Debug, Error, Diagnostic)]
pub enum CoreError {
    #[error("package '{package}' not found on the include path (searched: {})", display_paths(.searched))]
    #[diagnostic(code(bsv::package_not_found))]
    PackageNotFound {
        package: String,
        searched: Vec<PathBuf>,
    },

    #[error("failed to parse package '{package}': {message}")]
    #[diagnostic(code(bsv::parse))]
    Parse { package: String, message: String },

    #[error("{visitor} visitor cannot accept {variant} declaration '{name}'")]
    #[diagnostic(code(bsv::protocol_violation))]
    ProtocolViolation {
        visitor: &'static str,
        variant: &'static str,
        name: String,
    },

    #[error("type synonym '{name}' has {arity} parameter(s); only arity-0 synonyms can be dereferenced")]
    #[diagnostic(code(bsv::synonym_arity))]
    SynonymArity { name: String, arity: usize },

    #[error("'{name}' is already bound in scope '{scope}'")]
    #[diagnostic(code(bsv::duplicate_binding))]
    DuplicateBinding { scope: String, name: String },

    #[error("no enclosing scope to leave")]
    #[diagnostic(code(bsv::scope_underflow))]
    ScopeUnderflow,

    #[error("invalid checker configuration: {message}")]
    #[diagnostic(code(bsv::config))]
    Config { message: String },
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "<empty include path>".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
