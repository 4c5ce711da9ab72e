#![forbid(unsafe_code)]

mod config;
mod context;
mod error;
mod package;
mod scope;
mod visitor;

pub use config::{CheckerConfig, ImportPolicy};
pub use context::PackageContext;
pub use error::CoreError;
pub use package::{Analysis, Analyzer, PackageParser, search_include_path};
pub use scope::{LexicalScope, ScopeId, ScopeTree};
pub use visitor::{DeclarationVisitor, dispatch};
