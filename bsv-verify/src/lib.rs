#![forbid(unsafe_code)]

pub mod error;
pub mod names;
pub mod operators;
pub mod report;
#[cfg(feature = "z3")]
pub mod checker;
#[cfg(feature = "z3")]
pub mod universe;

pub use error::VerifyError;
pub use names::FreshNames;
pub use operators::{BOOLEAN_OPERATORS, boolean_operator_table, is_boolean_operator};
pub use report::{CheckReport, CheckResult, TypeDiagnostic, source_location};
#[cfg(feature = "z3")]
pub use checker::TypeChecker;
#[cfg(feature = "z3")]
pub use universe::{BUILTIN_CONSTRUCTORS, TypeUniverse, predicate_name};
