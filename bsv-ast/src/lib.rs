#![forbid(unsafe_code)]

use miette::SourceSpan;

pub mod decl;
pub mod tree;
pub mod types;

pub use decl::{BindingKind, DeclId, Declaration, DeclarationKind, Declarations};
pub use tree::{
    DeclSpec, DeclSpecKind, Node, NodeId, NodeIds, NodeKey, PackageBuilder, PackageDef, PackageItem,
    SourcePos, sized,
};
pub use types::{BsvType, TypeRef};

pub type Span = SourceSpan;

pub fn span(start: usize, len: usize) -> Span {
    SourceSpan::new(start.into(), len)
}
