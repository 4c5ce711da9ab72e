#![forbid(unsafe_code)]

use std::fmt;

use crate::tree::{DeclSpec, DeclSpecKind};
use crate::types::TypeRef;

/// Stable index of a declaration inside a [`Declarations`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(u32);

impl DeclId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "decl#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Global,
    Local,
    Module,
    Method,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeclarationKind {
    Enum { tags: Vec<DeclId> },
    Struct { members: Vec<DeclId> },
    Union { members: Vec<DeclId> },
    Interface { members: Vec<DeclId> },
    Method,
    Module,
    Function,
    /// `typedef <bsvtype> <typedef_type>;`. The declaration's own `bsvtype` is
    /// the target, `typedef_type` is the name being defined (with its params).
    TypeSynonym { typedef_type: TypeRef },
    /// Enum tags, aggregate members and other plain bindings.
    Value,
}

impl DeclarationKind {
    pub fn label(&self) -> &'static str {
        match self {
            DeclarationKind::Enum { .. } => "enum",
            DeclarationKind::Struct { .. } => "struct",
            DeclarationKind::Union { .. } => "union",
            DeclarationKind::Interface { .. } => "interface",
            DeclarationKind::Method => "method",
            DeclarationKind::Module => "module",
            DeclarationKind::Function => "function",
            DeclarationKind::TypeSynonym { .. } => "typedef",
            DeclarationKind::Value => "value",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub bsvtype: TypeRef,
    pub binding: BindingKind,
    /// Enclosing declaration (enum tags and aggregate members). Never an owning edge.
    pub parent: Option<DeclId>,
    pub kind: DeclarationKind,
}

impl Declaration {
    pub fn new(name: impl Into<String>, bsvtype: TypeRef, binding: BindingKind) -> Self {
        Self {
            name: name.into(),
            bsvtype,
            binding,
            parent: None,
            kind: DeclarationKind::Value,
        }
    }

    pub fn with_kind(mut self, kind: DeclarationKind) -> Self {
        self.kind = kind;
        self
    }

    /// Members of an aggregate (struct/union/interface) or tags of an enum.
    pub fn members(&self) -> &[DeclId] {
        match &self.kind {
            DeclarationKind::Enum { tags } => tags,
            DeclarationKind::Struct { members }
            | DeclarationKind::Union { members }
            | DeclarationKind::Interface { members } => members,
            _ => &[],
        }
    }

    pub fn is_type_synonym(&self) -> bool {
        matches!(self.kind, DeclarationKind::TypeSynonym { .. })
    }
}

/// Session-owned arena of declarations.
///
/// Everything else (scopes, package tables, the type universe) refers to
/// declarations through [`DeclId`]s handed out here.
#[derive(Debug, Default)]
pub struct Declarations {
    items: Vec<Declaration>,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, decl: Declaration) -> DeclId {
        let id = DeclId(self.items.len() as u32);
        self.items.push(decl);
        id
    }

    pub fn get(&self, id: DeclId) -> &Declaration {
        &self.items[id.index()]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Allocate a parsed declaration and all of its members, linking each member
    /// back to its owner.
    pub fn alloc_spec(&mut self, spec: &DeclSpec) -> DeclId {
        let members: Vec<DeclId> = spec
            .members
            .iter()
            .map(|m| self.alloc_spec(m))
            .collect();

        let kind = match &spec.kind {
            DeclSpecKind::Enum => DeclarationKind::Enum { tags: members.clone() },
            DeclSpecKind::Struct => DeclarationKind::Struct { members: members.clone() },
            DeclSpecKind::Union => DeclarationKind::Union { members: members.clone() },
            DeclSpecKind::Interface => DeclarationKind::Interface { members: members.clone() },
            DeclSpecKind::Method => DeclarationKind::Method,
            DeclSpecKind::Module => DeclarationKind::Module,
            DeclSpecKind::Function => DeclarationKind::Function,
            DeclSpecKind::TypeSynonym { typedef_type } => DeclarationKind::TypeSynonym {
                typedef_type: typedef_type.clone(),
            },
            DeclSpecKind::Value => DeclarationKind::Value,
        };

        let id = self.alloc(
            Declaration::new(spec.name.clone(), spec.bsvtype.clone(), spec.binding).with_kind(kind),
        );
        for m in members {
            self.items[m.index()].parent = Some(id);
        }
        id
    }
}
