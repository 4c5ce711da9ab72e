#![forbid(unsafe_code)]

//! Parse-tree shapes produced by the external BSV parser and consumed by the
//! package traversal.

use crate::decl::BindingKind;
use crate::types::{BsvType, TypeRef};
use crate::{Span, span};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Hands out unique [`NodeId`]s for one parse. Ids restart per source unit;
/// use [`NodeKey`] where nodes from several packages meet.
#[derive(Debug, Default)]
pub struct NodeIds {
    next: u32,
}

impl NodeIds {
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}

/// Position of a node's starting token.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourcePos {
    /// Name of the source unit the token came from (usually a file path).
    pub source: String,
    pub line: usize,
    pub column: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub start: SourcePos,
    pub span: Span,
    /// Source text covered by the node, kept for logging.
    pub text: String,
}

impl Node {
    pub fn new(id: NodeId, source: impl Into<String>, line: usize) -> Self {
        Self {
            id,
            start: SourcePos {
                source: source.into(),
                line,
                column: 0,
            },
            span: span(0, 0),
            text: String::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn key(&self) -> NodeKey {
        NodeKey {
            source: self.start.source.clone(),
            id: self.id,
        }
    }
}

/// Identity of a node across a whole session.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    pub source: String,
    pub id: NodeId,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeclSpecKind {
    Enum,
    Struct,
    Union,
    Interface,
    Method,
    Module,
    Function,
    TypeSynonym { typedef_type: TypeRef },
    Value,
}

/// A declaration as the parser saw it, before it is allocated in the session arena.
#[derive(Clone, Debug, PartialEq)]
pub struct DeclSpec {
    pub name: String,
    pub bsvtype: TypeRef,
    pub binding: BindingKind,
    pub kind: DeclSpecKind,
    pub members: Vec<DeclSpec>,
}

impl DeclSpec {
    pub fn new(name: impl Into<String>, bsvtype: TypeRef, kind: DeclSpecKind) -> Self {
        Self {
            name: name.into(),
            bsvtype,
            binding: BindingKind::Global,
            kind,
            members: Vec::new(),
        }
    }

    pub fn value(name: impl Into<String>, bsvtype: TypeRef, binding: BindingKind) -> Self {
        let mut spec = Self::new(name, bsvtype, DeclSpecKind::Value);
        spec.binding = binding;
        spec
    }

    pub fn enumeration<I, S>(name: impl Into<String>, bsvtype: TypeRef, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut spec = Self::new(name, bsvtype.clone(), DeclSpecKind::Enum);
        spec.members = tags
            .into_iter()
            .map(|t| Self::value(t, bsvtype.clone(), BindingKind::Global))
            .collect();
        spec
    }

    pub fn structure(name: impl Into<String>, bsvtype: TypeRef, fields: Vec<(&str, TypeRef)>) -> Self {
        Self::aggregate(name, bsvtype, DeclSpecKind::Struct, fields, BindingKind::Local)
    }

    pub fn union(name: impl Into<String>, bsvtype: TypeRef, fields: Vec<(&str, TypeRef)>) -> Self {
        Self::aggregate(name, bsvtype, DeclSpecKind::Union, fields, BindingKind::Local)
    }

    pub fn interface(name: impl Into<String>, bsvtype: TypeRef, methods: Vec<(&str, TypeRef)>) -> Self {
        let mut spec = Self::new(name, bsvtype, DeclSpecKind::Interface);
        spec.members = methods
            .into_iter()
            .map(|(n, t)| {
                let mut m = Self::new(n, t, DeclSpecKind::Method);
                m.binding = BindingKind::Method;
                m
            })
            .collect();
        spec
    }

    pub fn module(name: impl Into<String>, bsvtype: TypeRef) -> Self {
        Self::new(name, bsvtype, DeclSpecKind::Module)
    }

    pub fn function(name: impl Into<String>, bsvtype: TypeRef) -> Self {
        Self::new(name, bsvtype, DeclSpecKind::Function)
    }

    /// `typedef <target> <defined>;`
    pub fn synonym(defined: TypeRef, target: TypeRef) -> Self {
        Self::new(
            defined.name.clone(),
            target,
            DeclSpecKind::TypeSynonym { typedef_type: defined },
        )
    }

    fn aggregate(
        name: impl Into<String>,
        bsvtype: TypeRef,
        kind: DeclSpecKind,
        fields: Vec<(&str, TypeRef)>,
        binding: BindingKind,
    ) -> Self {
        let mut spec = Self::new(name, bsvtype, kind);
        spec.members = fields
            .into_iter()
            .map(|(n, t)| Self::value(n, t, binding))
            .collect();
        spec
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PackageItem {
    Import { package: String, node: Node },
    Declaration { spec: DeclSpec, node: Node },
}

/// The "package definition" production: one parsed source unit.
#[derive(Clone, Debug, PartialEq)]
pub struct PackageDef {
    pub name: String,
    pub source: String,
    pub items: Vec<PackageItem>,
}

impl PackageDef {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            items: Vec::new(),
        }
    }

    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            PackageItem::Import { package, .. } => Some(package.as_str()),
            PackageItem::Declaration { .. } => None,
        })
    }
}

/// Convenience for building package trees by hand (tests, synthesized packages).
#[derive(Debug)]
pub struct PackageBuilder {
    def: PackageDef,
    ids: NodeIds,
    line: usize,
}

impl PackageBuilder {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            def: PackageDef::new(name, source),
            ids: NodeIds::default(),
            line: 1,
        }
    }

    fn node(&mut self) -> Node {
        let node = Node::new(self.ids.next_id(), self.def.source.clone(), self.line);
        self.line += 1;
        node
    }

    pub fn import(mut self, package: impl Into<String>) -> Self {
        let node = self.node();
        self.def.items.push(PackageItem::Import {
            package: package.into(),
            node,
        });
        self
    }

    pub fn declare(mut self, spec: DeclSpec) -> Self {
        let node = self.node().with_text(spec.name.clone());
        self.def.items.push(PackageItem::Declaration { spec, node });
        self
    }

    pub fn finish(self) -> PackageDef {
        self.def
    }
}

/// `Int#(n)` and friends.
pub fn sized(name: &str, width: u64) -> TypeRef {
    BsvType::applied(name, vec![BsvType::numeric(width)])
}
