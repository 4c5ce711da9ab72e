#![forbid(unsafe_code)]

use std::collections::{HashMap, HashSet};

use bsv_ast::{DeclId, Declarations};

use crate::error::CoreError;
use crate::scope::{ScopeId, ScopeTree};
use crate::visitor::DeclarationVisitor;

/// Per-session symbol tables built by visiting package scopes.
///
/// `type_declaration_list` order is the constructor order of the solver type
/// universe and is only ever appended to.
#[derive(Debug, Default)]
pub struct PackageContext {
    type_declaration: HashMap<String, DeclId>,
    type_declaration_list: Vec<DeclId>,
    member_declaration: HashMap<String, Vec<DeclId>>,
    enumtag: HashMap<String, DeclId>,
    declaration: HashMap<String, DeclId>,
    declaration_list: Vec<DeclId>,
    indexed: HashSet<DeclId>,
}

struct ContextIndexer<'a> {
    context: &'a mut PackageContext,
}

impl DeclarationVisitor for ContextIndexer<'_> {
    fn visit_enum_declaration(&mut self, decls: &Declarations, id: DeclId) -> Result<(), CoreError> {
        self.context.visit_enum_declaration(decls, id)
    }

    fn visit_function_definition(&mut self, decls: &Declarations, id: DeclId) -> Result<(), CoreError> {
        self.context.visit_function_definition(decls, id)
    }

    fn visit_interface_declaration(&mut self, decls: &Declarations, id: DeclId) -> Result<(), CoreError> {
        self.context.visit_interface_declaration(decls, id)
    }

    fn visit_method_declaration(&mut self, decls: &Declarations, id: DeclId) -> Result<(), CoreError> {
        self.context.visit_method_declaration(decls, id)
    }

    fn visit_module_definition(&mut self, decls: &Declarations, id: DeclId) -> Result<(), CoreError> {
        self.context.visit_module_definition(decls, id)
    }

    fn visit_struct_declaration(&mut self, decls: &Declarations, id: DeclId) -> Result<(), CoreError> {
        self.context.visit_struct_declaration(decls, id)
    }

    fn visit_type_synonym_declaration(&mut self, decls: &Declarations, id: DeclId) -> Result<(), CoreError> {
        self.context.visit_type_synonym_declaration(decls, id)
    }

    fn visit_union_declaration(&mut self, decls: &Declarations, id: DeclId) -> Result<(), CoreError> {
        self.context.visit_union_declaration(decls, id)
    }
}

impl PackageContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every declaration bound in `scope`.
    pub fn import(&mut self, tree: &ScopeTree, scope: ScopeId, decls: &Declarations) -> Result<(), CoreError> {
        let mut indexer = ContextIndexer { context: self };
        tree.visit(scope, decls, &mut indexer)
    }

    pub fn visit_enum_declaration(&mut self, decls: &Declarations, id: DeclId) -> Result<(), CoreError> {
        if !self.indexed.insert(id) {
            return Ok(());
        }
        for &tag in decls.get(id).members() {
            let owner = decls.get(tag).parent.unwrap_or(id);
            self.enumtag.insert(decls.get(tag).name.clone(), owner);
        }
        Ok(())
    }

    pub fn visit_interface_declaration(&mut self, decls: &Declarations, id: DeclId) -> Result<(), CoreError> {
        self.index_aggregate(decls, id);
        Ok(())
    }

    pub fn visit_struct_declaration(&mut self, decls: &Declarations, id: DeclId) -> Result<(), CoreError> {
        self.index_aggregate(decls, id);
        Ok(())
    }

    pub fn visit_union_declaration(&mut self, decls: &Declarations, id: DeclId) -> Result<(), CoreError> {
        tracing::debug!(name = %decls.get(id).name, "package context union");
        self.index_aggregate(decls, id);
        Ok(())
    }

    pub fn visit_module_definition(&mut self, decls: &Declarations, id: DeclId) -> Result<(), CoreError> {
        self.index_binding(decls, id);
        Ok(())
    }

    pub fn visit_function_definition(&mut self, decls: &Declarations, id: DeclId) -> Result<(), CoreError> {
        self.index_binding(decls, id);
        Ok(())
    }

    /// Bare methods only exist as interface members.
    pub fn visit_method_declaration(&mut self, decls: &Declarations, id: DeclId) -> Result<(), CoreError> {
        Err(CoreError::ProtocolViolation {
            visitor: "package context",
            variant: "method",
            name: decls.get(id).name.clone(),
        })
    }

    /// Synonyms are registered with [`PackageContext::define_synonym`], never visited.
    pub fn visit_type_synonym_declaration(&mut self, decls: &Declarations, id: DeclId) -> Result<(), CoreError> {
        Err(CoreError::ProtocolViolation {
            visitor: "package context",
            variant: "typedef",
            name: decls.get(id).name.clone(),
        })
    }

    /// Make a type synonym visible to dereferencing.
    pub fn define_synonym(&mut self, decls: &Declarations, id: DeclId) {
        self.declaration.insert(decls.get(id).name.clone(), id);
    }

    /// Append a type declaration that did not come from a scope (synthesized constructors).
    pub fn add_type_declaration(&mut self, name: impl Into<String>, id: DeclId) {
        if self.indexed.insert(id) {
            self.type_declaration_list.push(id);
            self.type_declaration.insert(name.into(), id);
        }
    }

    fn index_aggregate(&mut self, decls: &Declarations, id: DeclId) {
        if !self.indexed.insert(id) {
            return;
        }
        let decl = decls.get(id);
        self.type_declaration_list.push(id);
        self.type_declaration.insert(decl.name.clone(), id);
        for &member in decl.members() {
            self.member_declaration
                .entry(decls.get(member).name.clone())
                .or_default()
                .push(member);
        }
    }

    fn index_binding(&mut self, decls: &Declarations, id: DeclId) {
        if !self.indexed.insert(id) {
            return;
        }
        self.declaration.insert(decls.get(id).name.clone(), id);
        self.declaration_list.push(id);
    }

    pub fn type_declaration(&self, name: &str) -> Option<DeclId> {
        self.type_declaration.get(name).copied()
    }

    pub fn type_declarations(&self) -> &[DeclId] {
        &self.type_declaration_list
    }

    /// Every aggregate member with this name, across all aggregates.
    pub fn members_named(&self, name: &str) -> &[DeclId] {
        self.member_declaration
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The enum that declares `tag`.
    pub fn enum_for_tag(&self, tag: &str) -> Option<DeclId> {
        self.enumtag.get(tag).copied()
    }

    pub fn declaration(&self, name: &str) -> Option<DeclId> {
        self.declaration.get(name).copied()
    }

    pub fn declarations(&self) -> &[DeclId] {
        &self.declaration_list
    }
}
