#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt;

use bsv_ast::{DeclId, Declarations};

use crate::config::ImportPolicy;
use crate::error::CoreError;
use crate::visitor::{DeclarationVisitor, dispatch};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope#{}", self.0)
    }
}

/// One level of name bindings.
#[derive(Debug)]
pub struct LexicalScope {
    name: String,
    bindings: BTreeMap<String, DeclId>,
    // Insertion history, including overwritten bindings.
    binding_list: Vec<DeclId>,
    parent: Option<ScopeId>,
}

impl LexicalScope {
    fn new(name: impl Into<String>, parent: Option<ScopeId>) -> Self {
        Self {
            name: name.into(),
            bindings: BTreeMap::new(),
            binding_list: Vec::new(),
            parent,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn is_global(&self) -> bool {
        self.parent.is_none()
    }

    pub fn lookup_local(&self, name: &str) -> Option<DeclId> {
        self.bindings.get(name).copied()
    }

    pub fn bind(&mut self, name: impl Into<String>, decl: DeclId) {
        self.bindings.insert(name.into(), decl);
        self.binding_list.push(decl);
    }

    /// Current name → declaration mapping (last write wins), ordered by name.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, DeclId)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn binding_list(&self) -> &[DeclId] {
        &self.binding_list
    }
}

/// Owner of every scope in a checking session. Scopes link to their parents by id.
#[derive(Debug, Default)]
pub struct ScopeTree {
    scopes: Vec<LexicalScope>,
}

impl ScopeTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, name: impl Into<String>, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(LexicalScope::new(name, parent));
        id
    }

    pub fn get(&self, id: ScopeId) -> &LexicalScope {
        &self.scopes[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: ScopeId) -> &mut LexicalScope {
        &mut self.scopes[id.0 as usize]
    }

    /// Resolve `name` in `scope`, then in each enclosing scope.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<DeclId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.get(id);
            if let Some(decl) = s.lookup_local(name) {
                return Some(decl);
            }
            current = s.parent;
        }
        None
    }

    pub fn bind(&mut self, scope: ScopeId, name: impl Into<String>, decl: DeclId) {
        self.get_mut(scope).bind(name, decl);
    }

    /// Copy the direct bindings of `from` into `into`.
    ///
    /// `Permissive` overwrites on collision. `Strict` rejects a name that is
    /// already bound locally to a different declaration; nothing is copied then.
    pub fn import(&mut self, into: ScopeId, from: ScopeId, policy: ImportPolicy) -> Result<(), CoreError> {
        let incoming: Vec<(String, DeclId)> = self
            .get(from)
            .bindings()
            .map(|(name, decl)| (name.to_string(), decl))
            .collect();

        if policy == ImportPolicy::Strict {
            let target = self.get(into);
            for (name, decl) in &incoming {
                if target.lookup_local(name).is_some_and(|existing| existing != *decl) {
                    return Err(CoreError::DuplicateBinding {
                        scope: target.name.clone(),
                        name: name.clone(),
                    });
                }
            }
        }

        let target = self.get_mut(into);
        for (name, decl) in incoming {
            target.bind(name, decl);
        }
        Ok(())
    }

    /// Dispatch every entry of the scope's binding list, in insertion order.
    pub fn visit(
        &self,
        scope: ScopeId,
        decls: &Declarations,
        visitor: &mut dyn DeclarationVisitor,
    ) -> Result<(), CoreError> {
        for &decl in self.get(scope).binding_list() {
            tracing::trace!(scope = %self.get(scope).name, decl = %decls.get(decl).name, "visit binding");
            dispatch(visitor, decls, decl)?;
        }
        Ok(())
    }
}
