#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use bsv_ast::{
    BindingKind, BsvType, DeclId, DeclSpec, Declaration, DeclarationKind, Declarations, PackageDef,
    PackageItem, TypeRef,
};

use crate::config::CheckerConfig;
use crate::context::PackageContext;
use crate::error::CoreError;
use crate::scope::{ScopeId, ScopeTree};

/// The lexer/parser seam: turns a resolved package file into a parse tree.
///
/// Any `FnMut(&str, &Path) -> Result<PackageDef, CoreError>` is a parser.
pub trait PackageParser {
    fn parse_package(&mut self, package: &str, path: &Path) -> Result<PackageDef, CoreError>;
}

impl<F> PackageParser for F
where
    F: FnMut(&str, &Path) -> Result<PackageDef, CoreError>,
{
    fn parse_package(&mut self, package: &str, path: &Path) -> Result<PackageDef, CoreError> {
        self(package, path)
    }
}

#[derive(Debug)]
pub enum Analysis {
    Analyzed(PackageDef),
    /// The package was analyzed earlier in this session; nothing was done.
    AlreadyAnalyzed,
}

impl Analysis {
    pub fn tree(&self) -> Option<&PackageDef> {
        match self {
            Analysis::Analyzed(tree) => Some(tree),
            Analysis::AlreadyAnalyzed => None,
        }
    }
}

/// First `<dir>/<package>.<ext>` that exists, probing directories in order.
pub fn search_include_path(config: &CheckerConfig, package: &str) -> Result<PathBuf, CoreError> {
    let file_name = format!("{package}.{}", config.source_extension);
    let mut searched = Vec::with_capacity(config.include_path.len());
    for dir in &config.include_path {
        let candidate = dir.join(&file_name);
        tracing::trace!(candidate = %candidate.display(), "probe include path");
        if candidate.is_file() {
            return Ok(candidate);
        }
        searched.push(candidate);
    }
    Err(CoreError::PackageNotFound {
        package: package.to_string(),
        searched,
    })
}

/// One checking session's name-resolution state.
///
/// Owns the declaration arena, every scope, the symbol tables and the cache of
/// analyzed packages. A package is cached as soon as it is parsed, before its
/// imports are followed: an import that reaches a package still being traversed
/// (directly or through a cycle) returns `AlreadyAnalyzed` and contributes no
/// bindings. No cycle diagnostic is produced. A package whose analysis fails
/// is dropped from the cache again, so a later attempt re-runs it.
pub struct Analyzer<P> {
    config: CheckerConfig,
    parser: P,
    decls: Declarations,
    scopes: ScopeTree,
    current_scope: ScopeId,
    context: PackageContext,
    package_scopes: HashMap<String, ScopeId>,
    function_constructors: bool,
}

impl<P: PackageParser> Analyzer<P> {
    pub fn new(config: CheckerConfig, parser: P) -> Self {
        let mut scopes = ScopeTree::new();
        let root = scopes.alloc("<session>", None);
        let mut analyzer = Self {
            config,
            parser,
            decls: Declarations::new(),
            scopes,
            current_scope: root,
            context: PackageContext::new(),
            package_scopes: HashMap::new(),
            function_constructors: false,
        };
        if analyzer.config.synthesize_function_constructors {
            analyzer.install_function_constructors();
        }
        analyzer
    }

    pub fn analyze_package(&mut self, package: &str) -> Result<Analysis, CoreError> {
        if self.package_scopes.contains_key(package) {
            tracing::trace!(package, "package already analyzed");
            return Ok(Analysis::AlreadyAnalyzed);
        }

        tracing::debug!(package, "analyze package");
        let previous = self.current_scope;
        let scope = self.scopes.alloc(package, None);
        self.current_scope = scope;
        let result = self.analyze_into(package, scope, previous);
        self.current_scope = previous;
        if let Err(err) = &result {
            // Nothing was imported into the caller; forget the partial scope.
            self.package_scopes.remove(package);
            tracing::debug!(package, error = %err, "package analysis failed");
        }
        result.map(Analysis::Analyzed)
    }

    fn analyze_into(&mut self, package: &str, scope: ScopeId, previous: ScopeId) -> Result<PackageDef, CoreError> {
        let path = search_include_path(&self.config, package)?;
        let tree = self.parser.parse_package(package, &path)?;
        self.package_scopes.insert(package.to_string(), scope);

        self.traverse(&tree)?;
        self.context.import(&self.scopes, scope, &self.decls)?;

        self.scopes.import(previous, scope, self.config.import_policy)?;
        tracing::debug!(package, bindings = self.scopes.get(scope).binding_list().len(), "package analyzed");
        Ok(tree)
    }

    fn traverse(&mut self, tree: &PackageDef) -> Result<(), CoreError> {
        for item in &tree.items {
            match item {
                PackageItem::Import { package, .. } => {
                    self.analyze_package(package)?;
                }
                PackageItem::Declaration { spec, .. } => {
                    self.declare(spec);
                }
            }
        }
        Ok(())
    }

    /// Allocate a parsed declaration and make it visible in the current scope.
    ///
    /// Type synonyms go to the symbol tables only; they are resolved through
    /// [`Analyzer::dereference_type`] rather than bound.
    pub fn declare(&mut self, spec: &DeclSpec) -> DeclId {
        let id = self.decls.alloc_spec(spec);
        if self.decls.get(id).is_type_synonym() {
            self.context.define_synonym(&self.decls, id);
        } else {
            self.scopes.bind(self.current_scope, spec.name.clone(), id);
        }
        id
    }

    /// Index the current scope's bindings into the symbol tables.
    ///
    /// Package analysis does this itself; callers that declare into a block or
    /// the session scope directly use it to make those types visible.
    pub fn index_scope(&mut self) -> Result<(), CoreError> {
        self.context.import(&self.scopes, self.current_scope, &self.decls)
    }

    pub fn bind(&mut self, name: impl Into<String>, decl: DeclId) {
        self.scopes.bind(self.current_scope, name, decl);
    }

    pub fn lookup(&self, name: &str) -> Option<DeclId> {
        self.scopes.lookup(self.current_scope, name)
    }

    pub fn enter_scope(&mut self, name: impl Into<String>) -> ScopeId {
        let scope = self.scopes.alloc(name, Some(self.current_scope));
        self.current_scope = scope;
        scope
    }

    pub fn leave_scope(&mut self) -> Result<ScopeId, CoreError> {
        let parent = self
            .scopes
            .get(self.current_scope)
            .parent()
            .ok_or(CoreError::ScopeUnderflow)?;
        self.current_scope = parent;
        Ok(parent)
    }

    /// Add `Function1 .. Function{limit-1}` type constructors, each taking that
    /// many type-variable parameters. Runs at most once per session.
    pub fn install_function_constructors(&mut self) {
        if self.function_constructors {
            return;
        }
        self.function_constructors = true;
        for arity in 1..self.config.function_arity_limit {
            let name = format!("Function{arity}");
            let params = (0..arity).map(|p| BsvType::var(format!("a{p}"))).collect();
            let bsvtype = BsvType::applied(name.clone(), params);
            tracing::trace!(constructor = %name, "adding constructor");
            let id = self
                .decls
                .alloc(Declaration::new(name.clone(), bsvtype, BindingKind::Global));
            self.context.add_type_declaration(name, id);
        }
    }

    /// Expand arity-0 type synonyms until a non-synonym type is reached.
    ///
    /// Type variables and numeric types are returned unchanged. Synonym chains
    /// are assumed to be acyclic.
    pub fn dereference_type(&self, bsvtype: &TypeRef) -> Result<TypeRef, CoreError> {
        if bsvtype.is_var || bsvtype.is_numeric {
            return Ok(bsvtype.clone());
        }
        let Some(id) = self.context.declaration(&bsvtype.name) else {
            return Ok(bsvtype.clone());
        };
        let decl = self.decls.get(id);
        match &decl.kind {
            DeclarationKind::TypeSynonym { typedef_type } => {
                tracing::debug!(name = %bsvtype.name, arity = bsvtype.arity(), "dereferencing type");
                if !typedef_type.params.is_empty() {
                    return Err(CoreError::SynonymArity {
                        name: decl.name.clone(),
                        arity: typedef_type.params.len(),
                    });
                }
                self.dereference_type(&decl.bsvtype)
            }
            _ => Ok(bsvtype.clone()),
        }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    pub fn decls(&self) -> &Declarations {
        &self.decls
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    pub fn context(&self) -> &PackageContext {
        &self.context
    }

    pub fn current_scope(&self) -> ScopeId {
        self.current_scope
    }

    pub fn package_scope(&self, package: &str) -> Option<ScopeId> {
        self.package_scopes.get(package).copied()
    }

    pub fn is_analyzed(&self, package: &str) -> bool {
        self.package_scopes.contains_key(package)
    }
}
