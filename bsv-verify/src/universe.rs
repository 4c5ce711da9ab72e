#![forbid(unsafe_code)]

//! The BSV type universe as a single Z3 algebraic datatype.
//!
//! Built-in type formers come first, in a fixed order, followed by one
//! constructor per user type in package-context order. The datatype is
//! rebuilt from scratch whenever the set of user types changes.

use std::collections::HashMap;

use bsv_ast::Declarations;
use bsv_core::PackageContext;
use z3::ast::{Ast, Bool, Dynamic};
use z3::{Context, DatatypeAccessor, DatatypeBuilder, FuncDecl, RecFuncDecl, Sort};

use crate::error::VerifyError;

pub const SORT_NAME: &str = "BSVType";

/// Built-in constructors in ordinal order.
pub const BUILTIN_CONSTRUCTORS: [&str; 17] = [
    "Bozo",
    "Action",
    "ActionValue",
    "Bit",
    "Bool",
    "Function",
    "Int",
    "Module",
    "Integer",
    "Real",
    "Reg",
    "Rule",
    "String",
    "UInt",
    "Vector",
    "Void",
    "Numeric",
];

pub fn predicate_name(constructor: &str) -> String {
    format!("is_{constructor}")
}

pub struct TypeUniverse<'ctx> {
    sort: Sort<'ctx>,
    ordinals: Vec<String>,
    constructors: HashMap<String, FuncDecl<'ctx>>,
    /// `is_<Name>`, each defined as the datatype's own tester.
    recognizers: HashMap<String, RecFuncDecl<'ctx>>,
}

impl<'ctx> TypeUniverse<'ctx> {
    pub fn build(
        ctx: &'ctx Context,
        context: &PackageContext,
        decls: &Declarations,
    ) -> Result<Self, VerifyError> {
        let this = || DatatypeAccessor::Datatype(SORT_NAME.into());

        // `Module` carries only its interface type.
        let mut builder = DatatypeBuilder::new(ctx, SORT_NAME)
            .variant("Bozo", vec![])
            .variant("Action", vec![])
            .variant("ActionValue", vec![("elt", this())])
            .variant("Bit", vec![("width", this())])
            .variant("Bool", vec![])
            .variant("Function", vec![("domain", this()), ("range", this())])
            .variant("Int", vec![("width", this())])
            .variant("Module", vec![("interface", this())])
            .variant("Integer", vec![])
            .variant("Real", vec![])
            .variant("Reg", vec![("elt", this())])
            .variant("Rule", vec![])
            .variant("String", vec![])
            .variant("UInt", vec![("width", this())])
            .variant("Vector", vec![("size", this()), ("elt_type", this())])
            .variant("Void", vec![])
            .variant("Numeric", vec![("elt", DatatypeAccessor::Sort(Sort::int(ctx)))]);

        let mut ordinals: Vec<String> = BUILTIN_CONSTRUCTORS.iter().map(|s| s.to_string()).collect();
        for &id in context.type_declarations() {
            let decl = decls.get(id);
            if ordinals.iter().any(|n| *n == decl.name) {
                return Err(VerifyError::DuplicateConstructor {
                    name: decl.name.clone(),
                });
            }
            let params = &decl.bsvtype.params;
            tracing::debug!(
                name = %decl.name,
                predicate = %predicate_name(&decl.name),
                arity = params.len(),
                "user defined type"
            );
            // Parameter sorts are not resolved yet; every field is a BSVType.
            let fields = params
                .iter()
                .map(|p| (p.name.as_str(), this()))
                .collect();
            builder = builder.variant(&decl.name, fields);
            ordinals.push(decl.name.clone());
        }

        let datatype = builder.finish();
        let sort = datatype.sort;
        let boolean = Sort::bool(ctx);
        let mut constructors = HashMap::with_capacity(ordinals.len());
        let mut recognizers = HashMap::with_capacity(ordinals.len());
        for (name, variant) in ordinals.iter().zip(datatype.variants) {
            let predicate = RecFuncDecl::new(ctx, predicate_name(name), &[&sort], &boolean);
            let t = FuncDecl::new(ctx, "t", &[], &sort).apply(&[]);
            let arg: &dyn Ast<'ctx> = &t;
            predicate.add_def(&[arg], &variant.tester.apply(&[arg]));
            constructors.insert(name.clone(), variant.constructor);
            recognizers.insert(name.clone(), predicate);
        }

        Ok(Self {
            sort,
            ordinals,
            constructors,
            recognizers,
        })
    }

    pub fn sort(&self) -> &Sort<'ctx> {
        &self.sort
    }

    /// Constructor names by ordinal.
    pub fn constructor_names(&self) -> &[String] {
        &self.ordinals
    }

    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.ordinals.iter().position(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.ordinals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordinals.is_empty()
    }

    pub fn user_type_count(&self) -> usize {
        self.ordinals.len() - BUILTIN_CONSTRUCTORS.len()
    }

    pub fn constructor(&self, name: &str) -> Option<&FuncDecl<'ctx>> {
        self.constructors.get(name)
    }

    pub fn recognizer(&self, name: &str) -> Option<&FuncDecl<'ctx>> {
        self.recognizers.get(name).map(|r| &**r)
    }

    pub fn arity(&self, name: &str) -> Option<usize> {
        self.constructor(name).map(FuncDecl::arity)
    }

    /// `name(args...)`, checking the constructor exists and the argument count.
    pub fn apply(&self, name: &str, args: &[Dynamic<'ctx>]) -> Result<Dynamic<'ctx>, VerifyError> {
        let constructor = self
            .constructor(name)
            .ok_or_else(|| VerifyError::UnknownConstructor { name: name.to_string() })?;
        if constructor.arity() != args.len() {
            return Err(VerifyError::ArityMismatch {
                name: name.to_string(),
                expected: constructor.arity(),
                found: args.len(),
            });
        }
        let refs: Vec<&dyn Ast<'ctx>> = args.iter().map(|a| a as &dyn Ast<'ctx>).collect();
        Ok(constructor.apply(&refs))
    }

    /// `is_<name>(value)`.
    pub fn recognize(&self, name: &str, value: &Dynamic<'ctx>) -> Result<Bool<'ctx>, VerifyError> {
        let recognizer = self
            .recognizer(name)
            .ok_or_else(|| VerifyError::UnknownConstructor { name: name.to_string() })?;
        let applied = recognizer.apply(&[value as &dyn Ast<'ctx>]);
        applied.as_bool().ok_or_else(|| VerifyError::NotBoolean {
            expr: applied.to_string(),
        })
    }
}
