#![forbid(unsafe_code)]

use std::collections::HashMap;

use bsv_ast::{Node, NodeKey, TypeRef};
use bsv_core::{Analysis, Analyzer, PackageParser};
use z3::ast::{Ast, Bool, Dynamic, Int};
use z3::{Context, FuncDecl, Params, SatResult, Solver, Sort, Symbol};

use crate::error::VerifyError;
use crate::names::FreshNames;
use crate::operators::boolean_operator_table;
use crate::report::{CheckReport, CheckResult};
use crate::universe::TypeUniverse;

/// A type-checking session: name resolution plus the solver, its type universe
/// and the bookkeeping that maps unsat cores back to source nodes.
///
/// Constraints are only valid for the universe they were built against. When
/// analyzing a package adds user types the universe is rebuilt and every
/// assertion, tracker and recorded expression is dropped.
pub struct TypeChecker<'ctx, P> {
    ctx: &'ctx Context,
    analyzer: Analyzer<P>,
    solver: Solver<'ctx>,
    universe: TypeUniverse<'ctx>,
    names: FreshNames,
    exprs: HashMap<NodeKey, Dynamic<'ctx>>,
    trackers: HashMap<String, Node>,
    boolops: HashMap<String, bool>,
}

impl<'ctx, P: PackageParser> TypeChecker<'ctx, P> {
    pub fn new(ctx: &'ctx Context, analyzer: Analyzer<P>) -> Result<Self, VerifyError> {
        let universe = TypeUniverse::build(ctx, analyzer.context(), analyzer.decls())?;
        let solver = Solver::new(ctx);
        let mut checker = Self {
            ctx,
            analyzer,
            solver,
            universe,
            names: FreshNames::new(),
            exprs: HashMap::new(),
            trackers: HashMap::new(),
            boolops: boolean_operator_table(),
        };
        checker.configure_solver();
        Ok(checker)
    }

    fn configure_solver(&mut self) {
        let mut params = Params::new(self.ctx);
        params.set_bool("unsat_core", true);
        self.solver.set_params(&params);
    }

    /// Analyze a package and rebuild the universe if it brought new user types.
    pub fn analyze_package(&mut self, package: &str) -> Result<Analysis, VerifyError> {
        let analysis = self.analyzer.analyze_package(package)?;
        if self.analyzer.context().type_declarations().len() != self.universe.user_type_count() {
            self.rebuild_universe()?;
        }
        Ok(analysis)
    }

    /// Discard the solver state and build a fresh universe from the current context.
    pub fn rebuild_universe(&mut self) -> Result<(), VerifyError> {
        self.exprs.clear();
        self.trackers.clear();
        self.solver.reset();
        self.configure_solver();
        self.universe = TypeUniverse::build(self.ctx, self.analyzer.context(), self.analyzer.decls())?;
        self.boolops = boolean_operator_table();
        tracing::debug!(constructors = self.universe.len(), "type universe rebuilt");
        Ok(())
    }

    pub fn fresh_string(&mut self, prefix: &str) -> String {
        self.names.fresh_string(prefix)
    }

    pub fn fresh_name(&mut self, prefix: &str) -> Symbol {
        Symbol::String(self.names.fresh_string(prefix))
    }

    /// A new constant with a session-unique name.
    pub fn fresh_constant(&mut self, prefix: &str, sort: &Sort<'ctx>) -> Dynamic<'ctx> {
        let name = self.fresh_name(prefix);
        FuncDecl::new(self.ctx, name, &[], sort).apply(&[])
    }

    /// The constant called exactly `name`; the same name always yields the same term.
    pub fn constant(&self, name: &str, sort: &Sort<'ctx>) -> Dynamic<'ctx> {
        FuncDecl::new(self.ctx, name, &[], sort).apply(&[])
    }

    /// Fresh type variable of the universe sort.
    pub fn fresh_type_var(&mut self, prefix: &str) -> Dynamic<'ctx> {
        let sort = self.universe.sort().clone();
        self.fresh_constant(prefix, &sort)
    }

    pub fn insert_expr(&mut self, node: &Node, expr: Dynamic<'ctx>) {
        tracing::trace!(node = %node.text, expr = %expr, "insert expr");
        self.exprs.insert(node.key(), expr);
    }

    pub fn expr(&self, node: &NodeKey) -> Option<&Dynamic<'ctx>> {
        self.exprs.get(node)
    }

    /// Assert `constraint` under a fresh tracker so an unsat core can point back at `node`.
    pub fn add_constraint(&mut self, constraint: &Bool<'ctx>, tracker_prefix: &str, node: &Node) -> String {
        let tracker = self.names.fresh_string(tracker_prefix);
        tracing::trace!(tracker = %tracker, node = %node.text, "insert tracker");
        self.solver
            .assert_and_track(constraint, &Bool::new_const(self.ctx, tracker.as_str()));
        self.trackers.insert(tracker.clone(), node.clone());
        tracker
    }

    pub fn tracker(&self, name: &str) -> Option<&Node> {
        self.trackers.get(name)
    }

    /// Left-to-right disjunction; at least one expression is required.
    pub fn or_exprs(&self, exprs: &[Bool<'ctx>]) -> Result<Bool<'ctx>, VerifyError> {
        let (first, rest) = exprs.split_first().ok_or(VerifyError::EmptyDisjunction)?;
        Ok(rest
            .iter()
            .fold(first.clone(), |acc, e| Bool::or(self.ctx, &[&acc, e])))
    }

    pub fn dereference_type(&self, bsvtype: &TypeRef) -> Result<TypeRef, VerifyError> {
        Ok(self.analyzer.dereference_type(bsvtype)?)
    }

    /// Encode a BSV type as a term of the universe sort.
    ///
    /// Type variables become named constants, numeric literals become
    /// `Numeric(n)`, everything else a constructor application.
    pub fn type_expr(&self, bsvtype: &TypeRef) -> Result<Dynamic<'ctx>, VerifyError> {
        let bsvtype = self.dereference_type(bsvtype)?;
        if bsvtype.is_var {
            return Ok(self.constant(&bsvtype.name, self.universe.sort()));
        }
        if bsvtype.is_numeric {
            return match bsvtype.numeric_value() {
                Some(n) => self
                    .universe
                    .apply("Numeric", &[Dynamic::from_ast(&Int::from_u64(self.ctx, n))]),
                None => Ok(self.constant(&bsvtype.name, self.universe.sort())),
            };
        }
        let params = bsvtype
            .params
            .iter()
            .map(|p| self.type_expr(p))
            .collect::<Result<Vec<_>, _>>()?;
        self.universe.apply(&bsvtype.name, &params)
    }

    /// For a boolean-valued operator, the constraint that `result_type` is `Bool`.
    pub fn operator_result_constraint(
        &self,
        op: &str,
        result_type: &Dynamic<'ctx>,
    ) -> Result<Option<Bool<'ctx>>, VerifyError> {
        if !self.boolops.get(op).copied().unwrap_or(false) {
            return Ok(None);
        }
        let boolean = self.universe.apply("Bool", &[])?;
        Ok(Some(result_type._eq(&boolean)))
    }

    pub fn check(&self) -> CheckResult {
        match self.solver.check() {
            SatResult::Unsat => CheckResult::Unsat,
            SatResult::Sat => CheckResult::Sat,
            SatResult::Unknown => CheckResult::Unknown,
        }
    }

    /// Check and turn the outcome into user-facing diagnostics.
    pub fn report(&self) -> CheckReport {
        match self.check() {
            CheckResult::Sat => CheckReport::sat(),
            CheckResult::Unknown => CheckReport::unknown(self.solver.get_reason_unknown()),
            CheckResult::Unsat => {
                let core: Vec<String> = self
                    .solver
                    .get_unsat_core()
                    .iter()
                    .map(|b| b.decl().name())
                    .collect();
                CheckReport::from_unsat_core(&core, &self.trackers)
            }
        }
    }

    pub fn ctx(&self) -> &'ctx Context {
        self.ctx
    }

    pub fn universe(&self) -> &TypeUniverse<'ctx> {
        &self.universe
    }

    pub fn analyzer(&self) -> &Analyzer<P> {
        &self.analyzer
    }

    pub fn analyzer_mut(&mut self) -> &mut Analyzer<P> {
        &mut self.analyzer
    }

    pub fn solver(&self) -> &Solver<'ctx> {
        &self.solver
    }
}
