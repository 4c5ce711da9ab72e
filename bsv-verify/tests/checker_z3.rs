#![cfg(feature = "z3")]

mod common;

use bsv_ast::{BsvType, DeclSpec, DeclarationKind, Node, NodeId, PackageBuilder, sized};
use bsv_core::{Analyzer, PackageParser};
use bsv_verify::{CheckResult, TypeChecker, VerifyError};
use z3::ast::{Ast, Bool};
use z3::{Config, Context, SatResult, Solver};

use common::Sources;

fn foo_imports_bar() -> Sources {
    Sources::new()
        .add(
            PackageBuilder::new("Bar", "Bar.bsv")
                .declare(DeclSpec::structure(
                    "Point",
                    BsvType::named("Point"),
                    vec![("x", sized("Int", 32)), ("y", sized("Int", 32))],
                ))
                .finish(),
        )
        .add(
            PackageBuilder::new("Foo", "Foo.bsv")
                .import("Bar")
                .declare(DeclSpec::synonym(BsvType::named("Word"), sized("Bit", 32)))
                .finish(),
        )
}

fn checker<'ctx>(ctx: &'ctx Context, sources: &Sources) -> TypeChecker<'ctx, impl PackageParser> {
    TypeChecker::new(ctx, Analyzer::new(sources.config(), sources.parser())).expect("checker")
}

fn node(id: u32, line: usize, text: &str) -> Node {
    Node::new(NodeId(id), "Foo.bsv", line).with_text(text)
}

#[test]
fn analyzing_a_package_extends_the_universe() {
    let ctx = Context::new(&Config::new());
    let sources = foo_imports_bar();
    let mut checker = checker(&ctx, &sources);
    assert_eq!(checker.universe().ordinal("Point"), None);

    checker.analyze_package("Foo").expect("analyze Foo");

    let point = checker.analyzer().lookup("Point").expect("Point imported");
    assert!(matches!(
        checker.analyzer().decls().get(point).kind,
        DeclarationKind::Struct { .. }
    ));
    assert!(checker.universe().constructor("Point").is_some());
    assert!(checker.universe().recognizer("Point").is_some());
    assert_eq!(checker.universe().arity("Point"), Some(0));
}

#[test]
fn conflicting_constraints_point_at_both_sources() {
    let ctx = Context::new(&Config::new());
    let sources = foo_imports_bar();
    let mut checker = checker(&ctx, &sources);
    checker.analyze_package("Foo").expect("analyze Foo");

    let x = checker.fresh_type_var("x");
    let bit32 = checker.type_expr(&sized("Bit", 32)).expect("Bit#(32)");
    let boolean = checker.type_expr(&BsvType::named("Bool")).expect("Bool");

    checker.add_constraint(&x._eq(&bit32), "assign", &node(1, 10, "x = 0"));
    checker.add_constraint(&x._eq(&boolean), "cond", &node(2, 14, "if (x)"));

    let report = checker.report();
    assert_eq!(report.result, CheckResult::Unsat);
    let mut locations = report.locations();
    locations.sort();
    assert_eq!(locations, vec!["Foo.bsv:10", "Foo.bsv:14"]);
    for diagnostic in &report.diagnostics {
        let tracker = diagnostic.tracker.as_deref().expect("tracker");
        assert_eq!(checker.tracker(tracker).map(Node::key), diagnostic.node);
    }
}

#[test]
fn consistent_constraints_are_sat() {
    let ctx = Context::new(&Config::new());
    let sources = foo_imports_bar();
    let mut checker = checker(&ctx, &sources);
    checker.analyze_package("Foo").expect("analyze Foo");

    let x = checker.fresh_type_var("x");
    let word = checker.type_expr(&BsvType::named("Word")).expect("Word");
    let bit32 = checker.type_expr(&sized("Bit", 32)).expect("Bit#(32)");
    assert_eq!(word.to_string(), bit32.to_string());

    checker.add_constraint(&x._eq(&word), "decl", &node(1, 3, "Word x"));
    checker.add_constraint(&x._eq(&bit32), "use", &node(2, 4, "x"));
    let report = checker.report();
    assert!(report.is_ok(), "unexpected diagnostics: {:?}", report.diagnostics);
}

#[test]
fn named_constants_are_stable_and_fresh_ones_are_not() {
    let ctx = Context::new(&Config::new());
    let sources = Sources::new();
    let mut checker = checker(&ctx, &sources);
    let sort = checker.universe().sort().clone();

    let a = checker.constant("t_decl", &sort);
    let b = checker.constant("t_decl", &sort);
    assert_eq!(a.to_string(), b.to_string());

    let f1 = checker.fresh_constant("t", &sort);
    let f2 = checker.fresh_constant("t", &sort);
    assert_ne!(f1.to_string(), f2.to_string());
    assert_ne!(checker.fresh_string("t"), checker.fresh_string("t"));
}

#[test]
fn or_exprs_folds_left_and_rejects_empty() {
    let ctx = Context::new(&Config::new());
    let sources = Sources::new();
    let checker = checker(&ctx, &sources);

    let e = Bool::new_const(&ctx, "e");
    let single = checker.or_exprs(&[e.clone()]).expect("single");
    assert_eq!(single.to_string(), e.to_string());

    assert!(matches!(checker.or_exprs(&[]), Err(VerifyError::EmptyDisjunction)));

    let unsat = Bool::from_bool(&ctx, false);
    let p = Bool::new_const(&ctx, "p");
    let either = checker.or_exprs(&[unsat.clone(), p.clone()]).expect("pair");
    let solver = Solver::new(&ctx);
    solver.assert(&either);
    assert_eq!(solver.check(), SatResult::Sat);

    let neither = checker.or_exprs(&[unsat.clone(), unsat]).expect("pair");
    let solver = Solver::new(&ctx);
    solver.assert(&neither);
    assert_eq!(solver.check(), SatResult::Unsat);
}

#[test]
fn recorded_expressions_are_found_by_node() {
    let ctx = Context::new(&Config::new());
    let sources = Sources::new();
    let mut checker = checker(&ctx, &sources);
    let n = node(7, 1, "a + b");
    let t = checker.fresh_type_var("expr");
    checker.insert_expr(&n, t.clone());
    assert_eq!(checker.expr(&n.key()).map(|e| e.to_string()), Some(t.to_string()));
    assert!(checker.expr(&node(8, 1, "c").key()).is_none());
}

#[test]
fn expressions_from_different_packages_do_not_collide() {
    let ctx = Context::new(&Config::new());
    let sources = Sources::new();
    let mut checker = checker(&ctx, &sources);
    let in_bar = Node::new(NodeId(0), "Bar.bsv", 4);
    let in_foo = Node::new(NodeId(0), "Foo.bsv", 9);
    let a = checker.fresh_type_var("a");
    let b = checker.fresh_type_var("b");
    checker.insert_expr(&in_bar, a.clone());
    checker.insert_expr(&in_foo, b.clone());
    assert_eq!(checker.expr(&in_bar.key()).map(|e| e.to_string()), Some(a.to_string()));
    assert_eq!(checker.expr(&in_foo.key()).map(|e| e.to_string()), Some(b.to_string()));
}

#[test]
fn conflicting_nodes_with_equal_ids_are_both_reported() {
    let ctx = Context::new(&Config::new());
    let sources = Sources::new();
    let mut checker = checker(&ctx, &sources);
    let x = checker.fresh_type_var("x");
    let bit8 = checker.type_expr(&sized("Bit", 8)).expect("Bit#(8)");
    let boolean = checker.type_expr(&BsvType::named("Bool")).expect("Bool");

    checker.add_constraint(&x._eq(&bit8), "bar", &Node::new(NodeId(0), "Bar.bsv", 4));
    checker.add_constraint(&x._eq(&boolean), "foo", &Node::new(NodeId(0), "Foo.bsv", 9));

    let report = checker.report();
    assert_eq!(report.result, CheckResult::Unsat);
    let mut locations = report.locations();
    locations.sort();
    assert_eq!(locations, vec!["Bar.bsv:4", "Foo.bsv:9"]);
}

#[test]
fn boolean_operators_force_bool_results() {
    let ctx = Context::new(&Config::new());
    let sources = Sources::new();
    let mut checker = checker(&ctx, &sources);
    let result = checker.fresh_type_var("cmp");

    let constraint = checker
        .operator_result_constraint("<=", &result)
        .expect("constraint")
        .expect("<= is boolean");
    assert!(checker.operator_result_constraint("+", &result).expect("constraint").is_none());

    let bit8 = checker.type_expr(&sized("Bit", 8)).expect("Bit#(8)");
    checker.add_constraint(&constraint, "op", &node(1, 5, "a <= b"));
    checker.add_constraint(&result._eq(&bit8), "use", &node(2, 6, "c = a <= b"));
    assert_eq!(checker.check(), CheckResult::Unsat);
}

#[test]
fn rebuilding_the_universe_drops_trackers() {
    let ctx = Context::new(&Config::new());
    let sources = foo_imports_bar();
    let mut checker = checker(&ctx, &sources);

    let x = checker.fresh_type_var("x");
    let boolean = checker.type_expr(&BsvType::named("Bool")).expect("Bool");
    let tracker = checker.add_constraint(&x._eq(&boolean), "pre", &node(1, 1, "x"));
    assert!(checker.tracker(&tracker).is_some());

    checker.analyze_package("Foo").expect("analyze Foo");
    assert!(checker.tracker(&tracker).is_none());
    assert_eq!(checker.check(), CheckResult::Sat);
}

#[test]
fn type_variables_never_become_constructors() {
    let ctx = Context::new(&Config::new());
    let sources = Sources::new();
    let checker = checker(&ctx, &sources);
    let reg = checker
        .type_expr(&BsvType::applied("Reg", vec![BsvType::var("Bit")]))
        .expect("Reg#(Bit)");
    assert_eq!(reg.to_string(), "(Reg Bit)");
    assert_eq!(reg.decl().name(), "Reg");

    let arg = reg.nth_child(0).expect("Reg argument");
    assert_eq!(arg.num_children(), 0);
    assert_eq!(arg.decl().arity(), 0);
    assert_eq!(arg.get_sort(), *checker.universe().sort());
    assert_eq!(checker.universe().arity("Bit"), Some(1));
    let var = checker.constant("Bit", checker.universe().sort());
    assert_eq!(arg, var);
    let err = checker.type_expr(&BsvType::named("Nope")).expect_err("unknown type");
    assert!(matches!(err, VerifyError::UnknownConstructor { .. }));
}
