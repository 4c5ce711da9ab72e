#![cfg(feature = "z3")]

mod common;

use bsv_ast::{BsvType, DeclSpec, sized};
use bsv_core::{Analyzer, CheckerConfig};
use bsv_verify::{BUILTIN_CONSTRUCTORS, TypeUniverse, VerifyError, predicate_name};
use z3::ast::{Bool, Dynamic};
use z3::{Config, Context, SatResult, Solver};

use common::Sources;

fn analyzer_with(specs: &[DeclSpec], config: CheckerConfig) -> Analyzer<impl bsv_core::PackageParser> {
    let sources = Sources::new();
    let mut analyzer = Analyzer::new(config, sources.parser());
    for spec in specs {
        analyzer.declare(spec);
    }
    analyzer.index_scope().expect("index declarations");
    analyzer
}

fn abc() -> Vec<DeclSpec> {
    ["A", "B", "C"]
        .into_iter()
        .map(|n| DeclSpec::structure(n, BsvType::named(n), vec![("f", sized("Bit", 1))]))
        .collect()
}

/// `Some(b)` when the solver proves `claim == b`.
fn decide(ctx: &Context, claim: &Bool<'_>) -> Option<bool> {
    let solver = Solver::new(ctx);
    solver.assert(&claim.not());
    match solver.check() {
        SatResult::Unsat => return Some(true),
        SatResult::Unknown => return None,
        SatResult::Sat => {}
    }
    let solver = Solver::new(ctx);
    solver.assert(claim);
    match solver.check() {
        SatResult::Unsat => Some(false),
        _ => None,
    }
}

#[test]
fn user_constructors_follow_definition_order() {
    let ctx = Context::new(&Config::new());
    let analyzer = analyzer_with(&abc(), CheckerConfig::default());
    let universe = TypeUniverse::build(&ctx, analyzer.context(), analyzer.decls()).expect("universe");

    let builtins = BUILTIN_CONSTRUCTORS.len();
    assert_eq!(universe.len(), builtins + 3);
    assert_eq!(universe.ordinal("Bozo"), Some(0));
    assert_eq!(universe.ordinal("A"), Some(builtins));
    assert_eq!(universe.ordinal("B"), Some(builtins + 1));
    assert_eq!(universe.ordinal("C"), Some(builtins + 2));
    assert_eq!(universe.arity("A"), Some(0));
    assert_eq!(universe.arity("Vector"), Some(2));
    assert_eq!(universe.arity("Module"), Some(1));
    assert_eq!(universe.arity("Numeric"), Some(1));
}

#[test]
fn each_recognizer_accepts_only_its_constructor() {
    let ctx = Context::new(&Config::new());
    let analyzer = analyzer_with(&abc(), CheckerConfig::default());
    let universe = TypeUniverse::build(&ctx, analyzer.context(), analyzer.decls()).expect("universe");

    let names = ["A", "B", "C"];
    let predicates: Vec<String> = names.iter().map(|n| predicate_name(n)).collect();
    assert_eq!(predicates, vec!["is_A", "is_B", "is_C"]);

    for value_ctor in names {
        let value = universe.apply(value_ctor, &[]).expect("apply");
        for test_ctor in names {
            let holds = decide(&ctx, &universe.recognize(test_ctor, &value).expect("recognize"));
            assert_eq!(holds, Some(value_ctor == test_ctor), "is_{test_ctor}({value_ctor})");
        }
    }
}

#[test]
fn recognizers_carry_their_predicate_names() {
    let ctx = Context::new(&Config::new());
    let analyzer = analyzer_with(&abc(), CheckerConfig::default());
    let universe = TypeUniverse::build(&ctx, analyzer.context(), analyzer.decls()).expect("universe");

    for name in universe.constructor_names() {
        let recognizer = universe.recognizer(name).expect("recognizer");
        assert_eq!(recognizer.name(), predicate_name(name));
        assert_eq!(recognizer.arity(), 1);
    }
    assert_eq!(universe.recognizer("A").map(|r| r.name()), Some("is_A".to_string()));
}

#[test]
fn parameterized_types_get_one_field_per_parameter() {
    let ctx = Context::new(&Config::new());
    let pair = BsvType::applied("Pair", vec![BsvType::var("a"), BsvType::var("b")]);
    let analyzer = analyzer_with(
        &[DeclSpec::structure(
            "Pair",
            pair,
            vec![("fst", BsvType::var("a")), ("snd", BsvType::var("b"))],
        )],
        CheckerConfig::default(),
    );
    let universe = TypeUniverse::build(&ctx, analyzer.context(), analyzer.decls()).expect("universe");
    assert_eq!(universe.arity("Pair"), Some(2));

    let boolean = universe.apply("Bool", &[]).expect("Bool");
    let err = universe.apply("Pair", &[boolean.clone()]).expect_err("arity mismatch");
    assert!(
        matches!(err, VerifyError::ArityMismatch { expected: 2, found: 1, .. }),
        "unexpected error: {err}"
    );
    let applied = universe.apply("Pair", &[boolean.clone(), boolean]).expect("apply Pair");
    assert_eq!(decide(&ctx, &universe.recognize("Pair", &applied).expect("recognize")), Some(true));
}

#[test]
fn unknown_constructor_is_an_error() {
    let ctx = Context::new(&Config::new());
    let analyzer = analyzer_with(&[], CheckerConfig::default());
    let universe = TypeUniverse::build(&ctx, analyzer.context(), analyzer.decls()).expect("universe");
    assert!(matches!(
        universe.apply("Missing", &[]),
        Err(VerifyError::UnknownConstructor { name }) if name == "Missing"
    ));
    let numeric = universe
        .apply("Numeric", &[Dynamic::from_ast(&z3::ast::Int::from_u64(&ctx, 8))])
        .expect("Numeric(8)");
    assert_eq!(decide(&ctx, &universe.recognize("Numeric", &numeric).expect("recognize")), Some(true));
}

#[test]
fn user_type_shadowing_a_builtin_is_rejected() {
    let ctx = Context::new(&Config::new());
    let analyzer = analyzer_with(
        &[DeclSpec::structure("Bit", BsvType::named("Bit"), vec![])],
        CheckerConfig::default(),
    );
    let err = TypeUniverse::build(&ctx, analyzer.context(), analyzer.decls())
        .err()
        .expect("expected duplicate constructor");
    assert!(matches!(err, VerifyError::DuplicateConstructor { name } if name == "Bit"));
}

#[test]
fn synthesized_function_constructors_take_their_arity() {
    let ctx = Context::new(&Config::new());
    let analyzer = analyzer_with(&[], CheckerConfig::default().with_function_constructors(20));
    let universe = TypeUniverse::build(&ctx, analyzer.context(), analyzer.decls()).expect("universe");
    assert_eq!(universe.user_type_count(), 19);
    assert_eq!(universe.arity("Function1"), Some(1));
    assert_eq!(universe.arity("Function19"), Some(19));
    assert_eq!(universe.arity("Function20"), None);
}
