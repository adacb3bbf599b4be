//! End-to-end compilation tests over small theories.

use std::str::FromStr;

use typelogic_ir::{
    Arg, GroupKind, PredicateDefinition, Sentence, SentenceGroup, Term, Theory, TypeDef, Variable,
};

use crate::import::verify_round_trip;
use crate::{compile, compiler_for, Format};

fn link(a: Arg, b: Arg) -> Term {
    Term::new("Link", vec![a, b])
}

fn path(a: Arg, b: Arg) -> Term {
    Term::new("Path", vec![a, b])
}

/// Reachability theory: one-hop rule, transitivity, two links.
fn paths_theory() -> Theory {
    let mut theory = Theory::new("paths");
    theory
        .declare_predicate(PredicateDefinition::new(
            "Link",
            vec![("source", "str"), ("target", "str")],
        ))
        .unwrap();
    theory
        .declare_predicate(PredicateDefinition::new(
            "Path",
            vec![("source", "str"), ("target", "str")],
        ))
        .unwrap();
    theory.add_group(SentenceGroup::new(
        "paths",
        vec![
            Sentence::forall(
                vec![Variable::new("x"), Variable::new("y")],
                Sentence::implies(
                    link(Arg::var("x"), Arg::var("y")).into(),
                    path(Arg::var("x"), Arg::var("y")).into(),
                ),
            ),
            Sentence::forall(
                vec![Variable::new("x"), Variable::new("y"), Variable::new("z")],
                Sentence::implies(
                    Sentence::and(vec![
                        path(Arg::var("x"), Arg::var("y")).into(),
                        path(Arg::var("y"), Arg::var("z")).into(),
                    ]),
                    path(Arg::var("x"), Arg::var("z")).into(),
                ),
            ),
        ],
    ));
    theory
        .add_fact(link(Arg::str("CA"), Arg::str("OR")))
        .unwrap();
    theory
        .add_fact(link(Arg::str("OR"), Arg::str("WA")))
        .unwrap();
    theory
}

#[test]
fn test_prolog_one_hop_rule_and_fact() {
    let text = compile(&paths_theory(), Format::Prolog).unwrap();
    assert!(text.contains("path(X, Y) :- link(X, Y)."), "{}", text);
    assert!(text.contains("link('CA', 'OR')."), "{}", text);
}

#[test]
fn test_prolog_transitivity_clause() {
    let text = compile(&paths_theory(), Format::Prolog).unwrap();
    assert!(
        text.contains("path(X, Z) :- path(X, Y), path(Y, Z)."),
        "{}",
        text
    );
}

#[test]
fn test_prolog_query_synthesis() {
    let text = compile(&paths_theory(), Format::Prolog).unwrap();
    // Path feeds no other rule body through anything but itself... it does
    // occur in the transitivity body, so only predicates nothing depends
    // on are queried.
    assert!(!text.contains("query(link"), "{}", text);

    let mut theory = paths_theory();
    theory.groups[0].sentences.truncate(1);
    let text = compile(&theory, Format::Prolog).unwrap();
    assert!(text.contains("query(path(Source, Target))."), "{}", text);
    assert!(!text.contains("query(link"), "{}", text);

    theory.annotate(crate::export::prolog::NO_QUERIES, "true");
    let text = compile(&theory, Format::Prolog).unwrap();
    assert!(!text.contains("query("), "{}", text);
}

#[test]
fn test_prolog_group_headers_and_definitions() {
    let text = compile(&paths_theory(), Format::Prolog).unwrap();
    assert!(text.starts_with("%% Predicate Definitions"), "{}", text);
    assert!(text.contains("% Link(source: str, target: str)"), "{}", text);
    assert!(text.contains("\n%% paths"), "{}", text);
}

#[test]
fn test_souffle_declarations_and_clauses() {
    let mut theory = paths_theory();
    theory.declare_type("ID", TypeDef::primitive("str")).unwrap();
    let text = compile(&theory, Format::Souffle).unwrap();
    assert!(text.contains(".type ID = symbol"), "{}", text);
    assert!(
        text.contains(".decl Link(source: symbol, target: symbol)"),
        "{}",
        text
    );
    assert!(text.contains("Path(x, y) :- Link(x, y)."), "{}", text);
    assert!(text.contains("Link(\"CA\", \"OR\")."), "{}", text);
}

#[test]
fn test_souffle_union_type() {
    let mut theory = Theory::new("t");
    theory
        .declare_type("Key", TypeDef::union(vec!["str", "int"]))
        .unwrap();
    let text = compile(&theory, Format::Souffle).unwrap();
    assert!(text.contains(".type Key = symbol | number"), "{}", text);
}

#[test]
fn test_souffle_unknown_type_is_diagnosed() {
    let mut theory = Theory::new("t");
    theory
        .declare_predicate(PredicateDefinition::new("Owns", vec![("who", "Person")]))
        .unwrap();
    let result = compiler_for(Format::Souffle).emit(&theory).unwrap();
    assert!(!result.text.contains(".decl Owns"), "{}", result.text);
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.message.contains("Unknown type Person")));
}

#[test]
fn test_negation_rendering_prolog_and_souffle() {
    let mut theory = Theory::new("t");
    theory.add(Sentence::forall(
        vec![Variable::new("x")],
        Sentence::implies(
            Sentence::and(vec![
                Term::new("q", vec![Arg::var("x")]).into(),
                Sentence::negate(Term::new("p", vec![Arg::var("x")]).into()),
            ]),
            Term::new("r", vec![Arg::var("x")]).into(),
        ),
    ));
    let prolog = compile(&theory, Format::Prolog).unwrap();
    assert!(prolog.contains(r"r(X) :- q(X), \+ (p(X))."), "{}", prolog);
    let souffle = compile(&theory, Format::Souffle).unwrap();
    assert!(souffle.contains("r(x) :- q(x), !p(x)."), "{}", souffle);
}

#[test]
fn test_souffle_stratification_drop() {
    let mut theory = Theory::new("t");
    theory.add(Sentence::implies(
        Sentence::negate(Term::atom("q").into()),
        Term::atom("p").into(),
    ));
    theory.add(Sentence::implies(
        Term::atom("p").into(),
        Term::atom("q").into(),
    ));
    let result = compiler_for(Format::Souffle).emit(&theory).unwrap();
    assert!(!result.text.contains("p :- !q"), "{}", result.text);
    assert!(result.text.contains("q :- p."), "{}", result.text);
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.message.contains("stratifiable")));
}

fn stage_theory() -> Theory {
    let high: Sentence = Term::new("ge", vec![Arg::var("v"), Arg::int(90)]).into();
    let mid: Sentence = Term::new("ge", vec![Arg::var("v"), Arg::int(60)]).into();
    let mut theory = Theory::new("stages");
    theory.add(Sentence::forall(
        vec![Variable::new("v")],
        Sentence::implies(
            Term::new("Score", vec![Arg::var("v")]).into(),
            Sentence::and(vec![
                Sentence::implies(high.clone(), Term::new("Stage1", vec![Arg::var("v")]).into()),
                Sentence::implies(
                    Sentence::negate(high),
                    Sentence::and(vec![
                        Sentence::implies(
                            mid.clone(),
                            Term::new("Stage2", vec![Arg::var("v")]).into(),
                        ),
                        Sentence::implies(
                            Sentence::negate(mid),
                            Term::new("Stage3", vec![Arg::var("v")]).into(),
                        ),
                    ]),
                ),
            ]),
        ),
    ));
    theory
}

#[test]
fn test_conditional_chain_prolog_text() {
    let text = compile(&stage_theory(), Format::Prolog).unwrap();
    assert!(text.contains("stage1(V) :- score(V), V >= 90."), "{}", text);
    assert!(
        text.contains(r"stage2(V) :- score(V), V >= 60, \+ (V >= 90)."),
        "{}",
        text
    );
    assert!(
        text.contains(r"stage3(V) :- score(V), \+ (V >= 60), \+ (V >= 90)."),
        "{}",
        text
    );
}

#[test]
fn test_problog_probabilistic_rule() {
    let mut theory = Theory::new("coins");
    theory
        .declare_predicate(PredicateDefinition::new("Coin", vec![("c", "str")]))
        .unwrap();
    theory
        .declare_predicate(PredicateDefinition::new("Heads", vec![("c", "str")]))
        .unwrap();
    theory.add(Sentence::probability(
        0.4,
        Sentence::forall(
            vec![Variable::new("c")],
            Sentence::implies(
                Term::new("Coin", vec![Arg::var("c")]).into(),
                Term::new("Heads", vec![Arg::var("c")]).into(),
            ),
        ),
    ));
    let text = compile(&theory, Format::Problog).unwrap();
    assert!(text.contains("0.4::heads(C) :- coin(C)."), "{}", text);
    assert!(text.contains("query(coin(C))."), "{}", text);
    assert!(text.contains("query(heads(C))."), "{}", text);
}

#[test]
fn test_problog_probability_fact_and_evidence() {
    let mut theory = Theory::new("alarm");
    theory.add(Sentence::probability(0.5, Term::atom("Burglary").into()));
    theory.add(Sentence::evidence(true, Term::atom("Alarm").into()));
    theory.add(Sentence::evidence(
        false,
        Term::new("Calls", vec![Arg::str("mary")]).into(),
    ));
    let text = compile(&theory, Format::Problog).unwrap();
    assert!(text.contains("0.5::burglary."), "{}", text);
    assert!(text.contains("evidence(alarm, true)."), "{}", text);
    assert!(text.contains("evidence(calls(\"mary\"), false)."), "{}", text);
}

#[test]
fn test_problog_strings_double_quoted() {
    let mut theory = Theory::new("t");
    theory
        .add_fact(Term::new("Knows", vec![Arg::str("ann"), Arg::str("bob")]))
        .unwrap();
    let text = compile(&theory, Format::Problog).unwrap();
    assert!(text.contains("knows(\"ann\", \"bob\")."), "{}", text);
}

fn prover_theory() -> Theory {
    let mut theory = paths_theory();
    theory.add_group(
        SentenceGroup::new(
            "reachable",
            vec![Sentence::exists(
                vec![Variable::new("z")],
                path(Arg::str("CA"), Arg::var("z")).into(),
            )],
        )
        .with_kind(GroupKind::Goal),
    );
    theory
}

#[test]
fn test_tptp_axioms_and_conjecture() {
    let text = compile(&prover_theory(), Format::Tptp).unwrap();
    assert!(text.starts_with("% Problem: paths"), "{}", text);
    assert!(
        text.contains("fof(axiom1, axiom, ! [X, Y] : (link(X, Y) => path(X, Y)))."),
        "{}",
        text
    );
    assert!(
        text.contains("fof(goal1, conjecture, ? [Z] : path('CA', Z))."),
        "{}",
        text
    );
    // ground facts ride along as axioms
    assert!(text.contains("link('CA', 'OR')"), "{}", text);
}

#[test]
fn test_tptp_quantifiers_never_stripped() {
    let text = compile(&prover_theory(), Format::Tptp).unwrap();
    assert!(
        text.contains("! [X, Y, Z] : ((path(X, Y) & path(Y, Z)) => path(X, Z))"),
        "{}",
        text
    );
}

#[test]
fn test_prover9_partitions_and_symbols() {
    let mut theory = prover_theory();
    theory
        .add_fact(Term::new(
            "Weight",
            vec![Arg::str("granny smith"), Arg::float(0.9)],
        ))
        .unwrap();
    let text = compile(&theory, Format::Prover9).unwrap();
    let assumptions = text.split("formulas(goals).").next().unwrap();
    assert!(text.contains("formulas(assumptions)."), "{}", text);
    assert!(
        assumptions.contains("all x y ((Link(x, y) -> Path(x, y)))."),
        "{}",
        text
    );
    assert!(
        assumptions.contains("Weight(s_granny_smith, rational(9,10))."),
        "{}",
        text
    );
    let goals = text.split("formulas(goals).").nth(1).unwrap();
    assert!(goals.contains("exists z (Path(s_CA, z))."), "{}", text);
}

#[test]
fn test_probability_skipped_outside_problog() {
    let mut theory = Theory::new("t");
    theory.add(Sentence::probability(0.5, Term::atom("P").into()));
    for format in [Format::Prolog, Format::Souffle, Format::Tptp, Format::Prover9] {
        let result = compiler_for(format).emit(&theory).unwrap();
        assert!(
            result
                .diagnostics
                .iter()
                .any(|d| d.message.contains("annotation")),
            "{:?} accepted a probabilistic sentence",
            format
        );
    }
}

#[test]
fn test_parent_axioms_flow_into_prolog() {
    let mut theory = Theory::new("t");
    theory
        .declare_predicate(PredicateDefinition::new("Thing", vec![("name", "str")]))
        .unwrap();
    theory
        .declare_predicate(
            PredicateDefinition::new("Person", vec![("name", "str")]).with_parents(vec!["Thing"]),
        )
        .unwrap();
    let text = compile(&theory, Format::Prolog).unwrap();
    assert!(text.contains("%% inferred"), "{}", text);
    assert!(text.contains("thing(Name) :- person(Name)."), "{}", text);
}

/// A theory touching every corner of the data model, for round-trip tests.
fn kitchen_sink_theory() -> Theory {
    let mut theory = Theory::new("everything");
    theory.declare_type("ID", TypeDef::primitive("str")).unwrap();
    theory
        .declare_type("Key", TypeDef::union(vec!["str", "int"]))
        .unwrap();
    theory
        .declare_predicate(
            PredicateDefinition::new("Link", vec![("source", "ID"), ("target", "ID")])
                .with_description("a directed edge"),
        )
        .unwrap();
    theory
        .declare_predicate(
            PredicateDefinition::new("Person", vec![("name", "str")]).with_parents(vec!["Thing"]),
        )
        .unwrap();
    theory.add_group(
        SentenceGroup::new(
            "axioms",
            vec![
                Sentence::forall(
                    vec![Variable::typed("x", "ID"), Variable::typed("y", "ID")],
                    Sentence::iff(
                        Term::new("Link", vec![Arg::var("x"), Arg::var("y")]).into(),
                        Sentence::negate(
                            Term::new("Apart", vec![Arg::var("x"), Arg::var("y")]).into(),
                        ),
                    ),
                ),
                Sentence::exists(
                    vec![Variable::new("z")],
                    Sentence::or(vec![
                        Term::new("Hub", vec![Arg::var("z")]).into(),
                        Sentence::and(vec![]),
                    ]),
                ),
                Sentence::probability(
                    0.25,
                    Term::new("Rain", vec![Arg::str("tomorrow")]).into(),
                ),
                Sentence::evidence(false, Term::atom("Sunny").into()),
            ],
        )
        .with_kind(GroupKind::Axiom)
        .with_docstring("the usual suspects"),
    );
    theory.add_group(
        SentenceGroup::new("wanted", vec![Term::new("Hub", vec![Arg::str("CA")]).into()])
            .with_kind(GroupKind::Goal),
    );
    theory
        .add_fact(Term::new("Link", vec![Arg::str("CA"), Arg::str("OR")]))
        .unwrap();
    theory
        .add_fact(Term::new(
            "Reading",
            vec![
                Arg::Term(Term::new("Code", vec![Arg::str("ICD10"), Arg::str("E11")])),
                Arg::int(7),
                Arg::float(1.5),
                Arg::bool(true),
                Arg::null(),
            ],
        ))
        .unwrap();
    theory.annotate("origin", "unit test");
    theory
}

#[test]
fn test_interchange_round_trip() {
    verify_round_trip(&kitchen_sink_theory()).unwrap();
}

#[test]
fn test_round_trip_detects_drift() {
    let theory = kitchen_sink_theory();
    let text = compile(&theory, Format::Sexpr).unwrap();
    let mut reread = crate::import::sexpr::parse_theory(&text).unwrap();
    assert_eq!(reread, theory);
    reread.name = "tampered".to_string();
    assert_ne!(reread, theory);
}

#[test]
fn test_record_round_trip_alone() {
    let theory = kitchen_sink_theory();
    let text = compile(&theory, Format::Record).unwrap();
    let reread = crate::import::record::parse_theory(&text).unwrap();
    assert_eq!(reread, theory);
}

#[test]
fn test_arity_mismatch_is_reported_not_truncated() {
    let mut theory = paths_theory();
    theory.add(Sentence::term(Term::new("Link", vec![Arg::str("CA")])));
    let result = compiler_for(Format::Prolog).emit(&theory).unwrap();
    assert!(!result.text.contains("link('CA')."), "{}", result.text);
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.message.contains("arity mismatch")));
    // the rest of the theory still compiled
    assert!(result.text.contains("path(X, Y) :- link(X, Y)."));
}

#[test]
fn test_format_parsing_and_suffixes() {
    for format in Format::ALL {
        assert_eq!(Format::from_str(format.name()).unwrap(), format);
    }
    assert!(Format::from_str("z3").is_err());
    assert_eq!(compiler_for(Format::Souffle).suffix(), "dl");
    assert_eq!(compiler_for(Format::Record).suffix(), "json");
}

#[test]
fn test_compile_group_partial_output() {
    let theory = paths_theory();
    let backend = compiler_for(Format::Prolog);
    let text = backend.compile_group(&theory, &theory.groups[0]).unwrap();
    assert!(text.contains("%% paths"), "{}", text);
    assert!(text.contains("path(X, Y) :- link(X, Y)."), "{}", text);
    assert!(!text.contains("%% Facts"), "{}", text);
}
