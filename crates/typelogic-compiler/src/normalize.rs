//! Clause normalization.
//!
//! Rewrites arbitrary sentences into flat head/body clauses for the
//! Horn-style backends (Prolog, Souffle, ProbLog). Two paths:
//!
//! 1. A nested if/elif/else conditional tree — `Implies(C1, H1) ∧
//!    Implies(¬C1, …)` — is flattened branch by branch into independent,
//!    mutually exclusive clauses: each branch's body carries its own guard
//!    plus the negation of every earlier branch's guard. This preserves
//!    first-match-wins semantics in engines that have no notion of
//!    sequential branch priority.
//! 2. Everything else goes through the classical pipeline: eliminate `Iff`
//!    and `Implies`, push negations inward (De Morgan, quantifier duality),
//!    strip quantifiers, distribute ∨ over ∧, and read each CNF disjunct as
//!    one clause.
//!
//! Normalization is a pure function over a single sentence producing zero
//! or more clauses; failures are per-sentence and the caller keeps going.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use typelogic_ir::{GroupKind, IrError, Registry, Sentence, Term, Theory};

use crate::diagnostics::Diagnostic;

/// One body literal: a term, possibly under negation-as-failure.
#[derive(Clone, Debug, PartialEq)]
pub struct Literal {
    pub positive: bool,
    pub term: Term,
}

impl Literal {
    pub fn pos(term: Term) -> Self {
        Literal {
            positive: true,
            term,
        }
    }

    pub fn neg(term: Term) -> Self {
        Literal {
            positive: false,
            term,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.positive {
            write!(f, "{}", self.term)
        } else {
            write!(f, "¬{}", self.term)
        }
    }
}

/// A flat clause: zero or more head terms (none = integrity constraint,
/// more than one = disjunctive head) and an ordered conjunctive body.
#[derive(Clone, Debug, PartialEq)]
pub struct Clause {
    pub heads: Vec<Term>,
    pub body: Vec<Literal>,
}

impl Clause {
    pub fn fact(head: Term) -> Self {
        Clause {
            heads: vec![head],
            body: Vec::new(),
        }
    }

    pub fn rule(head: Term, body: Vec<Literal>) -> Self {
        Clause {
            heads: vec![head],
            body,
        }
    }

    pub fn constraint(body: Vec<Literal>) -> Self {
        Clause {
            heads: Vec::new(),
            body,
        }
    }

    pub fn head(&self) -> Option<&Term> {
        match self.heads.as_slice() {
            [single] => Some(single),
            _ => None,
        }
    }

    pub fn is_constraint(&self) -> bool {
        self.heads.is_empty()
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let heads = self
            .heads
            .iter()
            .map(Term::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        if self.body.is_empty() {
            return write!(f, "{}", heads);
        }
        let body = self
            .body
            .iter()
            .map(Literal::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        if self.heads.is_empty() {
            write!(f, ":- {}", body)
        } else {
            write!(f, "{} :- {}", heads, body)
        }
    }
}

/// What clause shapes the target grammar accepts.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClauseOptions {
    /// Keep multiple positive literals as a disjunctive head instead of
    /// negating all but the last into the body.
    pub allow_disjunctive_head: bool,
    /// Accept headless clauses (integrity constraints).
    pub allow_constraints: bool,
}

/// Normalize one sentence into flat clauses.
pub fn clauses_for(
    sentence: &Sentence,
    registry: &Registry,
    options: ClauseOptions,
) -> Result<Vec<Clause>, IrError> {
    reject_annotations(sentence)?;
    check_arities(sentence, registry)?;
    let core = strip_forall(sentence);
    let clauses = match flatten_branches(core) {
        Some(clauses) => clauses,
        None => general_clauses(core, options)?,
    };
    for clause in &clauses {
        check_head_safety(clause)?;
    }
    Ok(clauses)
}

fn reject_annotations(sentence: &Sentence) -> Result<(), IrError> {
    match sentence {
        Sentence::Probability { .. } | Sentence::Evidence { .. } => {
            Err(IrError::UnsupportedAnnotation {
                sentence: sentence.to_string(),
            })
        }
        Sentence::Term(_) => Ok(()),
        Sentence::Not(inner) => reject_annotations(inner),
        Sentence::And(ops) | Sentence::Or(ops) => ops.iter().try_for_each(reject_annotations),
        Sentence::Implies {
            antecedent,
            consequent,
        } => {
            reject_annotations(antecedent)?;
            reject_annotations(consequent)
        }
        Sentence::Iff { left, right } => {
            reject_annotations(left)?;
            reject_annotations(right)
        }
        Sentence::Forall { body, .. } | Sentence::Exists { body, .. } => reject_annotations(body),
    }
}

fn check_arities(sentence: &Sentence, registry: &Registry) -> Result<(), IrError> {
    match sentence {
        Sentence::Term(t) => check_term_arity(t, registry),
        Sentence::Not(inner)
        | Sentence::Probability { inner, .. }
        | Sentence::Evidence { inner, .. } => check_arities(inner, registry),
        Sentence::And(ops) | Sentence::Or(ops) => {
            ops.iter().try_for_each(|s| check_arities(s, registry))
        }
        Sentence::Implies {
            antecedent,
            consequent,
        } => {
            check_arities(antecedent, registry)?;
            check_arities(consequent, registry)
        }
        Sentence::Iff { left, right } => {
            check_arities(left, registry)?;
            check_arities(right, registry)
        }
        Sentence::Forall { body, .. } | Sentence::Exists { body, .. } => {
            check_arities(body, registry)
        }
    }
}

fn check_term_arity(term: &Term, registry: &Registry) -> Result<(), IrError> {
    if let Some(pd) = registry.predicate(&term.predicate) {
        if pd.arity() != term.arity() {
            return Err(IrError::ArityMismatch {
                predicate: term.predicate.clone(),
                expected: pd.arity(),
                actual: term.arity(),
            });
        }
    }
    for arg in &term.args {
        if let typelogic_ir::Arg::Term(inner) = arg {
            check_term_arity(inner, registry)?;
        }
    }
    Ok(())
}

fn strip_forall(sentence: &Sentence) -> &Sentence {
    match sentence {
        Sentence::Forall { body, .. } => strip_forall(body),
        other => other,
    }
}

/// Every head variable must be bound by a positive body literal.
fn check_head_safety(clause: &Clause) -> Result<(), IrError> {
    let mut bound = BTreeSet::new();
    for lit in &clause.body {
        if lit.positive {
            for v in lit.term.variables() {
                bound.insert(v.name.as_str());
            }
        }
    }
    for head in &clause.heads {
        for v in head.variables() {
            if !bound.contains(v.name.as_str()) && !clause.body.is_empty() {
                return Err(IrError::UnsafeHeadVariable {
                    variable: v.name.clone(),
                    clause: clause.to_string(),
                });
            }
            if clause.body.is_empty() && !head.is_ground() {
                return Err(IrError::UnsafeHeadVariable {
                    variable: v.name.clone(),
                    clause: clause.to_string(),
                });
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Conditional-tree flattening
// ---------------------------------------------------------------------------

struct Branch<'a> {
    guard: Option<&'a Sentence>,
    head: &'a Sentence,
}

/// Flatten a guarded conditional tree into mutually exclusive clauses.
/// Returns `None` when the sentence does not have that shape (or when a
/// guard is too complex to negate as a single literal), in which case the
/// general pipeline takes over.
fn flatten_branches(sentence: &Sentence) -> Option<Vec<Clause>> {
    // A shared precondition distributes over every branch.
    let (precondition, tree) = match sentence {
        Sentence::Implies {
            antecedent,
            consequent,
        } if match_branches(consequent).is_some() => {
            (Some(antecedent.as_ref()), consequent.as_ref())
        }
        other => (None, other),
    };
    let branches = match_branches(tree)?;
    let shared = match precondition {
        Some(pre) => conjunct_literals(pre)?,
        None => Vec::new(),
    };

    let mut clauses = Vec::new();
    let mut earlier_negated: Vec<Literal> = Vec::new();
    for branch in &branches {
        let mut body = shared.clone();
        if let Some(guard) = branch.guard {
            body.extend(conjunct_literals(guard)?);
        }
        body.extend(earlier_negated.iter().cloned());
        for head in conjunct_heads(branch.head)? {
            clauses.push(Clause {
                heads: vec![head],
                body: body.clone(),
            });
        }
        if let Some(guard) = branch.guard {
            // Guards must negate to a single literal to stay flat.
            let term = guard.as_term()?;
            earlier_negated.insert(0, Literal::neg(term.clone()));
        }
    }
    Some(clauses)
}

/// Match `Implies(C, H) ∧ Implies(¬C, rest)` recursively. At least two
/// branches are required; a single implication is an ordinary rule.
fn match_branches(sentence: &Sentence) -> Option<Vec<Branch<'_>>> {
    let Sentence::And(ops) = sentence else {
        return None;
    };
    let [first, rest] = ops.as_slice() else {
        return None;
    };
    let Sentence::Implies {
        antecedent: guard,
        consequent: head,
    } = first
    else {
        return None;
    };
    let Sentence::Implies {
        antecedent: else_guard,
        consequent: else_body,
    } = rest
    else {
        return None;
    };
    let Sentence::Not(negated) = else_guard.as_ref() else {
        return None;
    };
    if negated.as_ref() != guard.as_ref() {
        return None;
    }
    let mut branches = vec![Branch {
        guard: Some(guard.as_ref()),
        head: head.as_ref(),
    }];
    branches.extend(match_tail(else_body));
    Some(branches)
}

fn match_tail(sentence: &Sentence) -> Vec<Branch<'_>> {
    if let Some(more) = match_branches(sentence) {
        return more;
    }
    if let Sentence::Implies {
        antecedent,
        consequent,
    } = sentence
    {
        // Final branch guarded but with no else.
        return vec![Branch {
            guard: Some(antecedent.as_ref()),
            head: consequent.as_ref(),
        }];
    }
    // Bare else body.
    vec![Branch {
        guard: None,
        head: sentence,
    }]
}

/// Decompose a conjunction of literals; `None` when any conjunct is not a
/// plain or negated term.
fn conjunct_literals(sentence: &Sentence) -> Option<Vec<Literal>> {
    let mut out = Vec::new();
    let ops: Vec<&Sentence> = match sentence {
        Sentence::And(ops) => ops.iter().collect(),
        other => vec![other],
    };
    for op in ops {
        match op {
            Sentence::Term(t) => out.push(Literal::pos(t.clone())),
            Sentence::Not(inner) => out.push(Literal::neg(inner.as_term()?.clone())),
            Sentence::Exists { body, .. } => out.extend(conjunct_literals(body)?),
            _ => return None,
        }
    }
    Some(out)
}

/// Decompose a branch head into terms; conjunctive heads split into one
/// clause per conjunct.
fn conjunct_heads(sentence: &Sentence) -> Option<Vec<Term>> {
    match sentence {
        Sentence::Term(t) => Some(vec![t.clone()]),
        Sentence::And(ops) => ops
            .iter()
            .map(|op| op.as_term().cloned())
            .collect::<Option<Vec<_>>>(),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// General pipeline: Iff/Implies elimination → NNF → CNF → clauses
// ---------------------------------------------------------------------------

fn general_clauses(sentence: &Sentence, options: ClauseOptions) -> Result<Vec<Clause>, IrError> {
    let eliminated = eliminate_implications(sentence);
    let nnf = push_negations(&eliminated);
    let stripped = strip_quantifiers(&nnf);
    let mut clauses = Vec::new();
    for disjunct in cnf_disjuncts(&stripped) {
        if disjunct.is_empty() {
            // The empty disjunct is the unconditionally false clause; no
            // target grammar has a rendering for it.
            return Err(IrError::UnsupportedConstraintShape {
                sentence: sentence.to_string(),
            });
        }
        clauses.push(clause_from_disjunct(sentence, disjunct, options)?);
    }
    Ok(clauses)
}

/// `Iff` becomes a pair of implications, `Implies(a, c)` becomes `¬a ∨ c`.
fn eliminate_implications(sentence: &Sentence) -> Sentence {
    match sentence {
        Sentence::Term(_) => sentence.clone(),
        Sentence::Not(inner) => Sentence::negate(eliminate_implications(inner)),
        Sentence::And(ops) => {
            Sentence::And(ops.iter().map(eliminate_implications).collect())
        }
        Sentence::Or(ops) => Sentence::Or(ops.iter().map(eliminate_implications).collect()),
        Sentence::Implies {
            antecedent,
            consequent,
        } => Sentence::Or(vec![
            Sentence::negate(eliminate_implications(antecedent)),
            eliminate_implications(consequent),
        ]),
        Sentence::Iff { left, right } => {
            let l = eliminate_implications(left);
            let r = eliminate_implications(right);
            Sentence::And(vec![
                Sentence::Or(vec![Sentence::negate(l.clone()), r.clone()]),
                Sentence::Or(vec![Sentence::negate(r), l]),
            ])
        }
        Sentence::Forall { variables, body } => {
            Sentence::forall(variables.clone(), eliminate_implications(body))
        }
        Sentence::Exists { variables, body } => {
            Sentence::exists(variables.clone(), eliminate_implications(body))
        }
        // Annotations are rejected before this pipeline runs.
        Sentence::Probability { .. } | Sentence::Evidence { .. } => sentence.clone(),
    }
}

/// Push negations down to the literals: double negation, De Morgan, and
/// quantifier duality.
fn push_negations(sentence: &Sentence) -> Sentence {
    match sentence {
        Sentence::Not(inner) => match inner.as_ref() {
            Sentence::Not(inner2) => push_negations(inner2),
            Sentence::And(ops) => Sentence::Or(
                ops.iter()
                    .map(|op| push_negations(&Sentence::negate(op.clone())))
                    .collect(),
            ),
            Sentence::Or(ops) => Sentence::And(
                ops.iter()
                    .map(|op| push_negations(&Sentence::negate(op.clone())))
                    .collect(),
            ),
            Sentence::Forall { variables, body } => Sentence::exists(
                variables.clone(),
                push_negations(&Sentence::negate(body.as_ref().clone())),
            ),
            Sentence::Exists { variables, body } => Sentence::forall(
                variables.clone(),
                push_negations(&Sentence::negate(body.as_ref().clone())),
            ),
            _ => Sentence::negate(push_negations(inner)),
        },
        Sentence::And(ops) => Sentence::And(ops.iter().map(push_negations).collect()),
        Sentence::Or(ops) => Sentence::Or(ops.iter().map(push_negations).collect()),
        Sentence::Forall { variables, body } => {
            Sentence::forall(variables.clone(), push_negations(body))
        }
        Sentence::Exists { variables, body } => {
            Sentence::exists(variables.clone(), push_negations(body))
        }
        _ => sentence.clone(),
    }
}

/// Clause backends quantify implicitly: universals are dropped and a body
/// existential's variables become ordinary body variables.
fn strip_quantifiers(sentence: &Sentence) -> Sentence {
    match sentence {
        Sentence::Forall { body, .. } | Sentence::Exists { body, .. } => strip_quantifiers(body),
        Sentence::Not(inner) => Sentence::negate(strip_quantifiers(inner)),
        Sentence::And(ops) => Sentence::And(ops.iter().map(strip_quantifiers).collect()),
        Sentence::Or(ops) => Sentence::Or(ops.iter().map(strip_quantifiers).collect()),
        _ => sentence.clone(),
    }
}

/// Conjunctive normal form as a list of disjunct lists. Input must be in
/// negation normal form with implications eliminated.
fn cnf_disjuncts(sentence: &Sentence) -> Vec<Vec<Sentence>> {
    match sentence {
        Sentence::And(ops) => ops.iter().flat_map(cnf_disjuncts).collect(),
        Sentence::Or(ops) => {
            // ∨ distributes over ∧: the disjunction of CNFs is the
            // cross-product of their disjuncts.
            let mut acc: Vec<Vec<Sentence>> = vec![Vec::new()];
            for op in ops {
                let op_cnf = cnf_disjuncts(op);
                let mut next = Vec::new();
                for left in &acc {
                    for right in &op_cnf {
                        let mut merged = left.clone();
                        merged.extend(right.iter().cloned());
                        next.push(merged);
                    }
                }
                acc = next;
            }
            acc
        }
        other => vec![vec![other.clone()]],
    }
}

/// Read one CNF disjunct as a clause: positive literals to the head,
/// negative literals to the body.
fn clause_from_disjunct(
    origin: &Sentence,
    disjunct: Vec<Sentence>,
    options: ClauseOptions,
) -> Result<Clause, IrError> {
    let mut positive: Vec<Term> = Vec::new();
    let mut body: Vec<Literal> = Vec::new();
    for literal in disjunct {
        match literal {
            Sentence::Term(t) => positive.push(t),
            Sentence::Not(inner) => match *inner {
                Sentence::Term(t) => body.push(Literal::pos(t)),
                other => {
                    return Err(IrError::UnsupportedNegationShape {
                        sentence: other.to_string(),
                    })
                }
            },
            other => {
                return Err(IrError::UnsupportedNegationShape {
                    sentence: other.to_string(),
                })
            }
        }
    }
    if positive.is_empty() {
        if options.allow_constraints {
            return Ok(Clause::constraint(body));
        }
        // A headless clause with no target form: distinguish a rejected
        // top-level negation from a bare constraint.
        return Err(match origin {
            Sentence::Not(_) => IrError::UnsupportedNegationShape {
                sentence: origin.to_string(),
            },
            _ => IrError::UnsupportedConstraintShape {
                sentence: origin.to_string(),
            },
        });
    }
    if positive.len() > 1 && !options.allow_disjunctive_head {
        // Not Horn. Keep the last positive literal as head and negate the
        // others into the body, preserving declaration order; splitting
        // into several positive-head rules instead would invite
        // stratification cycles.
        let head = positive.pop().expect("nonempty");
        body.extend(positive.into_iter().map(Literal::neg));
        return Ok(Clause::rule(head, body));
    }
    Ok(Clause {
        heads: positive,
        body,
    })
}

// ---------------------------------------------------------------------------
// Theory-level normalization
// ---------------------------------------------------------------------------

/// One sentence group after normalization.
#[derive(Clone, Debug)]
pub struct NormalizedGroup {
    pub name: String,
    pub kind: Option<GroupKind>,
    pub docstring: Option<String>,
    pub clauses: Vec<Clause>,
    /// Sentences this group had to skip, with reasons.
    pub skipped: Vec<Diagnostic>,
}

/// A theory's clause form, with per-sentence failures recorded rather than
/// aborting the whole compilation.
#[derive(Clone, Debug, Default)]
pub struct NormalizedTheory {
    pub groups: Vec<NormalizedGroup>,
}

impl NormalizedTheory {
    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.groups.iter().flat_map(|g| g.clauses.iter())
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.groups
            .iter()
            .flat_map(|g| g.skipped.iter().cloned())
            .collect()
    }
}

/// Normalize every group of a theory. Parent-subsumption axioms synthesized
/// from the registry are appended as an extra `inferred` group.
pub fn normalize_theory(theory: &Theory, options: ClauseOptions) -> NormalizedTheory {
    let mut normalized = NormalizedTheory::default();
    for group in &theory.groups {
        let mut out = NormalizedGroup {
            name: group.name.clone(),
            kind: group.kind,
            docstring: group.docstring.clone(),
            clauses: Vec::new(),
            skipped: Vec::new(),
        };
        for sentence in &group.sentences {
            match clauses_for(sentence, &theory.registry, options) {
                Ok(clauses) => out.clauses.extend(clauses),
                Err(err) => out.skipped.push(
                    Diagnostic::from_error(sentence.to_string(), &err).with_group(&group.name),
                ),
            }
        }
        normalized.groups.push(out);
    }
    let parent_axioms = theory.parent_axioms();
    if !parent_axioms.is_empty() {
        let mut inferred = NormalizedGroup {
            name: "inferred".to_string(),
            kind: None,
            docstring: None,
            clauses: Vec::new(),
            skipped: Vec::new(),
        };
        for sentence in &parent_axioms {
            match clauses_for(sentence, &theory.registry, options) {
                Ok(clauses) => inferred.clauses.extend(clauses),
                Err(err) => inferred.skipped.push(
                    Diagnostic::from_error(sentence.to_string(), &err).with_group("inferred"),
                ),
            }
        }
        normalized.groups.push(inferred);
    }
    normalized
}

/// Validate a ground fact against the registry before rendering it.
pub fn validate_fact(term: &Term, registry: &Registry) -> Result<(), IrError> {
    if let Some(v) = term.variables().first() {
        return Err(IrError::NonGroundFact {
            term: term.to_string(),
            variable: v.name.clone(),
        });
    }
    check_term_arity(term, registry)
}

// ---------------------------------------------------------------------------
// Stratification
// ---------------------------------------------------------------------------

/// Drop rules whose negated body literal participates in a dependency
/// cycle, until the program is stratifiable. Weakens the program but never
/// silently: the dropped rules are returned for diagnostics.
pub fn stratify(clauses: Vec<Clause>) -> (Vec<Clause>, Vec<Clause>) {
    let mut kept = clauses;
    let mut dropped = Vec::new();
    loop {
        let Some(index) = find_unstratifiable(&kept) else {
            break;
        };
        dropped.push(kept.remove(index));
    }
    (kept, dropped)
}

/// Index of the first rule with a negated body literal whose predicate can
/// reach the rule's own head predicate through the dependency graph.
fn find_unstratifiable(clauses: &[Clause]) -> Option<usize> {
    let mut depends: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for clause in clauses {
        for head in &clause.heads {
            let entry = depends.entry(head.predicate.as_str()).or_default();
            for lit in &clause.body {
                entry.insert(lit.term.predicate.as_str());
            }
        }
    }
    for (i, clause) in clauses.iter().enumerate() {
        for head in &clause.heads {
            for lit in &clause.body {
                if !lit.positive && reaches(&depends, lit.term.predicate.as_str(), &head.predicate)
                {
                    return Some(i);
                }
            }
        }
    }
    None
}

fn reaches(depends: &BTreeMap<&str, BTreeSet<&str>>, from: &str, to: &str) -> bool {
    let mut seen = BTreeSet::new();
    let mut stack = vec![from];
    while let Some(current) = stack.pop() {
        if current == to {
            return true;
        }
        if !seen.insert(current) {
            continue;
        }
        if let Some(next) = depends.get(current) {
            stack.extend(next.iter().copied());
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use typelogic_ir::{Arg, Variable};

    fn term(p: &str, args: Vec<Arg>) -> Term {
        Term::new(p, args)
    }

    fn atom(p: &str) -> Sentence {
        Term::atom(p).into()
    }

    fn registry() -> Registry {
        Registry::new()
    }

    #[test]
    fn test_flat_rule_is_idempotent() {
        // path(x, z) :- path(x, y), path(y, z) normalizes to exactly itself
        let body = Sentence::and(vec![
            term("Path", vec![Arg::var("x"), Arg::var("y")]).into(),
            term("Path", vec![Arg::var("y"), Arg::var("z")]).into(),
        ]);
        let head: Sentence = term("Path", vec![Arg::var("x"), Arg::var("z")]).into();
        let rule = Sentence::forall(
            vec![Variable::new("x"), Variable::new("y"), Variable::new("z")],
            Sentence::implies(body, head),
        );
        let clauses = clauses_for(&rule, &registry(), ClauseOptions::default()).unwrap();
        assert_eq!(clauses.len(), 1);
        assert_eq!(
            clauses[0],
            Clause::rule(
                term("Path", vec![Arg::var("x"), Arg::var("z")]),
                vec![
                    Literal::pos(term("Path", vec![Arg::var("x"), Arg::var("y")])),
                    Literal::pos(term("Path", vec![Arg::var("y"), Arg::var("z")])),
                ],
            )
        );
    }

    #[test]
    fn test_ground_term_becomes_fact_clause() {
        let s: Sentence = term("Link", vec![Arg::str("CA"), Arg::str("OR")]).into();
        let clauses = clauses_for(&s, &registry(), ClauseOptions::default()).unwrap();
        assert_eq!(
            clauses,
            vec![Clause::fact(term("Link", vec![Arg::str("CA"), Arg::str("OR")]))]
        );
    }

    #[test]
    fn test_iff_splits_into_two_rules() {
        let s = Sentence::iff(atom("A"), atom("B"));
        let clauses = clauses_for(&s, &registry(), ClauseOptions::default()).unwrap();
        assert_eq!(clauses.len(), 2);
        assert!(clauses.contains(&Clause::rule(
            Term::atom("B"),
            vec![Literal::pos(Term::atom("A"))]
        )));
        assert!(clauses.contains(&Clause::rule(
            Term::atom("A"),
            vec![Literal::pos(Term::atom("B"))]
        )));
    }

    #[test]
    fn test_disjunctive_body_splits() {
        // (A ∨ B) → C becomes two clauses, one per disjunct
        let s = Sentence::implies(Sentence::or(vec![atom("A"), atom("B")]), atom("C"));
        let clauses = clauses_for(&s, &registry(), ClauseOptions::default()).unwrap();
        assert_eq!(clauses.len(), 2);
        assert!(clauses.contains(&Clause::rule(
            Term::atom("C"),
            vec![Literal::pos(Term::atom("A"))]
        )));
        assert!(clauses.contains(&Clause::rule(
            Term::atom("C"),
            vec![Literal::pos(Term::atom("B"))]
        )));
    }

    #[test]
    fn test_conjunctive_head_splits() {
        // C → (A ∧ B) becomes a :- c. and b :- c.
        let s = Sentence::implies(atom("C"), Sentence::and(vec![atom("A"), atom("B")]));
        let clauses = clauses_for(&s, &registry(), ClauseOptions::default()).unwrap();
        assert_eq!(clauses.len(), 2);
        assert!(clauses.contains(&Clause::rule(
            Term::atom("A"),
            vec![Literal::pos(Term::atom("C"))]
        )));
        assert!(clauses.contains(&Clause::rule(
            Term::atom("B"),
            vec![Literal::pos(Term::atom("C"))]
        )));
    }

    #[test]
    fn test_negated_body_literal_survives() {
        // (A ∧ ¬B) → C keeps the negation-as-failure literal
        let s = Sentence::implies(
            Sentence::and(vec![atom("A"), Sentence::negate(atom("B"))]),
            atom("C"),
        );
        let clauses = clauses_for(&s, &registry(), ClauseOptions::default()).unwrap();
        assert_eq!(
            clauses,
            vec![Clause::rule(
                Term::atom("C"),
                vec![Literal::pos(Term::atom("A")), Literal::neg(Term::atom("B"))],
            )]
        );
    }

    fn stage_chain() -> Sentence {
        // if v >= 90: Stage1  elif v >= 60: Stage2  else: Stage3
        let high: Sentence = term("ge", vec![Arg::var("v"), Arg::int(90)]).into();
        let mid: Sentence = term("ge", vec![Arg::var("v"), Arg::int(60)]).into();
        let s1: Sentence = term("Stage1", vec![Arg::var("v")]).into();
        let s2: Sentence = term("Stage2", vec![Arg::var("v")]).into();
        let s3: Sentence = term("Stage3", vec![Arg::var("v")]).into();
        Sentence::forall(
            vec![Variable::new("v")],
            Sentence::implies(
                term("Score", vec![Arg::var("v")]).into(),
                Sentence::and(vec![
                    Sentence::implies(high.clone(), s1),
                    Sentence::implies(
                        Sentence::negate(high),
                        Sentence::and(vec![
                            Sentence::implies(mid.clone(), s2),
                            Sentence::implies(Sentence::negate(mid), s3),
                        ]),
                    ),
                ]),
            ),
        )
    }

    #[test]
    fn test_conditional_chain_flattens_to_exclusive_clauses() {
        let clauses =
            clauses_for(&stage_chain(), &registry(), ClauseOptions::default()).unwrap();
        assert_eq!(clauses.len(), 3);

        let score = Literal::pos(term("Score", vec![Arg::var("v")]));
        let high = term("ge", vec![Arg::var("v"), Arg::int(90)]);
        let mid = term("ge", vec![Arg::var("v"), Arg::int(60)]);

        assert_eq!(
            clauses[0],
            Clause::rule(
                term("Stage1", vec![Arg::var("v")]),
                vec![score.clone(), Literal::pos(high.clone())],
            )
        );
        assert_eq!(
            clauses[1],
            Clause::rule(
                term("Stage2", vec![Arg::var("v")]),
                vec![score.clone(), Literal::pos(mid.clone()), Literal::neg(high.clone())],
            )
        );
        assert_eq!(
            clauses[2],
            Clause::rule(
                term("Stage3", vec![Arg::var("v")]),
                vec![score, Literal::neg(mid), Literal::neg(high)],
            )
        );
    }

    #[test]
    fn test_unsafe_head_variable() {
        // p(x, y) :- q(x) leaves y unbound
        let s = Sentence::implies(
            term("Q", vec![Arg::var("x")]).into(),
            term("P", vec![Arg::var("x"), Arg::var("y")]).into(),
        );
        let err = clauses_for(&s, &registry(), ClauseOptions::default()).unwrap_err();
        assert!(matches!(err, IrError::UnsafeHeadVariable { variable, .. } if variable == "y"));
    }

    #[test]
    fn test_arity_mismatch_against_registry() {
        let mut registry = Registry::new();
        registry
            .declare_predicate(typelogic_ir::PredicateDefinition::new(
                "Link",
                vec![("source", "str"), ("target", "str")],
            ))
            .unwrap();
        let s: Sentence = term("Link", vec![Arg::str("CA")]).into();
        let err = clauses_for(&s, &registry, ClauseOptions::default()).unwrap_err();
        assert_eq!(
            err,
            IrError::ArityMismatch {
                predicate: "Link".to_string(),
                expected: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn test_top_level_negation_becomes_constraint() {
        // ¬(A ∧ B): never both
        let s = Sentence::negate(Sentence::and(vec![atom("A"), atom("B")]));
        let constraints = ClauseOptions {
            allow_constraints: true,
            ..Default::default()
        };
        let clauses = clauses_for(&s, &registry(), constraints).unwrap();
        assert_eq!(
            clauses,
            vec![Clause::constraint(vec![
                Literal::pos(Term::atom("A")),
                Literal::pos(Term::atom("B")),
            ])]
        );

        let err = clauses_for(&s, &registry(), ClauseOptions::default()).unwrap_err();
        assert!(matches!(err, IrError::UnsupportedNegationShape { .. }));
    }

    #[test]
    fn test_bare_constraint_rejected_without_constraint_form() {
        let s = Sentence::forall(
            vec![Variable::new("x")],
            Sentence::negate(term("Cycle", vec![Arg::var("x"), Arg::var("x")]).into()),
        );
        let err = clauses_for(&s, &registry(), ClauseOptions::default()).unwrap_err();
        assert!(matches!(err, IrError::UnsupportedNegationShape { .. }));
    }

    #[test]
    fn test_probability_rejected_here() {
        let s = Sentence::probability(0.5, atom("A"));
        let err = clauses_for(&s, &registry(), ClauseOptions::default()).unwrap_err();
        assert!(matches!(err, IrError::UnsupportedAnnotation { .. }));
    }

    #[test]
    fn test_stratify_drops_cyclic_negation() {
        // p :- ¬q.  q :- p.  is not stratifiable; one rule must go.
        let p_rule = Clause::rule(Term::atom("p"), vec![Literal::neg(Term::atom("q"))]);
        let q_rule = Clause::rule(Term::atom("q"), vec![Literal::pos(Term::atom("p"))]);
        let (kept, dropped) = stratify(vec![p_rule.clone(), q_rule.clone()]);
        assert_eq!(dropped, vec![p_rule]);
        assert_eq!(kept, vec![q_rule]);
    }

    #[test]
    fn test_stratify_keeps_acyclic_negation() {
        let rule = Clause::rule(Term::atom("p"), vec![Literal::neg(Term::atom("q"))]);
        let base = Clause::fact(Term::atom("q"));
        let (kept, dropped) = stratify(vec![rule, base]);
        assert_eq!(kept.len(), 2);
        assert!(dropped.is_empty());
    }

    #[test]
    fn test_normalize_theory_partial_success() {
        let mut theory = Theory::new("t");
        theory.add(Sentence::implies(atom("A"), atom("B")));
        theory.add(Sentence::probability(0.5, atom("C")));
        let normalized = normalize_theory(&theory, ClauseOptions::default());
        assert_eq!(normalized.clauses().count(), 1);
        let diagnostics = normalized.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].group.as_deref(), Some("sentences"));
    }
}
