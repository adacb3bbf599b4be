//! Theories: named bundles of declarations, grouped sentences, and ground
//! facts. The unit passed between every component.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::IrError;
use crate::registry::{PredicateDefinition, Registry, TypeDef};
use crate::sentence::Sentence;
use crate::term::{Arg, Term, Variable};

/// Kind tag of a sentence group. Grouping drives comment headers and the
/// axiom/goal partitioning of the prover backends and carries no semantic
/// weight of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    Axiom,
    Goal,
}

/// A named, optionally documented collection of sentences.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SentenceGroup {
    pub name: String,
    pub kind: Option<GroupKind>,
    pub docstring: Option<String>,
    pub sentences: Vec<Sentence>,
}

impl SentenceGroup {
    pub fn new(name: impl Into<String>, sentences: Vec<Sentence>) -> Self {
        SentenceGroup {
            name: name.into(),
            kind: None,
            docstring: None,
            sentences,
        }
    }

    pub fn with_kind(mut self, kind: GroupKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_docstring(mut self, docstring: impl Into<String>) -> Self {
        self.docstring = Some(docstring.into());
        self
    }
}

const DEFAULT_GROUP: &str = "sentences";

/// A collection of type/predicate declarations, grouped sentences, and
/// ground facts.
///
/// Built incrementally by appending groups and facts; treated as read-only
/// once handed to an emitter.
///
/// ```
/// use typelogic_ir::{Arg, PredicateDefinition, Sentence, Term, Theory, Variable};
///
/// let mut theory = Theory::new("paths");
/// theory
///     .declare_predicate(PredicateDefinition::new(
///         "Link",
///         vec![("source", "str"), ("target", "str")],
///     ))
///     .unwrap();
/// theory
///     .add_fact(Term::new("Link", vec![Arg::str("CA"), Arg::str("OR")]))
///     .unwrap();
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Theory {
    pub name: String,
    pub registry: Registry,
    pub groups: Vec<SentenceGroup>,
    pub facts: Vec<Term>,
    /// Free-form notes, e.g. skipped declarations with reasons.
    pub annotations: BTreeMap<String, String>,
}

impl Theory {
    pub fn new(name: impl Into<String>) -> Self {
        Theory {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn declare_type(&mut self, name: impl Into<String>, def: TypeDef) -> Result<(), IrError> {
        self.registry.declare_type(name, def)
    }

    pub fn declare_predicate(&mut self, def: PredicateDefinition) -> Result<(), IrError> {
        self.registry.declare_predicate(def)
    }

    /// Partial-success declaration: a conflicting redeclaration is recorded
    /// in the annotation map and skipped instead of aborting theory
    /// construction.
    pub fn declare_predicate_lenient(&mut self, def: PredicateDefinition) {
        let name = def.predicate.clone();
        if let Err(err) = self.registry.declare_predicate(def) {
            self.annotations
                .insert(format!("skipped:{}", name), err.to_string());
        }
    }

    /// Partial-success counterpart of [`Theory::declare_type`].
    pub fn declare_type_lenient(&mut self, name: impl Into<String>, def: TypeDef) {
        let name = name.into();
        if let Err(err) = self.registry.declare_type(name.clone(), def) {
            self.annotations
                .insert(format!("skipped:{}", name), err.to_string());
        }
    }

    /// Append a sentence to the default group, creating it if needed.
    pub fn add(&mut self, sentence: Sentence) {
        match self.groups.iter_mut().find(|g| g.name == DEFAULT_GROUP) {
            Some(group) => group.sentences.push(sentence),
            None => self
                .groups
                .push(SentenceGroup::new(DEFAULT_GROUP, vec![sentence])),
        }
    }

    pub fn add_group(&mut self, group: SentenceGroup) {
        self.groups.push(group);
    }

    /// Append a ground fact. Terms containing variables and terms whose
    /// arity disagrees with a declared signature are rejected.
    pub fn add_fact(&mut self, term: Term) -> Result<(), IrError> {
        if let Some(v) = term.variables().first() {
            return Err(IrError::NonGroundFact {
                term: term.to_string(),
                variable: v.name.clone(),
            });
        }
        if let Some(pd) = self.registry.predicate(&term.predicate) {
            if pd.arity() != term.arity() {
                return Err(IrError::ArityMismatch {
                    predicate: term.predicate.clone(),
                    expected: pd.arity(),
                    actual: term.arity(),
                });
            }
        }
        self.facts.push(term);
        Ok(())
    }

    pub fn annotate(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.annotations.insert(key.into(), value.into());
    }

    /// All sentences across all groups, in declaration order.
    pub fn sentences(&self) -> impl Iterator<Item = &Sentence> {
        self.groups.iter().flat_map(|g| g.sentences.iter())
    }

    /// Sentences from `axiom`-tagged and untagged groups.
    pub fn axioms(&self) -> impl Iterator<Item = &Sentence> {
        self.groups
            .iter()
            .filter(|g| g.kind != Some(GroupKind::Goal))
            .flat_map(|g| g.sentences.iter())
    }

    /// Sentences from `goal`-tagged groups.
    pub fn goals(&self) -> impl Iterator<Item = &Sentence> {
        self.groups
            .iter()
            .filter(|g| g.kind == Some(GroupKind::Goal))
            .flat_map(|g| g.sentences.iter())
    }

    /// Merge another theory into this one: declaration tables concatenate
    /// (identical redeclarations tolerated), group and fact lists append.
    pub fn merge(&mut self, other: Theory) -> Result<(), IrError> {
        self.registry.merge(other.registry)?;
        self.groups.extend(other.groups);
        self.facts.extend(other.facts);
        self.annotations.extend(other.annotations);
        Ok(())
    }

    /// Subsumption axioms synthesized from predicate parent declarations:
    /// for each parent of `P(a1, …, an)`, `∀a1…an. P(a1, …, an) →
    /// parent(…)`, the parent applied to its own declared argument names
    /// where the parent is itself declared, otherwise to all of `P`'s
    /// arguments.
    pub fn parent_axioms(&self) -> Vec<Sentence> {
        let mut axioms = Vec::new();
        for pd in self.registry.predicates() {
            for parent in &pd.parents {
                let variables: Vec<Variable> = pd
                    .arguments
                    .iter()
                    .map(|(name, typ)| Variable::typed(name, typ))
                    .collect();
                let child_args: Vec<Arg> =
                    pd.argument_names().map(Arg::var).collect();
                let parent_args: Vec<Arg> = match self.registry.predicate(parent) {
                    Some(parent_pd) => parent_pd
                        .argument_names()
                        .filter(|name| pd.arguments.contains_key(*name))
                        .map(Arg::var)
                        .collect(),
                    None => child_args.clone(),
                };
                axioms.push(Sentence::forall(
                    variables,
                    Sentence::implies(
                        Term::new(pd.predicate.clone(), child_args).into(),
                        Term::new(parent.clone(), parent_args).into(),
                    ),
                ));
            }
        }
        axioms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link_theory() -> Theory {
        let mut theory = Theory::new("paths");
        theory
            .declare_predicate(PredicateDefinition::new(
                "Link",
                vec![("source", "str"), ("target", "str")],
            ))
            .unwrap();
        theory
    }

    #[test]
    fn test_add_fact_rejects_variables() {
        let mut theory = link_theory();
        let err = theory
            .add_fact(Term::new("Link", vec![Arg::var("x"), Arg::str("OR")]))
            .unwrap_err();
        assert!(matches!(err, IrError::NonGroundFact { .. }));
    }

    #[test]
    fn test_add_fact_rejects_arity_mismatch() {
        let mut theory = link_theory();
        let err = theory
            .add_fact(Term::new("Link", vec![Arg::str("CA")]))
            .unwrap_err();
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
    fn test_goal_partitioning() {
        let mut theory = Theory::new("t");
        theory.add_group(
            SentenceGroup::new("facts", vec![Term::atom("P").into()]).with_kind(GroupKind::Axiom),
        );
        theory.add_group(
            SentenceGroup::new("wanted", vec![Term::atom("Q").into()]).with_kind(GroupKind::Goal),
        );
        theory.add_group(SentenceGroup::new("untagged", vec![Term::atom("R").into()]));
        assert_eq!(theory.axioms().count(), 2);
        assert_eq!(theory.goals().count(), 1);
        assert_eq!(theory.sentences().count(), 3);
    }

    #[test]
    fn test_merge_conflicting_predicate() {
        let mut a = link_theory();
        let mut b = Theory::new("other");
        b.declare_predicate(PredicateDefinition::new("Link", vec![("n", "int")]))
            .unwrap();
        assert!(matches!(
            a.merge(b),
            Err(IrError::DuplicateDeclaration { .. })
        ));
    }

    #[test]
    fn test_merge_appends() {
        let mut a = link_theory();
        a.add(Term::atom("P").into());
        let mut b = link_theory();
        b.add(Term::atom("Q").into());
        b.add_fact(Term::new("Link", vec![Arg::str("CA"), Arg::str("OR")]))
            .unwrap();
        a.merge(b).unwrap();
        assert_eq!(a.sentences().count(), 2);
        assert_eq!(a.facts.len(), 1);
    }

    #[test]
    fn test_lenient_declaration_records_skip() {
        let mut theory = link_theory();
        theory.declare_predicate_lenient(PredicateDefinition::new("Link", vec![("n", "int")]));
        assert!(theory.registry.predicate("Link").unwrap().arity() == 2);
        let note = theory.annotations.get("skipped:Link").unwrap();
        assert!(note.contains("Duplicate declaration"));
    }

    #[test]
    fn test_parent_axioms() {
        let mut theory = Theory::new("t");
        theory
            .declare_predicate(PredicateDefinition::new("Thing", vec![("name", "str")]))
            .unwrap();
        theory
            .declare_predicate(
                PredicateDefinition::new("Person", vec![("name", "str")])
                    .with_parents(vec!["Thing"]),
            )
            .unwrap();
        let axioms = theory.parent_axioms();
        assert_eq!(axioms.len(), 1);
        let expected = Sentence::forall(
            vec![Variable::typed("name", "str")],
            Sentence::implies(
                Term::new("Person", vec![Arg::var("name")]).into(),
                Term::new("Thing", vec![Arg::var("name")]).into(),
            ),
        );
        assert_eq!(axioms[0], expected);
    }
}
