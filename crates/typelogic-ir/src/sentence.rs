//! Logical sentences: the tagged tree of connectives, quantifiers, and
//! probabilistic annotations over terms.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::term::{Arg, Term, Variable};

/// A logical sentence.
///
/// Sentences are immutable trees; every transformation builds a new tree.
/// `And`/`Or` take zero or more operands: the empty conjunction is the
/// trivial true and the empty disjunction the trivial false.
///
/// ```
/// use typelogic_ir::{Arg, Sentence, Term, Variable};
///
/// // ∀x, y. link(x, y) → path(x, y)
/// let rule = Sentence::forall(
///     vec![Variable::new("x"), Variable::new("y")],
///     Sentence::implies(
///         Term::new("Link", vec![Arg::var("x"), Arg::var("y")]).into(),
///         Term::new("Path", vec![Arg::var("x"), Arg::var("y")]).into(),
///     ),
/// );
/// assert!(rule.free_vars().is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Sentence {
    Term(Term),
    Not(Box<Sentence>),
    And(Vec<Sentence>),
    Or(Vec<Sentence>),
    Implies {
        antecedent: Box<Sentence>,
        consequent: Box<Sentence>,
    },
    Iff {
        left: Box<Sentence>,
        right: Box<Sentence>,
    },
    Forall {
        variables: Vec<Variable>,
        body: Box<Sentence>,
    },
    Exists {
        variables: Vec<Variable>,
        body: Box<Sentence>,
    },
    /// A reified probabilistic weight in `[0, 1]` on the wrapped sentence.
    Probability { weight: f64, inner: Box<Sentence> },
    /// An observed truth value used to condition probabilistic inference.
    Evidence { positive: bool, inner: Box<Sentence> },
}

impl Sentence {
    pub fn term(term: Term) -> Self {
        Sentence::Term(term)
    }

    pub fn negate(inner: Sentence) -> Self {
        Sentence::Not(Box::new(inner))
    }

    pub fn and(operands: Vec<Sentence>) -> Self {
        Sentence::And(operands)
    }

    pub fn or(operands: Vec<Sentence>) -> Self {
        Sentence::Or(operands)
    }

    pub fn implies(antecedent: Sentence, consequent: Sentence) -> Self {
        Sentence::Implies {
            antecedent: Box::new(antecedent),
            consequent: Box::new(consequent),
        }
    }

    pub fn iff(left: Sentence, right: Sentence) -> Self {
        Sentence::Iff {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn forall(variables: Vec<Variable>, body: Sentence) -> Self {
        Sentence::Forall {
            variables,
            body: Box::new(body),
        }
    }

    pub fn exists(variables: Vec<Variable>, body: Sentence) -> Self {
        Sentence::Exists {
            variables,
            body: Box::new(body),
        }
    }

    pub fn probability(weight: f64, inner: Sentence) -> Self {
        Sentence::Probability {
            weight,
            inner: Box::new(inner),
        }
    }

    pub fn evidence(positive: bool, inner: Sentence) -> Self {
        Sentence::Evidence {
            positive,
            inner: Box::new(inner),
        }
    }

    pub fn as_term(&self) -> Option<&Term> {
        match self {
            Sentence::Term(t) => Some(t),
            _ => None,
        }
    }

    /// Names of the variables occurring free in this sentence.
    pub fn free_vars(&self) -> BTreeSet<String> {
        let mut free = BTreeSet::new();
        let mut bound = BTreeSet::new();
        collect_free(self, &mut bound, &mut free);
        free
    }

    /// Replace free variable occurrences by the mapped arguments, building a
    /// new tree. Quantifiers shadow: a bound name is never substituted under
    /// its binder.
    pub fn substitute(&self, map: &BTreeMap<String, Arg>) -> Sentence {
        match self {
            Sentence::Term(t) => Sentence::Term(substitute_term(t, map)),
            Sentence::Not(inner) => Sentence::negate(inner.substitute(map)),
            Sentence::And(ops) => Sentence::And(ops.iter().map(|s| s.substitute(map)).collect()),
            Sentence::Or(ops) => Sentence::Or(ops.iter().map(|s| s.substitute(map)).collect()),
            Sentence::Implies {
                antecedent,
                consequent,
            } => Sentence::implies(antecedent.substitute(map), consequent.substitute(map)),
            Sentence::Iff { left, right } => {
                Sentence::iff(left.substitute(map), right.substitute(map))
            }
            Sentence::Forall { variables, body } => {
                let shadowed = without_bound(map, variables);
                Sentence::forall(variables.clone(), body.substitute(&shadowed))
            }
            Sentence::Exists { variables, body } => {
                let shadowed = without_bound(map, variables);
                Sentence::exists(variables.clone(), body.substitute(&shadowed))
            }
            Sentence::Probability { weight, inner } => {
                Sentence::probability(*weight, inner.substitute(map))
            }
            Sentence::Evidence { positive, inner } => {
                Sentence::evidence(*positive, inner.substitute(map))
            }
        }
    }
}

impl From<Term> for Sentence {
    fn from(term: Term) -> Self {
        Sentence::Term(term)
    }
}

fn substitute_term(term: &Term, map: &BTreeMap<String, Arg>) -> Term {
    let args = term
        .args
        .iter()
        .map(|arg| match arg {
            Arg::Var(v) => map.get(&v.name).cloned().unwrap_or_else(|| arg.clone()),
            Arg::Term(t) => Arg::Term(substitute_term(t, map)),
            Arg::Value(_) => arg.clone(),
        })
        .collect();
    Term::new(term.predicate.clone(), args)
}

fn without_bound(map: &BTreeMap<String, Arg>, bound: &[Variable]) -> BTreeMap<String, Arg> {
    let mut out = map.clone();
    for v in bound {
        out.remove(&v.name);
    }
    out
}

fn collect_free(
    sentence: &Sentence,
    bound: &mut BTreeSet<String>,
    free: &mut BTreeSet<String>,
) {
    match sentence {
        Sentence::Term(t) => {
            for v in t.variables() {
                if !bound.contains(&v.name) {
                    free.insert(v.name.clone());
                }
            }
        }
        Sentence::Not(inner)
        | Sentence::Probability { inner, .. }
        | Sentence::Evidence { inner, .. } => collect_free(inner, bound, free),
        Sentence::And(ops) | Sentence::Or(ops) => {
            for op in ops {
                collect_free(op, bound, free);
            }
        }
        Sentence::Implies {
            antecedent,
            consequent,
        } => {
            collect_free(antecedent, bound, free);
            collect_free(consequent, bound, free);
        }
        Sentence::Iff { left, right } => {
            collect_free(left, bound, free);
            collect_free(right, bound, free);
        }
        Sentence::Forall { variables, body } | Sentence::Exists { variables, body } => {
            let newly_bound: Vec<&Variable> = variables
                .iter()
                .filter(|v| bound.insert(v.name.clone()))
                .collect();
            collect_free(body, bound, free);
            for v in newly_bound {
                bound.remove(&v.name);
            }
        }
    }
}
