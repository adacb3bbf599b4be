//! S-expression emitter: one of the two canonical interchange formats.
//!
//! Every variant of the data model renders through one fixed,
//! type-tag-prefixed encoding — `(Forall ((Variable "x" "str")) body)`,
//! `(Term "Link" (Variable "x") "CA")` — with no lossy normalization.
//! The matching reader in [`crate::import::sexpr`] reconstructs a
//! structurally equal theory.

use anyhow::Result;
use typelogic_ir::{
    Arg, GroupKind, PredicateDefinition, Sentence, SentenceGroup, Term, Theory, TypeDef, Value,
    Variable,
};

use crate::export::{Backend, EmitResult};

/// Parsed or to-be-rendered S-expression node.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Sexpr {
    Atom(String),
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    List(Vec<Sexpr>),
}

impl Sexpr {
    pub(crate) fn atom(name: &str) -> Sexpr {
        Sexpr::Atom(name.to_string())
    }

    pub(crate) fn str(value: &str) -> Sexpr {
        Sexpr::Str(value.to_string())
    }

    fn tagged(tag: &str, mut items: Vec<Sexpr>) -> Sexpr {
        let mut list = vec![Sexpr::atom(tag)];
        list.append(&mut items);
        Sexpr::List(list)
    }
}

/// Render with nested lists on their own indented lines; atoms stay
/// inline with their parent.
pub(crate) fn render(sexpr: &Sexpr, position: usize, depth: usize) -> String {
    let mut out = String::new();
    if position > 0 {
        if let Sexpr::List(_) = sexpr {
            out.push('\n');
            for _ in 0..depth {
                out.push_str("  ");
            }
        }
    }
    match sexpr {
        Sexpr::List(items) => {
            out.push('(');
            for (i, item) in items.iter().enumerate() {
                let rendered = render(item, i, depth + 1);
                if i > 0 && !rendered.starts_with('\n') {
                    out.push(' ');
                }
                out.push_str(&rendered);
            }
            out.push(')');
            out
        }
        Sexpr::Atom(a) => a.clone(),
        Sexpr::Str(s) => serde_json::Value::String(s.clone()).to_string(),
        Sexpr::Int(n) => n.to_string(),
        Sexpr::Float(x) => super::clausal::format_float(*x),
        Sexpr::Bool(b) => b.to_string(),
        Sexpr::Null => "null".to_string(),
    }
}

fn value_sexpr(value: &Value) -> Sexpr {
    match value {
        Value::Str(s) => Sexpr::str(s),
        Value::Int(n) => Sexpr::Int(*n),
        Value::Float(x) => Sexpr::Float(*x),
        Value::Bool(b) => Sexpr::Bool(*b),
        Value::Null => Sexpr::Null,
    }
}

fn variable_sexpr(variable: &Variable) -> Sexpr {
    let mut items = vec![Sexpr::str(&variable.name)];
    if let Some(domain) = &variable.domain {
        items.push(Sexpr::str(domain));
    }
    Sexpr::tagged("Variable", items)
}

fn arg_sexpr(arg: &Arg) -> Sexpr {
    match arg {
        Arg::Var(v) => variable_sexpr(v),
        Arg::Value(v) => value_sexpr(v),
        Arg::Term(t) => term_sexpr(t),
    }
}

pub(crate) fn term_sexpr(term: &Term) -> Sexpr {
    let mut items = vec![Sexpr::str(&term.predicate)];
    items.extend(term.args.iter().map(arg_sexpr));
    Sexpr::tagged("Term", items)
}

fn binder_sexpr(variables: &[Variable]) -> Sexpr {
    Sexpr::List(variables.iter().map(variable_sexpr).collect())
}

pub(crate) fn sentence_sexpr(sentence: &Sentence) -> Sexpr {
    match sentence {
        Sentence::Term(t) => term_sexpr(t),
        Sentence::Not(inner) => Sexpr::tagged("Not", vec![sentence_sexpr(inner)]),
        Sentence::And(ops) => Sexpr::tagged("And", ops.iter().map(sentence_sexpr).collect()),
        Sentence::Or(ops) => Sexpr::tagged("Or", ops.iter().map(sentence_sexpr).collect()),
        Sentence::Implies {
            antecedent,
            consequent,
        } => Sexpr::tagged(
            "Implies",
            vec![sentence_sexpr(antecedent), sentence_sexpr(consequent)],
        ),
        Sentence::Iff { left, right } => {
            Sexpr::tagged("Iff", vec![sentence_sexpr(left), sentence_sexpr(right)])
        }
        Sentence::Forall { variables, body } => Sexpr::tagged(
            "Forall",
            vec![binder_sexpr(variables), sentence_sexpr(body)],
        ),
        Sentence::Exists { variables, body } => Sexpr::tagged(
            "Exists",
            vec![binder_sexpr(variables), sentence_sexpr(body)],
        ),
        Sentence::Probability { weight, inner } => Sexpr::tagged(
            "Probability",
            vec![Sexpr::Float(*weight), sentence_sexpr(inner)],
        ),
        Sentence::Evidence { positive, inner } => Sexpr::tagged(
            "Evidence",
            vec![Sexpr::Bool(*positive), sentence_sexpr(inner)],
        ),
    }
}

fn type_sexpr(name: &str, def: &TypeDef) -> Sexpr {
    let def_sexpr = match def {
        TypeDef::Primitive(target) => Sexpr::str(target),
        TypeDef::Union(alternatives) => Sexpr::tagged(
            "Union",
            alternatives.iter().map(|alt| Sexpr::str(alt)).collect(),
        ),
    };
    Sexpr::tagged("Type", vec![Sexpr::str(name), def_sexpr])
}

fn predicate_sexpr(pd: &PredicateDefinition) -> Sexpr {
    let arguments = Sexpr::List(
        pd.arguments
            .iter()
            .map(|(arg, typ)| Sexpr::List(vec![Sexpr::str(arg), Sexpr::str(typ)]))
            .collect(),
    );
    let description = match &pd.description {
        Some(text) => Sexpr::str(text),
        None => Sexpr::Null,
    };
    let parents = Sexpr::List(pd.parents.iter().map(|p| Sexpr::str(p)).collect());
    Sexpr::tagged(
        "PredicateDefinition",
        vec![Sexpr::str(&pd.predicate), arguments, description, parents],
    )
}

pub(crate) fn group_sexpr(group: &SentenceGroup) -> Sexpr {
    let kind = match group.kind {
        Some(GroupKind::Axiom) => Sexpr::str("axiom"),
        Some(GroupKind::Goal) => Sexpr::str("goal"),
        None => Sexpr::Null,
    };
    let docstring = match &group.docstring {
        Some(text) => Sexpr::str(text),
        None => Sexpr::Null,
    };
    let sentences = Sexpr::List(group.sentences.iter().map(sentence_sexpr).collect());
    Sexpr::tagged(
        "SentenceGroup",
        vec![Sexpr::str(&group.name), kind, docstring, sentences],
    )
}

pub(crate) fn theory_sexpr(theory: &Theory) -> Sexpr {
    let types = theory
        .registry
        .types()
        .map(|(name, def)| type_sexpr(name, def))
        .collect();
    let predicates = theory.registry.predicates().map(predicate_sexpr).collect();
    let groups = theory.groups.iter().map(group_sexpr).collect();
    let facts = theory.facts.iter().map(term_sexpr).collect();
    let annotations = theory
        .annotations
        .iter()
        .map(|(k, v)| Sexpr::List(vec![Sexpr::str(k), Sexpr::str(v)]))
        .collect();
    Sexpr::tagged(
        "Theory",
        vec![
            Sexpr::tagged("name", vec![Sexpr::str(&theory.name)]),
            Sexpr::tagged("types", types),
            Sexpr::tagged("predicates", predicates),
            Sexpr::tagged("groups", groups),
            Sexpr::tagged("facts", facts),
            Sexpr::tagged("annotations", annotations),
        ],
    )
}

pub struct SexprBackend;

impl Backend for SexprBackend {
    fn suffix(&self) -> &'static str {
        "sexpr"
    }

    fn emit(&self, theory: &Theory) -> Result<EmitResult> {
        Ok(EmitResult {
            text: render(&theory_sexpr(theory), 0, 0),
            diagnostics: Vec::new(),
        })
    }

    fn compile_group(&self, _theory: &Theory, group: &SentenceGroup) -> Result<String> {
        Ok(render(&group_sexpr(group), 0, 0))
    }
}
