//! Structured-record emitter: the second canonical interchange format.
//!
//! Renders the whole theory as type-tagged JSON records —
//! `{"type": "Implies", "arguments": […]}` — mirrored exactly by the
//! reader in [`crate::import::record`].

use anyhow::Result;
use serde_json::{json, Map, Value as Json};
use typelogic_ir::{
    Arg, GroupKind, PredicateDefinition, Sentence, SentenceGroup, Term, Theory, TypeDef, Value,
};

use crate::export::{Backend, EmitResult};

fn value_json(value: &Value) -> Json {
    match value {
        Value::Str(s) => json!(s),
        Value::Int(n) => json!(n),
        Value::Float(x) => json!(x),
        Value::Bool(b) => json!(b),
        Value::Null => Json::Null,
    }
}

fn arg_json(arg: &Arg) -> Json {
    match arg {
        Arg::Var(v) => {
            let mut arguments = vec![json!(v.name)];
            if let Some(domain) = &v.domain {
                arguments.push(json!(domain));
            }
            json!({"type": "Variable", "arguments": arguments})
        }
        Arg::Value(v) => value_json(v),
        Arg::Term(t) => term_json(t),
    }
}

pub(crate) fn term_json(term: &Term) -> Json {
    let mut arguments = vec![json!(term.predicate)];
    arguments.extend(term.args.iter().map(arg_json));
    json!({"type": "Term", "arguments": arguments})
}

pub(crate) fn sentence_json(sentence: &Sentence) -> Json {
    let (tag, arguments): (&str, Vec<Json>) = match sentence {
        Sentence::Term(t) => return term_json(t),
        Sentence::Not(inner) => ("Not", vec![sentence_json(inner)]),
        Sentence::And(ops) => ("And", ops.iter().map(sentence_json).collect()),
        Sentence::Or(ops) => ("Or", ops.iter().map(sentence_json).collect()),
        Sentence::Implies {
            antecedent,
            consequent,
        } => (
            "Implies",
            vec![sentence_json(antecedent), sentence_json(consequent)],
        ),
        Sentence::Iff { left, right } => {
            ("Iff", vec![sentence_json(left), sentence_json(right)])
        }
        Sentence::Forall { variables, body } => (
            "Forall",
            vec![
                Json::Array(variables.iter().map(|v| arg_json(&Arg::Var(v.clone()))).collect()),
                sentence_json(body),
            ],
        ),
        Sentence::Exists { variables, body } => (
            "Exists",
            vec![
                Json::Array(variables.iter().map(|v| arg_json(&Arg::Var(v.clone()))).collect()),
                sentence_json(body),
            ],
        ),
        Sentence::Probability { weight, inner } => {
            ("Probability", vec![json!(weight), sentence_json(inner)])
        }
        Sentence::Evidence { positive, inner } => {
            ("Evidence", vec![json!(positive), sentence_json(inner)])
        }
    };
    json!({"type": tag, "arguments": arguments})
}

fn type_json(name: &str, def: &TypeDef) -> Json {
    let def_json = match def {
        TypeDef::Primitive(target) => json!(target),
        TypeDef::Union(alternatives) => json!(alternatives),
    };
    json!({"type": "Type", "name": name, "def": def_json})
}

fn predicate_json(pd: &PredicateDefinition) -> Json {
    let arguments: Vec<Json> = pd
        .arguments
        .iter()
        .map(|(arg, typ)| json!([arg, typ]))
        .collect();
    json!({
        "type": "PredicateDefinition",
        "predicate": pd.predicate,
        "arguments": arguments,
        "description": pd.description,
        "parents": pd.parents,
    })
}

pub(crate) fn group_json(group: &SentenceGroup) -> Json {
    let kind = match group.kind {
        Some(GroupKind::Axiom) => json!("axiom"),
        Some(GroupKind::Goal) => json!("goal"),
        None => Json::Null,
    };
    json!({
        "type": "SentenceGroup",
        "name": group.name,
        "kind": kind,
        "docstring": group.docstring,
        "sentences": group.sentences.iter().map(sentence_json).collect::<Vec<_>>(),
    })
}

pub(crate) fn theory_json(theory: &Theory) -> Json {
    let mut annotations = Map::new();
    for (k, v) in &theory.annotations {
        annotations.insert(k.clone(), json!(v));
    }
    json!({
        "type": "Theory",
        "name": theory.name,
        "types": theory
            .registry
            .types()
            .map(|(name, def)| type_json(name, def))
            .collect::<Vec<_>>(),
        "predicates": theory.registry.predicates().map(predicate_json).collect::<Vec<_>>(),
        "groups": theory.groups.iter().map(group_json).collect::<Vec<_>>(),
        "facts": theory.facts.iter().map(term_json).collect::<Vec<_>>(),
        "annotations": annotations,
    })
}

pub struct RecordBackend;

impl Backend for RecordBackend {
    fn suffix(&self) -> &'static str {
        "json"
    }

    fn emit(&self, theory: &Theory) -> Result<EmitResult> {
        Ok(EmitResult {
            text: serde_json::to_string_pretty(&theory_json(theory))?,
            diagnostics: Vec::new(),
        })
    }

    fn compile_group(&self, _theory: &Theory, group: &SentenceGroup) -> Result<String> {
        Ok(serde_json::to_string_pretty(&group_json(group))?)
    }
}
