//! Structured-record reader: decodes the type-tagged JSON produced by
//! [`crate::export::record`] back into a [`Theory`].

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value as Json;
use typelogic_ir::{
    Arg, GroupKind, PredicateDefinition, Sentence, SentenceGroup, Term, Theory, TypeDef, Value,
    Variable,
};

/// Parse a full theory from record-format JSON.
pub fn parse_theory(input: &str) -> Result<Theory> {
    let json: Json = serde_json::from_str(input).context("Invalid record JSON")?;
    decode_theory(&json)
}

/// Parse a single sentence from record-format JSON.
pub fn parse_sentence(input: &str) -> Result<Sentence> {
    let json: Json = serde_json::from_str(input).context("Invalid record JSON")?;
    decode_sentence(&json)
}

fn type_tag<'a>(json: &'a Json) -> Result<&'a str> {
    json.get("type")
        .and_then(Json::as_str)
        .ok_or_else(|| anyhow!("Record without a type tag: {}", json))
}

fn arguments<'a>(json: &'a Json) -> Result<&'a Vec<Json>> {
    json.get("arguments")
        .and_then(Json::as_array)
        .ok_or_else(|| anyhow!("Record without arguments: {}", json))
}

fn expect_str(json: &Json, what: &str) -> Result<String> {
    json.as_str()
        .map(String::from)
        .ok_or_else(|| anyhow!("Expected {} as string, got {}", what, json))
}

fn decode_theory(json: &Json) -> Result<Theory> {
    if type_tag(json)? != "Theory" {
        bail!("Expected a Theory record");
    }
    let mut theory = Theory::default();
    theory.name = expect_str(&json["name"], "theory name")?;
    for item in json["types"].as_array().into_iter().flatten() {
        let (name, def) = decode_type(item)?;
        theory.registry.declare_type(name, def)?;
    }
    for item in json["predicates"].as_array().into_iter().flatten() {
        theory.registry.declare_predicate(decode_predicate(item)?)?;
    }
    for item in json["groups"].as_array().into_iter().flatten() {
        theory.groups.push(decode_group(item)?);
    }
    for item in json["facts"].as_array().into_iter().flatten() {
        theory.add_fact(decode_term(item)?)?;
    }
    if let Some(annotations) = json["annotations"].as_object() {
        for (k, v) in annotations {
            theory.annotate(k, expect_str(v, "annotation value")?);
        }
    }
    Ok(theory)
}

fn decode_type(json: &Json) -> Result<(String, TypeDef)> {
    if type_tag(json)? != "Type" {
        bail!("Expected a Type record");
    }
    let name = expect_str(&json["name"], "type name")?;
    let def = match &json["def"] {
        Json::String(target) => TypeDef::Primitive(target.clone()),
        Json::Array(alternatives) => TypeDef::Union(
            alternatives
                .iter()
                .map(|alt| expect_str(alt, "union member"))
                .collect::<Result<Vec<_>>>()?,
        ),
        other => bail!("Unknown type definition {}", other),
    };
    Ok((name, def))
}

fn decode_predicate(json: &Json) -> Result<PredicateDefinition> {
    if type_tag(json)? != "PredicateDefinition" {
        bail!("Expected a PredicateDefinition record");
    }
    let mut pd = PredicateDefinition::new(expect_str(&json["predicate"], "predicate")?, Vec::new());
    for pair in json["arguments"].as_array().into_iter().flatten() {
        let Some([arg, typ]) = pair.as_array().map(Vec::as_slice) else {
            bail!("Expected [arg, type] pair, got {}", pair);
        };
        pd.arguments
            .insert(expect_str(arg, "argument")?, expect_str(typ, "type")?);
    }
    pd.description = match &json["description"] {
        Json::Null => None,
        other => Some(expect_str(other, "description")?),
    };
    pd.parents = json["parents"]
        .as_array()
        .into_iter()
        .flatten()
        .map(|p| expect_str(p, "parent"))
        .collect::<Result<Vec<_>>>()?;
    Ok(pd)
}

fn decode_group(json: &Json) -> Result<SentenceGroup> {
    if type_tag(json)? != "SentenceGroup" {
        bail!("Expected a SentenceGroup record");
    }
    let mut group = SentenceGroup::new(expect_str(&json["name"], "group name")?, Vec::new());
    group.kind = match &json["kind"] {
        Json::Null => None,
        Json::String(s) if s == "axiom" => Some(GroupKind::Axiom),
        Json::String(s) if s == "goal" => Some(GroupKind::Goal),
        other => bail!("Unknown group kind {}", other),
    };
    group.docstring = match &json["docstring"] {
        Json::Null => None,
        other => Some(expect_str(other, "docstring")?),
    };
    group.sentences = json["sentences"]
        .as_array()
        .into_iter()
        .flatten()
        .map(decode_sentence)
        .collect::<Result<Vec<_>>>()?;
    Ok(group)
}

fn decode_value(json: &Json) -> Result<Value> {
    match json {
        Json::String(s) => Ok(Value::Str(s.clone())),
        Json::Bool(b) => Ok(Value::Bool(*b)),
        Json::Null => Ok(Value::Null),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else {
                Ok(Value::Float(n.as_f64().ok_or_else(|| {
                    anyhow!("Unrepresentable number {}", n)
                })?))
            }
        }
        other => bail!("Expected literal value, got {}", other),
    }
}

fn decode_variable(json: &Json) -> Result<Variable> {
    let args = arguments(json)?;
    match args.as_slice() {
        [name] => Ok(Variable::new(expect_str(name, "variable name")?)),
        [name, domain] => Ok(Variable::typed(
            expect_str(name, "variable name")?,
            expect_str(domain, "variable domain")?,
        )),
        _ => bail!("Expected Variable with one or two arguments"),
    }
}

fn decode_arg(json: &Json) -> Result<Arg> {
    if json.is_object() {
        return match type_tag(json)? {
            "Variable" => Ok(Arg::Var(decode_variable(json)?)),
            "Term" => Ok(Arg::Term(decode_term(json)?)),
            other => bail!("Unknown term argument type {}", other),
        };
    }
    Ok(Arg::Value(decode_value(json)?))
}

fn decode_term(json: &Json) -> Result<Term> {
    if type_tag(json)? != "Term" {
        bail!("Expected a Term record");
    }
    let args = arguments(json)?;
    let Some(predicate) = args.first() else {
        bail!("Term without a predicate");
    };
    let decoded = args[1..]
        .iter()
        .map(decode_arg)
        .collect::<Result<Vec<_>>>()?;
    Ok(Term::new(expect_str(predicate, "predicate")?, decoded))
}

fn decode_binder(json: &Json) -> Result<Vec<Variable>> {
    json.as_array()
        .ok_or_else(|| anyhow!("Expected a bound-variable list"))?
        .iter()
        .map(decode_variable)
        .collect()
}

fn decode_sentence(json: &Json) -> Result<Sentence> {
    let args = arguments(json)?;
    match type_tag(json)? {
        "Term" => Ok(Sentence::Term(decode_term(json)?)),
        "Not" => {
            let [inner] = args.as_slice() else {
                bail!("Expected Not with one argument");
            };
            Ok(Sentence::negate(decode_sentence(inner)?))
        }
        "And" => Ok(Sentence::And(
            args.iter().map(decode_sentence).collect::<Result<_>>()?,
        )),
        "Or" => Ok(Sentence::Or(
            args.iter().map(decode_sentence).collect::<Result<_>>()?,
        )),
        "Implies" => {
            let [antecedent, consequent] = args.as_slice() else {
                bail!("Expected Implies with two arguments");
            };
            Ok(Sentence::implies(
                decode_sentence(antecedent)?,
                decode_sentence(consequent)?,
            ))
        }
        "Iff" => {
            let [left, right] = args.as_slice() else {
                bail!("Expected Iff with two arguments");
            };
            Ok(Sentence::iff(
                decode_sentence(left)?,
                decode_sentence(right)?,
            ))
        }
        "Forall" => {
            let [binder, body] = args.as_slice() else {
                bail!("Expected Forall with two arguments");
            };
            Ok(Sentence::forall(
                decode_binder(binder)?,
                decode_sentence(body)?,
            ))
        }
        "Exists" => {
            let [binder, body] = args.as_slice() else {
                bail!("Expected Exists with two arguments");
            };
            Ok(Sentence::exists(
                decode_binder(binder)?,
                decode_sentence(body)?,
            ))
        }
        "Probability" => {
            let [weight, inner] = args.as_slice() else {
                bail!("Expected Probability with two arguments");
            };
            let weight = weight
                .as_f64()
                .ok_or_else(|| anyhow!("Expected numeric weight"))?;
            Ok(Sentence::probability(weight, decode_sentence(inner)?))
        }
        "Evidence" => {
            let [polarity, inner] = args.as_slice() else {
                bail!("Expected Evidence with two arguments");
            };
            let positive = polarity
                .as_bool()
                .ok_or_else(|| anyhow!("Expected boolean polarity"))?;
            Ok(Sentence::evidence(positive, decode_sentence(inner)?))
        }
        other => bail!("Unknown sentence type {}", other),
    }
}
