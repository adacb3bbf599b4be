//! S-expression reader.
//!
//! Reconstructs a [`Theory`] (or a single [`Sentence`]) from the canonical
//! encoding produced by [`crate::export::sexpr`]. The reconstruction is
//! structurally equal to the original; [`crate::import::verify_round_trip`]
//! checks exactly that.

use anyhow::{anyhow, bail, Context, Result};
use typelogic_ir::{
    Arg, GroupKind, PredicateDefinition, Sentence, SentenceGroup, Term, Theory, TypeDef, Value,
    Variable,
};

use crate::export::sexpr::Sexpr;

/// Parse a full theory.
pub fn parse_theory(input: &str) -> Result<Theory> {
    let sexpr = parse(input)?;
    decode_theory(&sexpr)
}

/// Parse a single sentence.
pub fn parse_sentence(input: &str) -> Result<Sentence> {
    let sexpr = parse(input)?;
    decode_sentence(&sexpr)
}

// ---------------------------------------------------------------------------
// Tokenizer and parser
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Token {
    LParen,
    RParen,
    Str(String),
    Atom(String),
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    let flush = |current: &mut String, tokens: &mut Vec<Token>| {
        if !current.is_empty() {
            tokens.push(Token::Atom(std::mem::take(current)));
        }
    };

    while let Some(ch) = chars.next() {
        match ch {
            '(' => {
                flush(&mut current, &mut tokens);
                tokens.push(Token::LParen);
            }
            ')' => {
                flush(&mut current, &mut tokens);
                tokens.push(Token::RParen);
            }
            '"' => {
                flush(&mut current, &mut tokens);
                // Collect the raw JSON string literal and let serde_json
                // handle the escapes.
                let mut raw = String::from('"');
                loop {
                    let Some(c) = chars.next() else {
                        bail!("Unterminated string literal");
                    };
                    raw.push(c);
                    if c == '\\' {
                        if let Some(escaped) = chars.next() {
                            raw.push(escaped);
                        }
                    } else if c == '"' {
                        break;
                    }
                }
                let decoded: String =
                    serde_json::from_str(&raw).context("Invalid string literal")?;
                tokens.push(Token::Str(decoded));
            }
            c if c.is_whitespace() => flush(&mut current, &mut tokens),
            _ => current.push(ch),
        }
    }
    flush(&mut current, &mut tokens);
    Ok(tokens)
}

fn parse(input: &str) -> Result<Sexpr> {
    let tokens = tokenize(input)?;
    let (sexpr, next) = parse_at(&tokens, 0)?;
    if next != tokens.len() {
        bail!("Trailing input after S-expression");
    }
    Ok(sexpr)
}

fn parse_at(tokens: &[Token], pos: usize) -> Result<(Sexpr, usize)> {
    match tokens.get(pos) {
        None => bail!("Unexpected end of input"),
        Some(Token::RParen) => bail!("Unexpected )"),
        Some(Token::Str(s)) => Ok((Sexpr::Str(s.clone()), pos + 1)),
        Some(Token::Atom(a)) => Ok((classify_atom(a), pos + 1)),
        Some(Token::LParen) => {
            let mut items = Vec::new();
            let mut cursor = pos + 1;
            loop {
                match tokens.get(cursor) {
                    None => bail!("Unclosed ("),
                    Some(Token::RParen) => return Ok((Sexpr::List(items), cursor + 1)),
                    _ => {
                        let (item, next) = parse_at(tokens, cursor)?;
                        items.push(item);
                        cursor = next;
                    }
                }
            }
        }
    }
}

fn classify_atom(atom: &str) -> Sexpr {
    match atom {
        "null" => Sexpr::Null,
        "true" => Sexpr::Bool(true),
        "false" => Sexpr::Bool(false),
        _ => {
            if let Ok(n) = atom.parse::<i64>() {
                Sexpr::Int(n)
            } else if let Ok(x) = atom.parse::<f64>() {
                Sexpr::Float(x)
            } else {
                Sexpr::Atom(atom.to_string())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

fn tagged_items<'a>(sexpr: &'a Sexpr, tag: &str) -> Result<&'a [Sexpr]> {
    let Sexpr::List(items) = sexpr else {
        bail!("Expected ({} …), got an atom", tag);
    };
    match items.first() {
        Some(Sexpr::Atom(a)) if a == tag => Ok(&items[1..]),
        Some(Sexpr::Atom(a)) => bail!("Expected ({} …), got ({} …)", tag, a),
        _ => bail!("Expected ({} …)", tag),
    }
}

fn expect_str(sexpr: &Sexpr, what: &str) -> Result<String> {
    match sexpr {
        Sexpr::Str(s) => Ok(s.clone()),
        other => bail!("Expected {} as string, got {:?}", what, other),
    }
}

fn decode_theory(sexpr: &Sexpr) -> Result<Theory> {
    let sections = tagged_items(sexpr, "Theory")?;
    let mut theory = Theory::default();
    for section in sections {
        let Sexpr::List(items) = section else {
            bail!("Expected a (label …) theory section");
        };
        let Some(Sexpr::Atom(label)) = items.first() else {
            bail!("Theory section without a label");
        };
        let rest = &items[1..];
        match label.as_str() {
            "name" => {
                theory.name = expect_str(
                    rest.first().ok_or_else(|| anyhow!("Empty name section"))?,
                    "theory name",
                )?;
            }
            "types" => {
                for item in rest {
                    let (name, def) = decode_type(item)?;
                    theory.registry.declare_type(name, def)?;
                }
            }
            "predicates" => {
                for item in rest {
                    theory.registry.declare_predicate(decode_predicate(item)?)?;
                }
            }
            "groups" => {
                for item in rest {
                    theory.groups.push(decode_group(item)?);
                }
            }
            "facts" => {
                for item in rest {
                    theory.add_fact(decode_term(item)?)?;
                }
            }
            "annotations" => {
                for item in rest {
                    let Sexpr::List(pair) = item else {
                        bail!("Expected (key value) annotation");
                    };
                    let [k, v] = pair.as_slice() else {
                        bail!("Expected (key value) annotation");
                    };
                    theory.annotate(expect_str(k, "key")?, expect_str(v, "value")?);
                }
            }
            other => bail!("Unknown theory section {}", other),
        }
    }
    Ok(theory)
}

fn decode_type(sexpr: &Sexpr) -> Result<(String, TypeDef)> {
    let items = tagged_items(sexpr, "Type")?;
    let [name, def] = items else {
        bail!("Expected (Type name def)");
    };
    let name = expect_str(name, "type name")?;
    let def = match def {
        Sexpr::Str(target) => TypeDef::Primitive(target.clone()),
        list => {
            let alternatives = tagged_items(list, "Union")?
                .iter()
                .map(|alt| expect_str(alt, "union member"))
                .collect::<Result<Vec<_>>>()?;
            TypeDef::Union(alternatives)
        }
    };
    Ok((name, def))
}

fn decode_predicate(sexpr: &Sexpr) -> Result<PredicateDefinition> {
    let items = tagged_items(sexpr, "PredicateDefinition")?;
    let [name, arguments, description, parents] = items else {
        bail!("Expected (PredicateDefinition name args description parents)");
    };
    let Sexpr::List(argument_items) = arguments else {
        bail!("Expected argument list");
    };
    let mut pd = PredicateDefinition::new(expect_str(name, "predicate")?, Vec::new());
    for item in argument_items {
        let Sexpr::List(pair) = item else {
            bail!("Expected (arg type) pair");
        };
        let [arg, typ] = pair.as_slice() else {
            bail!("Expected (arg type) pair");
        };
        pd.arguments
            .insert(expect_str(arg, "argument")?, expect_str(typ, "type")?);
    }
    pd.description = match description {
        Sexpr::Null => None,
        other => Some(expect_str(other, "description")?),
    };
    let Sexpr::List(parent_items) = parents else {
        bail!("Expected parent list");
    };
    pd.parents = parent_items
        .iter()
        .map(|p| expect_str(p, "parent"))
        .collect::<Result<Vec<_>>>()?;
    Ok(pd)
}

fn decode_group(sexpr: &Sexpr) -> Result<SentenceGroup> {
    let items = tagged_items(sexpr, "SentenceGroup")?;
    let [name, kind, docstring, sentences] = items else {
        bail!("Expected (SentenceGroup name kind docstring sentences)");
    };
    let mut group = SentenceGroup::new(expect_str(name, "group name")?, Vec::new());
    group.kind = match kind {
        Sexpr::Null => None,
        Sexpr::Str(s) if s == "axiom" => Some(GroupKind::Axiom),
        Sexpr::Str(s) if s == "goal" => Some(GroupKind::Goal),
        other => bail!("Unknown group kind {:?}", other),
    };
    group.docstring = match docstring {
        Sexpr::Null => None,
        other => Some(expect_str(other, "docstring")?),
    };
    let Sexpr::List(sentence_items) = sentences else {
        bail!("Expected sentence list");
    };
    group.sentences = sentence_items
        .iter()
        .map(decode_sentence)
        .collect::<Result<Vec<_>>>()?;
    Ok(group)
}

fn decode_variable(sexpr: &Sexpr) -> Result<Variable> {
    let items = tagged_items(sexpr, "Variable")?;
    match items {
        [name] => Ok(Variable::new(expect_str(name, "variable name")?)),
        [name, domain] => Ok(Variable::typed(
            expect_str(name, "variable name")?,
            expect_str(domain, "variable domain")?,
        )),
        _ => bail!("Expected (Variable name domain?)"),
    }
}

fn decode_term(sexpr: &Sexpr) -> Result<Term> {
    let items = tagged_items(sexpr, "Term")?;
    let Some(predicate) = items.first() else {
        bail!("Term without a predicate");
    };
    let args = items[1..]
        .iter()
        .map(decode_arg)
        .collect::<Result<Vec<_>>>()?;
    Ok(Term::new(expect_str(predicate, "predicate")?, args))
}

fn decode_arg(sexpr: &Sexpr) -> Result<Arg> {
    match sexpr {
        Sexpr::Str(s) => Ok(Arg::Value(Value::Str(s.clone()))),
        Sexpr::Int(n) => Ok(Arg::Value(Value::Int(*n))),
        Sexpr::Float(x) => Ok(Arg::Value(Value::Float(*x))),
        Sexpr::Bool(b) => Ok(Arg::Value(Value::Bool(*b))),
        Sexpr::Null => Ok(Arg::Value(Value::Null)),
        Sexpr::List(items) => match items.first() {
            Some(Sexpr::Atom(tag)) if tag == "Variable" => Ok(Arg::Var(decode_variable(sexpr)?)),
            Some(Sexpr::Atom(tag)) if tag == "Term" => Ok(Arg::Term(decode_term(sexpr)?)),
            _ => bail!("Unknown term argument {:?}", sexpr),
        },
        Sexpr::Atom(a) => bail!("Unknown term argument atom {}", a),
    }
}

fn decode_binder(sexpr: &Sexpr) -> Result<Vec<Variable>> {
    let Sexpr::List(items) = sexpr else {
        bail!("Expected a bound-variable list");
    };
    items.iter().map(decode_variable).collect()
}

fn decode_weight(sexpr: &Sexpr) -> Result<f64> {
    match sexpr {
        Sexpr::Float(x) => Ok(*x),
        Sexpr::Int(n) => Ok(*n as f64),
        other => bail!("Expected numeric weight, got {:?}", other),
    }
}

pub(crate) fn decode_sentence(sexpr: &Sexpr) -> Result<Sentence> {
    let Sexpr::List(items) = sexpr else {
        bail!("Expected a sentence, got {:?}", sexpr);
    };
    let Some(Sexpr::Atom(tag)) = items.first() else {
        bail!("Sentence without a tag");
    };
    let rest = &items[1..];
    match tag.as_str() {
        "Term" => Ok(Sentence::Term(decode_term(sexpr)?)),
        "Not" => {
            let [inner] = rest else {
                bail!("Expected (Not sentence)");
            };
            Ok(Sentence::negate(decode_sentence(inner)?))
        }
        "And" => Ok(Sentence::And(
            rest.iter().map(decode_sentence).collect::<Result<_>>()?,
        )),
        "Or" => Ok(Sentence::Or(
            rest.iter().map(decode_sentence).collect::<Result<_>>()?,
        )),
        "Implies" => {
            let [antecedent, consequent] = rest else {
                bail!("Expected (Implies antecedent consequent)");
            };
            Ok(Sentence::implies(
                decode_sentence(antecedent)?,
                decode_sentence(consequent)?,
            ))
        }
        "Iff" => {
            let [left, right] = rest else {
                bail!("Expected (Iff left right)");
            };
            Ok(Sentence::iff(decode_sentence(left)?, decode_sentence(right)?))
        }
        "Forall" => {
            let [binder, body] = rest else {
                bail!("Expected (Forall (vars…) body)");
            };
            Ok(Sentence::forall(decode_binder(binder)?, decode_sentence(body)?))
        }
        "Exists" => {
            let [binder, body] = rest else {
                bail!("Expected (Exists (vars…) body)");
            };
            Ok(Sentence::exists(decode_binder(binder)?, decode_sentence(body)?))
        }
        "Probability" => {
            let [weight, inner] = rest else {
                bail!("Expected (Probability weight sentence)");
            };
            Ok(Sentence::probability(
                decode_weight(weight)?,
                decode_sentence(inner)?,
            ))
        }
        "Evidence" => {
            let [polarity, inner] = rest else {
                bail!("Expected (Evidence polarity sentence)");
            };
            let Sexpr::Bool(positive) = polarity else {
                bail!("Expected boolean polarity");
            };
            Ok(Sentence::evidence(*positive, decode_sentence(inner)?))
        }
        other => bail!("Unknown sentence tag {}", other),
    }
}
