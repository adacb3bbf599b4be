//! TPTP emitter (FOF syntax).
//!
//! Quantifiers are emitted explicitly, never stripped. Axiom-tagged and
//! untagged groups become `axiom` formulas, goal groups become
//! `conjecture` formulas. Floating-point literals are converted to exact
//! rationals so the prover never sees floating error.

use anyhow::Result;
use typelogic_ir::{Arg, IrError, Sentence, SentenceGroup, Term, Theory, Value};

use crate::diagnostics::Diagnostic;
use crate::export::{to_rational, Backend, EmitResult};

pub struct TptpBackend;

fn variable_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Str(s) => format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
        Value::Int(n) => n.to_string(),
        Value::Float(x) => {
            let (numerator, denominator) = to_rational(*x);
            format!("rational({},{})", numerator, denominator)
        }
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
    }
}

fn arg_text(arg: &Arg) -> String {
    match arg {
        Arg::Var(v) => variable_name(&v.name),
        Arg::Value(value) => value_text(value),
        Arg::Term(t) => term_text(t),
    }
}

fn term_text(term: &Term) -> String {
    let predicate = term.predicate.to_lowercase();
    if term.args.is_empty() {
        return predicate;
    }
    let args = term.args.iter().map(arg_text).collect::<Vec<_>>().join(", ");
    format!("{}({})", predicate, args)
}

fn formula(sentence: &Sentence) -> Result<String, IrError> {
    match sentence {
        Sentence::Term(t) => Ok(term_text(t)),
        Sentence::Not(inner) => Ok(format!("~{}", formula(inner)?)),
        Sentence::And(ops) if ops.is_empty() => Ok("$true".to_string()),
        Sentence::And(ops) => {
            let parts = ops.iter().map(formula).collect::<Result<Vec<_>, _>>()?;
            Ok(format!("({})", parts.join(" & ")))
        }
        Sentence::Or(ops) if ops.is_empty() => Ok("$false".to_string()),
        Sentence::Or(ops) => {
            let parts = ops.iter().map(formula).collect::<Result<Vec<_>, _>>()?;
            Ok(format!("({})", parts.join(" | ")))
        }
        Sentence::Implies {
            antecedent,
            consequent,
        } => Ok(format!("({} => {})", formula(antecedent)?, formula(consequent)?)),
        Sentence::Iff { left, right } => {
            Ok(format!("({} <=> {})", formula(left)?, formula(right)?))
        }
        Sentence::Forall { variables, body } => {
            let vars = variables
                .iter()
                .map(|v| variable_name(&v.name))
                .collect::<Vec<_>>()
                .join(", ");
            Ok(format!("! [{}] : {}", vars, formula(body)?))
        }
        Sentence::Exists { variables, body } => {
            let vars = variables
                .iter()
                .map(|v| variable_name(&v.name))
                .collect::<Vec<_>>()
                .join(", ");
            Ok(format!("? [{}] : {}", vars, formula(body)?))
        }
        Sentence::Probability { .. } | Sentence::Evidence { .. } => {
            Err(IrError::UnsupportedAnnotation {
                sentence: sentence.to_string(),
            })
        }
    }
}

impl Backend for TptpBackend {
    fn suffix(&self) -> &'static str {
        "tptp"
    }

    fn emit(&self, theory: &Theory) -> Result<EmitResult> {
        let mut lines = vec![format!("% Problem: {}", theory.name)];
        let mut diagnostics = Vec::new();
        let mut axiom_count = 0usize;
        let mut goal_count = 0usize;

        for group in &theory.groups {
            lines.push(format!("% {}", group.name));
            let is_goal = group.kind == Some(typelogic_ir::GroupKind::Goal);
            for sentence in &group.sentences {
                match formula(sentence) {
                    Ok(text) if is_goal => {
                        goal_count += 1;
                        lines.push(format!("fof(goal{}, conjecture, {}).", goal_count, text));
                    }
                    Ok(text) => {
                        axiom_count += 1;
                        lines.push(format!("fof(axiom{}, axiom, {}).", axiom_count, text));
                    }
                    Err(err) => {
                        let diagnostic = Diagnostic::from_error(sentence.to_string(), &err)
                            .with_group(&group.name);
                        lines.push(format!("% skipped: {}", diagnostic.format()));
                        diagnostics.push(diagnostic);
                    }
                }
            }
        }

        for sentence in &theory.parent_axioms() {
            match formula(sentence) {
                Ok(text) => {
                    axiom_count += 1;
                    lines.push(format!("fof(axiom{}, axiom, {}).", axiom_count, text));
                }
                Err(err) => {
                    diagnostics.push(Diagnostic::from_error(sentence.to_string(), &err));
                }
            }
        }

        for fact in &theory.facts {
            axiom_count += 1;
            lines.push(format!("fof(axiom{}, axiom, {}).", axiom_count, term_text(fact)));
        }

        Ok(EmitResult {
            text: lines.join("\n"),
            diagnostics,
        })
    }

    fn compile_group(&self, _theory: &Theory, group: &SentenceGroup) -> Result<String> {
        let mut lines = vec![format!("% {}", group.name)];
        let role = if group.kind == Some(typelogic_ir::GroupKind::Goal) {
            "conjecture"
        } else {
            "axiom"
        };
        let label = if role == "conjecture" { "goal" } else { "axiom" };
        for (i, sentence) in group.sentences.iter().enumerate() {
            match formula(sentence) {
                Ok(text) => lines.push(format!("fof({}{}, {}, {}).", label, i + 1, role, text)),
                Err(err) => lines.push(format!("% skipped: {}: {}", sentence, err)),
            }
        }
        Ok(lines.join("\n"))
    }
}
