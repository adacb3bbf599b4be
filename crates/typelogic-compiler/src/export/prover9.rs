//! Prover9 emitter.
//!
//! Sentences partition into a `formulas(assumptions)` list (axiom-tagged
//! and untagged groups, ground facts, inferred subsumption axioms) and a
//! `formulas(goals)` list (goal-tagged groups). Bare string constants get
//! an `s_` prefix so they cannot parse as variables; floats become exact
//! rationals.

use anyhow::Result;
use typelogic_ir::{Arg, GroupKind, IrError, Sentence, SentenceGroup, Term, Theory, Value};

use crate::diagnostics::Diagnostic;
use crate::export::{to_rational, Backend, EmitResult};

pub struct Prover9Backend;

fn value_text(value: &Value) -> String {
    match value {
        Value::Str(s) => format!("s_{}", s.replace(' ', "_")),
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
        Arg::Var(v) => v.name.to_lowercase(),
        Arg::Value(value) => value_text(value),
        Arg::Term(t) => term_text(t),
    }
}

fn term_text(term: &Term) -> String {
    if term.args.is_empty() {
        return term.predicate.clone();
    }
    let args = term.args.iter().map(arg_text).collect::<Vec<_>>().join(", ");
    format!("{}({})", term.predicate, args)
}

fn formula(sentence: &Sentence) -> Result<String, IrError> {
    match sentence {
        Sentence::Term(t) => Ok(term_text(t)),
        Sentence::Not(inner) => Ok(format!("- ( {} )", formula(inner)?)),
        Sentence::And(ops) if ops.is_empty() => Ok("true".to_string()),
        Sentence::And(ops) => {
            let parts = ops.iter().map(formula).collect::<Result<Vec<_>, _>>()?;
            Ok(format!("({})", parts.join(" & ")))
        }
        Sentence::Or(ops) if ops.is_empty() => Ok("false".to_string()),
        Sentence::Or(ops) => {
            let parts = ops.iter().map(formula).collect::<Result<Vec<_>, _>>()?;
            Ok(format!("({})", parts.join(" | ")))
        }
        Sentence::Implies {
            antecedent,
            consequent,
        } => Ok(format!("({} -> {})", formula(antecedent)?, formula(consequent)?)),
        Sentence::Iff { left, right } => {
            Ok(format!("({} <-> {})", formula(left)?, formula(right)?))
        }
        Sentence::Forall { variables, body } => {
            let vars = variables
                .iter()
                .map(|v| v.name.to_lowercase())
                .collect::<Vec<_>>()
                .join(" ");
            Ok(format!("all {} ({})", vars, formula(body)?))
        }
        Sentence::Exists { variables, body } => {
            let vars = variables
                .iter()
                .map(|v| v.name.to_lowercase())
                .collect::<Vec<_>>()
                .join(" ");
            Ok(format!("exists {} ({})", vars, formula(body)?))
        }
        Sentence::Probability { .. } | Sentence::Evidence { .. } => {
            Err(IrError::UnsupportedAnnotation {
                sentence: sentence.to_string(),
            })
        }
    }
}

impl Backend for Prover9Backend {
    fn suffix(&self) -> &'static str {
        "prover9"
    }

    fn emit(&self, theory: &Theory) -> Result<EmitResult> {
        let mut lines = vec![format!("% Problem: {}", theory.name)];
        let mut diagnostics = Vec::new();

        lines.push("formulas(assumptions).".to_string());
        for group in &theory.groups {
            if group.kind == Some(GroupKind::Goal) {
                continue;
            }
            lines.push(format!("    % {}", group.name));
            for sentence in &group.sentences {
                match formula(sentence) {
                    Ok(text) => lines.push(format!("    {}.", text)),
                    Err(err) => {
                        let diagnostic = Diagnostic::from_error(sentence.to_string(), &err)
                            .with_group(&group.name);
                        lines.push(format!("    % skipped: {}", diagnostic.format()));
                        diagnostics.push(diagnostic);
                    }
                }
            }
        }
        for sentence in &theory.parent_axioms() {
            match formula(sentence) {
                Ok(text) => lines.push(format!("    {}.", text)),
                Err(err) => diagnostics.push(Diagnostic::from_error(sentence.to_string(), &err)),
            }
        }
        for fact in &theory.facts {
            lines.push(format!("    {}.", term_text(fact)));
        }
        lines.push("end_of_list.".to_string());
        lines.push(String::new());

        lines.push("formulas(goals).".to_string());
        for group in &theory.groups {
            if group.kind != Some(GroupKind::Goal) {
                continue;
            }
            lines.push(format!("    % {}", group.name));
            for sentence in &group.sentences {
                match formula(sentence) {
                    Ok(text) => lines.push(format!("    {}.", text)),
                    Err(err) => {
                        let diagnostic = Diagnostic::from_error(sentence.to_string(), &err)
                            .with_group(&group.name);
                        lines.push(format!("    % skipped: {}", diagnostic.format()));
                        diagnostics.push(diagnostic);
                    }
                }
            }
        }
        lines.push("end_of_list.".to_string());

        Ok(EmitResult {
            text: lines.join("\n"),
            diagnostics,
        })
    }

    fn compile_group(&self, _theory: &Theory, group: &SentenceGroup) -> Result<String> {
        let list = if group.kind == Some(GroupKind::Goal) {
            "goals"
        } else {
            "assumptions"
        };
        let mut lines = vec![format!("formulas({}).", list)];
        for sentence in &group.sentences {
            match formula(sentence) {
                Ok(text) => lines.push(format!("    {}.", text)),
                Err(err) => lines.push(format!("    % skipped: {}: {}", sentence, err)),
            }
        }
        lines.push("end_of_list.".to_string());
        Ok(lines.join("\n"))
    }
}
