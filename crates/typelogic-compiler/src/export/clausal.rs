//! Shared clause rendering for the Prolog-family targets.
//!
//! Prolog, Souffle, and ProbLog read the same flat clauses; the lexical
//! differences live in [`ClauseConfig`].

use typelogic_ir::{Arg, IrError, Term, Value};

use crate::config::{AtomCase, ClauseConfig};
use crate::normalize::{Clause, Literal};

/// Render a full clause, without the trailing period.
pub fn render_clause(clause: &Clause, config: &ClauseConfig) -> Result<String, IrError> {
    let heads = clause
        .heads
        .iter()
        .map(|h| render_term(h, config))
        .collect::<Result<Vec<_>, _>>()?
        .join("; ");
    if clause.body.is_empty() {
        return Ok(heads);
    }
    let body = clause
        .body
        .iter()
        .map(|lit| render_literal(lit, config))
        .collect::<Result<Vec<_>, _>>()?
        .join(", ");
    if clause.heads.is_empty() {
        Ok(format!(":- {}", body))
    } else {
        Ok(format!("{} :- {}", heads, body))
    }
}

pub fn render_literal(literal: &Literal, config: &ClauseConfig) -> Result<String, IrError> {
    let term = render_term(&literal.term, config)?;
    if literal.positive {
        Ok(term)
    } else if config.parenthesize_negation {
        Ok(format!("{} ({})", config.negation, term))
    } else {
        Ok(format!("{} {}", config.negation, term))
    }
}

pub fn render_term(term: &Term, config: &ClauseConfig) -> Result<String, IrError> {
    if let Some(op) = config.infix_operator(&term.predicate) {
        match term.args.as_slice() {
            [left, right] => {
                return Ok(format!(
                    "{} {} {}",
                    render_arg(left, config)?,
                    op,
                    render_arg(right, config)?
                ))
            }
            [only] => return Ok(format!("{} {}", op, render_arg(only, config)?)),
            _ => {}
        }
    }
    let name = atom_name(&term.predicate, config);
    if term.args.is_empty() && !config.parens_for_zero_args {
        return Ok(name);
    }
    let args = term
        .args
        .iter()
        .map(|arg| render_arg(arg, config))
        .collect::<Result<Vec<_>, _>>()?
        .join(", ");
    Ok(format!("{}({})", name, args))
}

pub fn render_arg(arg: &Arg, config: &ClauseConfig) -> Result<String, IrError> {
    match arg {
        Arg::Var(v) => Ok(var_name(&v.name, config)),
        Arg::Value(value) => Ok(render_value(value, config)),
        Arg::Term(inner) => {
            if !config.allow_function_terms {
                return Err(IrError::FunctionTermNotSupported {
                    term: inner.to_string(),
                });
            }
            render_term(inner, config)
        }
    }
}

pub fn render_value(value: &Value, config: &ClauseConfig) -> String {
    match value {
        Value::Str(s) => {
            if config.double_quote_strings {
                format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
            } else if is_plain_atom(s) {
                s.clone()
            } else {
                format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
            }
        }
        Value::Int(n) => n.to_string(),
        Value::Float(x) => format_float(*x),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
    }
}

/// A string that already reads as an unquoted atom: lowercase start,
/// identifier characters only.
fn is_plain_atom(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn atom_name(predicate: &str, config: &ClauseConfig) -> String {
    match config.atom_case {
        AtomCase::Lower => predicate.to_lowercase(),
        AtomCase::Preserve => predicate.to_string(),
    }
}

pub fn var_name(name: &str, config: &ClauseConfig) -> String {
    if !config.capitalize_vars {
        return name.to_string();
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(crate) fn format_float(x: f64) -> String {
    if x.fract() == 0.0 && x.is_finite() {
        format!("{:.1}", x)
    } else {
        format!("{}", x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClauseConfig;
    use typelogic_ir::Arg;

    #[test]
    fn test_prolog_rule_rendering() {
        let clause = Clause::rule(
            Term::new("Path", vec![Arg::var("x"), Arg::var("y")]),
            vec![Literal::pos(Term::new(
                "Link",
                vec![Arg::var("x"), Arg::var("y")],
            ))],
        );
        assert_eq!(
            render_clause(&clause, &ClauseConfig::prolog()).unwrap(),
            "path(X, Y) :- link(X, Y)"
        );
    }

    #[test]
    fn test_negation_rendering_per_target() {
        let lit = Literal::neg(Term::new("P", vec![Arg::var("x")]));
        assert_eq!(
            render_literal(&lit, &ClauseConfig::prolog()).unwrap(),
            r"\+ (p(X))"
        );
        assert_eq!(
            render_literal(&lit, &ClauseConfig::souffle()).unwrap(),
            "!P(x)"
        );
    }

    #[test]
    fn test_string_quoting() {
        let prolog = ClauseConfig::prolog();
        assert_eq!(render_value(&Value::str("CA"), &prolog), "'CA'");
        assert_eq!(render_value(&Value::str("abc"), &prolog), "abc");
        assert_eq!(render_value(&Value::str("has space"), &prolog), "'has space'");
        let souffle = ClauseConfig::souffle();
        assert_eq!(render_value(&Value::str("CA"), &souffle), "\"CA\"");
    }

    #[test]
    fn test_infix_comparison() {
        let term = Term::new("ge", vec![Arg::var("v"), Arg::int(90)]);
        assert_eq!(
            render_term(&term, &ClauseConfig::prolog()).unwrap(),
            "V >= 90"
        );
    }

    #[test]
    fn test_nested_function_term() {
        let term = Term::new(
            "Diagnosis",
            vec![Arg::Term(Term::new(
                "Code",
                vec![Arg::str("ICD10"), Arg::str("E11")],
            ))],
        );
        assert_eq!(
            render_term(&term, &ClauseConfig::prolog()).unwrap(),
            "diagnosis(code('ICD10', 'E11'))"
        );
        assert!(matches!(
            render_term(&term, &ClauseConfig::souffle()),
            Err(IrError::FunctionTermNotSupported { .. })
        ));
    }

    #[test]
    fn test_constraint_rendering() {
        let clause = Clause::constraint(vec![
            Literal::pos(Term::atom("A")),
            Literal::pos(Term::atom("B")),
        ]);
        assert_eq!(
            render_clause(&clause, &ClauseConfig::prolog()).unwrap(),
            ":- a, b"
        );
    }
}
