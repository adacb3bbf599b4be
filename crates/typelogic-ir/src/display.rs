//! Mathematical-notation rendering, used by diagnostics and by the
//! untranslatable-sentence comments the clause backends emit.

use std::fmt;

use crate::sentence::Sentence;
use crate::term::{Arg, Term, Value, Variable};

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "'{}'", s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => write!(f, "null"),
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Var(v) => write!(f, "{}", v),
            Arg::Value(v) => write!(f, "{}", v),
            Arg::Term(t) => write!(f, "{}", t),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            return write!(f, "{}", self.predicate);
        }
        write!(f, "{}(", self.predicate)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}

fn join(f: &mut fmt::Formatter<'_>, ops: &[Sentence], sep: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, op) in ops.iter().enumerate() {
        if i > 0 {
            write!(f, " {} ", sep)?;
        }
        write!(f, "{}", op)?;
    }
    write!(f, ")")
}

fn bindings(vars: &[Variable]) -> String {
    vars.iter()
        .map(|v| match &v.domain {
            Some(d) => format!("{}:{}", v.name, d),
            None => v.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentence::Term(t) => write!(f, "{}", t),
            Sentence::Not(inner) => write!(f, "¬{}", inner),
            Sentence::And(ops) if ops.is_empty() => write!(f, "true"),
            Sentence::And(ops) => join(f, ops, "∧"),
            Sentence::Or(ops) if ops.is_empty() => write!(f, "false"),
            Sentence::Or(ops) => join(f, ops, "∨"),
            Sentence::Implies {
                antecedent,
                consequent,
            } => write!(f, "({} → {})", antecedent, consequent),
            Sentence::Iff { left, right } => write!(f, "({} ↔ {})", left, right),
            Sentence::Forall { variables, body } => {
                write!(f, "∀[{}]. {}", bindings(variables), body)
            }
            Sentence::Exists { variables, body } => {
                write!(f, "∃[{}]. {}", bindings(variables), body)
            }
            Sentence::Probability { weight, inner } => write!(f, "{}::{}", weight, inner),
            Sentence::Evidence { positive, inner } => {
                write!(f, "evidence({}, {})", inner, positive)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Arg;

    #[test]
    fn test_rule_rendering() {
        let rule = Sentence::forall(
            vec![Variable::typed("x", "str"), Variable::typed("y", "str")],
            Sentence::implies(
                Term::new("Link", vec![Arg::var("x"), Arg::var("y")]).into(),
                Term::new("Path", vec![Arg::var("x"), Arg::var("y")]).into(),
            ),
        );
        assert_eq!(
            rule.to_string(),
            "∀[x:str y:str]. (Link(x, y) → Path(x, y))"
        );
    }

    #[test]
    fn test_ground_term_rendering() {
        let t = Term::new("Link", vec![Arg::str("CA"), Arg::int(5)]);
        assert_eq!(t.to_string(), "Link('CA', 5)");
    }

    #[test]
    fn test_empty_connectives() {
        assert_eq!(Sentence::and(vec![]).to_string(), "true");
        assert_eq!(Sentence::or(vec![]).to_string(), "false");
    }
}
