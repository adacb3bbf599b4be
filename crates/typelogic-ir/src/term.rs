//! Terms: logic variables, literal constants, and (possibly nested) atoms.

use serde::{Deserialize, Serialize};

/// A literal constant appearing as a term argument.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Value {
    pub fn str(value: impl Into<String>) -> Self {
        Value::Str(value.into())
    }
}

/// A logic variable. Identity is by name within its binding scope; the
/// optional domain is the declared type of the variable.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub domain: Option<String>,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Variable {
            name: name.into(),
            domain: None,
        }
    }

    /// Create a variable with a declared type.
    pub fn typed(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Variable {
            name: name.into(),
            domain: Some(domain.into()),
        }
    }
}

/// One argument position of a [`Term`]: a variable, a literal constant, or
/// a nested functor term (structured arguments like `code("ICD10", "E11")`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Arg {
    Var(Variable),
    Value(Value),
    Term(Term),
}

impl Arg {
    pub fn var(name: impl Into<String>) -> Self {
        Arg::Var(Variable::new(name))
    }

    pub fn typed_var(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Arg::Var(Variable::typed(name, domain))
    }

    pub fn str(value: impl Into<String>) -> Self {
        Arg::Value(Value::Str(value.into()))
    }

    pub fn int(value: i64) -> Self {
        Arg::Value(Value::Int(value))
    }

    pub fn float(value: f64) -> Self {
        Arg::Value(Value::Float(value))
    }

    pub fn bool(value: bool) -> Self {
        Arg::Value(Value::Bool(value))
    }

    pub fn null() -> Self {
        Arg::Value(Value::Null)
    }

    pub fn is_var(&self) -> bool {
        matches!(self, Arg::Var(_))
    }

    /// True when no variable occurs anywhere below this argument.
    pub fn is_ground(&self) -> bool {
        match self {
            Arg::Var(_) => false,
            Arg::Value(_) => true,
            Arg::Term(t) => t.is_ground(),
        }
    }
}

impl From<Variable> for Arg {
    fn from(v: Variable) -> Self {
        Arg::Var(v)
    }
}

impl From<Term> for Arg {
    fn from(t: Term) -> Self {
        Arg::Term(t)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Value(Value::Str(s.to_string()))
    }
}

impl From<i64> for Arg {
    fn from(n: i64) -> Self {
        Arg::Value(Value::Int(n))
    }
}

impl From<f64> for Arg {
    fn from(x: f64) -> Self {
        Arg::Value(Value::Float(x))
    }
}

impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Arg::Value(Value::Bool(b))
    }
}

/// An atomic proposition: a predicate applied to an ordered argument list.
///
/// A ground term (no variables anywhere) is a fact:
///
/// ```
/// use typelogic_ir::{Arg, Term};
///
/// let t = Term::new("Link", vec![Arg::str("CA"), Arg::str("OR")]);
/// assert!(t.is_ground());
/// assert_eq!(t.arity(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub predicate: String,
    pub args: Vec<Arg>,
}

impl Term {
    pub fn new(predicate: impl Into<String>, args: Vec<Arg>) -> Self {
        Term {
            predicate: predicate.into(),
            args,
        }
    }

    /// A zero-argument atom.
    pub fn atom(predicate: impl Into<String>) -> Self {
        Term {
            predicate: predicate.into(),
            args: Vec::new(),
        }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    pub fn is_ground(&self) -> bool {
        self.args.iter().all(Arg::is_ground)
    }

    /// All variables occurring in the argument list, nested terms included.
    pub fn variables(&self) -> Vec<&Variable> {
        let mut vars = Vec::new();
        collect_vars(&self.args, &mut vars);
        vars
    }

    pub fn variable_names(&self) -> Vec<&str> {
        self.variables().into_iter().map(|v| v.name.as_str()).collect()
    }
}

fn collect_vars<'a>(args: &'a [Arg], out: &mut Vec<&'a Variable>) {
    for arg in args {
        match arg {
            Arg::Var(v) => out.push(v),
            Arg::Term(t) => collect_vars(&t.args, out),
            Arg::Value(_) => {}
        }
    }
}
