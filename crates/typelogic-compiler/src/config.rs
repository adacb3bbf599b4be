//! Rendering configuration for the Prolog-family backends.
//!
//! Prolog, Souffle, and ProbLog share one clause-rendering core; the
//! differences between their grammars (variable and atom casing, quoting,
//! negation token, equality operator) are captured here.

/// How predicate names are cased in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomCase {
    /// Lowercase the whole name (`FriendOf` → `friendof`).
    Lower,
    /// Keep the declared casing (Souffle relations are case-sensitive).
    Preserve,
}

/// Rendering knobs for clause-oriented output.
#[derive(Debug, Clone)]
pub struct ClauseConfig {
    pub atom_case: AtomCase,
    /// Capitalize variable names (`x` → `X`); Souffle keeps them as-is.
    pub capitalize_vars: bool,
    /// `"…"` instead of `'…'` for string constants.
    pub double_quote_strings: bool,
    /// Negation-as-failure token (`\+` or `!`).
    pub negation: &'static str,
    /// Wrap the negated literal in parentheses: `\+ (p(X))`.
    pub parenthesize_negation: bool,
    /// Render zero-arity atoms as `p()` rather than `p`.
    pub parens_for_zero_args: bool,
    /// Whether nested functor arguments are representable at all.
    pub allow_function_terms: bool,
    /// Target token for the `eq` builtin.
    pub eq_operator: &'static str,
}

impl ClauseConfig {
    pub fn prolog() -> Self {
        ClauseConfig {
            atom_case: AtomCase::Lower,
            capitalize_vars: true,
            double_quote_strings: false,
            negation: r"\+",
            parenthesize_negation: true,
            parens_for_zero_args: false,
            allow_function_terms: true,
            eq_operator: "==",
        }
    }

    pub fn souffle() -> Self {
        ClauseConfig {
            atom_case: AtomCase::Preserve,
            capitalize_vars: false,
            double_quote_strings: true,
            negation: "!",
            parenthesize_negation: false,
            parens_for_zero_args: true,
            allow_function_terms: false,
            eq_operator: "=",
        }
    }

    pub fn problog() -> Self {
        ClauseConfig {
            atom_case: AtomCase::Lower,
            capitalize_vars: true,
            double_quote_strings: true,
            negation: r"\+",
            parenthesize_negation: false,
            parens_for_zero_args: false,
            allow_function_terms: true,
            eq_operator: "==",
        }
    }

    /// Infix rendering for the builtin comparison and arithmetic
    /// predicates, or `None` for ordinary predicates.
    pub fn infix_operator(&self, predicate: &str) -> Option<&'static str> {
        let op = match predicate {
            "eq" => self.eq_operator,
            "ne" => "!=",
            "lt" => "<",
            "le" => "<=",
            "gt" => ">",
            "ge" => ">=",
            "add" => "+",
            "sub" => "-",
            "mul" => "*",
            "div" | "truediv" => "/",
            "mod" => "%",
            _ => return None,
        };
        Some(op)
    }
}
