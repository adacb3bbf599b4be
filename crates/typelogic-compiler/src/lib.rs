//! # TypeLogic Compiler
//!
//! Translates a [`Theory`] into the concrete syntaxes of external
//! reasoning engines, losslessly where possible.
//!
//! Seven targets share one pipeline: the clause-oriented engines (Prolog,
//! Souffle, ProbLog) consume the [`normalize`] module's flat clauses; the
//! FOL provers (TPTP, Prover9) receive fully quantified formulas verbatim;
//! the S-expression and structured-record formats are the canonical
//! interchange serialization with matching readers in [`import`].
//!
//! Compilation is a pure function of the theory: no I/O, no subprocesses,
//! no cross-call state. Failures are per-sentence — a sentence outside a
//! target's profile becomes a [`diagnostics::Diagnostic`] and a comment in
//! the output while the rest of the theory still compiles.
//!
//! # Quick Start
//!
//! ```rust
//! use typelogic_compiler::{compile, Format};
//! use typelogic_ir::{Arg, Sentence, Term, Theory, Variable};
//!
//! let mut theory = Theory::new("paths");
//! theory.add(Sentence::forall(
//!     vec![Variable::new("x"), Variable::new("y")],
//!     Sentence::implies(
//!         Term::new("Link", vec![Arg::var("x"), Arg::var("y")]).into(),
//!         Term::new("Path", vec![Arg::var("x"), Arg::var("y")]).into(),
//!     ),
//! ));
//! theory.add_fact(Term::new("Link", vec![Arg::str("CA"), Arg::str("OR")])).unwrap();
//!
//! let prolog = compile(&theory, Format::Prolog).unwrap();
//! assert!(prolog.contains("path(X, Y) :- link(X, Y)."));
//! assert!(prolog.contains("link('CA', 'OR')."));
//! ```

pub mod config;
pub mod diagnostics;
pub mod export;
pub mod import;
pub mod normalize;

#[cfg(test)]
mod tests;

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use typelogic_ir::Theory;

pub use config::{AtomCase, ClauseConfig};
pub use diagnostics::{Diagnostic, DiagnosticLevel};
pub use export::{Backend, EmitResult};
pub use normalize::{
    clauses_for, normalize_theory, stratify, Clause, ClauseOptions, Literal, NormalizedGroup,
    NormalizedTheory,
};

use export::problog::ProblogBackend;
use export::prolog::PrologBackend;
use export::prover9::Prover9Backend;
use export::record::RecordBackend;
use export::sexpr::SexprBackend;
use export::souffle::SouffleBackend;
use export::tptp::TptpBackend;

/// The closed set of target grammars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    Prolog,
    Souffle,
    Tptp,
    Prover9,
    Problog,
    Sexpr,
    Record,
}

impl Format {
    pub const ALL: [Format; 7] = [
        Format::Prolog,
        Format::Souffle,
        Format::Tptp,
        Format::Prover9,
        Format::Problog,
        Format::Sexpr,
        Format::Record,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Format::Prolog => "prolog",
            Format::Souffle => "souffle",
            Format::Tptp => "tptp",
            Format::Prover9 => "prover9",
            Format::Problog => "problog",
            Format::Sexpr => "sexpr",
            Format::Record => "record",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Format {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        for format in Format::ALL {
            if format.name() == s {
                return Ok(format);
            }
        }
        bail!("Unknown target format {}", s);
    }
}

/// Explicit factory: the emitter for a target format.
pub fn compiler_for(format: Format) -> Box<dyn Backend> {
    match format {
        Format::Prolog => Box::new(PrologBackend),
        Format::Souffle => Box::new(SouffleBackend),
        Format::Tptp => Box::new(TptpBackend),
        Format::Prover9 => Box::new(Prover9Backend),
        Format::Problog => Box::new(ProblogBackend),
        Format::Sexpr => Box::new(SexprBackend),
        Format::Record => Box::new(RecordBackend),
    }
}

/// Compile a theory to the target grammar's text.
pub fn compile(theory: &Theory, format: Format) -> Result<String> {
    compiler_for(format).compile(theory)
}
