//! # TypeLogic IR
//!
//! Engine-agnostic data model for typed first-order (and lightly
//! probabilistic) logical theories.
//!
//! This crate provides the core structures shared by every component of the
//! TypeLogic framework: terms and logic variables, the sentence tree
//! (connectives, quantifiers, probabilistic annotations), predicate and
//! type declarations, and the theory bundle that ties them together.
//! Backends that translate theories into external reasoner syntaxes
//! (Prolog, Souffle, TPTP, Prover9, ProbLog, and the interchange formats)
//! live in `typelogic-compiler` and consume this crate unchanged.
//!
//! ## Core Components
//!
//! ### Terms ([`Term`])
//! Atomic propositions: a predicate applied to an ordered argument list.
//! Arguments are logic variables, literal constants, or nested functor
//! terms (`Code("ICD10", "E11")` as an argument to `Diagnosis(...)`).
//!
//! ### Sentences ([`Sentence`])
//! The closed tree of logical forms: `Not`, n-ary `And`/`Or`, `Implies`,
//! `Iff`, `Forall`/`Exists` with typed bound variables, and the
//! `Probability`/`Evidence` annotation wrappers. Sentences are immutable;
//! every transformation builds a new tree.
//!
//! ### Declarations ([`Registry`], [`PredicateDefinition`], [`TypeDef`])
//! Named type aliases (including unions) and predicate signatures with
//! ordered, named, typed argument lists. Declaration is purely additive;
//! alias resolution unrolls unions and rejects cycles.
//!
//! ### Theories ([`Theory`])
//! A named bundle of declarations, grouped sentences, and ground facts —
//! the unit passed between every component.
//!
//! ## Quick Start
//!
//! ```rust
//! use typelogic_ir::{Arg, PredicateDefinition, Sentence, Term, Theory, Variable};
//!
//! let mut theory = Theory::new("paths");
//! theory.declare_predicate(PredicateDefinition::new(
//!     "Link",
//!     vec![("source", "str"), ("target", "str")],
//! ))?;
//! theory.declare_predicate(PredicateDefinition::new(
//!     "Path",
//!     vec![("source", "str"), ("target", "str")],
//! ))?;
//!
//! // ∀x, y. Link(x, y) → Path(x, y)
//! theory.add(Sentence::forall(
//!     vec![Variable::new("x"), Variable::new("y")],
//!     Sentence::implies(
//!         Term::new("Link", vec![Arg::var("x"), Arg::var("y")]).into(),
//!         Term::new("Path", vec![Arg::var("x"), Arg::var("y")]).into(),
//!     ),
//! ));
//! theory.add_fact(Term::new("Link", vec![Arg::str("CA"), Arg::str("OR")]))?;
//! # Ok::<(), typelogic_ir::IrError>(())
//! ```

mod display;
mod error;
mod registry;
mod sentence;
mod term;
mod theory;

pub use error::IrError;
pub use registry::{PredicateDefinition, Registry, TypeDef, PRIMITIVE_TYPES};
pub use sentence::Sentence;
pub use term::{Arg, Term, Value, Variable};
pub use theory::{GroupKind, SentenceGroup, Theory};
