//! Error types for the theory data model and its compilation targets.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IrError {
    #[error("Duplicate declaration of {name} with a different definition")]
    DuplicateDeclaration { name: String },
    #[error("Unknown type {name}")]
    UnknownType { name: String },
    #[error("Type alias cycle involving {name}")]
    CyclicTypeAlias { name: String },
    #[error("Predicate {predicate} arity mismatch: expected {expected}, got {actual}")]
    ArityMismatch {
        predicate: String,
        expected: usize,
        actual: usize,
    },
    #[error("Head variable {variable} does not occur in the body of {clause}")]
    UnsafeHeadVariable { variable: String, clause: String },
    #[error("Unsupported negation shape: {sentence}")]
    UnsupportedNegationShape { sentence: String },
    #[error("Target has no constraint form for: {sentence}")]
    UnsupportedConstraintShape { sentence: String },
    #[error("Probabilistic annotation not supported by this target: {sentence}")]
    UnsupportedAnnotation { sentence: String },
    #[error("Function term not supported by this target: {term}")]
    FunctionTermNotSupported { term: String },
    #[error("Ground fact {term} contains variable {variable}")]
    NonGroundFact { term: String, variable: String },
    #[error("Round trip produced a different theory: {detail}")]
    RoundTripMismatch { detail: String },
}
