//! Readers for the interchange formats.
//!
//! The S-expression and structured-record emitters are the system's
//! canonical serialization; the readers here close the round-trip loop
//! used by the catalog/merge layer: `read(compile(theory))` must be
//! structurally equal to the original theory.

pub mod record;
pub mod sexpr;

use typelogic_ir::{IrError, Theory};

use crate::export::record::RecordBackend;
use crate::export::sexpr::SexprBackend;
use crate::export::Backend;

/// Serialize through both interchange formats and compare the
/// reconstruction with the original. Inequality (or any parse failure) is
/// a [`IrError::RoundTripMismatch`] — a test-only signal, never raised on
/// production paths.
pub fn verify_round_trip(theory: &Theory) -> Result<(), IrError> {
    let mismatch = |detail: String| IrError::RoundTripMismatch { detail };

    let text = SexprBackend
        .compile(theory)
        .map_err(|e| mismatch(format!("sexpr emit: {}", e)))?;
    let reread = sexpr::parse_theory(&text).map_err(|e| mismatch(format!("sexpr read: {}", e)))?;
    if reread != *theory {
        return Err(mismatch("sexpr reconstruction differs".to_string()));
    }

    let text = RecordBackend
        .compile(theory)
        .map_err(|e| mismatch(format!("record emit: {}", e)))?;
    let reread =
        record::parse_theory(&text).map_err(|e| mismatch(format!("record read: {}", e)))?;
    if reread != *theory {
        return Err(mismatch("record reconstruction differs".to_string()));
    }

    Ok(())
}
