//! Backend emitters: one per target grammar.
//!
//! Every emitter is a pure function of the theory — deterministic (stable
//! ordering = declaration order), side-effect-free, holding no cross-call
//! state. Clause-oriented targets go through the normalizer first; the
//! FOL provers keep quantifiers verbatim; the interchange formats are
//! lossless reflective serializations with matching readers in
//! [`crate::import`].

pub mod clausal;
pub mod problog;
pub mod prolog;
pub mod prover9;
pub mod record;
pub mod sexpr;
pub mod souffle;
pub mod tptp;

use anyhow::Result;
use typelogic_ir::{SentenceGroup, Theory};

use crate::diagnostics::Diagnostic;

/// Output of one emitter run: the target text plus everything that was
/// skipped along the way.
#[derive(Debug, Clone)]
pub struct EmitResult {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Common contract of the seven emitters.
pub trait Backend {
    /// Conventional file suffix of the target grammar.
    fn suffix(&self) -> &'static str;

    /// Compile a whole theory, collecting skip diagnostics.
    fn emit(&self, theory: &Theory) -> Result<EmitResult>;

    /// Compile a whole theory to text.
    fn compile(&self, theory: &Theory) -> Result<String> {
        Ok(self.emit(theory)?.text)
    }

    /// Compile a single sentence group, for partial output.
    fn compile_group(&self, theory: &Theory, group: &SentenceGroup) -> Result<String>;
}

/// Best rational approximation of a float, bounded to six-digit
/// denominators. The FOL provers have no floating point; `0.9` becomes
/// `rational(9,10)` rather than accumulating prover-side float error.
pub(crate) fn to_rational(x: f64) -> (i64, i64) {
    if x == 0.0 || !x.is_finite() {
        return (0, 1);
    }
    let sign = if x < 0.0 { -1 } else { 1 };
    let target = x.abs();
    let max_denominator: i64 = 1_000_000;

    // Continued-fraction convergents h/k until the denominator bound.
    let (mut h0, mut k0, mut h1, mut k1) = (0i64, 1i64, 1i64, 0i64);
    let mut v = target;
    loop {
        let a = v.floor() as i64;
        let h2 = a.saturating_mul(h1).saturating_add(h0);
        let k2 = a.saturating_mul(k1).saturating_add(k0);
        if k2 > max_denominator {
            break;
        }
        h0 = h1;
        k0 = k1;
        h1 = h2;
        k1 = k2;
        let rem = v - a as f64;
        if rem.abs() < 1e-10 {
            break;
        }
        v = 1.0 / rem;
    }
    (sign * h1, k1.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_rational_decimals() {
        assert_eq!(to_rational(0.9), (9, 10));
        assert_eq!(to_rational(0.4), (2, 5));
        assert_eq!(to_rational(0.25), (1, 4));
        assert_eq!(to_rational(0.1), (1, 10));
    }

    #[test]
    fn test_to_rational_integers_and_sign() {
        assert_eq!(to_rational(3.0), (3, 1));
        assert_eq!(to_rational(0.0), (0, 1));
        assert_eq!(to_rational(-0.5), (-1, 2));
    }
}
