//! Commutator identity: `H` is a chain homotopy between `C₂C₁` and `C₁C₂`.

use std::collections::BTreeSet;

use tracing::debug;

use super::Verdict;
use crate::chain::{ChainComplex, Degree, DegreeMap};
use crate::error::Result;

/// Checks `d(k+1)·H(k) ⊕ H(k-1)·d(k) = C₂(k)·C₁(k) ⊕ C₁(k)·C₂(k)` at every
/// degree appearing in `c1`, `c2`, or `h`.
///
/// Missing blocks are zero: move blocks are `n_k × n_k`, `H(k)` is
/// `n_{k+1} × n_k`.
///
/// # Errors
///
/// Returns [`Error::Shape`](crate::Error::Shape) if a supplied block does not
/// fit the complex.
pub fn commutator_identity(
    cx: &ChainComplex,
    c1: &DegreeMap,
    c2: &DegreeMap,
    h: &DegreeMap,
) -> Result<Verdict> {
    let degrees: BTreeSet<Degree> = c1.degrees().chain(c2.degrees()).chain(h.degrees()).collect();
    let mut verdict = Verdict::new();
    for k in degrees {
        let n_k = cx.dim(k);
        let a = c1.get_or_zero(k, n_k, n_k);
        let b = c2.get_or_zero(k, n_k, n_k);
        let rhs = b.multiply(&a)?.xor(&a.multiply(&b)?)?;

        let h_k = h.get_or_zero(k, cx.dim(k + 1), n_k);
        let h_km1 = h.get_or_zero(k - 1, n_k, cx.dim(k - 1));
        let lhs = cx
            .boundary(k + 1)
            .multiply(&h_k)?
            .xor(&h_km1.multiply(&cx.boundary(k))?)?;

        let eq = lhs == rhs;
        debug!(degree = k, eq, "commutator");
        verdict.record(k, eq, n_k);
    }
    Ok(verdict)
}
