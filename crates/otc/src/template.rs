//! Triangle template builder.
//!
//! For two moves `C₁`, `C₂` the builder solves, degree by degree,
//!
//! ```text
//! d(k+1)·J(k) ⊕ J(k-1)·d(k) = C₂(k)·C₁(k) ⊕ C₁(k)·C₂(k)
//! ```
//!
//! for the pair `(J(k), J(k-1))` as one GF(2) system in Kronecker form:
//!
//! ```text
//! [ I_{n_k} ⊗ d(k+1) | d(k)ᵀ ⊗ I_{n_k} ] · [ vec J(k) ; vec J(k-1) ] = vec D(k)
//! ```
//!
//! Degrees are processed in ascending order. The `J(k-1)` solved at degree
//! `k` overwrites the `J` of the record at `k-1` (keeping its `A` and `B`),
//! so a template built from moves at adjacent degrees only guarantees the
//! identity at the higher of the two.
//!
//! An inconsistent degree does not abort the build: both blocks fall back to
//! zero, the record is marked `feasible: Some(false)`, and the coherence check
//! will report the degree as failing.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::chain::{ChainComplex, Degree, DegreeMap};
use crate::checks::{TriangleRecord, TriangleTemplate};
use crate::error::Result;
use crate::gf2::solve::{kron, solve, unvectorize, vectorize};
use crate::gf2::BitMatrix;

/// Builds a coherent triangle template for the commutator of `c1` and `c2`.
///
/// Every degree present in either move with `n_k > 0` gets a record with
/// `A = C₂C₁`, `B = C₁C₂` and the solved `J(k)`.
///
/// # Errors
///
/// Returns [`Error::Shape`](crate::Error::Shape) if a move block is not
/// `n_k × n_k`. Inconsistent systems are not errors.
pub fn build_triangle_template(
    cx: &ChainComplex,
    c1: &DegreeMap,
    c2: &DegreeMap,
) -> Result<TriangleTemplate> {
    let degrees: BTreeSet<Degree> = c1.degrees().chain(c2.degrees()).collect();
    let mut template = TriangleTemplate::new();
    for k in degrees {
        let n_k = cx.dim(k);
        if n_k == 0 {
            debug!(degree = k, "empty chain group, no template record");
            continue;
        }
        let (n_up, n_down) = (cx.dim(k + 1), cx.dim(k - 1));
        let m1 = c1.get_or_zero(k, n_k, n_k);
        let m2 = c2.get_or_zero(k, n_k, n_k);
        let a = m2.multiply(&m1)?;
        let b = m1.multiply(&m2)?;
        let defect = a.xor(&b)?;

        let id = BitMatrix::identity(n_k);
        let system = kron(&id, &cx.boundary(k + 1)).hstack(&kron(&cx.boundary(k).transpose(), &id))?;

        let (j_k, j_km1, feasible) = match solve(&system, &vectorize(&defect)) {
            Ok(x) => {
                let upper = n_up * n_k;
                let j_k = unvectorize(&segment(&x, 0, upper), n_up, n_k)?;
                let j_km1 = unvectorize(&segment(&x, upper, n_k * n_down), n_k, n_down)?;
                (j_k, j_km1, true)
            }
            Err(e) if e.is_inconsistent() => {
                warn!(degree = k, "triangle system inconsistent, using zero homotopy");
                (BitMatrix::zeros(n_up, n_k), BitMatrix::zeros(n_k, n_down), false)
            }
            Err(e) => return Err(e),
        };
        debug!(degree = k, feasible, "triangle template record");

        template.insert(
            k,
            TriangleRecord {
                feasible: Some(feasible),
                ..TriangleRecord::new(a, b, j_k)
            },
        );
        if n_down > 0 {
            match template.get_mut(k - 1) {
                Some(below) => below.j = Some(j_km1),
                None => {
                    template.insert(k - 1, TriangleRecord::carrier(j_km1));
                }
            }
        }
    }
    Ok(template)
}

/// Rows `start..start + len` of a column vector.
fn segment(x: &BitMatrix, start: usize, len: usize) -> BitMatrix {
    BitMatrix::from_fn(len, 1, |r, _| x.get(start + r, 0))
}
