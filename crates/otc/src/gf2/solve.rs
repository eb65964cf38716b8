//! Linear systems over GF(2) in Kronecker form.
//!
//! Matrix equations such as `A·X ⊕ Y·B = C` are turned into a single linear
//! system with the column-major vectorization identities
//!
//! ```text
//! vec(A·X) = (I ⊗ A)·vec(X)
//! vec(Y·B) = (Bᵀ ⊗ I)·vec(Y)
//! ```
//!
//! and handed to [`solve`].
//!
//! # Example
//!
//! ```
//! use otc::gf2::BitMatrix;
//! use otc::gf2::solve::{kron, solve, unvectorize, vectorize};
//!
//! // Solve A·X = C for X with A = I₂.
//! let a = BitMatrix::identity(2);
//! let c = BitMatrix::canonicalize(&[[0u8, 1], [1, 1]]).unwrap();
//! let system = kron(&BitMatrix::identity(2), &a);
//! let x = solve(&system, &vectorize(&c)).unwrap();
//! assert_eq!(unvectorize(&x, 2, 2).unwrap(), c);
//! ```

use tracing::trace;

use super::BitMatrix;
use crate::error::{Error, Result};

/// Kronecker product `a ⊗ b` over GF(2).
#[must_use]
pub fn kron(a: &BitMatrix, b: &BitMatrix) -> BitMatrix {
    let (br, bc) = b.shape();
    let mut out = BitMatrix::zeros(a.rows() * br, a.cols() * bc);
    for (ar, ac) in a.nonzero_entries() {
        for (r, c) in b.nonzero_entries() {
            out.set(ar * br + r, ac * bc + c, true);
        }
    }
    out
}

/// Column-major flatten into a `rows·cols × 1` vector.
#[must_use]
pub fn vectorize(m: &BitMatrix) -> BitMatrix {
    let rows = m.rows();
    let mut v = BitMatrix::zeros(rows * m.cols(), 1);
    for (r, c) in m.nonzero_entries() {
        v.set(c * rows + r, 0, true);
    }
    v
}

/// Inverse of [`vectorize`].
///
/// # Errors
///
/// Returns [`Error::Shape`] if `v` is not a column vector of length
/// `rows·cols`.
pub fn unvectorize(v: &BitMatrix, rows: usize, cols: usize) -> Result<BitMatrix> {
    let len = rows * cols;
    let is_column = v.cols() == 1 || v.rows() == 0;
    if v.rows() != len || !is_column {
        return Err(Error::shape("unvectorize", v.shape(), (len, 1)));
    }
    Ok(BitMatrix::from_fn(rows, cols, |r, c| v.get(c * rows + r, 0)))
}

/// Finds one solution of `a·x = b` over GF(2).
///
/// Gauss–Jordan elimination on `[a | b]`; free variables are fixed at 0, so
/// the returned `x` is the first solution elimination produces. Callers must
/// not rely on which solution that is.
///
/// # Errors
///
/// Returns [`Error::Inconsistent`] if some reduced row reads `0 = 1`, and
/// [`Error::Shape`] if `b` is not a column of length `rows(a)`.
pub fn solve(a: &BitMatrix, b: &BitMatrix) -> Result<BitMatrix> {
    let (m, n) = a.shape();
    if b.rows() != m {
        return Err(Error::shape("solve", a.shape(), b.shape()));
    }
    if m == 0 {
        return Ok(BitMatrix::zeros(n, 1));
    }
    if b.cols() != 1 {
        return Err(Error::shape("solve", a.shape(), b.shape()));
    }

    let mut aug = a.hstack(b)?;
    let pivots = aug.eliminate(n);
    let rank = pivots.len();
    trace!(rows = m, cols = n, rank, "gf2 system reduced");

    if (rank..m).any(|r| aug.get(r, n) && aug.row_prefix_is_zero(r, n)) {
        return Err(Error::Inconsistent { rows: m, cols: n });
    }

    // Fully reduced: each pivot row reads x[col] ⊕ (free terms = 0) = rhs.
    let mut x = BitMatrix::zeros(n, 1);
    for (r, &col) in pivots.iter().enumerate() {
        if aug.get(r, n) {
            x.set(col, 0, true);
        }
    }
    Ok(x)
}
