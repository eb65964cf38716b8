//! Boundary compatibility: the commuting square of a chain map.
//!
//! ```text
//!   X_k ──C(k)──▶ Y_k
//!    │d_X(k)       │d_Y(k)
//!    ▼             ▼
//!  X_{k-1} ─C(k-1)▶ Y_{k-1}
//! ```
//!
//! Only degrees where both `C(k)` and `C(k-1)` are recorded are evaluated;
//! the rest are skipped.

use tracing::debug;

use super::Verdict;
use crate::chain::{ChainComplex, DegreeMap};
use crate::error::Result;
use crate::zlift::IntMatrix;

/// Checks `d_Y(k)·C(k) = C(k-1)·d_X(k)` over GF(2).
///
/// # Errors
///
/// Returns [`Error::Shape`](crate::Error::Shape) if a block cannot be
/// multiplied against the boundary it meets.
pub fn boundary_compat(cx: &ChainComplex, cy: &ChainComplex, cmap: &DegreeMap) -> Result<Verdict> {
    let mut verdict = Verdict::new();
    for (&k, c_k) in cmap {
        let Some(c_km1) = cmap.get(k - 1) else {
            continue;
        };
        let lhs = cy.boundary(k).multiply(c_k)?;
        let rhs = c_km1.multiply(&cx.boundary(k))?;
        let eq = lhs == rhs;
        debug!(degree = k, eq, "boundary square");
        verdict.record(k, eq, cx.dim(k));
    }
    Ok(verdict)
}

/// Checks `d_Y(k)·C(k) = C(k-1)·d_X(k)` with exact integer arithmetic.
///
/// A missing signed boundary is the zero block whose shape is read off the
/// neighbouring map blocks: `d_Y(k)` is `rows(C(k-1)) × rows(C(k))` and
/// `d_X(k)` is `cols(C(k-1)) × cols(C(k))`.
///
/// # Errors
///
/// Returns [`Error::Shape`](crate::Error::Shape) if a block cannot be
/// multiplied against the boundary it meets.
pub fn boundary_compat_signed(
    dx: &DegreeMap<IntMatrix>,
    dy: &DegreeMap<IntMatrix>,
    cmap: &DegreeMap<IntMatrix>,
) -> Result<Verdict> {
    let mut verdict = Verdict::new();
    for (&k, c_k) in cmap {
        let Some(c_km1) = cmap.get(k - 1) else {
            continue;
        };
        let lhs = match dy.get(k) {
            Some(d) => d.multiply(c_k)?,
            None => IntMatrix::zeros(c_km1.rows(), c_k.cols()),
        };
        let rhs = match dx.get(k) {
            Some(d) => c_km1.multiply(d)?,
            None => IntMatrix::zeros(c_km1.rows(), c_k.cols()),
        };
        let eq = lhs == rhs;
        debug!(degree = k, eq, "signed boundary square");
        verdict.record(k, eq, c_k.cols());
    }
    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gf2::BitMatrix;
    use crate::zlift::reduce_mod_two;

    fn m(rows: &[&[u8]]) -> BitMatrix {
        BitMatrix::canonicalize(rows).unwrap()
    }

    fn identity_complex() -> ChainComplex {
        ChainComplex::new(DegreeMap::from_iter([(1, BitMatrix::identity(2))])).unwrap()
    }

    #[test]
    fn identity_map_is_compatible() {
        let cx = identity_complex();
        let cmap = DegreeMap::from_iter([(0, BitMatrix::identity(2)), (1, BitMatrix::identity(2))]);
        let v = boundary_compat(&cx, &cx, &cmap).unwrap();
        assert!(v.holds);
        assert_eq!(v.degrees.len(), 1);
        assert!(v.degrees[&1].eq);
    }

    #[test]
    fn lonely_degrees_are_skipped() {
        let cx = identity_complex();
        let cmap = DegreeMap::from_iter([(1, m(&[&[0, 1], &[1, 0]]))]);
        let v = boundary_compat(&cx, &cx, &cmap).unwrap();
        assert!(v.holds);
        assert!(v.degrees.is_empty());
    }

    #[test]
    fn broken_square_fails() {
        let cx = identity_complex();
        let swap = m(&[&[0, 1], &[1, 0]]);
        let cmap = DegreeMap::from_iter([(0, BitMatrix::identity(2)), (1, swap)]);
        let v = boundary_compat(&cx, &cx, &cmap).unwrap();
        assert!(!v.holds);
        assert!(!v.degrees[&1].eq);
    }

    #[test]
    fn signed_square_sees_signs() {
        let d = IntMatrix::from_rows(&[[1, -1]]).unwrap();
        let dx = DegreeMap::from_iter([(1, d.clone())]);
        let dy = DegreeMap::from_iter([(1, d)]);
        let flip = IntMatrix::from_rows(&[[0, 1], [1, 0]]).unwrap();
        let cmap = DegreeMap::from_iter([(0, IntMatrix::identity(1)), (1, flip)]);
        // Mod 2 the square commutes; over Z the swap negates d.
        let v = boundary_compat_signed(&dx, &dy, &cmap).unwrap();
        assert!(!v.holds);

        let gx = reduce_mod_two(&dx);
        let cx = ChainComplex::new(gx).unwrap();
        assert!(boundary_compat(&cx, &cx, &reduce_mod_two(&cmap)).unwrap().holds);
    }

    #[test]
    fn signed_missing_boundaries_are_zero() {
        let cmap = DegreeMap::from_iter([(0, IntMatrix::identity(1)), (1, IntMatrix::identity(2))]);
        let v = boundary_compat_signed(&DegreeMap::new(), &DegreeMap::new(), &cmap).unwrap();
        assert!(v.holds);
    }
}
