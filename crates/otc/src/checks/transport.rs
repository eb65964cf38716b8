//! Transport of homology classes.
//!
//! A representative cycle `c_dom` of the domain, pushed through `C(k)`, must
//! land in the class of the designated target `c_cod`: the difference has
//! to be a boundary of the codomain.

use tracing::debug;

use crate::chain::{ChainComplex, Degree, DegreeMap};
use crate::error::{Error, Locus, Result};
use crate::gf2::{in_image, BitMatrix};

const CHECK: &str = "transport";

/// Vectors produced by a transport check, for inspection by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOutcome {
    /// True iff `C(k)·c_dom` and `c_cod` are homologous.
    pub holds: bool,
    /// `C(k)·c_dom`.
    pub mapped: BitMatrix,
    /// `C(k)·c_dom ⊕ c_cod`.
    pub diff: BitMatrix,
}

/// Checks that `C(k)·c_dom ⊕ c_cod` lies in the image of `d_Y(k+1)`.
///
/// If the codomain boundary at `k+1` has zero rows there are no nontrivial
/// boundaries at that degree and the check reduces to `diff == 0`. A missing
/// `C(k)` is the zero block `dim_Y(k) × len(c_dom)`.
///
/// # Errors
///
/// Returns [`Error::Shape`] if `C(k)` cannot act on `c_dom`, and
/// [`Error::DimensionMismatch`] (located at this check and degree) if the
/// mapped vector, the target, and the codomain boundary disagree in length.
pub fn transport(
    cy: &ChainComplex,
    cmap: &DegreeMap,
    c_dom: &BitMatrix,
    c_cod: &BitMatrix,
    k: Degree,
) -> Result<TransportOutcome> {
    let c_k = cmap.get_or_zero(k, cy.dim(k), c_dom.rows());
    let mapped = c_k.multiply(c_dom)?;
    if mapped.shape() != c_cod.shape() {
        return Err(Error::DimensionMismatch {
            locus: Locus::at(CHECK, k),
            left_label: "len(C(k)·c_dom)",
            left: mapped.rows(),
            right_label: "len(c_cod)",
            right: c_cod.rows(),
        });
    }
    let diff = mapped.xor(c_cod)?;

    let b = cy.boundary(k + 1);
    let holds = if b.rows() == 0 {
        diff.is_zero()
    } else {
        in_image(&b, &diff).map_err(|e| e.relocate(Locus::at(CHECK, k)))?
    };
    debug!(degree = k, holds, "transport");
    Ok(TransportOutcome {
        holds,
        mapped,
        diff,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: &[&[u8]]) -> BitMatrix {
        BitMatrix::canonicalize(rows).unwrap()
    }

    /// Circle with two vertices and two edges, plus a 2-cell filling edge 0 + edge 1.
    fn disk() -> ChainComplex {
        let d1 = m(&[&[1, 1], &[1, 1]]);
        let d2 = m(&[&[1], &[1]]);
        ChainComplex::new(DegreeMap::from_iter([(1, d1), (2, d2)])).unwrap()
    }

    fn circle() -> ChainComplex {
        let d1 = m(&[&[1, 1], &[1, 1]]);
        ChainComplex::new(DegreeMap::from_iter([(1, d1)])).unwrap()
    }

    #[test]
    fn homologous_cycles_pass() {
        let cy = disk();
        let cmap = DegreeMap::from_iter([(1, BitMatrix::identity(2))]);
        // The loop e0 + e1 bounds the 2-cell, so it is homologous to 0.
        let out = transport(
            &cy,
            &cmap,
            &BitMatrix::column(&[1u8, 1]),
            &BitMatrix::column(&[0u8, 0]),
            1,
        )
        .unwrap();
        assert!(out.holds);
        assert_eq!(out.diff, BitMatrix::column(&[1u8, 1]));
    }

    #[test]
    fn non_homologous_cycles_fail() {
        let cy = circle();
        let cmap = DegreeMap::from_iter([(1, BitMatrix::identity(2))]);
        // No 2-cells: the loop is a nontrivial class.
        let out = transport(
            &cy,
            &cmap,
            &BitMatrix::column(&[1u8, 1]),
            &BitMatrix::column(&[0u8, 0]),
            1,
        )
        .unwrap();
        assert!(!out.holds);
    }

    #[test]
    fn identical_cycles_pass() {
        let cy = circle();
        let cmap = DegreeMap::from_iter([(1, BitMatrix::identity(2))]);
        let c = BitMatrix::column(&[1u8, 1]);
        assert!(transport(&cy, &cmap, &c, &c, 1).unwrap().holds);
    }

    #[test]
    fn degree_unknown_to_codomain_reduces_to_equality() {
        let cy = circle();
        let cmap = DegreeMap::from_iter([(5, BitMatrix::identity(2))]);
        assert_eq!(cy.boundary(6).rows(), 0);
        let c = BitMatrix::column(&[1u8, 0]);
        assert!(transport(&cy, &cmap, &c, &c, 5).unwrap().holds);
        let zero = BitMatrix::column(&[0u8, 0]);
        assert!(!transport(&cy, &cmap, &c, &zero, 5).unwrap().holds);
    }

    #[test]
    fn missing_block_maps_to_zero() {
        let cy = circle();
        let out = transport(
            &cy,
            &DegreeMap::new(),
            &BitMatrix::column(&[1u8, 0]),
            &BitMatrix::column(&[0u8, 0]),
            0,
        )
        .unwrap();
        assert!(out.mapped.is_zero());
        assert!(out.holds);
    }

    #[test]
    fn length_mismatch_is_located() {
        let cy = disk();
        let cmap = DegreeMap::from_iter([(1, BitMatrix::identity(2))]);
        let err = transport(
            &cy,
            &cmap,
            &BitMatrix::column(&[1u8, 1]),
            &BitMatrix::column(&[0u8, 0, 0]),
            1,
        )
        .unwrap_err();
        assert!(err.to_string().contains("transport at degree 1"));
    }

    #[test]
    fn boundary_row_mismatch_is_relocated() {
        let cy = disk();
        // C(1) lands in a 3-dimensional space but d_Y(2) has 2 rows.
        let cmap = DegreeMap::from_iter([(1, m(&[&[1, 0], &[0, 1], &[1, 1]]))]);
        let err = transport(
            &cy,
            &cmap,
            &BitMatrix::column(&[1u8, 0]),
            &BitMatrix::column(&[1u8, 0, 1]),
            1,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "dimension mismatch in transport at degree 1: rows(B)=2, len(v)=3"
        );
    }
}
