//! Chain complexes and degree-indexed block maps.
//!
//! A [`ChainComplex`] records boundary matrices `d_k : C_k → C_{k-1}` of
//! shape `(dim(k-1), dim(k))`. Dimensions are derived from the recorded
//! matrices; two boundaries that disagree about a shared degree are rejected.
//!
//! Absent degrees are never an error. [`ChainComplex::boundary`] and
//! [`DegreeMap::get_or_zero`] hand back a correctly shaped zero block, whose
//! shape is a pure function of the complex's dimension table.
//!
//! # Example
//!
//! ```
//! use otc::chain::{ChainComplex, DegreeMap};
//! use otc::gf2::BitMatrix;
//!
//! let d1 = BitMatrix::canonicalize(&[[1u8, 1, 0], [0, 1, 1]]).unwrap();
//! let cx = ChainComplex::new(DegreeMap::from_iter([(1, d1)])).unwrap();
//!
//! assert_eq!(cx.dim(0), 2);
//! assert_eq!(cx.dim(1), 3);
//! assert_eq!(cx.max_degree(), Some(1));
//! // d_2 is absent: zero map C_2 → C_1 with dim(2) = 0.
//! assert_eq!(cx.boundary(2).shape(), (3, 0));
//! ```

use std::borrow::Cow;
use std::collections::btree_map::{self, BTreeMap};

use tracing::debug;

use crate::checks::Verdict;
use crate::error::{Error, Locus, Result};
use crate::gf2::BitMatrix;

/// Homological degree.
pub type Degree = i32;

/// A mapping from degree to a matrix block.
///
/// Used for chain-map blocks `C(k)`, homotopies `H(k)`, and boundaries. The
/// block type defaults to [`BitMatrix`]; Z-lift inputs use
/// [`IntMatrix`](crate::zlift::IntMatrix).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct DegreeMap<M = BitMatrix> {
    blocks: BTreeMap<Degree, M>,
}

impl<M> DegreeMap<M> {
    /// An empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            blocks: BTreeMap::new(),
        }
    }

    /// Inserts a block, returning the one it replaced.
    pub fn insert(&mut self, k: Degree, block: M) -> Option<M> {
        self.blocks.insert(k, block)
    }

    /// The block recorded at `k`, if any.
    #[inline]
    pub fn get(&self, k: Degree) -> Option<&M> {
        self.blocks.get(&k)
    }

    /// True if a block is recorded at `k`.
    #[inline]
    pub fn contains(&self, k: Degree) -> bool {
        self.blocks.contains_key(&k)
    }

    /// Recorded degrees in ascending order.
    pub fn degrees(&self) -> impl DoubleEndedIterator<Item = Degree> + '_ {
        self.blocks.keys().copied()
    }

    /// `(degree, block)` pairs in ascending degree order.
    pub fn iter(&self) -> btree_map::Iter<'_, Degree, M> {
        self.blocks.iter()
    }

    /// Mutable `(degree, block)` pairs in ascending degree order.
    pub fn iter_mut(&mut self) -> btree_map::IterMut<'_, Degree, M> {
        self.blocks.iter_mut()
    }

    /// Number of recorded blocks.
    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// True if no block is recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl DegreeMap<BitMatrix> {
    /// The block at `k`, or the `rows × cols` zero block if absent.
    pub fn get_or_zero(&self, k: Degree, rows: usize, cols: usize) -> Cow<'_, BitMatrix> {
        match self.blocks.get(&k) {
            Some(block) => Cow::Borrowed(block),
            None => Cow::Owned(BitMatrix::zeros(rows, cols)),
        }
    }
}

impl<M> Default for DegreeMap<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> FromIterator<(Degree, M)> for DegreeMap<M> {
    fn from_iter<I: IntoIterator<Item = (Degree, M)>>(iter: I) -> Self {
        Self {
            blocks: iter.into_iter().collect(),
        }
    }
}

impl<'a, M> IntoIterator for &'a DegreeMap<M> {
    type Item = (&'a Degree, &'a M);
    type IntoIter = btree_map::Iter<'a, Degree, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

/// A chain complex over GF(2) given by its boundary matrices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainComplex {
    boundaries: DegreeMap,
    dims: BTreeMap<Degree, usize>,
}

impl ChainComplex {
    /// Builds a complex, deriving `dim(k) = cols(d_k)` and
    /// `dim(k-1) = rows(d_k)` for every recorded boundary.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `cols(d_k) != rows(d_{k+1})`
    /// for some `k`.
    pub fn new(boundaries: DegreeMap) -> Result<Self> {
        let mut dims = BTreeMap::new();
        for (&k, d) in &boundaries {
            // Ascending order: dim(k) is first fixed by cols(d_k), so a
            // conflict always surfaces on rows(d_k) at degree k - 1.
            dims.insert(k, d.cols());
            match dims.entry(k - 1) {
                btree_map::Entry::Vacant(slot) => {
                    slot.insert(d.rows());
                }
                btree_map::Entry::Occupied(slot) if *slot.get() != d.rows() => {
                    return Err(Error::DimensionMismatch {
                        locus: Locus::at("chain complex", k - 1),
                        left_label: "cols(d_k)",
                        left: *slot.get(),
                        right_label: "rows(d_{k+1})",
                        right: d.rows(),
                    });
                }
                btree_map::Entry::Occupied(_) => {}
            }
        }
        debug!(degrees = boundaries.len(), "chain complex assembled");
        Ok(Self { boundaries, dims })
    }

    /// Dimension of `C_k`; 0 for degrees the complex knows nothing about.
    #[inline]
    pub fn dim(&self, k: Degree) -> usize {
        self.dims.get(&k).copied().unwrap_or(0)
    }

    /// The full dimension table.
    #[inline]
    pub fn dims(&self) -> &BTreeMap<Degree, usize> {
        &self.dims
    }

    /// Degrees carrying a recorded boundary, ascending.
    pub fn degrees(&self) -> impl DoubleEndedIterator<Item = Degree> + '_ {
        self.boundaries.degrees()
    }

    /// Largest degree with a recorded boundary, `None` if there is none.
    pub fn max_degree(&self) -> Option<Degree> {
        self.boundaries.degrees().next_back()
    }

    /// The recorded boundaries.
    #[inline]
    pub fn boundaries(&self) -> &DegreeMap {
        &self.boundaries
    }

    /// `d_k`, or the `dim(k-1) × dim(k)` zero matrix when absent.
    pub fn boundary(&self, k: Degree) -> Cow<'_, BitMatrix> {
        self.boundaries
            .get_or_zero(k, self.dim(k - 1), self.dim(k))
    }

    /// Checks `d_{k-1}·d_k = 0` for every pair of recorded boundaries.
    ///
    /// # Errors
    ///
    /// Cannot fail for a complex built by [`ChainComplex::new`]; the kernel
    /// shape error is propagated for completeness.
    pub fn square_zero(&self) -> Result<Verdict> {
        let mut verdict = Verdict::new();
        for (&k, d_k) in &self.boundaries {
            let Some(d_km1) = self.boundaries.get(k - 1) else {
                continue;
            };
            let eq = d_km1.multiply(d_k)?.is_zero();
            verdict.record(k, eq, self.dim(k));
        }
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: &[&[u8]]) -> BitMatrix {
        BitMatrix::canonicalize(rows).unwrap()
    }

    /// Boundary of a filled triangle: 3 vertices, 3 edges, 1 face.
    fn triangle() -> ChainComplex {
        let d1 = m(&[&[1, 0, 1], &[1, 1, 0], &[0, 1, 1]]);
        let d2 = m(&[&[1], &[1], &[1]]);
        ChainComplex::new(DegreeMap::from_iter([(1, d1), (2, d2)])).unwrap()
    }

    #[test]
    fn dims_are_derived() {
        let cx = triangle();
        assert_eq!(cx.dim(0), 3);
        assert_eq!(cx.dim(1), 3);
        assert_eq!(cx.dim(2), 1);
        assert_eq!(cx.dim(3), 0);
        assert_eq!(cx.dim(-7), 0);
        assert_eq!(cx.max_degree(), Some(2));
    }

    #[test]
    fn absent_boundaries_are_shaped_zeros() {
        let cx = triangle();
        assert_eq!(cx.boundary(3).shape(), (1, 0));
        assert_eq!(cx.boundary(0).shape(), (0, 3));
        assert_eq!(cx.boundary(10).shape(), (0, 0));
        assert!(matches!(cx.boundary(1), Cow::Borrowed(_)));
    }

    #[test]
    fn empty_complex() {
        let cx = ChainComplex::new(DegreeMap::new()).unwrap();
        assert_eq!(cx.max_degree(), None);
        assert_eq!(cx.boundary(0).shape(), (0, 0));
    }

    #[test]
    fn disagreeing_boundaries_are_rejected() {
        let d1 = BitMatrix::zeros(2, 3);
        let d2 = BitMatrix::zeros(4, 1);
        let err = ChainComplex::new(DegreeMap::from_iter([(1, d1), (2, d2)])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "dimension mismatch in chain complex at degree 1: cols(d_k)=3, rows(d_{k+1})=4"
        );
    }

    #[test]
    fn triangle_squares_to_zero() {
        let v = triangle().square_zero().unwrap();
        assert!(v.holds);
        assert_eq!(v.degrees.len(), 1);
    }

    #[test]
    fn non_complex_is_detected() {
        let d1 = m(&[&[1, 0]]);
        let d2 = m(&[&[1], &[0]]);
        let cx = ChainComplex::new(DegreeMap::from_iter([(1, d1), (2, d2)])).unwrap();
        assert!(!cx.square_zero().unwrap().holds);
    }

    #[test]
    fn get_or_zero_borrows_present_blocks() {
        let map = DegreeMap::from_iter([(0, BitMatrix::identity(2))]);
        assert!(matches!(map.get_or_zero(0, 9, 9), Cow::Borrowed(_)));
        assert_eq!(map.get_or_zero(1, 2, 3).shape(), (2, 3));
    }
}
