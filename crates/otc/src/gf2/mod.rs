//! GF(2) matrix kernel.
//!
//! Matrices over GF(2) have entries in {0, 1}. Addition is XOR, products
//! are reduced mod 2. Each row is packed into `u64` words: bit `c % 64` of
//! word `c / 64` is entry `(r, c)`. Padding bits past the last column are
//! always zero, so structural equality is matrix equality.
//!
//! # Encoding
//!
//! ```text
//! [[1, 0, 1],        row 0 → 0b101
//!  [0, 1, 1]]        row 1 → 0b110
//! ```
//!
//! Any numeric input is canonicalized mod 2 on ingestion; negative integers
//! reduce by parity (`-1 → 1`, `-2 → 0`).
//!
//! # Example
//!
//! ```
//! use otc::gf2::{in_image, BitMatrix};
//!
//! let b = BitMatrix::canonicalize(&[[1u8, 1], [0, 1], [1, 0]]).unwrap();
//! assert_eq!(b.rank(), 2);
//!
//! // Sum of both columns: [0, 1, 1]
//! let v = BitMatrix::column(&[0, 1, 1]);
//! assert!(in_image(&b, &v).unwrap());
//!
//! // [1, 1, 1] is not in the column space
//! let w = BitMatrix::column(&[1, 1, 1]);
//! assert!(!in_image(&b, &w).unwrap());
//! ```

pub mod solve;

use core::fmt;

use crate::error::{Error, Locus, Result};

const WORD_BITS: usize = 64;

#[inline]
const fn words_for(cols: usize) -> usize {
    (cols + WORD_BITS - 1) / WORD_BITS
}

/// A scalar that can be reduced to an element of GF(2).
pub trait Gf2Entry: Copy {
    /// The entry mod 2.
    fn parity(self) -> bool;
}

impl Gf2Entry for bool {
    #[inline]
    fn parity(self) -> bool {
        self
    }
}

macro_rules! impl_gf2_entry {
    ($($t:ty),*) => {
        $(
            impl Gf2Entry for $t {
                #[inline]
                fn parity(self) -> bool {
                    // Two's complement keeps the low bit equal to the parity.
                    self & 1 != 0
                }
            }
        )*
    };
}

impl_gf2_entry!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// A dense matrix over GF(2).
///
/// A matrix with zero rows or zero columns is valid and represents the
/// trivial map. Column vectors are `n × 1` matrices; the empty vector is
/// `0 × 1`.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Vec<RawEntry>>", into = "Vec<Vec<u8>>")
)]
pub struct BitMatrix {
    rows: usize,
    cols: usize,
    stride: usize,
    words: Vec<u64>,
}

impl BitMatrix {
    /// The all-zero `rows × cols` matrix.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        let stride = words_for(cols);
        Self {
            rows,
            cols,
            stride,
            words: vec![0; rows * stride],
        }
    }

    /// The `n × n` identity.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.set(i, i, true);
        }
        m
    }

    /// Builds a matrix entrywise.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut m = Self::zeros(rows, cols);
        for r in 0..rows {
            for c in 0..cols {
                if f(r, c) {
                    m.set(r, c, true);
                }
            }
        }
        m
    }

    /// Canonicalizes nested rows of any integer or boolean type mod 2.
    ///
    /// An input with zero rows yields the `0 × 0` matrix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Shape`] if the rows have unequal lengths.
    pub fn canonicalize<T: Gf2Entry, R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Ok(Self::zeros(0, 0));
        };
        let cols = first.as_ref().len();
        let mut m = Self::zeros(rows.len(), cols);
        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(Error::shape("canonicalize", (1, row.len()), (1, cols)));
            }
            for (c, &entry) in row.iter().enumerate() {
                if entry.parity() {
                    m.set(r, c, true);
                }
            }
        }
        Ok(m)
    }

    /// A column vector (`n × 1`) canonicalized mod 2.
    #[must_use]
    pub fn column<T: Gf2Entry>(entries: &[T]) -> Self {
        let mut m = Self::zeros(entries.len(), 1);
        for (r, &entry) in entries.iter().enumerate() {
            if entry.parity() {
                m.set(r, 0, true);
            }
        }
        m
    }

    /// Number of rows.
    #[inline]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// True if the matrix has no entries at all.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// True if every entry is zero (vacuously true for empty matrices).
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Entry `(r, c)`.
    #[inline]
    pub fn get(&self, r: usize, c: usize) -> bool {
        debug_assert!(r < self.rows && c < self.cols);
        (self.words[r * self.stride + c / WORD_BITS] >> (c % WORD_BITS)) & 1 == 1
    }

    /// Sets entry `(r, c)`.
    #[inline]
    pub fn set(&mut self, r: usize, c: usize, value: bool) {
        debug_assert!(r < self.rows && c < self.cols);
        let word = &mut self.words[r * self.stride + c / WORD_BITS];
        let mask = 1u64 << (c % WORD_BITS);
        if value {
            *word |= mask;
        } else {
            *word &= !mask;
        }
    }

    #[inline]
    fn row_words(&self, r: usize) -> &[u64] {
        &self.words[r * self.stride..(r + 1) * self.stride]
    }

    /// Iterates over `(row, col)` of every nonzero entry in row-major order.
    pub fn nonzero_entries(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.rows).flat_map(move |r| {
            self.row_words(r)
                .iter()
                .enumerate()
                .flat_map(move |(w, &word)| {
                    let mut bits = word;
                    core::iter::from_fn(move || {
                        if bits == 0 {
                            return None;
                        }
                        let tz = bits.trailing_zeros() as usize;
                        bits &= bits - 1;
                        Some((r, w * WORD_BITS + tz))
                    })
                })
        })
    }

    /// The transpose.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut t = Self::zeros(self.cols, self.rows);
        for (r, c) in self.nonzero_entries() {
            t.set(c, r, true);
        }
        t
    }

    /// Matrix product reduced mod 2.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Shape`] if `cols(self) != rows(rhs)`.
    pub fn multiply(&self, rhs: &Self) -> Result<Self> {
        if self.cols != rhs.rows {
            return Err(Error::shape("multiply", self.shape(), rhs.shape()));
        }
        let mut out = Self::zeros(self.rows, rhs.cols);
        for (r, k) in self.nonzero_entries() {
            let src = rhs.row_words(k);
            let dst = &mut out.words[r * out.stride..(r + 1) * out.stride];
            for (d, s) in dst.iter_mut().zip(src) {
                *d ^= s;
            }
        }
        Ok(out)
    }

    /// Elementwise sum (XOR).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Shape`] if the shapes differ.
    pub fn xor(&self, rhs: &Self) -> Result<Self> {
        if self.shape() != rhs.shape() {
            return Err(Error::shape("xor", self.shape(), rhs.shape()));
        }
        let mut out = self.clone();
        for (d, s) in out.words.iter_mut().zip(&rhs.words) {
            *d ^= s;
        }
        Ok(out)
    }

    /// Elementwise equality. Matrices of different shapes are simply unequal.
    #[inline]
    pub fn equal(&self, rhs: &Self) -> bool {
        self == rhs
    }

    /// Horizontal concatenation `[self | rhs]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Shape`] if the row counts differ.
    pub fn hstack(&self, rhs: &Self) -> Result<Self> {
        if self.rows != rhs.rows {
            return Err(Error::shape("hstack", self.shape(), rhs.shape()));
        }
        let mut out = Self::zeros(self.rows, self.cols + rhs.cols);
        for (r, c) in self.nonzero_entries() {
            out.set(r, c, true);
        }
        for (r, c) in rhs.nonzero_entries() {
            out.set(r, self.cols + c, true);
        }
        Ok(out)
    }

    /// Rows of 0/1 bytes.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..self.rows)
            .map(|r| (0..self.cols).map(|c| u8::from(self.get(r, c))).collect())
            .collect()
    }

    /// Entries in row-major order, one byte (0 or 1) per entry.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.rows * self.cols);
        for r in 0..self.rows {
            out.extend((0..self.cols).map(|c| u8::from(self.get(r, c))));
        }
        out
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for w in 0..self.stride {
            self.words.swap(a * self.stride + w, b * self.stride + w);
        }
    }

    /// `row[dst] ^= row[src]`.
    fn xor_row_into(&mut self, src: usize, dst: usize) {
        debug_assert_ne!(src, dst);
        let s = self.stride;
        let (src_row, dst_row) = if src < dst {
            let (lo, hi) = self.words.split_at_mut(dst * s);
            (&lo[src * s..(src + 1) * s], &mut hi[..s])
        } else {
            let (lo, hi) = self.words.split_at_mut(src * s);
            (&hi[..s], &mut lo[dst * s..(dst + 1) * s])
        };
        for (d, v) in dst_row.iter_mut().zip(src_row.iter()) {
            *d ^= v;
        }
    }

    /// True if entries `0..ncols` of row `r` are all zero.
    fn row_prefix_is_zero(&self, r: usize, ncols: usize) -> bool {
        let row = self.row_words(r);
        let full = ncols / WORD_BITS;
        if row[..full].iter().any(|&w| w != 0) {
            return false;
        }
        let rem = ncols % WORD_BITS;
        rem == 0 || row[full] & ((1u64 << rem) - 1) == 0
    }

    /// Full Gauss–Jordan reduction on the first `coeff_cols` columns.
    ///
    /// Columns are scanned left to right; the first row at or below the
    /// current pivot row with a 1 in the column is swapped into place and
    /// XOR-ed into every other row carrying a 1 there. Returns the pivot
    /// columns in order; their count is the rank of the coefficient part.
    pub(crate) fn eliminate(&mut self, coeff_cols: usize) -> Vec<usize> {
        let mut pivots = Vec::new();
        let mut row = 0;
        for col in 0..coeff_cols {
            if row == self.rows {
                break;
            }
            let Some(pivot) = (row..self.rows).find(|&r| self.get(r, col)) else {
                continue;
            };
            self.swap_rows(row, pivot);
            for r in 0..self.rows {
                if r != row && self.get(r, col) {
                    self.xor_row_into(row, r);
                }
            }
            pivots.push(col);
            row += 1;
        }
        pivots
    }

    /// Rank together with the fully reduced row-echelon form.
    pub fn row_reduce(&self) -> (usize, Self) {
        let mut reduced = self.clone();
        let rank = reduced.eliminate(self.cols).len();
        (rank, reduced)
    }

    /// Rank over GF(2).
    pub fn rank(&self) -> usize {
        self.row_reduce().0
    }
}

/// Decides whether the column vector `v` lies in the column space of `b`.
///
/// Eliminates the augmented matrix `[b | v]`; membership fails iff some row
/// reduces to `0 = 1`. When `b` has zero rows its image is `{0}` inside a
/// zero-dimensional space, so only the empty vector belongs to it.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] if `rows(b) != len(v)`, and
/// [`Error::Shape`] if `v` is not a column vector.
pub fn in_image(b: &BitMatrix, v: &BitMatrix) -> Result<bool> {
    if b.rows != v.rows {
        return Err(Error::DimensionMismatch {
            locus: Locus::new("in_image"),
            left_label: "rows(B)",
            left: b.rows,
            right_label: "len(v)",
            right: v.rows,
        });
    }
    if b.rows == 0 {
        return Ok(true);
    }
    if v.cols != 1 {
        return Err(Error::shape("in_image", b.shape(), v.shape()));
    }
    let n = b.cols;
    let mut aug = b.hstack(v)?;
    aug.eliminate(n);
    let inconsistent = (0..aug.rows).any(|r| aug.get(r, n) && aug.row_prefix_is_zero(r, n));
    Ok(!inconsistent)
}

impl fmt::Debug for BitMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitMatrix({}x{})", self.rows, self.cols)?;
        for r in 0..self.rows {
            f.write_str("\n  ")?;
            for c in 0..self.cols {
                f.write_str(if self.get(r, c) { "1" } else { "0" })?;
            }
        }
        Ok(())
    }
}

impl From<BitMatrix> for Vec<Vec<u8>> {
    fn from(m: BitMatrix) -> Self {
        m.to_rows()
    }
}

/// A JSON matrix entry: integers and booleans are both accepted.
#[cfg(feature = "serde")]
#[derive(Clone, Copy, serde::Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Int(i64),
    Bool(bool),
}

#[cfg(feature = "serde")]
impl Gf2Entry for RawEntry {
    fn parity(self) -> bool {
        match self {
            Self::Int(i) => i.parity(),
            Self::Bool(b) => b,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<Vec<Vec<RawEntry>>> for BitMatrix {
    type Error = Error;

    fn try_from(rows: Vec<Vec<RawEntry>>) -> Result<Self> {
        Self::canonicalize(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: &[&[u8]]) -> BitMatrix {
        BitMatrix::canonicalize(rows).unwrap()
    }

    #[test]
    fn canonicalize_reduces_mod_two() {
        let a = BitMatrix::canonicalize(&[[2i64, 3, -1], [4, -3, 0]]).unwrap();
        assert_eq!(a.to_rows(), vec![vec![0, 1, 1], vec![0, 1, 0]]);
    }

    #[test]
    fn canonicalize_empty_is_zero_by_zero() {
        let rows: [[u8; 3]; 0] = [];
        let a = BitMatrix::canonicalize(&rows).unwrap();
        assert_eq!(a.shape(), (0, 0));
    }

    #[test]
    fn canonicalize_rejects_ragged_rows() {
        let rows: Vec<Vec<i32>> = vec![vec![1, 0], vec![1]];
        assert!(matches!(
            BitMatrix::canonicalize(&rows),
            Err(Error::Shape { .. })
        ));
    }

    #[test]
    fn multiply_reduces_mod_two() {
        let a = m(&[&[1, 1], &[0, 1]]);
        let b = m(&[&[1, 0], &[1, 1]]);
        assert_eq!(a.multiply(&b).unwrap(), m(&[&[0, 1], &[1, 1]]));
    }

    #[test]
    fn multiply_shape_error() {
        let a = BitMatrix::zeros(2, 3);
        let b = BitMatrix::zeros(2, 3);
        assert!(matches!(a.multiply(&b), Err(Error::Shape { op: "multiply", .. })));
    }

    #[test]
    fn multiply_across_word_boundary() {
        let n = 130;
        let a = BitMatrix::identity(n);
        let b = BitMatrix::from_fn(n, n, |r, c| (r + c) % 3 == 0);
        assert_eq!(a.multiply(&b).unwrap(), b);
        assert_eq!(b.multiply(&a).unwrap(), b);
    }

    #[test]
    fn unequal_shapes_are_not_equal() {
        assert!(!BitMatrix::zeros(2, 1).equal(&BitMatrix::zeros(1, 2)));
        assert!(BitMatrix::zeros(0, 3).equal(&BitMatrix::zeros(0, 3)));
    }

    #[test]
    fn xor_rejects_shape_mismatch() {
        assert!(BitMatrix::zeros(2, 2).xor(&BitMatrix::zeros(2, 3)).is_err());
    }

    #[test]
    fn rank_examples() {
        assert_eq!(BitMatrix::identity(4).rank(), 4);
        assert_eq!(BitMatrix::zeros(3, 5).rank(), 0);
        // Third row is the sum of the first two.
        assert_eq!(m(&[&[1, 0, 1], &[0, 1, 1], &[1, 1, 0]]).rank(), 2);
        assert_eq!(BitMatrix::zeros(0, 0).rank(), 0);
    }

    #[test]
    fn row_reduce_is_fully_reduced() {
        let (rank, r) = m(&[&[0, 1, 1], &[1, 1, 0], &[1, 0, 1]]).row_reduce();
        assert_eq!(rank, 2);
        assert_eq!(r, m(&[&[1, 0, 1], &[0, 1, 1], &[0, 0, 0]]));
    }

    #[test]
    fn transpose_swaps_shape() {
        let a = m(&[&[1, 0, 0], &[1, 1, 0]]);
        assert_eq!(a.transpose(), m(&[&[1, 1], &[0, 1], &[0, 0]]));
    }

    #[test]
    fn in_image_zero_vector_always_member() {
        let b = m(&[&[0, 0], &[0, 0], &[0, 0]]);
        assert!(in_image(&b, &BitMatrix::column(&[0u8, 0, 0])).unwrap());
    }

    #[test]
    fn in_image_zero_rows() {
        assert!(in_image(&BitMatrix::zeros(0, 0), &BitMatrix::column::<u8>(&[])).unwrap());
        assert!(in_image(&BitMatrix::zeros(0, 4), &BitMatrix::zeros(0, 0)).unwrap());
        let err = in_image(&BitMatrix::zeros(0, 0), &BitMatrix::column(&[1u8])).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                left: 0,
                right: 1,
                ..
            }
        ));
    }

    #[test]
    fn in_image_row_mismatch_reports_counts() {
        let err = in_image(&BitMatrix::zeros(3, 2), &BitMatrix::column(&[1u8, 0])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "dimension mismatch in in_image: rows(B)=3, len(v)=2"
        );
    }

    #[test]
    fn nonzero_entries_row_major() {
        let a = m(&[&[0, 1], &[1, 1]]);
        let nz: Vec<_> = a.nonzero_entries().collect();
        assert_eq!(nz, vec![(0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn hstack_concatenates() {
        let a = m(&[&[1], &[0]]);
        let b = m(&[&[0, 1], &[1, 0]]);
        assert_eq!(a.hstack(&b).unwrap(), m(&[&[1, 0, 1], &[0, 1, 0]]));
    }
}
