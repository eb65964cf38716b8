//! Signed integer matrices for Z-lift checks.
//!
//! The Z-lift variant of a check replaces GF(2) arithmetic by exact integer
//! arithmetic, so signs and multiplicities are no longer lost mod 2. Only
//! products and equality are needed.

use crate::chain::DegreeMap;
use crate::error::{Error, Result};
use crate::gf2::BitMatrix;

/// A dense matrix of signed integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Vec<i64>>", into = "Vec<Vec<i64>>")
)]
pub struct IntMatrix {
    rows: usize,
    cols: usize,
    data: Vec<i64>,
}

impl IntMatrix {
    /// The all-zero `rows × cols` matrix.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    /// The `n × n` identity.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1;
        }
        m
    }

    /// Builds a matrix from nested rows. Zero rows yield `0 × 0`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Shape`] if the rows have unequal lengths.
    pub fn from_rows<R: AsRef<[i64]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(Error::shape("from_rows", (1, row.len()), (1, cols)));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// A column vector (`n × 1`).
    #[must_use]
    pub fn column(entries: &[i64]) -> Self {
        Self {
            rows: entries.len(),
            cols: 1,
            data: entries.to_vec(),
        }
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

    /// Entry `(r, c)`.
    #[inline]
    pub fn get(&self, r: usize, c: usize) -> i64 {
        self.data[r * self.cols + c]
    }

    /// Exact integer product.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Shape`] if `cols(self) != rows(rhs)`, and
    /// [`Error::Overflow`] if an entry does not fit in `i64`.
    pub fn multiply(&self, rhs: &Self) -> Result<Self> {
        if self.cols != rhs.rows {
            return Err(Error::shape("multiply", self.shape(), rhs.shape()));
        }
        let mut out = Self::zeros(self.rows, rhs.cols);
        for r in 0..self.rows {
            for k in 0..self.cols {
                let a = self.get(r, k);
                if a == 0 {
                    continue;
                }
                for c in 0..rhs.cols {
                    let idx = r * rhs.cols + c;
                    let sum = a
                        .checked_mul(rhs.get(k, c))
                        .and_then(|p| out.data[idx].checked_add(p))
                        .ok_or(Error::Overflow { op: "multiply" })?;
                    out.data[idx] = sum;
                }
            }
        }
        Ok(out)
    }

    /// The transpose.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut t = Self::zeros(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                t.data[c * self.rows + r] = self.get(r, c);
            }
        }
        t
    }

    /// Reduction mod 2.
    #[must_use]
    pub fn to_gf2(&self) -> BitMatrix {
        BitMatrix::from_fn(self.rows, self.cols, |r, c| self.get(r, c) & 1 != 0)
    }

    /// Rows of integers.
    pub fn to_rows(&self) -> Vec<Vec<i64>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.data.chunks(self.cols).map(<[i64]>::to_vec).collect()
    }
}

/// Reduces every block of a signed map mod 2.
pub fn reduce_mod_two(map: &DegreeMap<IntMatrix>) -> DegreeMap {
    map.iter().map(|(&k, m)| (k, m.to_gf2())).collect()
}

impl TryFrom<Vec<Vec<i64>>> for IntMatrix {
    type Error = Error;

    fn try_from(rows: Vec<Vec<i64>>) -> Result<Self> {
        Self::from_rows(&rows)
    }
}

impl From<IntMatrix> for Vec<Vec<i64>> {
    fn from(m: IntMatrix) -> Self {
        m.to_rows()
    }
}
