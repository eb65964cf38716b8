//! Shape-manifest pre-validation.
//!
//! A manifest declares, per degree, the expected `dim_k` and `dim_{k-1}`.
//! The `enforce_*` functions compare parsed inputs against it and reject
//! malformed input before any algebra runs.

use std::collections::BTreeMap;

use serde::Deserialize;

use otc::checks::Axis;
use otc::{Degree, DegreeMap, Representatives, SupportIndex};

/// Declared dimensions at one degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DegreeShape {
    /// `dim(k)`.
    pub dim_k: usize,
    /// `dim(k-1)`.
    pub dim_k_minus_1: usize,
}

/// A shape manifest: `{"degrees": {k: {"dim_k", "dim_k_minus_1"}}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    /// Declared shapes by degree.
    pub degrees: BTreeMap<Degree, DegreeShape>,
}

/// A manifest violation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManifestError {
    /// The manifest does not declare a degree the input uses.
    #[error("manifest declares no shape for {what} at degree {degree}")]
    UndeclaredDegree {
        /// What was being validated.
        what: &'static str,
        /// The undeclared degree.
        degree: Degree,
    },

    /// A boundary matrix has the wrong shape.
    #[error("d_{degree} shape {rows}x{cols} != {want_rows}x{want_cols}")]
    BoundaryShape {
        /// Degree of the boundary.
        degree: Degree,
        /// Actual rows.
        rows: usize,
        /// Actual columns.
        cols: usize,
        /// Declared `dim(k-1)`.
        want_rows: usize,
        /// Declared `dim(k)`.
        want_cols: usize,
    },

    /// A map block has the wrong number of columns.
    #[error("C_{degree} cols {cols} != dim_k {want}")]
    MapColumns {
        /// Degree of the block.
        degree: Degree,
        /// Actual columns.
        cols: usize,
        /// Declared `dim(k)`.
        want: usize,
    },

    /// A representative has the wrong length.
    #[error("{name} length {len} != dim_k {want} at degree {degree}")]
    RepresentativeLength {
        /// Field name, e.g. `c3_dom`.
        name: &'static str,
        /// Degree of the class.
        degree: Degree,
        /// Actual length.
        len: usize,
        /// Declared `dim(k)`.
        want: usize,
    },

    /// A support index is out of range.
    #[error("{axis:?} index {index} out of bounds {bound} for degree {degree}")]
    SupportBound {
        /// Degree of the rule.
        degree: Degree,
        /// Which index set.
        axis: Axis,
        /// Offending index.
        index: usize,
        /// Exclusive bound.
        bound: usize,
    },
}

impl Manifest {
    fn shape(&self, what: &'static str, degree: Degree) -> Result<DegreeShape, ManifestError> {
        self.degrees
            .get(&degree)
            .copied()
            .ok_or(ManifestError::UndeclaredDegree { what, degree })
    }
}

/// Every boundary `d_k` must be `dim_k_minus_1 × dim_k`.
///
/// # Errors
///
/// Returns the first [`ManifestError`] found, in ascending degree order.
pub fn enforce_chain_shapes(boundaries: &DegreeMap, manifest: &Manifest) -> Result<(), ManifestError> {
    for (&degree, d) in boundaries {
        let want = manifest.shape("boundary", degree)?;
        if d.shape() != (want.dim_k_minus_1, want.dim_k) {
            return Err(ManifestError::BoundaryShape {
                degree,
                rows: d.rows(),
                cols: d.cols(),
                want_rows: want.dim_k_minus_1,
                want_cols: want.dim_k,
            });
        }
    }
    Ok(())
}

/// Every map block `C_k` must have `dim_k` columns.
///
/// # Errors
///
/// Returns the first [`ManifestError`] found, in ascending degree order.
pub fn enforce_map_shapes(blocks: &DegreeMap, manifest: &Manifest) -> Result<(), ManifestError> {
    for (&degree, c) in blocks {
        let want = manifest.shape("map block", degree)?;
        if c.cols() != want.dim_k {
            return Err(ManifestError::MapColumns {
                degree,
                cols: c.cols(),
                want: want.dim_k,
            });
        }
    }
    Ok(())
}

/// All four representatives must have length `dim_k` at their degree.
///
/// # Errors
///
/// Returns the first [`ManifestError`] found.
pub fn enforce_rep_lengths(reps: &Representatives, manifest: &Manifest) -> Result<(), ManifestError> {
    let fields: [(&'static str, Degree, &[i64]); 4] = [
        ("c3_dom", reps.k3, &reps.c3_dom),
        ("c3_cod", reps.k3, &reps.c3_cod),
        ("c2_dom", reps.k2, &reps.c2_dom),
        ("c2_cod", reps.k2, &reps.c2_cod),
    ];
    for (name, degree, v) in fields {
        let want = manifest.shape("representative", degree)?.dim_k;
        if v.len() != want {
            return Err(ManifestError::RepresentativeLength {
                name,
                degree,
                len: v.len(),
                want,
            });
        }
    }
    Ok(())
}

/// Support rows must be below `dim_k_minus_1` and columns below `dim_k`.
///
/// # Errors
///
/// Returns the first [`ManifestError`] found.
pub fn enforce_support_bounds(support: &SupportIndex, manifest: &Manifest) -> Result<(), ManifestError> {
    for (degree, rule) in support.iter() {
        let want = manifest.shape("support rule", degree)?;
        let bounds = [
            (Axis::Row, &rule.rows, want.dim_k_minus_1),
            (Axis::Col, &rule.cols, want.dim_k),
        ];
        for (axis, set, bound) in bounds {
            if let Some(&index) = set.iter().find(|&&i| i >= bound) {
                return Err(ManifestError::SupportBound {
                    degree,
                    axis,
                    index,
                    bound,
                });
            }
        }
    }
    Ok(())
}
