//! Error taxonomy for the certificate engine.
//!
//! Three kinds of failure are distinguished from a plain negative verdict:
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | [`Error::Shape`] | operand shapes are incompatible for a kernel operation |
//! | [`Error::DimensionMismatch`] | two components disagree about a dimension |
//! | [`Error::Inconsistent`] | a GF(2) linear system has no solution |
//! | [`Error::Overflow`] | an exact integer (Z-lift) result does not fit in `i64` |
//!
//! "The identity does not hold" is never an error; checkers report it as a
//! [`Verdict`](crate::checks::Verdict) with `holds == false`.

use core::fmt;

use crate::chain::Degree;

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, Error>;

/// Where a dimension disagreement was detected: the check and, when known,
/// the degree it was evaluating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locus {
    /// Short name of the check or operation.
    pub check: &'static str,
    /// Degree under evaluation, if the operation is degree-indexed.
    pub degree: Option<Degree>,
}

impl Locus {
    /// A locus with no degree attached.
    #[inline]
    pub const fn new(check: &'static str) -> Self {
        Self {
            check,
            degree: None,
        }
    }

    /// A locus at a specific degree.
    #[inline]
    pub const fn at(check: &'static str, degree: Degree) -> Self {
        Self {
            check,
            degree: Some(degree),
        }
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.degree {
            Some(k) => write!(f, "{} at degree {}", self.check, k),
            None => f.write_str(self.check),
        }
    }
}

/// Errors surfaced by the engine. All of them indicate malformed input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Operand shapes are incompatible for the requested operation.
    #[error("shape error in {op}: {left_rows}x{left_cols} vs {right_rows}x{right_cols}")]
    Shape {
        /// Operation that rejected its operands.
        op: &'static str,
        /// Rows of the left operand.
        left_rows: usize,
        /// Columns of the left operand.
        left_cols: usize,
        /// Rows of the right operand.
        right_rows: usize,
        /// Columns of the right operand.
        right_cols: usize,
    },

    /// Cross-component dimension disagreement.
    #[error("dimension mismatch in {locus}: {left_label}={left}, {right_label}={right}")]
    DimensionMismatch {
        /// Check and degree where the mismatch surfaced.
        locus: Locus,
        /// Label of the first count, e.g. `rows(B)`.
        left_label: &'static str,
        /// First count.
        left: usize,
        /// Label of the second count, e.g. `len(v)`.
        right_label: &'static str,
        /// Second count.
        right: usize,
    },

    /// The GF(2) system `A·x = b` has no solution.
    #[error("inconsistent GF(2) system: {rows}x{cols} coefficients admit no solution")]
    Inconsistent {
        /// Rows of the coefficient matrix.
        rows: usize,
        /// Columns of the coefficient matrix.
        cols: usize,
    },

    /// A signed product or sum left the `i64` range.
    #[error("integer overflow in {op}")]
    Overflow {
        /// Operation that overflowed.
        op: &'static str,
    },
}

impl Error {
    /// Shape error for a binary operation.
    pub(crate) fn shape(op: &'static str, left: (usize, usize), right: (usize, usize)) -> Self {
        Self::Shape {
            op,
            left_rows: left.0,
            left_cols: left.1,
            right_rows: right.0,
            right_cols: right.1,
        }
    }

    /// Re-labels a [`Error::DimensionMismatch`] with the caller's locus.
    ///
    /// Other variants pass through untouched.
    #[must_use]
    pub fn relocate(self, locus: Locus) -> Self {
        match self {
            Self::DimensionMismatch {
                left_label,
                left,
                right_label,
                right,
                ..
            } => Self::DimensionMismatch {
                locus,
                left_label,
                left,
                right_label,
                right,
            },
            other => other,
        }
    }

    /// True for [`Error::Inconsistent`].
    #[inline]
    pub fn is_inconsistent(&self) -> bool {
        matches!(self, Self::Inconsistent { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_message_names_both_counts_and_degree() {
        let err = Error::DimensionMismatch {
            locus: Locus::at("transport", 2),
            left_label: "rows(B)",
            left: 4,
            right_label: "len(v)",
            right: 3,
        };
        assert_eq!(
            err.to_string(),
            "dimension mismatch in transport at degree 2: rows(B)=4, len(v)=3"
        );
    }

    #[test]
    fn relocate_only_touches_mismatch() {
        let err = Error::DimensionMismatch {
            locus: Locus::new("in_image"),
            left_label: "rows(B)",
            left: 1,
            right_label: "len(v)",
            right: 2,
        };
        let moved = err.relocate(Locus::at("transport", 0));
        assert!(moved.to_string().contains("transport at degree 0"));

        let inc = Error::Inconsistent { rows: 1, cols: 1 };
        assert_eq!(inc.clone().relocate(Locus::new("x")), inc);
    }
}
