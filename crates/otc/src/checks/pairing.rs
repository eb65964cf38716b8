//! Pairing invariance.
//!
//! The pairing of two representatives is `v_hiᵀ·B·v_lo` for a bilinear form
//! `B`, or the dot product over their shared prefix when no form is given.
//! A map preserves the pairing iff the value is the same before and after
//! transport.

use crate::error::{Error, Result};
use crate::gf2::BitMatrix;
use crate::zlift::IntMatrix;

/// Pairing values before and after transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairingOutcome<T> {
    /// Pairing of the domain representatives.
    pub before: T,
    /// Pairing of the codomain representatives.
    pub after: T,
    /// `before == after`.
    pub holds: bool,
}

impl<T: PartialEq + Copy> PairingOutcome<T> {
    fn new(before: T, after: T) -> Self {
        Self {
            before,
            after,
            holds: before == after,
        }
    }
}

/// `v_hiᵀ·B·v_lo` mod 2, or the truncated dot product when `form` is `None`.
///
/// # Errors
///
/// Returns [`Error::Shape`] if the form does not fit the two vectors.
pub fn pairing_value(v_hi: &BitMatrix, v_lo: &BitMatrix, form: Option<&BitMatrix>) -> Result<bool> {
    match form {
        Some(b) => {
            let scalar = v_hi.transpose().multiply(b)?.multiply(v_lo)?;
            scalar_entry(&scalar).ok_or_else(|| Error::shape("pairing", v_hi.shape(), v_lo.shape()))
        }
        None => {
            let n = v_hi.rows().min(v_lo.rows());
            let ones = (0..n).filter(|&i| v_hi.get(i, 0) && v_lo.get(i, 0)).count();
            Ok(ones % 2 == 1)
        }
    }
}

fn scalar_entry(m: &BitMatrix) -> Option<bool> {
    (m.shape() == (1, 1)).then(|| m.get(0, 0))
}

/// `v_hiᵀ·B·v_lo` over the integers, or the truncated dot product.
///
/// # Errors
///
/// Returns [`Error::Shape`] if the form does not fit the two vectors, and
/// [`Error::Overflow`] if the value does not fit in `i64`.
pub fn pairing_value_signed(v_hi: &[i64], v_lo: &[i64], form: Option<&IntMatrix>) -> Result<i64> {
    match form {
        Some(b) => {
            let hi = IntMatrix::column(v_hi).transpose();
            let scalar = hi.multiply(b)?.multiply(&IntMatrix::column(v_lo))?;
            if scalar.shape() == (1, 1) {
                Ok(scalar.get(0, 0))
            } else {
                Err(Error::shape("pairing", (v_hi.len(), 1), (v_lo.len(), 1)))
            }
        }
        None => v_hi
            .iter()
            .zip(v_lo)
            .try_fold(0i64, |acc, (a, b)| a.checked_mul(*b).and_then(|p| acc.checked_add(p)))
            .ok_or(Error::Overflow { op: "pairing" }),
    }
}

/// Compares the GF(2) pairing of the domain pair with that of the codomain pair.
///
/// # Errors
///
/// Propagates [`pairing_value`] errors.
pub fn check_pairing(
    dom: (&BitMatrix, &BitMatrix),
    cod: (&BitMatrix, &BitMatrix),
    form: Option<&BitMatrix>,
) -> Result<PairingOutcome<bool>> {
    let before = pairing_value(dom.0, dom.1, form)?;
    let after = pairing_value(cod.0, cod.1, form)?;
    Ok(PairingOutcome::new(before, after))
}

/// Compares the integer pairing of the domain pair with that of the codomain pair.
///
/// # Errors
///
/// Propagates [`pairing_value_signed`] errors.
pub fn check_pairing_signed(
    dom: (&[i64], &[i64]),
    cod: (&[i64], &[i64]),
    form: Option<&IntMatrix>,
) -> Result<PairingOutcome<i64>> {
    let before = pairing_value_signed(dom.0, dom.1, form)?;
    let after = pairing_value_signed(cod.0, cod.1, form)?;
    Ok(PairingOutcome::new(before, after))
}
