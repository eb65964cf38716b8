//! Identity checkers.
//!
//! Every checker is a pure function of its inputs and returns a boolean
//! verdict together with a structured per-degree record. A failed identity
//! is a verdict, never an error; errors are reserved for malformed input.
//!
//! | Checker | Identity |
//! |---------|----------|
//! | [`boundary_compat`] | `d_Y(k)·C(k) = C(k-1)·d_X(k)` |
//! | [`transport`] | `C(k)·c_dom ⊕ c_cod ∈ im d_Y(k+1)` |
//! | [`pairing_value`] | `v_hiᵀ·B·v_lo` unchanged by transport |
//! | [`check_support`] | nonzero entries inside declared index sets |
//! | [`commutator_identity`] | `d·H ⊕ H·d = C₂C₁ ⊕ C₁C₂` |
//! | [`triangle_coherence`] | `d·J ⊕ J·d = A ⊕ B` |

use std::collections::BTreeMap;

use crate::chain::Degree;

mod boundary;
mod commutator;
mod pairing;
mod support;
mod transport;
mod triangle;

pub use boundary::{boundary_compat, boundary_compat_signed};
pub use commutator::commutator_identity;
pub use pairing::{
    check_pairing, check_pairing_signed, pairing_value, pairing_value_signed, PairingOutcome,
};
pub use support::{check_support, Axis, SupportIndex, SupportRule, SupportVerdict, SupportViolation};
pub use transport::{transport, TransportOutcome};
pub use triangle::{triangle_coherence, TriangleRecord, TriangleTemplate};

/// Outcome of a checker at one degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DegreeDetail {
    /// Whether the identity holds at this degree.
    pub eq: bool,
    /// Dimension of the chain group at this degree.
    pub n_k: usize,
}

/// Overall verdict of a degreewise checker.
///
/// `holds` is the conjunction of every recorded degree; a verdict with no
/// evaluated degree holds vacuously.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Verdict {
    /// True iff the identity holds at every evaluated degree.
    pub holds: bool,
    /// Per-degree details, ascending.
    pub degrees: BTreeMap<Degree, DegreeDetail>,
}

impl Verdict {
    /// A vacuously holding verdict.
    #[must_use]
    pub fn new() -> Self {
        Self {
            holds: true,
            degrees: BTreeMap::new(),
        }
    }

    /// Records the outcome at degree `k`.
    pub fn record(&mut self, k: Degree, eq: bool, n_k: usize) {
        self.holds &= eq;
        self.degrees.insert(k, DegreeDetail { eq, n_k });
    }

    /// Degrees where the identity failed.
    pub fn failing_degrees(&self) -> impl Iterator<Item = Degree> + '_ {
        self.degrees
            .iter()
            .filter(|(_, d)| !d.eq)
            .map(|(&k, _)| k)
    }
}

impl Default for Verdict {
    fn default() -> Self {
        Self::new()
    }
}
