//! Triangle coherence: `d(k+1)·J(k) ⊕ J(k-1)·d(k) = A(k) ⊕ B(k)`.

use std::collections::BTreeMap;

use tracing::debug;

use super::Verdict;
use crate::chain::{ChainComplex, Degree, DegreeMap};
use crate::error::Result;
use crate::gf2::BitMatrix;

/// One degree of a triangle template.
///
/// Missing blocks are zeros. A record flagged as a carrier only supplies
/// `J(k-1)` to the degree above and is not checked on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriangleRecord {
    /// First auxiliary block, `n_k × n_k`.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "A", default, skip_serializing_if = "Option::is_none")
    )]
    pub a: Option<BitMatrix>,
    /// Second auxiliary block, `n_k × n_k`.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "B", default, skip_serializing_if = "Option::is_none")
    )]
    pub b: Option<BitMatrix>,
    /// Connecting homotopy `J(k)`, `n_{k+1} × n_k`.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "J", default, skip_serializing_if = "Option::is_none")
    )]
    pub j: Option<BitMatrix>,
    /// Whether the builder solved this degree. `None` for supplied records.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub feasible: Option<bool>,
    /// Set by the builder on records that exist only to hold `J(k-1)`.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "is_false"))]
    pub carrier: bool,
}

#[cfg(feature = "serde")]
fn is_false(b: &bool) -> bool {
    !*b
}

impl TriangleRecord {
    /// A record with both auxiliary blocks and a homotopy.
    pub fn new(a: BitMatrix, b: BitMatrix, j: BitMatrix) -> Self {
        Self {
            a: Some(a),
            b: Some(b),
            j: Some(j),
            feasible: None,
            carrier: false,
        }
    }

    /// A carrier holding only the homotopy `J(k)` read by degree `k+1`.
    pub fn carrier(j: BitMatrix) -> Self {
        Self {
            j: Some(j),
            carrier: true,
            ..Self::default()
        }
    }
}

/// Degree-indexed triangle records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct TriangleTemplate {
    records: BTreeMap<Degree, TriangleRecord>,
}

impl TriangleTemplate {
    /// An empty template.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the record for degree `k`.
    pub fn insert(&mut self, k: Degree, record: TriangleRecord) -> Option<TriangleRecord> {
        self.records.insert(k, record)
    }

    /// The record at `k`.
    pub fn get(&self, k: Degree) -> Option<&TriangleRecord> {
        self.records.get(&k)
    }

    /// The record at `k`, mutably.
    pub fn get_mut(&mut self, k: Degree) -> Option<&mut TriangleRecord> {
        self.records.get_mut(&k)
    }

    /// `(degree, record)` pairs, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (Degree, &TriangleRecord)> {
        self.records.iter().map(|(&k, r)| (k, r))
    }

    /// Number of records, carriers included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True iff there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The `J` blocks as a homotopy map.
    pub fn homotopy(&self) -> DegreeMap {
        self.records
            .iter()
            .filter_map(|(&k, r)| r.j.clone().map(|j| (k, j)))
            .collect()
    }

    /// Degrees the builder could not solve.
    pub fn infeasible_degrees(&self) -> impl Iterator<Item = Degree> + '_ {
        self.iter()
            .filter(|(_, r)| r.feasible == Some(false))
            .map(|(k, _)| k)
    }
}

impl FromIterator<(Degree, TriangleRecord)> for TriangleTemplate {
    fn from_iter<I: IntoIterator<Item = (Degree, TriangleRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

/// Checks the coherence identity at every degree except carriers.
///
/// Missing `A`/`B` are `n_k × n_k` zeros, a missing `J(k)` is `n_{k+1} × n_k`
/// zeros, and `J(k-1)` is read from the record at `k-1` or is `n_k × n_{k-1}`
/// zeros.
///
/// # Errors
///
/// Returns [`Error::Shape`](crate::Error::Shape) if a block does not fit the
/// complex.
pub fn triangle_coherence(cx: &ChainComplex, template: &TriangleTemplate) -> Result<Verdict> {
    let mut verdict = Verdict::new();
    for (k, rec) in template.iter().filter(|(_, r)| !r.carrier) {
        let n_k = cx.dim(k);
        let (n_up, n_down) = (cx.dim(k + 1), cx.dim(k - 1));
        let zero_sq = || BitMatrix::zeros(n_k, n_k);
        let a = rec.a.clone().unwrap_or_else(zero_sq);
        let b = rec.b.clone().unwrap_or_else(zero_sq);
        let j_k = rec.j.clone().unwrap_or_else(|| BitMatrix::zeros(n_up, n_k));
        let j_km1 = template
            .get(k - 1)
            .and_then(|r| r.j.clone())
            .unwrap_or_else(|| BitMatrix::zeros(n_k, n_down));

        let lhs = cx
            .boundary(k + 1)
            .multiply(&j_k)?
            .xor(&j_km1.multiply(&cx.boundary(k))?)?;
        let rhs = a.xor(&b)?;
        let eq = lhs == rhs;
        debug!(degree = k, eq, "triangle coherence");
        verdict.record(k, eq, n_k);
    }
    Ok(verdict)
}
