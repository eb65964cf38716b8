//! Support (locality) constraints on map blocks.

use std::collections::{BTreeMap, BTreeSet};

use crate::chain::{Degree, DegreeMap};

/// Allowed row and column indices for one degree. An empty set means the
/// axis is unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupportRule {
    /// Allowed row indices.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rows: BTreeSet<usize>,
    /// Allowed column indices.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cols: BTreeSet<usize>,
}

impl SupportRule {
    /// A rule restricting both axes.
    pub fn new(rows: impl IntoIterator<Item = usize>, cols: impl IntoIterator<Item = usize>) -> Self {
        Self {
            rows: rows.into_iter().collect(),
            cols: cols.into_iter().collect(),
        }
    }

    fn violation(&self, r: usize, c: usize) -> Option<Axis> {
        if !self.rows.is_empty() && !self.rows.contains(&r) {
            Some(Axis::Row)
        } else if !self.cols.is_empty() && !self.cols.contains(&c) {
            Some(Axis::Col)
        } else {
            None
        }
    }
}

/// Per-degree support rules. Degrees without a rule are unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct SupportIndex {
    rules: BTreeMap<Degree, SupportRule>,
}

impl SupportIndex {
    /// An index with no rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the rule for degree `k`.
    pub fn insert(&mut self, k: Degree, rule: SupportRule) {
        self.rules.insert(k, rule);
    }

    /// The rule for degree `k`, if declared.
    pub fn rule(&self, k: Degree) -> Option<&SupportRule> {
        self.rules.get(&k)
    }

    /// `(degree, rule)` pairs, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (Degree, &SupportRule)> {
        self.rules.iter().map(|(&k, r)| (k, r))
    }
}

impl FromIterator<(Degree, SupportRule)> for SupportIndex {
    fn from_iter<I: IntoIterator<Item = (Degree, SupportRule)>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

/// Which index set an entry fell outside of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Axis {
    /// The row index is not allowed.
    Row,
    /// The column index is not allowed.
    Col,
}

/// A nonzero entry outside its declared support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupportViolation {
    /// Degree of the offending block.
    pub degree: Degree,
    /// Row of the entry.
    pub row: usize,
    /// Column of the entry.
    pub col: usize,
    /// The axis whose rule was broken.
    pub axis: Axis,
}

/// Outcome of [`check_support`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupportVerdict {
    /// True iff no violation was found.
    pub holds: bool,
    /// Every offending entry, in degree then row-major order.
    pub violations: Vec<SupportViolation>,
}

/// Checks every nonzero entry of every block against the declared support.
pub fn check_support(cmap: &DegreeMap, index: &SupportIndex) -> SupportVerdict {
    let mut violations = Vec::new();
    for (&k, block) in cmap {
        let Some(rule) = index.rule(k) else {
            continue;
        };
        violations.extend(block.nonzero_entries().filter_map(|(row, col)| {
            rule.violation(row, col).map(|axis| SupportViolation {
                degree: k,
                row,
                col,
                axis,
            })
        }));
    }
    SupportVerdict {
        holds: violations.is_empty(),
        violations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gf2::BitMatrix;

    fn block() -> BitMatrix {
        BitMatrix::canonicalize(&[[1u8, 0, 0], [0, 0, 1]]).unwrap()
    }

    #[test]
    fn unrestricted_without_rules() {
        let cmap = DegreeMap::from_iter([(1, block())]);
        assert!(check_support(&cmap, &SupportIndex::new()).holds);
    }

    #[test]
    fn entries_inside_support_pass() {
        let cmap = DegreeMap::from_iter([(1, block())]);
        let idx = SupportIndex::from_iter([(1, SupportRule::new([0, 1], [0, 2]))]);
        assert!(check_support(&cmap, &idx).holds);
    }

    #[test]
    fn column_violation_is_reported() {
        let cmap = DegreeMap::from_iter([(1, block())]);
        let idx = SupportIndex::from_iter([(1, SupportRule::new([], [0]))]);
        let v = check_support(&cmap, &idx);
        assert!(!v.holds);
        assert_eq!(
            v.violations,
            vec![SupportViolation {
                degree: 1,
                row: 1,
                col: 2,
                axis: Axis::Col
            }]
        );
    }

    #[test]
    fn rules_only_apply_to_their_degree() {
        let cmap = DegreeMap::from_iter([(1, block())]);
        let idx = SupportIndex::from_iter([(0, SupportRule::new([5], [5]))]);
        assert!(check_support(&cmap, &idx).holds);
    }
}
