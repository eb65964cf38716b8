//! Tower composition and certificate hashing.
//!
//! A tower is an ordered sequence of moves, each a degree-indexed map. Its
//! prefix of length `i` composes to `C_i·…·C_2·C_1`; the certificate of step
//! `i` is the BLAKE2b-128 digest of the two designated representatives pushed
//! through that composite. Substituting one move changes the certificates
//! from that step on and never before, which is what novelty detection
//! looks for.

use core::fmt;
use core::str::FromStr;

use blake2::digest::consts::U16;
use blake2::{Blake2b, Digest};
use tracing::{debug, warn};

use crate::chain::{Degree, DegreeMap};
use crate::error::Result;
use crate::gf2::BitMatrix;

type Blake2b128 = Blake2b<U16>;

/// A 128-bit certificate digest. Displays and parses as 32 lowercase hex
/// characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Certificate([u8; 16]);

impl Certificate {
    /// Wraps a raw digest.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// The raw digest.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Hex encoding of the digest.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Certificate({})", &self.to_hex()[..12])
    }
}

/// Failure to parse a [`Certificate`] from text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CertificateParseError {
    /// Not valid hex.
    #[error("certificate is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    /// Valid hex of the wrong length.
    #[error("certificate must be 16 bytes, got {0}")]
    Length(usize),
}

impl FromStr for Certificate {
    type Err = CertificateParseError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        let digest: [u8; 16] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| CertificateParseError::Length(bytes.len()))?;
        Ok(Self(digest))
    }
}

impl TryFrom<String> for Certificate {
    type Error = CertificateParseError;

    fn try_from(s: String) -> core::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Certificate> for String {
    fn from(c: Certificate) -> Self {
        c.to_hex()
    }
}

/// The two designated representative classes.
///
/// Vectors are kept as integers so the same record serves GF(2) checks
/// (reduced mod 2) and signed pairings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Representatives {
    /// Degree of the first class.
    pub k3: Degree,
    /// Degree of the second class.
    pub k2: Degree,
    /// First class in the domain.
    pub c3_dom: Vec<i64>,
    /// First class target in the codomain.
    #[cfg_attr(feature = "serde", serde(default))]
    pub c3_cod: Vec<i64>,
    /// Second class in the domain.
    pub c2_dom: Vec<i64>,
    /// Second class target in the codomain.
    #[cfg_attr(feature = "serde", serde(default))]
    pub c2_cod: Vec<i64>,
}

impl Representatives {
    /// `c3_dom` as a GF(2) column.
    pub fn c3_dom_bits(&self) -> BitMatrix {
        BitMatrix::column(&self.c3_dom)
    }

    /// `c3_cod` as a GF(2) column.
    pub fn c3_cod_bits(&self) -> BitMatrix {
        BitMatrix::column(&self.c3_cod)
    }

    /// `c2_dom` as a GF(2) column.
    pub fn c2_dom_bits(&self) -> BitMatrix {
        BitMatrix::column(&self.c2_dom)
    }

    /// `c2_cod` as a GF(2) column.
    pub fn c2_cod_bits(&self) -> BitMatrix {
        BitMatrix::column(&self.c2_cod)
    }
}

/// Composes moves in order: `total(k) = C_N(k)·…·C_1(k)`.
///
/// Degrees are those of the first move, starting from `I_{rows(C_1(k))}`. A
/// later move without a block at one of those degrees contributes the zero
/// block. An empty sequence composes to the empty map.
///
/// # Errors
///
/// Returns [`Error::Shape`](crate::Error::Shape) if consecutive blocks do not
/// chain.
pub fn compose(moves: &[DegreeMap]) -> Result<DegreeMap> {
    let Some(first) = moves.first() else {
        return Ok(DegreeMap::new());
    };
    let mut total = start(first);
    for mv in moves {
        fold(&mut total, mv)?;
    }
    Ok(total)
}

fn start(first: &DegreeMap) -> DegreeMap {
    first
        .iter()
        .map(|(&k, block)| (k, BitMatrix::identity(block.rows())))
        .collect()
}

fn fold(total: &mut DegreeMap, mv: &DegreeMap) -> Result<()> {
    for (&k, acc) in total.iter_mut() {
        let n = acc.rows();
        if !mv.contains(k) {
            warn!(degree = k, "move has no block at a tower degree, using zero");
        }
        let block = mv.get_or_zero(k, n, n);
        *acc = block.multiply(acc)?;
    }
    Ok(())
}

fn push(total: &DegreeMap, k: Degree, rep: &[i64]) -> Result<BitMatrix> {
    let v = BitMatrix::column(rep);
    total.get_or_zero(k, v.rows(), v.rows()).multiply(&v)
}

/// Hashes the representatives transported through `total`.
///
/// The digest input is `total(k3)·c3_dom` followed by `total(k2)·c2_dom`, one
/// byte per bit. A degree missing from `total` maps the vector to zero.
///
/// # Errors
///
/// Returns [`Error::Shape`](crate::Error::Shape) if a representative does not
/// fit its block.
pub fn certificate(total: &DegreeMap, reps: &Representatives) -> Result<Certificate> {
    let v3 = push(total, reps.k3, &reps.c3_dom)?;
    let v2 = push(total, reps.k2, &reps.c2_dom)?;
    let mut hasher = Blake2b128::new();
    hasher.update(v3.to_bytes());
    hasher.update(v2.to_bytes());
    Ok(Certificate(hasher.finalize().into()))
}

/// One step of a tower run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TowerStep {
    /// 1-based prefix length.
    pub step: usize,
    /// Certificate of the composite of the first `step` moves.
    pub hash: Certificate,
}

/// A tower of moves with its representatives.
///
/// Iterating is pure: every call to [`Tower::steps`] starts from scratch and
/// yields the same certificates.
#[derive(Debug, Clone, Copy)]
pub struct Tower<'a> {
    moves: &'a [DegreeMap],
    reps: &'a Representatives,
}

impl<'a> Tower<'a> {
    /// A tower over `moves`.
    pub fn new(moves: &'a [DegreeMap], reps: &'a Representatives) -> Self {
        Self { moves, reps }
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// True iff the tower has no moves.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Lazy per-step certificates, in order.
    pub fn steps(&self) -> TowerSteps<'a> {
        TowerSteps {
            tower: *self,
            total: self.moves.first().map(start).unwrap_or_default(),
            next: 0,
        }
    }
}

impl<'a> IntoIterator for &Tower<'a> {
    type Item = Result<TowerStep>;
    type IntoIter = TowerSteps<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps()
    }
}

/// Iterator over the certificates of a [`Tower`].
///
/// The composite is folded one move per step, which equals composing each
/// prefix from scratch. Iteration stops after the first error.
#[derive(Debug, Clone)]
pub struct TowerSteps<'a> {
    tower: Tower<'a>,
    total: DegreeMap,
    next: usize,
}

impl Iterator for TowerSteps<'_> {
    type Item = Result<TowerStep>;

    fn next(&mut self) -> Option<Self::Item> {
        let mv = self.tower.moves.get(self.next)?;
        self.next += 1;
        let step = fold(&mut self.total, mv)
            .and_then(|()| certificate(&self.total, self.tower.reps))
            .map(|hash| TowerStep {
                step: self.next,
                hash,
            });
        match &step {
            Ok(s) => debug!(step = s.step, hash = %s.hash, "tower step"),
            Err(_) => self.next = self.tower.moves.len(),
        }
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.tower.moves.len() - self.next;
        (0, Some(left))
    }
}

/// Certificates for every prefix `1..=N` of `moves`.
///
/// # Errors
///
/// Propagates the first composition or hashing error.
pub fn run_tower(moves: &[DegreeMap], reps: &Representatives) -> Result<Vec<TowerStep>> {
    Tower::new(moves, reps).steps().collect()
}

/// `moves` with the move at 1-based `step` replaced, or `None` if `step` is
/// out of range.
pub fn inject_novelty(moves: &[DegreeMap], step: usize, replacement: DegreeMap) -> Option<Vec<DegreeMap>> {
    if step == 0 || step > moves.len() {
        return None;
    }
    let mut out = moves.to_vec();
    out[step - 1] = replacement;
    Some(out)
}

/// First 1-based step at which the two runs disagree, comparing the common
/// prefix only.
pub fn first_divergence(base: &[TowerStep], other: &[TowerStep]) -> Option<usize> {
    base.iter()
        .zip(other)
        .find(|(a, b)| a.hash != b.hash)
        .map(|(a, _)| a.step)
}

/// A baseline tower run compared with a run where one move was substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoveltyReport {
    /// 1-based step that was substituted.
    pub injected_at: usize,
    /// Certificates of the original tower.
    pub baseline: Vec<TowerStep>,
    /// Certificates after substitution.
    pub injected: Vec<TowerStep>,
    /// First step whose certificate changed.
    pub first_divergence: Option<usize>,
}

impl NoveltyReport {
    /// Compares two runs.
    pub fn new(injected_at: usize, baseline: Vec<TowerStep>, injected: Vec<TowerStep>) -> Self {
        let first_divergence = first_divergence(&baseline, &injected);
        Self {
            injected_at,
            baseline,
            injected,
            first_divergence,
        }
    }

    /// Runs `moves` with and without the substitution at `step`.
    ///
    /// Returns `Ok(None)` if `step` is out of range.
    ///
    /// # Errors
    ///
    /// Propagates [`run_tower`] errors from either run.
    pub fn detect(
        moves: &[DegreeMap],
        reps: &Representatives,
        step: usize,
        replacement: DegreeMap,
    ) -> Result<Option<Self>> {
        let Some(injected) = inject_novelty(moves, step, replacement) else {
            return Ok(None);
        };
        let baseline = run_tower(moves, reps)?;
        let injected = run_tower(&injected, reps)?;
        Ok(Some(Self::new(step, baseline, injected)))
    }

    /// True iff a divergence was detected.
    pub fn is_novel(&self) -> bool {
        self.first_divergence.is_some()
    }

    /// True iff no certificate before the substituted step changed.
    pub fn is_localized(&self) -> bool {
        self.first_divergence.map_or(true, |s| s >= self.injected_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: &[&[u8]]) -> BitMatrix {
        BitMatrix::canonicalize(rows).unwrap()
    }

    fn reps() -> Representatives {
        Representatives {
            k3: 1,
            k2: 0,
            c3_dom: vec![1, 0],
            c2_dom: vec![0, 1],
            ..Representatives::default()
        }
    }

    fn swap() -> BitMatrix {
        m(&[&[0, 1], &[1, 0]])
    }

    fn shear() -> BitMatrix {
        m(&[&[1, 1], &[0, 1]])
    }

    #[test]
    fn compose_left_multiplies_in_order() {
        let a = DegreeMap::from_iter([(0, swap())]);
        let b = DegreeMap::from_iter([(0, shear())]);
        let ab = compose(&[a.clone(), b.clone()]).unwrap();
        let ba = compose(&[b, a]).unwrap();
        assert_eq!(ab.get(0), Some(&shear().multiply(&swap()).unwrap()));
        assert_ne!(ab, ba);
    }

    #[test]
    fn compose_of_nothing_is_empty() {
        assert!(compose(&[]).unwrap().is_empty());
    }

    #[test]
    fn missing_block_in_later_move_is_zero() {
        let a = DegreeMap::from_iter([(0, swap()), (1, swap())]);
        let b = DegreeMap::from_iter([(0, swap())]);
        let total = compose(&[a, b]).unwrap();
        assert_eq!(total.get(0), Some(&BitMatrix::identity(2)));
        assert!(total.get(1).unwrap().is_zero());
    }

    #[test]
    fn certificate_is_deterministic_and_hex() {
        let total = DegreeMap::from_iter([(0, BitMatrix::identity(2)), (1, BitMatrix::identity(2))]);
        let c = certificate(&total, &reps()).unwrap();
        assert_eq!(c, certificate(&total, &reps()).unwrap());
        let hex = c.to_string();
        assert_eq!(hex.len(), 32);
        assert_eq!(hex.parse::<Certificate>().unwrap(), c);
    }

    #[test]
    fn certificate_hashes_transported_bits() {
        // BLAKE2b with a 16-byte digest over the bytes [1, 0, 0, 1].
        let expected: Certificate = "008d3732a6828cf91c8ae787f271a235".parse().unwrap();
        let total = DegreeMap::from_iter([(0, BitMatrix::identity(2)), (1, BitMatrix::identity(2))]);
        assert_eq!(certificate(&total, &reps()).unwrap(), expected);
    }

    #[test]
    fn bad_certificate_text_is_rejected() {
        assert!(matches!(
            "zz".parse::<Certificate>(),
            Err(CertificateParseError::Hex(_))
        ));
        assert_eq!(
            "abcd".parse::<Certificate>(),
            Err(CertificateParseError::Length(2))
        );
    }

    #[test]
    fn steps_match_prefix_composition_and_restart() {
        let moves = vec![
            DegreeMap::from_iter([(0, swap()), (1, shear())]),
            DegreeMap::from_iter([(0, shear()), (1, swap())]),
            DegreeMap::from_iter([(0, swap()), (1, swap())]),
        ];
        let r = reps();
        let tower = Tower::new(&moves, &r);
        let first: Vec<_> = tower.steps().collect::<Result<_>>().unwrap();
        let again = run_tower(&moves, &r).unwrap();
        assert_eq!(first, again);
        for s in &first {
            let total = compose(&moves[..s.step]).unwrap();
            assert_eq!(s.hash, certificate(&total, &r).unwrap());
        }
        assert_eq!(first.iter().map(|s| s.step).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn novelty_changes_from_the_substituted_step() {
        let id = DegreeMap::from_iter([(0, BitMatrix::identity(2)), (1, BitMatrix::identity(2))]);
        let moves = vec![id.clone(), id.clone(), id];
        let replacement = DegreeMap::from_iter([(0, BitMatrix::identity(2)), (1, swap())]);
        let report = NoveltyReport::detect(&moves, &reps(), 2, replacement)
            .unwrap()
            .unwrap();
        assert_eq!(report.first_divergence, Some(2));
        assert!(report.is_novel());
        assert!(report.is_localized());
        assert_eq!(report.baseline[0], report.injected[0]);
        assert_ne!(report.baseline[2], report.injected[2]);
    }

    #[test]
    fn novelty_step_out_of_range() {
        let moves = vec![DegreeMap::from_iter([(0, swap())])];
        assert!(inject_novelty(&moves, 0, DegreeMap::new()).is_none());
        assert!(inject_novelty(&moves, 2, DegreeMap::new()).is_none());
        assert!(NoveltyReport::detect(&moves, &reps(), 3, DegreeMap::new()).unwrap().is_none());
    }

    #[test]
    fn misfit_representative_stops_the_run() {
        let moves = vec![DegreeMap::from_iter([(1, BitMatrix::identity(3))]); 2];
        let r = reps();
        let mut steps = Tower::new(&moves, &r).steps();
        assert!(steps.next().unwrap().is_err());
        assert!(steps.next().is_none());
    }
}
