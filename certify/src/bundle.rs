//! On-disk input files and their loaders.
//!
//! | File | Shape |
//! |------|-------|
//! | complex | `{"boundaries": {k: matrix}}` |
//! | blocks | `{"blocks": {k: matrix}}` |
//! | representatives | `{"k3", "k2", "c3_dom", "c3_cod", "c2_dom", "c2_cod"}` |
//! | support | `{k: {"rows": [...], "cols": [...]}}` |
//! | template | `{k: {"A"?, "B"?, "J"?, "feasible"?, "carrier"?}}` |
//! | form | `matrix` |
//!
//! Matrices are nested arrays of integers or booleans; GF(2) inputs are
//! reduced mod 2 on load.

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use otc::{BitMatrix, ChainComplex, DegreeMap, IntMatrix, Representatives, SupportIndex, TriangleTemplate};

/// A complex file.
#[derive(Debug, Clone, Deserialize)]
pub struct ComplexFile<M = BitMatrix> {
    /// Boundary matrices by degree.
    pub boundaries: DegreeMap<M>,
}

/// A blocks file: one chain map, move, or homotopy.
#[derive(Debug, Clone, Deserialize)]
pub struct BlocksFile<M = BitMatrix> {
    /// Blocks by degree.
    pub blocks: DegreeMap<M>,
}

/// Reads and parses a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not match `T`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Loads a GF(2) chain complex.
///
/// # Errors
///
/// Returns an error if the file is unreadable, malformed, or its boundaries
/// disagree about a dimension.
pub fn load_complex(path: &Path) -> Result<ChainComplex> {
    let file: ComplexFile = read_json(path)?;
    ChainComplex::new(file.boundaries)
        .with_context(|| format!("Invalid chain complex in {}", path.display()))
}

/// Loads the raw boundary blocks of a complex, without assembling it.
///
/// # Errors
///
/// Returns an error if the file is unreadable or malformed.
pub fn load_boundaries<M: DeserializeOwned>(path: &Path) -> Result<DegreeMap<M>> {
    Ok(read_json::<ComplexFile<M>>(path)?.boundaries)
}

/// Loads GF(2) blocks.
///
/// # Errors
///
/// Returns an error if the file is unreadable or malformed.
pub fn load_blocks(path: &Path) -> Result<DegreeMap> {
    Ok(read_json::<BlocksFile>(path)?.blocks)
}

/// Loads signed blocks for Z-lift checks.
///
/// # Errors
///
/// Returns an error if the file is unreadable or malformed.
pub fn load_signed_blocks(path: &Path) -> Result<DegreeMap<IntMatrix>> {
    Ok(read_json::<BlocksFile<IntMatrix>>(path)?.blocks)
}

/// Loads representatives.
///
/// # Errors
///
/// Returns an error if the file is unreadable or malformed.
pub fn load_reps(path: &Path) -> Result<Representatives> {
    read_json(path)
}

/// Loads a support index.
///
/// # Errors
///
/// Returns an error if the file is unreadable or malformed.
pub fn load_support(path: &Path) -> Result<SupportIndex> {
    read_json(path)
}

/// Loads a triangle template.
///
/// # Errors
///
/// Returns an error if the file is unreadable or malformed.
pub fn load_template(path: &Path) -> Result<TriangleTemplate> {
    read_json(path)
}

/// Loads a GF(2) bilinear form.
///
/// # Errors
///
/// Returns an error if the file is unreadable or malformed.
pub fn load_form(path: &Path) -> Result<BitMatrix> {
    read_json(path)
}

/// Loads a signed bilinear form.
///
/// # Errors
///
/// Returns an error if the file is unreadable or malformed.
pub fn load_signed_form(path: &Path) -> Result<IntMatrix> {
    read_json(path)
}

/// Loads one blocks file per tower step, in order.
///
/// # Errors
///
/// Returns an error naming the first file that fails to load.
pub fn load_tower<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<DegreeMap>> {
    paths
        .iter()
        .enumerate()
        .map(|(i, p)| load_blocks(p.as_ref()).with_context(|| format!("Tower step {}", i + 1)))
        .collect()
}
