//! GF(2) chain-complex identity checking.
//!
//! `otc` verifies algebraic identities over chain complexes whose boundary
//! operators and induced maps are matrices over GF(2), with a signed integer
//! variant ("Z-lift") where exact arithmetic is needed. It checks that
//! boundary squares commute, that homology classes survive transport, that
//! pairings are invariant, and that commutator and triangle identities are
//! witnessed by explicit homotopies. It also builds one parametrized solution
//! (the triangle template) and fingerprints towers of composed moves.
//!
//! # Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`gf2`] | bit-matrix kernel, elimination, image membership |
//! | [`gf2::solve`] | Kronecker products, vectorization, linear solve |
//! | [`chain`] | degree-indexed maps and chain complexes |
//! | [`checks`] | identity checkers and their verdicts |
//! | [`template`] | triangle template builder |
//! | [`tower`] | tower composition, certificates, novelty |
//! | [`zlift`] | signed integer matrices |
//!
//! # Example
//!
//! ```
//! use otc::{boundary_compat, BitMatrix, ChainComplex, DegreeMap};
//!
//! let cx = ChainComplex::new(DegreeMap::from_iter([(1, BitMatrix::identity(2))]))?;
//! let id = DegreeMap::from_iter([(0, BitMatrix::identity(2)), (1, BitMatrix::identity(2))]);
//! assert!(boundary_compat(&cx, &cx, &id)?.holds);
//! # Ok::<(), otc::Error>(())
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for matrices, degree maps, verdicts,
//!   templates, representatives and certificates.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod chain;
pub mod checks;
pub mod error;
pub mod gf2;
pub mod template;
pub mod tower;
pub mod zlift;

pub use chain::{ChainComplex, Degree, DegreeMap};
pub use checks::{
    boundary_compat, boundary_compat_signed, check_pairing, check_pairing_signed, check_support,
    commutator_identity, pairing_value, pairing_value_signed, transport, triangle_coherence,
    SupportIndex, SupportRule, SupportVerdict, TriangleRecord, TriangleTemplate, Verdict,
};
pub use error::{Error, Locus, Result};
pub use gf2::{in_image, BitMatrix};
pub use template::build_triangle_template;
pub use tower::{
    certificate, compose, first_divergence, inject_novelty, run_tower, Certificate,
    NoveltyReport, Representatives, Tower, TowerStep,
};
pub use zlift::IntMatrix;
