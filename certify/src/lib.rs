//! Certification runner for odd-tetra certificates.
//!
//! Wraps the `otc` checkers into suites that take already-parsed inputs and
//! produce a typed outcome together with a [`CertificationReport`].
//!
//! | Suite | Checks |
//! |-------|--------|
//! | [`unit_suite`] | boundary compatibility, transport of both classes, pairing, support |
//! | [`overlap_suite`] | commutator identity with an explicit homotopy |
//! | [`triangle_suite`] | triangle coherence of a supplied or built template |
//! | [`tower_suite`] | per-step certificates, optional novelty injection |
//!
//! # Entry Point
//!
//! ```no_run
//! use std::path::Path;
//! use otc_certify::{bundle, overlap_suite};
//!
//! let cx = bundle::load_complex(Path::new("overlap.json"))?;
//! let c1 = bundle::load_blocks(Path::new("m1.json"))?;
//! let c2 = bundle::load_blocks(Path::new("m2.json"))?;
//! let h = bundle::load_blocks(Path::new("h.json"))?;
//! let outcome = overlap_suite(&cx, &c1, &c2, &h)?;
//! assert!(outcome.report.all_passed());
//! # Ok::<(), anyhow::Error>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod bundle;
pub mod manifest;
pub mod report;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::info;

use otc::checks::{
    boundary_compat, boundary_compat_signed, check_pairing, check_pairing_signed, check_support,
    commutator_identity, transport, triangle_coherence, SupportIndex, SupportVerdict, Verdict,
};
use otc::tower::{run_tower, NoveltyReport, TowerStep};
use otc::{build_triangle_template, BitMatrix, ChainComplex, DegreeMap, IntMatrix, Representatives, TriangleTemplate};

pub use manifest::{Manifest, ManifestError};
pub use report::{CertificationReport, CheckResult, Severity};

/// A suite's typed result and its report.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome<T> {
    /// Machine-readable result.
    pub value: T,
    /// Human-readable results.
    pub report: CertificationReport,
}

/// Signed inputs for Z-lift checks.
#[derive(Debug, Clone, Copy)]
pub struct ZLift<'a> {
    /// Signed domain boundaries.
    pub dx: &'a DegreeMap<IntMatrix>,
    /// Signed codomain boundaries.
    pub dy: &'a DegreeMap<IntMatrix>,
    /// Signed map blocks.
    pub cmap: &'a DegreeMap<IntMatrix>,
    /// Signed bilinear form.
    pub form: Option<&'a IntMatrix>,
}

/// Inputs of the per-generator unit suite.
#[derive(Debug, Clone, Copy)]
pub struct UnitInputs<'a> {
    /// Domain complex.
    pub cx: &'a ChainComplex,
    /// Codomain complex.
    pub cy: &'a ChainComplex,
    /// Map blocks over GF(2).
    pub cmap: &'a DegreeMap,
    /// Designated classes.
    pub reps: &'a Representatives,
    /// GF(2) bilinear form for the pairing.
    pub form: Option<&'a BitMatrix>,
    /// Support constraints, checked only when present.
    pub support: Option<&'a SupportIndex>,
    /// Signed inputs; when present boundary and pairing run over Z.
    pub zlift: Option<ZLift<'a>>,
}

/// Verdicts of the unit suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitVerdicts {
    /// Boundary squares commute.
    pub boundary: bool,
    /// `c3_dom` lands in the class of `c3_cod`.
    pub transport_c3: bool,
    /// `c2_dom` lands in the class of `c2_cod`.
    pub transport_c2: bool,
    /// Pairing of domain classes equals pairing of codomain classes.
    pub pairing: bool,
    /// Nonzero entries respect the support index.
    pub support: bool,
}

impl UnitVerdicts {
    /// True iff every check passed.
    pub fn all(&self) -> bool {
        self.boundary && self.transport_c3 && self.transport_c2 && self.pairing && self.support
    }
}

fn degree_details(verdict: &Verdict) -> Vec<String> {
    verdict
        .failing_degrees()
        .filter_map(|k| verdict.degrees.get(&k).map(|d| format!("degree {k}: n_k={}", d.n_k)))
        .collect()
}

fn verdict_result(check: &str, verdict: &Verdict) -> CheckResult {
    let message = format!(
        "{} of {} degree(s) hold",
        verdict.degrees.len() - verdict.failing_degrees().count(),
        verdict.degrees.len()
    );
    CheckResult::from_outcome(check, verdict.holds, message, degree_details(verdict))
}

fn support_result(verdict: &SupportVerdict) -> CheckResult {
    let details = verdict
        .violations
        .iter()
        .map(|v| format!("degree {}: entry ({}, {}) outside {:?} set", v.degree, v.row, v.col, v.axis))
        .collect();
    let message = format!("{} violation(s)", verdict.violations.len());
    CheckResult::from_outcome("unit/support", verdict.holds, message, details)
}

/// Runs the unit suite for one generator.
///
/// # Errors
///
/// Returns an error if the inputs are malformed (shape or dimension
/// mismatch). Failed identities are reported, not returned as errors.
pub fn unit_suite(inputs: &UnitInputs<'_>) -> Result<Outcome<UnitVerdicts>> {
    let mut report = CertificationReport::new();
    let reps = inputs.reps;

    let boundary = match inputs.zlift {
        Some(z) => boundary_compat_signed(z.dx, z.dy, z.cmap).context("signed boundary compatibility")?,
        None => boundary_compat(inputs.cx, inputs.cy, inputs.cmap).context("boundary compatibility")?,
    };
    report.push(verdict_result("unit/boundary", &boundary));

    let c3 = transport(inputs.cy, inputs.cmap, &reps.c3_dom_bits(), &reps.c3_cod_bits(), reps.k3)
        .context("transport of c3")?;
    report.push(CheckResult::from_outcome(
        "unit/transport_c3",
        c3.holds,
        format!("degree {}", reps.k3),
        Vec::new(),
    ));
    let c2 = transport(inputs.cy, inputs.cmap, &reps.c2_dom_bits(), &reps.c2_cod_bits(), reps.k2)
        .context("transport of c2")?;
    report.push(CheckResult::from_outcome(
        "unit/transport_c2",
        c2.holds,
        format!("degree {}", reps.k2),
        Vec::new(),
    ));

    let pairing = match inputs.zlift {
        Some(z) => {
            let out = check_pairing_signed(
                (reps.c3_dom.as_slice(), reps.c2_dom.as_slice()),
                (reps.c3_cod.as_slice(), reps.c2_cod.as_slice()),
                z.form,
            )
            .context("signed pairing")?;
            report.push(CheckResult::from_outcome(
                "unit/pairing",
                out.holds,
                format!("before {} after {}", out.before, out.after),
                Vec::new(),
            ));
            out.holds
        }
        None => {
            let out = check_pairing(
                (&reps.c3_dom_bits(), &reps.c2_dom_bits()),
                (&reps.c3_cod_bits(), &reps.c2_cod_bits()),
                inputs.form,
            )
            .context("pairing")?;
            report.push(CheckResult::from_outcome(
                "unit/pairing",
                out.holds,
                format!("before {} after {}", u8::from(out.before), u8::from(out.after)),
                Vec::new(),
            ));
            out.holds
        }
    };

    let support = match inputs.support {
        Some(index) => {
            let verdict = check_support(inputs.cmap, index);
            report.push(support_result(&verdict));
            verdict.holds
        }
        None => true,
    };

    let value = UnitVerdicts {
        boundary: boundary.holds,
        transport_c3: c3.holds,
        transport_c2: c2.holds,
        pairing,
        support,
    };
    info!(passed = value.all(), "unit suite");
    Ok(Outcome { value, report })
}

/// Runs the overlap suite: the commutator identity of two moves with `h`.
///
/// # Errors
///
/// Returns an error if a block does not fit the complex.
pub fn overlap_suite(
    cx: &ChainComplex,
    c1: &DegreeMap,
    c2: &DegreeMap,
    h: &DegreeMap,
) -> Result<Outcome<Verdict>> {
    let verdict = commutator_identity(cx, c1, c2, h).context("commutator identity")?;
    let mut report = CertificationReport::new();
    report.push(verdict_result("overlap/commutator", &verdict));
    info!(passed = verdict.holds, "overlap suite");
    Ok(Outcome {
        value: verdict,
        report,
    })
}

/// Template and verdict of the triangle suite.
#[derive(Debug, Clone, Serialize)]
pub struct TriangleOutcome {
    /// The checked template.
    pub template: TriangleTemplate,
    /// Coherence verdict.
    pub verdict: Verdict,
}

/// Where the triangle suite gets its template.
#[derive(Debug, Clone, Copy)]
pub enum TemplateSource<'a> {
    /// A template supplied by the caller.
    Supplied(&'a TriangleTemplate),
    /// Build one from two moves.
    Build {
        /// First move.
        c1: &'a DegreeMap,
        /// Second move.
        c2: &'a DegreeMap,
    },
}

/// Runs the triangle suite.
///
/// Infeasible degrees of a built template are reported as warnings; the
/// coherence check then fails at those degrees.
///
/// # Errors
///
/// Returns an error if a block does not fit the complex.
pub fn triangle_suite(cx: &ChainComplex, source: TemplateSource<'_>) -> Result<Outcome<TriangleOutcome>> {
    let template = match source {
        TemplateSource::Supplied(t) => t.clone(),
        TemplateSource::Build { c1, c2 } => {
            build_triangle_template(cx, c1, c2).context("building triangle template")?
        }
    };
    let mut report = CertificationReport::new();
    for k in template.infeasible_degrees() {
        report.push(CheckResult::warn(
            "triangle/builder",
            format!("degree {k}: no homotopy solves the system, zero fallback used"),
        ));
    }
    let verdict = triangle_coherence(cx, &template).context("triangle coherence")?;
    report.push(verdict_result("triangle/coherence", &verdict));
    info!(passed = verdict.holds, "triangle suite");
    Ok(Outcome {
        value: TriangleOutcome { template, verdict },
        report,
    })
}

/// Certificates of the tower suite.
#[derive(Debug, Clone, Serialize)]
pub struct TowerOutcome {
    /// One certificate per step.
    pub steps: Vec<TowerStep>,
    /// Comparison with a substituted run, if requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub novelty: Option<NoveltyReport>,
}

/// Runs the tower suite, optionally substituting the move at a 1-based step.
///
/// # Errors
///
/// Returns an error if the tower is empty, the novelty step is out of range,
/// or a block does not compose.
pub fn tower_suite(
    moves: &[DegreeMap],
    reps: &Representatives,
    novelty: Option<(usize, DegreeMap)>,
) -> Result<Outcome<TowerOutcome>> {
    if moves.is_empty() {
        bail!("tower has no moves");
    }
    let steps = run_tower(moves, reps).context("tower certificates")?;
    let mut report = CertificationReport::new();
    report.push(CheckResult::pass(
        "tower/certificates",
        format!("{} step(s) hashed", steps.len()),
    ));

    let novelty = match novelty {
        Some((step, replacement)) => {
            let Some(nov) = NoveltyReport::detect(moves, reps, step, replacement)
                .context("novelty run")?
            else {
                bail!("novelty step {step} outside 1..={}", moves.len());
            };
            let message = match nov.first_divergence {
                Some(s) => format!("injected at step {step}, first divergence at step {s}"),
                None => format!("injected at step {step}, no divergence"),
            };
            report.push(CheckResult::from_outcome(
                "tower/novelty",
                nov.is_localized(),
                message,
                Vec::new(),
            ));
            Some(nov)
        }
        None => None,
    };
    info!(steps = steps.len(), "tower suite");
    Ok(Outcome {
        value: TowerOutcome { steps, novelty },
        report,
    })
}
