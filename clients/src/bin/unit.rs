//! `otc-unit`: per-generator unit certification.
//!
//! Checks boundary compatibility, transport of both representative classes,
//! pairing invariance and (optionally) support constraints for one chain map.
//!
//! **Usage:**
//! ```text
//! otc-unit --x X.json --y Y.json --map C.json --reps reps.json \
//!          [--form B.json] [--support support.json] [--manifest manifest.json] \
//!          [--zlift --x-signed dX.json --y-signed dY.json --map-signed C.json [--form-signed B.json]] \
//!          [--json]
//! ```
//!
//! Exits non-zero if any check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use otc::IntMatrix;
use otc_certify::manifest::{
    enforce_chain_shapes, enforce_map_shapes, enforce_rep_lengths, enforce_support_bounds,
};
use otc_certify::{bundle, unit_suite, UnitInputs, ZLift};
use otc_clients::{emit, init_logging, load_manifest};

/// Run the unit suite for one generator.
#[derive(Parser)]
#[command(name = "otc-unit", about = "Certify one chain map against its representatives")]
struct Args {
    /// Domain complex (`{"boundaries": ...}`).
    #[arg(long)]
    x: PathBuf,

    /// Codomain complex.
    #[arg(long)]
    y: PathBuf,

    /// Map blocks (`{"blocks": ...}`).
    #[arg(long)]
    map: PathBuf,

    /// Representatives (`k3`, `k2`, `c3_dom`, ...).
    #[arg(long)]
    reps: PathBuf,

    /// GF(2) bilinear form for the pairing.
    #[arg(long)]
    form: Option<PathBuf>,

    /// Support index (`{k: {"rows": [...], "cols": [...]}}`).
    #[arg(long)]
    support: Option<PathBuf>,

    /// Shape manifest validated against the domain before any check runs.
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Run boundary and pairing checks over the integers.
    #[arg(long, requires_all = ["x_signed", "y_signed", "map_signed"])]
    zlift: bool,

    /// Signed domain boundaries.
    #[arg(long)]
    x_signed: Option<PathBuf>,

    /// Signed codomain boundaries.
    #[arg(long)]
    y_signed: Option<PathBuf>,

    /// Signed map blocks.
    #[arg(long)]
    map_signed: Option<PathBuf>,

    /// Signed bilinear form.
    #[arg(long)]
    form_signed: Option<PathBuf>,

    /// Print the outcome as JSON instead of a report.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let cx = bundle::load_complex(&args.x)?;
    let cy = bundle::load_complex(&args.y)?;
    let cmap = bundle::load_blocks(&args.map)?;
    let reps = bundle::load_reps(&args.reps)?;
    let form = args.form.as_deref().map(bundle::load_form).transpose()?;
    let support = args.support.as_deref().map(bundle::load_support).transpose()?;

    if let Some(manifest) = load_manifest(args.manifest.as_deref())? {
        enforce_chain_shapes(cx.boundaries(), &manifest).context("domain complex")?;
        enforce_map_shapes(&cmap, &manifest).context("map blocks")?;
        enforce_rep_lengths(&reps, &manifest).context("representatives")?;
        if let Some(support) = &support {
            enforce_support_bounds(support, &manifest).context("support index")?;
        }
    }

    let signed = match (args.zlift, &args.x_signed, &args.y_signed, &args.map_signed) {
        (true, Some(dx), Some(dy), Some(c)) => Some((
            bundle::load_boundaries::<IntMatrix>(dx)?,
            bundle::load_boundaries::<IntMatrix>(dy)?,
            bundle::load_signed_blocks(c)?,
            args.form_signed.as_deref().map(bundle::load_signed_form).transpose()?,
        )),
        _ => None,
    };
    let zlift = signed.as_ref().map(|(dx, dy, cmap, form)| ZLift {
        dx,
        dy,
        cmap,
        form: form.as_ref(),
    });

    let inputs = UnitInputs {
        cx: &cx,
        cy: &cy,
        cmap: &cmap,
        reps: &reps,
        form: form.as_ref(),
        support: support.as_ref(),
        zlift,
    };
    let outcome = unit_suite(&inputs)?;
    let code = emit("OTC Unit Certification", &outcome, args.json)?;
    process::exit(code);
}
