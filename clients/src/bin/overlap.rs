//! `otc-overlap`: commutator identity on an overlap complex.
//!
//! **Usage:**
//! ```text
//! otc-overlap --complex overlap.json --m1 C1.json --m2 C2.json --homotopy H.json [--json]
//! ```
//!
//! Exits non-zero if the identity fails at any degree.

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
use otc_certify::manifest::{enforce_chain_shapes, enforce_map_shapes};
use otc_certify::{bundle, overlap_suite};
use otc_clients::{emit, init_logging, load_manifest};

/// Check `dH ⊕ Hd = C₂C₁ ⊕ C₁C₂` degreewise.
#[derive(Parser)]
#[command(name = "otc-overlap", about = "Check the commutator identity of two moves")]
struct Args {
    /// Overlap complex.
    #[arg(long)]
    complex: PathBuf,

    /// First move blocks.
    #[arg(long)]
    m1: PathBuf,

    /// Second move blocks.
    #[arg(long)]
    m2: PathBuf,

    /// Homotopy blocks `H(k)`.
    #[arg(long)]
    homotopy: PathBuf,

    /// Shape manifest for the overlap complex and both moves.
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Print the outcome as JSON instead of a report.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let cx = bundle::load_complex(&args.complex)?;
    let c1 = bundle::load_blocks(&args.m1)?;
    let c2 = bundle::load_blocks(&args.m2)?;
    let h = bundle::load_blocks(&args.homotopy)?;

    if let Some(manifest) = load_manifest(args.manifest.as_deref())? {
        enforce_chain_shapes(cx.boundaries(), &manifest).context("overlap complex")?;
        enforce_map_shapes(&c1, &manifest).context("first move")?;
        enforce_map_shapes(&c2, &manifest).context("second move")?;
    }

    let outcome = overlap_suite(&cx, &c1, &c2, &h)?;
    let code = emit("OTC Overlap Certification", &outcome, args.json)?;
    process::exit(code);
}
