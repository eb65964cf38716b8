//! `otc-triangle`: triangle coherence of a template.
//!
//! Checks a supplied template, or builds one from two moves with `--build`.
//! A built template can be written out with `--write-template`.
//!
//! **Usage:**
//! ```text
//! otc-triangle --complex overlap.json --template T.json [--json]
//! otc-triangle --complex overlap.json --build --m1 C1.json --m2 C2.json [--write-template T.json]
//! ```
//!
//! Exits non-zero if coherence fails at any degree.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use clap::Parser;
use otc_certify::{bundle, triangle_suite, TemplateSource};
use otc_clients::{emit, init_logging};

/// Check `d(k+1)·J(k) ⊕ J(k-1)·d(k) = A(k) ⊕ B(k)`.
#[derive(Parser)]
#[command(name = "otc-triangle", about = "Check or build a triangle template")]
struct Args {
    /// Overlap complex.
    #[arg(long)]
    complex: PathBuf,

    /// Template to check (`{k: {"A", "B", "J"}}`).
    #[arg(long, conflicts_with = "build")]
    template: Option<PathBuf>,

    /// Build the template from `--m1` and `--m2`.
    #[arg(long, requires_all = ["m1", "m2"])]
    build: bool,

    /// First move blocks.
    #[arg(long)]
    m1: Option<PathBuf>,

    /// Second move blocks.
    #[arg(long)]
    m2: Option<PathBuf>,

    /// Write the checked template to this path.
    #[arg(long)]
    write_template: Option<PathBuf>,

    /// Print the outcome as JSON instead of a report.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let cx = bundle::load_complex(&args.complex)?;
    let outcome = match (&args.template, &args.m1, &args.m2) {
        (Some(path), _, _) => {
            let template = bundle::load_template(path)?;
            triangle_suite(&cx, TemplateSource::Supplied(&template))?
        }
        (None, Some(m1), Some(m2)) if args.build => {
            let c1 = bundle::load_blocks(m1)?;
            let c2 = bundle::load_blocks(m2)?;
            triangle_suite(&cx, TemplateSource::Build { c1: &c1, c2: &c2 })?
        }
        _ => bail!("either --template or --build with --m1 and --m2 is required"),
    };

    if let Some(path) = &args.write_template {
        let text = serde_json::to_string_pretty(&outcome.value.template)
            .context("Failed to serialize template")?;
        std::fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    let code = emit("OTC Triangle Certification", &outcome, args.json)?;
    process::exit(code);
}
