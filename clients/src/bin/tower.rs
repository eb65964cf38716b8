//! `otc-tower`: per-step certificates of a tower of moves.
//!
//! Each `--moves` file is one step, in order. With `--novelty-step N
//! --novelty-moves R.json` the move at step `N` is replaced by `R` and the
//! first diverging step is reported.
//!
//! **Usage:**
//! ```text
//! otc-tower --reps reps.json --moves C1.json C2.json C3.json \
//!           [--novelty-step 2 --novelty-moves R.json] [--json]
//! ```
//!
//! Exits non-zero if a substitution changes a certificate before its step.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use otc_certify::{bundle, tower_suite};
use otc_clients::{emit, init_logging};

/// Hash every prefix of a tower.
#[derive(Parser)]
#[command(name = "otc-tower", about = "Compute tower certificates and detect novelty")]
struct Args {
    /// Representatives (`k3`, `k2`, `c3_dom`, `c2_dom`).
    #[arg(long)]
    reps: PathBuf,

    /// Move blocks, one file per step.
    #[arg(long, num_args = 1.., required = true)]
    moves: Vec<PathBuf>,

    /// 1-based step to substitute.
    #[arg(long, requires = "novelty_moves")]
    novelty_step: Option<usize>,

    /// Replacement move for `--novelty-step`.
    #[arg(long, requires = "novelty_step")]
    novelty_moves: Option<PathBuf>,

    /// Print the outcome as JSON instead of a report.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let reps = bundle::load_reps(&args.reps)?;
    let moves = bundle::load_tower(&args.moves)?;
    let novelty = match (args.novelty_step, &args.novelty_moves) {
        (Some(step), Some(path)) => Some((step, bundle::load_blocks(path)?)),
        _ => None,
    };

    let outcome = tower_suite(&moves, &reps, novelty)?;
    if !args.json {
        for step in &outcome.value.steps {
            println!("step {:>3}  {}", step.step, step.hash);
        }
        println!();
    }
    let code = emit("OTC Tower Certification", &outcome, args.json)?;
    process::exit(code);
}
