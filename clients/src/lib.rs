//! Shared plumbing for the `otc-*` command-line clients.
//!
//! Every client logs to stderr through `tracing` (filtered by `RUST_LOG`,
//! default `warn`), prints its report to stdout, and exits non-zero when a
//! check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::Path;

use anyhow::{Context, Result};
use otc_certify::manifest::Manifest;
use otc_certify::{bundle, CertificationReport, Outcome};
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the stderr subscriber.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Loads the manifest at `path`, if one was given.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_manifest(path: Option<&Path>) -> Result<Option<Manifest>> {
    path.map(bundle::read_json::<Manifest>).transpose()
}

/// Prints an outcome and returns the process exit code.
///
/// With `json` the whole outcome is printed as pretty JSON, otherwise the
/// rendered report.
///
/// # Errors
///
/// Returns an error if the outcome cannot be serialized.
pub fn emit<T: Serialize>(title: &str, outcome: &Outcome<T>, json: bool) -> Result<i32> {
    if json {
        let text = serde_json::to_string_pretty(outcome).context("Failed to serialize outcome")?;
        println!("{text}");
    } else {
        print!("{}", outcome.report.render(title));
    }
    Ok(exit_code(&outcome.report))
}

fn exit_code(report: &CertificationReport) -> i32 {
    let failed = report.failure_count();
    if failed > 0 {
        eprintln!("Certification FAILED: {failed} check(s) did not pass.");
        1
    } else {
        0
    }
}
