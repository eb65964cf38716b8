//! Certification report types: results, severity levels, and report aggregation.

use std::fmt::Write as _;

use serde::Serialize;

/// Severity level of a certification check result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The identity holds.
    Pass,
    /// Something worth a look that does not sink the certificate.
    Warning,
    /// The identity does not hold.
    Failure,
}

impl Severity {
    /// Four-letter tag used in rendered reports.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Warning => "WARN",
            Self::Failure => "FAIL",
        }
    }
}

/// A single certification check result.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// Identifier of the check, e.g. `unit/boundary`.
    pub check: String,
    /// Human-readable outcome.
    pub message: String,
    /// Severity of the result.
    pub severity: Severity,
    /// Optional detail lines, typically one per failing degree.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl CheckResult {
    /// Creates a passing result.
    pub fn pass(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with(Severity::Pass, check, message, Vec::new())
    }

    /// Creates a warning result.
    pub fn warn(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with(Severity::Warning, check, message, Vec::new())
    }

    /// Pass or failure depending on `ok`.
    pub fn from_outcome(
        check: impl Into<String>,
        ok: bool,
        message: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        let severity = if ok { Severity::Pass } else { Severity::Failure };
        Self::with(severity, check, message, details)
    }

    fn with(
        severity: Severity,
        check: impl Into<String>,
        message: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self {
            check: check.into(),
            message: message.into(),
            severity,
            details,
        }
    }
}

/// Aggregated report of one certification run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CertificationReport {
    /// All individual results, in the order they were produced.
    pub results: Vec<CheckResult>,
}

impl CertificationReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a result to this report.
    pub fn push(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    /// Number of results with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.results.iter().filter(|r| r.severity == severity).count()
    }

    /// Returns the count of failed checks.
    pub fn failure_count(&self) -> usize {
        self.count(Severity::Failure)
    }

    /// Returns true if all checks passed (no failures).
    pub fn all_passed(&self) -> bool {
        self.failure_count() == 0
    }

    /// Plain-text rendering with a trailing summary line.
    pub fn render(&self, title: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{title}");
        let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
        let _ = writeln!(out);
        for result in &self.results {
            let _ = writeln!(
                out,
                "[{}] {}: {}",
                result.severity.tag(),
                result.check,
                result.message
            );
            for detail in &result.details {
                let _ = writeln!(out, "       {detail}");
            }
        }
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Summary: {} passed, {} warnings, {} failed",
            self.count(Severity::Pass),
            self.count(Severity::Warning),
            self.failure_count()
        );
        out
    }
}
