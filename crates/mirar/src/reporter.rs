//! Suite reporting.
//!
//! Renders a [`SuiteReport`] as a text summary and exports it as JSON for
//! downstream tooling.

use crate::harness::SuiteReport;
use crate::result::MirarResult;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

/// Renders and exports suite reports
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter;

impl Reporter {
    /// Create a reporter
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Render a human-readable summary
    #[must_use]
    pub fn summary(&self, report: &SuiteReport) -> String {
        let mut out = String::new();
        for result in &report.results {
            let mark = if result.status.is_passed() { '✓' } else { '✗' };
            let _ = writeln!(out, "{mark} {} ({} ms)", result.name, result.duration_ms);
            if let Some(ref error) = result.error {
                let _ = writeln!(out, "    {error}");
            }
            if let Some(ref screenshot) = result.screenshot {
                let _ = writeln!(out, "    screenshot: {}", screenshot.display());
            }
        }
        let _ = writeln!(
            out,
            "\n{} passed, {} failed ({} ms)",
            report.passed_count(),
            report.failed_count(),
            report.duration_ms
        );
        out
    }

    /// Write the report as pretty-printed JSON
    pub fn write_json(&self, report: &SuiteReport, path: &Path) -> MirarResult<PathBuf> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(report)?;
        std::fs::write(path, json)?;
        info!("results written to {}", path.display());
        Ok(path.to_path_buf())
    }
}
