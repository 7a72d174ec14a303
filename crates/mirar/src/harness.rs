//! Harness for running storefront scenarios.
//!
//! The harness bootstraps the session before every scenario and keeps every
//! failure scenario-local: one failing probe never blocks or skips its
//! siblings. On failure it captures a screenshot through the driver when the
//! configuration asks for one.

use crate::config::StoreConfig;
use crate::driver::StoreDriver;
use crate::result::MirarResult;
use crate::session;
use crate::storefront::Scenario;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, warn};

/// Verdict of a single scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioStatus {
    /// Scenario passed
    Passed,
    /// Scenario failed
    Failed,
}

impl ScenarioStatus {
    /// Check if the scenario passed
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Record of one scenario run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Scenario name
    pub name: String,
    /// Verdict
    pub status: ScenarioStatus,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
    /// Error message if failed
    pub error: Option<String>,
    /// Failure screenshot, when one was captured
    pub screenshot: Option<PathBuf>,
    /// Storefront script errors suppressed during the session
    pub suppressed_errors: usize,
}

/// Aggregated results of a suite run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Individual scenario reports, in run order
    pub results: Vec<ScenarioReport>,
    /// Total wall-clock duration in milliseconds
    pub duration_ms: u64,
}

impl SuiteReport {
    /// Check if every scenario passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.status.is_passed())
    }

    /// Count passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_passed()).count()
    }

    /// Count failed scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.len() - self.passed_count()
    }

    /// Total scenario count
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// The failed scenario reports
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioReport> {
        self.results
            .iter()
            .filter(|r| !r.status.is_passed())
            .collect()
    }
}

/// Harness running scenarios against one configured store
#[derive(Debug, Clone)]
pub struct Harness {
    config: StoreConfig,
    scenarios: Vec<Scenario>,
}

impl Harness {
    /// Create a harness running every scenario
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            scenarios: Scenario::ALL.to_vec(),
        }
    }

    /// Create a harness running a chosen set of scenarios
    #[must_use]
    pub fn with_scenarios(config: StoreConfig, scenarios: Vec<Scenario>) -> Self {
        Self { config, scenarios }
    }

    /// The store configuration
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The scenarios this harness will run
    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Run every configured scenario, bootstrapping before each.
    ///
    /// Failures are captured per scenario; the run always continues to the
    /// next sibling.
    pub async fn run_all<D: StoreDriver + ?Sized>(&self, driver: &mut D) -> SuiteReport {
        let start = Instant::now();
        info!(count = self.scenarios.len(), "running scenarios");

        let mut results = Vec::with_capacity(self.scenarios.len());
        for scenario in &self.scenarios {
            results.push(self.run_scenario(driver, *scenario).await);
        }

        let report = SuiteReport {
            results,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            passed = report.passed_count(),
            failed = report.failed_count(),
            duration_ms = report.duration_ms,
            "suite finished"
        );
        report
    }

    /// Run a single scenario, bootstrap included
    pub async fn run_scenario<D: StoreDriver + ?Sized>(
        &self,
        driver: &mut D,
        scenario: Scenario,
    ) -> ScenarioReport {
        let start = Instant::now();
        let outcome = self.bootstrap_and_probe(driver, scenario).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(()) => {
                info!("✓ {} ({duration_ms} ms)", scenario.name());
                ScenarioReport {
                    name: scenario.name().to_string(),
                    status: ScenarioStatus::Passed,
                    duration_ms,
                    error: None,
                    screenshot: None,
                    suppressed_errors: driver.suppressed_errors(),
                }
            }
            Err(err) => {
                error!("✗ {} - {err}", scenario.name());
                let screenshot = self.capture_failure(driver, scenario).await;
                ScenarioReport {
                    name: scenario.name().to_string(),
                    status: ScenarioStatus::Failed,
                    duration_ms,
                    error: Some(err.to_string()),
                    screenshot,
                    suppressed_errors: driver.suppressed_errors(),
                }
            }
        }
    }

    async fn bootstrap_and_probe<D: StoreDriver + ?Sized>(
        &self,
        driver: &mut D,
        scenario: Scenario,
    ) -> MirarResult<()> {
        session::establish(driver, &self.config).await?;
        scenario.run(driver, &self.config).await
    }

    async fn capture_failure<D: StoreDriver + ?Sized>(
        &self,
        driver: &mut D,
        scenario: Scenario,
    ) -> Option<PathBuf> {
        if !self.config.screenshot_on_failure {
            return None;
        }
        let png = match driver.screenshot().await {
            Ok(bytes) if !bytes.is_empty() => bytes,
            Ok(_) => return None,
            Err(err) => {
                warn!("failure screenshot could not be captured: {err}");
                return None;
            }
        };
        let dir = &self.config.artifacts_dir;
        if let Err(err) = std::fs::create_dir_all(dir) {
            warn!("artifacts directory could not be created: {err}");
            return None;
        }
        let path = dir.join(format!("{}.png", scenario.name()));
        match std::fs::write(&path, png) {
            Ok(()) => Some(path),
            Err(err) => {
                warn!("failure screenshot could not be written: {err}");
                None
            }
        }
    }
}
