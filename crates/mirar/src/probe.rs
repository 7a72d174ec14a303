//! Conditional-action primitives shared by bootstrap and scenarios.
//!
//! Every interaction with markup the suite does not control goes through
//! these primitives. Each resolves a [`ConditionalTarget`] once,
//! first-match-wins, and reports a [`ProbeOutcome`] that keeps "the element
//! was absent" distinct from "the element was there but the interaction
//! failed".

use crate::driver::StoreDriver;
use crate::result::{MirarError, MirarResult};
use crate::target::{ConditionalTarget, Selector};
use crate::wait::UrlPattern;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Outcome of a conditional interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The target matched and the interaction ran
    Performed,
    /// No alternative matched; nothing was done
    Skipped,
    /// The target matched but the interaction on it failed
    Failed {
        /// What went wrong
        message: String,
    },
}

impl ProbeOutcome {
    /// Whether the interaction ran
    #[must_use]
    pub const fn performed(&self) -> bool {
        matches!(self, Self::Performed)
    }

    /// Whether the target was absent and the step skipped
    #[must_use]
    pub const fn skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

/// Resolve a target to its first matching alternative, in order.
///
/// A zero timeout performs a single immediate scan; otherwise the scan
/// repeats until the timeout elapses.
pub async fn resolve_target<'t, D: StoreDriver + ?Sized>(
    driver: &mut D,
    target: &'t ConditionalTarget,
    timeout: Duration,
) -> MirarResult<Option<&'t Selector>> {
    let matched = driver.wait_any(target.alternatives(), timeout).await?;
    Ok(matched.map(|idx| &target.alternatives()[idx]))
}

/// Click a target's first matching alternative if any alternative matches.
///
/// Absence of a match is a valid, non-failing outcome: the step is skipped
/// and execution continues.
pub async fn click_if_present<D: StoreDriver + ?Sized>(
    driver: &mut D,
    target: &ConditionalTarget,
    force: bool,
) -> MirarResult<ProbeOutcome> {
    let Some(selector) = resolve_target(driver, target, Duration::ZERO).await? else {
        debug!(role = target.role(), "target absent, skipping");
        return Ok(ProbeOutcome::Skipped);
    };
    let selector = selector.clone();
    if driver.click_first(&selector, force).await? {
        debug!(role = target.role(), %selector, "clicked");
        Ok(ProbeOutcome::Performed)
    } else {
        let message = format!("{selector} matched but was not clickable");
        warn!(role = target.role(), "{message}");
        Ok(ProbeOutcome::Failed { message })
    }
}

/// Navigate via the first alternative of a required link target that
/// matches at least one anchor.
///
/// Returns the selector that was followed. Zero matches across all
/// alternatives fails the scenario.
pub async fn first_matching_link<D: StoreDriver + ?Sized>(
    driver: &mut D,
    target: &ConditionalTarget,
    timeout: Duration,
) -> MirarResult<Selector> {
    let Some(selector) = resolve_target(driver, target, timeout).await? else {
        return Err(MirarError::RequiredTargetAbsent {
            role: target.role().to_string(),
        });
    };
    let selector = selector.clone();
    if driver.click_first(&selector, true).await? {
        debug!(role = target.role(), %selector, "navigating");
        Ok(selector)
    } else {
        Err(MirarError::Interaction {
            role: target.role().to_string(),
            message: format!("{selector} matched but was not clickable"),
        })
    }
}

/// Select the first option of a selection control whose value is neither
/// null nor empty.
///
/// Returns the selected value, or None when the control is absent, has no
/// usable option, or refuses the selection; the caller logs and skips the
/// dependent assertion rather than failing. Never submits a null or empty
/// value.
pub async fn select_first_valid_option<D: StoreDriver + ?Sized>(
    driver: &mut D,
    selector: &Selector,
) -> MirarResult<Option<String>> {
    let values = driver.option_values(selector).await?;
    let Some(value) = values.into_iter().flatten().find(|v| !v.is_empty()) else {
        info!(%selector, "no valid option found to select");
        return Ok(None);
    };
    if driver.select_value(selector, &value).await? {
        debug!(%selector, %value, "option selected");
        Ok(Some(value))
    } else {
        warn!(%selector, %value, "selecting option failed");
        Ok(None)
    }
}

/// Assert that a required target matches at least one element within the
/// timeout
pub async fn assert_present<D: StoreDriver + ?Sized>(
    driver: &mut D,
    target: &ConditionalTarget,
    timeout: Duration,
) -> MirarResult<()> {
    match resolve_target(driver, target, timeout).await? {
        Some(_) => Ok(()),
        None => Err(MirarError::RequiredTargetAbsent {
            role: target.role().to_string(),
        }),
    }
}

/// Assert that the current URL satisfies a pattern within the timeout
pub async fn assert_url<D: StoreDriver + ?Sized>(
    driver: &mut D,
    pattern: &UrlPattern,
    timeout: Duration,
) -> MirarResult<()> {
    if driver.wait_url(pattern, timeout).await? {
        Ok(())
    } else {
        Err(MirarError::NavigationMismatch {
            expected: pattern.expected().to_string(),
            actual: driver.current_url().await?,
        })
    }
}
