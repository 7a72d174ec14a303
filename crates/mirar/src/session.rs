//! Session bootstrap.
//!
//! Every scenario starts from the same known state: the store root with any
//! blocking overlays out of the way. [`establish`] navigates to the root,
//! gives the page a short settle interval, dismisses a cookie-consent dialog
//! if one is showing, satisfies a password gate if one is present, and
//! finally asserts the page landed on the canonical root URL (one trailing
//! slash normalized).
//!
//! Suppression of the storefront's own uncaught script errors is a
//! session-lifecycle setting, not ambient global state: the CDP page
//! installs its exception listener when the page is created and tears it
//! down on drop, and the count of suppressed errors is logged here when the
//! session is established.

use crate::config::StoreConfig;
use crate::driver::StoreDriver;
use crate::probe::{click_if_present, resolve_target};
use crate::result::{MirarError, MirarResult};
use crate::target::{ConditionalTarget, Selector};
use crate::wait::UrlPattern;
use std::time::Duration;
use tracing::{debug, info, warn};

/// The consent-accept button, when a cookie dialog is showing
#[must_use]
pub fn consent_accept() -> ConditionalTarget {
    ConditionalTarget::new("consent accept").alt(Selector::css_with_text("button", "Accept"))
}

/// The password field of a storefront access gate
#[must_use]
pub fn password_field() -> ConditionalTarget {
    ConditionalTarget::new("password field").alt(Selector::css("input[name=\"password\"]"))
}

/// The submit control of a storefront access gate
#[must_use]
pub fn password_submit() -> ConditionalTarget {
    ConditionalTarget::new("password submit")
        .alt(Selector::css_with_text("button[type=\"submit\"]", "Enter"))
        .alt(Selector::css("button[type=\"submit\"]"))
}

/// Establish a session at the store root.
///
/// Fails with [`MirarError::NavigationMismatch`] if, after all optional
/// steps, the page is not on the configured root URL. No retry is performed
/// beyond the configured page-load ceiling.
pub async fn establish<D: StoreDriver + ?Sized>(
    driver: &mut D,
    config: &StoreConfig,
) -> MirarResult<()> {
    driver.goto(&config.base_url).await?;
    driver.settle(config.settle()).await;

    let consent = click_if_present(driver, &consent_accept(), true).await?;
    if consent.performed() {
        debug!("cookie consent dismissed");
    }

    if resolve_target(driver, &password_field(), Duration::ZERO)
        .await?
        .is_some()
    {
        enter_password(driver, config).await?;
    }

    let root = UrlPattern::RootEquals(config.base_url.clone());
    if !driver.wait_url(&root, config.timeouts.page_load()).await? {
        return Err(MirarError::NavigationMismatch {
            expected: config.base_url.clone(),
            actual: driver.current_url().await?,
        });
    }

    info!(
        suppressed_errors = driver.suppressed_errors(),
        "session established at store root"
    );
    Ok(())
}

async fn enter_password<D: StoreDriver + ?Sized>(
    driver: &mut D,
    config: &StoreConfig,
) -> MirarResult<()> {
    let Some(ref password) = config.store_password else {
        // The final URL assertion will report the gate as a mismatch
        warn!("password gate present but no password configured");
        return Ok(());
    };
    let field = resolve_target(driver, &password_field(), Duration::ZERO)
        .await?
        .cloned();
    if let Some(field) = field {
        if !driver.fill_first(&field, password).await? {
            warn!("password field matched but could not be filled");
        }
    }
    let submitted = click_if_present(driver, &password_submit(), true).await?;
    if !submitted.performed() {
        warn!("password gate present but submit control missing");
    }
    Ok(())
}
