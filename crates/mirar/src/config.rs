//! Store and timeout configuration.
//!
//! Mirrors the configuration surface a hosted-storefront suite needs: the
//! store root URL, an optional access password for staging gates, viewport
//! dimensions, capture toggles, and the four bounded-wait ceilings every
//! suspending command respects.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default viewport width
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1280;

/// Default viewport height
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 720;

/// Default settle interval after the initial navigation (1 second)
pub const DEFAULT_SETTLE_MS: u64 = 1000;

/// Bounded-wait ceilings for suspending commands.
///
/// - `command_ms` bounds individual DOM queries and interactions.
/// - `request_ms` bounds the CDP transport round-trip.
/// - `response_ms` bounds the post-navigation wait for the new page's URL.
/// - `page_load_ms` bounds full page loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeouts {
    /// Per-command ceiling in milliseconds
    pub command_ms: u64,
    /// Network request ceiling in milliseconds
    pub request_ms: u64,
    /// Network response ceiling in milliseconds
    pub response_ms: u64,
    /// Full page load ceiling in milliseconds
    pub page_load_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            command_ms: 10_000,
            request_ms: 15_000,
            response_ms: 15_000,
            page_load_ms: 30_000,
        }
    }
}

impl Timeouts {
    /// Create timeouts with default ceilings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-command ceiling
    #[must_use]
    pub const fn with_command(mut self, ms: u64) -> Self {
        self.command_ms = ms;
        self
    }

    /// Set the request ceiling
    #[must_use]
    pub const fn with_request(mut self, ms: u64) -> Self {
        self.request_ms = ms;
        self
    }

    /// Set the response ceiling
    #[must_use]
    pub const fn with_response(mut self, ms: u64) -> Self {
        self.response_ms = ms;
        self
    }

    /// Set the page load ceiling
    #[must_use]
    pub const fn with_page_load(mut self, ms: u64) -> Self {
        self.page_load_ms = ms;
        self
    }

    /// Per-command ceiling as a Duration
    #[must_use]
    pub const fn command(&self) -> Duration {
        Duration::from_millis(self.command_ms)
    }

    /// Request ceiling as a Duration
    #[must_use]
    pub const fn request(&self) -> Duration {
        Duration::from_millis(self.request_ms)
    }

    /// Response ceiling as a Duration
    #[must_use]
    pub const fn response(&self) -> Duration {
        Duration::from_millis(self.response_ms)
    }

    /// Page load ceiling as a Duration
    #[must_use]
    pub const fn page_load(&self) -> Duration {
        Duration::from_millis(self.page_load_ms)
    }
}

/// Configuration for a storefront probing session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Absolute URL of the store root
    pub base_url: String,
    /// Access password for password-gated staging storefronts.
    ///
    /// Sourced from configuration or the environment, never embedded in the
    /// suite. `None` is valid: the password step only runs when the gate is
    /// actually present.
    pub store_password: Option<String>,
    /// Brand name used to recognize banner imagery and page copy
    pub brand: String,
    /// Literal substrings the about page must contain
    pub about_markers: Vec<String>,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Record video of each scenario (capture itself is performed by an
    /// external collaborator; this toggle is passed through)
    pub video: bool,
    /// Capture a screenshot when a scenario fails
    pub screenshot_on_failure: bool,
    /// Directory for failure screenshots and exported reports
    pub artifacts_dir: PathBuf,
    /// Bounded-wait ceilings
    pub timeouts: Timeouts,
    /// Relax browser web security (appends `--disable-web-security` to the
    /// chromium launch arguments)
    pub disable_web_security: bool,
    /// Run the browser headless
    pub headless: bool,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Settle interval after the initial navigation, in milliseconds
    pub settle_ms: u64,
}

impl StoreConfig {
    /// Create a configuration for the given store root URL
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let brand = String::from("RealBeans");
        Self {
            base_url: base_url.into(),
            store_password: None,
            about_markers: vec![String::from("Antwerp"), brand.clone()],
            brand,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            video: true,
            screenshot_on_failure: true,
            artifacts_dir: PathBuf::from("mirar-artifacts"),
            timeouts: Timeouts::default(),
            disable_web_security: true,
            headless: true,
            chromium_path: None,
            settle_ms: DEFAULT_SETTLE_MS,
        }
    }

    /// Set the store access password
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.store_password = Some(password.into());
        self
    }

    /// Set the brand name and derive the default about-page markers
    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        if let Some(last) = self.about_markers.last_mut() {
            *last = self.brand.clone();
        }
        self
    }

    /// Set the literal substrings the about page must contain
    #[must_use]
    pub fn with_about_markers(mut self, markers: Vec<String>) -> Self {
        self.about_markers = markers;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the bounded-wait ceilings
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Set the artifacts directory
    #[must_use]
    pub fn with_artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifacts_dir = dir.into();
        self
    }

    /// Disable the failure screenshot hook
    #[must_use]
    pub const fn without_failure_screenshots(mut self) -> Self {
        self.screenshot_on_failure = false;
        self
    }

    /// Settle interval as a Duration
    #[must_use]
    pub const fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Extra chromium launch arguments implied by this configuration.
    ///
    /// Only chromium is launched by this suite, so the security relaxation
    /// applies to every launch when enabled.
    #[must_use]
    pub fn launch_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.disable_web_security {
            args.push(String::from("--disable-web-security"));
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod timeouts_tests {
        use super::*;

        #[test]
        fn test_default_ceilings() {
            let timeouts = Timeouts::default();
            assert_eq!(timeouts.command_ms, 10_000);
            assert_eq!(timeouts.request_ms, 15_000);
            assert_eq!(timeouts.response_ms, 15_000);
            assert_eq!(timeouts.page_load_ms, 30_000);
        }

        #[test]
        fn test_builders_chain() {
            let timeouts = Timeouts::new()
                .with_command(5000)
                .with_request(6000)
                .with_response(7000)
                .with_page_load(8000);
            assert_eq!(timeouts.command(), Duration::from_millis(5000));
            assert_eq!(timeouts.request(), Duration::from_millis(6000));
            assert_eq!(timeouts.response(), Duration::from_millis(7000));
            assert_eq!(timeouts.page_load(), Duration::from_millis(8000));
        }
    }

    mod store_config_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let config = StoreConfig::new("https://store.example");
            assert_eq!(config.viewport_width, 1280);
            assert_eq!(config.viewport_height, 720);
            assert!(config.headless);
            assert!(config.screenshot_on_failure);
            assert!(config.store_password.is_none());
            assert_eq!(config.settle(), Duration::from_millis(1000));
        }

        #[test]
        fn test_password_from_builder() {
            let config = StoreConfig::new("https://store.example").with_password("hunter2");
            assert_eq!(config.store_password.as_deref(), Some("hunter2"));
        }

        #[test]
        fn test_brand_updates_marker() {
            let config = StoreConfig::new("https://store.example").with_brand("AcmeCoffee");
            assert_eq!(config.brand, "AcmeCoffee");
            assert!(config.about_markers.contains(&"AcmeCoffee".to_string()));
            assert!(config.about_markers.contains(&"Antwerp".to_string()));
        }

        #[test]
        fn test_launch_args_with_security_relaxed() {
            let config = StoreConfig::new("https://store.example");
            assert_eq!(config.launch_args(), vec!["--disable-web-security"]);
        }

        #[test]
        fn test_launch_args_without_security_relaxed() {
            let mut config = StoreConfig::new("https://store.example");
            config.disable_web_security = false;
            assert!(config.launch_args().is_empty());
        }

        #[test]
        fn test_config_round_trips_through_json() {
            let config = StoreConfig::new("https://store.example").with_viewport(800, 600);
            let json = serde_json::to_string(&config).unwrap();
            let back: StoreConfig = serde_json::from_str(&json).unwrap();
            assert_eq!(back.base_url, "https://store.example");
            assert_eq!(back.viewport_width, 800);
        }
    }
}
