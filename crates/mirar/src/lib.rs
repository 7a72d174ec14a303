//! Mirar: Rust-native E2E probing for hosted storefronts
//!
//! Mirar (Spanish: "to look") drives a hosted e-commerce storefront through
//! its UI and asserts on what it finds. The storefront's markup, popups, and
//! authentication gates are not under the suite's control, so every
//! interaction goes through a conditional probe-then-act protocol: resolve
//! an ordered list of selector alternatives once, act on the first match,
//! and treat absence as a skip or a failure depending on whether the target
//! is required.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     MIRAR Architecture                           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Scenario   │    │ Session    │    │ Headless   │            │
//! │   │ Probes     │───►│ Bootstrap  │───►│ Browser    │            │
//! │   │ (5 checks) │    │ + Harness  │    │ (chromium) │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! With the `browser` feature, pages are driven over the Chrome DevTools
//! Protocol via chromiumoxide. Without it, the [`mock`] module provides an
//! in-memory storefront implementing the same [`StoreDriver`] seam, so the
//! whole suite is testable hermetically.

#![warn(missing_docs)]

/// Store and timeout configuration
pub mod config;
/// Browser driving seam and CDP implementation
pub mod driver;
/// Scenario run loop and suite results
pub mod harness;
/// Mock storefront for hermetic tests
pub mod mock;
/// Conditional-action primitives
pub mod probe;
/// Report rendering and export
pub mod reporter;
/// Result and error types
pub mod result;
/// Session bootstrap
pub mod session;
/// Storefront targets and scenarios
pub mod storefront;
/// Selectors and conditional targets
pub mod target;
/// URL matching for navigation checks
pub mod wait;

pub use config::{StoreConfig, Timeouts};
#[cfg(feature = "browser")]
pub use driver::{Browser, Page};
pub use driver::StoreDriver;
pub use harness::{Harness, ScenarioReport, ScenarioStatus, SuiteReport};
pub use mock::{ClickEffect, MockDom, MockElement, MockPage};
pub use probe::{
    assert_present, assert_url, click_if_present, first_matching_link, resolve_target,
    select_first_valid_option, ProbeOutcome,
};
pub use reporter::Reporter;
pub use result::{MirarError, MirarResult};
pub use storefront::{Scenario, StorefrontTargets};
pub use target::{ConditionalTarget, Selector};
pub use wait::{normalize_root, UrlPattern};
