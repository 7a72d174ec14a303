//! URL matching and wait tuning for navigation checks.
//!
//! Navigation steps suspend until the page URL satisfies a [`UrlPattern`] or
//! a bounded timeout elapses. Pattern resolution is pure so it can be tested
//! without a browser.

/// Default polling interval while waiting on DOM or URL state (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Strip at most one trailing slash from a URL.
///
/// `https://store.example/` and `https://store.example` name the same store
/// root; anything beyond a single trailing slash is left alone.
#[must_use]
pub fn normalize_root(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}

/// Pattern for matching the current page URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlPattern {
    /// URL equals the string exactly
    Exact(String),
    /// URL contains the substring anywhere
    Contains(String),
    /// URL equals the string modulo a single trailing slash on either side
    RootEquals(String),
}

impl UrlPattern {
    /// Check whether a URL satisfies this pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        match self {
            Self::Exact(expected) => url == expected,
            Self::Contains(fragment) => url.contains(fragment.as_str()),
            Self::RootEquals(root) => normalize_root(url) == normalize_root(root),
        }
    }

    /// Human-readable description of the expected URL, for error reports
    #[must_use]
    pub fn expected(&self) -> &str {
        match self {
            Self::Exact(expected) | Self::Contains(expected) | Self::RootEquals(expected) => {
                expected
            }
        }
    }
}
