//! Result and error types for Mirar.

use thiserror::Error;

/// Result type for Mirar operations
pub type MirarResult<T> = Result<T, MirarError>;

/// Errors that can occur in Mirar
#[derive(Debug, Error)]
pub enum MirarError {
    /// Browser executable not found
    #[error("Browser not found. Install Chromium or set CHROMIUM_PATH")]
    BrowserNotFound,

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Page error
    #[error("Page error: {message}")]
    Page {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Final URL did not match the expected location
    #[error("Landed on {actual:?}, expected {expected:?}")]
    NavigationMismatch {
        /// Expected URL or fragment
        expected: String,
        /// URL the page actually landed on
        actual: String,
    },

    /// No alternative of a required target matched any element
    #[error("No element matched required target {role:?}")]
    RequiredTargetAbsent {
        /// Logical role of the missing target
        role: String,
    },

    /// Operation timed out
    #[error("Operation timed out after {ms}ms")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Script evaluation error
    #[error("Script evaluation failed: {message}")]
    Evaluate {
        /// Error message
        message: String,
    },

    /// Element was present but the interaction with it failed
    #[error("Interaction with {role:?} failed: {message}")]
    Interaction {
        /// Logical role of the target
        role: String,
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
