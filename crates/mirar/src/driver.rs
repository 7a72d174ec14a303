//! Browser driving for storefront probes.
//!
//! The [`StoreDriver`] trait is the seam between probe logic and the
//! browser. When compiled with the `browser` feature it is implemented over
//! a real Chrome DevTools Protocol connection via chromiumoxide; the
//! [`crate::mock`] module implements the same trait over an in-memory DOM
//! for unit testing.
//!
//! Every suspending command is bounded by the configured
//! [`crate::config::Timeouts`] ceilings; a timeout aborts the current
//! scenario only.

use crate::result::MirarResult;
use crate::target::Selector;
use crate::wait::UrlPattern;
use async_trait::async_trait;
use std::time::Duration;

/// Driver seam for navigation, DOM queries, and element interaction
#[async_trait]
pub trait StoreDriver: Send {
    /// Navigate to a URL and wait for the page to load
    async fn goto(&mut self, url: &str) -> MirarResult<()>;

    /// The URL the page is currently on
    async fn current_url(&mut self) -> MirarResult<String>;

    /// Count elements matching a selector
    async fn count(&mut self, selector: &Selector) -> MirarResult<usize>;

    /// Check whether at least one element matches a selector
    async fn exists(&mut self, selector: &Selector) -> MirarResult<bool> {
        Ok(self.count(selector).await? > 0)
    }

    /// Wait until any alternative matches at least one element.
    ///
    /// Returns the index of the first alternative (in list order) that
    /// matched, or None once the timeout elapses. A zero timeout performs a
    /// single immediate scan.
    async fn wait_any(
        &mut self,
        alternatives: &[Selector],
        timeout: Duration,
    ) -> MirarResult<Option<usize>>;

    /// Wait until the current URL satisfies a pattern.
    ///
    /// Returns false once the timeout elapses without a match.
    async fn wait_url(&mut self, pattern: &UrlPattern, timeout: Duration) -> MirarResult<bool>;

    /// Click the first element matching a selector.
    ///
    /// Returns true if a click was dispatched. Without `force`, an element
    /// that is not rendered is treated as not clickable.
    async fn click_first(&mut self, selector: &Selector, force: bool) -> MirarResult<bool>;

    /// Fill the first matching field with text
    async fn fill_first(&mut self, selector: &Selector, text: &str) -> MirarResult<bool>;

    /// Option values of the first matching selection control, in document
    /// order; values absent on the option surface as None
    async fn option_values(&mut self, selector: &Selector) -> MirarResult<Vec<Option<String>>>;

    /// Select a value on the first matching selection control.
    ///
    /// A selection never submits an empty value; implementations return
    /// false for one.
    async fn select_value(&mut self, selector: &Selector, value: &str) -> MirarResult<bool>;

    /// Pause for a fixed settle interval
    async fn settle(&mut self, duration: Duration);

    /// Capture a PNG screenshot of the current page
    async fn screenshot(&mut self) -> MirarResult<Vec<u8>>;

    /// Number of storefront script errors suppressed this session
    fn suppressed_errors(&self) -> usize;
}

// ============================================================================
// Real CDP implementation (when the `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
mod cdp {
    use super::{async_trait, Duration, MirarResult, Selector, StoreDriver, UrlPattern};
    use crate::config::{StoreConfig, Timeouts};
    use crate::result::MirarError;
    use crate::wait::DEFAULT_POLL_INTERVAL_MS;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::page::{
        CaptureScreenshotFormat, CaptureScreenshotParams,
    };
    use chromiumoxide::cdp::js_protocol::runtime::EventExceptionThrown;
    use futures::StreamExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Browser instance with a real CDP connection
    #[derive(Debug)]
    pub struct Browser {
        config: StoreConfig,
        inner: CdpBrowser,
        handle: tokio::task::JoinHandle<()>,
    }

    impl Browser {
        /// Launch a browser configured for the store under test
        ///
        /// # Errors
        ///
        /// Returns error if the browser cannot be launched
        pub async fn launch(config: StoreConfig) -> MirarResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height)
                .request_timeout(config.timeouts.request());

            if !config.headless {
                builder = builder.with_head();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            for arg in config.launch_args() {
                builder = builder.arg(arg);
            }

            let cdp_config = builder.build().map_err(|e| MirarError::BrowserLaunch {
                message: e.to_string(),
            })?;

            let (browser, mut handler) =
                CdpBrowser::launch(cdp_config)
                    .await
                    .map_err(|e| MirarError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            // Drive the CDP message loop until the connection drops
            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            Ok(Self {
                config,
                inner: browser,
                handle,
            })
        }

        /// Open a page with session-scoped suppression of storefront script
        /// errors installed.
        ///
        /// Uncaught exceptions thrown by the storefront's own front-end code
        /// are logged and counted, never surfaced as failures; the listener
        /// is torn down when the page is dropped.
        ///
        /// # Errors
        ///
        /// Returns error if the page cannot be created
        pub async fn new_page(&self) -> MirarResult<Page> {
            let page = self
                .inner
                .new_page("about:blank")
                .await
                .map_err(|e| MirarError::Page {
                    message: e.to_string(),
                })?;

            let suppressed = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&suppressed);
            let mut exceptions = page
                .event_listener::<EventExceptionThrown>()
                .await
                .map_err(|e| MirarError::Page {
                    message: e.to_string(),
                })?;
            let listener = tokio::spawn(async move {
                while let Some(event) = exceptions.next().await {
                    counter.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(
                        error = %event.exception_details.text,
                        "application error ignored"
                    );
                }
            });

            Ok(Page {
                inner: page,
                timeouts: self.config.timeouts,
                suppressed,
                listener,
            })
        }

        /// The store configuration this browser was launched with
        #[must_use]
        pub const fn config(&self) -> &StoreConfig {
            &self.config
        }

        /// Close the browser
        pub async fn close(mut self) -> MirarResult<()> {
            self.inner
                .close()
                .await
                .map_err(|e| MirarError::BrowserLaunch {
                    message: e.to_string(),
                })?;
            self.handle.abort();
            Ok(())
        }
    }

    /// A browser page with a real CDP connection
    #[derive(Debug)]
    pub struct Page {
        inner: chromiumoxide::page::Page,
        timeouts: Timeouts,
        suppressed: Arc<AtomicUsize>,
        listener: tokio::task::JoinHandle<()>,
    }

    impl Drop for Page {
        fn drop(&mut self) {
            self.listener.abort();
        }
    }

    impl Page {
        async fn eval<T: serde::de::DeserializeOwned>(&self, expr: String) -> MirarResult<T> {
            let result = tokio::time::timeout(self.timeouts.command(), self.inner.evaluate(expr))
                .await
                .map_err(|_| MirarError::Timeout {
                    ms: self.timeouts.command_ms,
                })?
                .map_err(|e| MirarError::Evaluate {
                    message: e.to_string(),
                })?;
            result.into_value().map_err(|e| MirarError::Evaluate {
                message: e.to_string(),
            })
        }
    }

    #[async_trait]
    impl StoreDriver for Page {
        async fn goto(&mut self, url: &str) -> MirarResult<()> {
            let navigation = async {
                self.inner.goto(url).await?;
                self.inner.wait_for_navigation().await?;
                Ok::<_, chromiumoxide::error::CdpError>(())
            };
            tokio::time::timeout(self.timeouts.page_load(), navigation)
                .await
                .map_err(|_| MirarError::Timeout {
                    ms: self.timeouts.page_load_ms,
                })?
                .map_err(|e| MirarError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })
        }

        async fn current_url(&mut self) -> MirarResult<String> {
            let url = self.inner.url().await.map_err(|e| MirarError::Page {
                message: e.to_string(),
            })?;
            Ok(url.unwrap_or_else(|| String::from("about:blank")))
        }

        async fn count(&mut self, selector: &Selector) -> MirarResult<usize> {
            self.eval(selector.to_count_query()).await
        }

        async fn wait_any(
            &mut self,
            alternatives: &[Selector],
            timeout: Duration,
        ) -> MirarResult<Option<usize>> {
            let deadline = tokio::time::Instant::now() + timeout;
            loop {
                for (idx, selector) in alternatives.iter().enumerate() {
                    if self.count(selector).await? > 0 {
                        return Ok(Some(idx));
                    }
                }
                if tokio::time::Instant::now() >= deadline {
                    return Ok(None);
                }
                tokio::time::sleep(Duration::from_millis(DEFAULT_POLL_INTERVAL_MS)).await;
            }
        }

        async fn wait_url(&mut self, pattern: &UrlPattern, timeout: Duration) -> MirarResult<bool> {
            let deadline = tokio::time::Instant::now() + timeout;
            loop {
                if pattern.matches(&self.current_url().await?) {
                    return Ok(true);
                }
                if tokio::time::Instant::now() >= deadline {
                    return Ok(false);
                }
                tokio::time::sleep(Duration::from_millis(DEFAULT_POLL_INTERVAL_MS)).await;
            }
        }

        async fn click_first(&mut self, selector: &Selector, force: bool) -> MirarResult<bool> {
            self.eval(selector.to_click_query(force)).await
        }

        async fn fill_first(&mut self, selector: &Selector, text: &str) -> MirarResult<bool> {
            self.eval(selector.to_fill_query(text)).await
        }

        async fn option_values(
            &mut self,
            selector: &Selector,
        ) -> MirarResult<Vec<Option<String>>> {
            let values: Option<Vec<Option<String>>> =
                self.eval(selector.to_options_query()).await?;
            Ok(values.unwrap_or_default())
        }

        async fn select_value(&mut self, selector: &Selector, value: &str) -> MirarResult<bool> {
            if value.is_empty() {
                return Ok(false);
            }
            self.eval(selector.to_select_query(value)).await
        }

        async fn settle(&mut self, duration: Duration) {
            tokio::time::sleep(duration).await;
        }

        async fn screenshot(&mut self) -> MirarResult<Vec<u8>> {
            let params = CaptureScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .build();

            let screenshot =
                self.inner
                    .execute(params)
                    .await
                    .map_err(|e| MirarError::Page {
                        message: e.to_string(),
                    })?;

            use base64::Engine;
            base64::engine::general_purpose::STANDARD
                .decode(&screenshot.data)
                .map_err(|e| MirarError::Page {
                    message: e.to_string(),
                })
        }

        fn suppressed_errors(&self) -> usize {
            self.suppressed.load(Ordering::Relaxed)
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::{Browser, Page};
