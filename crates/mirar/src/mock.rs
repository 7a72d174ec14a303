//! Mock storefront for testing probes without a browser.
//!
//! [`MockPage`] implements [`StoreDriver`] over an in-memory DOM. Pages are
//! registered as routes; elements declare which CSS selector strings they
//! answer to, their text content, and what a click does (nothing, navigate,
//! or vanish — the consent-dialog case). This is enough to exercise every
//! conditional branch of the suite deterministically.

use crate::driver::StoreDriver;
use crate::result::MirarResult;
use crate::target::Selector;
use crate::wait::{normalize_root, UrlPattern};
use async_trait::async_trait;
use std::time::Duration;

/// What clicking a mock element does
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ClickEffect {
    /// Click is recorded but has no DOM effect
    #[default]
    None,
    /// Click navigates to a URL (absolute, or resolved against the current
    /// page's origin)
    Navigate(String),
    /// Click removes the element, like dismissing an overlay
    Vanish,
}

/// An element in the mock DOM
#[derive(Debug, Clone)]
pub struct MockElement {
    selectors: Vec<String>,
    text: String,
    visible: bool,
    option_values: Vec<Option<String>>,
    on_click: ClickEffect,
}

impl MockElement {
    /// Create an element answering to one CSS selector string
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selectors: vec![selector.into()],
            text: String::new(),
            visible: true,
            option_values: Vec::new(),
            on_click: ClickEffect::None,
        }
    }

    /// Register an additional CSS selector string this element answers to
    #[must_use]
    pub fn also_matching(mut self, selector: impl Into<String>) -> Self {
        self.selectors.push(selector.into());
        self
    }

    /// Set the element's text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Mark the element as not rendered
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Set the element's option values (for selection controls)
    #[must_use]
    pub fn with_options(mut self, values: Vec<Option<String>>) -> Self {
        self.option_values = values;
        self
    }

    /// Clicking this element navigates to the given URL
    #[must_use]
    pub fn navigates_to(mut self, url: impl Into<String>) -> Self {
        self.on_click = ClickEffect::Navigate(url.into());
        self
    }

    /// Clicking this element removes it from the DOM
    #[must_use]
    pub fn vanishes_on_click(mut self) -> Self {
        self.on_click = ClickEffect::Vanish;
        self
    }

    fn matches(&self, selector: &Selector) -> bool {
        match selector {
            Selector::Css(css) => self.selectors.iter().any(|s| s == css),
            Selector::Text(text) => self.text.contains(text.as_str()),
            Selector::CssWithText { css, text } => {
                self.selectors.iter().any(|s| s == css) && self.text.contains(text.as_str())
            }
        }
    }
}

/// A mock DOM: an ordered list of elements
#[derive(Debug, Clone, Default)]
pub struct MockDom {
    elements: Vec<MockElement>,
}

impl MockDom {
    /// Create an empty DOM
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element
    #[must_use]
    pub fn with(mut self, element: MockElement) -> Self {
        self.elements.push(element);
        self
    }

    fn first_index(&self, selector: &Selector) -> Option<usize> {
        self.elements.iter().position(|el| el.matches(selector))
    }

    fn count(&self, selector: &Selector) -> usize {
        self.elements.iter().filter(|el| el.matches(selector)).count()
    }
}

#[derive(Debug)]
struct Route {
    url: String,
    dom: MockDom,
    once: bool,
}

/// An in-memory page implementing [`StoreDriver`]
#[derive(Debug)]
pub struct MockPage {
    current_url: String,
    dom: MockDom,
    routes: Vec<Route>,
    redirects: Vec<(String, String)>,
    filled: Vec<(String, String)>,
    selected: Vec<(String, String)>,
    suppressed: usize,
}

impl MockPage {
    /// Create a page with no routes, positioned nowhere
    #[must_use]
    pub fn new() -> Self {
        Self {
            current_url: String::from("about:blank"),
            dom: MockDom::new(),
            routes: Vec::new(),
            redirects: Vec::new(),
            filled: Vec::new(),
            selected: Vec::new(),
            suppressed: 0,
        }
    }

    /// Register the DOM served at a URL
    #[must_use]
    pub fn route(mut self, url: impl Into<String>, dom: MockDom) -> Self {
        self.routes.push(Route {
            url: url.into(),
            dom,
            once: false,
        });
        self
    }

    /// Register a DOM served at a URL for the next navigation only.
    ///
    /// A later route for the same URL takes over afterwards; this models a
    /// password gate served at the store root until it is satisfied.
    #[must_use]
    pub fn route_once(mut self, url: impl Into<String>, dom: MockDom) -> Self {
        self.routes.push(Route {
            url: url.into(),
            dom,
            once: true,
        });
        self
    }

    /// Redirect the next navigation to `from` over to `to`.
    ///
    /// Consumed on first use; models a storefront that bounces the root URL
    /// to its password page until the gate is satisfied.
    #[must_use]
    pub fn redirect_once(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.redirects.push((from.into(), to.into()));
        self
    }

    /// Simulate an uncaught storefront script error.
    ///
    /// Mirrors the real session's suppression: logged and counted, never a
    /// failure.
    pub fn inject_app_error(&mut self, message: &str) {
        self.suppressed += 1;
        tracing::warn!(error = message, "application error ignored");
    }

    /// Values selected on selection controls, in order
    #[must_use]
    pub fn selections(&self) -> &[(String, String)] {
        &self.selected
    }

    /// Values typed into fields, in order
    #[must_use]
    pub fn fills(&self) -> &[(String, String)] {
        &self.filled
    }

    fn resolve(&self, href: &str) -> String {
        if href.contains("://") {
            return href.to_string();
        }
        let origin = origin_of(&self.current_url);
        format!("{origin}{href}")
    }

    fn load(&mut self, url: String) {
        let mut url = url;
        while let Some(idx) = self
            .redirects
            .iter()
            .position(|(from, _)| normalize_root(from) == normalize_root(&url))
        {
            url = self.redirects.remove(idx).1;
        }
        let found = self
            .routes
            .iter()
            .position(|route| normalize_root(&route.url) == normalize_root(&url));
        self.dom = match found {
            Some(idx) => {
                let dom = self.routes[idx].dom.clone();
                if self.routes[idx].once {
                    let _ = self.routes.remove(idx);
                }
                dom
            }
            None => MockDom::new(),
        };
        self.current_url = url;
    }
}

impl Default for MockPage {
    fn default() -> Self {
        Self::new()
    }
}

/// Scheme and host of an absolute URL, without any path
fn origin_of(url: &str) -> &str {
    let after_scheme = url.find("://").map_or(0, |idx| idx + 3);
    match url[after_scheme..].find('/') {
        Some(slash) => &url[..after_scheme + slash],
        None => url,
    }
}

#[async_trait]
impl StoreDriver for MockPage {
    async fn goto(&mut self, url: &str) -> MirarResult<()> {
        self.load(url.to_string());
        Ok(())
    }

    async fn current_url(&mut self) -> MirarResult<String> {
        Ok(self.current_url.clone())
    }

    async fn count(&mut self, selector: &Selector) -> MirarResult<usize> {
        Ok(self.dom.count(selector))
    }

    async fn wait_any(
        &mut self,
        alternatives: &[Selector],
        _timeout: Duration,
    ) -> MirarResult<Option<usize>> {
        // The mock DOM only changes on interaction, so one scan suffices
        Ok(alternatives
            .iter()
            .position(|selector| self.dom.count(selector) > 0))
    }

    async fn wait_url(&mut self, pattern: &UrlPattern, _timeout: Duration) -> MirarResult<bool> {
        Ok(pattern.matches(&self.current_url))
    }

    async fn click_first(&mut self, selector: &Selector, force: bool) -> MirarResult<bool> {
        let Some(idx) = self.dom.first_index(selector) else {
            return Ok(false);
        };
        if !force && !self.dom.elements[idx].visible {
            return Ok(false);
        }
        match self.dom.elements[idx].on_click.clone() {
            ClickEffect::None => {}
            ClickEffect::Navigate(href) => {
                let url = self.resolve(&href);
                self.load(url);
            }
            ClickEffect::Vanish => {
                let _ = self.dom.elements.remove(idx);
            }
        }
        Ok(true)
    }

    async fn fill_first(&mut self, selector: &Selector, text: &str) -> MirarResult<bool> {
        if self.dom.first_index(selector).is_none() {
            return Ok(false);
        }
        self.filled.push((selector.to_string(), text.to_string()));
        Ok(true)
    }

    async fn option_values(&mut self, selector: &Selector) -> MirarResult<Vec<Option<String>>> {
        Ok(self
            .dom
            .first_index(selector)
            .map(|idx| self.dom.elements[idx].option_values.clone())
            .unwrap_or_default())
    }

    async fn select_value(&mut self, selector: &Selector, value: &str) -> MirarResult<bool> {
        if value.is_empty() {
            return Ok(false);
        }
        let Some(idx) = self.dom.first_index(selector) else {
            return Ok(false);
        };
        let known = self.dom.elements[idx]
            .option_values
            .iter()
            .any(|candidate| candidate.as_deref() == Some(value));
        if !known {
            return Ok(false);
        }
        self.selected.push((selector.to_string(), value.to_string()));
        Ok(true)
    }

    async fn settle(&mut self, _duration: Duration) {}

    async fn screenshot(&mut self) -> MirarResult<Vec<u8>> {
        Ok(vec![])
    }

    fn suppressed_errors(&self) -> usize {
        self.suppressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn homepage() -> MockDom {
        MockDom::new()
            .with(MockElement::new("img").also_matching("img.banner-image"))
            .with(
                MockElement::new("a")
                    .also_matching("a[href=\"/pages/about\"]")
                    .with_text("About")
                    .navigates_to("/pages/about"),
            )
    }

    mod element_matching_tests {
        use super::*;

        #[test]
        fn test_css_match() {
            let el = MockElement::new("button").also_matching("button[type=\"submit\"]");
            assert!(el.matches(&Selector::css("button")));
            assert!(el.matches(&Selector::css("button[type=\"submit\"]")));
            assert!(!el.matches(&Selector::css("a")));
        }

        #[test]
        fn test_text_match() {
            let el = MockElement::new("p").with_text("From Antwerp with love");
            assert!(el.matches(&Selector::text("Antwerp")));
            assert!(!el.matches(&Selector::text("Rotterdam")));
        }

        #[test]
        fn test_css_with_text_needs_both() {
            let el = MockElement::new("button").with_text("Accept cookies");
            assert!(el.matches(&Selector::css_with_text("button", "Accept")));
            assert!(!el.matches(&Selector::css_with_text("a", "Accept")));
            assert!(!el.matches(&Selector::css_with_text("button", "Decline")));
        }
    }

    mod page_tests {
        use super::*;

        #[tokio::test]
        async fn test_goto_loads_registered_dom() {
            let mut page = MockPage::new().route("https://store.example/", homepage());
            page.goto("https://store.example/").await.unwrap();
            assert!(page.exists(&Selector::css("img")).await.unwrap());
            assert_eq!(
                page.current_url().await.unwrap(),
                "https://store.example/"
            );
        }

        #[tokio::test]
        async fn test_goto_unknown_url_yields_empty_dom() {
            let mut page = MockPage::new();
            page.goto("https://store.example/missing").await.unwrap();
            assert_eq!(page.count(&Selector::css("img")).await.unwrap(), 0);
        }

        #[tokio::test]
        async fn test_route_once_is_consumed() {
            let gated = MockDom::new().with(MockElement::new("input[name=\"password\"]"));
            let mut page = MockPage::new()
                .route_once("https://store.example/", gated)
                .route("https://store.example/", homepage());

            page.goto("https://store.example/").await.unwrap();
            assert!(page
                .exists(&Selector::css("input[name=\"password\"]"))
                .await
                .unwrap());

            page.goto("https://store.example/").await.unwrap();
            assert!(page.exists(&Selector::css("img")).await.unwrap());
        }

        #[tokio::test]
        async fn test_click_navigates_relative_href() {
            let mut page = MockPage::new()
                .route("https://store.example/", homepage())
                .route("https://store.example/pages/about", MockDom::new());
            page.goto("https://store.example/").await.unwrap();
            let clicked = page
                .click_first(&Selector::css_with_text("a", "About"), true)
                .await
                .unwrap();
            assert!(clicked);
            assert_eq!(
                page.current_url().await.unwrap(),
                "https://store.example/pages/about"
            );
        }

        #[tokio::test]
        async fn test_click_vanish_removes_element() {
            let dom = MockDom::new().with(
                MockElement::new("button")
                    .with_text("Accept")
                    .vanishes_on_click(),
            );
            let mut page = MockPage::new().route("https://store.example/", dom);
            page.goto("https://store.example/").await.unwrap();
            let consent = Selector::css_with_text("button", "Accept");
            assert!(page.click_first(&consent, true).await.unwrap());
            assert!(!page.exists(&consent).await.unwrap());
        }

        #[tokio::test]
        async fn test_unforced_click_on_hidden_element() {
            let dom = MockDom::new().with(MockElement::new("a").hidden());
            let mut page = MockPage::new().route("https://store.example/", dom);
            page.goto("https://store.example/").await.unwrap();
            assert!(!page.click_first(&Selector::css("a"), false).await.unwrap());
            assert!(page.click_first(&Selector::css("a"), true).await.unwrap());
        }

        #[tokio::test]
        async fn test_select_value_rejects_unknown_and_empty() {
            let dom = MockDom::new().with(
                MockElement::new("select[name=\"id\"]")
                    .with_options(vec![None, Some(String::new()), Some("SKU-1".into())]),
            );
            let mut page = MockPage::new().route("https://store.example/p", dom);
            page.goto("https://store.example/p").await.unwrap();
            let select = Selector::css("select[name=\"id\"]");
            assert!(!page.select_value(&select, "").await.unwrap());
            assert!(!page.select_value(&select, "SKU-9").await.unwrap());
            assert!(page.select_value(&select, "SKU-1").await.unwrap());
            assert_eq!(page.selections().len(), 1);
        }

        #[tokio::test]
        async fn test_redirect_once_is_consumed() {
            let gate = MockDom::new().with(MockElement::new("input[name=\"password\"]"));
            let mut page = MockPage::new()
                .redirect_once("https://store.example/", "https://store.example/password")
                .route("https://store.example/password", gate)
                .route("https://store.example/", homepage());

            page.goto("https://store.example/").await.unwrap();
            assert_eq!(
                page.current_url().await.unwrap(),
                "https://store.example/password"
            );

            page.goto("https://store.example/").await.unwrap();
            assert_eq!(
                page.current_url().await.unwrap(),
                "https://store.example/"
            );
        }

        #[tokio::test]
        async fn test_suppressed_errors_counted() {
            let mut page = MockPage::new();
            page.inject_app_error("boom");
            assert_eq!(page.suppressed_errors(), 1);
        }

        #[test]
        fn test_origin_of() {
            assert_eq!(
                origin_of("https://store.example/collections/all"),
                "https://store.example"
            );
            assert_eq!(origin_of("https://store.example"), "https://store.example");
        }
    }
}
