//! Selectors and conditional targets.
//!
//! A [`ConditionalTarget`] names one logical UI role ("the menu toggle",
//! "the catalog link") as an ordered list of selector alternatives resolved
//! first-match-wins. Whether a missing target is a failure is carried by the
//! target itself via its `required` flag, not decided ad hoc at call sites.

/// Selector for locating elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// CSS selector (e.g. `img.banner-image`)
    Css(String),
    /// Any element whose text content contains the string
    Text(String),
    /// CSS selector filtered by text content
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text content to match
        text: String,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a CSS selector filtered by text content
    #[must_use]
    pub fn css_with_text(css: impl Into<String>, text: impl Into<String>) -> Self {
        Self::CssWithText {
            css: css.into(),
            text: text.into(),
        }
    }

    /// JavaScript expression evaluating to the first match in document
    /// order, or null
    #[must_use]
    pub fn find_expr(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelector({s:?})"),
            Self::Text(t) => {
                format!("Array.from(document.querySelectorAll('*')).find(el => el.textContent.includes({t:?}))")
            }
            Self::CssWithText { css, text } => {
                format!("Array.from(document.querySelectorAll({css:?})).find(el => el.textContent.includes({text:?}))")
            }
        }
    }

    /// JavaScript expression counting matches
    #[must_use]
    pub fn to_count_query(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelectorAll({s:?}).length"),
            Self::Text(t) => {
                format!("Array.from(document.querySelectorAll('*')).filter(el => el.textContent.includes({t:?})).length")
            }
            Self::CssWithText { css, text } => {
                format!("Array.from(document.querySelectorAll({css:?})).filter(el => el.textContent.includes({text:?})).length")
            }
        }
    }

    /// JavaScript expression clicking the first match.
    ///
    /// Evaluates to true if a click was dispatched. Without `force`, an
    /// element that has no rendered boxes is treated as not clickable.
    #[must_use]
    pub fn to_click_query(&self, force: bool) -> String {
        format!(
            "(() => {{ const el = {expr}; if (!el) return false; \
             if (!{force} && el.getClientRects().length === 0) return false; \
             el.click(); return true; }})()",
            expr = self.find_expr()
        )
    }

    /// JavaScript expression filling the first matching field.
    ///
    /// Evaluates to true if a field was filled.
    #[must_use]
    pub fn to_fill_query(&self, text: &str) -> String {
        format!(
            "(() => {{ const el = {expr}; if (!el) return false; \
             el.value = {text:?}; \
             el.dispatchEvent(new Event('input', {{bubbles: true}})); return true; }})()",
            expr = self.find_expr()
        )
    }

    /// JavaScript expression listing the first matching selection control's
    /// option values in document order.
    ///
    /// Options without a value attribute surface as null so callers can
    /// filter them; evaluates to null when no control matches.
    #[must_use]
    pub fn to_options_query(&self) -> String {
        format!(
            "(() => {{ const el = {expr}; if (!el) return null; \
             return Array.from(el.options).map(o => o.getAttribute('value')); }})()",
            expr = self.find_expr()
        )
    }

    /// JavaScript expression selecting a value on the first matching
    /// selection control.
    ///
    /// Evaluates to true if the value was applied.
    #[must_use]
    pub fn to_select_query(&self, value: &str) -> String {
        format!(
            "(() => {{ const el = {expr}; if (!el) return false; \
             el.value = {value:?}; \
             el.dispatchEvent(new Event('change', {{bubbles: true}})); return true; }})()",
            expr = self.find_expr()
        )
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Css(s) => write!(f, "{s}"),
            Self::Text(t) => write!(f, ":contains({t})"),
            Self::CssWithText { css, text } => write!(f, "{css}:contains({text})"),
        }
    }
}

/// One logical UI role described as ordered selector alternatives.
///
/// Resolution is first-match-wins across the alternatives in order. For an
/// optional target, zero matches is a valid outcome; for a required target
/// it is a scenario failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalTarget {
    role: String,
    alternatives: Vec<Selector>,
    required: bool,
}

impl ConditionalTarget {
    /// Create an optional target for the given role
    #[must_use]
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            alternatives: Vec::new(),
            required: false,
        }
    }

    /// Append a selector alternative
    #[must_use]
    pub fn alt(mut self, selector: Selector) -> Self {
        self.alternatives.push(selector);
        self
    }

    /// Set whether absence of this target fails the scenario
    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// The logical role this target plays
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    /// The ordered selector alternatives
    #[must_use]
    pub fn alternatives(&self) -> &[Selector] {
        &self.alternatives
    }

    /// Whether absence of this target fails the scenario
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod selector_tests {
        use super::*;

        #[test]
        fn test_css_find_expr() {
            let selector = Selector::css("img.banner-image");
            let expr = selector.find_expr();
            assert!(expr.contains("querySelector"));
            assert!(expr.contains("img.banner-image"));
        }

        #[test]
        fn test_text_find_expr() {
            let selector = Selector::text("Antwerp");
            let expr = selector.find_expr();
            assert!(expr.contains("textContent"));
            assert!(expr.contains("Antwerp"));
        }

        #[test]
        fn test_css_with_text_find_expr() {
            let selector = Selector::css_with_text("button", "Accept");
            let expr = selector.find_expr();
            assert!(expr.contains("querySelectorAll"));
            assert!(expr.contains("Accept"));
        }

        #[test]
        fn test_count_query() {
            let selector = Selector::css("a[href*=\"/products/\"]");
            let query = selector.to_count_query();
            assert!(query.contains("querySelectorAll"));
            assert!(query.contains(".length"));
        }

        #[test]
        fn test_click_query_force_skips_visibility_check() {
            let selector = Selector::css("button");
            let forced = selector.to_click_query(true);
            let unforced = selector.to_click_query(false);
            assert!(forced.contains("!true"));
            assert!(unforced.contains("!false"));
            assert!(unforced.contains("getClientRects"));
        }

        #[test]
        fn test_options_query_reads_value_attribute() {
            let selector = Selector::css("select[name=\"id\"]");
            let query = selector.to_options_query();
            assert!(query.contains("el.options"));
            assert!(query.contains("getAttribute"));
        }

        #[test]
        fn test_select_query_dispatches_change() {
            let selector = Selector::css("select[name=\"id\"]");
            let query = selector.to_select_query("SKU-1");
            assert!(query.contains("SKU-1"));
            assert!(query.contains("change"));
        }

        #[test]
        fn test_fill_query_dispatches_input() {
            let selector = Selector::css("input[name=\"password\"]");
            let query = selector.to_fill_query("secret");
            assert!(query.contains("secret"));
            assert!(query.contains("input"));
        }

        #[test]
        fn test_display() {
            assert_eq!(Selector::css("p").to_string(), "p");
            assert_eq!(
                Selector::css_with_text("a", "About").to_string(),
                "a:contains(About)"
            );
        }
    }

    mod conditional_target_tests {
        use super::*;

        #[test]
        fn test_optional_by_default() {
            let target = ConditionalTarget::new("consent accept");
            assert!(!target.is_required());
            assert_eq!(target.role(), "consent accept");
            assert!(target.alternatives().is_empty());
        }

        #[test]
        fn test_alternatives_preserve_order() {
            let target = ConditionalTarget::new("catalog link")
                .alt(Selector::css("a[href=\"/collections/all\"]"))
                .alt(Selector::css_with_text("a", "Catalog"))
                .alt(Selector::css_with_text("a", "All"))
                .required(true);
            assert!(target.is_required());
            assert_eq!(target.alternatives().len(), 3);
            assert_eq!(
                target.alternatives()[0],
                Selector::css("a[href=\"/collections/all\"]")
            );
        }
    }
}
