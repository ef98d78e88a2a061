//! Locator abstraction for element selection.
//!
//! A locator is a (strategy, selector) pair used by value and never
//! mutated. Locators compile to JavaScript probe expressions so that CSS
//! and XPath targets share one evaluation path in the driver.

use std::time::Duration;

/// Selector strategy for locating elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// CSS selector (e.g., `#username`)
    Css(String),
    /// XPath selector (e.g., `//button[text()="Save"]`)
    XPath(String),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self::XPath(selector.into())
    }

    /// The raw selector string
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            Self::Css(s) | Self::XPath(s) => s,
        }
    }

    /// JavaScript expression resolving to the first matching node (or null)
    #[must_use]
    pub fn to_node_query(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelector({s:?})"),
            Self::XPath(s) => format!(
                "document.evaluate({s:?}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue"
            ),
        }
    }

    /// JavaScript expression resolving to the number of matching nodes
    #[must_use]
    pub fn to_count_query(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelectorAll({s:?}).length"),
            Self::XPath(s) => format!(
                "document.evaluate({s:?}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null).snapshotLength"
            ),
        }
    }

    /// JavaScript expression resolving to whether the element is visible
    #[must_use]
    pub fn to_visible_query(&self) -> String {
        format!(
            "(() => {{ const el = {node}; if (!el) return false; \
             const r = el.getBoundingClientRect(); \
             const s = window.getComputedStyle(el); \
             return r.width > 0 && r.height > 0 && \
             s.display !== 'none' && s.visibility !== 'hidden'; }})()",
            node = self.to_node_query()
        )
    }

    /// JavaScript expression resolving to whether the element is clickable
    /// (visible and enabled)
    #[must_use]
    pub fn to_clickable_query(&self) -> String {
        format!(
            "(() => {{ const el = {node}; if (!el) return false; \
             const r = el.getBoundingClientRect(); \
             const s = window.getComputedStyle(el); \
             return r.width > 0 && r.height > 0 && \
             s.display !== 'none' && s.visibility !== 'hidden' && \
             el.disabled !== true; }})()",
            node = self.to_node_query()
        )
    }

    /// JavaScript expression resolving to the element's visible text (or null)
    #[must_use]
    pub fn to_text_query(&self) -> String {
        format!(
            "(() => {{ const el = {node}; return el ? el.innerText : null; }})()",
            node = self.to_node_query()
        )
    }

    /// JavaScript expression dispatching a click, resolving to whether a
    /// node was found
    #[must_use]
    pub fn to_click_script(&self) -> String {
        format!(
            "(() => {{ const el = {node}; if (!el) return false; el.click(); return true; }})()",
            node = self.to_node_query()
        )
    }

    /// JavaScript expression appending `text` to the element's value
    /// (append semantics, matching keystroke input into a non-cleared field)
    #[must_use]
    pub fn to_append_value_script(&self, text: &str) -> String {
        format!(
            "(() => {{ const el = {node}; if (!el) return false; \
             el.value = el.value + {text:?}; \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
             return true; }})()",
            node = self.to_node_query()
        )
    }

    /// JavaScript expression clearing the element's value
    #[must_use]
    pub fn to_clear_value_script(&self) -> String {
        format!(
            "(() => {{ const el = {node}; if (!el) return false; \
             el.value = ''; \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
             return true; }})()",
            node = self.to_node_query()
        )
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Css(s) => write!(f, "css `{s}`"),
            Self::XPath(s) => write!(f, "xpath `{s}`"),
        }
    }
}

/// A locator for finding and interacting with one logical element.
///
/// Page objects assign a fixed set of these at construction; templated
/// locators are produced by pure functions formatting a runtime argument
/// into a fresh `Locator` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    /// The selector for finding the element
    selector: Selector,
    /// Per-locator wait timeout override
    timeout: Option<Duration>,
}

impl Locator {
    /// Create a locator from a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self {
            selector: Selector::css(selector),
            timeout: None,
        }
    }

    /// Create a locator from an XPath selector
    #[must_use]
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self {
            selector: Selector::xpath(selector),
            timeout: None,
        }
    }

    /// Create a locator from a selector
    #[must_use]
    pub fn from_selector(selector: Selector) -> Self {
        Self {
            selector,
            timeout: None,
        }
    }

    /// Override the bounded wait timeout for this locator
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Get the timeout override, if any
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.selector)
    }
}
