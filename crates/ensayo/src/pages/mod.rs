//! Page objects for the sample application.
//!
//! Each page wraps a borrowed driver handle and a fixed set of locators
//! assigned at construction, exposing intention-revealing actions that
//! perform a bounded wait for the element's precondition before acting.
//! Pages hold no other state; templated locators are pure functions from a
//! runtime argument to a fresh locator value.

mod dashboard;
mod form;
mod item_list;
mod login;

pub use dashboard::DashboardPage;
pub use form::{dropdown_option, radio_option, FormPage};
pub use item_list::{delete_button, edit_button, item_entry, ItemListPage};
pub use login::LoginPage;

use crate::driver::Driver;
use crate::locator::Locator;
use crate::result::EnsayoResult;
use crate::wait::{wait_until_clickable, wait_until_visible, WaitOptions};

/// Shared behavior composed into every page object
pub struct BasePage<'d> {
    driver: &'d dyn Driver,
    wait: WaitOptions,
}

impl std::fmt::Debug for BasePage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasePage").field("wait", &self.wait).finish()
    }
}

impl<'d> BasePage<'d> {
    /// Wrap a driver handle with its default wait options
    #[must_use]
    pub fn new(driver: &'d dyn Driver) -> Self {
        Self {
            wait: driver.wait_options(),
            driver,
        }
    }

    /// The borrowed driver handle
    #[must_use]
    pub fn driver(&self) -> &'d dyn Driver {
        self.driver
    }

    /// Open a URL in the page
    pub async fn go_to_url(&self, url: &str) -> EnsayoResult<()> {
        self.driver.goto(url).await
    }

    pub(crate) async fn wait_visible(&self, locator: &Locator) -> EnsayoResult<()> {
        wait_until_visible(self.driver, locator, &self.wait).await
    }

    /// Wait until visible, then send keystrokes (append semantics)
    pub(crate) async fn type_into(&self, locator: &Locator, text: &str) -> EnsayoResult<()> {
        self.wait_visible(locator).await?;
        self.driver.type_text(locator, text).await
    }

    /// Wait until visible, then clear the field
    pub(crate) async fn clear(&self, locator: &Locator) -> EnsayoResult<()> {
        self.wait_visible(locator).await?;
        self.driver.clear_text(locator).await
    }

    /// Wait until visible, then click
    pub(crate) async fn click_when_visible(&self, locator: &Locator) -> EnsayoResult<()> {
        self.wait_visible(locator).await?;
        self.driver.click(locator).await
    }

    /// Wait until clickable (visible and enabled), then click
    pub(crate) async fn click_when_clickable(&self, locator: &Locator) -> EnsayoResult<()> {
        wait_until_clickable(self.driver, locator, &self.wait).await?;
        self.driver.click(locator).await
    }

    /// Wait until visible, then read the element's text
    pub(crate) async fn text_of(&self, locator: &Locator) -> EnsayoResult<String> {
        self.wait_visible(locator).await?;
        self.driver.text_of(locator).await
    }

    /// Count matching elements without waiting
    pub(crate) async fn count(&self, locator: &Locator) -> EnsayoResult<usize> {
        self.driver.count(locator).await
    }
}
