//! Dashboard page shown after a successful login.

use super::BasePage;
use crate::driver::Driver;
use crate::locator::Locator;
use crate::result::EnsayoResult;

/// Page object for the dashboard
#[derive(Debug)]
pub struct DashboardPage<'d> {
    base: BasePage<'d>,
    page_loaded: Locator,
    go_to_item_list: Locator,
    go_to_form_page: Locator,
    logout: Locator,
}

impl<'d> DashboardPage<'d> {
    /// Build the page with its element locators
    #[must_use]
    pub fn new(driver: &'d dyn Driver) -> Self {
        Self {
            base: BasePage::new(driver),
            page_loaded: Locator::css("#dashboard"),
            go_to_item_list: Locator::xpath("//button[text()=\"Go to Item List Page\"]"),
            go_to_form_page: Locator::xpath("//button[text()=\"Go to Form Page\"]"),
            logout: Locator::xpath("//button[text()=\"Logout\"]"),
        }
    }

    /// Wait until the dashboard is fully loaded
    pub async fn is_page_loaded(&self) -> EnsayoResult<()> {
        self.base.wait_visible(&self.page_loaded).await
    }

    /// Navigate to the item list page
    pub async fn click_go_to_item_list(&self) -> EnsayoResult<()> {
        self.base.click_when_clickable(&self.go_to_item_list).await
    }

    /// Navigate to the form page
    pub async fn click_go_to_form_page(&self) -> EnsayoResult<()> {
        self.base.click_when_clickable(&self.go_to_form_page).await
    }

    /// Log out of the application
    pub async fn click_logout(&self) -> EnsayoResult<()> {
        self.base.click_when_clickable(&self.logout).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::pages::page_test_support::fast_driver;

    #[tokio::test]
    async fn test_navigation_clicks_wait_for_clickable() {
        let driver = fast_driver();
        let handle = driver.handle();
        let page = DashboardPage::new(&driver);

        assert!(page.click_go_to_item_list().await.is_err());

        handle.set_clickable(&Locator::xpath("//button[text()=\"Go to Item List Page\"]"));
        page.click_go_to_item_list().await.unwrap();
        assert!(handle.was_called("click://button[text()=\"Go to Item List Page\"]"));
    }

    #[tokio::test]
    async fn test_logout() {
        let driver = fast_driver();
        let handle = driver.handle();
        handle.set_clickable(&Locator::xpath("//button[text()=\"Logout\"]"));

        DashboardPage::new(&driver).click_logout().await.unwrap();
        assert!(handle.was_called("click://button[text()=\"Logout\"]"));
    }
}
