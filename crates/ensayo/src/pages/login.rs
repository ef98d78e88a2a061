//! Login page of the sample application.

use super::BasePage;
use crate::driver::Driver;
use crate::locator::Locator;
use crate::result::EnsayoResult;

/// Page object for the login screen
#[derive(Debug)]
pub struct LoginPage<'d> {
    base: BasePage<'d>,
    page_loaded: Locator,
    username_input: Locator,
    password_input: Locator,
    login_button: Locator,
    error_message: Locator,
}

impl<'d> LoginPage<'d> {
    /// Build the page with its element locators
    #[must_use]
    pub fn new(driver: &'d dyn Driver) -> Self {
        Self {
            base: BasePage::new(driver),
            page_loaded: Locator::css("#login-section"),
            username_input: Locator::css("#username"),
            password_input: Locator::css("#password"),
            login_button: Locator::xpath("//button[@onclick=\"login()\"]"),
            error_message: Locator::xpath(
                "//p[@class=\"error\"][text()=\"Invalid credentials.\"]",
            ),
        }
    }

    /// Open the application entry point
    pub async fn go_to_url(&self, url: &str) -> EnsayoResult<()> {
        self.base.go_to_url(url).await
    }

    /// Wait until the login page is fully loaded
    pub async fn is_page_loaded(&self) -> EnsayoResult<()> {
        self.base.wait_visible(&self.page_loaded).await
    }

    /// Fill in the username field
    pub async fn fill_username(&self, username: &str) -> EnsayoResult<()> {
        self.base.type_into(&self.username_input, username).await
    }

    /// Fill in the password field
    pub async fn fill_password(&self, password: &str) -> EnsayoResult<()> {
        self.base.type_into(&self.password_input, password).await
    }

    /// Submit the login form
    pub async fn click_login_button(&self) -> EnsayoResult<()> {
        self.base.click_when_visible(&self.login_button).await
    }

    /// Wait for the invalid-credentials message to appear
    pub async fn is_invalid_login_message_visible(&self) -> EnsayoResult<()> {
        self.base.wait_visible(&self.error_message).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::pages::page_test_support::fast_driver;

    #[tokio::test]
    async fn test_fill_credentials_waits_then_types() {
        let driver = fast_driver();
        let handle = driver.handle();
        handle.set_visible(&Locator::css("#username"));
        handle.set_visible(&Locator::css("#password"));

        let page = LoginPage::new(&driver);
        page.fill_username("testuser").await.unwrap();
        page.fill_password("invalid_pass").await.unwrap();

        assert!(handle.was_called("type:#username:testuser"));
        assert!(handle.was_called("type:#password:invalid_pass"));
    }

    #[tokio::test]
    async fn test_login_button_click_waits_for_visibility() {
        let driver = fast_driver();
        let page = LoginPage::new(&driver);
        assert!(page.click_login_button().await.is_err());

        let button = Locator::xpath("//button[@onclick=\"login()\"]");
        driver.handle().set_clickable(&button);
        page.click_login_button().await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_login_message_times_out_when_absent() {
        let driver = fast_driver();
        let page = LoginPage::new(&driver);
        assert!(page.is_invalid_login_message_visible().await.is_err());
    }
}
