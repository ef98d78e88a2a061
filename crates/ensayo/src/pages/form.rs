//! Form submission page with text, dropdown, date, radio, and checkbox
//! inputs.

use super::BasePage;
use crate::driver::Driver;
use crate::locator::Locator;
use crate::result::EnsayoResult;

/// Locator for a dropdown option by value
#[must_use]
pub fn dropdown_option(value: &str) -> Locator {
    Locator::xpath(format!("//option[@value=\"{value}\"]"))
}

/// Locator for a radio button by value
#[must_use]
pub fn radio_option(value: &str) -> Locator {
    Locator::xpath(format!("//input[@type=\"radio\" and @value=\"{value}\"]"))
}

/// Page object for the form page
#[derive(Debug)]
pub struct FormPage<'d> {
    base: BasePage<'d>,
    page_loaded: Locator,
    text_input: Locator,
    option_dropdown: Locator,
    date_input: Locator,
    agree_checkbox: Locator,
    submit_button: Locator,
    form_message: Locator,
}

impl<'d> FormPage<'d> {
    /// Build the page with its element locators
    #[must_use]
    pub fn new(driver: &'d dyn Driver) -> Self {
        Self {
            base: BasePage::new(driver),
            page_loaded: Locator::css("#form-page"),
            text_input: Locator::css("#form-input"),
            option_dropdown: Locator::css("#dropdown"),
            date_input: Locator::css("#date"),
            agree_checkbox: Locator::css("#agree"),
            submit_button: Locator::xpath("//button[text()=\"Submit\"]"),
            form_message: Locator::css("#form-message"),
        }
    }

    /// Wait until the form page is visible
    pub async fn is_page_loaded(&self) -> EnsayoResult<()> {
        self.base.wait_visible(&self.page_loaded).await
    }

    /// Enter text in the input field
    pub async fn fill_text_input(&self, text: &str) -> EnsayoResult<()> {
        self.base.type_into(&self.text_input, text).await
    }

    /// Select a dropdown option by value
    pub async fn select_dropdown_option(&self, value: &str) -> EnsayoResult<()> {
        self.base.click_when_clickable(&self.option_dropdown).await?;
        self.base.click_when_clickable(&dropdown_option(value)).await
    }

    /// Enter a date in the date field
    pub async fn fill_date(&self, date_str: &str) -> EnsayoResult<()> {
        self.base.type_into(&self.date_input, date_str).await
    }

    /// Select a radio button by value
    pub async fn select_radio_option(&self, value: &str) -> EnsayoResult<()> {
        self.base.click_when_clickable(&radio_option(value)).await
    }

    /// Check the agreement checkbox
    pub async fn check_agree_checkbox(&self) -> EnsayoResult<()> {
        self.base.click_when_clickable(&self.agree_checkbox).await
    }

    /// Submit the form
    pub async fn submit_form(&self) -> EnsayoResult<()> {
        self.base.click_when_clickable(&self.submit_button).await
    }

    /// The confirmation message text
    pub async fn get_form_message(&self) -> EnsayoResult<String> {
        self.base.text_of(&self.form_message).await
    }
}
