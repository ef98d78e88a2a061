//! Item list page: items can be added, edited in place, and deleted.

use super::BasePage;
use crate::driver::Driver;
use crate::locator::Locator;
use crate::result::EnsayoResult;

/// Locator for the edit button next to a named item
#[must_use]
pub fn edit_button(item: &str) -> Locator {
    Locator::xpath(format!(
        "//span[text()='{item}']/following-sibling::button[1]"
    ))
}

/// Locator for the delete button next to a named item
#[must_use]
pub fn delete_button(item: &str) -> Locator {
    Locator::xpath(format!(
        "//span[text()='{item}']/following-sibling::button[2]"
    ))
}

/// Locator for a named item's list entry
#[must_use]
pub fn item_entry(item: &str) -> Locator {
    Locator::xpath(format!("//ul[@id='item-list']/li/span[text()='{item}']"))
}

/// Page object for the item list
#[derive(Debug)]
pub struct ItemListPage<'d> {
    base: BasePage<'d>,
    page_loaded: Locator,
    item_input: Locator,
    add_item: Locator,
    item_edit_input: Locator,
    save_item: Locator,
    back_to_dashboard: Locator,
    item_entries: Locator,
}

impl<'d> ItemListPage<'d> {
    /// Build the page with its element locators
    #[must_use]
    pub fn new(driver: &'d dyn Driver) -> Self {
        Self {
            base: BasePage::new(driver),
            page_loaded: Locator::css("#list-page"),
            item_input: Locator::css("#item-input"),
            add_item: Locator::xpath("//button[text()=\"Add Item\"]"),
            item_edit_input: Locator::xpath("//li/input"),
            save_item: Locator::xpath("//button[text()=\"Save\"]"),
            back_to_dashboard: Locator::xpath(
                "//div[@id=\"list-page\"]//button[text()=\"Back to Dashboard\"]",
            ),
            item_entries: Locator::xpath("//ul[@id='item-list']/li"),
        }
    }

    /// Wait until the item list page is fully loaded
    pub async fn is_page_loaded(&self) -> EnsayoResult<()> {
        self.base.wait_visible(&self.page_loaded).await
    }

    /// Return to the dashboard
    pub async fn click_go_back_to_dashboard(&self) -> EnsayoResult<()> {
        self.base.click_when_visible(&self.back_to_dashboard).await
    }

    /// Enter a new item name in the input field
    pub async fn fill_item_input(&self, item: &str) -> EnsayoResult<()> {
        self.base.type_into(&self.item_input, item).await
    }

    /// Add the entered item to the list
    pub async fn click_add_item(&self) -> EnsayoResult<()> {
        self.base.click_when_clickable(&self.add_item).await
    }

    /// Click the edit button for the named item
    pub async fn click_edit_by_item_name(&self, item: &str) -> EnsayoResult<()> {
        self.base.click_when_clickable(&edit_button(item)).await
    }

    /// Click the delete button for the named item
    pub async fn click_delete_by_item_name(&self, item: &str) -> EnsayoResult<()> {
        self.base.click_when_clickable(&delete_button(item)).await
    }

    /// Clear the in-place edit input
    pub async fn clear_item_edit_input(&self) -> EnsayoResult<()> {
        self.base.clear(&self.item_edit_input).await
    }

    /// Fill the in-place edit input with the new item name
    pub async fn fill_item_edit_input(&self, item: &str) -> EnsayoResult<()> {
        self.base.type_into(&self.item_edit_input, item).await
    }

    /// Save the edited item
    pub async fn click_save(&self) -> EnsayoResult<()> {
        self.base.click_when_clickable(&self.save_item).await
    }

    /// Number of entries currently in the list
    pub async fn item_count(&self) -> EnsayoResult<usize> {
        self.base.count(&self.item_entries).await
    }

    /// Number of entries carrying exactly the given name
    pub async fn count_of_item(&self, item: &str) -> EnsayoResult<usize> {
        self.base.count(&item_entry(item)).await
    }
}
