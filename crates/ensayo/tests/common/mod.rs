//! Shared helpers for the end-to-end suites.
#![allow(dead_code)]

use std::path::Path;

use ensayo::{
    local_app_url, DashboardPage, Driver, EnsayoError, EnsayoResult, LoginPage, Settings,
};

/// Load the suite settings from the repository's configuration file
pub fn suite_settings() -> Settings {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/local.yaml");
    Settings::load(path).expect("suite settings should load")
}

/// Path of the tabular test-data file
pub fn testdata_path() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/testdata.yaml")
}

/// Fail the test with an assertion error unless the condition holds
pub fn check(condition: bool, message: &str) -> EnsayoResult<()> {
    if condition {
        Ok(())
    } else {
        Err(EnsayoError::Assertion {
            message: message.to_string(),
        })
    }
}

/// Open the application and log in with the supplied credentials
pub async fn login_as(driver: &dyn Driver, username: &str, password: &str) -> EnsayoResult<()> {
    let login_page = LoginPage::new(driver);
    login_page.go_to_url(&local_app_url()).await?;
    login_page.is_page_loaded().await?;
    login_page.fill_username(username).await?;
    login_page.fill_password(password).await?;
    login_page.click_login_button().await?;
    Ok(())
}

/// Log in with the settings' credentials and land on the dashboard
pub async fn login_to_dashboard(driver: &dyn Driver, settings: &Settings) -> EnsayoResult<()> {
    login_as(driver, &settings.env.username, &settings.env.password).await?;
    DashboardPage::new(driver).is_page_loaded().await?;
    Ok(())
}
