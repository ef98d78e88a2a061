//! Abstract browser driver contract.
//!
//! The `Driver` trait is the capability set the session fixture needs:
//! launchable, configurable for headless mode and download directory, and
//! disposable. Two real-world backends (Chrome, Chromium) sit behind it via
//! [`ChromiumDriver`](crate::chromium::ChromiumDriver); [`MockDriver`]
//! implements the same contract with scripted state for unit tests.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use async_trait::async_trait;

use crate::locator::Locator;
use crate::result::{EnsayoError, EnsayoResult};
use crate::wait::WaitOptions;

/// Environment variable selecting the browser backend, layered on top of
/// the standard test-runner CLI
pub const BACKEND_ENV_VAR: &str = "ENSAYO_BROWSER";

/// Browser backend identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Google Chrome (default)
    #[default]
    Chrome,
    /// Chromium (alternative executable behind the same CDP contract)
    Chromium,
}

impl Backend {
    /// Parse a backend name; unknown names yield `None`
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "chrome" => Some(Self::Chrome),
            "chromium" => Some(Self::Chromium),
            _ => None,
        }
    }

    /// Resolve the backend from [`BACKEND_ENV_VAR`], falling back to the
    /// supplied default when the variable is unset or unrecognized
    #[must_use]
    pub fn from_env_or(default: Self) -> Self {
        std::env::var(BACKEND_ENV_VAR)
            .ok()
            .and_then(|v| Self::parse(&v))
            .unwrap_or(default)
    }

    /// The backend name as passed on the command line
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Chromium => "chromium",
        }
    }

    /// Executable name override for this backend (None = library default
    /// discovery)
    #[must_use]
    pub const fn executable(&self) -> Option<&'static str> {
        match self {
            Self::Chrome => None,
            Self::Chromium => Some("chromium"),
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Browser configuration for driver launch
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Selected backend
    pub backend: Backend,
    /// Run in headless mode
    pub headless: bool,
    /// Window width
    pub window_width: u32,
    /// Window height
    pub window_height: u32,
    /// Dedicated download directory
    pub download_dir: Option<PathBuf>,
    /// Tolerate certificate errors (local test sites)
    pub accept_insecure_certs: bool,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
    /// Browser UI language
    pub lang: String,
    /// Executable path override (None = backend default discovery)
    pub executable: Option<String>,
    /// Default wait options for element preconditions
    pub wait: WaitOptions,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Chrome,
            headless: true,
            window_width: 1920,
            window_height: 1080,
            download_dir: None,
            accept_insecure_certs: true,
            sandbox: true,
            lang: "en".to_string(),
            executable: None,
            wait: WaitOptions::default(),
        }
    }
}

impl DriverConfig {
    /// Create new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend
    #[must_use]
    pub const fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set window dimensions
    #[must_use]
    pub const fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Set the dedicated download directory
    #[must_use]
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = Some(dir.into());
        self
    }

    /// Disable the sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Set the executable path override
    #[must_use]
    pub fn with_executable(mut self, path: impl Into<String>) -> Self {
        self.executable = Some(path.into());
        self
    }

    /// Set the default wait options
    #[must_use]
    pub const fn with_wait(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }
}

/// Screenshot data with capture time
#[derive(Debug, Clone)]
pub struct Screenshot {
    /// Raw PNG data
    pub data: Vec<u8>,
    /// Timestamp when the screenshot was taken
    pub taken_at: SystemTime,
}

impl Screenshot {
    /// Create a new screenshot
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            taken_at: SystemTime::now(),
        }
    }

    /// Size in bytes
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Check whether the capture produced any data
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.data.is_empty()
    }

    /// Write the PNG to disk
    pub fn save(&self, path: &Path) -> EnsayoResult<()> {
        std::fs::write(path, &self.data)?;
        Ok(())
    }
}

/// Abstract driver contract for browser automation.
///
/// All operations act on the single page owned by the driver. Methods do
/// not wait for element preconditions; bounded waits live in
/// [`crate::wait`] and are applied by the page objects before acting.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Navigate the page to a URL
    async fn goto(&self, url: &str) -> EnsayoResult<()>;

    /// Evaluate a JavaScript expression in the page, returning its value
    async fn eval(&self, script: &str) -> EnsayoResult<serde_json::Value>;

    /// Dispatch a click on the located element
    async fn click(&self, locator: &Locator) -> EnsayoResult<()>;

    /// Send text into the located element without clearing existing content
    async fn type_text(&self, locator: &Locator, text: &str) -> EnsayoResult<()>;

    /// Clear the located element's value
    async fn clear_text(&self, locator: &Locator) -> EnsayoResult<()>;

    /// Visible text of the located element
    async fn text_of(&self, locator: &Locator) -> EnsayoResult<String>;

    /// Number of elements matching the locator
    async fn count(&self, locator: &Locator) -> EnsayoResult<usize>;

    /// Whether the located element is currently visible
    async fn is_visible(&self, locator: &Locator) -> EnsayoResult<bool>;

    /// Whether the located element is currently clickable (visible and
    /// enabled)
    async fn is_clickable(&self, locator: &Locator) -> EnsayoResult<bool>;

    /// Take a screenshot of the current page
    async fn screenshot(&self) -> EnsayoResult<Screenshot>;

    /// Default wait options for this driver
    fn wait_options(&self) -> WaitOptions;

    /// Release the browser. Safe to call once; the session fixture
    /// guarantees it is not called twice.
    async fn close(&mut self) -> EnsayoResult<()>;
}

/// Scripted page state behind [`MockDriver`]
#[derive(Debug, Default)]
struct MockState {
    url: String,
    visible: HashSet<String>,
    clickable: HashSet<String>,
    texts: HashMap<String, String>,
    values: HashMap<String, String>,
    counts: HashMap<String, usize>,
    eval_result: Option<serde_json::Value>,
    screenshot: Option<Vec<u8>>,
    history: Vec<String>,
    close_count: usize,
}

/// Inspection handle into a [`MockDriver`]'s state.
///
/// Clones share the underlying state, so a test can keep a handle and
/// observe calls after the driver has been moved into a session.
#[derive(Debug, Clone, Default)]
pub struct MockHandle {
    state: Arc<Mutex<MockState>>,
}

impl MockHandle {
    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Mark a selector as visible (and implicitly present)
    pub fn set_visible(&self, locator: &Locator) {
        let _ = self.lock().visible.insert(locator.selector().raw().to_string());
    }

    /// Mark a selector as clickable (and visible)
    pub fn set_clickable(&self, locator: &Locator) {
        let raw = locator.selector().raw().to_string();
        let mut state = self.lock();
        let _ = state.visible.insert(raw.clone());
        let _ = state.clickable.insert(raw);
    }

    /// Set the visible text for a selector
    pub fn set_text(&self, locator: &Locator, text: impl Into<String>) {
        let _ = self
            .lock()
            .texts
            .insert(locator.selector().raw().to_string(), text.into());
    }

    /// Set the match count for a selector
    pub fn set_count(&self, locator: &Locator, count: usize) {
        let _ = self
            .lock()
            .counts
            .insert(locator.selector().raw().to_string(), count);
    }

    /// Set the value returned by `eval`
    pub fn set_eval_result(&self, value: serde_json::Value) {
        self.lock().eval_result = Some(value);
    }

    /// Set the screenshot bytes returned by the driver
    pub fn set_screenshot(&self, data: Vec<u8>) {
        self.lock().screenshot = Some(data);
    }

    /// The value accumulated in an input by `type_text`/`clear_text`
    #[must_use]
    pub fn value_of(&self, locator: &Locator) -> Option<String> {
        self.lock().values.get(locator.selector().raw()).cloned()
    }

    /// Recorded call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.lock().history.clone()
    }

    /// Check if an operation was recorded
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.lock().history.iter().any(|c| c.starts_with(prefix))
    }

    /// Number of times `close` was invoked
    #[must_use]
    pub fn close_count(&self) -> usize {
        self.lock().close_count
    }

    /// Current URL
    #[must_use]
    pub fn current_url(&self) -> String {
        self.lock().url.clone()
    }
}

/// Mock driver for unit testing the suite without a browser
#[derive(Debug, Default)]
pub struct MockDriver {
    handle: MockHandle,
    wait: WaitOptions,
}

impl MockDriver {
    /// Create a new mock driver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock driver with fast polling, suited to unit tests
    #[must_use]
    pub fn with_wait(wait: WaitOptions) -> Self {
        Self {
            handle: MockHandle::default(),
            wait,
        }
    }

    /// Get an inspection handle sharing this driver's state
    #[must_use]
    pub fn handle(&self) -> MockHandle {
        self.handle.clone()
    }

    fn record(&self, entry: String) {
        self.handle.lock().history.push(entry);
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn goto(&self, url: &str) -> EnsayoResult<()> {
        self.record(format!("goto:{url}"));
        self.handle.lock().url = url.to_string();
        Ok(())
    }

    async fn eval(&self, script: &str) -> EnsayoResult<serde_json::Value> {
        self.record(format!("eval:{script}"));
        Ok(self
            .handle
            .lock()
            .eval_result
            .clone()
            .unwrap_or(serde_json::Value::Null))
    }

    async fn click(&self, locator: &Locator) -> EnsayoResult<()> {
        let raw = locator.selector().raw().to_string();
        self.record(format!("click:{raw}"));
        if self.handle.lock().clickable.contains(&raw) {
            Ok(())
        } else {
            Err(EnsayoError::Input {
                message: format!("element not clickable: {locator}"),
            })
        }
    }

    async fn type_text(&self, locator: &Locator, text: &str) -> EnsayoResult<()> {
        let raw = locator.selector().raw().to_string();
        self.record(format!("type:{raw}:{text}"));
        let mut state = self.handle.lock();
        // Append semantics: keystrokes land after any existing content
        state.values.entry(raw).or_default().push_str(text);
        Ok(())
    }

    async fn clear_text(&self, locator: &Locator) -> EnsayoResult<()> {
        let raw = locator.selector().raw().to_string();
        self.record(format!("clear:{raw}"));
        let _ = self.handle.lock().values.insert(raw, String::new());
        Ok(())
    }

    async fn text_of(&self, locator: &Locator) -> EnsayoResult<String> {
        let raw = locator.selector().raw().to_string();
        self.record(format!("text:{raw}"));
        self.handle
            .lock()
            .texts
            .get(&raw)
            .cloned()
            .ok_or_else(|| EnsayoError::Page {
                message: format!("no element for {locator}"),
            })
    }

    async fn count(&self, locator: &Locator) -> EnsayoResult<usize> {
        let raw = locator.selector().raw().to_string();
        self.record(format!("count:{raw}"));
        Ok(self.handle.lock().counts.get(&raw).copied().unwrap_or(0))
    }

    async fn is_visible(&self, locator: &Locator) -> EnsayoResult<bool> {
        Ok(self
            .handle
            .lock()
            .visible
            .contains(locator.selector().raw()))
    }

    async fn is_clickable(&self, locator: &Locator) -> EnsayoResult<bool> {
        Ok(self
            .handle
            .lock()
            .clickable
            .contains(locator.selector().raw()))
    }

    async fn screenshot(&self) -> EnsayoResult<Screenshot> {
        self.record("screenshot".to_string());
        let data = self
            .handle
            .lock()
            .screenshot
            .clone()
            .ok_or_else(|| EnsayoError::Screenshot {
                message: "no mock screenshot set".to_string(),
            })?;
        Ok(Screenshot::new(data))
    }

    fn wait_options(&self) -> WaitOptions {
        self.wait.clone()
    }

    async fn close(&mut self) -> EnsayoResult<()> {
        self.record("close".to_string());
        self.handle.lock().close_count += 1;
        Ok(())
    }
}
