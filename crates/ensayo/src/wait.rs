//! Bounded waits for element preconditions.
//!
//! Every wait polls until its condition holds or the deadline passes.
//! Timeout expiry raises a propagating [`EnsayoError::Timeout`]; there are
//! no retries here or anywhere above — a failed wait fails the test.

use std::time::{Duration, Instant};

use crate::driver::Driver;
use crate::locator::Locator;
use crate::result::{EnsayoError, EnsayoResult};

/// Default timeout for wait operations (10 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Options for wait operations
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Element precondition a wait blocks on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// Element is visible
    Visible,
    /// Element is visible and enabled
    Clickable,
}

impl Precondition {
    /// Short name used in timeout errors
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Clickable => "clickable",
        }
    }
}

/// Block until the locator's element satisfies `precondition`, within the
/// locator's own timeout override or the supplied options.
pub async fn wait_until(
    driver: &dyn Driver,
    locator: &Locator,
    precondition: Precondition,
    options: &WaitOptions,
) -> EnsayoResult<()> {
    let timeout = locator.timeout().unwrap_or_else(|| options.timeout());
    let deadline = Instant::now() + timeout;

    loop {
        let satisfied = match precondition {
            Precondition::Visible => driver.is_visible(locator).await?,
            Precondition::Clickable => driver.is_clickable(locator).await?,
        };
        if satisfied {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(EnsayoError::Timeout {
                ms: timeout.as_millis() as u64,
                condition: format!("{} {}", precondition.as_str(), locator),
            });
        }
        tokio::time::sleep(options.poll_interval()).await;
    }
}

/// Block until the locator's element is visible
pub async fn wait_until_visible(
    driver: &dyn Driver,
    locator: &Locator,
    options: &WaitOptions,
) -> EnsayoResult<()> {
    wait_until(driver, locator, Precondition::Visible, options).await
}

/// Block until the locator's element is clickable (visible and enabled)
pub async fn wait_until_clickable(
    driver: &dyn Driver,
    locator: &Locator,
    options: &WaitOptions,
) -> EnsayoResult<()> {
    wait_until(driver, locator, Precondition::Clickable, options).await
}
