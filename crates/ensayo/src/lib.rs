//! Ensayo: page-object UI test-automation suite for a sample web app.
//!
//! Ensayo (Spanish: "rehearsal") drives login, CRUD-on-a-list, and
//! form-submission flows of a local sample application through the Chrome
//! DevTools Protocol, with session plumbing for driver lifecycle,
//! screenshot-on-failure, and timing instrumentation.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                     ENSAYO Architecture                        │
//! ├────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐           │
//! │   │ Test Case  │    │ Page       │    │ Headless   │           │
//! │   │ (Rust)     │───►│ Objects    │───►│ Browser    │           │
//! │   │            │    │ + Waits    │    │ (CDP)      │           │
//! │   └────────────┘    └────────────┘    └────────────┘           │
//! │         │                                   ▲                  │
//! │         └── Session fixture ── Reporter ────┘                  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Control flow: test case → page-object action → bounded wait → driver
//! call. Each test owns its page objects and its driver handle; the only
//! shared state is the read-only [`Settings`] value injected into the
//! session.

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

#[cfg(feature = "browser")]
mod chromium;
mod data;
mod driver;
mod locator;
mod pages;
mod perf;
mod report;
mod result;
mod session;
mod settings;
mod wait;

#[cfg(feature = "browser")]
pub use chromium::ChromiumDriver;
pub use data::{load_sheet, reformat_date, sheet_from_yaml, FormRecord};
pub use driver::{
    Backend, Driver, DriverConfig, MockDriver, MockHandle, Screenshot, BACKEND_ENV_VAR,
};
pub use locator::{Locator, Selector};
pub use pages::{BasePage, DashboardPage, FormPage, ItemListPage, LoginPage};
pub use pages::{delete_button, dropdown_option, edit_button, item_entry, radio_option};
pub use perf::{measure, Intervals, PerfMeasurement, RawTiming, TIMING_SCRIPT};
pub use report::{decide, FailureReporter, Phase, PhaseOutcome, PhaseRecord, ReportAction};
pub use result::{EnsayoError, EnsayoResult};
pub use session::{
    default_results_dir, init_tracing, local_app_url, run_test, run_test_with_session, Session,
};
pub use settings::{EnvSettings, Settings};
pub use wait::{
    wait_until, wait_until_clickable, wait_until_visible, Precondition, WaitOptions,
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS,
};
