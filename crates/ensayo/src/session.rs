//! Browser session fixture and per-test harness.
//!
//! A [`Session`] owns one browser for the duration of a test: it is
//! launched from injected [`Settings`] with a dedicated temporary download
//! directory and released exactly once at session end regardless of the
//! test outcome. [`run_test`] wraps a test body with phase bookkeeping so
//! the failure reporter runs after every test.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use futures::future::BoxFuture;

use crate::driver::Driver;
#[cfg(feature = "browser")]
use crate::driver::DriverConfig;
use crate::report::{FailureReporter, Phase, PhaseOutcome, PhaseRecord};
use crate::result::EnsayoResult;
#[cfg(not(feature = "browser"))]
use crate::result::EnsayoError;
use crate::settings::Settings;

static TRACING: OnceLock<()> = OnceLock::new();

/// Install the process-wide tracing subscriber once
pub fn init_tracing() {
    let _ = TRACING.get_or_init(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Default results directory for failure screenshots
#[must_use]
pub fn default_results_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("results/screenshots")
}

/// file:// URL of the sample application's entry point
#[must_use]
pub fn local_app_url() -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("site/index.html");
    format!("file://{}", path.display())
}

/// One browser session: settings, a driver, and its download directory
pub struct Session {
    settings: Settings,
    driver: Box<dyn Driver>,
    download_dir: Option<tempfile::TempDir>,
    closed: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("backend", &self.settings.backend)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Launch a browser session from the supplied settings.
    ///
    /// The browser gets a dedicated temporary download directory that is
    /// removed when the session closes.
    #[cfg(feature = "browser")]
    pub async fn start(settings: Settings) -> EnsayoResult<Self> {
        init_tracing();
        let download_dir = tempfile::tempdir()?;
        let config = DriverConfig::new()
            .with_backend(settings.backend)
            .with_headless(settings.headless())
            .with_download_dir(download_dir.path())
            .with_no_sandbox();
        tracing::debug!(backend = %settings.backend, headless = settings.headless(), "launching browser");
        let driver = crate::chromium::ChromiumDriver::launch(config).await?;
        Ok(Self {
            settings,
            driver: Box::new(driver),
            download_dir: Some(download_dir),
            closed: false,
        })
    }

    /// Launch a browser session from the supplied settings.
    #[cfg(not(feature = "browser"))]
    pub async fn start(_settings: Settings) -> EnsayoResult<Self> {
        Err(EnsayoError::Session {
            message: "built without the `browser` feature".to_string(),
        })
    }

    /// Wrap an already-launched driver into a session (used with
    /// [`MockDriver`](crate::driver::MockDriver) in unit tests)
    #[must_use]
    pub fn with_driver(settings: Settings, driver: Box<dyn Driver>) -> Self {
        init_tracing();
        Self {
            settings,
            driver,
            download_dir: None,
            closed: false,
        }
    }

    /// The settings this session was built from
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The shared driver handle page objects borrow
    #[must_use]
    pub fn driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }

    /// The session's dedicated download directory, while open
    #[must_use]
    pub fn download_dir(&self) -> Option<&Path> {
        self.download_dir.as_ref().map(tempfile::TempDir::path)
    }

    /// Release the browser and remove the download directory.
    ///
    /// Idempotent: the browser is quit on the first call only.
    pub async fn close(&mut self) -> EnsayoResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let result = self.driver.close().await;
        drop(self.download_dir.take());
        result
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.closed {
            tracing::warn!("session dropped without close; browser may outlive the test");
        }
    }
}

/// Run a test body inside an existing session with an explicit reporter.
///
/// Records the call phase, always consults the failure reporter, then
/// tears the session down, folding a teardown error into the result.
pub async fn run_test_with_session<F>(
    mut session: Session,
    reporter: &FailureReporter,
    name: &str,
    body: F,
) -> EnsayoResult<()>
where
    F: for<'a> FnOnce(&'a dyn Driver) -> BoxFuture<'a, EnsayoResult<()>>,
{
    let mut record = PhaseRecord::new(name);
    record.record(Phase::Setup, PhaseOutcome::Passed);

    let result = body(session.driver()).await;
    record.record(
        Phase::Call,
        if result.is_ok() {
            PhaseOutcome::Passed
        } else {
            PhaseOutcome::Failed
        },
    );

    if let Err(e) = reporter.after_test(&record, session.driver()).await {
        tracing::warn!(test = name, error = %e, "failure screenshot capture failed");
    }

    let teardown = session.close().await;
    record.record(
        Phase::Teardown,
        if teardown.is_ok() {
            PhaseOutcome::Passed
        } else {
            PhaseOutcome::Failed
        },
    );

    result.and(teardown)
}

/// Launch a session for `settings`, run the test body, report, tear down.
///
/// A setup failure is logged and propagated without reaching the body,
/// matching the reporter's log-only rule for failed setup.
pub async fn run_test<F>(name: &str, settings: Settings, body: F) -> EnsayoResult<()>
where
    F: for<'a> FnOnce(&'a dyn Driver) -> BoxFuture<'a, EnsayoResult<()>>,
{
    init_tracing();
    let session = match Session::start(settings).await {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(test = name, error = %e, "test setup failed");
            return Err(e);
        }
    };
    let reporter = FailureReporter::new(default_results_dir());
    run_test_with_session(session, &reporter, name, body).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::driver::MockDriver;
    use crate::result::EnsayoError;
    use futures::FutureExt;

    fn test_settings() -> Settings {
        Settings::from_yaml(
            "settings:\n  env:\n    username: testuser\n    password: password123\n",
        )
        .unwrap()
    }

    mod session_tests {
        use super::*;

        #[tokio::test]
        async fn test_close_releases_exactly_once() {
            let driver = MockDriver::new();
            let handle = driver.handle();
            let mut session = Session::with_driver(test_settings(), Box::new(driver));

            session.close().await.unwrap();
            session.close().await.unwrap();
            assert_eq!(handle.close_count(), 1);
        }

        #[tokio::test]
        async fn test_settings_are_injected_not_ambient() {
            let session =
                Session::with_driver(test_settings(), Box::new(MockDriver::new()));
            assert_eq!(session.settings().env.username, "testuser");
            assert_eq!(session.settings().env.password, "password123");
        }

        #[test]
        fn test_local_app_url_points_at_entry_point() {
            let url = local_app_url();
            assert!(url.starts_with("file://"));
            assert!(url.ends_with("site/index.html"));
        }
    }

    mod run_test_tests {
        use super::*;

        #[tokio::test]
        async fn test_passing_body_leaves_no_artifact_and_closes_once() {
            let results = tempfile::tempdir().unwrap();
            let reporter = FailureReporter::new(results.path());
            let driver = MockDriver::new();
            let handle = driver.handle();
            let session = Session::with_driver(test_settings(), Box::new(driver));

            run_test_with_session(session, &reporter, "test_pass", |_driver| {
                async { Ok(()) }.boxed()
            })
            .await
            .unwrap();

            assert_eq!(handle.close_count(), 1);
            assert_eq!(std::fs::read_dir(results.path()).unwrap().count(), 0);
        }

        #[tokio::test]
        async fn test_failing_body_captures_artifact_and_still_closes() {
            let results = tempfile::tempdir().unwrap();
            let reporter = FailureReporter::new(results.path());
            let driver = MockDriver::new();
            let handle = driver.handle();
            handle.set_screenshot(vec![0x89, 0x50, 0x4E, 0x47]);
            let session = Session::with_driver(test_settings(), Box::new(driver));

            let err = run_test_with_session(session, &reporter, "test_fail", |_driver| {
                async {
                    Err(EnsayoError::Timeout {
                        ms: 10,
                        condition: "visible css `#dashboard`".to_string(),
                    })
                }
                .boxed()
            })
            .await
            .unwrap_err();

            assert!(matches!(err, EnsayoError::Timeout { .. }));
            assert_eq!(handle.close_count(), 1);

            let dated: Vec<_> = std::fs::read_dir(results.path())
                .unwrap()
                .map(|entry| entry.unwrap().path())
                .collect();
            assert_eq!(dated.len(), 1);
            let artifacts: Vec<_> = std::fs::read_dir(&dated[0])
                .unwrap()
                .map(|entry| entry.unwrap().path())
                .collect();
            assert_eq!(artifacts.len(), 1);
            assert!(artifacts[0]
                .file_name()
                .unwrap()
                .to_string_lossy()
                .ends_with("_test_fail.png"));
        }

        #[tokio::test]
        async fn test_body_sees_the_session_driver() {
            let results = tempfile::tempdir().unwrap();
            let reporter = FailureReporter::new(results.path());
            let driver = MockDriver::new();
            let handle = driver.handle();
            let session = Session::with_driver(test_settings(), Box::new(driver));

            run_test_with_session(session, &reporter, "test_nav", |driver| {
                async move { driver.goto("file:///index.html").await }.boxed()
            })
            .await
            .unwrap();

            assert!(handle.was_called("goto:file:///index.html"));
        }
    }
}
