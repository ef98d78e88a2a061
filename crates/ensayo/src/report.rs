//! Failure reporting with screenshot capture.
//!
//! Each test records an outcome per phase (setup, call, teardown). After
//! every test the reporter inspects the record: a failed setup is only
//! logged, a failed call after a successful setup produces one timestamped
//! screenshot in a dated results subdirectory, and a passing test leaves
//! no artifact.

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::driver::Driver;
use crate::result::EnsayoResult;

/// Test execution phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fixture setup
    Setup,
    /// Test body
    Call,
    /// Fixture teardown
    Teardown,
}

/// Outcome of one phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOutcome {
    /// Phase completed
    Passed,
    /// Phase raised an error
    Failed,
}

/// Per-test record of phase outcomes
#[derive(Debug, Clone)]
pub struct PhaseRecord {
    test_name: String,
    setup: Option<PhaseOutcome>,
    call: Option<PhaseOutcome>,
    teardown: Option<PhaseOutcome>,
}

impl PhaseRecord {
    /// Create an empty record for a named test
    #[must_use]
    pub fn new(test_name: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            setup: None,
            call: None,
            teardown: None,
        }
    }

    /// Record the outcome of a phase
    pub fn record(&mut self, phase: Phase, outcome: PhaseOutcome) {
        match phase {
            Phase::Setup => self.setup = Some(outcome),
            Phase::Call => self.call = Some(outcome),
            Phase::Teardown => self.teardown = Some(outcome),
        }
    }

    /// The recorded outcome of a phase, if the phase ran
    #[must_use]
    pub const fn outcome(&self, phase: Phase) -> Option<PhaseOutcome> {
        match phase {
            Phase::Setup => self.setup,
            Phase::Call => self.call,
            Phase::Teardown => self.teardown,
        }
    }

    /// Test name the record belongs to
    #[must_use]
    pub fn test_name(&self) -> &str {
        &self.test_name
    }
}

/// Action the reporter takes after a test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportAction {
    /// Test passed (or never ran): no artifact
    Nothing,
    /// Setup failed: log only
    LogOnly,
    /// Setup passed and the test body failed: capture a screenshot
    CaptureScreenshot,
}

/// Decide the report action for a phase record
#[must_use]
pub const fn decide(record: &PhaseRecord) -> ReportAction {
    match (record.setup, record.call) {
        (Some(PhaseOutcome::Failed), _) => ReportAction::LogOnly,
        (Some(PhaseOutcome::Passed), Some(PhaseOutcome::Failed)) => {
            ReportAction::CaptureScreenshot
        }
        _ => ReportAction::Nothing,
    }
}

/// Reporter writing failure screenshots under a results directory
#[derive(Debug, Clone)]
pub struct FailureReporter {
    results_dir: PathBuf,
}

impl FailureReporter {
    /// Create a reporter rooted at the given results directory
    #[must_use]
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: results_dir.into(),
        }
    }

    /// The configured results directory
    #[must_use]
    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// Inspect a finished test's phase record and capture a screenshot if
    /// the transition rule calls for one. Returns the artifact path when a
    /// screenshot was written.
    pub async fn after_test(
        &self,
        record: &PhaseRecord,
        driver: &dyn Driver,
    ) -> EnsayoResult<Option<PathBuf>> {
        match decide(record) {
            ReportAction::Nothing => Ok(None),
            ReportAction::LogOnly => {
                tracing::warn!(test = record.test_name(), "test setup failed");
                Ok(None)
            }
            ReportAction::CaptureScreenshot => {
                let screenshot = driver.screenshot().await?;
                let now = Local::now();
                let dir = self
                    .results_dir
                    .join(format!("Functional_Test_{}", now.format("%Y-%m-%d")));
                std::fs::create_dir_all(&dir)?;
                let path = dir.join(format!(
                    "{}_{}.png",
                    now.format("%H%M%S"),
                    record.test_name()
                ));
                screenshot.save(&path)?;
                tracing::info!(
                    test = record.test_name(),
                    path = %path.display(),
                    "captured failure screenshot"
                );
                Ok(Some(path))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::driver::MockDriver;

    fn record_with(setup: Option<PhaseOutcome>, call: Option<PhaseOutcome>) -> PhaseRecord {
        let mut record = PhaseRecord::new("test_case");
        if let Some(outcome) = setup {
            record.record(Phase::Setup, outcome);
        }
        if let Some(outcome) = call {
            record.record(Phase::Call, outcome);
        }
        record
    }

    mod decide_tests {
        use super::*;

        #[test]
        fn test_setup_failure_logs_only() {
            let record = record_with(Some(PhaseOutcome::Failed), None);
            assert_eq!(decide(&record), ReportAction::LogOnly);
        }

        #[test]
        fn test_setup_failure_wins_over_call_failure() {
            let record = record_with(Some(PhaseOutcome::Failed), Some(PhaseOutcome::Failed));
            assert_eq!(decide(&record), ReportAction::LogOnly);
        }

        #[test]
        fn test_call_failure_captures_screenshot() {
            let record = record_with(Some(PhaseOutcome::Passed), Some(PhaseOutcome::Failed));
            assert_eq!(decide(&record), ReportAction::CaptureScreenshot);
        }

        #[test]
        fn test_all_passed_does_nothing() {
            let record = record_with(Some(PhaseOutcome::Passed), Some(PhaseOutcome::Passed));
            assert_eq!(decide(&record), ReportAction::Nothing);
        }

        #[test]
        fn test_empty_record_does_nothing() {
            let record = record_with(None, None);
            assert_eq!(decide(&record), ReportAction::Nothing);
        }
    }

    mod after_test_tests {
        use super::*;

        #[tokio::test]
        async fn test_call_failure_writes_one_artifact() {
            let results = tempfile::tempdir().unwrap();
            let reporter = FailureReporter::new(results.path());
            let driver = MockDriver::new();
            driver.handle().set_screenshot(vec![0x89, 0x50, 0x4E, 0x47]);

            let record = record_with(Some(PhaseOutcome::Passed), Some(PhaseOutcome::Failed));
            let path = reporter.after_test(&record, &driver).await.unwrap().unwrap();

            assert!(path.exists());
            assert!(path
                .parent()
                .unwrap()
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("Functional_Test_"));
            assert!(path
                .file_name()
                .unwrap()
                .to_string_lossy()
                .ends_with("_test_case.png"));

            let artifacts: Vec<_> = std::fs::read_dir(path.parent().unwrap())
                .unwrap()
                .collect();
            assert_eq!(artifacts.len(), 1);
        }

        #[tokio::test]
        async fn test_setup_failure_writes_nothing() {
            let results = tempfile::tempdir().unwrap();
            let reporter = FailureReporter::new(results.path());
            let driver = MockDriver::new();
            driver.handle().set_screenshot(vec![1]);

            let record = record_with(Some(PhaseOutcome::Failed), Some(PhaseOutcome::Failed));
            let path = reporter.after_test(&record, &driver).await.unwrap();

            assert!(path.is_none());
            assert_eq!(std::fs::read_dir(results.path()).unwrap().count(), 0);
            assert!(!driver.handle().was_called("screenshot"));
        }

        #[tokio::test]
        async fn test_passing_test_writes_nothing() {
            let results = tempfile::tempdir().unwrap();
            let reporter = FailureReporter::new(results.path());
            let driver = MockDriver::new();

            let record = record_with(Some(PhaseOutcome::Passed), Some(PhaseOutcome::Passed));
            let path = reporter.after_test(&record, &driver).await.unwrap();

            assert!(path.is_none());
            assert_eq!(std::fs::read_dir(results.path()).unwrap().count(), 0);
        }
    }
}
