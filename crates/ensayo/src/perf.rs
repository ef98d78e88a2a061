//! Timing instrumentation for UI interactions.
//!
//! [`measure`] wraps a single named interaction: it records wall-clock
//! duration and, on success, extracts the browser's performance-timing
//! fields and heap usage. Failures during the action or the extraction are
//! caught and folded into the measurement, one structured line is emitted
//! either way, and only then is the failure re-surfaced to the caller —
//! the wrapper reports first and never silently swallows a failure.

use std::future::Future;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::driver::Driver;
use crate::result::{EnsayoError, EnsayoResult};

/// JavaScript extracting the performance-timing fields in one evaluation
pub const TIMING_SCRIPT: &str = "(() => { \
    const t = window.performance.timing; \
    const m = window.performance.memory; \
    return { \
        navigationStart: t.navigationStart, \
        responseStart: t.responseStart, \
        domComplete: t.domComplete, \
        fetchStart: t.fetchStart, \
        requestStart: t.requestStart, \
        loadEventStart: t.loadEventStart, \
        responseEnd: t.responseEnd, \
        usedJsHeapSize: m ? m.usedJSHeapSize : 0 \
    }; })()";

/// Raw fields read from `window.performance` (epoch milliseconds)
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTiming {
    /// Navigation start
    pub navigation_start: i64,
    /// First byte of the response
    pub response_start: i64,
    /// DOM complete
    pub dom_complete: i64,
    /// Fetch start
    pub fetch_start: i64,
    /// Request start
    pub request_start: i64,
    /// Load event start
    pub load_event_start: i64,
    /// Response end
    pub response_end: i64,
    /// Used JS heap size in bytes
    pub used_js_heap_size: u64,
}

/// Derived timing intervals in milliseconds.
///
/// Every interval is clamped at zero: skewed browser clocks can order the
/// raw fields inconsistently, and a negative duration is never reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Intervals {
    /// Time from navigation start to first response byte
    pub backend_ms: u64,
    /// Render time from first response byte to DOM complete
    pub frontend_ms: u64,
    /// Network latency (fetch start to first response byte)
    pub latency_ms: u64,
    /// Server response time (request start to first response byte)
    pub server_response_ms: u64,
    /// Full page-load time (navigation start to load event)
    pub page_load_ms: u64,
    /// Transfer time (first response byte to response end)
    pub transfer_ms: u64,
}

impl Intervals {
    /// Derive the intervals from raw performance-timing fields
    #[must_use]
    pub fn derive(raw: &RawTiming) -> Self {
        fn span(end: i64, start: i64) -> u64 {
            (end - start).max(0) as u64
        }

        Self {
            backend_ms: span(raw.response_start, raw.navigation_start),
            frontend_ms: span(raw.dom_complete, raw.response_start),
            latency_ms: span(raw.response_start, raw.fetch_start),
            server_response_ms: span(raw.response_start, raw.request_start),
            page_load_ms: span(raw.load_event_start, raw.navigation_start),
            transfer_ms: span(raw.response_end, raw.response_start),
        }
    }
}

/// One measured interaction
#[derive(Debug, Clone, Serialize)]
pub struct PerfMeasurement {
    /// Interaction label
    pub interaction: String,
    /// Measurement timestamp (epoch milliseconds)
    pub timestamp_ms: i64,
    /// Wall-clock duration of the wrapped action
    pub duration_ms: u64,
    /// Used JS heap in megabytes, rounded to two decimals
    pub memory_mb: f64,
    /// Whether the action and the extraction both succeeded
    pub success: bool,
    /// Error message when `success` is false
    pub error: Option<String>,
    /// Derived timing intervals
    #[serde(flatten)]
    pub intervals: Intervals,
}

async fn collect_timing(driver: &dyn Driver) -> EnsayoResult<RawTiming> {
    let value = driver.eval(TIMING_SCRIPT).await?;
    serde_json::from_value(value).map_err(|e| EnsayoError::Script {
        message: format!("performance timing extraction: {e}"),
    })
}

/// Run `action` under the named interaction, emit one structured timing
/// line, and re-surface any failure after reporting it.
pub async fn measure<F>(
    driver: &dyn Driver,
    interaction: &str,
    action: F,
) -> EnsayoResult<PerfMeasurement>
where
    F: Future<Output = EnsayoResult<()>> + Send,
{
    let start = Instant::now();
    let mut raw = RawTiming::default();
    let mut error: Option<String> = None;

    match action.await {
        Ok(()) => match collect_timing(driver).await {
            Ok(timing) => raw = timing,
            Err(e) => error = Some(format!("Failed measure: {interaction} - {}", e.kind())),
        },
        Err(e) => error = Some(format!("Failed measure: {interaction} - {}", e.kind())),
    }

    let duration_ms = start.elapsed().as_millis() as u64;
    let memory_mb = (raw.used_js_heap_size as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0;
    let success = error.is_none();
    let measurement = PerfMeasurement {
        interaction: interaction.to_string(),
        timestamp_ms: chrono::Utc::now().timestamp_millis(),
        duration_ms,
        memory_mb,
        success,
        error: error.clone(),
        intervals: Intervals::derive(&raw),
    };

    tracing::info!(
        interaction = %measurement.interaction,
        timestamp_ms = measurement.timestamp_ms,
        duration_ms = measurement.duration_ms,
        memory_mb = measurement.memory_mb,
        success = measurement.success,
        error = measurement.error.as_deref().unwrap_or("Success"),
        backend_ms = measurement.intervals.backend_ms,
        frontend_ms = measurement.intervals.frontend_ms,
        latency_ms = measurement.intervals.latency_ms,
        server_response_ms = measurement.intervals.server_response_ms,
        page_load_ms = measurement.intervals.page_load_ms,
        transfer_ms = measurement.intervals.transfer_ms,
        "interaction timing"
    );

    match error {
        None => Ok(measurement),
        Some(message) => Err(EnsayoError::Interaction {
            interaction: interaction.to_string(),
            message,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::driver::MockDriver;

    fn timing_json() -> serde_json::Value {
        serde_json::json!({
            "navigationStart": 1_000,
            "responseStart": 1_200,
            "domComplete": 1_900,
            "fetchStart": 1_050,
            "requestStart": 1_100,
            "loadEventStart": 2_000,
            "responseEnd": 1_400,
            "usedJsHeapSize": 8 * 1024 * 1024,
        })
    }

    mod interval_tests {
        use super::*;

        #[test]
        fn test_derive_consistent_fields() {
            let raw: RawTiming = serde_json::from_value(timing_json()).unwrap();
            let intervals = Intervals::derive(&raw);
            assert_eq!(intervals.backend_ms, 200);
            assert_eq!(intervals.frontend_ms, 700);
            assert_eq!(intervals.latency_ms, 150);
            assert_eq!(intervals.server_response_ms, 100);
            assert_eq!(intervals.page_load_ms, 1_000);
            assert_eq!(intervals.transfer_ms, 200);
        }

        #[test]
        fn test_skewed_clock_clamps_at_zero() {
            let raw = RawTiming {
                navigation_start: 2_000,
                response_start: 1_000,
                ..RawTiming::default()
            };
            let intervals = Intervals::derive(&raw);
            assert_eq!(intervals.backend_ms, 0);
            assert_eq!(intervals.transfer_ms, 0);
        }

        #[test]
        fn test_zeroed_fields_yield_zero_intervals() {
            assert_eq!(Intervals::derive(&RawTiming::default()), Intervals::default());
        }
    }

    mod measure_tests {
        use super::*;

        #[tokio::test]
        async fn test_successful_action_yields_measurement() {
            let driver = MockDriver::new();
            driver.handle().set_eval_result(timing_json());

            let measurement = measure(&driver, "submit form", async { Ok(()) })
                .await
                .unwrap();
            assert!(measurement.success);
            assert!(measurement.error.is_none());
            assert_eq!(measurement.intervals.backend_ms, 200);
            assert!((measurement.memory_mb - 8.0).abs() < f64::EPSILON);
        }

        #[tokio::test]
        async fn test_failing_action_reports_then_fails() {
            let driver = MockDriver::new();
            driver.handle().set_eval_result(timing_json());

            let err = measure(&driver, "open page", async {
                Err(EnsayoError::Timeout {
                    ms: 10,
                    condition: "visible css `#x`".to_string(),
                })
            })
            .await
            .unwrap_err();

            match err {
                EnsayoError::Interaction {
                    interaction,
                    message,
                } => {
                    assert_eq!(interaction, "open page");
                    assert_eq!(message, "Failed measure: open page - Timeout");
                }
                other => panic!("expected interaction error, got {other}"),
            }
        }

        #[tokio::test]
        async fn test_extraction_failure_is_caught_and_reported() {
            // Mock eval returns null: the action succeeds but the timing
            // extraction cannot deserialize, which must surface as a
            // reported failure rather than a raw serde error
            let driver = MockDriver::new();

            let err = measure(&driver, "login", async { Ok(()) }).await.unwrap_err();
            match err {
                EnsayoError::Interaction { message, .. } => {
                    assert_eq!(message, "Failed measure: login - Script");
                }
                other => panic!("expected interaction error, got {other}"),
            }
        }
    }
}
