//! Performance counters
//!
//! Running totals over every call dispatched by the pipeline.

use std::sync::Mutex;
use std::time::Duration;

use serde::Serialize;

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    requests: u64,
    total_response_time: Duration,
    errors: u64,
}

/// Snapshot of the counters with derived figures
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub requests: u64,
    pub total_response_time_ms: f64,
    pub errors: u64,
    /// Mean response time in milliseconds; 0 when nothing was recorded
    pub average_response_time_ms: f64,
    /// Fraction of failed calls; 0 when nothing was recorded
    pub error_rate: f64,
}

/// Thread-safe request counters
#[derive(Debug, Default)]
pub struct MetricsRecorder {
    counters: Mutex<Counters>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one completed call
    pub fn record(&self, elapsed: Duration, failed: bool) {
        let mut counters = self.counters.lock().unwrap();
        counters.requests += 1;
        counters.total_response_time += elapsed;
        if failed {
            counters.errors += 1;
        }
    }

    pub fn snapshot(&self) -> PerformanceMetrics {
        let counters = *self.counters.lock().unwrap();
        let total_ms = counters.total_response_time.as_secs_f64() * 1000.0;

        let (average, error_rate) = if counters.requests == 0 {
            (0.0, 0.0)
        } else {
            let requests = counters.requests as f64;
            (total_ms / requests, counters.errors as f64 / requests)
        };

        PerformanceMetrics {
            requests: counters.requests,
            total_response_time_ms: total_ms,
            errors: counters.errors,
            average_response_time_ms: average,
            error_rate,
        }
    }

    pub fn reset(&self) {
        *self.counters.lock().unwrap() = Counters::default();
    }
}
