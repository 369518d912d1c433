//! Application metrics collection.
//!
//! Every event is counted locally (reported by `/health`) and forwarded to
//! the `metrics` facade, which the Prometheus recorder exports at `/metrics`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use serde::Serialize;

/// Metrics collector for the viewer.
#[derive(Debug)]
pub struct MetricsCollector {
    pub parses: AtomicU64,
    pub parse_errors: AtomicU64,
    pub runs: AtomicU64,
    pub run_failures: AtomicU64,
    start_time: Instant,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub parses: u64,
    pub parse_errors: u64,
    pub runs: u64,
    pub run_failures: u64,
    pub uptime_secs: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            parses: AtomicU64::new(0),
            parse_errors: AtomicU64::new(0),
            runs: AtomicU64::new(0),
            run_failures: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a trajectory dump that parsed and grouped successfully.
    pub fn record_parse(&self, source: &'static str) {
        self.parses.fetch_add(1, Ordering::Relaxed);
        counter!("tdump_parse_total", "source" => source).increment(1);
    }

    /// Record a trajectory dump that failed to parse or had nothing to render.
    pub fn record_parse_error(&self, source: &'static str) {
        self.parse_errors.fetch_add(1, Ordering::Relaxed);
        counter!("tdump_parse_errors_total", "source" => source).increment(1);
    }

    /// Record a finished model run.
    pub fn record_run(&self, elapsed: Duration) {
        self.runs.fetch_add(1, Ordering::Relaxed);
        counter!("hysplit_runs_total").increment(1);
        histogram!("hysplit_run_duration_seconds").record(elapsed.as_secs_f64());
    }

    /// Record a model run that did not produce a trajectory dump.
    pub fn record_run_failure(&self, reason: &'static str) {
        self.runs.fetch_add(1, Ordering::Relaxed);
        self.run_failures.fetch_add(1, Ordering::Relaxed);
        counter!("hysplit_runs_total").increment(1);
        counter!("hysplit_run_failures_total", "reason" => reason).increment(1);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            parses: self.parses.load(Ordering::Relaxed),
            parse_errors: self.parse_errors.load(Ordering::Relaxed),
            runs: self.runs.load(Ordering::Relaxed),
            run_failures: self.run_failures.load(Ordering::Relaxed),
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
