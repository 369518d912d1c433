//! Application state for the viewer.

use hysplit_runner::{ControlFile, HysplitRunner, ModelRun, RunnerResult};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::sync::Mutex;

use crate::config::ViewerConfig;
use crate::error::runner_failure_reason;
use crate::metrics::MetricsCollector;

/// Shared application state.
pub struct AppState {
    pub config: ViewerConfig,

    pub runner: HysplitRunner,

    pub metrics: MetricsCollector,

    /// Renders `/metrics`; absent when no recorder was installed (tests).
    pub prometheus: Option<PrometheusHandle>,

    /// Runs share one working directory, so only one may be in flight.
    run_lock: Mutex<()>,
}

impl AppState {
    pub fn new(config: ViewerConfig, prometheus: Option<PrometheusHandle>) -> Self {
        let runner = HysplitRunner::new(config.hysplit.clone());
        Self {
            config,
            runner,
            metrics: MetricsCollector::new(),
            prometheus,
            run_lock: Mutex::new(()),
        }
    }

    /// Run the model, waiting for any run already in progress.
    pub async fn run_model(&self, control: &ControlFile) -> RunnerResult<ModelRun> {
        let _guard = self.run_lock.lock().await;

        match self.runner.run(control).await {
            Ok(run) => {
                self.metrics.record_run(run.elapsed);
                Ok(run)
            }
            Err(e) => {
                // Rejected parameters never reached the model.
                if !e.is_invalid_input() {
                    self.metrics.record_run_failure(runner_failure_reason(&e));
                }
                Err(e)
            }
        }
    }
}
