use std::sync::Arc;

use railyard_results::{AggregatedResults, Classifier, RunAggregate};
use railyard_tracker::TrackerApi;

use crate::config::ReporterConfig;
use crate::submitter::{SubmissionHandle, Submitter};

/// End-of-run hook: classifies a finished run and submits it, one tracker
/// run per suite.
///
/// Holds no per-run state; every call to [`Reporter::on_run_complete`]
/// starts from fresh accumulators and creates new runs.
pub struct Reporter {
    config: ReporterConfig,
    classifier: Classifier,
    submitter: Submitter,
}

impl Reporter {
    pub fn new(config: ReporterConfig, api: Arc<dyn TrackerApi>) -> Self {
        Self {
            classifier: Classifier::new(config.suite_id),
            submitter: Submitter::new(api, config.project_id),
            config,
        }
    }

    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }

    /// Classify every outcome and group the results by suite.
    pub fn collect(&self, results: &AggregatedResults) -> RunAggregate {
        let aggregate = self.classifier.aggregate(results);
        tracing::info!(
            suites = aggregate.len(),
            classified = aggregate.classified,
            ignored = aggregate.ignored,
            abandoned = aggregate.abandoned,
            "classified test results"
        );
        aggregate
    }

    /// Classify the run and start one submission pipeline per suite.
    ///
    /// Failures are logged per suite and never returned here; the handle
    /// lets the caller wait for the pipelines or leave them running.
    pub fn on_run_complete(&self, results: &AggregatedResults) -> SubmissionHandle {
        let aggregate = self.collect(results);
        if aggregate.is_empty() {
            tracing::info!("no reportable test results");
        }
        self.submitter.dispatch(aggregate)
    }
}
