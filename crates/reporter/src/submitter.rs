use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone};
use tokio::task::JoinHandle;

use railyard_results::{RunAggregate, SuiteAccumulator};
use railyard_tracker::{NewRun, ProjectId, RunId, SuiteId, TrackerApi};

use crate::error::SubmitError;
use crate::run_name::{format_timestamp, run_name};

/// Creates, fills and closes one tracker run per suite.
pub struct Submitter {
    api: Arc<dyn TrackerApi>,
    project_id: ProjectId,
}

impl Submitter {
    pub fn new(api: Arc<dyn TrackerApi>, project_id: ProjectId) -> Self {
        Self { api, project_id }
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Start one pipeline per suite, stamped with the current local time.
    pub fn dispatch(&self, aggregate: RunAggregate) -> SubmissionHandle {
        self.dispatch_at(aggregate, &Local::now())
    }

    /// Start one pipeline per suite. Every run of this dispatch shares the
    /// timestamp in its name.
    ///
    /// Must be called from within a tokio runtime. Pipelines run
    /// concurrently; the returned handle decides whether anyone waits.
    pub fn dispatch_at<Tz: TimeZone>(
        &self,
        aggregate: RunAggregate,
        started_at: &DateTime<Tz>,
    ) -> SubmissionHandle
    where
        Tz::Offset: std::fmt::Display,
    {
        let timestamp = format_timestamp(started_at);

        let tasks = aggregate
            .into_suites()
            .map(|suite| {
                let suite_id = suite.suite_id;
                let pipeline = SuitePipeline {
                    api: self.api.clone(),
                    project_id: self.project_id,
                    timestamp: timestamp.clone(),
                };
                let handle = tokio::spawn(async move {
                    let result = pipeline.run(suite).await;
                    if let Err(e) = &result {
                        tracing::error!(suite_id = %suite_id, error = %e, "suite submission failed");
                    }
                    result
                });
                (suite_id, handle)
            })
            .collect();

        SubmissionHandle { tasks }
    }
}

struct SuitePipeline {
    api: Arc<dyn TrackerApi>,
    project_id: ProjectId,
    timestamp: String,
}

impl SuitePipeline {
    /// Fetch suite → create run → add results → close run. A stage only runs
    /// once every stage before it succeeded.
    async fn run(self, suite: SuiteAccumulator) -> Result<RunId, SubmitError> {
        let suite_id = suite.suite_id;
        let (case_ids, results) = suite.into_parts();

        let meta = self
            .api
            .get_suite(suite_id)
            .await
            .map_err(|source| SubmitError::FetchSuite { suite_id, source })?;

        let name = run_name(&meta.name, &self.timestamp);
        let case_count = case_ids.len();
        let run = self
            .api
            .add_run(self.project_id, &NewRun::for_cases(suite_id, &name, case_ids))
            .await
            .map_err(|source| SubmitError::CreateRun { suite_id, source })?;
        let run_id = run.id;
        tracing::info!(suite_id = %suite_id, run_id = %run_id, case_count, "created test run: {name}");

        self.api
            .add_results_for_cases(run_id, &results)
            .await
            .map_err(|source| SubmitError::AddResults {
                suite_id,
                run_id,
                source,
            })?;

        self.api
            .close_run(run_id)
            .await
            .map_err(|source| SubmitError::CloseRun {
                suite_id,
                run_id,
                source,
            })?;

        tracing::info!(
            suite_id = %suite_id,
            run_id = %run_id,
            results = results.results.len(),
            "added test results and closed test run"
        );
        Ok(run_id)
    }
}

/// In-flight suite pipelines of one dispatch.
#[must_use = "pipelines keep running when dropped; call `wait` or `detach` explicitly"]
pub struct SubmissionHandle {
    tasks: Vec<(SuiteId, JoinHandle<Result<RunId, SubmitError>>)>,
}

impl SubmissionHandle {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn suite_ids(&self) -> Vec<SuiteId> {
        self.tasks.iter().map(|(id, _)| *id).collect()
    }

    /// Wait for every pipeline and collect their outcomes in suite order.
    pub async fn wait(self) -> SubmissionReport {
        let mut outcomes = Vec::with_capacity(self.tasks.len());
        for (suite_id, handle) in self.tasks {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(suite_id = %suite_id, error = %e, "suite submission task aborted");
                    Err(SubmitError::Task {
                        suite_id,
                        message: e.to_string(),
                    })
                }
            };
            outcomes.push(SuiteOutcome { suite_id, result });
        }
        SubmissionReport { outcomes }
    }

    /// Let the pipelines finish on their own. Nothing observes their outcome
    /// beyond the log, and they are cut short if the runtime shuts down first.
    pub fn detach(self) {
        tracing::debug!(suites = self.tasks.len(), "submission detached");
    }
}

#[derive(Debug)]
pub struct SuiteOutcome {
    pub suite_id: SuiteId,
    pub result: Result<RunId, SubmitError>,
}

#[derive(Debug, Default)]
pub struct SubmissionReport {
    pub outcomes: Vec<SuiteOutcome>,
}

impl SubmissionReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn outcome(&self, suite_id: SuiteId) -> Option<&SuiteOutcome> {
        self.outcomes.iter().find(|o| o.suite_id == suite_id)
    }

    pub fn errors(&self) -> impl Iterator<Item = &SubmitError> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }
}
