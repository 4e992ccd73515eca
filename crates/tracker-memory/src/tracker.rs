use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;

use railyard_tracker::{
    NewRun, ProjectId, ResultsForCases, Run, RunId, Suite, SuiteId, TrackerError,
};

use crate::store::{Call, Operation, RecordedRun, TrackerStore};

#[derive(Debug, Clone)]
pub struct MemoryTrackerConfig {
    /// Id handed to the first created run; later runs count up from it.
    pub first_run_id: u64,
}

impl Default for MemoryTrackerConfig {
    fn default() -> Self {
        Self { first_run_id: 1 }
    }
}

/// Tracker backend that keeps suites and runs in process memory and records
/// every call. Failures and latency can be injected per suite.
pub struct MemoryTracker {
    store: Mutex<TrackerStore>,
}

impl MemoryTracker {
    #[must_use]
    pub fn new(config: MemoryTrackerConfig) -> Self {
        Self {
            store: Mutex::new(TrackerStore::new(config.first_run_id)),
        }
    }

    /// Seed a suite so `get_suite` can resolve it.
    #[must_use]
    pub fn with_suite(mut self, suite_id: SuiteId, name: impl Into<String>) -> Self {
        self.store.get_mut().suites.insert(
            suite_id,
            Suite {
                id: suite_id,
                name: name.into(),
                description: None,
                project_id: None,
            },
        );
        self
    }

    #[must_use]
    pub fn fail_get_suite(self, suite_id: SuiteId) -> Self {
        self.fail_on(Operation::GetSuite, suite_id)
    }

    #[must_use]
    pub fn fail_add_run(self, suite_id: SuiteId) -> Self {
        self.fail_on(Operation::AddRun, suite_id)
    }

    #[must_use]
    pub fn fail_add_results(self, suite_id: SuiteId) -> Self {
        self.fail_on(Operation::AddResults, suite_id)
    }

    #[must_use]
    pub fn fail_close_run(self, suite_id: SuiteId) -> Self {
        self.fail_on(Operation::CloseRun, suite_id)
    }

    /// Make `op` reject for every call that belongs to `suite_id`.
    #[must_use]
    pub fn fail_on(mut self, op: Operation, suite_id: SuiteId) -> Self {
        self.store
            .get_mut()
            .failures
            .insert((op, suite_id), format!("injected {op:?} failure for suite {suite_id}"));
        self
    }

    /// Hold the suite-metadata fetch for `suite_id` for `delay`.
    #[must_use]
    pub fn delay_suite(mut self, suite_id: SuiteId, delay: Duration) -> Self {
        self.store.get_mut().delays.insert(suite_id, delay);
        self
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.store.lock().await.calls.clone()
    }

    /// Number of recorded calls of one kind.
    pub async fn count(&self, op: Operation) -> usize {
        self.store
            .lock()
            .await
            .calls
            .iter()
            .filter(|call| {
                matches!(
                    (op, call),
                    (Operation::GetSuite, Call::GetSuite(_))
                        | (Operation::AddRun, Call::AddRun { .. })
                        | (Operation::AddResults, Call::AddResults { .. })
                        | (Operation::CloseRun, Call::CloseRun(_))
                )
            })
            .count()
    }

    /// Successfully created runs, ordered by id.
    pub async fn runs(&self) -> Vec<RecordedRun> {
        self.store.lock().await.runs.values().cloned().collect()
    }

    /// The run created for `suite_id`, if any. When several were created the
    /// most recent one is returned.
    pub async fn run_for_suite(&self, suite_id: SuiteId) -> Option<RecordedRun> {
        self.store
            .lock()
            .await
            .runs
            .values()
            .rev()
            .find(|run| run.request.suite_id == suite_id)
            .cloned()
    }

    pub async fn closed_runs(&self) -> Vec<RunId> {
        self.store
            .lock()
            .await
            .runs
            .values()
            .filter(|run| run.closed)
            .map(|run| run.id)
            .collect()
    }
}

impl Default for MemoryTracker {
    fn default() -> Self {
        Self::new(MemoryTrackerConfig::default())
    }
}

#[async_trait]
impl railyard_tracker::TrackerApi for MemoryTracker {
    async fn get_suite(&self, suite_id: SuiteId) -> Result<Suite, TrackerError> {
        let delay = {
            let mut store = self.store.lock().await;
            store.calls.push(Call::GetSuite(suite_id));
            store.delays.get(&suite_id).copied()
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let store = self.store.lock().await;
        if let Some(message) = store.injected_failure(Operation::GetSuite, suite_id) {
            return Err(TrackerError::Connection(message));
        }
        store
            .suites
            .get(&suite_id)
            .cloned()
            .ok_or_else(|| TrackerError::NotFound(format!("suite {suite_id}")))
    }

    async fn add_run(&self, project_id: ProjectId, run: &NewRun) -> Result<Run, TrackerError> {
        let mut store = self.store.lock().await;
        store.calls.push(Call::AddRun {
            project_id,
            run: run.clone(),
        });

        if let Some(message) = store.injected_failure(Operation::AddRun, run.suite_id) {
            return Err(TrackerError::Api {
                status: 400,
                message,
            });
        }
        if !store.suites.contains_key(&run.suite_id) {
            return Err(TrackerError::NotFound(format!("suite {}", run.suite_id)));
        }

        let id = RunId::new(store.next_run_id)?;
        store.next_run_id += 1;
        store.runs.insert(
            id,
            RecordedRun {
                id,
                project_id,
                request: run.clone(),
                results: Vec::new(),
                closed: false,
            },
        );
        tracing::debug!(run_id = %id, suite_id = %run.suite_id, "memory tracker created run");

        Ok(Run {
            id,
            name: Some(run.name.clone()),
            suite_id: Some(run.suite_id),
            url: None,
        })
    }

    async fn add_results_for_cases(
        &self,
        run_id: RunId,
        results: &ResultsForCases,
    ) -> Result<(), TrackerError> {
        let mut store = self.store.lock().await;
        store.calls.push(Call::AddResults {
            run_id,
            results: results.clone(),
        });

        let Some(suite_id) = store.suite_of_run(run_id) else {
            return Err(TrackerError::NotFound(format!("run {run_id}")));
        };
        if let Some(message) = store.injected_failure(Operation::AddResults, suite_id) {
            return Err(TrackerError::Api {
                status: 500,
                message,
            });
        }

        let Some(run) = store.runs.get_mut(&run_id) else {
            return Err(TrackerError::NotFound(format!("run {run_id}")));
        };
        if run.closed {
            return Err(TrackerError::Api {
                status: 400,
                message: format!("run {run_id} is already closed"),
            });
        }
        run.results.extend(results.results.iter().cloned());
        Ok(())
    }

    async fn close_run(&self, run_id: RunId) -> Result<(), TrackerError> {
        let mut store = self.store.lock().await;
        store.calls.push(Call::CloseRun(run_id));

        let Some(suite_id) = store.suite_of_run(run_id) else {
            return Err(TrackerError::NotFound(format!("run {run_id}")));
        };
        if let Some(message) = store.injected_failure(Operation::CloseRun, suite_id) {
            return Err(TrackerError::Api {
                status: 500,
                message,
            });
        }

        let Some(run) = store.runs.get_mut(&run_id) else {
            return Err(TrackerError::NotFound(format!("run {run_id}")));
        };
        if run.closed {
            return Err(TrackerError::Api {
                status: 400,
                message: format!("run {run_id} is already closed"),
            });
        }
        run.closed = true;
        Ok(())
    }
}
