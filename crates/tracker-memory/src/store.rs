use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use railyard_tracker::{CaseResult, NewRun, ProjectId, ResultsForCases, RunId, Suite, SuiteId};

/// The four remote operations, used to target injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetSuite,
    AddRun,
    AddResults,
    CloseRun,
}

/// One call made against the tracker, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetSuite(SuiteId),
    AddRun { project_id: ProjectId, run: NewRun },
    AddResults { run_id: RunId, results: ResultsForCases },
    CloseRun(RunId),
}

/// A run as the memory backend holds it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRun {
    pub id: RunId,
    pub project_id: ProjectId,
    pub request: NewRun,
    pub results: Vec<CaseResult>,
    pub closed: bool,
}

pub(crate) struct TrackerStore {
    pub suites: HashMap<SuiteId, Suite>,
    pub runs: BTreeMap<RunId, RecordedRun>,
    pub calls: Vec<Call>,
    /// Failures keyed by the suite a call belongs to. Run-scoped calls are
    /// resolved to their suite through the run's creation request.
    pub failures: HashMap<(Operation, SuiteId), String>,
    pub delays: HashMap<SuiteId, Duration>,
    pub next_run_id: u64,
}

impl TrackerStore {
    pub fn new(first_run_id: u64) -> Self {
        Self {
            suites: HashMap::new(),
            runs: BTreeMap::new(),
            calls: Vec::new(),
            failures: HashMap::new(),
            delays: HashMap::new(),
            next_run_id: first_run_id.max(1),
        }
    }

    pub fn suite_of_run(&self, run_id: RunId) -> Option<SuiteId> {
        self.runs.get(&run_id).map(|run| run.request.suite_id)
    }

    pub fn injected_failure(&self, op: Operation, suite_id: SuiteId) -> Option<String> {
        self.failures.get(&(op, suite_id)).cloned()
    }
}
