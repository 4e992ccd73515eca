use async_trait::async_trait;

use crate::error::TrackerError;
use crate::ids::{CaseId, ProjectId, RunId, SuiteId};
use crate::status::StatusId;

/// Remote test-management API. Created once, shared across suite pipelines.
#[async_trait]
pub trait TrackerApi: Send + Sync {
    async fn get_suite(&self, suite_id: SuiteId) -> Result<Suite, TrackerError>;

    async fn add_run(&self, project_id: ProjectId, run: &NewRun) -> Result<Run, TrackerError>;

    async fn add_results_for_cases(
        &self,
        run_id: RunId,
        results: &ResultsForCases,
    ) -> Result<(), TrackerError>;

    async fn close_run(&self, run_id: RunId) -> Result<(), TrackerError>;
}

/// Suite metadata as returned by `get_suite`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Suite {
    pub id: SuiteId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
}

/// Body of `add_run`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NewRun {
    pub suite_id: SuiteId,
    pub name: String,
    pub include_all: bool,
    pub case_ids: Vec<CaseId>,
}

impl NewRun {
    /// A run restricted to exactly `case_ids`.
    pub fn for_cases(suite_id: SuiteId, name: impl Into<String>, case_ids: Vec<CaseId>) -> Self {
        Self {
            suite_id,
            name: name.into(),
            include_all: false,
            case_ids,
        }
    }
}

/// A run created on the remote side.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Run {
    pub id: RunId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub suite_id: Option<SuiteId>,
    #[serde(default)]
    pub url: Option<String>,
}

/// One `(case_id, status_id, comment)` entry of `add_results_for_cases`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaseResult {
    pub case_id: CaseId,
    pub status_id: StatusId,
    pub comment: String,
}

/// Body of `add_results_for_cases`.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResultsForCases {
    pub results: Vec<CaseResult>,
}
