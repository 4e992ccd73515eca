use railyard_tracker::{ProjectId, SuiteId};

use crate::error::ReporterError;

/// Options supplied once when the reporter is set up.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReporterConfig {
    /// Project the runs are created in.
    pub project_id: ProjectId,
    /// Suite used for tests whose outermost group carries no suite id.
    #[serde(default)]
    pub suite_id: Option<SuiteId>,
}

impl ReporterConfig {
    pub fn new(project_id: ProjectId) -> Self {
        Self {
            project_id,
            suite_id: None,
        }
    }

    #[must_use]
    pub fn with_default_suite(mut self, suite_id: SuiteId) -> Self {
        self.suite_id = Some(suite_id);
        self
    }

    /// Parse the runner's reporter options, e.g. `{"project_id": 1, "suite_id": 3}`.
    pub fn from_json(json: &str) -> Result<Self, ReporterError> {
        serde_json::from_str(json).map_err(|e| ReporterError::Config(e.to_string()))
    }
}
