//! Results structure handed over by the test runner once the run is over.
//!
//! Mirrors Jest's aggregated results. Both the reporter-hook shape
//! (`testResults[].testResults`, `testFilePath`) and the `--json` CLI shape
//! (`testResults[].assertionResults`, `name`) deserialize into the same types.

use serde::Deserialize;

use crate::error::ResultsError;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedResults {
    #[serde(default)]
    pub num_total_tests: u64,
    #[serde(default)]
    pub num_passed_tests: u64,
    #[serde(default)]
    pub num_failed_tests: u64,
    #[serde(default)]
    pub num_pending_tests: u64,
    #[serde(default)]
    pub success: bool,
    /// One entry per spec file, in the order the runner reported them.
    #[serde(default)]
    pub test_results: Vec<TestFileResult>,
}

impl AggregatedResults {
    pub fn from_json(json: &str) -> Result<Self, ResultsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ResultsError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Total number of per-test outcomes across all spec files.
    pub fn outcome_count(&self) -> usize {
        self.test_results.iter().map(|f| f.test_results.len()).sum()
    }
}

/// Outcomes of a single spec file.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestFileResult {
    #[serde(default, alias = "name")]
    pub test_file_path: String,
    #[serde(default, alias = "assertionResults")]
    pub test_results: Vec<TestOutcome>,
}

/// One test's result as delivered by the runner.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestOutcome {
    /// `"<case id>: <description>"` by convention.
    pub title: String,
    /// Enclosing `describe` names, outermost first. The outermost one may
    /// carry the suite id as `"<suite id>: <name>"`.
    #[serde(default)]
    pub ancestor_titles: Vec<String>,
    pub status: OutcomeStatus,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub failure_messages: Vec<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
}

impl TestOutcome {
    pub fn new(title: impl Into<String>, ancestors: &[&str], status: OutcomeStatus) -> Self {
        Self {
            title: title.into(),
            ancestor_titles: ancestors.iter().map(|a| (*a).to_string()).collect(),
            status,
            failure_messages: Vec::new(),
            full_name: None,
            duration: None,
        }
    }

    #[must_use]
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure_messages.push(message.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Passed,
    Failed,
    Pending,
    /// `todo`, `skipped`, `disabled`, `focused` and anything newer.
    #[serde(other)]
    Other,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
