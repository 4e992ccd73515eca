use std::path::PathBuf;

use railyard_results::ResultsError;
use railyard_tracker::{RunId, SuiteId, TrackerError};
use thiserror::Error;

/// Failure of one suite's submission pipeline. Names the stage that failed;
/// later stages never ran.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("fetching suite {suite_id} failed: {source}")]
    FetchSuite {
        suite_id: SuiteId,
        source: TrackerError,
    },

    #[error("creating run for suite {suite_id} failed: {source}")]
    CreateRun {
        suite_id: SuiteId,
        source: TrackerError,
    },

    #[error("adding results to run {run_id} (suite {suite_id}) failed: {source}")]
    AddResults {
        suite_id: SuiteId,
        run_id: RunId,
        source: TrackerError,
    },

    #[error("closing run {run_id} (suite {suite_id}) failed: {source}")]
    CloseRun {
        suite_id: SuiteId,
        run_id: RunId,
        source: TrackerError,
    },

    #[error("submission task for suite {suite_id} failed: {message}")]
    Task { suite_id: SuiteId, message: String },
}

impl SubmitError {
    pub fn suite_id(&self) -> SuiteId {
        match self {
            Self::FetchSuite { suite_id, .. }
            | Self::CreateRun { suite_id, .. }
            | Self::AddResults { suite_id, .. }
            | Self::CloseRun { suite_id, .. }
            | Self::Task { suite_id, .. } => *suite_id,
        }
    }

    /// The run the pipeline had created before failing, if it got that far.
    pub fn run_id(&self) -> Option<RunId> {
        match self {
            Self::AddResults { run_id, .. } | Self::CloseRun { run_id, .. } => Some(*run_id),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ReporterError {
    #[error("invalid reporter configuration: {0}")]
    Config(String),

    #[error("results: {0}")]
    Results(#[from] ResultsError),

    #[error("tracker: {0}")]
    Tracker(#[from] TrackerError),

    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
