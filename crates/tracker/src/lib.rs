mod error;
mod ids;
mod status;
mod tracker;

pub use error::TrackerError;
pub use ids::{CaseId, ProjectId, RunId, SuiteId};
pub use status::StatusId;
pub use tracker::{CaseResult, NewRun, ResultsForCases, Run, Suite, TrackerApi};
