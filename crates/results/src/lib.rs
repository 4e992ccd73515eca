pub mod aggregate;
pub mod classify;
pub mod error;
pub mod model;

pub use aggregate::{RunAggregate, SuiteAccumulator};
pub use classify::{ClassifiedResult, Classifier, ResultStatus};
pub use error::{ClassifyError, ResultsError};
pub use model::{AggregatedResults, OutcomeStatus, TestFileResult, TestOutcome};
