mod config;
mod error;
mod reporter;
mod run_name;
mod submitter;

pub use config::ReporterConfig;
pub use error::{ReporterError, SubmitError};
pub use reporter::Reporter;
pub use run_name::{RUN_MESSAGE, format_timestamp, run_name};
pub use submitter::{SubmissionHandle, SubmissionReport, SuiteOutcome, Submitter};
