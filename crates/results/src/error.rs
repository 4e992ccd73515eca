/// A test outcome whose identifiers cannot be read from its titles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    #[error("no case id in test title: {title:?}")]
    InvalidCaseId { title: String },

    #[error("no suite id in ancestor title {ancestor:?} and no default suite configured")]
    InvalidSuiteId { ancestor: Option<String> },
}

/// Errors reading a results document.
#[derive(Debug, thiserror::Error)]
pub enum ResultsError {
    #[error("results parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
