use railyard_tracker::{CaseId, CaseResult, StatusId, SuiteId};

use crate::aggregate::RunAggregate;
use crate::error::ClassifyError;
use crate::model::{AggregatedResults, OutcomeStatus, TestOutcome};

/// Separates the numeric id from the rest of a title: `"12: logs in"`.
pub const ID_DELIMITER: char = ':';

pub const PASSED_COMMENT: &str = "Test passed successfully.";
pub const PENDING_COMMENT: &str = "Intentionally skipped (xit).";

/// The outcome statuses that are reported to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStatus {
    Passed,
    Pending,
    Failed,
}

impl ResultStatus {
    /// Pending tests are reported as `Blocked` (2).
    pub fn status_id(self) -> StatusId {
        match self {
            Self::Passed => StatusId::Passed,
            Self::Pending => StatusId::Blocked,
            Self::Failed => StatusId::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedResult {
    pub case_id: CaseId,
    pub suite_id: SuiteId,
    pub status: ResultStatus,
    pub comment: String,
}

impl ClassifiedResult {
    pub fn to_case_result(&self) -> CaseResult {
        CaseResult {
            case_id: self.case_id,
            status_id: self.status.status_id(),
            comment: self.comment.clone(),
        }
    }
}

/// Maps runner outcomes onto tracker case results.
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    default_suite: Option<SuiteId>,
}

impl Classifier {
    pub fn new(default_suite: Option<SuiteId>) -> Self {
        Self { default_suite }
    }

    pub fn default_suite(&self) -> Option<SuiteId> {
        self.default_suite
    }

    /// Classify one outcome.
    ///
    /// Returns `Ok(None)` for statuses that are not reported (anything other
    /// than passed, pending or failed). Ids are resolved before the status is
    /// looked at, so an unreported outcome with a bad title is still an error.
    pub fn classify(&self, outcome: &TestOutcome) -> Result<Option<ClassifiedResult>, ClassifyError> {
        let case_id = parse_leading_id(&outcome.title)
            .and_then(|id| CaseId::new(id).ok())
            .ok_or_else(|| ClassifyError::InvalidCaseId {
                title: outcome.title.clone(),
            })?;
        let suite_id = self.resolve_suite(&outcome.ancestor_titles)?;

        let (status, comment) = match outcome.status {
            OutcomeStatus::Passed => (ResultStatus::Passed, PASSED_COMMENT.to_string()),
            OutcomeStatus::Pending => (ResultStatus::Pending, PENDING_COMMENT.to_string()),
            OutcomeStatus::Failed => (
                ResultStatus::Failed,
                outcome
                    .failure_messages
                    .first()
                    .map(String::as_str)
                    .map(strip_ansi)
                    .unwrap_or_default(),
            ),
            OutcomeStatus::Other => return Ok(None),
        };

        Ok(Some(ClassifiedResult {
            case_id,
            suite_id,
            status,
            comment,
        }))
    }

    /// Outermost ancestor first, then the configured default.
    fn resolve_suite(&self, ancestors: &[String]) -> Result<SuiteId, ClassifyError> {
        let outermost = ancestors.first();
        outermost
            .and_then(|title| parse_leading_id(title))
            .and_then(|id| SuiteId::new(id).ok())
            .or(self.default_suite)
            .ok_or_else(|| ClassifyError::InvalidSuiteId {
                ancestor: outermost.cloned(),
            })
    }

    /// Classify every outcome of a run and group the results by suite.
    ///
    /// Each spec file's outcomes form one batch. The first outcome in a batch
    /// whose ids cannot be resolved ends that batch: it and every later
    /// outcome of the same file are dropped, while earlier ones stay
    /// recorded. Processing resumes with the next file.
    // TODO: decide whether a bad id should drop only its own outcome once
    // existing suites no longer depend on the whole-file cutoff.
    pub fn aggregate(&self, results: &AggregatedResults) -> RunAggregate {
        let mut aggregate = RunAggregate::default();

        for file in &results.test_results {
            for (index, outcome) in file.test_results.iter().enumerate() {
                match self.classify(outcome) {
                    Ok(Some(classified)) => aggregate.record(classified),
                    Ok(None) => {
                        tracing::debug!(
                            title = %outcome.title,
                            status = ?outcome.status,
                            "outcome status not reported"
                        );
                        aggregate.ignored += 1;
                    }
                    Err(e) => {
                        let abandoned = file.test_results.len() - index;
                        tracing::warn!(
                            file = %file.test_file_path,
                            abandoned,
                            error = %e,
                            "unparseable test id, skipping rest of file"
                        );
                        aggregate.abandoned += abandoned;
                        break;
                    }
                }
            }
        }

        aggregate
    }
}

/// Leading decimal id of a title, read the way a lenient integer parse
/// reads it: leading whitespace skipped, digits up to the first non-digit.
/// `"12: x"`, `" 12 : x"` and `"12abc"` all give 12; `"abc: x"` gives `None`.
pub fn parse_leading_id(title: &str) -> Option<u64> {
    let head = title
        .split_once(ID_DELIMITER)
        .map_or(title, |(head, _)| head)
        .trim_start();
    let digits_end = head
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(head.len());
    head[..digits_end].parse().ok()
}

/// Remove terminal color and cursor control sequences.
pub fn strip_ansi(text: &str) -> String {
    strip_ansi_escapes::strip_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::new(None)
    }

    fn suite(id: u64) -> SuiteId {
        SuiteId::new(id).unwrap()
    }

    #[test]
    fn leading_id_parsing() {
        assert_eq!(parse_leading_id("12: does something"), Some(12));
        assert_eq!(parse_leading_id("  7 : padded"), Some(7));
        assert_eq!(parse_leading_id("12abc: trailing junk"), Some(12));
        assert_eq!(parse_leading_id("40"), Some(40));
        assert_eq!(parse_leading_id("abc: does something"), None);
        assert_eq!(parse_leading_id(": empty"), None);
        assert_eq!(parse_leading_id(""), None);
        assert_eq!(parse_leading_id("C12: prefixed"), None);
        assert_eq!(parse_leading_id("99999999999999999999999: overflow"), None);
    }

    #[test]
    fn passed_outcome() {
        let outcome = TestOutcome::new("12: does something", &["3: Suite Name"], OutcomeStatus::Passed);
        let classified = classifier().classify(&outcome).unwrap().unwrap();
        assert_eq!(classified.case_id, CaseId::new(12).unwrap());
        assert_eq!(classified.suite_id, suite(3));
        assert_eq!(classified.status.status_id().code(), 1);
        assert_eq!(classified.comment, "Test passed successfully.");
    }

    #[test]
    fn pending_outcome() {
        let outcome = TestOutcome::new("12: later", &["3: Suite Name"], OutcomeStatus::Pending);
        let classified = classifier().classify(&outcome).unwrap().unwrap();
        assert_eq!(classified.status.status_id().code(), 2);
        assert_eq!(classified.comment, "Intentionally skipped (xit).");
    }

    #[test]
    fn failed_outcome_strips_color() {
        let outcome = TestOutcome::new("12: breaks", &["3: Suite Name"], OutcomeStatus::Failed)
            .with_failure("\u{1b}[31mExpected true\u{1b}[0m")
            .with_failure("second message is ignored");
        let classified = classifier().classify(&outcome).unwrap().unwrap();
        assert_eq!(classified.status.status_id().code(), 5);
        assert_eq!(classified.comment, "Expected true");
    }

    #[test]
    fn failed_without_message_has_empty_comment() {
        let outcome = TestOutcome::new("12: breaks", &["3: S"], OutcomeStatus::Failed);
        let classified = classifier().classify(&outcome).unwrap().unwrap();
        assert_eq!(classified.comment, "");
    }

    #[test]
    fn other_status_is_not_reported() {
        let outcome = TestOutcome::new("12: todo", &["3: S"], OutcomeStatus::Other);
        assert_eq!(classifier().classify(&outcome).unwrap(), None);
    }

    #[test]
    fn bad_case_id_is_error_even_for_unreported_status() {
        let outcome = TestOutcome::new("abc: todo", &["3: S"], OutcomeStatus::Other);
        let err = classifier().classify(&outcome).unwrap_err();
        assert!(matches!(err, ClassifyError::InvalidCaseId { .. }));
    }

    #[test]
    fn zero_case_id_is_error() {
        let outcome = TestOutcome::new("0: zero", &["3: S"], OutcomeStatus::Passed);
        assert!(classifier().classify(&outcome).is_err());
    }

    #[test]
    fn empty_ancestors_use_default_suite() {
        let outcome = TestOutcome::new("12: t", &[], OutcomeStatus::Passed);
        let classified = Classifier::new(Some(suite(8)))
            .classify(&outcome)
            .unwrap()
            .unwrap();
        assert_eq!(classified.suite_id, suite(8));
    }

    #[test]
    fn unnumbered_ancestor_uses_default_suite() {
        let outcome = TestOutcome::new("12: t", &["Login flows"], OutcomeStatus::Passed);
        let classified = Classifier::new(Some(suite(8)))
            .classify(&outcome)
            .unwrap()
            .unwrap();
        assert_eq!(classified.suite_id, suite(8));
    }

    #[test]
    fn numbered_ancestor_wins_over_default() {
        let outcome = TestOutcome::new("12: t", &["3: Login", "5: nested"], OutcomeStatus::Passed);
        let classified = Classifier::new(Some(suite(8)))
            .classify(&outcome)
            .unwrap()
            .unwrap();
        assert_eq!(classified.suite_id, suite(3));
    }

    #[test]
    fn no_suite_source_is_error() {
        let outcome = TestOutcome::new("12: t", &[], OutcomeStatus::Passed);
        let err = classifier().classify(&outcome).unwrap_err();
        assert_eq!(err, ClassifyError::InvalidSuiteId { ancestor: None });

        let outcome = TestOutcome::new("12: t", &["Login"], OutcomeStatus::Passed);
        let err = classifier().classify(&outcome).unwrap_err();
        assert_eq!(
            err,
            ClassifyError::InvalidSuiteId {
                ancestor: Some("Login".to_string())
            }
        );
    }

    #[test]
    fn case_result_carries_status_code() {
        let outcome = TestOutcome::new("12: t", &["3: S"], OutcomeStatus::Failed).with_failure("x");
        let result = classifier().classify(&outcome).unwrap().unwrap().to_case_result();
        assert_eq!(result.status_id, StatusId::Failed);
        assert_eq!(result.comment, "x");
    }
}
