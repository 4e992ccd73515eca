use std::collections::BTreeMap;

use railyard_tracker::{CaseId, CaseResult, ResultsForCases, SuiteId};

use crate::classify::ClassifiedResult;

/// Everything collected for one suite during a single run.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteAccumulator {
    pub suite_id: SuiteId,
    /// Cases the run is restricted to, in the order they were seen.
    pub case_ids: Vec<CaseId>,
    pub results: Vec<CaseResult>,
}

impl SuiteAccumulator {
    pub fn new(suite_id: SuiteId) -> Self {
        Self {
            suite_id,
            case_ids: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn push(&mut self, result: &ClassifiedResult) {
        self.case_ids.push(result.case_id);
        self.results.push(result.to_case_result());
    }

    /// Split into the run's case ids and the results body.
    pub fn into_parts(self) -> (Vec<CaseId>, ResultsForCases) {
        (
            self.case_ids,
            ResultsForCases {
                results: self.results,
            },
        )
    }
}

/// Per-run aggregation state: one accumulator per suite plus counters.
///
/// Built fresh for every completed run and handed to the submitter by value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunAggregate {
    suites: BTreeMap<SuiteId, SuiteAccumulator>,
    /// Outcomes recorded into some suite.
    pub classified: usize,
    /// Outcomes with a status that is not reported.
    pub ignored: usize,
    /// Outcomes dropped because an earlier sibling had an unparseable id.
    pub abandoned: usize,
}

impl RunAggregate {
    /// Add a classified result, creating its suite's accumulator on first use.
    pub fn record(&mut self, result: ClassifiedResult) {
        self.suites
            .entry(result.suite_id)
            .or_insert_with(|| SuiteAccumulator::new(result.suite_id))
            .push(&result);
        self.classified += 1;
    }

    pub fn suite(&self, suite_id: SuiteId) -> Option<&SuiteAccumulator> {
        self.suites.get(&suite_id)
    }

    pub fn suites(&self) -> impl Iterator<Item = &SuiteAccumulator> {
        self.suites.values()
    }

    pub fn suite_ids(&self) -> Vec<SuiteId> {
        self.suites.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.suites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }

    pub fn into_suites(self) -> impl Iterator<Item = SuiteAccumulator> {
        self.suites.into_values()
    }
}
