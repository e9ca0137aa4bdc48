//! Per-candidate results flattened for export and ranking.

use ems_core::allocation::StationAllocation;
use ems_core::RunReport;

/// Outcome of evaluating one candidate.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CandidateResult {
    pub candidate_id: usize,
    /// Survival efficiency; `None` when undefined or the run failed.
    pub fitness: Option<f64>,
    /// Why the run produced no report, if it didn't.
    pub error: Option<String>,
    /// γ: cardiac calls in the window.
    pub cardiac_count: u64,
    /// δ: category-A calls in the window.
    pub cat_a_count: u64,
    pub served: u64,
    pub unserved: u64,
    pub deferrals: u64,
    pub mean_response_min: f64,
    pub median_response_min: f64,
    pub p90_response_min: f64,
    pub ambulances: u32,
    pub rapid_response: u32,
}

impl CandidateResult {
    pub fn from_report(candidate_id: usize, fleet: StationAllocation, report: &RunReport) -> Self {
        let diagnostics = &report.diagnostics;
        Self {
            candidate_id,
            fitness: report.eta_s.value(),
            error: None,
            cardiac_count: report.cardiac_count,
            cat_a_count: report.cat_a_count,
            served: diagnostics.served.total(),
            unserved: diagnostics.unserved.total(),
            deferrals: diagnostics.deferrals,
            mean_response_min: diagnostics.response_times.mean_min,
            median_response_min: diagnostics.response_times.median_min,
            p90_response_min: diagnostics.response_times.p90_min,
            ambulances: fleet.ambulances,
            rapid_response: fleet.rapid_response,
        }
    }

    pub fn from_error(candidate_id: usize, fleet: StationAllocation, error: impl ToString) -> Self {
        Self {
            candidate_id,
            fitness: None,
            error: Some(error.to_string()),
            cardiac_count: 0,
            cat_a_count: 0,
            served: 0,
            unserved: 0,
            deferrals: 0,
            mean_response_min: 0.0,
            median_response_min: 0.0,
            p90_response_min: 0.0,
            ambulances: fleet.ambulances,
            rapid_response: fleet.rapid_response,
        }
    }

    /// True when the candidate has a usable fitness.
    pub fn is_scored(&self) -> bool {
        self.fitness.is_some()
    }
}
