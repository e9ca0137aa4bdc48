//! Result export and ranking.
//!
//! Results go to JSON as-is, or to CSV joined with the candidate that
//! produced them. Ranking is by fitness; a candidate whose efficiency is
//! undefined or whose run failed is never picked as best.

use std::path::Path;

use crate::candidate::Candidate;
use crate::metrics::CandidateResult;

#[path = "export/csv.rs"]
mod csv;
#[path = "export/json.rs"]
mod json;
#[path = "export/ranking.rs"]
mod ranking;
#[path = "export/writer_utils.rs"]
mod writer_utils;

/// Write `results` as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns an error if the file cannot be created or serialization fails.
pub fn export_to_json(
    results: &[CandidateResult],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = writer_utils::create_output_file(path)?;
    json::export_to_json_impl(results, file)
}

/// Write one CSV row per candidate: layout, allocation and metrics.
///
/// `results[i]` must belong to `candidates[i]`.
///
/// # Errors
///
/// Returns an error if there are no results, the lengths differ, or writing
/// fails.
pub fn export_to_csv(
    results: &[CandidateResult],
    candidates: &[Candidate],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    writer_utils::ensure_not_empty(results)?;
    let file = writer_utils::create_output_file(path)?;
    csv::export_to_csv_impl(results, candidates, file)
}

/// Candidate with the highest fitness, or `None` if nothing was scored or
/// the slices are mismatched.
pub fn find_best_candidate<'a>(
    results: &[CandidateResult],
    candidates: &'a [Candidate],
) -> Option<&'a Candidate> {
    ranking::find_best_candidate_impl(results, candidates)
}

/// Index of the result with the highest fitness.
pub fn find_best_candidate_index(results: &[CandidateResult]) -> Option<usize> {
    ranking::best_index_by_fitness(results)
}
