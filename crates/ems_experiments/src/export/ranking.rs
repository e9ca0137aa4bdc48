use crate::candidate::Candidate;
use crate::metrics::CandidateResult;

/// Index of the highest fitness. Unscored results never win; ties keep the
/// earliest.
pub(crate) fn best_index_by_fitness(results: &[CandidateResult]) -> Option<usize> {
    results
        .iter()
        .enumerate()
        .filter_map(|(idx, result)| result.fitness.map(|f| (idx, f)))
        .fold(None, |best: Option<(usize, f64)>, (idx, fitness)| match best {
            Some((_, best_fitness)) if best_fitness >= fitness => best,
            _ => Some((idx, fitness)),
        })
        .map(|(idx, _)| idx)
}

pub(crate) fn find_best_candidate_impl<'a>(
    results: &[CandidateResult],
    candidates: &'a [Candidate],
) -> Option<&'a Candidate> {
    if results.len() != candidates.len() {
        return None;
    }
    best_index_by_fitness(results).map(|idx| &candidates[idx])
}
