//! Candidate evaluation, one at a time or in parallel with rayon.
//!
//! Every evaluation builds its own fleet and world, so runs share nothing but
//! the read-only [Scenario].

use ems_core::{run, Call, EngineConfig, SimulationWindow};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::candidate::Candidate;
use crate::metrics::CandidateResult;

/// Calls, scoring window and engine settings shared by every candidate.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub calls: Vec<Call>,
    pub window: SimulationWindow,
    pub config: EngineConfig,
}

impl Scenario {
    pub fn new(calls: Vec<Call>, window: SimulationWindow, config: EngineConfig) -> Self {
        Self {
            calls,
            window,
            config,
        }
    }
}

/// Run one candidate. Input and engine errors become an unscored result
/// rather than aborting a sweep.
pub fn evaluate_candidate(scenario: &Scenario, candidate: &Candidate) -> CandidateResult {
    let fleet_size = candidate.fleet_size();
    let fleet = match candidate.fleet() {
        Ok(fleet) => fleet,
        Err(error) => {
            tracing::warn!(candidate = candidate.candidate_id, %error, "invalid allocation");
            return CandidateResult::from_error(candidate.candidate_id, fleet_size, error);
        }
    };

    match run(
        &scenario.calls,
        &candidate.stations,
        &fleet,
        scenario.window,
        &scenario.config,
    ) {
        Ok(report) => CandidateResult::from_report(candidate.candidate_id, fleet_size, &report),
        Err(error) => {
            tracing::warn!(candidate = candidate.candidate_id, %error, "run failed");
            CandidateResult::from_error(candidate.candidate_id, fleet_size, error)
        }
    }
}

fn progress_bar(total: usize) -> ProgressBar {
    let bar = ProgressBar::new(total as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

/// Evaluate `candidates` in parallel.
///
/// Results come back in input order. `num_threads` of `None` uses rayon's
/// default pool size.
pub fn evaluate_candidates_parallel(
    scenario: &Scenario,
    candidates: &[Candidate],
    num_threads: Option<usize>,
    show_progress: bool,
) -> Result<Vec<CandidateResult>, rayon::ThreadPoolBuildError> {
    let pb = (show_progress && !candidates.is_empty()).then(|| progress_bar(candidates.len()));

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = num_threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build()?;

    tracing::info!(
        candidates = candidates.len(),
        threads = pool.current_num_threads(),
        "evaluating candidates"
    );
    let results: Vec<CandidateResult> = pool.install(|| {
        candidates
            .par_iter()
            .map(|candidate| {
                let result = evaluate_candidate(scenario, candidate);
                if let Some(bar) = &pb {
                    bar.inc(1);
                }
                result
            })
            .collect()
    });

    if let Some(bar) = &pb {
        bar.finish_with_message("Completed");
    }
    Ok(results)
}
