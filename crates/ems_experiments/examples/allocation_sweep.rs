//! Example: random search over station placement and fleet allocation.
//!
//! Samples candidates where two stations may move and twelve vehicles are
//! spread over all stations, evaluates them in parallel, and exports the
//! results.
//!
//! Run with: RUST_LOG=ems_experiments=info cargo run -p ems_experiments --example allocation_sweep

use ems_core::grid::GridCell;
use ems_core::test_helpers::{default_stations, SyntheticCalls};
use ems_core::{EngineConfig, SimulationWindow};
use ems_experiments::{
    evaluate_candidates_parallel, export_to_csv, export_to_json, find_best_candidate,
    find_best_candidate_index, CandidateSpace, Scenario,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    const WARMUP_S: f64 = 90.0 * 60.0;
    const CANDIDATES: usize = 64;

    let calls = SyntheticCalls::default()
        .with_count(480)
        .with_seed(123)
        .with_hospital(GridCell::new(13, 11))
        .generate();
    let scenario = Scenario::new(
        calls,
        SimulationWindow::new(WARMUP_S, 24.0 * 3600.0),
        EngineConfig::default().with_warmup_secs(WARMUP_S),
    );

    let space = CandidateSpace::new(default_stations(), vec![1, 2], 12);
    println!("Sampling {CANDIDATES} candidates ({} genes each)...", space.gene_count());
    let candidates = space.sample(CANDIDATES, 2024);

    println!("Running simulations in parallel...");
    let results = evaluate_candidates_parallel(&scenario, &candidates, None, true)?;
    let failed = results.iter().filter(|r| !r.is_scored()).count();
    println!("Completed {} simulations ({failed} unscored)", results.len());

    let Some(best_idx) = find_best_candidate_index(&results) else {
        println!("No candidate produced a defined survival efficiency");
        return Ok(());
    };
    let best = &results[best_idx];
    println!("\n=== Best Candidate ===");
    println!("Candidate: {}", best.candidate_id);
    println!("Survival efficiency: {:.4}", best.fitness.unwrap_or_default());
    println!("Fleet: {} ambulances, {} rapid response", best.ambulances, best.rapid_response);
    println!(
        "Response time: mean {:.1} min, p90 {:.1} min",
        best.mean_response_min, best.p90_response_min
    );

    if let Some(candidate) = find_best_candidate(&results, &candidates) {
        println!("\n=== Layout ===");
        for (id, station) in &candidate.stations {
            let counts = candidate.allocation.get(id).copied().unwrap_or_default();
            println!(
                "Station {id} at {}: {} A, {} R",
                station.location, counts.ambulances, counts.rapid_response
            );
        }
    }

    println!("\nExporting results...");
    export_to_json(&results, "allocation_results.json")?;
    export_to_csv(&results, &candidates, "allocation_results.csv")?;
    println!("Exported to allocation_results.json and allocation_results.csv");
    Ok(())
}
