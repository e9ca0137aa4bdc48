//! Run a synthetic day of calls against four stations and print the KPI.
//!
//! Run with: RUST_LOG=ems_core=info cargo run -p ems_core --example scenario_run

use ems_core::grid::GridCell;
use ems_core::test_helpers::{default_stations, uniform_allocation, SyntheticCalls};
use ems_core::{build_vehicles, run, EngineConfig, SimulationWindow};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    const NUM_CALLS: usize = 480;
    const WARMUP_S: f64 = 90.0 * 60.0;

    let stations = default_stations();
    let fleet = build_vehicles(&uniform_allocation(&stations, 2, 1), &stations)?;
    let calls = SyntheticCalls::default()
        .with_count(NUM_CALLS)
        .with_seed(123)
        .with_hospital(GridCell::new(13, 11))
        .generate();

    let window = SimulationWindow::new(WARMUP_S, 24.0 * 3600.0);
    let config = EngineConfig::default().with_warmup_secs(WARMUP_S);
    let report = run(&calls, &stations, &fleet, window, &config)?;

    println!(
        "--- Scenario run ({} calls, {} stations, {} vehicles, seed 123) ---",
        NUM_CALLS,
        stations.len(),
        fleet.len()
    );
    match report.eta_s.value() {
        Some(eta) => println!("Survival efficiency: {eta:.4}"),
        None => println!("Survival efficiency: undefined"),
    }
    println!("Cardiac calls (γ): {}", report.cardiac_count);
    println!("Category A calls (δ): {}", report.cat_a_count);

    let d = &report.diagnostics;
    println!("Served: {}  Unserved: {}", d.served.total(), d.unserved.total());
    println!("Deferrals: {}  Peak waiting: {}", d.deferrals, d.peak_waiting);
    println!(
        "Response time: mean {:.1} min, median {:.1} min, p90 {:.1} min",
        d.response_times.mean_min, d.response_times.median_min, d.response_times.p90_min
    );
    println!("Events processed: {}  Final time: {:.0} s", d.events_processed, d.final_time_s);
    Ok(())
}
