//! Parallel evaluation of station and fleet plans against the EMS engine.
//!
//! An optimizer proposes [Candidate]s (station layout plus a per-station fleet
//! allocation). This crate turns each one into a fresh fleet, runs it over a
//! shared call set, and reports the survival efficiency as fitness.
//!
//! # Quick Start
//!
//! ```no_run
//! use ems_core::test_helpers::{default_stations, SyntheticCalls};
//! use ems_core::{EngineConfig, SimulationWindow};
//! use ems_experiments::{evaluate_candidates_parallel, find_best_candidate_index, CandidateSpace, Scenario};
//!
//! let scenario = Scenario::new(
//!     SyntheticCalls::default().generate(),
//!     SimulationWindow::unbounded(),
//!     EngineConfig::default(),
//! );
//! let space = CandidateSpace::new(default_stations(), vec![1, 2], 6);
//! let candidates = space.sample(32, 7);
//!
//! let results = evaluate_candidates_parallel(&scenario, &candidates, None, true).unwrap();
//! let best = find_best_candidate_index(&results);
//! ```

pub mod candidate;
pub mod export;
pub mod metrics;
pub mod runner;

pub use candidate::{Candidate, CandidateSpace};
pub use export::{export_to_csv, export_to_json, find_best_candidate, find_best_candidate_index};
pub use metrics::CandidateResult;
pub use runner::{evaluate_candidate, evaluate_candidates_parallel, Scenario};
