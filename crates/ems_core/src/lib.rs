//! Event-driven EMS dispatch simulation with a survival-efficiency KPI.
//!
//! A run takes calls, stations and a fleet, simulates dispatch and the vehicle
//! cycle in strict event order on a `bevy_ecs` world, and reports the
//! heterogeneous survival efficiency η_s. See [simulation::run].

pub mod allocation;
pub mod clock;
pub mod config;
pub mod dispatch;
pub mod ecs;
pub mod error;
pub mod grid;
pub mod kpi;
pub mod model;
pub mod runner;
pub mod scenario;
pub mod simulation;
pub mod systems;
pub mod telemetry;
pub mod traffic;
pub mod travel;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use allocation::{build_vehicles, Allocation, StationAllocation};
pub use config::{EngineConfig, EngineMode, TravelConfig};
pub use error::{ConfigError, InputError, SimulationError};
pub use model::{
    Call, CallCategory, CallId, Fleet, Station, StationId, StationMap, VehicleId, VehicleKind,
    VehicleNeed,
};
pub use scenario::SimulationWindow;
pub use simulation::{run, RunReport, Simulation, SurvivalEfficiency};
