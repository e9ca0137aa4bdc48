//! Error types surfaced by the engine.
//!
//! Input validation failures abort a run before any event is processed. An
//! undefined KPI is a separate signal so an optimizer can tell "no signal"
//! apart from "worst fitness".

use thiserror::Error;

use crate::ecs::VehicleStatus;
use crate::model::{CallId, StationId, VehicleId};

/// Why a run's inputs were rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("call {call} has invalid arrival time {arrival_s}")]
    InvalidArrivalTime { call: CallId, arrival_s: f64 },

    #[error("call {call} has invalid {field}: {value}")]
    InvalidDuration {
        call: CallId,
        field: &'static str,
        value: f64,
    },

    #[error("unknown call category: {0:?}")]
    UnknownCategory(String),

    #[error("unknown vehicle kind: {0:?}")]
    UnknownVehicleKind(String),

    #[error("call {0} asks for zero vehicles")]
    EmptyNeed(CallId),

    #[error("duplicate call id {0}")]
    DuplicateCall(CallId),

    #[error("calls were supplied but the station map is empty")]
    NoStations,

    #[error("calls were supplied but the vehicle map is empty")]
    NoVehicles,

    #[error("vehicle {vehicle} references unknown home station {station}")]
    UnknownHomeStation { vehicle: VehicleId, station: StationId },

    #[error("allocation references unknown station {0}")]
    UnknownAllocationStation(StationId),

    #[error("vehicle map key {key} does not match vehicle id {vehicle}")]
    VehicleKeyMismatch { key: VehicleId, vehicle: VehicleId },

    #[error("station map key {key} does not match station id {station}")]
    StationKeyMismatch { key: StationId, station: StationId },

    #[error("vehicle {vehicle} is not freshly built (status {status:?})")]
    VehicleNotIdle {
        vehicle: VehicleId,
        status: VehicleStatus,
    },

    #[error("invalid time window [{start_s}, {end_s})")]
    InvalidWindow { start_s: f64, end_s: f64 },

    #[error("invalid travel configuration: {0}")]
    InvalidTravel(String),

    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),
}

/// Errors returned by a simulation run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    #[error("survival efficiency is undefined: no cardiac or category-A calls in the window")]
    UndefinedKpi,

    #[error("vehicle {vehicle} cannot move from {from:?} to {to:?}")]
    IllegalTransition {
        vehicle: VehicleId,
        from: VehicleStatus,
        to: VehicleStatus,
    },
}

/// Errors raised while loading an engine configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] InputError),
}
