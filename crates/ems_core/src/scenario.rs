//! Scenario setup: validate run inputs and build a fresh world for one run.
//!
//! Everything a run mutates (vehicles, clock, waiting queue, telemetry) lives
//! in the world built here, so two runs never share state.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use bevy_ecs::prelude::{Entity, Resource, World};
use serde::{Deserialize, Serialize};

use crate::clock::{EventKind, EventSubject, SimulationClock};
use crate::config::EngineConfig;
use crate::dispatch::DispatchPolicyResource;
use crate::ecs::{Position, VehicleStatus};
use crate::error::{InputError, SimulationError};
use crate::grid::GridCell;
use crate::kpi::CategoryCounts;
use crate::model::{Call, CallId, Fleet, Station, StationId, StationMap, VehicleId};
use crate::telemetry::{EngineFault, SimTelemetry};
use crate::travel::TravelModel;

/// Scored time window `[start_s, end_s)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Resource)]
pub struct SimulationWindow {
    pub start_s: f64,
    pub end_s: f64,
}

impl SimulationWindow {
    pub fn new(start_s: f64, end_s: f64) -> Self {
        Self { start_s, end_s }
    }

    /// Window that scores every call with a non-negative arrival time.
    pub fn unbounded() -> Self {
        Self::new(0.0, f64::INFINITY)
    }

    pub fn contains(&self, t: f64) -> bool {
        self.start_s <= t && t < self.end_s
    }

    fn validate(&self) -> Result<(), InputError> {
        if self.start_s.is_nan() || self.end_s.is_nan() || self.start_s >= self.end_s {
            return Err(InputError::InvalidWindow {
                start_s: self.start_s,
                end_s: self.end_s,
            });
        }
        Ok(())
    }
}

/// Events at or after this time are left unprocessed.
#[derive(Debug, Clone, Copy, PartialEq, Resource)]
pub struct SimulationHorizon(pub f64);

/// Calls loaded into the run, plus which of them are scored.
#[derive(Debug, Default, Resource)]
pub struct CallBook {
    calls: BTreeMap<CallId, Call>,
    scored: BTreeSet<CallId>,
}

impl CallBook {
    pub fn get(&self, id: CallId) -> Option<&Call> {
        self.calls.get(&id)
    }

    /// Whether the call lies in the scored window (as opposed to warm-up).
    pub fn is_scored(&self, id: CallId) -> bool {
        self.scored.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn scored_calls(&self) -> impl Iterator<Item = &Call> {
        self.scored.iter().filter_map(|id| self.calls.get(id))
    }

    pub fn scored_counts(&self) -> CategoryCounts {
        CategoryCounts::from_categories(self.scored_calls().map(|c| c.category))
    }
}

/// Home station locations, read-only during the run.
#[derive(Debug, Default, Resource)]
pub struct StationBook(pub BTreeMap<StationId, Station>);

impl StationBook {
    pub fn location_of(&self, id: StationId) -> Option<GridCell> {
        self.0.get(&id).map(|station| station.location)
    }
}

/// Vehicle id to entity lookup, in id order.
#[derive(Debug, Default, Resource)]
pub struct VehicleIndex(pub BTreeMap<VehicleId, Entity>);

/// Calls waiting for a vehicle, oldest first.
#[derive(Debug, Default, Resource)]
pub struct WaitingQueue(pub VecDeque<CallId>);

/// Vehicles sent to one call and when they leave the scene together.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Ordered by arrival at the scene, ties by vehicle id.
    pub vehicles: Vec<VehicleId>,
    /// Ambulance that carries the patient, if the call has a hospital leg.
    pub transporter: Option<VehicleId>,
    /// Shared scene departure: first arrival plus the scene duration.
    pub scene_departure_s: f64,
}

/// Live assignments by call, written at dispatch.
#[derive(Debug, Default, Resource)]
pub struct CallAssignments(pub BTreeMap<CallId, Assignment>);

impl CallAssignments {
    pub fn get(&self, id: CallId) -> Option<&Assignment> {
        self.0.get(&id)
    }

    /// Whether `vehicle` carries the patient of `call`.
    pub fn is_transporter(&self, call: CallId, vehicle: VehicleId) -> bool {
        self.get(call).and_then(|a| a.transporter) == Some(vehicle)
    }
}

/// Check every input a run depends on. Nothing is simulated if this fails.
pub fn validate_inputs(
    calls: &[Call],
    stations: &StationMap,
    vehicles: &Fleet,
    window: SimulationWindow,
) -> Result<(), InputError> {
    window.validate()?;

    let mut seen = BTreeSet::new();
    for call in calls {
        call.validate()?;
        if !seen.insert(call.id) {
            return Err(InputError::DuplicateCall(call.id));
        }
    }

    if !calls.is_empty() {
        if stations.is_empty() {
            return Err(InputError::NoStations);
        }
        if vehicles.is_empty() {
            return Err(InputError::NoVehicles);
        }
    }

    for (key, station) in stations {
        if *key != station.id {
            return Err(InputError::StationKeyMismatch {
                key: *key,
                station: station.id,
            });
        }
    }

    for (key, vehicle) in vehicles {
        if *key != vehicle.id {
            return Err(InputError::VehicleKeyMismatch {
                key: *key,
                vehicle: vehicle.id,
            });
        }
        if vehicle.status != VehicleStatus::Idle || vehicle.assigned_call.is_some() {
            return Err(InputError::VehicleNotIdle {
                vehicle: vehicle.id,
                status: vehicle.status,
            });
        }
        if !stations.contains_key(&vehicle.home_station) {
            return Err(InputError::UnknownHomeStation {
                vehicle: vehicle.id,
                station: vehicle.home_station,
            });
        }
    }
    Ok(())
}

/// Build a world ready to run: resources inserted, vehicles spawned at their
/// home stations, and one CALL_ARRIVE event per loaded call.
///
/// Calls in `[start - warmup, start)` are loaded unscored; calls in the window
/// are loaded and scored; everything else is ignored.
pub fn build_world(
    calls: &[Call],
    stations: &StationMap,
    vehicles: Fleet,
    window: SimulationWindow,
    config: &EngineConfig,
) -> Result<World, SimulationError> {
    config.validate()?;
    validate_inputs(calls, stations, &vehicles, window)?;
    let travel = TravelModel::from_config(&config.travel)?;

    let mut world = World::new();
    world.insert_resource(SimulationClock::default());
    world.insert_resource(SimTelemetry::default());
    world.insert_resource(EngineFault::default());
    world.insert_resource(WaitingQueue::default());
    world.insert_resource(CallAssignments::default());
    world.insert_resource(DispatchPolicyResource::default());
    world.insert_resource(config.mode);
    world.insert_resource(travel);
    world.insert_resource(window);
    if let Some(horizon) = config.horizon_s {
        world.insert_resource(SimulationHorizon(horizon));
    }

    let mut index = VehicleIndex::default();
    for (id, vehicle) in vehicles {
        let home = stations[&vehicle.home_station].location;
        let entity = world.spawn((vehicle, Position(home))).id();
        index.0.insert(id, entity);
    }
    world.insert_resource(index);
    world.insert_resource(StationBook(stations.clone()));

    // Stable arrival order; equal arrivals keep their input order.
    let mut ordered: Vec<&Call> = calls.iter().collect();
    ordered.sort_by(|a, b| a.arrival_s.total_cmp(&b.arrival_s));

    let warmup_start = window.start_s - config.warmup_s;
    let mut book = CallBook::default();
    {
        let mut clock = world.resource_mut::<SimulationClock>();
        for call in ordered {
            let scored = window.contains(call.arrival_s);
            let warmup = warmup_start <= call.arrival_s && call.arrival_s < window.start_s;
            if !(scored || warmup) {
                continue;
            }
            clock.schedule_at(
                call.arrival_s,
                EventKind::CallArrive,
                EventSubject::Call(call.id),
            );
            if scored {
                book.scored.insert(call.id);
            }
            book.calls.insert(call.id, call.clone());
        }
    }

    tracing::info!(
        window_start_s = window.start_s,
        window_end_s = window.end_s,
        loaded = book.len(),
        scored = book.scored.len(),
        stations = stations.len(),
        vehicles = world.resource::<VehicleIndex>().0.len(),
        mode = ?config.mode,
        "scenario built"
    );
    world.insert_resource(book);
    Ok(world)
}
