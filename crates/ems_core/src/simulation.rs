//! One simulation run: build a world, drive it to the end, and report.
//!
//! [run] is the one-shot entry point. [Simulation] exposes the same run step by
//! step so callers can look at vehicles and the waiting queue in between.

use std::collections::BTreeMap;

use bevy_ecs::prelude::{Schedule, World};
use serde::{Deserialize, Serialize};

use crate::clock::{Event, EventKind, SimulationClock};
use crate::config::EngineConfig;
use crate::dispatch::{DispatchPolicy, DispatchPolicyResource};
use crate::ecs::{Position, Vehicle, VehicleStatus};
use crate::error::SimulationError;
use crate::grid::GridCell;
use crate::kpi::{kpis_with_unserved, CategoryCounts, ResponseTimeStats, SurvivalKpi};
use crate::model::{Call, CallId, Fleet, StationMap, VehicleId, VehicleKind};
use crate::runner::{run_next_event, simulation_schedule};
use crate::scenario::{build_world, CallBook, SimulationWindow, WaitingQueue};
use crate::telemetry::{ResponseRecord, SimTelemetry};

/// Survival efficiency, or the explicit "no cardiac or category-A calls" signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurvivalEfficiency {
    Defined(f64),
    Undefined,
}

impl SurvivalEfficiency {
    pub fn value(self) -> Option<f64> {
        match self {
            SurvivalEfficiency::Defined(v) => Some(v),
            SurvivalEfficiency::Undefined => None,
        }
    }

    pub fn is_defined(self) -> bool {
        matches!(self, SurvivalEfficiency::Defined(_))
    }
}

/// Snapshot of one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    pub id: VehicleId,
    pub kind: VehicleKind,
    pub status: VehicleStatus,
    pub location: GridCell,
    pub assigned_call: Option<CallId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunDiagnostics {
    /// Scored calls with a response record, per category.
    pub served: CategoryCounts,
    /// Scored calls never dispatched, per category.
    pub unserved: CategoryCounts,
    /// Times a call was queued because no suitable vehicle was idle.
    pub deferrals: u64,
    /// Dispatches that sent fewer vehicles than the call asked for.
    pub shortfalls: u64,
    pub peak_waiting: usize,
    pub waiting_at_end: usize,
    pub events_processed: u64,
    pub events_by_kind: BTreeMap<EventKind, u64>,
    pub final_time_s: f64,
    pub response_times: ResponseTimeStats,
}

/// Outcome of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub eta_s: SurvivalEfficiency,
    /// γ: cardiac calls in the window, served or not.
    pub cardiac_count: u64,
    /// δ: category-A calls in the window, served or not.
    pub cat_a_count: u64,
    pub kpi: Option<SurvivalKpi>,
    pub responses: Vec<ResponseRecord>,
    pub diagnostics: RunDiagnostics,
}

impl RunReport {
    /// η_s as an optimizer fitness; an undefined KPI is an error, never a score.
    pub fn fitness(&self) -> Result<f64, SimulationError> {
        self.eta_s.value().ok_or(SimulationError::UndefinedKpi)
    }
}

/// A run in progress. Owns its world; nothing is shared with other runs.
pub struct Simulation {
    world: World,
    schedule: Schedule,
    max_steps: usize,
    steps: usize,
}

impl Simulation {
    /// Validate inputs and build a run. Vehicles are copied; the caller's map
    /// is left untouched and can seed further runs.
    pub fn new(
        calls: &[Call],
        stations: &StationMap,
        vehicles: &Fleet,
        window: SimulationWindow,
        config: &EngineConfig,
    ) -> Result<Self, SimulationError> {
        let world = build_world(calls, stations, vehicles.clone(), window, config)?;
        Ok(Self {
            world,
            schedule: simulation_schedule(),
            max_steps: config.max_steps,
            steps: 0,
        })
    }

    pub fn with_policy<P: DispatchPolicy + 'static>(mut self, policy: P) -> Self {
        self.world
            .insert_resource(DispatchPolicyResource::new(Box::new(policy)));
        self
    }

    /// Process the next event. `Ok(None)` once the run is over.
    pub fn step(&mut self) -> Result<Option<Event>, SimulationError> {
        if self.steps >= self.max_steps {
            return Ok(None);
        }
        let event = run_next_event(&mut self.world, &mut self.schedule)?;
        if event.is_some() {
            self.steps += 1;
        }
        Ok(event)
    }

    /// Process events until none are left. Returns the number processed.
    pub fn run_to_end(&mut self) -> Result<usize, SimulationError> {
        let start = self.steps;
        while self.step()?.is_some() {}
        if self.steps >= self.max_steps && !self.world.resource::<SimulationClock>().is_empty() {
            tracing::warn!(max_steps = self.max_steps, "step limit reached with events still pending");
        }
        Ok(self.steps - start)
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn now(&self) -> f64 {
        self.world.resource::<SimulationClock>().now()
    }

    pub fn responses(&self) -> &[ResponseRecord] {
        &self.world.resource::<SimTelemetry>().responses
    }

    pub fn waiting_calls(&self) -> Vec<CallId> {
        self.world.resource::<WaitingQueue>().0.iter().copied().collect()
    }

    /// Every vehicle, in id order.
    pub fn vehicle_states(&mut self) -> Vec<VehicleState> {
        let mut states: Vec<VehicleState> = self
            .world
            .query::<(&Vehicle, &Position)>()
            .iter(&self.world)
            .map(|(vehicle, position)| VehicleState {
                id: vehicle.id,
                kind: vehicle.kind,
                status: vehicle.status,
                location: position.0,
                assigned_call: vehicle.assigned_call,
            })
            .collect();
        states.sort_by_key(|s| s.id);
        states
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Aggregate the run so far into a report.
    pub fn report(&self) -> RunReport {
        let telemetry = self.world.resource::<SimTelemetry>();
        let scored = self.world.resource::<CallBook>().scored_counts();
        let served = CategoryCounts::from_categories(telemetry.responses.iter().map(|r| r.category));
        let unserved = CategoryCounts {
            cardiac: scored.cardiac.saturating_sub(served.cardiac),
            cat_a: scored.cat_a.saturating_sub(served.cat_a),
            cat_c: scored.cat_c.saturating_sub(served.cat_c),
        };

        let kpi = kpis_with_unserved(&telemetry.responses, unserved).ok();
        let diagnostics = RunDiagnostics {
            served,
            unserved,
            deferrals: telemetry.deferrals,
            shortfalls: telemetry.shortfalls,
            peak_waiting: telemetry.peak_waiting,
            waiting_at_end: self.world.resource::<WaitingQueue>().0.len(),
            events_processed: telemetry.events_processed,
            events_by_kind: telemetry.events_by_kind.clone(),
            final_time_s: self.now(),
            response_times: ResponseTimeStats::from_records(&telemetry.responses),
        };

        RunReport {
            eta_s: kpi.map_or(SurvivalEfficiency::Undefined, |k| {
                SurvivalEfficiency::Defined(k.eta_s)
            }),
            cardiac_count: kpi.map_or(0, |k| k.gamma),
            cat_a_count: kpi.map_or(0, |k| k.delta),
            kpi,
            responses: telemetry.responses.clone(),
            diagnostics,
        }
    }
}

/// Run calls in `window` against a freshly built copy of `vehicles` and report.
///
/// Input errors are returned before any event is processed. An undefined KPI
/// is not an error here; it shows up as [SurvivalEfficiency::Undefined].
pub fn run(
    calls: &[Call],
    stations: &StationMap,
    vehicles: &Fleet,
    window: SimulationWindow,
    config: &EngineConfig,
) -> Result<RunReport, SimulationError> {
    let mut simulation = Simulation::new(calls, stations, vehicles, window, config)?;
    let steps = simulation.run_to_end()?;
    let report = simulation.report();
    tracing::info!(
        steps,
        eta_s = ?report.eta_s.value(),
        served = report.diagnostics.served.total(),
        unserved = report.diagnostics.unserved.total(),
        deferrals = report.diagnostics.deferrals,
        "run complete"
    );
    Ok(report)
}
