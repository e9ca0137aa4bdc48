//! Telemetry: response records and per-run diagnostic counters.

use std::collections::BTreeMap;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::clock::EventKind;
use crate::error::SimulationError;
use crate::model::{CallCategory, CallId, VehicleId};

/// One served call, recorded when a vehicle is dispatched to it.
/// Times are simulation seconds; use the helpers for derived values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub call_id: CallId,
    pub category: CallCategory,
    pub vehicle_id: VehicleId,
    pub arrival_s: f64,
    pub dispatched_at_s: f64,
    pub dispatch_delay_s: f64,
    pub travel_time_s: f64,
    /// Time from arrival to dispatch, spent in the waiting queue.
    pub queue_wait_s: f64,
    /// `queue_wait_s + dispatch_delay_s + travel_time_s`.
    pub response_time_s: f64,
}

impl ResponseRecord {
    pub fn response_minutes(&self) -> f64 {
        self.response_time_s / 60.0
    }

    /// Simulation time at which the vehicle reaches the scene.
    pub fn on_scene_at(&self) -> f64 {
        self.arrival_s + self.response_time_s
    }

    pub fn was_queued(&self) -> bool {
        self.queue_wait_s > 0.0
    }
}

/// Collects what happened during a run. Inserted fresh into every world.
#[derive(Debug, Default, Resource)]
pub struct SimTelemetry {
    pub responses: Vec<ResponseRecord>,
    /// Times a call found no suitable idle vehicle and was queued.
    pub deferrals: u64,
    /// Dispatches that sent fewer vehicles than the call asked for.
    pub shortfalls: u64,
    pub peak_waiting: usize,
    pub events_by_kind: BTreeMap<EventKind, u64>,
    pub events_processed: u64,
}

impl SimTelemetry {
    pub fn record_event(&mut self, kind: EventKind) {
        self.events_processed += 1;
        *self.events_by_kind.entry(kind).or_insert(0) += 1;
    }
}

/// First invariant violation raised by a system; stops the runner.
#[derive(Debug, Default, Resource)]
pub struct EngineFault(pub Option<SimulationError>);

impl EngineFault {
    pub fn raise(&mut self, error: SimulationError) {
        tracing::error!(%error, "engine invariant violated");
        if self.0.is_none() {
            self.0 = Some(error);
        }
    }

    pub fn is_raised(&self) -> bool {
        self.0.is_some()
    }
}
