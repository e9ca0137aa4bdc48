//! Dispatch and waiting-queue handling shared by the event systems.

use bevy_ecs::prelude::{Entity, Query, Res, ResMut};
use bevy_ecs::system::SystemParam;

use crate::clock::{EventKind, EventSubject, SimulationClock};
use crate::config::EngineMode;
use crate::dispatch::{DispatchCandidate, DispatchPolicyResource};
use crate::ecs::{Position, Vehicle, VehicleStatus};
use crate::model::{CallId, VehicleId, VehicleKind, VehicleNeed};
use crate::scenario::{Assignment, CallAssignments, CallBook, StationBook, WaitingQueue};
use crate::telemetry::{EngineFault, ResponseRecord, SimTelemetry};
use crate::travel::TravelModel;

/// Result of one dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Dispatched(VehicleId),
    /// No suitable idle vehicle; the caller decides whether to queue.
    Deferred,
    /// The call is not in the call book.
    Unknown,
    /// A state-machine violation was raised; the run stops.
    Faulted,
}

/// Everything a dispatch touches, bundled so each event system takes one param.
#[derive(SystemParam)]
pub struct DispatchContext<'w, 's> {
    pub clock: ResMut<'w, SimulationClock>,
    pub calls: Res<'w, CallBook>,
    pub stations: Res<'w, StationBook>,
    pub travel: Res<'w, TravelModel>,
    pub mode: Res<'w, EngineMode>,
    pub policy: Res<'w, DispatchPolicyResource>,
    pub waiting: ResMut<'w, WaitingQueue>,
    pub assignments: ResMut<'w, CallAssignments>,
    pub telemetry: ResMut<'w, SimTelemetry>,
    pub fault: ResMut<'w, EngineFault>,
    pub vehicles: Query<'w, 's, (Entity, &'static mut Vehicle, &'static mut Position)>,
}

impl DispatchContext<'_, '_> {
    /// Idle vehicles as policy candidates, sorted by vehicle id.
    fn idle_candidates(&self) -> Vec<DispatchCandidate> {
        let mut candidates: Vec<DispatchCandidate> = self
            .vehicles
            .iter()
            .filter(|(_, vehicle, _)| vehicle.is_available())
            .map(|(entity, vehicle, position)| DispatchCandidate {
                entity,
                vehicle_id: vehicle.id,
                kind: vehicle.kind,
                location: position.0,
            })
            .collect();
        candidates.sort_by_key(|c| c.vehicle_id);
        candidates
    }

    /// Try to send vehicles to `call_id` now.
    ///
    /// On success every chosen vehicle leaves idle and gets its own arrival
    /// event. The response record is written for scored calls and times the
    /// first vehicle to reach the scene. In reduced mode the vehicles are idle
    /// again at the scene before this returns.
    pub fn dispatch(&mut self, call_id: CallId) -> DispatchOutcome {
        let now = self.clock.now();
        let Some(call) = self.calls.get(call_id).cloned() else {
            tracing::warn!(call = %call_id, "dispatch requested for unknown call");
            return DispatchOutcome::Unknown;
        };

        let candidates = self.idle_candidates();
        let mut crew: Vec<(f64, DispatchCandidate)> = self
            .policy
            .select(&call, &candidates, &self.travel, now)
            .into_iter()
            .map(|c| (self.travel.eta(c.location, call.scene, Some(now)), *c))
            .collect();
        crew.sort_by(|(eta_a, a), (eta_b, b)| {
            eta_a
                .total_cmp(eta_b)
                .then_with(|| a.vehicle_id.cmp(&b.vehicle_id))
        });
        crew.dedup_by_key(|(_, c)| c.vehicle_id);
        let Some(&(travel_time_s, first)) = crew.first() else {
            return DispatchOutcome::Deferred;
        };

        let mode = *self.mode;
        let mut sent = VehicleNeed::default();
        for (eta, chosen) in &crew {
            let Ok((_, mut vehicle, mut position)) = self.vehicles.get_mut(chosen.entity) else {
                return DispatchOutcome::Deferred;
            };
            if let Err(error) = vehicle.transition(VehicleStatus::EnRouteToScene, mode) {
                self.fault.raise(error);
                return DispatchOutcome::Faulted;
            }
            vehicle.assigned_call = Some(call.id);
            match chosen.kind {
                VehicleKind::Ambulance => sent.ambulances += 1,
                VehicleKind::RapidResponse => sent.rapid_response += 1,
            }

            match mode {
                EngineMode::Full => {
                    self.clock.schedule_at(
                        now + call.dispatch_delay_s + eta,
                        EventKind::LocUpdate,
                        EventSubject::Vehicle(chosen.entity),
                    );
                }
                EngineMode::Reduced => {
                    position.0 = call.scene;
                    if let Err(error) = vehicle.transition(VehicleStatus::Idle, mode) {
                        self.fault.raise(error);
                        return DispatchOutcome::Faulted;
                    }
                }
            }
        }

        let transporter = call.transport.and_then(|_| {
            crew.iter()
                .find(|(_, c)| c.kind.can_transport())
                .map(|(_, c)| c.vehicle_id)
        });
        let first_on_scene = now + call.dispatch_delay_s + travel_time_s;
        self.assignments.0.insert(
            call.id,
            Assignment {
                vehicles: crew.iter().map(|(_, c)| c.vehicle_id).collect(),
                transporter,
                scene_departure_s: first_on_scene + call.scene_duration_s,
            },
        );
        let missing = call.shortfall(sent);
        if missing > 0 {
            self.telemetry.shortfalls += 1;
            tracing::debug!(call = %call.id, missing, "call dispatched short of its need");
        }

        let queue_wait_s = now - call.arrival_s;
        let response_time_s = queue_wait_s + call.dispatch_delay_s + travel_time_s;
        tracing::debug!(
            call = %call.id,
            vehicle = %first.vehicle_id,
            crew = crew.len(),
            category = %call.category,
            now_s = now,
            response_time_s,
            "dispatched"
        );
        if self.calls.is_scored(call.id) {
            self.telemetry.responses.push(ResponseRecord {
                call_id: call.id,
                category: call.category,
                vehicle_id: first.vehicle_id,
                arrival_s: call.arrival_s,
                dispatched_at_s: now,
                dispatch_delay_s: call.dispatch_delay_s,
                travel_time_s,
                queue_wait_s,
                response_time_s,
            });
        }
        DispatchOutcome::Dispatched(first.vehicle_id)
    }

    /// Put a call at the back of the waiting queue.
    pub fn defer(&mut self, call_id: CallId) {
        self.waiting.0.push_back(call_id);
        self.telemetry.deferrals += 1;
        let waiting = self.waiting.0.len();
        self.telemetry.peak_waiting = self.telemetry.peak_waiting.max(waiting);
        tracing::debug!(call = %call_id, waiting, "no vehicle available, call queued");
    }

    /// Walk the waiting queue oldest first and serve every call that an idle
    /// vehicle suits; calls that still cannot be served keep their place.
    /// Returns how many calls left the queue.
    pub fn drain_waiting(&mut self) -> usize {
        let mut served = 0;
        let mut idx = 0;
        while let Some(&call_id) = self.waiting.0.get(idx) {
            match self.dispatch(call_id) {
                DispatchOutcome::Dispatched(_) | DispatchOutcome::Unknown => {
                    self.waiting.0.remove(idx);
                    served += 1;
                }
                DispatchOutcome::Deferred => idx += 1,
                DispatchOutcome::Faulted => break,
            }
        }
        served
    }
}
