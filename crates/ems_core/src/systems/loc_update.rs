use bevy_ecs::prelude::Res;

use crate::clock::{CurrentEvent, EventKind, EventSubject};
use crate::ecs::VehicleStatus;
use crate::error::SimulationError;

use super::dispatch::DispatchContext;

/// LOC_UPDATE: a vehicle finished a leg.
///
/// En route, it has reached the scene and stays until the crew's shared
/// departure time. Returning, it is back at its home station, becomes idle,
/// and the waiting queue is drained.
pub fn loc_update_system(event: Res<CurrentEvent>, mut ctx: DispatchContext) {
    if event.0.kind != EventKind::LocUpdate {
        return;
    }
    let EventSubject::Vehicle(entity) = event.0.subject else {
        return;
    };
    let now = ctx.clock.now();
    let mode = *ctx.mode;

    let became_idle = {
        let Ok((_, mut vehicle, mut position)) = ctx.vehicles.get_mut(entity) else {
            return;
        };
        match vehicle.status {
            VehicleStatus::EnRouteToScene => {
                let Some(call) = vehicle.assigned_call.and_then(|id| ctx.calls.get(id)) else {
                    tracing::warn!(vehicle = %vehicle.id, "vehicle en route without a call");
                    return;
                };
                // the crew leaves together, once the first arrival's scene time is up
                let departs_at = ctx
                    .assignments
                    .get(call.id)
                    .map_or(now + call.scene_duration_s, |a| a.scene_departure_s.max(now));
                let scene = call.scene;
                if let Err(error) = vehicle.transition(VehicleStatus::AtScene, mode) {
                    ctx.fault.raise(error);
                    return;
                }
                position.0 = scene;
                ctx.clock.schedule_at(
                    departs_at,
                    EventKind::SceneDepart,
                    EventSubject::Vehicle(entity),
                );
                false
            }
            VehicleStatus::Returning => {
                let Some(home) = ctx.stations.location_of(vehicle.home_station) else {
                    tracing::warn!(vehicle = %vehicle.id, "vehicle home station missing");
                    return;
                };
                if let Err(error) = vehicle.transition(VehicleStatus::Idle, mode) {
                    ctx.fault.raise(error);
                    return;
                }
                position.0 = home;
                tracing::trace!(vehicle = %vehicle.id, now_s = now, "back at station");
                true
            }
            other => {
                ctx.fault.raise(SimulationError::IllegalTransition {
                    vehicle: vehicle.id,
                    from: other,
                    to: VehicleStatus::Idle,
                });
                return;
            }
        }
    };

    if became_idle {
        ctx.drain_waiting();
    }
}
