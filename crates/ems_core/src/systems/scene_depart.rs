use bevy_ecs::prelude::Res;

use crate::clock::{CurrentEvent, EventKind, EventSubject};
use crate::ecs::VehicleStatus;
use crate::error::SimulationError;

use super::dispatch::DispatchContext;

/// SCENE_DEPART: the vehicle leaves the scene.
///
/// The crew's transporting ambulance on a call with a hospital leg starts
/// transporting; JOB_COMPLETE fires after the drive plus hospital and handover
/// time. Every other vehicle heads home and gets a LOC_UPDATE for its arrival
/// at the station.
pub fn scene_depart_system(event: Res<CurrentEvent>, mut ctx: DispatchContext) {
    if event.0.kind != EventKind::SceneDepart {
        return;
    }
    let EventSubject::Vehicle(entity) = event.0.subject else {
        return;
    };
    let now = ctx.clock.now();
    let mode = *ctx.mode;

    let Ok((_, mut vehicle, position)) = ctx.vehicles.get_mut(entity) else {
        return;
    };
    if vehicle.status != VehicleStatus::AtScene {
        ctx.fault.raise(SimulationError::IllegalTransition {
            vehicle: vehicle.id,
            from: vehicle.status,
            to: VehicleStatus::Returning,
        });
        return;
    }
    let transport = vehicle
        .assigned_call
        .and_then(|id| ctx.calls.get(id))
        .and_then(|call| {
            let carries = match ctx.assignments.get(call.id) {
                Some(assignment) => assignment.transporter == Some(vehicle.id),
                None => vehicle.kind.can_transport(),
            };
            call.transport.filter(|_| carries)
        });

    match transport {
        Some(transport) => {
            if let Err(error) = vehicle.transition(VehicleStatus::Transporting, mode) {
                ctx.fault.raise(error);
                return;
            }
            let drive_s = ctx.travel.eta(position.0, transport.hospital, Some(now));
            let done_at = now + drive_s + transport.hospital_time_s + transport.handover_time_s;
            tracing::trace!(vehicle = %vehicle.id, done_at_s = done_at, "transporting");
            ctx.clock
                .schedule_at(done_at, EventKind::JobComplete, EventSubject::Vehicle(entity));
        }
        None => {
            let Some(home) = ctx.stations.location_of(vehicle.home_station) else {
                tracing::warn!(vehicle = %vehicle.id, "vehicle home station missing");
                return;
            };
            if let Err(error) = vehicle.transition(VehicleStatus::Returning, mode) {
                ctx.fault.raise(error);
                return;
            }
            let drive_s = ctx.travel.eta(position.0, home, Some(now));
            ctx.clock.schedule_at(
                now + drive_s,
                EventKind::LocUpdate,
                EventSubject::Vehicle(entity),
            );
        }
    }
}
