use bevy_ecs::prelude::Res;

use crate::clock::{CurrentEvent, EventKind, EventSubject};
use crate::ecs::VehicleStatus;
use crate::error::SimulationError;

use super::dispatch::DispatchContext;

/// JOB_COMPLETE: the patient is handed over; the ambulance leaves the hospital
/// for its home station.
pub fn job_complete_system(event: Res<CurrentEvent>, mut ctx: DispatchContext) {
    if event.0.kind != EventKind::JobComplete {
        return;
    }
    let EventSubject::Vehicle(entity) = event.0.subject else {
        return;
    };
    let now = ctx.clock.now();
    let mode = *ctx.mode;

    let Ok((_, mut vehicle, mut position)) = ctx.vehicles.get_mut(entity) else {
        return;
    };
    let Some(hospital) = vehicle
        .assigned_call
        .and_then(|id| ctx.calls.get(id))
        .and_then(|call| call.transport)
        .map(|transport| transport.hospital)
    else {
        tracing::warn!(vehicle = %vehicle.id, "job complete without a hospital leg");
        return;
    };
    let Some(home) = ctx.stations.location_of(vehicle.home_station) else {
        tracing::warn!(vehicle = %vehicle.id, "vehicle home station missing");
        return;
    };
    // Only a transporting vehicle can complete a job.
    let transition = if vehicle.status == VehicleStatus::Transporting {
        vehicle.transition(VehicleStatus::Returning, mode)
    } else {
        Err(SimulationError::IllegalTransition {
            vehicle: vehicle.id,
            from: vehicle.status,
            to: VehicleStatus::Returning,
        })
    };
    if let Err(error) = transition {
        ctx.fault.raise(error);
        return;
    }
    position.0 = hospital;
    let drive_s = ctx.travel.eta(hospital, home, Some(now));
    ctx.clock.schedule_at(
        now + drive_s,
        EventKind::LocUpdate,
        EventSubject::Vehicle(entity),
    );
}
