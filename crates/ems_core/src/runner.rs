//! Simulation runner: advances the clock and routes events into the ECS.
//!
//! Clock progression happens here, outside systems. Each step pops the next
//! event from [SimulationClock], inserts it as [CurrentEvent], then runs the
//! schedule, where exactly one system reacts to the event kind.

use bevy_ecs::prelude::{Res, Schedule, World};
use bevy_ecs::schedule::{ExecutorKind, IntoSystemConfigs};

use crate::clock::{CurrentEvent, Event, EventKind, SimulationClock};
use crate::error::SimulationError;
use crate::scenario::SimulationHorizon;
use crate::systems::{
    call_arrive::call_arrive_system, job_complete::job_complete_system,
    loc_update::loc_update_system, scene_depart::scene_depart_system,
};
use crate::telemetry::{EngineFault, SimTelemetry};

fn is_call_arrive(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::CallArrive)
        .unwrap_or(false)
}

fn is_scene_depart(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::SceneDepart)
        .unwrap_or(false)
}

fn is_job_complete(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::JobComplete)
        .unwrap_or(false)
}

fn is_loc_update(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::LocUpdate)
        .unwrap_or(false)
}

/// Builds the engine schedule: one system per event kind, gated on [CurrentEvent].
///
/// Runs single-threaded; all systems share the dispatch resources, and event
/// order is the only ordering that matters.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule.add_systems((
        call_arrive_system.run_if(is_call_arrive),
        scene_depart_system.run_if(is_scene_depart),
        job_complete_system.run_if(is_job_complete),
        loc_update_system.run_if(is_loc_update),
    ));
    schedule
}

/// Runs one simulation step.
///
/// Returns `Ok(Some(event))` when an event was processed and `Ok(None)` when
/// the clock is empty or the next event is at or past the [SimulationHorizon].
/// A fault raised by a system during the step is returned as `Err`.
pub fn run_next_event(
    world: &mut World,
    schedule: &mut Schedule,
) -> Result<Option<Event>, SimulationError> {
    if let Some(error) = world.resource::<EngineFault>().0.clone() {
        return Err(error);
    }

    let horizon = world.get_resource::<SimulationHorizon>().map(|h| h.0);
    let next_ts = world.resource::<SimulationClock>().next_event_time();
    match (horizon, next_ts) {
        (_, None) => return Ok(None),
        (Some(horizon), Some(ts)) if ts >= horizon => return Ok(None),
        _ => {}
    }

    let Some(event) = world.resource_mut::<SimulationClock>().pop_next() else {
        return Ok(None);
    };
    tracing::trace!(t_s = event.timestamp, kind = ?event.kind, subject = ?event.subject, "event");
    world.insert_resource(CurrentEvent(event));
    world.resource_mut::<SimTelemetry>().record_event(event.kind);

    schedule.run(world);

    match world.resource::<EngineFault>().0.clone() {
        Some(error) => Err(error),
        None => Ok(Some(event)),
    }
}

/// Runs simulation steps until the event queue is empty, the horizon is
/// reached, or `max_steps` is reached. Returns the number of steps executed.
pub fn run_until_empty(
    world: &mut World,
    schedule: &mut Schedule,
    max_steps: usize,
) -> Result<usize, SimulationError> {
    let mut steps = 0;
    while steps < max_steps {
        if run_next_event(world, schedule)?.is_none() {
            break;
        }
        steps += 1;
    }
    if steps == max_steps && !world.resource::<SimulationClock>().is_empty() {
        tracing::warn!(max_steps, "step limit reached with events still pending");
    }
    Ok(steps)
}
