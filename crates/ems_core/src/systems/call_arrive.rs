use bevy_ecs::prelude::Res;

use crate::clock::{CurrentEvent, EventKind, EventSubject};
use crate::config::EngineMode;

use super::dispatch::{DispatchContext, DispatchOutcome};

/// CALL_ARRIVE: dispatch the nearest suitable idle vehicle or queue the call.
pub fn call_arrive_system(event: Res<CurrentEvent>, mut ctx: DispatchContext) {
    if event.0.kind != EventKind::CallArrive {
        return;
    }
    let EventSubject::Call(call_id) = event.0.subject else {
        return;
    };

    match ctx.dispatch(call_id) {
        DispatchOutcome::Dispatched(_) => {
            // A reduced-mode vehicle is idle again already.
            if *ctx.mode == EngineMode::Reduced {
                ctx.drain_waiting();
            }
        }
        DispatchOutcome::Deferred => ctx.defer(call_id),
        DispatchOutcome::Unknown | DispatchOutcome::Faulted => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::{Schedule, World};

    use crate::clock::SimulationClock;
    use crate::config::EngineConfig;
    use crate::ecs::{Vehicle, VehicleStatus};
    use crate::model::{Call, CallCategory, CallId, Fleet, Station, StationId, StationMap, VehicleId, VehicleKind};
    use crate::scenario::{build_world, SimulationWindow, WaitingQueue};
    use crate::telemetry::SimTelemetry;

    fn world_with(calls: &[Call], vehicles: u32, config: &EngineConfig) -> World {
        let mut stations = StationMap::new();
        stations.insert(StationId(0), Station::new(0, (10, 10)));
        let mut fleet = Fleet::new();
        for id in 0..vehicles {
            fleet.insert(VehicleId(id), Vehicle::new(id, VehicleKind::Ambulance, StationId(0)));
        }
        build_world(calls, &stations, fleet, SimulationWindow::unbounded(), config).expect("world")
    }

    fn step(world: &mut World, schedule: &mut Schedule) {
        let event = world
            .resource_mut::<SimulationClock>()
            .pop_next()
            .expect("event");
        world.insert_resource(CurrentEvent(event));
        schedule.run(world);
    }

    #[test]
    fn arrival_dispatches_idle_vehicle() {
        let calls = [Call::new(7, 0.0, 30.0, 0.0, (11, 10), CallCategory::Cardiac)];
        let config = EngineConfig::default().with_constant_speed(1.0, 45.0);
        let mut world = world_with(&calls, 1, &config);
        let mut schedule = Schedule::default();
        schedule.add_systems(call_arrive_system);

        step(&mut world, &mut schedule);

        let vehicle = world
            .query::<&Vehicle>()
            .iter(&world)
            .next()
            .cloned()
            .expect("vehicle");
        assert_eq!(vehicle.status, VehicleStatus::EnRouteToScene);
        assert_eq!(vehicle.assigned_call, Some(CallId(7)));

        let telemetry = world.resource::<SimTelemetry>();
        assert_eq!(telemetry.responses.len(), 1);
        assert_eq!(telemetry.responses[0].response_time_s, 110.0);
        // arrival on scene is the next event for the vehicle
        let clock = world.resource::<SimulationClock>();
        assert_eq!(clock.next_event_time(), Some(110.0));
    }

    #[test]
    fn arrival_without_vehicle_is_queued() {
        let calls = [
            Call::new(0, 0.0, 0.0, 0.0, (11, 10), CallCategory::CatA),
            Call::new(1, 0.0, 0.0, 0.0, (12, 10), CallCategory::CatA),
        ];
        let mut world = world_with(&calls, 1, &EngineConfig::default());
        let mut schedule = Schedule::default();
        schedule.add_systems(call_arrive_system);

        step(&mut world, &mut schedule);
        step(&mut world, &mut schedule);

        let waiting: Vec<_> = world.resource::<WaitingQueue>().0.iter().copied().collect();
        assert_eq!(waiting, vec![CallId(1)]);
        let telemetry = world.resource::<SimTelemetry>();
        assert_eq!(telemetry.deferrals, 1);
        assert_eq!(telemetry.peak_waiting, 1);
        assert_eq!(telemetry.responses.len(), 1);
    }

    #[test]
    fn reduced_mode_frees_vehicle_at_the_scene() {
        let calls = [Call::new(0, 0.0, 0.0, 0.0, (14, 10), CallCategory::CatA)];
        let config = EngineConfig::default().with_mode(EngineMode::Reduced);
        let mut world = world_with(&calls, 1, &config);
        let mut schedule = Schedule::default();
        schedule.add_systems(call_arrive_system);

        step(&mut world, &mut schedule);

        let (vehicle, position) = world
            .query::<(&Vehicle, &crate::ecs::Position)>()
            .iter(&world)
            .next()
            .map(|(v, p)| (v.clone(), *p))
            .expect("vehicle");
        assert!(vehicle.is_available());
        assert_eq!(position.0, crate::grid::GridCell::new(14, 10));
        assert!(world.resource::<SimulationClock>().is_empty());
    }
}
