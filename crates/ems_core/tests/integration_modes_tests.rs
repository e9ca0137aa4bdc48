mod support;

use ems_core::clock::EventKind;
use ems_core::ecs::VehicleStatus;
use ems_core::model::{Call, CallCategory, CallId, Transport, VehicleId, VehicleKind};
use ems_core::simulation::SurvivalEfficiency;
use ems_core::traffic::{SpeedProfile, SECS_PER_HOUR};

use support::scenario::{cell, ScenarioBuilder};

#[test]
fn reduced_mode_frees_vehicle_at_the_scene() {
    let scenario = ScenarioBuilder::new()
        .station(0, (0, 0))
        .ambulance(0)
        .quick_call(0, 0.0, (0, 3), CallCategory::CatA)
        .quick_call(1, 10.0, (0, 4), CallCategory::CatA)
        .reduced();
    let report = scenario.run();

    assert_eq!(report.responses[0].response_time_s, 240.0);
    // dispatched from the first scene, not from the station
    assert_eq!(report.responses[1].response_time_s, 80.0);
    assert_eq!(report.diagnostics.deferrals, 0);
    assert_eq!(report.diagnostics.events_processed, 2);
    assert_eq!(report.diagnostics.events_by_kind.get(&EventKind::LocUpdate), None);

    let mut sim = scenario.simulation();
    sim.run_to_end().expect("run");
    let state = &sim.vehicle_states()[0];
    assert_eq!(state.status, VehicleStatus::Idle);
    assert_eq!(state.location, cell(0, 4));
}

#[test]
fn transport_leg_runs_the_full_cycle() {
    let call = Call::new(0, 0.0, 0.0, 100.0, (0, 1), CallCategory::Cardiac).with_transport(
        Transport {
            hospital: cell(0, 3),
            hospital_time_s: 50.0,
            handover_time_s: 25.0,
        },
    );
    let scenario = ScenarioBuilder::new().station(0, (0, 0)).ambulance(0).call(call);
    let mut sim = scenario.simulation();

    let mut trail = Vec::new();
    while let Some(event) = sim.step().expect("step") {
        trail.push((event.timestamp, event.kind, sim.vehicle_states()[0].status));
    }
    assert_eq!(
        trail,
        vec![
            (0.0, EventKind::CallArrive, VehicleStatus::EnRouteToScene),
            (80.0, EventKind::LocUpdate, VehicleStatus::AtScene),
            (180.0, EventKind::SceneDepart, VehicleStatus::Transporting),
            // 160 s to the hospital, 75 s there
            (415.0, EventKind::JobComplete, VehicleStatus::Returning),
            (655.0, EventKind::LocUpdate, VehicleStatus::Idle),
        ]
    );
    assert_eq!(sim.vehicle_states()[0].location, cell(0, 0));
    assert_eq!(sim.report().responses[0].response_time_s, 80.0);
}

#[test]
fn required_kind_skips_nearer_vehicles_of_the_wrong_kind() {
    let report = ScenarioBuilder::new()
        .station(0, (0, 0))
        .station(1, (0, 5))
        .vehicle(VehicleKind::RapidResponse, 0)
        .vehicle(VehicleKind::Ambulance, 1)
        .call(
            Call::new(0, 0.0, 0.0, 0.0, (0, 1), CallCategory::CatA)
                .with_required_kind(VehicleKind::Ambulance),
        )
        .run();

    assert_eq!(report.responses[0].vehicle_id, VehicleId(1));
    assert_eq!(report.responses[0].travel_time_s, 320.0);
}

#[test]
fn later_call_can_overtake_a_call_waiting_for_another_kind() {
    let report = ScenarioBuilder::new()
        .station(0, (0, 0))
        .vehicle(VehicleKind::RapidResponse, 0)
        .call(
            Call::new(0, 0.0, 0.0, 0.0, (0, 1), CallCategory::Cardiac)
                .with_required_kind(VehicleKind::Ambulance),
        )
        .quick_call(1, 10.0, (0, 1), CallCategory::CatA)
        .run();

    let served: Vec<_> = report.responses.iter().map(|r| r.call_id).collect();
    assert_eq!(served, vec![CallId(1)]);
    assert_eq!(report.diagnostics.waiting_at_end, 1);
    assert_eq!(report.diagnostics.unserved.cardiac, 1);
    // the unserved cardiac call weighs twice in the denominator
    assert_eq!(report.eta_s, SurvivalEfficiency::Defined(1.0 / 3.0));
}

#[test]
fn freed_vehicle_serves_queued_calls_behind_a_blocked_head() {
    let report = ScenarioBuilder::new()
        .station(0, (0, 0))
        .vehicle(VehicleKind::RapidResponse, 0)
        .vehicle(VehicleKind::Ambulance, 0)
        .quick_call(0, 0.0, (0, 1), CallCategory::CatA)
        .call(
            Call::new(1, 1.0, 0.0, 600.0, (0, 10), CallCategory::CatA)
                .with_required_kind(VehicleKind::Ambulance),
        )
        .call(
            Call::new(2, 2.0, 0.0, 0.0, (0, 1), CallCategory::Cardiac)
                .with_required_kind(VehicleKind::Ambulance),
        )
        .quick_call(3, 3.0, (0, 1), CallCategory::CatA)
        .quick_call(4, 200.0, (0, 1), CallCategory::CatA)
        .run();

    let dispatched: Vec<_> = report
        .responses
        .iter()
        .map(|r| (r.call_id, r.vehicle_id, r.dispatched_at_s))
        .collect();
    assert_eq!(
        dispatched,
        vec![
            (CallId(0), VehicleId(0), 0.0),
            (CallId(1), VehicleId(1), 1.0),
            // the car is back at 160 and skips past call 2, which wants an ambulance
            (CallId(3), VehicleId(0), 160.0),
            (CallId(4), VehicleId(0), 320.0),
            // ambulance: 800 s out, 600 s on scene, 800 s back
            (CallId(2), VehicleId(1), 2201.0),
        ]
    );
    assert_eq!(report.diagnostics.deferrals, 3);
    assert_eq!(report.diagnostics.waiting_at_end, 0);
}

#[test]
fn mixed_crew_shares_the_scene_and_only_the_ambulance_transports() {
    let call = Call::new(0, 0.0, 0.0, 600.0, (0, 1), CallCategory::Cardiac)
        .with_need(1, 1)
        .with_transport(Transport {
            hospital: cell(0, 3),
            hospital_time_s: 50.0,
            handover_time_s: 25.0,
        });
    let scenario = ScenarioBuilder::new()
        .station(0, (0, 0))
        .station(1, (0, 5))
        .vehicle(VehicleKind::RapidResponse, 0)
        .vehicle(VehicleKind::Ambulance, 1)
        .call(call);
    let mut sim = scenario.simulation();

    let mut trail = Vec::new();
    while let Some(event) = sim.step().expect("step") {
        let states = sim.vehicle_states();
        trail.push((event.timestamp, event.kind, states[0].status, states[1].status));
    }
    use VehicleStatus::*;
    assert_eq!(
        trail,
        vec![
            (0.0, EventKind::CallArrive, EnRouteToScene, EnRouteToScene),
            (80.0, EventKind::LocUpdate, AtScene, EnRouteToScene),
            (320.0, EventKind::LocUpdate, AtScene, AtScene),
            // both leave 600 s after the car got there
            (680.0, EventKind::SceneDepart, Returning, AtScene),
            (680.0, EventKind::SceneDepart, Returning, Transporting),
            (760.0, EventKind::LocUpdate, Idle, Transporting),
            (915.0, EventKind::JobComplete, Idle, Returning),
            (1075.0, EventKind::LocUpdate, Idle, Idle),
        ]
    );

    let report = sim.report();
    assert_eq!(report.responses.len(), 1);
    // timed by the car, the first to arrive
    assert_eq!(report.responses[0].vehicle_id, VehicleId(0));
    assert_eq!(report.responses[0].response_time_s, 80.0);
    assert_eq!(report.diagnostics.shortfalls, 0);
}

#[test]
fn short_crew_is_sent_and_counted() {
    let report = ScenarioBuilder::new()
        .station(0, (0, 0))
        .ambulance(0)
        .call(Call::new(0, 0.0, 0.0, 0.0, (0, 2), CallCategory::CatA).with_need(2, 1))
        .run();

    assert_eq!(report.responses.len(), 1);
    assert_eq!(report.responses[0].response_time_s, 160.0);
    assert_eq!(report.diagnostics.shortfalls, 1);
    assert_eq!(report.diagnostics.deferrals, 0);
    assert_eq!(report.eta_s, SurvivalEfficiency::Defined(1.0));
}

#[test]
fn warmup_calls_occupy_the_fleet_without_being_scored() {
    let base = ScenarioBuilder::new()
        .station(0, (0, 0))
        .ambulance(0)
        .call(Call::new(0, 500.0, 0.0, 2000.0, (0, 1), CallCategory::Cardiac))
        .quick_call(1, 1000.0, (0, 1), CallCategory::CatA)
        .window(1000.0, 5000.0);

    let warm = base.clone().config(|c| c.with_warmup_secs(1000.0)).run();
    assert_eq!(warm.responses.len(), 1);
    assert_eq!(warm.responses[0].call_id, CallId(1));
    // 580 on scene, 2580 leaves, 2660 home, then 80 s out
    assert_eq!(warm.responses[0].response_time_s, 1740.0);
    assert_eq!(warm.cardiac_count, 0);
    assert_eq!(warm.cat_a_count, 1);
    assert_eq!(warm.eta_s, SurvivalEfficiency::Defined(0.0));

    let cold = base.run();
    assert_eq!(cold.responses[0].response_time_s, 80.0);
    assert_eq!(cold.eta_s, SurvivalEfficiency::Defined(1.0));
}

#[test]
fn calls_outside_the_window_are_ignored() {
    let report = ScenarioBuilder::new()
        .station(0, (0, 0))
        .ambulance(0)
        .quick_call(0, 50.0, (0, 1), CallCategory::Cardiac)
        .quick_call(1, 100.0, (0, 1), CallCategory::CatA)
        .quick_call(2, 200.0, (0, 1), CallCategory::Cardiac)
        .window(100.0, 200.0)
        .run();

    assert_eq!(report.responses.len(), 1);
    assert_eq!(report.cardiac_count, 0);
    assert_eq!(report.cat_a_count, 1);
    assert_eq!(report.diagnostics.events_processed, 4);
}

#[test]
fn horizon_leaves_late_calls_unserved() {
    let report = ScenarioBuilder::new()
        .station(0, (0, 0))
        .ambulance(0)
        .quick_call(0, 0.0, (0, 1), CallCategory::CatA)
        .quick_call(1, 5000.0, (0, 1), CallCategory::CatA)
        .config(|c| c.with_horizon_secs(1000.0))
        .run();

    assert_eq!(report.responses.len(), 1);
    assert_eq!(report.diagnostics.unserved.cat_a, 1);
    assert!(report.diagnostics.final_time_s < 1000.0);
    assert_eq!(report.eta_s, SurvivalEfficiency::Defined(0.5));
}

#[test]
fn speed_is_taken_at_dispatch_time() {
    let mut factors = [1.0; 24];
    factors[1] = 0.5;
    let profile = SpeedProfile::HourOfDay {
        base_kmh: 45.0,
        factors,
    };
    let report = ScenarioBuilder::new()
        .station(0, (0, 0))
        .ambulance(0)
        .quick_call(0, 0.0, (0, 1), CallCategory::CatA)
        .quick_call(1, SECS_PER_HOUR + 60.0, (0, 1), CallCategory::CatA)
        .config(|mut c| {
            c.travel.speed = profile;
            c
        })
        .run();

    assert_eq!(report.responses[0].travel_time_s, 80.0);
    assert_eq!(report.responses[1].travel_time_s, 160.0);
}
