mod support;

use ems_core::ecs::{Vehicle, VehicleStatus};
use ems_core::model::{Call, CallCategory, CallId, Fleet, Station, StationId, StationMap, VehicleId, VehicleKind};
use ems_core::{run, EngineConfig, InputError, SimulationError, SimulationWindow};

use support::scenario::ScenarioBuilder;

fn invalid(report: Result<ems_core::RunReport, SimulationError>) -> InputError {
    match report {
        Err(SimulationError::InvalidInput(error)) => error,
        other => panic!("expected invalid input, got {other:?}"),
    }
}

#[test]
fn negative_arrival_time_is_rejected() {
    let scenario = ScenarioBuilder::new()
        .station(0, (0, 0))
        .ambulance(0)
        .quick_call(0, -5.0, (0, 1), CallCategory::CatA);
    assert!(matches!(
        invalid(scenario.try_run()),
        InputError::InvalidArrivalTime { call: CallId(0), .. }
    ));
}

#[test]
fn negative_scene_duration_is_rejected() {
    let scenario = ScenarioBuilder::new()
        .station(0, (0, 0))
        .ambulance(0)
        .call(Call::new(0, 0.0, 0.0, -1.0, (0, 1), CallCategory::CatA));
    assert!(matches!(
        invalid(scenario.try_run()),
        InputError::InvalidDuration { field: "scene duration", .. }
    ));
}

#[test]
fn duplicate_call_ids_are_rejected() {
    let scenario = ScenarioBuilder::new()
        .station(0, (0, 0))
        .ambulance(0)
        .quick_call(4, 0.0, (0, 1), CallCategory::CatA)
        .quick_call(4, 9.0, (0, 2), CallCategory::Cardiac);
    assert_eq!(invalid(scenario.try_run()), InputError::DuplicateCall(CallId(4)));
}

#[test]
fn calls_need_stations_and_vehicles() {
    let no_vehicles = ScenarioBuilder::new()
        .station(0, (0, 0))
        .quick_call(0, 0.0, (0, 1), CallCategory::CatA);
    assert_eq!(invalid(no_vehicles.try_run()), InputError::NoVehicles);

    let calls = [Call::new(0, 0.0, 0.0, 0.0, (0, 1), CallCategory::CatA)];
    let mut fleet = Fleet::new();
    fleet.insert(VehicleId(0), Vehicle::new(0, VehicleKind::Ambulance, StationId(0)));
    let result = run(
        &calls,
        &StationMap::new(),
        &fleet,
        SimulationWindow::unbounded(),
        &EngineConfig::default(),
    );
    assert_eq!(invalid(result), InputError::NoStations);
}

#[test]
fn vehicle_with_unknown_home_station_is_rejected() {
    let scenario = ScenarioBuilder::new()
        .station(0, (0, 0))
        .ambulance(7)
        .quick_call(0, 0.0, (0, 1), CallCategory::CatA);
    assert_eq!(
        invalid(scenario.try_run()),
        InputError::UnknownHomeStation {
            vehicle: VehicleId(0),
            station: StationId(7),
        }
    );
}

#[test]
fn busy_vehicle_is_rejected() {
    let mut stations = StationMap::new();
    stations.insert(StationId(0), Station::new(0, (0, 0)));
    let mut vehicle = Vehicle::new(0, VehicleKind::Ambulance, StationId(0));
    vehicle.status = VehicleStatus::AtScene;
    let mut fleet = Fleet::new();
    fleet.insert(vehicle.id, vehicle);

    let result = run(&[], &stations, &fleet, SimulationWindow::unbounded(), &EngineConfig::default());
    assert!(matches!(invalid(result), InputError::VehicleNotIdle { .. }));
}

#[test]
fn inverted_window_is_rejected() {
    let scenario = ScenarioBuilder::new()
        .station(0, (0, 0))
        .ambulance(0)
        .window(100.0, 10.0);
    assert!(matches!(
        invalid(scenario.try_run()),
        InputError::InvalidWindow { .. }
    ));
}

#[test]
fn invalid_speed_is_rejected() {
    let scenario = ScenarioBuilder::new()
        .station(0, (0, 0))
        .ambulance(0)
        .config(|c| c.with_constant_speed(1.0, 0.0));
    assert!(matches!(invalid(scenario.try_run()), InputError::InvalidTravel(_)));
}

#[test]
fn zero_step_limit_is_rejected_before_calls_go_unserved() {
    let scenario = ScenarioBuilder::new()
        .station(0, (0, 0))
        .ambulance(0)
        .quick_call(0, 0.0, (0, 1), CallCategory::Cardiac)
        .config(|c| c.with_max_steps(0));
    assert!(matches!(invalid(scenario.try_run()), InputError::InvalidConfig(_)));
}

#[test]
fn no_calls_is_a_valid_but_undefined_run() {
    let report = ScenarioBuilder::new().station(0, (0, 0)).ambulance(0).run();
    assert!(report.responses.is_empty());
    assert_eq!(report.fitness(), Err(SimulationError::UndefinedKpi));
}
