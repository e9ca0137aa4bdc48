#![allow(dead_code)]

use bevy_ecs::prelude::World;
use ems_core::config::{EngineConfig, EngineMode};
use ems_core::ecs::Vehicle;
use ems_core::grid::GridCell;
use ems_core::model::{Call, CallCategory, Fleet, Station, StationId, StationMap, VehicleId, VehicleKind};
use ems_core::scenario::{build_world, SimulationWindow};
use ems_core::simulation::{run, RunReport, Simulation};

/// Builder for small hand-written scenarios.
///
/// Defaults to 1 km cells at a constant 45 km/h, so one Manhattan step takes
/// 80 s, and an unbounded window.
#[derive(Debug, Clone)]
pub struct ScenarioBuilder {
    stations: StationMap,
    fleet: Fleet,
    calls: Vec<Call>,
    window: SimulationWindow,
    config: EngineConfig,
}

impl Default for ScenarioBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioBuilder {
    pub fn new() -> Self {
        Self {
            stations: StationMap::new(),
            fleet: Fleet::new(),
            calls: Vec::new(),
            window: SimulationWindow::unbounded(),
            config: EngineConfig::default().with_constant_speed(1.0, 45.0),
        }
    }

    pub fn station(mut self, id: u32, location: (i32, i32)) -> Self {
        let station = Station::new(id, location);
        self.stations.insert(station.id, station);
        self
    }

    /// Add a vehicle with the next free id at station `home`.
    pub fn vehicle(mut self, kind: VehicleKind, home: u32) -> Self {
        let id = self.fleet.len() as u32;
        self.fleet.insert(VehicleId(id), Vehicle::new(id, kind, StationId(home)));
        self
    }

    pub fn ambulance(self, home: u32) -> Self {
        self.vehicle(VehicleKind::Ambulance, home)
    }

    pub fn call(mut self, call: Call) -> Self {
        self.calls.push(call);
        self
    }

    /// Call with no dispatch delay and no time on scene.
    pub fn quick_call(self, id: u64, arrival_s: f64, scene: (i32, i32), category: CallCategory) -> Self {
        self.call(Call::new(id, arrival_s, 0.0, 0.0, scene, category))
    }

    pub fn window(mut self, start_s: f64, end_s: f64) -> Self {
        self.window = SimulationWindow::new(start_s, end_s);
        self
    }

    pub fn config(mut self, f: impl FnOnce(EngineConfig) -> EngineConfig) -> Self {
        self.config = f(self.config);
        self
    }

    pub fn reduced(self) -> Self {
        self.config(|c| c.with_mode(EngineMode::Reduced))
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn world(&self) -> World {
        build_world(
            &self.calls,
            &self.stations,
            self.fleet.clone(),
            self.window,
            &self.config,
        )
        .expect("valid scenario")
    }

    pub fn simulation(&self) -> Simulation {
        Simulation::new(&self.calls, &self.stations, &self.fleet, self.window, &self.config)
            .expect("valid scenario")
    }

    pub fn run(&self) -> RunReport {
        run(&self.calls, &self.stations, &self.fleet, self.window, &self.config).expect("run")
    }

    pub fn try_run(&self) -> Result<RunReport, ems_core::SimulationError> {
        run(&self.calls, &self.stations, &self.fleet, self.window, &self.config)
    }
}

pub fn cell(row: i32, col: i32) -> GridCell {
    GridCell::new(row, col)
}
