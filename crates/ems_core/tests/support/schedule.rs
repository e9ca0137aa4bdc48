#![allow(dead_code)]

use bevy_ecs::prelude::World;
use bevy_ecs::schedule::Schedule;
use ems_core::clock::Event;
use ems_core::error::SimulationError;
use ems_core::runner::{run_next_event, run_until_empty, simulation_schedule};

/// Helper that owns a reusable `Schedule` so tests can step or drain the event queue.
pub struct ScheduleRunner {
    schedule: Schedule,
}

impl Default for ScheduleRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleRunner {
    pub fn new() -> Self {
        Self {
            schedule: simulation_schedule(),
        }
    }

    /// Run a single event; `None` once the queue is drained.
    pub fn run_one(&mut self, world: &mut World) -> Option<Event> {
        run_next_event(world, &mut self.schedule).expect("step without fault")
    }

    pub fn try_run_full(&mut self, world: &mut World) -> Result<usize, SimulationError> {
        run_until_empty(world, &mut self.schedule, 1_000_000)
    }

    /// Drive the simulation until the event queue is empty.
    pub fn run_full(&mut self, world: &mut World) -> usize {
        self.try_run_full(world).expect("run without fault")
    }
}
