use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::config::EngineMode;
use crate::error::SimulationError;
use crate::grid::GridCell;
use crate::model::{CallId, StationId, VehicleId, VehicleKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Idle,
    EnRouteToScene,
    AtScene,
    Transporting,
    Returning,
}

impl VehicleStatus {
    /// Whether `self → next` is an edge of the vehicle cycle for `mode`.
    pub fn can_transition_to(self, next: VehicleStatus, mode: EngineMode) -> bool {
        use VehicleStatus::*;
        match (self, next) {
            (Idle, EnRouteToScene) => true,
            (EnRouteToScene, AtScene) => mode == EngineMode::Full,
            (EnRouteToScene, Idle) => mode == EngineMode::Reduced,
            (AtScene, Transporting) | (AtScene, Returning) => mode == EngineMode::Full,
            (Transporting, Returning) => mode == EngineMode::Full,
            (Returning, Idle) => mode == EngineMode::Full,
            _ => false,
        }
    }
}

/// A response vehicle. Built idle at its home station; mutated only by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Component, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub kind: VehicleKind,
    pub home_station: StationId,
    pub status: VehicleStatus,
    /// Call currently being served.
    pub assigned_call: Option<CallId>,
}

impl Vehicle {
    pub fn new(id: u32, kind: VehicleKind, home_station: StationId) -> Self {
        Self {
            id: VehicleId(id),
            kind,
            home_station,
            status: VehicleStatus::Idle,
            assigned_call: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == VehicleStatus::Idle
    }

    /// Move along the vehicle cycle, rejecting anything the state machine does not allow.
    pub fn transition(
        &mut self,
        next: VehicleStatus,
        mode: EngineMode,
    ) -> Result<(), SimulationError> {
        if !self.status.can_transition_to(next, mode) {
            return Err(SimulationError::IllegalTransition {
                vehicle: self.id,
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        if next == VehicleStatus::Idle {
            self.assigned_call = None;
        }
        Ok(())
    }
}

/// Current grid location; updated only when a leg ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub struct Position(pub GridCell);
