use bevy_ecs::prelude::Entity;

use crate::grid::GridCell;
use crate::model::{Call, VehicleId, VehicleKind};
use crate::travel::TravelModel;

/// An idle vehicle offered to a dispatch policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchCandidate {
    pub entity: Entity,
    pub vehicle_id: VehicleId,
    pub kind: VehicleKind,
    pub location: GridCell,
}

/// Trait for policies that pick which idle vehicles answer a call.
///
/// The engine only ever offers vehicles whose status is idle, sorted by vehicle
/// id. The returned vehicles are all sent; returning none defers the call to
/// the waiting queue. A policy may send fewer vehicles than the call asks for.
///
/// # Examples
///
/// ```rust
/// use bevy_ecs::prelude::Entity;
/// use ems_core::dispatch::{DispatchCandidate, DispatchPolicy, NearestIdle};
/// use ems_core::grid::GridCell;
/// use ems_core::model::{Call, CallCategory, VehicleId, VehicleKind};
/// use ems_core::travel::TravelModel;
///
/// let travel = TravelModel::constant(1.0, 45.0).unwrap();
/// let call = Call::new(0, 0.0, 0.0, 0.0, (11, 10), CallCategory::Cardiac).with_need(1, 1);
/// let candidates = [
///     DispatchCandidate {
///         entity: Entity::from_raw(0),
///         vehicle_id: VehicleId(0),
///         kind: VehicleKind::Ambulance,
///         location: GridCell::new(10, 10),
///     },
///     DispatchCandidate {
///         entity: Entity::from_raw(1),
///         vehicle_id: VehicleId(1),
///         kind: VehicleKind::RapidResponse,
///         location: GridCell::new(11, 11),
///     },
/// ];
/// let chosen = NearestIdle.select(&call, &candidates, &travel, 0.0);
/// let ids: Vec<_> = chosen.iter().map(|c| c.vehicle_id).collect();
/// assert_eq!(ids, vec![VehicleId(0), VehicleId(1)]);
/// ```
pub trait DispatchPolicy: Send + Sync {
    /// Choose vehicles for `call` among `candidates` at simulation time `now_s`.
    fn select<'a>(
        &self,
        call: &Call,
        candidates: &'a [DispatchCandidate],
        travel: &TravelModel,
        now_s: f64,
    ) -> Vec<&'a DispatchCandidate>;

    fn name(&self) -> &'static str;
}
