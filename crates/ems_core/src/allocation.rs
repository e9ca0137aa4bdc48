//! Fleet construction from a per-station allocation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ecs::Vehicle;
use crate::error::InputError;
use crate::model::{Fleet, StationId, StationMap, VehicleKind};

/// How many vehicles of each kind a station hosts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationAllocation {
    #[serde(alias = "A")]
    pub ambulances: u32,
    #[serde(alias = "R")]
    pub rapid_response: u32,
}

impl StationAllocation {
    pub fn new(ambulances: u32, rapid_response: u32) -> Self {
        Self {
            ambulances,
            rapid_response,
        }
    }

    pub fn total(&self) -> u32 {
        self.ambulances + self.rapid_response
    }
}

pub type Allocation = BTreeMap<StationId, StationAllocation>;

/// Build a fresh, idle fleet from `allocation`.
///
/// Ids are dense from 0, in station-id order; within a station ambulances come
/// before rapid-response cars. Every allocated station must exist in `stations`.
pub fn build_vehicles(allocation: &Allocation, stations: &StationMap) -> Result<Fleet, InputError> {
    let mut fleet = Fleet::new();
    let mut next_id = 0u32;
    for (station_id, counts) in allocation {
        if !stations.contains_key(station_id) {
            return Err(InputError::UnknownAllocationStation(*station_id));
        }
        let kinds = std::iter::repeat(VehicleKind::Ambulance)
            .take(counts.ambulances as usize)
            .chain(std::iter::repeat(VehicleKind::RapidResponse).take(counts.rapid_response as usize));
        for kind in kinds {
            let vehicle = Vehicle::new(next_id, kind, *station_id);
            fleet.insert(vehicle.id, vehicle);
            next_id += 1;
        }
    }
    Ok(fleet)
}

/// Total vehicles of each kind in an allocation.
pub fn fleet_size(allocation: &Allocation) -> StationAllocation {
    allocation
        .values()
        .fold(StationAllocation::default(), |acc, counts| StationAllocation {
            ambulances: acc.ambulances + counts.ambulances,
            rapid_response: acc.rapid_response + counts.rapid_response,
        })
}
