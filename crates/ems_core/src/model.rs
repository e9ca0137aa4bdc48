//! Input records: calls, stations and the identifiers that tie them to vehicles.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ecs::Vehicle;
use crate::error::InputError;
use crate::grid::GridCell;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(CallId(u64));
id_type!(StationId(u32));
id_type!(VehicleId(u32));

/// Stations keyed by id.
pub type StationMap = BTreeMap<StationId, Station>;

/// Vehicles keyed by id, freshly built for one run.
pub type Fleet = BTreeMap<VehicleId, Vehicle>;

/// Patient category of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CallCategory {
    #[serde(rename = "cardiac")]
    Cardiac,
    /// Life-threatening, non-cardiac.
    #[serde(rename = "catA")]
    CatA,
    /// Non-urgent; consumes capacity but is not scored.
    #[serde(rename = "catC")]
    CatC,
}

impl CallCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            CallCategory::Cardiac => "cardiac",
            CallCategory::CatA => "catA",
            CallCategory::CatC => "catC",
        }
    }
}

impl FromStr for CallCategory {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cardiac" => Ok(CallCategory::Cardiac),
            "catA" => Ok(CallCategory::CatA),
            "catC" => Ok(CallCategory::CatC),
            other => Err(InputError::UnknownCategory(other.to_string())),
        }
    }
}

impl fmt::Display for CallCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleKind {
    #[serde(alias = "A")]
    Ambulance,
    /// Rapid-response car; never transports patients.
    #[serde(alias = "R")]
    RapidResponse,
}

impl VehicleKind {
    pub fn can_transport(self) -> bool {
        matches!(self, VehicleKind::Ambulance)
    }
}

impl FromStr for VehicleKind {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" | "ambulance" => Ok(VehicleKind::Ambulance),
            "R" | "rapid_response" => Ok(VehicleKind::RapidResponse),
            other => Err(InputError::UnknownVehicleKind(other.to_string())),
        }
    }
}

/// How many vehicles of each kind a call asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleNeed {
    #[serde(alias = "A")]
    pub ambulances: u32,
    #[serde(alias = "R")]
    pub rapid_response: u32,
}

impl VehicleNeed {
    pub fn new(ambulances: u32, rapid_response: u32) -> Self {
        Self {
            ambulances,
            rapid_response,
        }
    }

    /// One vehicle of `kind`.
    pub fn one(kind: VehicleKind) -> Self {
        match kind {
            VehicleKind::Ambulance => Self::new(1, 0),
            VehicleKind::RapidResponse => Self::new(0, 1),
        }
    }

    pub fn of(&self, kind: VehicleKind) -> u32 {
        match kind {
            VehicleKind::Ambulance => self.ambulances,
            VehicleKind::RapidResponse => self.rapid_response,
        }
    }

    pub fn total(&self) -> u32 {
        self.ambulances + self.rapid_response
    }
}

/// Hospital leg of a call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transport {
    pub hospital: GridCell,
    pub hospital_time_s: f64,
    pub handover_time_s: f64,
}

/// An emergency call. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub id: CallId,
    /// Seconds on the simulation clock.
    pub arrival_s: f64,
    /// Seconds between dispatch and the vehicle starting to drive.
    pub dispatch_delay_s: f64,
    pub scene_duration_s: f64,
    pub scene: GridCell,
    pub category: CallCategory,
    /// Vehicles to send. `None` sends the single nearest vehicle of any kind.
    #[serde(default)]
    pub need: Option<VehicleNeed>,
    #[serde(default)]
    pub transport: Option<Transport>,
}

impl Call {
    pub fn new(
        id: u64,
        arrival_s: f64,
        dispatch_delay_s: f64,
        scene_duration_s: f64,
        scene: impl Into<GridCell>,
        category: CallCategory,
    ) -> Self {
        Self {
            id: CallId(id),
            arrival_s,
            dispatch_delay_s,
            scene_duration_s,
            scene: scene.into(),
            category,
            need: None,
            transport: None,
        }
    }

    /// Only a vehicle of `kind` may answer.
    pub fn with_required_kind(mut self, kind: VehicleKind) -> Self {
        self.need = Some(VehicleNeed::one(kind));
        self
    }

    pub fn with_need(mut self, ambulances: u32, rapid_response: u32) -> Self {
        self.need = Some(VehicleNeed::new(ambulances, rapid_response));
        self
    }

    /// Vehicles the call still asks for once `sent` have been dispatched.
    pub fn shortfall(&self, sent: VehicleNeed) -> u32 {
        self.need.map_or(0, |need| {
            need.ambulances.saturating_sub(sent.ambulances)
                + need.rapid_response.saturating_sub(sent.rapid_response)
        })
    }

    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn validate(&self) -> Result<(), InputError> {
        if !(self.arrival_s.is_finite() && self.arrival_s >= 0.0) {
            return Err(InputError::InvalidArrivalTime {
                call: self.id,
                arrival_s: self.arrival_s,
            });
        }
        if self.need.is_some_and(|need| need.total() == 0) {
            return Err(InputError::EmptyNeed(self.id));
        }
        let mut durations = vec![
            ("dispatch delay", self.dispatch_delay_s),
            ("scene duration", self.scene_duration_s),
        ];
        if let Some(transport) = &self.transport {
            durations.push(("hospital time", transport.hospital_time_s));
            durations.push(("handover time", transport.handover_time_s));
        }
        for (field, value) in durations {
            if !(value.is_finite() && value >= 0.0) {
                return Err(InputError::InvalidDuration {
                    call: self.id,
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// A base vehicles start from and return to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub location: GridCell,
}

impl Station {
    pub fn new(id: u32, location: impl Into<GridCell>) -> Self {
        Self {
            id: StationId(id),
            location: location.into(),
        }
    }
}
