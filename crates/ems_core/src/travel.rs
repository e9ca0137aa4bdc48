//! Travel model: grid distance to travel time.
//!
//! Distance is measured in cells by the configured [DistanceMetric], scaled by
//! `cell_km`, and converted to seconds with the speed returned by the
//! [SpeedProfile] for the given moment. Evaluating the model has no side
//! effects, so one instance can be shared by concurrent runs.

use bevy_ecs::prelude::Resource;

use crate::config::TravelConfig;
use crate::error::InputError;
use crate::grid::{DistanceMetric, GridCell};
use crate::traffic::{SpeedProfile, SECS_PER_HOUR};

#[derive(Debug, Clone, PartialEq, Resource)]
pub struct TravelModel {
    cell_km: f64,
    metric: DistanceMetric,
    speed: SpeedProfile,
    /// Added to simulation time before looking up the speed profile.
    clock_offset_s: f64,
}

impl TravelModel {
    pub fn new(cell_km: f64, metric: DistanceMetric, speed: SpeedProfile) -> Result<Self, InputError> {
        if !(cell_km.is_finite() && cell_km > 0.0) {
            return Err(InputError::InvalidTravel(format!(
                "cell size must be positive, got {cell_km}"
            )));
        }
        speed.validate()?;
        Ok(Self {
            cell_km,
            metric,
            speed,
            clock_offset_s: 0.0,
        })
    }

    /// Constant-speed Manhattan model.
    pub fn constant(cell_km: f64, speed_kmh: f64) -> Result<Self, InputError> {
        Self::new(cell_km, DistanceMetric::Manhattan, SpeedProfile::Constant(speed_kmh))
    }

    pub fn from_config(config: &TravelConfig) -> Result<Self, InputError> {
        if !config.clock_offset_s.is_finite() {
            return Err(InputError::InvalidTravel(format!(
                "clock offset must be finite, got {}",
                config.clock_offset_s
            )));
        }
        let mut model = Self::new(config.cell_km, config.metric, config.speed.clone())?;
        model.clock_offset_s = config.clock_offset_s;
        Ok(model)
    }

    pub fn cell_km(&self) -> f64 {
        self.cell_km
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn distance_km(&self, from: GridCell, to: GridCell) -> f64 {
        self.metric.cells(from, to) * self.cell_km
    }

    /// Speed in km/h at simulation time `at`, or the profile's base speed.
    pub fn speed_kmh(&self, at: Option<f64>) -> f64 {
        match at {
            Some(t) => self.speed.speed_at(t + self.clock_offset_s),
            None => self.speed.base_kmh(),
        }
    }

    /// Travel time in seconds from `from` to `to`, departing at `at`.
    pub fn eta(&self, from: GridCell, to: GridCell, at: Option<f64>) -> f64 {
        let distance_km = self.distance_km(from, to);
        if distance_km == 0.0 {
            return 0.0;
        }
        distance_km / self.speed_kmh(at) * SECS_PER_HOUR
    }
}

impl Default for TravelModel {
    fn default() -> Self {
        Self {
            cell_km: crate::config::DEFAULT_CELL_KM,
            metric: DistanceMetric::default(),
            speed: SpeedProfile::default(),
            clock_offset_s: 0.0,
        }
    }
}
