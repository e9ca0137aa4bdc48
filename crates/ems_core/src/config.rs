//! Engine configuration.
//!
//! All fields have defaults, so a configuration document only needs to name
//! what it changes:
//!
//! ```toml
//! mode = "full"
//! warmup_s = 5400.0
//!
//! [travel]
//! cell_km = 2.0
//! metric = "manhattan"
//! speed = { constant = 45.0 }
//! ```

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, InputError};
use crate::grid::DistanceMetric;
use crate::traffic::SpeedProfile;
use crate::travel::TravelModel;

pub const DEFAULT_CELL_KM: f64 = 2.0;
pub const DEFAULT_MAX_STEPS: usize = 10_000_000;

/// Which vehicle cycle the engine runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Resource)]
#[serde(rename_all = "snake_case")]
pub enum EngineMode {
    /// idle → en route → at scene → (transporting) → returning → idle.
    #[default]
    Full,
    /// idle → en route → idle: the vehicle jumps to the scene and is free again at once.
    Reduced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelConfig {
    pub cell_km: f64,
    pub metric: DistanceMetric,
    pub speed: SpeedProfile,
    /// Offset (seconds) added to simulation time when looking up time-varying speeds.
    pub clock_offset_s: f64,
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self {
            cell_km: DEFAULT_CELL_KM,
            metric: DistanceMetric::Manhattan,
            speed: SpeedProfile::default(),
            clock_offset_s: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub mode: EngineMode,
    pub travel: TravelConfig,
    /// Calls in `[t_start - warmup_s, t_start)` are simulated but not scored.
    pub warmup_s: f64,
    /// Events at or after this time are not processed.
    pub horizon_s: Option<f64>,
    pub max_steps: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: EngineMode::Full,
            travel: TravelConfig::default(),
            warmup_s: 0.0,
            horizon_s: None,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML configuration document.
    pub fn from_toml_str(doc: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(doc)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_mode(mut self, mode: EngineMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_travel(mut self, travel: TravelConfig) -> Self {
        self.travel = travel;
        self
    }

    /// Constant speed with the given cell size, keeping the configured metric.
    pub fn with_constant_speed(mut self, cell_km: f64, speed_kmh: f64) -> Self {
        self.travel.cell_km = cell_km;
        self.travel.speed = SpeedProfile::Constant(speed_kmh);
        self
    }

    pub fn with_warmup_secs(mut self, warmup_s: f64) -> Self {
        self.warmup_s = warmup_s;
        self
    }

    pub fn with_horizon_secs(mut self, horizon_s: f64) -> Self {
        self.horizon_s = Some(horizon_s);
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn validate(&self) -> Result<(), InputError> {
        TravelModel::from_config(&self.travel)?;
        if !(self.warmup_s.is_finite() && self.warmup_s >= 0.0) {
            return Err(InputError::InvalidConfig(format!(
                "warm-up must be a non-negative number of seconds, got {}",
                self.warmup_s
            )));
        }
        if let Some(horizon) = self.horizon_s {
            if horizon.is_nan() {
                return Err(InputError::InvalidConfig("horizon is NaN".to_string()));
            }
        }
        if self.max_steps == 0 {
            return Err(InputError::InvalidConfig(
                "max_steps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_full_mode_two_km_cells_45_kmh() {
        let config = EngineConfig::default();
        assert_eq!(config.mode, EngineMode::Full);
        assert_eq!(config.travel.cell_km, 2.0);
        assert_eq!(config.travel.speed, SpeedProfile::Constant(45.0));
        assert_eq!(config.warmup_s, 0.0);
        assert!(config.horizon_s.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_partial_toml_document() {
        let doc = r#"
            mode = "reduced"
            warmup_s = 5400.0

            [travel]
            cell_km = 1.0
            metric = "octile"
            speed = { constant = 60.0 }
        "#;
        let config = EngineConfig::from_toml_str(doc).expect("config");
        assert_eq!(config.mode, EngineMode::Reduced);
        assert_eq!(config.warmup_s, 5400.0);
        assert_eq!(config.travel.cell_km, 1.0);
        assert_eq!(config.travel.metric, DistanceMetric::Octile);
        assert_eq!(config.travel.speed, SpeedProfile::Constant(60.0));
        assert_eq!(config.max_steps, DEFAULT_MAX_STEPS);
    }

    #[test]
    fn empty_document_is_default() {
        let config = EngineConfig::from_toml_str("").expect("config");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn rejects_invalid_values() {
        let bad_speed = "[travel]\nspeed = { constant = 0.0 }\n";
        assert!(matches!(
            EngineConfig::from_toml_str(bad_speed),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("mode = \"teleport\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(EngineConfig::default().with_warmup_secs(-1.0).validate().is_err());
    }

    #[test]
    fn engine_settings_report_as_config_errors() {
        let warmup = EngineConfig::default().with_warmup_secs(-1.0).validate();
        assert!(matches!(warmup, Err(InputError::InvalidConfig(ref m)) if m.contains("warm-up")));

        let horizon = EngineConfig::default().with_horizon_secs(f64::NAN).validate();
        assert!(matches!(horizon, Err(InputError::InvalidConfig(_))));

        let no_steps = EngineConfig::default().with_max_steps(0).validate();
        assert!(matches!(no_steps, Err(InputError::InvalidConfig(ref m)) if m.contains("max_steps")));
        assert!(matches!(
            EngineConfig::from_toml_str("max_steps = 0"),
            Err(ConfigError::Invalid(InputError::InvalidConfig(_)))
        ));
        assert!(EngineConfig::default().with_max_steps(1).validate().is_ok());
    }
}
