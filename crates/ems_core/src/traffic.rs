//! Speed profiles: constant speed, hour-of-day factors, or a minute-of-week table.
//!
//! A profile only answers "how fast do vehicles drive at this moment". It knows
//! nothing about grid geometry, so the travel model can combine it with any
//! distance metric.

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Lower bound applied to time-varying speeds (km/h).
pub const MIN_SPEED_KMH: f64 = 5.0;

pub const SECS_PER_HOUR: f64 = 3600.0;
pub const MINUTES_PER_WEEK: usize = 7 * 24 * 60;

/// Default free-flow speed (km/h).
pub const DEFAULT_SPEED_KMH: f64 = 45.0;

/// Vehicle speed as a function of simulation time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedProfile {
    /// Same speed at all times.
    Constant(f64),
    /// Base speed scaled by a per-hour factor (index 0 = midnight).
    HourOfDay { base_kmh: f64, factors: [f64; 24] },
    /// One speed per minute of the week, indexed from the start of the week.
    MinuteOfWeek(Vec<f64>),
}

impl Default for SpeedProfile {
    fn default() -> Self {
        SpeedProfile::Constant(DEFAULT_SPEED_KMH)
    }
}

impl SpeedProfile {
    /// Urban weekday pattern with morning and evening rush hours.
    ///
    /// - 00–06: 1.0  (free flow)
    /// - 07–08: 0.45 (morning rush)
    /// - 09–15: 0.65 (midday)
    /// - 16–18: 0.40 (evening rush)
    /// - 19–23: 0.75 (evening)
    pub fn urban(base_kmh: f64) -> Self {
        let mut f = [1.0_f64; 24];
        f[7] = 0.45;
        f[8] = 0.45;
        for slot in &mut f[9..16] {
            *slot = 0.65;
        }
        for slot in &mut f[16..19] {
            *slot = 0.40;
        }
        for slot in &mut f[19..24] {
            *slot = 0.75;
        }
        SpeedProfile::HourOfDay {
            base_kmh,
            factors: f,
        }
    }

    /// Speed used when no time is supplied.
    pub fn base_kmh(&self) -> f64 {
        match self {
            SpeedProfile::Constant(kmh) => *kmh,
            SpeedProfile::HourOfDay { base_kmh, .. } => *base_kmh,
            SpeedProfile::MinuteOfWeek(speeds) => {
                let mean = speeds.iter().sum::<f64>() / speeds.len().max(1) as f64;
                mean.max(MIN_SPEED_KMH)
            }
        }
    }

    /// Instantaneous speed at `clock_s` seconds on the profile's clock.
    pub fn speed_at(&self, clock_s: f64) -> f64 {
        match self {
            SpeedProfile::Constant(kmh) => *kmh,
            SpeedProfile::HourOfDay { base_kmh, factors } => {
                let hour = (clock_s / SECS_PER_HOUR).floor() as i64;
                let idx = hour.rem_euclid(24) as usize;
                (base_kmh * factors[idx]).max(MIN_SPEED_KMH)
            }
            SpeedProfile::MinuteOfWeek(speeds) => {
                let minute = (clock_s / 60.0).floor() as i64;
                let idx = minute.rem_euclid(MINUTES_PER_WEEK as i64) as usize;
                speeds
                    .get(idx)
                    .copied()
                    .unwrap_or(MIN_SPEED_KMH)
                    .max(MIN_SPEED_KMH)
            }
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        match self {
            SpeedProfile::Constant(kmh) if !positive(*kmh) => Err(InputError::InvalidTravel(
                format!("constant speed must be positive, got {kmh}"),
            )),
            SpeedProfile::HourOfDay { base_kmh, factors } => {
                if !positive(*base_kmh) {
                    return Err(InputError::InvalidTravel(format!(
                        "base speed must be positive, got {base_kmh}"
                    )));
                }
                if let Some(bad) = factors.iter().find(|f| !positive(**f)) {
                    return Err(InputError::InvalidTravel(format!(
                        "hourly factor must be positive, got {bad}"
                    )));
                }
                Ok(())
            }
            SpeedProfile::MinuteOfWeek(speeds) => {
                if speeds.len() != MINUTES_PER_WEEK {
                    return Err(InputError::InvalidTravel(format!(
                        "minute-of-week table needs {MINUTES_PER_WEEK} entries, got {}",
                        speeds.len()
                    )));
                }
                if speeds.iter().any(|s| !s.is_finite()) {
                    return Err(InputError::InvalidTravel(
                        "minute-of-week table contains a non-finite speed".to_string(),
                    ));
                }
                Ok(())
            }
            SpeedProfile::Constant(_) => Ok(()),
        }
    }
}
