//! Heterogeneous survival efficiency.
//!
//! η_s = (2·Σ s_c + Σ s_a) / (2γ + δ), where s_c is the logistic cardiac-arrest
//! survival curve, s_a is 1 when a category-A call is reached within 8 minutes,
//! γ counts cardiac calls and δ counts category-A calls. Category-C calls are
//! not scored.

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::model::CallCategory;
use crate::telemetry::ResponseRecord;

const CARDIAC_INTERCEPT: f64 = -0.26;
const CARDIAC_SLOPE_PER_MIN: f64 = 0.139;

/// Category-A response target, in minutes (inclusive).
pub const CATEGORY_A_TARGET_MIN: f64 = 8.0;

/// Survival probability of a cardiac arrest reached after `minutes`.
pub fn cardiac_survival(minutes: f64) -> f64 {
    1.0 / (1.0 + (CARDIAC_INTERCEPT + CARDIAC_SLOPE_PER_MIN * minutes).exp())
}

/// 1 if a category-A call is reached within the target, else 0.
pub fn category_a_survival(minutes: f64) -> f64 {
    if minutes <= CATEGORY_A_TARGET_MIN {
        1.0
    } else {
        0.0
    }
}

/// Number of calls per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub cardiac: u64,
    pub cat_a: u64,
    pub cat_c: u64,
}

impl CategoryCounts {
    pub fn add(&mut self, category: CallCategory) {
        match category {
            CallCategory::Cardiac => self.cardiac += 1,
            CallCategory::CatA => self.cat_a += 1,
            CallCategory::CatC => self.cat_c += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.cardiac + self.cat_a + self.cat_c
    }

    pub fn from_categories(categories: impl IntoIterator<Item = CallCategory>) -> Self {
        let mut counts = Self::default();
        for category in categories {
            counts.add(category);
        }
        counts
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurvivalKpi {
    pub eta_s: f64,
    /// Cardiac calls in the denominator.
    pub gamma: u64,
    /// Category-A calls in the denominator.
    pub delta: u64,
    pub cardiac_survival_sum: f64,
    pub cat_a_survival_sum: f64,
}

/// Survival efficiency over served calls only: γ and δ are counted from `records`.
pub fn kpis(records: &[ResponseRecord]) -> Result<SurvivalKpi, SimulationError> {
    kpis_with_unserved(records, CategoryCounts::default())
}

/// Survival efficiency where `unserved` calls count in γ/δ with zero survival.
pub fn kpis_with_unserved(
    records: &[ResponseRecord],
    unserved: CategoryCounts,
) -> Result<SurvivalKpi, SimulationError> {
    let mut gamma = unserved.cardiac;
    let mut delta = unserved.cat_a;
    let mut cardiac_survival_sum = 0.0;
    let mut cat_a_survival_sum = 0.0;

    for record in records {
        let minutes = record.response_minutes();
        match record.category {
            CallCategory::Cardiac => {
                gamma += 1;
                cardiac_survival_sum += cardiac_survival(minutes);
            }
            CallCategory::CatA => {
                delta += 1;
                cat_a_survival_sum += category_a_survival(minutes);
            }
            CallCategory::CatC => {}
        }
    }

    if gamma == 0 && delta == 0 {
        return Err(SimulationError::UndefinedKpi);
    }

    let numerator = 2.0 * cardiac_survival_sum + cat_a_survival_sum;
    let denominator = 2.0 * gamma as f64 + delta as f64;
    Ok(SurvivalKpi {
        eta_s: numerator / denominator,
        gamma,
        delta,
        cardiac_survival_sum,
        cat_a_survival_sum,
    })
}

/// Summary of response times in minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseTimeStats {
    pub mean_min: f64,
    pub median_min: f64,
    pub p90_min: f64,
}

impl ResponseTimeStats {
    /// Statistics over `records`; all zeros when there are none.
    pub fn from_records(records: &[ResponseRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }
        let mut sorted: Vec<f64> = records.iter().map(|r| r.response_minutes()).collect();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let mean_min = sorted.iter().sum::<f64>() / n as f64;
        let median_min = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };
        let p90_idx = ((n - 1) as f64 * 0.9) as usize;
        let p90_min = sorted[p90_idx.min(n - 1)];

        Self {
            mean_min,
            median_min,
            p90_min,
        }
    }
}
