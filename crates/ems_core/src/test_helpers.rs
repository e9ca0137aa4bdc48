//! Test helpers: seeded synthetic call streams and small station layouts.
//!
//! Shared by unit tests, integration tests, the benchmark and the experiments
//! crate, so every caller generates the same scenario for the same seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::allocation::{Allocation, StationAllocation};
use crate::grid::{GridCell, GRID_COLS, GRID_ROWS};
use crate::model::{Call, CallCategory, Station, StationMap, Transport};

/// Parameters for a synthetic call stream.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticCalls {
    pub seed: u64,
    pub count: usize,
    pub start_s: f64,
    /// Mean of the exponential inter-arrival time.
    pub mean_interarrival_s: f64,
    pub rows: i32,
    pub cols: i32,
    pub cardiac_share: f64,
    pub cat_a_share: f64,
    pub dispatch_delay_s: f64,
    pub scene_duration_s: f64,
    /// When set, every call carries a hospital leg to this cell.
    pub hospital: Option<GridCell>,
}

impl Default for SyntheticCalls {
    fn default() -> Self {
        Self {
            seed: 42,
            count: 200,
            start_s: 0.0,
            mean_interarrival_s: 180.0,
            rows: GRID_ROWS,
            cols: GRID_COLS,
            cardiac_share: 0.1,
            cat_a_share: 0.5,
            dispatch_delay_s: 30.0,
            scene_duration_s: 600.0,
            hospital: None,
        }
    }
}

impl SyntheticCalls {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_hospital(mut self, hospital: GridCell) -> Self {
        self.hospital = Some(hospital);
        self
    }

    /// Generate the calls, in arrival order, with ids `0..count`.
    pub fn generate(&self) -> Vec<Call> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut t = self.start_s;
        (0..self.count)
            .map(|i| {
                let u: f64 = rng.gen();
                t += -self.mean_interarrival_s * (1.0 - u).ln();
                let scene = GridCell::new(rng.gen_range(0..self.rows), rng.gen_range(0..self.cols));
                let draw: f64 = rng.gen();
                let category = if draw < self.cardiac_share {
                    CallCategory::Cardiac
                } else if draw < self.cardiac_share + self.cat_a_share {
                    CallCategory::CatA
                } else {
                    CallCategory::CatC
                };
                let call = Call::new(
                    i as u64,
                    t,
                    self.dispatch_delay_s,
                    self.scene_duration_s,
                    scene,
                    category,
                );
                match self.hospital {
                    Some(hospital) => call.with_transport(Transport {
                        hospital,
                        hospital_time_s: 900.0,
                        handover_time_s: 300.0,
                    }),
                    None => call,
                }
            })
            .collect()
    }
}

/// Four stations spread over the study grid.
pub fn default_stations() -> StationMap {
    [
        Station::new(0, (10, 10)),
        Station::new(1, (9, 12)),
        Station::new(2, (12, 9)),
        Station::new(3, (7, 7)),
    ]
    .into_iter()
    .map(|s| (s.id, s))
    .collect()
}

/// The same allocation at every station.
pub fn uniform_allocation(stations: &StationMap, ambulances: u32, rapid_response: u32) -> Allocation {
    stations
        .keys()
        .map(|id| (*id, StationAllocation::new(ambulances, rapid_response)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_calls() {
        let a = SyntheticCalls::default().with_count(50).generate();
        let b = SyntheticCalls::default().with_count(50).generate();
        assert_eq!(a, b);
        let c = SyntheticCalls::default().with_count(50).with_seed(7).generate();
        assert_ne!(a, c);
    }

    #[test]
    fn calls_are_valid_and_ordered() {
        let calls = SyntheticCalls::default().generate();
        assert_eq!(calls.len(), 200);
        assert!(calls.iter().all(|c| c.validate().is_ok()));
        assert!(calls.windows(2).all(|w| w[0].arrival_s <= w[1].arrival_s));
        assert!(calls
            .iter()
            .all(|c| (0..GRID_ROWS).contains(&c.scene.row) && (0..GRID_COLS).contains(&c.scene.col)));
    }

    #[test]
    fn uniform_allocation_covers_every_station() {
        let stations = default_stations();
        let allocation = uniform_allocation(&stations, 2, 1);
        assert_eq!(allocation.len(), 4);
        assert!(allocation.values().all(|a| a.total() == 3));
    }
}
