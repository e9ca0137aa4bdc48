//! Candidate plans and the gene encoding used to search over them.
//!
//! A candidate fixes where every station sits and how many vehicles of each
//! kind it hosts. [CandidateSpace] maps a flat vector of genes in `[0, 1]` to
//! a candidate, so any optimizer that works on real vectors can drive it.

use ems_core::allocation::{build_vehicles, fleet_size, Allocation, StationAllocation};
use ems_core::grid::{GRID_COLS, GRID_ROWS};
use ems_core::model::{Fleet, Station, StationId, StationMap};
use ems_core::InputError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub candidate_id: usize,
    pub stations: StationMap,
    pub allocation: Allocation,
}

impl Candidate {
    pub fn new(candidate_id: usize, stations: StationMap, allocation: Allocation) -> Self {
        Self {
            candidate_id,
            stations,
            allocation,
        }
    }

    /// A fresh idle fleet for one run.
    pub fn fleet(&self) -> Result<Fleet, InputError> {
        build_vehicles(&self.allocation, &self.stations)
    }

    pub fn fleet_size(&self) -> StationAllocation {
        fleet_size(&self.allocation)
    }
}

/// Search space: some stations may move, and a fixed number of vehicles is
/// spread over all stations.
///
/// Gene layout: `(row, col)` per movable station, then one gene for the
/// ambulance share (absent when the fleet mix is fixed), then one station
/// gene per vehicle, ambulances first.
#[derive(Debug, Clone)]
pub struct CandidateSpace {
    base: StationMap,
    movable: Vec<StationId>,
    rows: i32,
    cols: i32,
    total_vehicles: u32,
    fleet_mix: Option<StationAllocation>,
}

impl CandidateSpace {
    pub fn new(base: StationMap, movable: Vec<u32>, total_vehicles: u32) -> Self {
        Self {
            base,
            movable: movable.into_iter().map(StationId).collect(),
            rows: GRID_ROWS,
            cols: GRID_COLS,
            total_vehicles,
            fleet_mix: None,
        }
    }

    pub fn with_grid(mut self, rows: i32, cols: i32) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// Fix the fleet mix instead of searching over it. Overrides the total.
    pub fn with_fleet_mix(mut self, ambulances: u32, rapid_response: u32) -> Self {
        self.fleet_mix = Some(StationAllocation::new(ambulances, rapid_response));
        self.total_vehicles = ambulances + rapid_response;
        self
    }

    pub fn gene_count(&self) -> usize {
        2 * self.movable.len() + usize::from(self.fleet_mix.is_none()) + self.total_vehicles as usize
    }

    /// Decode `genes` into a candidate. `None` if the gene count is wrong or
    /// there are no stations to allocate to.
    pub fn decode(&self, candidate_id: usize, genes: &[f64]) -> Option<Candidate> {
        if genes.len() != self.gene_count() {
            return None;
        }
        let mut genes = genes.iter().map(|g| g.clamp(0.0, 1.0));
        let mut next = move || genes.next().unwrap_or(0.0);

        let mut stations = self.base.clone();
        for id in &self.movable {
            let row = scale(next(), self.rows - 1) as i32;
            let col = scale(next(), self.cols - 1) as i32;
            stations.insert(*id, Station::new(id.0, (row, col)));
        }
        if stations.is_empty() {
            return None;
        }

        let mix = match self.fleet_mix {
            Some(mix) => mix,
            None => {
                let ambulances = scale(next(), self.total_vehicles as i32) as u32;
                StationAllocation::new(ambulances, self.total_vehicles - ambulances)
            }
        };

        let station_ids: Vec<StationId> = stations.keys().copied().collect();
        let last = station_ids.len() as i32 - 1;
        let mut allocation: Allocation = station_ids
            .iter()
            .map(|id| (*id, StationAllocation::default()))
            .collect();
        for _ in 0..mix.ambulances {
            let id = station_ids[scale(next(), last)];
            allocation.entry(id).or_default().ambulances += 1;
        }
        for _ in 0..mix.rapid_response {
            let id = station_ids[scale(next(), last)];
            allocation.entry(id).or_default().rapid_response += 1;
        }

        Some(Candidate::new(candidate_id, stations, allocation))
    }

    /// `count` uniformly random candidates, reproducible for a given seed.
    pub fn sample(&self, count: usize, seed: u64) -> Vec<Candidate> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .filter_map(|id| {
                let genes: Vec<f64> = (0..self.gene_count()).map(|_| rng.gen()).collect();
                self.decode(id, &genes)
            })
            .collect()
    }
}

/// Map a gene in `[0, 1]` to an integer in `0..=max`.
fn scale(gene: f64, max: i32) -> usize {
    (gene * f64::from(max.max(0))).round() as usize
}
