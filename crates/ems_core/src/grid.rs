//! Grid geometry: cells addressed by (row, column) and lattice distances.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Rows of the default study-area grid (cells of 2 km).
pub const GRID_ROWS: i32 = 26;
/// Columns of the default study-area grid.
pub const GRID_COLS: i32 = 22;

/// A cell on the city grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    pub row: i32,
    pub col: i32,
}

impl GridCell {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// City-block distance in cells.
    pub fn manhattan_distance(self, other: GridCell) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// 8-neighbour distance in cells: diagonal steps cost sqrt(2), straight steps cost 1.
    pub fn octile_distance(self, other: GridCell) -> f64 {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        let diagonal = dr.min(dc) as f64;
        let straight = dr.abs_diff(dc) as f64;
        diagonal * std::f64::consts::SQRT_2 + straight
    }
}

impl From<(i32, i32)> for GridCell {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// How lattice distance between two cells is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    #[default]
    Manhattan,
    Octile,
}

impl DistanceMetric {
    /// Distance between two cells, in cells.
    pub fn cells(self, a: GridCell, b: GridCell) -> f64 {
        match self {
            DistanceMetric::Manhattan => f64::from(a.manhattan_distance(b)),
            DistanceMetric::Octile => a.octile_distance(b),
        }
    }
}
