//! Splitting scan points across a grid of independent workers.
use serde::{Deserialize, Serialize};

use crate::geo::{haversine_m, LatLon, Region};

pub mod distribute;
pub mod hexgrid;

pub use distribute::{balanced_sizes, distribute};
pub use hexgrid::hex_grid_points;

/// Shape of the worker grid: `rows` south to north, `columns` west to east.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerGrid {
    pub rows: usize,
    pub columns: usize,
}

impl WorkerGrid {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.rows * self.columns
    }

    /// Row-major worker number of the cell `(row, column)`.
    #[inline]
    pub fn worker_no(&self, row: usize, column: usize) -> usize {
        row * self.columns + column
    }
}

impl Default for WorkerGrid {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// The ordered scan route of one worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerAssignment {
    pub worker_no: usize,
    /// Where the worker starts; the route is ordered by distance from here.
    pub start: LatLon,
    pub points: Vec<LatLon>,
}

impl WorkerAssignment {
    /// Builds an assignment for `worker_no`, sorting `points` by distance from its start.
    pub fn new(worker_no: usize, grid: WorkerGrid, region: &Region, mut points: Vec<LatLon>) -> Self {
        let start = region.worker_start(worker_no, grid.rows, grid.columns);
        points.sort_by(|a, b| haversine_m(*a, start).total_cmp(&haversine_m(*b, start)));
        Self {
            worker_no,
            start,
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Drops the routes of the worker assignment, keeping only the point lists.
pub fn into_point_lists(assignments: Vec<WorkerAssignment>) -> Vec<Vec<LatLon>> {
    assignments.into_iter().map(|a| a.points).collect()
}
