//! Region-filling hexagonal lattice of scan points.
//!
//! Used for regions with no known spawn points yet. Circles of radius `R` sit
//! `R·√3` apart along a row and rows sit `1.5·R` apart, with odd rows shifted
//! west by half a spacing; this triangular lattice leaves no gap.
use crate::geo::{destination, LatLon, Region};
use crate::workers::{WorkerAssignment, WorkerGrid};

/// Degrees between neighbouring lattice points `(lat_gain, lon_gain)`, measured at the region center.
pub fn lattice_gains(region: &Region, radius_m: f64) -> (f64, f64) {
    let center = region.center();
    let base = radius_m * 3f64.sqrt();
    let height = base * 3f64.sqrt() / 2.0;
    let north = destination(center, 0.0, height);
    let east = destination(center, 90.0, base);
    ((north.lat - center.lat).abs(), (east.lon - center.lon).abs())
}

/// Lattice points covering `region`, grouped per worker cell and ordered from each worker's start.
///
/// Workers whose cell received no point are left out.
pub fn hex_grid_points(region: &Region, radius_m: f64, grid: WorkerGrid) -> Vec<WorkerAssignment> {
    if !(radius_m > 0.0) || grid.rows == 0 || grid.columns == 0 {
        return Vec::new();
    }
    let (lat_gain, lon_gain) = lattice_gains(region, radius_m);
    if !(lat_gain > 0.0) || !(lon_gain > 0.0) {
        return Vec::new();
    }

    let sw = region.south_west();
    let ne = region.north_east();
    // One row and one column past the far edges so the lattice hull contains the region.
    let n_rows = ((ne.lat - sw.lat) / lat_gain).ceil() as usize + 1;
    let n_columns = ((ne.lon - sw.lon) / lon_gain).ceil() as usize + 1;

    let mut buckets: Vec<Vec<LatLon>> = vec![Vec::new(); grid.workers()];
    for map_row in 0..n_rows {
        let lat = sw.lat + map_row as f64 * lat_gain;
        let row_start_lon = if map_row % 2 == 1 {
            sw.lon - 0.5 * lon_gain
        } else {
            sw.lon
        };
        let grid_row = (map_row * grid.rows / n_rows).min(grid.rows - 1);

        let mut map_col = 0usize;
        loop {
            let lon = row_start_lon + map_col as f64 * lon_gain;
            let grid_col = (map_col * grid.columns / n_columns).min(grid.columns - 1);
            buckets[grid.worker_no(grid_row, grid_col)].push(LatLon::new(lat, lon));
            if lon >= ne.lon {
                break;
            }
            map_col += 1;
        }
    }

    buckets
        .into_iter()
        .enumerate()
        .filter(|(_, points)| !points.is_empty())
        .map(|(worker_no, points)| WorkerAssignment::new(worker_no, grid, region, points))
        .collect()
}
