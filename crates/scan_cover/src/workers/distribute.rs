//! Balanced latitude/longitude slicing of a cover into worker buckets.
use tracing::debug;

use crate::geo::{LatLon, Region};
use crate::workers::{WorkerAssignment, WorkerGrid};

/// Sizes of `parts` consecutive slices of `n` items, differing by at most one.
///
/// Leading slices take the extra items.
pub fn balanced_sizes(n: usize, parts: usize) -> Vec<usize> {
    if parts == 0 {
        return Vec::new();
    }
    let base = n / parts;
    let extra = n % parts;
    (0..parts).map(|i| base + usize::from(i < extra)).collect()
}

fn split_by_sizes<T>(items: Vec<T>, sizes: &[usize]) -> Vec<Vec<T>> {
    let mut out: Vec<Vec<T>> = Vec::with_capacity(sizes.len());
    let mut rest = items.into_iter();
    for &size in sizes {
        out.push(rest.by_ref().take(size).collect());
    }
    // Anything the sizes did not account for stays with the last slice.
    if let Some(last) = out.last_mut() {
        last.extend(rest);
    }
    out
}

/// Partition `points` into `grid.rows x grid.columns` buckets.
///
/// Points are sorted by latitude and cut into row groups, each row group is
/// sorted by longitude and cut into column groups. Every bucket is ordered by
/// distance from its worker's start coordinate in `region`. Empty buckets are
/// left out, so the result may hold fewer than `grid.workers()` entries.
pub fn distribute(points: &[LatLon], grid: WorkerGrid, region: &Region) -> Vec<WorkerAssignment> {
    if points.is_empty() || grid.rows == 0 || grid.columns == 0 {
        return Vec::new();
    }

    let mut by_lat = points.to_vec();
    by_lat.sort_by(|a, b| a.lat.total_cmp(&b.lat).then(a.lon.total_cmp(&b.lon)));

    let row_groups = split_by_sizes(by_lat, &balanced_sizes(points.len(), grid.rows));

    let mut out = Vec::with_capacity(grid.workers());
    for (row, mut group) in row_groups.into_iter().enumerate() {
        group.sort_by(|a, b| a.lon.total_cmp(&b.lon).then(a.lat.total_cmp(&b.lat)));
        let sizes = balanced_sizes(group.len(), grid.columns);
        for (column, bucket) in split_by_sizes(group, &sizes).into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            out.push(WorkerAssignment::new(grid.worker_no(row, column), grid, region, bucket));
        }
    }

    debug!(
        "Distributed {} scan points over {} of {} workers.",
        points.len(),
        out.len(),
        grid.workers()
    );
    out
}
