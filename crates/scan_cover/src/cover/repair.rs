//! Safety net run after greedy selection: every spawn point must be within the
//! full scan radius of some selected circle, measured by great-circle distance.
use tracing::{info, warn};

use crate::cover::coverage::SpatialIndex;
use crate::error::{Error, Result};
use crate::geo::{haversine_m, LatLon};

/// Append a circle centered exactly on every spawn point no circle in `cover` reaches.
///
/// Circles inserted earlier in the same pass count for later points. Returns
/// the indices of the spawn points that received their own circle.
pub fn repair_cover(spawn_points: &[LatLon], cover: &mut Vec<LatLon>, radius_m: f64) -> Vec<usize> {
    let index = SpatialIndex::build(cover);
    let mut inserted = Vec::new();

    for (j, &p) in spawn_points.iter().enumerate() {
        if index.any_within(p, radius_m) {
            continue;
        }
        if inserted
            .iter()
            .any(|&k: &usize| haversine_m(spawn_points[k], p) <= radius_m)
        {
            continue;
        }
        warn!("Spawn point {} {} uncovered after selection; adding its own circle.", j, p);
        inserted.push(j);
    }

    cover.extend(inserted.iter().map(|&j| spawn_points[j]));
    if !inserted.is_empty() {
        info!("Repair added {} circles.", inserted.len());
    }
    inserted
}

/// Check that every spawn point is within `radius_m` of a circle in `cover`.
///
/// A miss here means the pipeline is broken, not that the input was unlucky.
pub fn verify_cover(spawn_points: &[LatLon], cover: &[LatLon], radius_m: f64) -> Result<()> {
    let index = SpatialIndex::build(cover);
    match spawn_points
        .iter()
        .enumerate()
        .find(|&(_, &p)| !index.any_within(p, radius_m))
    {
        Some((j, p)) => Err(Error::InvariantViolation(format!(
            "spawn point {j} {p} is not within {radius_m} m of any of {} scan points",
            cover.len()
        ))),
        None => Ok(()),
    }
}
