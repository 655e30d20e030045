//! Uniform distance/bearing sampling inside the scan radius.
use rand::Rng;

use crate::geo::LatLon;
use crate::sampling::{rand01, CandidateSampling};

/// Draws `count` centers per spawn point with distance uniform in
/// `[0, radius - margin_m]` and bearing uniform in `[0, 360)`.
///
/// The distance is uniform, not the area, so proposals concentrate towards the
/// parent point.
#[derive(Debug, Clone)]
pub struct UniformDiskSampling {
    /// Number of candidates per spawn point.
    pub count: usize,
    /// Distance kept free at the rim of the scan circle, in meters.
    pub margin_m: f64,
}

impl UniformDiskSampling {
    pub fn new(count: usize, margin_m: f64) -> Self {
        Self {
            count,
            margin_m: margin_m.max(0.0),
        }
    }
}

impl CandidateSampling for UniformDiskSampling {
    fn generate(&self, origin: LatLon, radius_m: f64, rng: &mut dyn Rng) -> Vec<LatLon> {
        let reach = radius_m - self.margin_m;
        if self.count == 0 || !(reach >= 0.0) {
            return Vec::new();
        }

        let mut out = Vec::with_capacity(self.count);
        for _ in 0..self.count {
            let distance = rand01(rng) * reach;
            let bearing = rand01(rng) * 360.0;
            out.push(origin.destination(bearing, distance));
        }
        out
    }
}
