//! Candidate generation: scatter scan-circle centers around each spawn point.
//!
//! A [`CandidateSampling`] strategy proposes centers for one spawn point;
//! [`sample_candidates`] drives it over the whole input and drops any proposal
//! that does not actually reach its parent point.
use rand::Rng;
use tracing::{debug, warn};

use crate::geo::LatLon;

pub mod uniform_disk;

pub use uniform_disk::UniformDiskSampling;

/// Trait for candidate-center sampling around a single spawn point.
pub trait CandidateSampling: Send + Sync {
    /// Propose candidate centers for `origin`. Every proposal should lie within
    /// `radius_m` of `origin`; the driver verifies this.
    fn generate(&self, origin: LatLon, radius_m: f64, rng: &mut dyn Rng) -> Vec<LatLon>;
}

/// A proposed scan-circle center and the spawn point it was sampled around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateCircle {
    pub position: LatLon,
    pub parent: usize,
}

/// Output of [`sample_candidates`].
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    pub circles: Vec<CandidateCircle>,
    /// Proposals rejected because they landed outside the scan radius of their parent.
    pub discarded: usize,
}

impl CandidateSet {
    pub fn len(&self) -> usize {
        self.circles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.circles.is_empty()
    }

    pub fn positions(&self) -> Vec<LatLon> {
        self.circles.iter().map(|c| c.position).collect()
    }
}

/// Run `sampler` for every spawn point and keep the proposals within `radius_m` of their parent.
pub fn sample_candidates(
    sampler: &dyn CandidateSampling,
    spawn_points: &[LatLon],
    radius_m: f64,
    rng: &mut dyn Rng,
) -> CandidateSet {
    let mut out = CandidateSet::default();
    for (parent, &origin) in spawn_points.iter().enumerate() {
        for position in sampler.generate(origin, radius_m, rng) {
            let d = origin.distance_m(position);
            if !(d <= radius_m) || !position.is_valid() {
                warn!(
                    "Discarding candidate {} for spawn point {} {}: {:.3} m away, radius {} m.",
                    position, parent, origin, d, radius_m
                );
                out.discarded += 1;
                continue;
            }
            out.circles.push(CandidateCircle { position, parent });
        }
    }
    debug!(
        "Sampled {} candidates for {} spawn points ({} discarded).",
        out.circles.len(),
        spawn_points.len(),
        out.discarded
    );
    out
}

/// Generate a random float in the range [0, 1) from the top 53 bits of `next_u64`.
#[inline]
pub fn rand01(rng: &mut dyn Rng) -> f64 {
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}
