use std::time::Duration;

use criterion::{Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;
use scan_cover::geo::{LatLon, Region};
use scan_cover::sampling::rand01;

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(3);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// Bench region: roughly 4.4 km x 3.5 km around central Berlin.
#[allow(dead_code)]
pub fn region() -> Region {
    Region::new(LatLon::new(52.50, 13.37), LatLon::new(52.54, 13.42))
}

/// `n` spawn points in `clusters` dense blobs inside [`region`].
#[allow(dead_code)]
pub fn clustered_points(n: usize, clusters: usize, seed: u64) -> Vec<LatLon> {
    let mut rng = StdRng::seed_from_u64(seed);
    let region = region();
    let sw = region.south_west();
    let ne = region.north_east();
    let centers: Vec<LatLon> = (0..clusters.max(1))
        .map(|_| {
            LatLon::new(
                sw.lat + rand01(&mut rng) * (ne.lat - sw.lat),
                sw.lon + rand01(&mut rng) * (ne.lon - sw.lon),
            )
        })
        .collect();
    (0..n)
        .map(|i| {
            let center = centers[i % centers.len()];
            let bearing = rand01(&mut rng) * 360.0;
            let distance = rand01(&mut rng).sqrt() * 400.0;
            center.destination(bearing, distance)
        })
        .collect()
}
