#![forbid(unsafe_code)]
//! Shared helpers for the `scan_cover` example binaries.
use rand::rngs::StdRng;
use rand::SeedableRng;
use scan_cover::prelude::*;
use serde_json::json;
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// `n` spawn points spread uniformly over a disk of `radius_m` around `center`.
pub fn cluster(center: LatLon, n: usize, radius_m: f64, seed: u64) -> Vec<LatLon> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let bearing = rand01(&mut rng) * 360.0;
            let distance = rand01(&mut rng).sqrt() * radius_m;
            center.destination(bearing, distance)
        })
        .collect()
}

/// `n` spawn points scattered uniformly over `region`.
pub fn scattered(region: &Region, n: usize, seed: u64) -> Vec<LatLon> {
    let mut rng = StdRng::seed_from_u64(seed);
    let sw = region.south_west();
    let ne = region.north_east();
    (0..n)
        .map(|_| {
            LatLon::new(
                sw.lat + rand01(&mut rng) * (ne.lat - sw.lat),
                sw.lon + rand01(&mut rng) * (ne.lon - sw.lon),
            )
        })
        .collect()
}

/// JSON summary of a run: counters plus every worker route as `[lat, lon]` pairs.
pub fn result_json(result: &CoverResult) -> serde_json::Value {
    let workers: Vec<_> = result
        .workers
        .iter()
        .map(|w| {
            json!({
                "worker": w.worker_no,
                "start": [w.start.lat, w.start.lon],
                "points": w.points.iter().map(|p| [p.lat, p.lon]).collect::<Vec<_>>(),
            })
        })
        .collect();
    json!({
        "spawn_points": result.stats.spawn_points,
        "cover": result.cover.len(),
        "greedy": result.stats.greedy_selected,
        "repaired": result.stats.repaired,
        "cache_hit": result.stats.cache_hit,
        "workers": workers,
    })
}
