use rand::rngs::StdRng;
use rand::SeedableRng;
use scan_cover::prelude::*;
use scan_cover_examples::{cluster, init_tracing, result_json};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // 100 spawn points within 50 m; one 70 m circle reaches all of them.
    let center = LatLon::new(37.7749, -122.4194);
    let points = cluster(center, 100, 50.0, 2025);

    let region = Region::new(LatLon::new(37.77, -122.425), LatLon::new(37.78, -122.415));
    let config = CoverConfig::new(region)
        .with_scan_radius(70.0)
        .with_samples_per_point(5);

    let mut cache = NoCache;
    let mut engine = CoverEngine::try_new(config, &mut cache)?;
    let result = engine.compute(&points, &mut StdRng::seed_from_u64(7))?;

    println!("{}", serde_json::to_string_pretty(&result_json(&result))?);
    Ok(())
}
