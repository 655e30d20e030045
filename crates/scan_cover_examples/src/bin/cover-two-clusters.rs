use rand::rngs::StdRng;
use rand::SeedableRng;
use scan_cover::prelude::*;
use scan_cover_examples::{cluster, init_tracing, result_json};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Two far-apart clusters, split across a 2x1 worker grid.
    let mut points = cluster(LatLon::new(0.0, 0.0), 200, 300.0, 1);
    points.extend(cluster(LatLon::new(1.0, 1.0), 200, 300.0, 2));

    let region = Region::new(LatLon::new(-0.01, -0.01), LatLon::new(1.01, 1.01));
    let config = CoverConfig::new(region).with_grid(2, 1);

    // Print each circle as it is chosen.
    let mut sink = FnSink::new(|event: CoverEvent| {
        if let CoverEvent::CircleSelected {
            order,
            position,
            newly_covered,
        } = event
        {
            tracing::debug!("#{order} at {position}: +{newly_covered}");
        }
    });

    let mut cache = MemoryCoverCache::new();
    let mut engine = CoverEngine::try_new(config, &mut cache)?;
    let result = engine.compute_with_events(&points, &mut StdRng::seed_from_u64(3), &mut sink)?;

    println!("{}", serde_json::to_string_pretty(&result_json(&result))?);
    Ok(())
}
