use rand::rngs::StdRng;
use rand::SeedableRng;
use scan_cover::prelude::*;
use scan_cover_examples::{init_tracing, result_json, scattered};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let region = Region::new(LatLon::new(52.50, 13.37), LatLon::new(52.54, 13.42));
    let points = scattered(&region, 3_000, 42);
    let config = CoverConfig::new(region).with_grid(3, 3);

    // The second run loads the first run's record instead of recomputing.
    // Delete the record file to force a fresh cover.
    let mut cache = FileCoverCache::new(std::env::temp_dir().join("scan_cover_examples"));
    println!("cache record: {}", cache.record_path(&region.cache_key()).display());

    for run in 0..2u64 {
        let mut events = VecSink::filtered([
            CoverEventKind::CacheHit,
            CoverEventKind::CacheMiss,
            CoverEventKind::CacheWritten,
            CoverEventKind::Warning,
        ]);
        let mut engine = CoverEngine::try_new(config.clone(), &mut cache)?;
        let result =
            engine.compute_with_events(&points, &mut StdRng::seed_from_u64(run), &mut events)?;
        for event in events.as_slice() {
            println!("run {run}: {event:?}");
        }
        println!("{}", serde_json::to_string(&result_json(&result))?);
    }
    Ok(())
}
