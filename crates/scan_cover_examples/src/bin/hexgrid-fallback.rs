use scan_cover::prelude::*;
use scan_cover_examples::init_tracing;
use serde_json::json;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // No spawn data yet: cover the whole region with a hexagonal lattice.
    let region = Region::new(LatLon::new(40.70, -74.02), LatLon::new(40.73, -73.98));
    let grid = WorkerGrid::new(2, 2);
    let workers = hex_grid_points(&region, 70.0, grid);

    tracing::info!(
        "Region of {} km² needs {} lattice points.",
        region.area_km2(),
        workers.iter().map(WorkerAssignment::len).sum::<usize>()
    );

    let out: Vec<_> = workers
        .iter()
        .map(|w| json!({ "worker": w.worker_no, "points": w.len() }))
        .collect();
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
