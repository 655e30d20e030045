#![forbid(unsafe_code)]
//! scan_cover: Minimal sets of fixed-radius scan circles over geographic spawn points.
//!
//! Modules:
//! - geo: coordinates, great-circle distance, regions and a local planar projection
//! - sampling: candidate circle centers around each spawn point
//! - cover: coverage matrix, greedy selection, repair, caching, events and the engine
//! - workers: balanced worker buckets and the hexagonal fallback lattice
//!
//! For examples, see the `scan_cover_examples` crate.
pub mod cover;
pub mod error;
pub mod geo;
pub mod sampling;
pub mod workers;

/// Convenient re-exports for common types. Import with `use scan_cover::prelude::*;`.
pub mod prelude {
    pub use crate::cover::cache::{CoverCache, FileCoverCache, MemoryCoverCache, NoCache};
    pub use crate::cover::config::CoverConfig;
    pub use crate::cover::coverage::{CoverageMatrix, SpatialIndex};
    pub use crate::cover::engine::{
        compute_cover, validate_spawn_points, CoverEngine, CoverResult, CoverStats,
    };
    pub use crate::cover::events::{
        CoverEvent, CoverEventKind, EventSink, FnSink, MultiSink, VecSink,
    };
    pub use crate::cover::greedy::{select_cover, GreedyOutcome, GreedySelector, Selection};
    pub use crate::cover::repair::{repair_cover, verify_cover};
    pub use crate::error::{Error, Result};
    pub use crate::geo::{destination, haversine_m, LatLon, LocalProjector, Region};
    pub use crate::sampling::{
        rand01, sample_candidates, CandidateCircle, CandidateSampling, CandidateSet,
        UniformDiskSampling,
    };
    pub use crate::workers::{
        balanced_sizes, distribute, hex_grid_points, into_point_lists, WorkerAssignment,
        WorkerGrid,
    };
}
