//! High-level engine: cache lookup, sampling, coverage, greedy selection,
//! repair, cache write and worker distribution.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::cover::cache::CoverCache;
use crate::cover::config::CoverConfig;
use crate::cover::coverage::{CoverageMatrix, SpatialIndex};
use crate::cover::events::{CoverEvent, CoverEventKind, EventSink};
use crate::cover::greedy::GreedySelector;
use crate::cover::repair::{repair_cover, verify_cover};
use crate::error::{Error, Result};
use crate::geo::LatLon;
use crate::sampling::{sample_candidates, CandidateSampling, UniformDiskSampling};
use crate::workers::{distribute, into_point_lists, WorkerAssignment};

/// Counters describing one engine run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverStats {
    /// Spawn points supplied.
    pub spawn_points: usize,
    /// Candidate circles kept after sampling.
    pub candidates: usize,
    /// Sampled proposals dropped for missing their parent point.
    pub discarded_samples: usize,
    /// Nonzero entries of the coverage matrix.
    pub coverage_entries: usize,
    /// Circles chosen by the greedy loop.
    pub greedy_selected: usize,
    /// Circles added by the safety net.
    pub repaired: usize,
    /// Final number of scan points.
    pub cover_size: usize,
    /// Whether the cover came from the cache.
    pub cache_hit: bool,
}

/// Final output of [`CoverEngine`].
#[derive(Debug, Clone, Default)]
pub struct CoverResult {
    /// Selected scan points: greedy picks in selection order, then repair circles.
    pub cover: Vec<LatLon>,
    /// Non-empty worker buckets.
    pub workers: Vec<WorkerAssignment>,
    pub stats: CoverStats,
}

impl CoverResult {
    /// Worker buckets as plain coordinate lists.
    pub fn buckets(&self) -> Vec<Vec<LatLon>> {
        into_point_lists(self.workers.clone())
    }
}

fn check_cancelled(cancel: Option<&AtomicBool>) -> Result<()> {
    match cancel {
        Some(flag) if flag.load(Ordering::Relaxed) => Err(Error::Cancelled),
        _ => Ok(()),
    }
}

/// Rejects the first spawn point that is not a finite, in-range coordinate.
pub fn validate_spawn_points(spawn_points: &[LatLon]) -> Result<()> {
    match spawn_points.iter().position(|p| !p.is_valid()) {
        Some(index) => Err(Error::InvalidSpawnPoint {
            index,
            point: spawn_points[index],
        }),
        None => Ok(()),
    }
}

/// Run sampling, coverage, greedy selection and repair without touching any cache.
///
/// Returns the cover (greedy picks in order, then repair circles) and the run
/// counters. `cancel` is polled between phases.
pub fn compute_cover(
    spawn_points: &[LatLon],
    config: &CoverConfig,
    sampler: &dyn CandidateSampling,
    rng: &mut dyn Rng,
    sink: &mut dyn EventSink,
    cancel: Option<&AtomicBool>,
) -> Result<(Vec<LatLon>, CoverStats)> {
    let mut stats = CoverStats {
        spawn_points: spawn_points.len(),
        ..Default::default()
    };

    validate_spawn_points(spawn_points)?;
    check_cancelled(cancel)?;
    info!("Sampling candidates around {} spawn points.", spawn_points.len());
    let candidates = sample_candidates(sampler, spawn_points, config.scan_radius_m, rng);
    stats.candidates = candidates.len();
    stats.discarded_samples = candidates.discarded;
    if sink.wants(CoverEventKind::CandidatesSampled) {
        sink.send(CoverEvent::CandidatesSampled {
            candidates: candidates.len(),
            discarded: candidates.discarded,
        });
    }

    check_cancelled(cancel)?;
    let positions = candidates.positions();
    let index = SpatialIndex::build(spawn_points);
    let matrix = CoverageMatrix::build(
        &index,
        &positions,
        config.coverage_radius_m(),
        config.max_neighbors,
    )?;
    stats.coverage_entries = matrix.nnz();
    info!(
        "Coverage computed: {} candidates, {} entries.",
        matrix.n_rows(),
        stats.coverage_entries
    );
    if sink.wants(CoverEventKind::CoverageBuilt) {
        sink.send(CoverEvent::CoverageBuilt {
            rows: matrix.n_rows(),
            columns: matrix.n_columns(),
            entries: stats.coverage_entries,
        });
    }

    check_cancelled(cancel)?;
    let mut selector = GreedySelector::new(matrix);
    let mut cover = Vec::new();
    while let Some(selection) = selector.step() {
        let position = positions[selection.row];
        if sink.wants(CoverEventKind::CircleSelected) {
            sink.send(CoverEvent::CircleSelected {
                order: cover.len(),
                position,
                newly_covered: selection.newly_covered.len(),
            });
        }
        cover.push(position);
    }
    stats.greedy_selected = cover.len();
    let leftover = selector.matrix().uncovered_count();
    if leftover > 0 {
        debug!("Greedy selection left {} spawn points for repair.", leftover);
    }

    check_cancelled(cancel)?;
    let inserted = repair_cover(spawn_points, &mut cover, config.scan_radius_m);
    stats.repaired = inserted.len();
    if sink.wants(CoverEventKind::RepairInserted) {
        for &j in &inserted {
            sink.send(CoverEvent::RepairInserted {
                spawn_point: j,
                position: spawn_points[j],
            });
        }
    }
    verify_cover(spawn_points, &cover, config.scan_radius_m)?;

    stats.cover_size = cover.len();
    info!(
        "Minimal scan point set done: {} points ({} greedy, {} repaired).",
        stats.cover_size, stats.greedy_selected, stats.repaired
    );
    Ok((cover, stats))
}

pub struct CoverEngine<'a> {
    /// Configuration applied to this engine.
    pub config: CoverConfig,
    /// Store for computed covers.
    pub cache: &'a mut dyn CoverCache,
    sampler: Box<dyn CandidateSampling>,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a> CoverEngine<'a> {
    pub fn try_new(config: CoverConfig, cache: &'a mut dyn CoverCache) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config, cache))
    }

    pub fn new(config: CoverConfig, cache: &'a mut dyn CoverCache) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid cover configuration");
        let sampler = Box::new(UniformDiskSampling::new(
            config.samples_per_point,
            config.sample_margin_m,
        ));
        Self {
            config,
            cache,
            sampler,
            cancel: None,
        }
    }

    /// Replace the default [`UniformDiskSampling`].
    pub fn with_sampler<S: CandidateSampling + 'static>(mut self, sampler: S) -> Self {
        self.sampler = Box::new(sampler);
        self
    }

    /// Abort with [`Error::Cancelled`] at the next phase boundary once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Computes (or loads) the cover for `spawn_points` and splits it across workers.
    pub fn compute(
        &mut self,
        spawn_points: &[LatLon],
        rng: &mut impl Rng,
    ) -> Result<CoverResult> {
        self.compute_with_events(spawn_points, rng, &mut ())
    }

    pub fn compute_with_events(
        &mut self,
        spawn_points: &[LatLon],
        rng: &mut impl Rng,
        sink: &mut dyn EventSink,
    ) -> Result<CoverResult> {
        validate_spawn_points(spawn_points)?;
        let key = self.config.region.cache_key();
        if sink.wants(CoverEventKind::RunStarted) {
            sink.send(CoverEvent::RunStarted {
                spawn_points: spawn_points.len(),
                cache_key: key.clone(),
            });
        }

        if spawn_points.is_empty() {
            info!("No spawn points; nothing to cover.");
            let result = CoverResult::default();
            if sink.wants(CoverEventKind::RunFinished) {
                sink.send(CoverEvent::RunFinished {
                    stats: result.stats.clone(),
                });
            }
            return Ok(result);
        }

        let (cover, stats) = match self.lookup(&key, spawn_points.len(), sink) {
            Some(cover) => {
                let stats = CoverStats {
                    spawn_points: spawn_points.len(),
                    cover_size: cover.len(),
                    cache_hit: true,
                    ..Default::default()
                };
                (cover, stats)
            }
            None => {
                let (cover, stats) = compute_cover(
                    spawn_points,
                    &self.config,
                    self.sampler.as_ref(),
                    rng,
                    sink,
                    self.cancel.as_deref(),
                )?;
                self.persist(&key, &cover, sink);
                (cover, stats)
            }
        };

        let workers = distribute(&cover, self.config.grid, &self.config.region);
        if sink.wants(CoverEventKind::Distributed) {
            sink.send(CoverEvent::Distributed {
                workers: workers.len(),
            });
        }

        let result = CoverResult {
            cover,
            workers,
            stats,
        };
        if sink.wants(CoverEventKind::RunFinished) {
            sink.send(CoverEvent::RunFinished {
                stats: result.stats.clone(),
            });
        }
        Ok(result)
    }

    fn lookup(
        &self,
        key: &str,
        spawn_points: usize,
        sink: &mut dyn EventSink,
    ) -> Option<Vec<LatLon>> {
        match self.cache.load(key) {
            Ok(Some(cover)) => {
                info!(
                    "Using cached cover '{}': {} scan points for {} spawn points.",
                    key,
                    cover.len(),
                    spawn_points
                );
                if sink.wants(CoverEventKind::CacheHit) {
                    sink.send(CoverEvent::CacheHit {
                        cache_key: key.to_owned(),
                        points: cover.len(),
                    });
                }
                return Some(cover);
            }
            Ok(None) => {
                debug!("No cached cover for '{}'.", key);
            }
            Err(e) => {
                warn!("Ignoring unreadable cached cover '{}': {}.", key, e);
                if sink.wants(CoverEventKind::Warning) {
                    sink.send(CoverEvent::Warning {
                        context: format!("cache:{key}"),
                        message: format!("Unreadable cached cover, recomputing: {e}"),
                    });
                }
            }
        }
        if sink.wants(CoverEventKind::CacheMiss) {
            sink.send(CoverEvent::CacheMiss {
                cache_key: key.to_owned(),
            });
        }
        None
    }

    fn persist(&mut self, key: &str, cover: &[LatLon], sink: &mut dyn EventSink) {
        match self.cache.store(key, cover) {
            Ok(()) => {
                if sink.wants(CoverEventKind::CacheWritten) {
                    sink.send(CoverEvent::CacheWritten {
                        cache_key: key.to_owned(),
                        points: cover.len(),
                    });
                }
            }
            Err(e) => {
                warn!("Failed to store cover '{}': {}.", key, e);
                if sink.wants(CoverEventKind::Warning) {
                    sink.send(CoverEvent::Warning {
                        context: format!("cache:{key}"),
                        message: format!("Failed to store cover: {e}"),
                    });
                }
            }
        }
    }
}
