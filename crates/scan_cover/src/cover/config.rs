//! Engine configuration.
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo::Region;
use crate::workers::WorkerGrid;

/// Values consumed by [`crate::cover::engine::CoverEngine`].
///
/// Loading from disk or the command line is left to the caller; the serde
/// derives accept any serde format.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverConfig {
    /// Scan radius of one circle in meters.
    pub scan_radius_m: f64,
    /// Candidate circles sampled around each spawn point.
    pub samples_per_point: usize,
    /// Rim kept free when sampling so a candidate always reaches its parent.
    pub sample_margin_m: f64,
    /// Subtracted from the radius when building coverage entries.
    pub coverage_margin_m: f64,
    /// Most spawn points a single candidate may reach before the run is rejected.
    pub max_neighbors: usize,
    /// Worker grid used to split the final cover.
    pub grid: WorkerGrid,
    /// Configured map region; identifies the cache record.
    pub region: Region,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            scan_radius_m: 70.0,
            samples_per_point: 5,
            sample_margin_m: 5.0,
            coverage_margin_m: 0.0,
            max_neighbors: 4096,
            grid: WorkerGrid::default(),
            region: Region::default(),
        }
    }
}

impl CoverConfig {
    /// Creates a [`CoverConfig`] for `region` with default values otherwise.
    pub fn new(region: Region) -> Self {
        Self {
            region,
            ..Default::default()
        }
    }

    pub fn with_scan_radius(mut self, scan_radius_m: f64) -> Self {
        self.scan_radius_m = scan_radius_m;
        self
    }

    pub fn with_samples_per_point(mut self, samples_per_point: usize) -> Self {
        self.samples_per_point = samples_per_point;
        self
    }

    pub fn with_sample_margin(mut self, sample_margin_m: f64) -> Self {
        self.sample_margin_m = sample_margin_m;
        self
    }

    pub fn with_coverage_margin(mut self, coverage_margin_m: f64) -> Self {
        self.coverage_margin_m = coverage_margin_m;
        self
    }

    pub fn with_max_neighbors(mut self, max_neighbors: usize) -> Self {
        self.max_neighbors = max_neighbors;
        self
    }

    pub fn with_grid(mut self, rows: usize, columns: usize) -> Self {
        self.grid = WorkerGrid::new(rows, columns);
        self
    }

    /// Radius used for coverage entries.
    #[inline]
    pub fn coverage_radius_m(&self) -> f64 {
        self.scan_radius_m - self.coverage_margin_m
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.scan_radius_m.is_finite() || self.scan_radius_m <= 0.0 {
            return Err(Error::InvalidConfig(
                "scan_radius_m must be finite and > 0".into(),
            ));
        }
        for (name, margin) in [
            ("sample_margin_m", self.sample_margin_m),
            ("coverage_margin_m", self.coverage_margin_m),
        ] {
            if !margin.is_finite() || margin < 0.0 || margin >= self.scan_radius_m {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be finite, >= 0 and < scan_radius_m"
                )));
            }
        }
        if self.samples_per_point == 0 {
            return Err(Error::InvalidConfig("samples_per_point must be >= 1".into()));
        }
        if self.max_neighbors == 0 {
            return Err(Error::InvalidConfig("max_neighbors must be >= 1".into()));
        }
        if self.grid.rows == 0 || self.grid.columns == 0 {
            return Err(Error::InvalidConfig(
                "grid rows and columns must be >= 1".into(),
            ));
        }
        if !self.region.is_valid() {
            return Err(Error::InvalidConfig(
                "region corners must be valid coordinates".into(),
            ));
        }
        Ok(())
    }
}
