//! Proximity queries over spawn points and the sparse circle → point coverage matrix.
//!
//! [`SpatialIndex`] holds the projected spawn points in an R-tree. Range queries
//! run in the planar frame with a radius inflated by the projector's worst-case
//! stretch, then every hit is confirmed with the great-circle distance. A
//! matrix entry therefore exists iff the true distance is within the radius.
//!
//! [`CoverageMatrix`] keeps both orientations of the sparse matrix plus the
//! per-row count of still-uncovered columns, so claiming a spawn point is a
//! walk over the circles that reach it.
use rstar::primitives::GeomWithData;
use rstar::RTree;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geo::{haversine_m, LatLon, LocalProjector};

type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// Extra planar slack (meters) on top of the stretch-scaled query radius.
const QUERY_SLACK_M: f64 = 0.5;
/// Latitude padding (degrees) applied to the indexed extent when bounding projector stretch.
const STRETCH_PAD_DEG: f64 = 0.05;

/// R-tree over a fixed set of coordinates answering "all points within r meters".
pub struct SpatialIndex {
    projector: LocalProjector,
    stretch: f64,
    tree: RTree<IndexedPoint>,
    points: Vec<LatLon>,
}

impl SpatialIndex {
    pub fn build(points: &[LatLon]) -> Self {
        let projector = LocalProjector::centered_on(points);
        let (lat_min, lat_max) = points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.lat), hi.max(p.lat))
            });
        let stretch = if points.is_empty() {
            1.0
        } else {
            projector.max_stretch(lat_min - STRETCH_PAD_DEG, lat_max + STRETCH_PAD_DEG)
        };

        let entries = points
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let v = projector.project(p);
                GeomWithData::new([v.x, v.y], i)
            })
            .collect();

        Self {
            projector,
            stretch,
            tree: RTree::bulk_load(entries),
            points: points.to_vec(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[LatLon] {
        &self.points
    }

    /// Indices of all indexed points within `radius_m` great-circle meters of `center`.
    pub fn within(&self, center: LatLon, radius_m: f64) -> impl Iterator<Item = usize> + '_ {
        let q = self.projector.project(center);
        let planar = radius_m * self.stretch + QUERY_SLACK_M;
        self.tree
            .locate_within_distance([q.x, q.y], planar * planar)
            .map(|entry| entry.data)
            .filter(move |&i| haversine_m(center, self.points[i]) <= radius_m)
    }

    /// Whether any indexed point lies within `radius_m` of `center`.
    pub fn any_within(&self, center: LatLon, radius_m: f64) -> bool {
        self.within(center, radius_m).next().is_some()
    }
}

/// Sparse boolean matrix, rows = candidate circles, columns = spawn points.
#[derive(Debug, Clone, Default)]
pub struct CoverageMatrix {
    rows: Vec<Vec<u32>>,
    columns: Vec<Vec<u32>>,
    weights: Vec<u32>,
    uncovered: Vec<bool>,
    uncovered_count: usize,
}

impl CoverageMatrix {
    /// Query `index` for every candidate and assemble the matrix.
    ///
    /// Fails with [`Error::NeighborCapExceeded`] rather than truncating when a
    /// candidate reaches more than `max_neighbors` spawn points.
    pub fn build(
        index: &SpatialIndex,
        candidates: &[LatLon],
        radius_m: f64,
        max_neighbors: usize,
    ) -> Result<Self> {
        let mut rows = Vec::with_capacity(candidates.len());
        for (candidate, &center) in candidates.iter().enumerate() {
            let mut row: Vec<u32> = index.within(center, radius_m).map(|j| j as u32).collect();
            if row.len() > max_neighbors {
                return Err(Error::NeighborCapExceeded {
                    candidate,
                    found: row.len(),
                    cap: max_neighbors,
                });
            }
            row.sort_unstable();
            rows.push(row);
        }
        let matrix = Self::from_rows(rows, index.len());
        debug!(
            "Coverage matrix: {} rows x {} columns, {} entries.",
            matrix.n_rows(),
            matrix.n_columns(),
            matrix.nnz()
        );
        Ok(matrix)
    }

    /// Assemble from explicit rows of column indices. Out-of-range or repeated
    /// column indices are dropped.
    pub fn from_rows(rows: Vec<Vec<u32>>, n_columns: usize) -> Self {
        let mut columns: Vec<Vec<u32>> = vec![Vec::new(); n_columns];
        let mut clean_rows = Vec::with_capacity(rows.len());
        for (i, mut row) in rows.into_iter().enumerate() {
            row.retain(|&j| (j as usize) < n_columns);
            row.sort_unstable();
            row.dedup();
            for &j in &row {
                columns[j as usize].push(i as u32);
            }
            clean_rows.push(row);
        }
        let weights = clean_rows.iter().map(|r| r.len() as u32).collect();

        Self {
            rows: clean_rows,
            columns,
            weights,
            uncovered: vec![true; n_columns],
            uncovered_count: n_columns,
        }
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn nnz(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[u32] {
        &self.rows[i]
    }

    /// Circles reaching spawn point `j`.
    #[inline]
    pub fn column(&self, j: usize) -> &[u32] {
        &self.columns[j]
    }

    /// Number of still-uncovered spawn points row `i` reaches.
    #[inline]
    pub fn weight(&self, i: usize) -> u32 {
        self.weights[i]
    }

    #[inline]
    pub fn weights(&self) -> &[u32] {
        &self.weights
    }

    #[inline]
    pub fn is_uncovered(&self, j: usize) -> bool {
        self.uncovered[j]
    }

    #[inline]
    pub fn uncovered_count(&self) -> usize {
        self.uncovered_count
    }

    pub fn uncovered_columns(&self) -> Vec<usize> {
        self.uncovered
            .iter()
            .enumerate()
            .filter_map(|(j, &u)| u.then_some(j))
            .collect()
    }

    /// Mark spawn point `j` covered and take it out of every row's weight.
    ///
    /// Returns `false` if it was already covered.
    pub fn claim(&mut self, j: usize) -> bool {
        if !self.uncovered[j] {
            return false;
        }
        self.uncovered[j] = false;
        self.uncovered_count -= 1;
        for &i in &self.columns[j] {
            let w = &mut self.weights[i as usize];
            debug_assert!(*w > 0, "row {i} weight underflow");
            *w = w.saturating_sub(1);
        }
        true
    }

    /// Claim every still-uncovered column of row `i`; returns the newly covered columns.
    pub fn claim_row(&mut self, i: usize) -> Vec<usize> {
        let targets: Vec<usize> = self.rows[i]
            .iter()
            .map(|&j| j as usize)
            .filter(|&j| self.uncovered[j])
            .collect();
        for &j in &targets {
            self.claim(j);
        }
        targets
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::sampling::rand01;

    fn scatter(center: LatLon, n: usize, max_m: f64, seed: u64) -> Vec<LatLon> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| center.destination(rand01(&mut rng) * 360.0, rand01(&mut rng) * max_m))
            .collect()
    }

    #[test]
    fn index_matches_brute_force() {
        let points = scatter(LatLon::new(47.6, -122.3), 400, 500.0, 3);
        let index = SpatialIndex::build(&points);
        let probes = scatter(LatLon::new(47.6, -122.3), 40, 500.0, 4);
        for probe in probes {
            let mut got: Vec<usize> = index.within(probe, 70.0).collect();
            got.sort_unstable();
            let want: Vec<usize> = (0..points.len())
                .filter(|&j| haversine_m(probe, points[j]) <= 70.0)
                .collect();
            assert_eq!(got, want);
        }
    }

    #[test]
    fn empty_index_answers_nothing() {
        let index = SpatialIndex::build(&[]);
        assert!(index.is_empty());
        assert!(!index.any_within(LatLon::new(0.0, 0.0), 1_000.0));
    }

    #[test]
    fn build_fails_when_cap_exceeded() {
        let points = scatter(LatLon::new(10.0, 10.0), 50, 20.0, 5);
        let index = SpatialIndex::build(&points);
        let err = CoverageMatrix::build(&index, &[LatLon::new(10.0, 10.0)], 70.0, 10)
            .expect_err("cap must not be silently applied");
        assert!(matches!(
            err,
            Error::NeighborCapExceeded {
                candidate: 0,
                found: 50,
                cap: 10
            }
        ));
    }

    #[test]
    fn built_entries_respect_radius() {
        let points = scatter(LatLon::new(-1.0, 36.8), 200, 300.0, 6);
        let candidates = scatter(LatLon::new(-1.0, 36.8), 60, 300.0, 7);
        let index = SpatialIndex::build(&points);
        let m = CoverageMatrix::build(&index, &candidates, 65.0, 1_000).unwrap();
        assert_eq!(m.n_rows(), 60);
        assert_eq!(m.n_columns(), 200);
        for i in 0..m.n_rows() {
            for j in 0..m.n_columns() {
                let inside = haversine_m(candidates[i], points[j]) <= 65.0;
                assert_eq!(m.row(i).contains(&(j as u32)), inside);
            }
        }
    }

    #[test]
    fn claim_decrements_every_row_reaching_the_column() {
        let mut m = CoverageMatrix::from_rows(vec![vec![0, 1], vec![1, 2], vec![1]], 3);
        assert_eq!(m.weights(), &[2, 2, 1]);
        assert_eq!(m.column(1), &[0, 1, 2]);

        assert!(m.claim(1));
        assert_eq!(m.weights(), &[1, 1, 0]);
        assert_eq!(m.uncovered_count(), 2);
        assert!(!m.claim(1));
        assert_eq!(m.weights(), &[1, 1, 0]);
    }

    #[test]
    fn claim_row_returns_only_new_columns() {
        let mut m = CoverageMatrix::from_rows(vec![vec![0, 1, 2], vec![2, 3]], 4);
        m.claim(2);
        assert_eq!(m.claim_row(1), vec![3]);
        assert_eq!(m.weight(0), 2);
        assert_eq!(m.weight(1), 0);
        assert_eq!(m.uncovered_columns(), vec![0, 1]);
    }

    #[test]
    fn from_rows_drops_invalid_and_repeated_columns() {
        let m = CoverageMatrix::from_rows(vec![vec![3, 0, 0, 9]], 4);
        assert_eq!(m.row(0), &[0, 3]);
        assert_eq!(m.weight(0), 2);
    }
}
