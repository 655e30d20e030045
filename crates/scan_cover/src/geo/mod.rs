//! Geodesy primitives: coordinates, great-circle distance, destination projection
//! and the configured scan region.
//!
//! All distances are in meters on a spherical Earth with the IUGG mean radius.
//! The planar frame used for proximity queries lives in [`projection`].
use serde::{Deserialize, Serialize};

pub mod projection;

pub use projection::LocalProjector;

/// Mean Earth radius in meters (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A WGS84 geographic coordinate in decimal degrees.
///
/// Used for spawn points, candidate circles and selected scan points alike; the
/// pipeline stage decides the meaning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    #[inline]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns `true` for finite coordinates inside the valid latitude/longitude ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Great-circle distance to `other` in meters.
    #[inline]
    pub fn distance_m(&self, other: LatLon) -> f64 {
        haversine_m(*self, other)
    }

    /// Point reached by travelling `distance_m` meters from `self` along `bearing_deg`.
    #[inline]
    pub fn destination(&self, bearing_deg: f64, distance_m: f64) -> LatLon {
        destination(*self, bearing_deg, distance_m)
    }
}

impl From<(f64, f64)> for LatLon {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

impl From<LatLon> for (f64, f64) {
    fn from(p: LatLon) -> Self {
        (p.lat, p.lon)
    }
}

impl std::fmt::Display for LatLon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Haversine great-circle distance in meters.
pub fn haversine_m(a: LatLon, b: LatLon) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Destination point given a start, an initial bearing (degrees clockwise from
/// north) and a distance in meters. Longitude is wrapped into `[-180, 180)`.
pub fn destination(origin: LatLon, bearing_deg: f64, distance_m: f64) -> LatLon {
    let delta = distance_m / EARTH_RADIUS_M;
    let theta = bearing_deg.to_radians();
    let phi1 = origin.lat.to_radians();
    let lambda1 = origin.lon.to_radians();

    let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos();
    let phi2 = sin_phi2.clamp(-1.0, 1.0).asin();
    let lambda2 = lambda1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * sin_phi2);

    LatLon {
        lat: phi2.to_degrees(),
        lon: wrap_lon(lambda2.to_degrees()),
    }
}

#[inline]
fn wrap_lon(lon: f64) -> f64 {
    (lon + 540.0).rem_euclid(360.0) - 180.0
}

/// Axis-aligned scan region given by two opposite corners.
///
/// Corners are normalized on construction so either ordering describes the
/// same region (and produces the same cache key).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[LatLon; 2]", into = "[LatLon; 2]")]
pub struct Region {
    south_west: LatLon,
    north_east: LatLon,
}

impl Region {
    pub fn new(a: LatLon, b: LatLon) -> Self {
        Self {
            south_west: LatLon::new(a.lat.min(b.lat), a.lon.min(b.lon)),
            north_east: LatLon::new(a.lat.max(b.lat), a.lon.max(b.lon)),
        }
    }

    #[inline]
    pub fn south_west(&self) -> LatLon {
        self.south_west
    }

    #[inline]
    pub fn north_east(&self) -> LatLon {
        self.north_east
    }

    pub fn is_valid(&self) -> bool {
        self.south_west.is_valid() && self.north_east.is_valid()
    }

    /// Midpoint of the region in degrees.
    pub fn center(&self) -> LatLon {
        LatLon::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lon + self.north_east.lon) / 2.0,
        )
    }

    /// Whole square kilometers covered, measured along the southern edge and western meridian.
    pub fn area_km2(&self) -> u64 {
        let corner = self.south_west;
        let east = LatLon::new(corner.lat, self.north_east.lon);
        let north = LatLon::new(self.north_east.lat, corner.lon);
        let width_km = haversine_m(corner, east) / 1000.0;
        let height_km = haversine_m(corner, north) / 1000.0;
        (width_km * height_km) as u64
    }

    /// Stable key identifying this region, independent of corner ordering.
    pub fn cache_key(&self) -> String {
        format!(
            "{}_{}__{}_{}",
            self.south_west.lat, self.south_west.lon, self.north_east.lat, self.north_east.lon
        )
    }

    /// Center of the grid cell assigned to `worker_no` in a `rows` x `columns` layout.
    ///
    /// Workers are numbered row-major; row 0 is the southern edge, column 0 the western edge.
    pub fn worker_start(&self, worker_no: usize, rows: usize, columns: usize) -> LatLon {
        let rows = rows.max(1);
        let columns = columns.max(1);
        let row = worker_no / columns;
        let column = worker_no % columns;
        let part_lat = (self.north_east.lat - self.south_west.lat) / rows as f64;
        let part_lon = (self.north_east.lon - self.south_west.lon) / columns as f64;
        LatLon::new(
            self.south_west.lat + part_lat * row as f64 + part_lat / 2.0,
            self.south_west.lon + part_lon * column as f64 + part_lon / 2.0,
        )
    }
}

impl From<[LatLon; 2]> for Region {
    fn from([a, b]: [LatLon; 2]) -> Self {
        Region::new(a, b)
    }
}

impl From<Region> for [LatLon; 2] {
    fn from(region: Region) -> Self {
        [region.south_west, region.north_east]
    }
}

impl Default for Region {
    fn default() -> Self {
        Region::new(LatLon::new(0.0, 0.0), LatLon::new(0.0, 0.0))
    }
}
