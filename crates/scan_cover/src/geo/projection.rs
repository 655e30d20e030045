//! Local planar projection from WGS84 degrees to meters.
//!
//! The projector is tangent at a reference coordinate and uses the WGS84 radii
//! of curvature there. Within a city-sized region Euclidean distance in this
//! frame tracks great-circle distance closely; the remaining east-west stretch
//! away from the reference latitude is bounded by [`LocalProjector::max_stretch`].
use glam::DVec2;

use crate::geo::LatLon;

const WGS84_A: f64 = 6_378_137.0;
const WGS84_E2: f64 = 0.006_694_379_990_14;

#[derive(Debug, Clone, Copy)]
pub struct LocalProjector {
    origin: LatLon,
    meters_per_lat_deg: f64,
    meters_per_lon_deg: f64,
}

impl LocalProjector {
    pub fn new(origin: LatLon) -> Self {
        let phi = origin.lat.to_radians();
        let sin2 = phi.sin() * phi.sin();
        let w = (1.0 - WGS84_E2 * sin2).sqrt();
        // Prime vertical (N) and meridional (M) radii of curvature.
        let n = WGS84_A / w;
        let m = WGS84_A * (1.0 - WGS84_E2) / (w * w * w);

        Self {
            origin,
            meters_per_lat_deg: m.to_radians(),
            meters_per_lon_deg: (n * phi.cos()).to_radians(),
        }
    }

    /// Projector tangent at the centroid of `points`, or at `(0, 0)` when empty.
    ///
    /// Longitude is averaged on the circle so sets straddling the antimeridian
    /// center on it rather than on the opposite side of the globe.
    pub fn centered_on(points: &[LatLon]) -> Self {
        if points.is_empty() {
            return Self::new(LatLon::new(0.0, 0.0));
        }
        let n = points.len() as f64;
        let (lat, sin_lon, cos_lon) = points.iter().fold((0.0, 0.0, 0.0), |(la, s, c), p| {
            let lon = p.lon.to_radians();
            (la + p.lat, s + lon.sin(), c + lon.cos())
        });
        Self::new(LatLon::new(lat / n, sin_lon.atan2(cos_lon).to_degrees()))
    }

    #[inline]
    pub fn origin(&self) -> LatLon {
        self.origin
    }

    #[inline]
    pub fn project(&self, p: LatLon) -> DVec2 {
        let mut d_lon = p.lon - self.origin.lon;
        if d_lon > 180.0 {
            d_lon -= 360.0;
        } else if d_lon < -180.0 {
            d_lon += 360.0;
        }
        DVec2::new(
            d_lon * self.meters_per_lon_deg,
            (p.lat - self.origin.lat) * self.meters_per_lat_deg,
        )
    }

    pub fn project_all(&self, points: &[LatLon]) -> Vec<DVec2> {
        points.iter().map(|&p| self.project(p)).collect()
    }

    pub fn unproject(&self, v: DVec2) -> LatLon {
        let lon = self.origin.lon + v.x / self.meters_per_lon_deg;
        LatLon::new(
            self.origin.lat + v.y / self.meters_per_lat_deg,
            (lon + 540.0).rem_euclid(360.0) - 180.0,
        )
    }

    /// Upper bound on planar distance / true distance for pairs whose latitudes
    /// lie in `[lat_min, lat_max]`.
    ///
    /// Only the east-west axis stretches away from the reference latitude; the
    /// small ellipsoid-vs-sphere mismatch is folded into a fixed allowance.
    pub fn max_stretch(&self, lat_min: f64, lat_max: f64) -> f64 {
        let cos0 = self.origin.lat.to_radians().cos();
        // cos is smallest at the latitude farthest from the equator.
        let far = lat_min.abs().max(lat_max.abs()).min(89.9);
        let east_west = cos0 / far.to_radians().cos();
        east_west.max(1.0) * 1.01
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::haversine_m;

    #[test]
    fn origin_maps_to_zero() {
        let origin = LatLon::new(48.137, 11.575);
        let proj = LocalProjector::new(origin);
        assert_eq!(proj.project(origin), DVec2::ZERO);
    }

    #[test]
    fn planar_distance_tracks_great_circle_near_origin() {
        let origin = LatLon::new(48.137, 11.575);
        let proj = LocalProjector::new(origin);
        for bearing in [0.0, 30.0, 90.0, 135.0, 200.0, 300.0] {
            let q = origin.destination(bearing, 70.0);
            let planar = proj.project(origin).distance(proj.project(q));
            let true_d = haversine_m(origin, q);
            assert!(
                (planar - true_d).abs() / true_d < 0.005,
                "bearing {bearing}: planar {planar} vs {true_d}"
            );
        }
    }

    #[test]
    fn stretch_bounds_pairs_away_from_reference_latitude() {
        let proj = LocalProjector::new(LatLon::new(60.0, 10.0));
        let stretch = proj.max_stretch(59.5, 60.5);
        let a = LatLon::new(60.5, 10.2);
        let b = a.destination(90.0, 70.0);
        let planar = proj.project(a).distance(proj.project(b));
        assert!(planar <= haversine_m(a, b) * stretch);
    }

    #[test]
    fn unproject_inverts_project() {
        let proj = LocalProjector::new(LatLon::new(-33.86, 151.2));
        let p = LatLon::new(-33.861, 151.203);
        let back = proj.unproject(proj.project(p));
        assert!((back.lat - p.lat).abs() < 1e-12);
        assert!((back.lon - p.lon).abs() < 1e-12);
    }

    #[test]
    fn centered_on_uses_centroid() {
        let proj = LocalProjector::centered_on(&[LatLon::new(1.0, 2.0), LatLon::new(3.0, 4.0)]);
        assert_eq!(proj.origin().lat, 2.0);
        assert!((proj.origin().lon - 3.0).abs() < 1e-9);
    }

    #[test]
    fn centered_on_straddles_antimeridian() {
        let points = [
            LatLon::new(0.0, 179.99995),
            LatLon::new(0.0001, -179.99995),
            LatLon::new(-0.0001, 179.9999),
            LatLon::new(0.0, -179.9999),
        ];
        let proj = LocalProjector::centered_on(&points);
        assert!(proj.origin().lon.abs() > 179.99, "lon = {}", proj.origin().lon);
        let planar = proj.project(points[0]).distance(proj.project(points[1]));
        let true_d = haversine_m(points[0], points[1]);
        assert!((planar - true_d).abs() < 0.5, "planar {planar} vs {true_d}");
    }
}
