//! Spherical geodesy on the unit sphere.
//!
//! Coordinates are longitude/latitude in degrees; distances are central angles
//! in radians, so callers multiply by a radius if they need lengths.

use std::f64::consts::{FRAC_PI_2, PI};

use super::precision::{wrap_degrees, wrap_radians};

/// Mean Earth radius (km), for converting central angles to surface lengths.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic position in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct LonLat {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl LonLat {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    pub fn from_radians(lon: f64, lat: f64) -> Self {
        Self::new(lon.to_degrees(), lat.to_degrees())
    }

    pub fn lon_rad(self) -> f64 {
        self.lon_deg.to_radians()
    }

    pub fn lat_rad(self) -> f64 {
        self.lat_deg.to_radians()
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.lon_deg, self.lat_deg]
    }
}

impl From<[f64; 2]> for LonLat {
    fn from(v: [f64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

/// Great-circle distance between two points, as a central angle in `[0, PI]`.
///
/// Uses the atan2 form of the spherical law of cosines, which stays accurate for
/// both tiny and near-antipodal separations.
pub fn great_circle_distance(p1: LonLat, p2: LonLat) -> f64 {
    let (lat1, lat2) = (p1.lat_rad(), p2.lat_rad());
    let dlon = (p2.lon_deg - p1.lon_deg).to_radians();

    let (sin_lat1, cos_lat1) = lat1.sin_cos();
    let (sin_lat2, cos_lat2) = lat2.sin_cos();
    let (sin_dlon, cos_dlon) = dlon.sin_cos();

    let x = cos_lat2 * sin_dlon;
    let y = cos_lat1 * sin_lat2 - sin_lat1 * cos_lat2 * cos_dlon;
    let z = sin_lat1 * sin_lat2 + cos_lat1 * cos_lat2 * cos_dlon;

    x.hypot(y).atan2(z)
}

/// Initial course (azimuth, radians clockwise from north) from `p1` toward `p2`.
pub fn initial_course(p1: LonLat, p2: LonLat) -> f64 {
    let (lat1, lat2) = (p1.lat_rad(), p2.lat_rad());
    let dlon = wrap_radians((p2.lon_deg - p1.lon_deg).to_radians());

    let n = lat2.cos() * dlon.sin();
    let d = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    n.atan2(d)
}

/// Point on the great circle from `p1` toward `p2` that lies `sigma` radians from `p1`.
///
/// Solves the direct problem by extrapolating the route back to its equator
/// crossing (node), then walking `sigma` along the great circle from there.
/// `sigma` may exceed the p1-p2 separation; the route simply continues.
pub fn waypoint(p1: LonLat, p2: LonLat, sigma: f64) -> LonLat {
    let lon1 = p1.lon_rad();
    let lat1 = p1.lat_rad();
    let course1 = initial_course(p1, p2);

    // Azimuth at the node.
    let (sin_c1, cos_c1) = course1.sin_cos();
    let alpha0 = (sin_c1 * lat1.cos()).atan2(cos_c1.hypot(sin_c1 * lat1.sin()));
    let (sin_a0, cos_a0) = alpha0.sin_cos();

    // Arc and longitude from the node to p1.
    let sigma01 = lat1.tan().atan2(cos_c1);
    let lon01 = (sin_a0 * sigma01.sin()).atan2(sigma01.cos());
    let lon0 = wrap_radians(lon1 - lon01);

    let s = sigma01 + sigma;
    let (sin_s, cos_s) = s.sin_cos();
    let lat = (cos_a0 * sin_s).atan2(cos_s.hypot(sin_a0 * sin_s));
    let lon = wrap_radians((sin_a0 * sin_s).atan2(cos_s) + lon0);

    LonLat::from_radians(lon, lat)
}

/// Point reached by travelling `sigma` radians from `origin` on initial azimuth `azimuth`.
pub fn destination(origin: LonLat, azimuth: f64, sigma: f64) -> LonLat {
    let lat1 = origin.lat_rad();
    let (sin_lat1, cos_lat1) = lat1.sin_cos();
    let (sin_s, cos_s) = sigma.sin_cos();

    let sin_lat2 = (sin_lat1 * cos_s + cos_lat1 * sin_s * azimuth.cos()).clamp(-1.0, 1.0);
    let lat2 = sin_lat2.asin();
    let dlon = (azimuth.sin() * sin_s * cos_lat1).atan2(cos_s - sin_lat1 * sin_lat2);

    LonLat::new(wrap_degrees(origin.lon_deg + dlon.to_degrees()), lat2.to_degrees())
}

/// Point at fraction `t` of the way along the great circle from `p1` to `p2`.
pub fn interpolate(p1: LonLat, p2: LonLat, t: f64) -> LonLat {
    let d = great_circle_distance(p1, p2);
    if d <= f64::EPSILON {
        return p1;
    }
    waypoint(p1, p2, d * t)
}

/// Point on the horizon as seen from `center`, along the route toward `target`.
pub fn horizon_point(center: LonLat, target: LonLat) -> LonLat {
    waypoint(center, target, FRAC_PI_2)
}

/// True if `p` lies on the visible hemisphere centred on `center`.
pub fn is_on_visible_hemisphere(center: LonLat, p: LonLat) -> bool {
    great_circle_distance(center, p) <= FRAC_PI_2
}

/// Antipode of `p`.
pub fn antipode(p: LonLat) -> LonLat {
    LonLat::new(wrap_degrees(p.lon_deg + 180.0), -p.lat_deg)
}

/// Central angle converted to kilometres on the mean Earth sphere.
pub fn central_angle_to_km(sigma: f64) -> f64 {
    sigma.clamp(0.0, PI) * EARTH_RADIUS_KM
}

#[cfg(test)]
mod tests {
    use super::{
        LonLat, antipode, destination, great_circle_distance, horizon_point, interpolate,
        waypoint,
    };
    use crate::math::precision::approx_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!(approx_eq(a, b, eps), "expected {a} ~= {b} (diff {})", (a - b).abs());
    }

    fn assert_lonlat_close(a: LonLat, b: LonLat, eps: f64) {
        assert_close(a.lon_deg, b.lon_deg, eps);
        assert_close(a.lat_deg, b.lat_deg, eps);
    }

    const SAMPLES: [[f64; 2]; 6] = [
        [0.0, 0.0],
        [-74.0, 40.7],
        [2.35, 48.85],
        [151.2, -33.9],
        [-179.5, 10.0],
        [179.5, -10.0],
    ];

    #[test]
    fn distance_is_bounded_and_symmetric() {
        for a in SAMPLES {
            for b in SAMPLES {
                let (p, q) = (LonLat::from(a), LonLat::from(b));
                let d = great_circle_distance(p, q);
                assert!((0.0..=PI).contains(&d), "{d} out of range");
                assert_close(d, great_circle_distance(q, p), 1e-12);
                if a == b {
                    assert_close(d, 0.0, 1e-12);
                } else {
                    assert!(d > 1e-6);
                }
            }
        }
    }

    #[test]
    fn quarter_and_half_turns() {
        let o = LonLat::new(0.0, 0.0);
        assert_close(great_circle_distance(o, LonLat::new(90.0, 0.0)), FRAC_PI_2, 1e-12);
        assert_close(great_circle_distance(o, LonLat::new(0.0, 90.0)), FRAC_PI_2, 1e-12);
        assert_close(great_circle_distance(o, LonLat::new(180.0, 0.0)), PI, 1e-12);
        let p = LonLat::new(30.0, 20.0);
        assert_close(great_circle_distance(p, antipode(p)), PI, 1e-9);
    }

    #[test]
    fn waypoint_endpoints() {
        let pairs = [
            (LonLat::new(0.0, 0.0), LonLat::new(10.0, 10.0)),
            (LonLat::new(-74.0, 40.7), LonLat::new(2.35, 48.85)),
            (LonLat::new(151.2, -33.9), LonLat::new(-157.8, 21.3)),
            (LonLat::new(20.0, -10.0), LonLat::new(20.0, 30.0)),
        ];
        for (p1, p2) in pairs {
            assert_lonlat_close(waypoint(p1, p2, 0.0), p1, 1e-9);
            let d = great_circle_distance(p1, p2);
            assert_lonlat_close(waypoint(p1, p2, d), p2, 1e-9);
        }
    }

    #[test]
    fn waypoint_stays_on_route() {
        let p1 = LonLat::new(-74.0, 40.7);
        let p2 = LonLat::new(2.35, 48.85);
        let d = great_circle_distance(p1, p2);
        let mid = waypoint(p1, p2, d * 0.3);
        assert_close(great_circle_distance(p1, mid), d * 0.3, 1e-9);
        assert_close(great_circle_distance(mid, p2), d * 0.7, 1e-9);
    }

    #[test]
    fn horizon_point_on_equator() {
        let center = LonLat::new(0.0, 0.0);
        let h = horizon_point(center, LonLat::new(120.0, 0.0));
        assert_lonlat_close(h, LonLat::new(90.0, 0.0), 1e-9);
    }

    #[test]
    fn destination_matches_distance() {
        let origin = LonLat::new(10.0, 45.0);
        for az in [0.0_f64, 45.0, 90.0, 200.0] {
            let p = destination(origin, az.to_radians(), 0.2);
            assert_close(great_circle_distance(origin, p), 0.2, 1e-9);
        }
        let north = destination(LonLat::new(0.0, 0.0), 0.0, 10f64.to_radians());
        assert_lonlat_close(north, LonLat::new(0.0, 10.0), 1e-9);
    }

    #[test]
    fn interpolate_midpoint_on_equator() {
        let m = interpolate(LonLat::new(0.0, 0.0), LonLat::new(40.0, 0.0), 0.5);
        assert_lonlat_close(m, LonLat::new(20.0, 0.0), 1e-9);
        let same = LonLat::new(5.0, 5.0);
        assert_eq!(interpolate(same, same, 0.5), same);
    }
}
