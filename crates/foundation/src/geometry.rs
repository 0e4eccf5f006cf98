//! Polygon geometry and the spherical queries scoring and highlighting rely on.

use std::f64::consts::TAU;

use crate::bounds::LonLatBounds;
use crate::math::precision::stable_total_cmp_f64;
use crate::math::{LonLat, Vec3, destination, great_circle_distance};

pub type Ring = Vec<LonLat>;

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(LonLat),
    LineString(Vec<LonLat>),
    MultiLineString(Vec<Vec<LonLat>>),
    /// Outer ring first, then holes.
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl Geometry {
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// Polygons of an areal geometry, each as a list of rings.
    pub fn polygons(&self) -> Result<Vec<&[Ring]>, GeometryError> {
        match self {
            Geometry::Polygon(rings) => Ok(vec![rings.as_slice()]),
            Geometry::MultiPolygon(polys) => Ok(polys.iter().map(|p| p.as_slice()).collect()),
            other => Err(GeometryError::Unsupported { kind: other.kind() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    Unsupported { kind: &'static str },
    Empty,
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryError::Unsupported { kind } => {
                write!(f, "unsupported geometry type: {kind} (expected Polygon or MultiPolygon)")
            }
            GeometryError::Empty => write!(f, "geometry has no vertices"),
        }
    }
}

impl std::error::Error for GeometryError {}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClosestPoint {
    pub point: LonLat,
    /// Central angle in radians.
    pub distance: f64,
}

/// Closest ring vertex to `point`.
///
/// Only vertices are considered; points along edge interiors are never
/// returned. On ties the earliest vertex wins.
pub fn closest_point_on_ring(point: LonLat, ring: &[LonLat]) -> Option<ClosestPoint> {
    ring.iter()
        .map(|&v| ClosestPoint {
            point: v,
            distance: great_circle_distance(point, v),
        })
        .min_by(|a, b| stable_total_cmp_f64(a.distance, b.distance))
}

/// Closest outer-ring vertex over every polygon of `geometry`.
pub fn closest_point_in_geometry(
    point: LonLat,
    geometry: &Geometry,
) -> Result<ClosestPoint, GeometryError> {
    let mut best: Option<ClosestPoint> = None;
    for rings in geometry.polygons()? {
        let Some(outer) = rings.first() else {
            continue;
        };
        let Some(candidate) = closest_point_on_ring(point, outer) else {
            continue;
        };
        best = match best {
            Some(b) if stable_total_cmp_f64(b.distance, candidate.distance).is_le() => Some(b),
            _ => Some(candidate),
        };
    }
    best.ok_or(GeometryError::Empty)
}

fn ring_vertices(ring: &[LonLat]) -> &[LonLat] {
    match (ring.first(), ring.last()) {
        (Some(a), Some(b)) if ring.len() > 1 && a == b => &ring[..ring.len() - 1],
        _ => ring,
    }
}

fn to_unit(p: LonLat) -> Vec3 {
    Vec3::from_lon_lat_rad(p.lon_rad(), p.lat_rad())
}

/// Area-weighted spherical centroid.
///
/// Each ring edge contributes its great-circle normal scaled by the edge's arc
/// length; summed over a closed boundary this is proportional to the area
/// integral of the surface position, so its direction is the centroid. The
/// result is oriented toward the vertices so either winding convention works.
/// Degenerate (zero-area) input falls back to the mean vertex direction.
pub fn centroid(geometry: &Geometry) -> Result<LonLat, GeometryError> {
    let mut area_sum = Vec3::ZERO;
    let mut vertex_sum = Vec3::ZERO;

    for rings in geometry.polygons()? {
        for ring in rings {
            let verts = ring_vertices(ring);
            for (i, &p) in verts.iter().enumerate() {
                let a = to_unit(p);
                let b = to_unit(verts[(i + 1) % verts.len()]);
                vertex_sum = vertex_sum + a;

                let n = a.cross(b);
                let m = n.length();
                if m > 1e-15 {
                    let angle = m.atan2(a.dot(b));
                    area_sum = area_sum + n.scale(angle / m);
                }
            }
        }
    }

    let Some(mean) = vertex_sum.normalized() else {
        return Err(GeometryError::Empty);
    };
    let dir = match area_sum.normalized() {
        Some(d) if area_sum.length() > 1e-12 => {
            if d.dot(mean) < 0.0 { -d } else { d }
        }
        _ => mean,
    };

    let (lon, lat) = dir.to_lon_lat_rad();
    Ok(LonLat::from_radians(lon, lat))
}

/// Lon/lat box over every vertex of the geometry.
///
/// When the plain box spans more than half the globe but the vertices fit a
/// narrower box across the antimeridian, that box is returned instead, with
/// `max.lon_deg` above 180.
pub fn bounds(geometry: &Geometry) -> Result<LonLatBounds, GeometryError> {
    let mut out: Option<LonLatBounds> = None;
    let mut shifted: Option<LonLatBounds> = None;
    let mut visit = |p: LonLat| {
        let east = if p.lon_deg < 0.0 {
            LonLat::new(p.lon_deg + 360.0, p.lat_deg)
        } else {
            p
        };
        match out.as_mut() {
            Some(b) => b.include(p),
            None => out = Some(LonLatBounds::from_point(p)),
        }
        match shifted.as_mut() {
            Some(b) => b.include(east),
            None => shifted = Some(LonLatBounds::from_point(east)),
        }
    };

    match geometry {
        Geometry::Point(p) => visit(*p),
        Geometry::LineString(line) => line.iter().copied().for_each(&mut visit),
        Geometry::MultiLineString(lines) => lines.iter().flatten().copied().for_each(&mut visit),
        Geometry::Polygon(rings) => rings.iter().flatten().copied().for_each(&mut visit),
        Geometry::MultiPolygon(polys) => polys
            .iter()
            .flatten()
            .flatten()
            .copied()
            .for_each(&mut visit),
    }

    let (plain, shifted) = out.zip(shifted).ok_or(GeometryError::Empty)?;
    if plain.lon_span() > 180.0 && shifted.lon_span() < plain.lon_span() {
        Ok(shifted)
    } else {
        Ok(plain)
    }
}

/// Largest central angle from the centroid to a corner of the bounding box.
///
/// A cheap "how big does this country look" measure; small values mean the fill
/// is unlikely to be visible at globe scale. Countries straddling the
/// antimeridian measure by their narrow box, see [`bounds`].
pub fn bounding_angular_radius(geometry: &Geometry) -> Result<f64, GeometryError> {
    let c = centroid(geometry)?;
    let b = bounds(geometry)?;
    Ok(b.corners()
        .into_iter()
        .map(|corner| great_circle_distance(c, corner))
        .fold(0.0, f64::max))
}

/// Even-odd containment test in the lon/lat plane.
///
/// Holes are honoured because every ring of a polygon toggles the parity.
pub fn contains(geometry: &Geometry, point: LonLat) -> Result<bool, GeometryError> {
    Ok(geometry
        .polygons()?
        .into_iter()
        .any(|rings| rings.iter().filter(|r| ring_contains(r, point)).count() % 2 == 1))
}

fn ring_contains(ring: &[LonLat], p: LonLat) -> bool {
    let verts = ring_vertices(ring);
    if verts.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = verts.len() - 1;
    for i in 0..verts.len() {
        let (a, b) = (verts[i], verts[j]);
        if (a.lat_deg > p.lat_deg) != (b.lat_deg > p.lat_deg) {
            let t = (p.lat_deg - a.lat_deg) / (b.lat_deg - a.lat_deg);
            let x = a.lon_deg + t * (b.lon_deg - a.lon_deg);
            if p.lon_deg < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Closed ring approximating a small circle of `radius` radians around `center`.
pub fn circle_ring(center: LonLat, radius: f64, step_deg: f64) -> Ring {
    let steps = (360.0 / step_deg.max(0.5)).ceil() as usize;
    let mut ring: Ring = (0..steps)
        .map(|i| destination(center, TAU * i as f64 / steps as f64, radius))
        .collect();
    if let Some(&first) = ring.first() {
        ring.push(first);
    }
    ring
}

#[cfg(test)]
mod tests {
    use super::{
        ClosestPoint, Geometry, GeometryError, bounding_angular_radius, bounds, centroid, circle_ring,
        closest_point_in_geometry, closest_point_on_ring, contains,
    };
    use crate::math::{approx_eq, great_circle_distance, LonLat};

    fn square(lon: f64, lat: f64, size: f64) -> Vec<LonLat> {
        vec![
            LonLat::new(lon, lat),
            LonLat::new(lon + size, lat),
            LonLat::new(lon + size, lat + size),
            LonLat::new(lon, lat + size),
            LonLat::new(lon, lat),
        ]
    }

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!(approx_eq(a, b, eps), "expected {a} ~= {b} (diff {})", (a - b).abs());
    }

    #[test]
    fn closest_point_is_a_vertex() {
        let ring = square(0.0, 0.0, 2.0);
        // The nearest point on the edge would be (1, 0); only vertices count.
        let hit = closest_point_on_ring(LonLat::new(0.9, -1.0), &ring).expect("non-empty");
        assert_eq!(hit.point, LonLat::new(0.0, 0.0));
        assert_close(hit.distance, great_circle_distance(LonLat::new(0.9, -1.0), hit.point), 0.0);
        assert_eq!(closest_point_on_ring(LonLat::new(0.0, 0.0), &[]), None);
    }

    #[test]
    fn multipolygon_takes_min_over_outer_rings() {
        let geom = Geometry::MultiPolygon(vec![
            vec![square(0.0, 0.0, 1.0)],
            vec![square(20.0, 0.0, 1.0), square(20.2, 0.2, 0.5)],
        ]);
        let hit = closest_point_in_geometry(LonLat::new(19.0, 0.0), &geom).expect("closest");
        assert_eq!(hit.point, LonLat::new(20.0, 0.0));

        let poly = Geometry::Polygon(vec![square(0.0, 0.0, 1.0)]);
        let ClosestPoint { point, distance } =
            closest_point_in_geometry(LonLat::new(0.0, 0.0), &poly).expect("closest");
        assert_eq!(point, LonLat::new(0.0, 0.0));
        assert_eq!(distance, 0.0);
    }

    #[test]
    fn rejects_non_areal_geometry() {
        let line = Geometry::LineString(vec![LonLat::new(0.0, 0.0), LonLat::new(1.0, 1.0)]);
        assert_eq!(
            closest_point_in_geometry(LonLat::new(0.0, 0.0), &line),
            Err(GeometryError::Unsupported { kind: "LineString" })
        );
        assert!(centroid(&line).is_err());
        assert_eq!(
            closest_point_in_geometry(LonLat::new(0.0, 0.0), &Geometry::MultiPolygon(vec![])),
            Err(GeometryError::Empty)
        );
    }

    #[test]
    fn centroid_of_small_square() {
        let geom = Geometry::Polygon(vec![square(10.0, 20.0, 2.0)]);
        let c = centroid(&geom).expect("centroid");
        assert_close(c.lon_deg, 11.0, 1e-6);
        assert_close(c.lat_deg, 21.0, 1e-2);
    }

    #[test]
    fn centroid_ignores_winding() {
        let mut ring = square(10.0, 20.0, 2.0);
        ring.reverse();
        let c = centroid(&Geometry::Polygon(vec![ring])).expect("centroid");
        assert_close(c.lon_deg, 11.0, 1e-6);
        assert_close(c.lat_deg, 21.0, 1e-2);
    }

    #[test]
    fn centroid_is_area_weighted() {
        let geom = Geometry::MultiPolygon(vec![
            vec![square(0.0, 0.0, 1.0)],
            vec![square(10.0, 0.0, 3.0)],
        ]);
        let c = centroid(&geom).expect("centroid");
        // Nine times the area sits around lon 11.5, pulling the centroid well past the midpoint.
        assert!(c.lon_deg > 9.0, "{c:?}");
    }

    #[test]
    fn bounding_radius_scales_with_size() {
        let small = Geometry::Polygon(vec![square(0.0, 0.0, 0.5)]);
        let large = Geometry::Polygon(vec![square(0.0, 0.0, 10.0)]);
        let rs = bounding_angular_radius(&small).expect("radius");
        let rl = bounding_angular_radius(&large).expect("radius");
        assert!(rs < 1f64.to_radians());
        assert!(rl > 5f64.to_radians());
    }

    #[test]
    fn small_country_across_antimeridian_stays_small() {
        let ring = vec![
            LonLat::new(179.8, -0.2),
            LonLat::new(-179.8, -0.2),
            LonLat::new(-179.8, 0.2),
            LonLat::new(179.8, 0.2),
            LonLat::new(179.8, -0.2),
        ];
        let geometry = Geometry::Polygon(vec![ring]);
        let b = bounds(&geometry).expect("bounds");
        assert_close(b.min.lon_deg, 179.8, 1e-9);
        assert_close(b.max.lon_deg, 180.2, 1e-9);
        assert!(bounding_angular_radius(&geometry).expect("radius") < 1f64.to_radians());

        let wide = Geometry::Polygon(vec![square(-100.0, 0.0, 150.0)]);
        let b = bounds(&wide).expect("bounds");
        assert_eq!((b.min.lon_deg, b.max.lon_deg), (-100.0, 50.0));
    }

    #[test]
    fn contains_respects_holes() {
        let geom = Geometry::Polygon(vec![square(0.0, 0.0, 10.0), square(4.0, 4.0, 2.0)]);
        assert_eq!(contains(&geom, LonLat::new(1.0, 1.0)), Ok(true));
        assert_eq!(contains(&geom, LonLat::new(5.0, 5.0)), Ok(false));
        assert_eq!(contains(&geom, LonLat::new(11.0, 5.0)), Ok(false));
    }

    #[test]
    fn circle_ring_is_closed_at_radius() {
        let center = LonLat::new(30.0, -20.0);
        let ring = circle_ring(center, 0.05, 10.0);
        assert_eq!(ring.len(), 37);
        assert_eq!(ring.first(), ring.last());
        for p in &ring {
            assert_close(great_circle_distance(center, *p), 0.05, 1e-9);
        }
    }
}
