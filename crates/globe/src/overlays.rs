use std::collections::BTreeMap;

use formats::Country;
use foundation::geometry::GeometryError;
use foundation::ids::CountryId;
use foundation::math::LonLat;
use serde::{Deserialize, Serialize};

/// How a marker behaves once its location rotates behind the globe.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointVisibility {
    /// Drawn at its projected position even on the far side.
    AlwaysVisible,
    /// Hidden while behind the horizon.
    InvisibleBeyondHorizon,
    /// Pinned to the nearest horizon point while behind the horizon.
    #[default]
    VisibleOnHorizon,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OverlayPoint {
    pub lonlat: LonLat,
    pub visibility: PointVisibility,
}

/// Great-circle segment, e.g. from a click to the closest point of the target.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GuideLine {
    pub from: LonLat,
    pub to: LonLat,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    Correct,
    Incorrect,
}

/// Ring drawn around a highlighted country too small to see as a fill.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HighlightRing {
    pub country: CountryId,
    pub center: LonLat,
    /// Angular radius in radians.
    pub radius: f64,
    pub highlight: Highlight,
}

/// Transient annotations owned by the render loop; cleared between rounds.
#[derive(Debug, Clone, Default)]
pub struct Overlays {
    points: Vec<OverlayPoint>,
    lines: Vec<GuideLine>,
    highlights: BTreeMap<CountryId, Highlight>,
    rings: Vec<HighlightRing>,
}

impl Overlays {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[OverlayPoint] {
        &self.points
    }

    pub fn add_point(&mut self, lonlat: LonLat, visibility: PointVisibility) {
        self.points.push(OverlayPoint { lonlat, visibility });
    }

    /// Removes the first point at exactly `lonlat`. Returns `false` if none matched.
    pub fn remove_point(&mut self, lonlat: LonLat) -> bool {
        match self.points.iter().position(|p| p.lonlat == lonlat) {
            Some(i) => {
                self.points.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn clear_points(&mut self) {
        self.points.clear();
    }

    pub fn lines(&self) -> &[GuideLine] {
        &self.lines
    }

    pub fn add_line(&mut self, from: LonLat, to: LonLat) {
        self.lines.push(GuideLine { from, to });
    }

    pub fn clear_lines(&mut self) {
        self.lines.clear();
    }

    pub fn highlight(&self, id: CountryId) -> Option<Highlight> {
        self.highlights.get(&id).copied()
    }

    pub fn highlighted(&self) -> impl Iterator<Item = (CountryId, Highlight)> + '_ {
        self.highlights.iter().map(|(id, h)| (*id, *h))
    }

    pub fn rings(&self) -> &[HighlightRing] {
        &self.rings
    }

    /// Marks `country`; adds a ring when its bounding angular radius is below
    /// `small_radius` (radians). Re-highlighting replaces the previous entry.
    pub fn highlight_country(
        &mut self,
        country: &Country,
        highlight: Highlight,
        small_radius: f64,
    ) -> Result<(), GeometryError> {
        let radius = country.bounding_angular_radius()?;
        let center = country.centroid()?;

        self.highlights.insert(country.id, highlight);
        self.rings.retain(|r| r.country != country.id);
        if radius < small_radius {
            self.rings.push(HighlightRing {
                country: country.id,
                center,
                radius,
                highlight,
            });
        }
        Ok(())
    }

    pub fn clear_highlights(&mut self) {
        self.highlights.clear();
        self.rings.clear();
    }

    pub fn clear(&mut self) {
        self.clear_points();
        self.clear_lines();
        self.clear_highlights();
    }
}

#[cfg(test)]
mod tests {
    use super::{Highlight, Overlays, PointVisibility};
    use formats::Country;
    use foundation::geometry::Geometry;
    use foundation::ids::CountryId;
    use foundation::math::LonLat;
    use pretty_assertions::assert_eq;

    fn square(id: i64, size: f64) -> Country {
        Country {
            id: CountryId(id),
            name: format!("C{id}"),
            geometry: Geometry::Polygon(vec![vec![
                LonLat::new(0.0, 0.0),
                LonLat::new(size, 0.0),
                LonLat::new(size, size),
                LonLat::new(0.0, size),
                LonLat::new(0.0, 0.0),
            ]]),
        }
    }

    #[test]
    fn small_countries_get_a_ring() {
        let threshold = 1f64.to_radians();
        let mut o = Overlays::new();
        o.highlight_country(&square(1, 20.0), Highlight::Correct, threshold)
            .expect("highlight");
        o.highlight_country(&square(2, 0.5), Highlight::Incorrect, threshold)
            .expect("highlight");

        assert_eq!(o.highlight(CountryId(1)), Some(Highlight::Correct));
        assert_eq!(o.highlight(CountryId(2)), Some(Highlight::Incorrect));
        assert_eq!(o.rings().len(), 1);
        assert_eq!(o.rings()[0].country, CountryId(2));
        assert!(o.rings()[0].radius < threshold);

        o.highlight_country(&square(2, 0.5), Highlight::Correct, threshold)
            .expect("highlight");
        assert_eq!(o.rings().len(), 1);
        assert_eq!(o.rings()[0].highlight, Highlight::Correct);

        o.clear_highlights();
        assert_eq!(o.highlight(CountryId(1)), None);
        assert!(o.rings().is_empty());
    }

    #[test]
    fn points_and_lines() {
        let mut o = Overlays::new();
        let p = LonLat::new(3.0, 4.0);
        o.add_point(p, PointVisibility::default());
        o.add_point(LonLat::new(5.0, 6.0), PointVisibility::AlwaysVisible);
        assert!(o.remove_point(p));
        assert!(!o.remove_point(p));
        assert_eq!(o.points().len(), 1);

        o.add_line(p, LonLat::new(10.0, 10.0));
        o.clear();
        assert!(o.points().is_empty());
        assert!(o.lines().is_empty());
    }

    #[test]
    fn non_areal_country_is_rejected() {
        let mut o = Overlays::new();
        let bad = Country {
            id: CountryId(9),
            name: "Line".to_string(),
            geometry: Geometry::LineString(vec![LonLat::new(0.0, 0.0), LonLat::new(1.0, 1.0)]),
        };
        assert!(o.highlight_country(&bad, Highlight::Correct, 0.1).is_err());
        assert_eq!(o.highlight(CountryId(9)), None);
    }
}
