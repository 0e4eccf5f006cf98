use crate::math::LonLat;

/// Longitude/latitude bounding box in degrees.
///
/// Boxes grow from coordinate extrema; `max.lon_deg` may exceed 180 for boxes
/// that wrap across the antimeridian.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LonLatBounds {
    pub min: LonLat,
    pub max: LonLat,
}

impl LonLatBounds {
    pub fn new(min: LonLat, max: LonLat) -> Self {
        LonLatBounds { min, max }
    }

    pub fn from_point(p: LonLat) -> Self {
        LonLatBounds { min: p, max: p }
    }

    pub fn include(&mut self, p: LonLat) {
        self.min.lon_deg = self.min.lon_deg.min(p.lon_deg);
        self.min.lat_deg = self.min.lat_deg.min(p.lat_deg);
        self.max.lon_deg = self.max.lon_deg.max(p.lon_deg);
        self.max.lat_deg = self.max.lat_deg.max(p.lat_deg);
    }

    pub fn lon_span(&self) -> f64 {
        self.max.lon_deg - self.min.lon_deg
    }

    /// Corners in the order top-right, bottom-right, bottom-left, top-left.
    pub fn corners(&self) -> [LonLat; 4] {
        [
            LonLat::new(self.max.lon_deg, self.max.lat_deg),
            LonLat::new(self.max.lon_deg, self.min.lat_deg),
            LonLat::new(self.min.lon_deg, self.min.lat_deg),
            LonLat::new(self.min.lon_deg, self.max.lat_deg),
        ]
    }
}
