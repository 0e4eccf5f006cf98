use foundation::math::LonLat;

/// Latitude where minor meridians and the outermost parallels stop.
const MINOR_EXTENT_LAT: f64 = 80.0;
const MAJOR_STEP_DEG: f64 = 90.0;
/// Sampling interval along each line, in degrees.
const PRECISION_DEG: f64 = 2.5;

/// Meridians and parallels every `step_deg` degrees.
///
/// Meridians on multiples of 90° run pole to pole; the others stop at ±80° so
/// the polar caps do not turn into a solid knot of lines. Parallels span ±80°.
pub fn graticule_lines(step_deg: f64) -> Vec<Vec<LonLat>> {
    let step = if step_deg.is_finite() && step_deg > 0.0 { step_deg } else { 10.0 };
    let mut lines = Vec::new();

    let mut lon = -180.0;
    while lon < 180.0 {
        let major = (lon / MAJOR_STEP_DEG).fract().abs() < 1e-9;
        let extent = if major { 90.0 } else { MINOR_EXTENT_LAT };
        lines.push(sample(-extent, extent, |lat| LonLat::new(lon, lat)));
        lon += step;
    }

    let mut lat = -MINOR_EXTENT_LAT;
    while lat <= MINOR_EXTENT_LAT + 1e-9 {
        lines.push(sample(-180.0, 180.0, |lon| LonLat::new(lon, lat)));
        lat += step;
    }

    lines
}

fn sample(from: f64, to: f64, at: impl Fn(f64) -> LonLat) -> Vec<LonLat> {
    let n = ((to - from) / PRECISION_DEG).ceil().max(1.0) as usize;
    (0..=n)
        .map(|i| at(from + (to - from) * i as f64 / n as f64))
        .collect()
}
