//! Angle normalization and deterministic float comparison.

use core::cmp::Ordering;

/// Canonicalize a float for ordering: `-0.0` becomes `0.0`, NaNs collapse to one.
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

/// Total ordering for floats. Use when choosing minima so ties resolve the same way every run.
pub fn stable_total_cmp_f64(a: f64, b: f64) -> Ordering {
    canonical_f64(a).total_cmp(&canonical_f64(b))
}

/// Wrap a longitude (or any angle) in degrees into `[-180, 180]`.
pub fn wrap_degrees(deg: f64) -> f64 {
    let wrapped = (deg + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && deg > 0.0 { 180.0 } else { wrapped }
}

/// Wrap an angle in radians into `[-PI, PI]`.
pub fn wrap_radians(rad: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    if rad > PI {
        rad - TAU
    } else if rad < -PI {
        rad + TAU
    } else {
        rad
    }
}

/// Signed shortest angular delta in degrees from `from` to `to`, in `[-180, 180]`.
pub fn shortest_delta_degrees(from: f64, to: f64) -> f64 {
    wrap_degrees(to - from)
}

/// Absolute-tolerance comparison.
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}
