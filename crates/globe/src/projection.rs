//! Orthographic projection state and the controller that mutates it.
//!
//! Rotation follows the usual `[λ, φ, γ]` convention for a rotated
//! orthographic globe: a location `(lon, lat)` is brought to the view center by
//! the rotation `[-lon, -lat, 0]`. Screen y grows downwards.

use formats::DetailLevel;
use foundation::math::{LonLat, horizon_point, is_on_visible_hemisphere, wrap_degrees, wrap_radians};
use tracing::debug;

use crate::config::GlobeConfig;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProjectionState {
    /// `[λ, φ, γ]` in degrees.
    pub rotation: [f64; 3],
    pub scale: f64,
}

/// Screen area the globe is fitted into.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub padding_top: f64,
    pub padding_bottom: f64,
}

impl Viewport {
    pub fn from_config(cfg: &GlobeConfig) -> Self {
        Self {
            width: cfg.width,
            height: cfg.height,
            padding_top: cfg.padding_top,
            padding_bottom: cfg.padding_bottom,
        }
    }

    fn usable_height(&self) -> f64 {
        (self.height - self.padding_top - self.padding_bottom).max(1.0)
    }

    /// Scale at which the whole globe disc fits inside the padded area.
    pub fn fitted_scale(&self) -> f64 {
        (self.width.max(1.0).min(self.usable_height()) / 2.0).max(1.0)
    }

    /// Screen position of the globe center.
    pub fn translate(&self) -> [f64; 2] {
        [self.width / 2.0, self.padding_top + self.usable_height() / 2.0]
    }
}

/// `f(x) = exp(a·x + b)` mapping wheel position to scale.
///
/// `f(0) = max`, `f(-range) = min`, so equal wheel steps change the scale by
/// equal ratios.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ZoomCurve {
    a: f64,
    b: f64,
}

impl ZoomCurve {
    pub fn new(min_scale: f64, max_scale: f64, range: f64) -> Self {
        let b = max_scale.ln();
        let a = (max_scale / min_scale).ln() / range.max(f64::EPSILON);
        Self { a, b }
    }

    pub fn scale_at(&self, x: f64) -> f64 {
        (self.a * x + self.b).exp()
    }

    pub fn position_of(&self, scale: f64) -> f64 {
        if self.a.abs() <= f64::EPSILON {
            return 0.0;
        }
        (scale.ln() - self.b) / self.a
    }
}

/// Sole owner and writer of [`ProjectionState`].
///
/// All setters clamp: latitude to `±max_latitude`, scale to `[min, max]`.
#[derive(Debug, Clone)]
pub struct ProjectionController {
    state: ProjectionState,
    viewport: Viewport,
    translate: [f64; 2],
    min_scale: f64,
    max_scale: f64,
    max_latitude: f64,
    rotation_scale_constant: f64,
    scale_threshold: f64,
    zoom: ZoomCurve,
    low_detail: bool,
}

impl ProjectionController {
    pub fn new(cfg: &GlobeConfig) -> Self {
        let viewport = Viewport::from_config(cfg);
        let min_scale = viewport.fitted_scale();
        let max_scale = cfg.max_scale.max(min_scale);
        Self {
            state: ProjectionState {
                rotation: [0.0, 0.0, 0.0],
                scale: min_scale,
            },
            viewport,
            translate: viewport.translate(),
            min_scale,
            max_scale,
            max_latitude: cfg.max_latitude_deg.abs(),
            rotation_scale_constant: cfg.rotation_scale_constant,
            scale_threshold: cfg.scale_threshold,
            zoom: ZoomCurve::new(min_scale, max_scale, cfg.zoom_range),
            low_detail: false,
        }
    }

    pub fn state(&self) -> ProjectionState {
        self.state
    }

    pub fn rotation(&self) -> [f64; 3] {
        self.state.rotation
    }

    pub fn scale(&self) -> f64 {
        self.state.scale
    }

    pub fn min_scale(&self) -> f64 {
        self.min_scale
    }

    pub fn max_scale(&self) -> f64 {
        self.max_scale
    }

    pub fn max_latitude(&self) -> f64 {
        self.max_latitude
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn translate(&self) -> [f64; 2] {
        self.translate
    }

    pub fn low_detail(&self) -> bool {
        self.low_detail
    }

    pub fn set_low_detail(&mut self, low_detail: bool) {
        self.low_detail = low_detail;
    }

    /// Non-finite components keep their current value.
    pub fn set_rotation(&mut self, rotation: [f64; 3]) {
        let current = self.state.rotation;
        let [lambda, phi, gamma] = std::array::from_fn(|i| {
            if rotation[i].is_finite() {
                rotation[i]
            } else {
                current[i]
            }
        });
        self.state.rotation = [lambda, phi.clamp(-self.max_latitude, self.max_latitude), gamma];
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.state.scale = if scale.is_nan() {
            self.min_scale
        } else {
            scale.clamp(self.min_scale, self.max_scale)
        };
    }

    /// Pixel drag to rotation; the rotation per pixel shrinks as the globe grows.
    pub fn apply_drag(&mut self, dx: f64, dy: f64) -> ProjectionState {
        if !dx.is_finite() || !dy.is_finite() {
            return self.state;
        }
        let k = self.rotation_scale_constant / self.state.scale;
        let [lambda, phi, gamma] = self.state.rotation;
        self.set_rotation([lambda + dx * k, phi - dy * k, gamma]);
        self.state
    }

    /// Wheel delta to scale along the zoom curve. Positive deltas zoom out.
    pub fn apply_zoom(&mut self, wheel_delta: f64) -> ProjectionState {
        let x = self.zoom.position_of(self.state.scale);
        self.set_scale(self.zoom.scale_at(x - wheel_delta));
        self.state
    }

    pub fn select_dataset(&self, scale: f64, low_detail: bool) -> DetailLevel {
        if low_detail || scale < self.scale_threshold {
            DetailLevel::Low
        } else {
            DetailLevel::High
        }
    }

    /// Detail level for the current state.
    pub fn detail_level(&self) -> DetailLevel {
        let level = self.select_dataset(self.state.scale, self.low_detail);
        debug!(?level, scale = self.state.scale, low_detail = self.low_detail, "detail level");
        level
    }

    /// Screen position of `p`, or `None` if it is behind the horizon.
    pub fn project(&self, p: LonLat) -> Option<[f64; 2]> {
        let (lambda, phi) = rotate_forward(self.state.rotation, p);
        if phi.cos() * lambda.cos() < -1e-12 {
            return None;
        }
        Some(self.to_screen(lambda, phi))
    }

    /// Screen position of `p` without horizon clipping; far-side points land
    /// on the disc as if seen through the globe.
    pub fn project_unclipped(&self, p: LonLat) -> [f64; 2] {
        let (lambda, phi) = rotate_forward(self.state.rotation, p);
        self.to_screen(lambda, phi)
    }

    fn to_screen(&self, lambda: f64, phi: f64) -> [f64; 2] {
        let x = phi.cos() * lambda.sin();
        let y = phi.sin();
        let k = self.state.scale;
        [self.translate[0] + k * x, self.translate[1] - k * y]
    }

    /// Geographic position under a screen point, or `None` off the globe disc.
    pub fn invert_screen_point(&self, xy: [f64; 2]) -> Option<LonLat> {
        let k = self.state.scale;
        let x = (xy[0] - self.translate[0]) / k;
        let y = (self.translate[1] - xy[1]) / k;
        let z = x.hypot(y);
        if !z.is_finite() || z > 1.0 + 1e-9 {
            return None;
        }
        let c = z.min(1.0).asin();
        let (sin_c, cos_c) = c.sin_cos();
        let lambda = (x * sin_c).atan2(z * cos_c);
        let phi = if z > 0.0 {
            (y * sin_c / z).clamp(-1.0, 1.0).asin()
        } else {
            0.0
        };
        Some(rotate_inverse(self.state.rotation, lambda, phi))
    }

    /// Geographic position at the view center.
    pub fn center(&self) -> LonLat {
        rotate_inverse(self.state.rotation, 0.0, 0.0)
    }

    pub fn is_visible(&self, p: LonLat) -> bool {
        is_on_visible_hemisphere(self.center(), p)
    }

    /// Point on the horizon along the great circle from the view center to `p`.
    pub fn horizon_point(&self, p: LonLat) -> LonLat {
        horizon_point(self.center(), p)
    }
}

fn rotate_forward(rotation: [f64; 3], p: LonLat) -> (f64, f64) {
    let [dl, dp, dg] = rotation.map(f64::to_radians);
    let lambda = wrap_radians(p.lon_rad() + dl);
    let phi = p.lat_rad();
    if dp == 0.0 && dg == 0.0 {
        return (lambda, phi);
    }

    let (sin_dp, cos_dp) = dp.sin_cos();
    let (sin_dg, cos_dg) = dg.sin_cos();
    let cos_phi = phi.cos();
    let x = lambda.cos() * cos_phi;
    let y = lambda.sin() * cos_phi;
    let z = phi.sin();
    let k = z * cos_dp + x * sin_dp;

    (
        (y * cos_dg - k * sin_dg).atan2(x * cos_dp - z * sin_dp),
        (k * cos_dg + y * sin_dg).clamp(-1.0, 1.0).asin(),
    )
}

fn rotate_inverse(rotation: [f64; 3], lambda: f64, phi: f64) -> LonLat {
    let [dl, dp, dg] = rotation.map(f64::to_radians);
    let (lambda, phi) = if dp == 0.0 && dg == 0.0 {
        (lambda, phi)
    } else {
        let (sin_dp, cos_dp) = dp.sin_cos();
        let (sin_dg, cos_dg) = dg.sin_cos();
        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();
        let k = z * cos_dg - y * sin_dg;
        (
            (y * cos_dg + z * sin_dg).atan2(x * cos_dp + k * sin_dp),
            (k * cos_dp - x * sin_dp).clamp(-1.0, 1.0).asin(),
        )
    };
    LonLat::new(wrap_degrees((lambda - dl).to_degrees()), phi.to_degrees())
}
