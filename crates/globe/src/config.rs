use serde::{Deserialize, Serialize};

use crate::symbology::Symbology;

/// Tunables for the globe view. Every field has a default, so a config file
/// only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub width: f64,
    pub height: f64,
    pub padding_top: f64,
    pub padding_bottom: f64,

    pub max_scale: f64,
    pub max_latitude_deg: f64,
    /// Scale below which the low-detail dataset is drawn.
    pub scale_threshold: f64,
    /// Degrees of rotation per pixel at scale 1.
    pub rotation_scale_constant: f64,
    /// Wheel units spanning the whole zoom curve.
    pub zoom_range: f64,

    pub rotation_update_interval_ms: f64,
    pub click_threshold_px: f64,
    pub wheel_settle_ms: f64,

    pub auto_rotate_step_deg: f64,
    pub auto_rotate_period_ms: f64,

    pub animation_tick_ms: f64,
    pub rotation_transition_ms: f64,
    pub zoom_out_transition_ms: f64,

    /// Countries whose bounding angular radius is below this also get a ring.
    pub small_country_radius_deg: f64,
    pub circle_step_deg: f64,
    pub guide_line_step_deg: f64,
    pub graticule_step_deg: f64,
    pub marker_radius_px: f64,

    pub symbology: Symbology,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            padding_top: 150.0,
            padding_bottom: 50.0,

            max_scale: 3500.0,
            max_latitude_deg: 66.5,
            scale_threshold: 1000.0,
            rotation_scale_constant: 90.0,
            zoom_range: 2000.0,

            rotation_update_interval_ms: 20.0,
            click_threshold_px: 3.0,
            wheel_settle_ms: 100.0,

            auto_rotate_step_deg: 0.5,
            auto_rotate_period_ms: 30.0,

            animation_tick_ms: 16.0,
            rotation_transition_ms: 700.0,
            zoom_out_transition_ms: 1000.0,

            small_country_radius_deg: 1.0,
            circle_step_deg: 6.0,
            guide_line_step_deg: 2.0,
            graticule_step_deg: 10.0,
            marker_radius_px: 5.0,

            symbology: Symbology::default(),
        }
    }
}

impl GlobeConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}
