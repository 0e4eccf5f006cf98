use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

pub const MAX_PROXIMITY_SCORE: u32 = 100;
pub const ACCURACY_BONUS: u32 = 20;
pub const ADJACENCY_BONUS: u32 = 5;
pub const MAX_SCORE: u32 = MAX_PROXIMITY_SCORE + ACCURACY_BONUS;

/// Exponential curve: proportion of the maximum awarded at `d = π`.
pub const EXPONENTIAL_SCALE_FACTOR: f64 = 0.1;
/// Quadratic curve: proportion of the maximum awarded at `d = π/2`.
pub const QUADRATIC_SCALE_FACTOR: f64 = 1.0 / 20.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProximityCurve {
    #[default]
    Exponential,
    Linear,
    Quadratic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub curve: ProximityCurve,
    pub max_proximity: u32,
    pub accuracy_bonus: u32,
    pub adjacency_bonus: u32,
    pub exponential_scale_factor: f64,
    pub quadratic_scale_factor: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            curve: ProximityCurve::Exponential,
            max_proximity: MAX_PROXIMITY_SCORE,
            accuracy_bonus: ACCURACY_BONUS,
            adjacency_bonus: ADJACENCY_BONUS,
            exponential_scale_factor: EXPONENTIAL_SCALE_FACTOR,
            quadratic_scale_factor: QUADRATIC_SCALE_FACTOR,
        }
    }
}

impl ScoringConfig {
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Best possible score for one question.
    pub fn max_score(&self) -> u32 {
        self.max_proximity + self.accuracy_bonus
    }

    /// Proximity points for a central angle `distance` (radians, clamped to `[0, π]`).
    pub fn proximity(&self, distance: f64) -> u32 {
        let d = if distance.is_nan() { PI } else { distance.clamp(0.0, PI) };
        let max = f64::from(self.max_proximity);
        let score = match self.curve {
            ProximityCurve::Exponential => exponential(d, max, self.exponential_scale_factor),
            ProximityCurve::Linear => max * (1.0 - d / PI),
            ProximityCurve::Quadratic => quadratic(d, max, self.quadratic_scale_factor),
        };
        score.round().max(0.0) as u32
    }
}

/// `exp(-(s1·d + s2))`, equal to `max` at 0 and `max · scale` at π.
fn exponential(d: f64, max: f64, scale: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    let floor = (scale * max).max(f64::MIN_POSITIVE);
    let s2 = -max.ln();
    let s1 = -(floor.ln() + s2) / PI;
    (-(s1 * d + s2)).exp()
}

/// `a·d² + b·d + c` through `max` at 0, `max · scale` at π/2 and 0 at π.
fn quadratic(d: f64, max: f64, scale: f64) -> f64 {
    let a = max * (2.0 - 4.0 * scale) / (PI * PI);
    let b = max * (4.0 * scale - 3.0) / PI;
    a * d * d + b * d + max
}

/// Per-question score breakdown.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub accuracy: u32,
    pub proximity: u32,
    pub adjacency: u32,
    pub total: u32,
}

impl Score {
    pub fn new(accuracy: u32, proximity: u32, adjacency: u32) -> Self {
        Self {
            accuracy,
            proximity,
            adjacency,
            total: accuracy + proximity + adjacency,
        }
    }
}
