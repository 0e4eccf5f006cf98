use foundation::math::shortest_delta_degrees;
use foundation::time::{Time, TimeSpan};

use crate::projection::ProjectionState;

/// Time-parameterized tween from one projection state to another.
///
/// Scale and latitude are interpolated linearly; longitude and roll take the
/// shorter way round, so a globe that auto-rotated past 360° does not unwind.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transition {
    from: ProjectionState,
    to: ProjectionState,
    span: TimeSpan,
}

impl Transition {
    /// Components without a target stay where they are.
    pub fn new(
        from: ProjectionState,
        target_rotation: Option<[f64; 3]>,
        target_scale: Option<f64>,
        start: Time,
        duration_ms: f64,
    ) -> Self {
        let to_rotation = target_rotation.map_or(from.rotation, |[l, p, g]| {
            [
                from.rotation[0] + shortest_delta_degrees(from.rotation[0], l),
                p,
                from.rotation[2] + shortest_delta_degrees(from.rotation[2], g),
            ]
        });
        Self {
            from,
            to: ProjectionState {
                rotation: to_rotation,
                scale: target_scale.unwrap_or(from.scale),
            },
            span: TimeSpan::starting_at(start, duration_ms),
        }
    }

    pub fn target(&self) -> ProjectionState {
        self.to
    }

    pub fn span(&self) -> TimeSpan {
        self.span
    }

    pub fn is_finished(&self, now: Time) -> bool {
        self.span.is_finished(now)
    }

    /// State at normalized time `t` (clamped to `[0, 1]`).
    pub fn sample(&self, t: f64) -> ProjectionState {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: f64, b: f64| a + (b - a) * t;
        ProjectionState {
            rotation: [
                lerp(self.from.rotation[0], self.to.rotation[0]),
                lerp(self.from.rotation[1], self.to.rotation[1]),
                lerp(self.from.rotation[2], self.to.rotation[2]),
            ],
            scale: lerp(self.from.scale, self.to.scale),
        }
    }

    pub fn at(&self, now: Time) -> ProjectionState {
        self.sample(self.span.progress(now))
    }
}
