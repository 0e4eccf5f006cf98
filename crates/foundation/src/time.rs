/// Engine time in milliseconds.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
pub struct Time(pub f64);

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub fn advanced_by(self, dt_ms: f64) -> Self {
        Time(self.0 + dt_ms.max(0.0))
    }

    pub fn since(self, earlier: Time) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }
}

/// Half-open window of engine time, used for tweens.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimeSpan {
    pub start: Time,
    pub end: Time,
}

impl TimeSpan {
    pub fn starting_at(start: Time, duration_ms: f64) -> Self {
        Self {
            start,
            end: start.advanced_by(duration_ms),
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end.0 - self.start.0).max(0.0)
    }

    /// Normalized progress in `[0, 1]`. Zero-length spans are complete immediately.
    pub fn progress(&self, now: Time) -> f64 {
        let d = self.duration();
        if d <= 0.0 {
            return 1.0;
        }
        (now.since(self.start) / d).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now: Time) -> bool {
        now.0 >= self.end.0
    }
}

#[cfg(test)]
mod tests {
    use super::{Time, TimeSpan};

    #[test]
    fn progress_is_clamped() {
        let span = TimeSpan::starting_at(Time(100.0), 200.0);
        assert_eq!(span.progress(Time(0.0)), 0.0);
        assert_eq!(span.progress(Time(200.0)), 0.5);
        assert_eq!(span.progress(Time(1000.0)), 1.0);
        assert!(span.is_finished(Time(300.0)));
        assert!(!span.is_finished(Time(299.0)));
    }

    #[test]
    fn zero_length_span_is_complete() {
        let span = TimeSpan::starting_at(Time(5.0), 0.0);
        assert_eq!(span.progress(Time(5.0)), 1.0);
    }
}
