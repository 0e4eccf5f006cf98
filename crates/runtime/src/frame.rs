use foundation::time::Time;

/// Tick metadata handed to everything that runs during one scheduler advance.
///
/// Unlike a fixed-step simulation, ticks here carry whatever delta the host
/// event loop observed, so `dt_ms` varies from frame to frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Delta since the previous frame (milliseconds).
    pub dt_ms: f64,
    /// Engine time at the end of the frame.
    pub time: Time,
}

impl Frame {
    pub fn first() -> Self {
        Self {
            index: 0,
            dt_ms: 0.0,
            time: Time::ZERO,
        }
    }

    pub fn next(self, dt_ms: f64) -> Self {
        let dt_ms = dt_ms.max(0.0);
        Self {
            index: self.index + 1,
            dt_ms,
            time: self.time.advanced_by(dt_ms),
        }
    }
}
