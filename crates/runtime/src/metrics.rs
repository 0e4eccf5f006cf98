/// Rolling draw-time statistics.
///
/// The host samples and clears these on its own cadence, e.g. every 500 ms
/// for an FPS readout.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DrawStats {
    draws: u64,
    total_ms: f64,
    min_ms: f64,
    max_ms: f64,
    last_ms: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawStatsSnapshot {
    pub draws: u64,
    pub average_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub last_ms: f64,
}

impl DrawStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, elapsed_ms: f64) {
        if self.draws == 0 {
            self.min_ms = elapsed_ms;
            self.max_ms = elapsed_ms;
        } else {
            self.min_ms = self.min_ms.min(elapsed_ms);
            self.max_ms = self.max_ms.max(elapsed_ms);
        }
        self.draws += 1;
        self.total_ms += elapsed_ms;
        self.last_ms = elapsed_ms;
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }

    pub fn average_ms(&self) -> f64 {
        if self.draws == 0 {
            0.0
        } else {
            self.total_ms / self.draws as f64
        }
    }

    /// Draws per second over a sampling window. `None` means the globe was idle.
    pub fn fps(&self, window_ms: f64) -> Option<f64> {
        if self.draws == 0 || window_ms <= 0.0 {
            return None;
        }
        Some(1000.0 * self.draws as f64 / window_ms)
    }

    pub fn snapshot(&self) -> DrawStatsSnapshot {
        DrawStatsSnapshot {
            draws: self.draws,
            average_ms: self.average_ms(),
            min_ms: self.min_ms,
            max_ms: self.max_ms,
            last_ms: self.last_ms,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
