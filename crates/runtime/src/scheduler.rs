use foundation::time::Time;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Fired<T> {
    pub id: TimerId,
    pub tag: T,
    /// Scheduled due time (not the time `advance` was called).
    pub due: Time,
}

#[derive(Debug, Clone)]
struct Timer<T> {
    id: TimerId,
    tag: T,
    due: Time,
    /// `Some(period)` for intervals.
    period_ms: Option<f64>,
}

/// Deterministic single-threaded timer queue.
///
/// Time only moves when the host calls [`Scheduler::advance`]. Timers due in the
/// same advance fire in `(due, id)` order. An interval fires at most once per
/// advance; periods it missed are skipped rather than replayed, so a stalled
/// host does not produce a burst of catch-up ticks.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Time,
    next_id: u64,
    timers: Vec<Timer<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: Time::ZERO,
            next_id: 0,
            timers: Vec::new(),
        }
    }
}

impl<T: Copy> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Time {
        self.now
    }

    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    fn alloc_id(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn set_timeout(&mut self, delay_ms: f64, tag: T) -> TimerId {
        let id = self.alloc_id();
        self.timers.push(Timer {
            id,
            tag,
            due: self.now.advanced_by(delay_ms),
            period_ms: None,
        });
        id
    }

    pub fn set_interval(&mut self, period_ms: f64, tag: T) -> TimerId {
        let period_ms = period_ms.max(1.0);
        let id = self.alloc_id();
        self.timers.push(Timer {
            id,
            tag,
            due: self.now.advanced_by(period_ms),
            period_ms: Some(period_ms),
        });
        id
    }

    /// Cancels a timer. Returns `false` if it already fired or never existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Moves time forward and returns the timers that came due.
    pub fn advance(&mut self, dt_ms: f64) -> Vec<Fired<T>> {
        self.now = self.now.advanced_by(dt_ms);
        let now = self.now;

        let mut fired: Vec<Fired<T>> = self
            .timers
            .iter()
            .filter(|t| t.due <= now)
            .map(|t| Fired {
                id: t.id,
                tag: t.tag,
                due: t.due,
            })
            .collect();
        fired.sort_by(|a, b| a.due.0.total_cmp(&b.due.0).then_with(|| a.id.cmp(&b.id)));

        self.timers.retain_mut(|t| {
            if t.due > now {
                return true;
            }
            match t.period_ms {
                Some(period) => {
                    let missed = ((now.0 - t.due.0) / period).floor() + 1.0;
                    t.due = t.due.advanced_by(missed * period);
                    true
                }
                None => false,
            }
        });

        fired
    }
}
