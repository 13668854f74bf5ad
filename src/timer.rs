use std::time::{Duration, Instant};

/// A recurring callback schedule that can be cancelled at any point.
///
/// The timer does not call anything itself; the owner polls it with the
/// current time and runs its handler once per returned firing. A zero
/// interval fires on every poll while armed (one per frame).
#[derive(Debug, Clone)]
pub struct RepeatingTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl RepeatingTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// Fires on every poll while armed
    pub fn every_frame() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// (Re)start the schedule; the first firing is one interval after `now`
    pub fn arm(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Number of firings due at `now`. Always 0 once cancelled.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(mut due) = self.next_due else {
            return 0;
        };

        if self.interval.is_zero() {
            return 1;
        }

        let mut fired = 0;
        while due <= now {
            fired += 1;
            due += self.interval;
        }
        self.next_due = Some(due);
        fired
    }
}
