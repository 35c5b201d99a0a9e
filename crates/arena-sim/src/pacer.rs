//! Fixed-period pacing for the real-time driver.

use std::thread;
use std::time::{Duration, Instant};

/// Spaces the starts of consecutive sweeps `period` apart.
///
/// A sweep that takes longer than the period is never overlapped: the next
/// one starts as soon as it finishes and the schedule restarts from there,
/// so a slow tick does not trigger a burst of catch-up ticks.
#[derive(Debug)]
pub struct TickPacer {
    period: Duration,
    next:   Option<Instant>,
}

impl TickPacer {
    pub fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Block until the next sweep may start.
    ///
    /// Returns how late the sweep is starting when the previous one overran
    /// its period.  The first call and a zero period never wait.
    pub fn wait(&mut self) -> Option<Duration> {
        if self.period.is_zero() {
            return None;
        }
        let now = Instant::now();
        let Some(due) = self.next else {
            self.next = Some(now + self.period);
            return None;
        };

        if now < due {
            thread::sleep(due - now);
            self.next = Some(due + self.period);
            None
        } else {
            self.next = Some(now + self.period);
            Some(now - due)
        }
    }
}
