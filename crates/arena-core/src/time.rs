//! Simulation time model.
//!
//! Time is a monotonically increasing `Tick` counter.  One tick is one full
//! sweep over every actor.  `SimClock` maps ticks to the nominal wall-clock
//! schedule:
//!
//!   nominal_elapsed = tick * tick_period
//!
//! The real elapsed time can be longer when sweeps overrun their period; the
//! clock tracks the schedule, not the wall.

use std::fmt;
use std::time::Duration;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current tick and the fixed period between ticks.
#[derive(Clone, Debug)]
pub struct SimClock {
    /// Nominal time between the starts of two consecutive sweeps.
    pub tick_period: Duration,
    /// The current tick, advanced by `SimClock::advance()` after each sweep.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(tick_period: Duration) -> Self {
        Self {
            tick_period,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick + 1;
    }

    /// Nominal simulated time since tick 0.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        let ticks = u32::try_from(self.current_tick.0).unwrap_or(u32::MAX);
        self.tick_period.saturating_mul(ticks)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (+{} ms)", self.current_tick, self.elapsed().as_millis())
    }
}
