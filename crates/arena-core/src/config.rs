//! World configuration.
//!
//! Read-only after startup.  Typically loaded from a JSON file by the
//! application crate (with the `serde` feature) and passed to the simulation
//! builder; every field has a default so partial files are accepted.

use std::time::Duration;

use crate::{Bounds, CoreError, CoreResult};

const MIB: usize = 1024 * 1024;

// ── SandboxLimits ─────────────────────────────────────────────────────────────

// Script call levels and expression nesting recurse on the native stack,
// and a debug build uses several times more stack per level.  These match
// the script engine's own defaults so a 2 MiB thread never overflows.
#[cfg(debug_assertions)]
const DEFAULT_CALL_LEVELS: usize = 8;
#[cfg(not(debug_assertions))]
const DEFAULT_CALL_LEVELS: usize = 64;

#[cfg(debug_assertions)]
const DEFAULT_EXPR_DEPTH: usize = 32;
#[cfg(not(debug_assertions))]
const DEFAULT_EXPR_DEPTH: usize = 64;

#[cfg(debug_assertions)]
const DEFAULT_FUNCTION_EXPR_DEPTH: usize = 16;
#[cfg(not(debug_assertions))]
const DEFAULT_FUNCTION_EXPR_DEPTH: usize = 32;

/// Per-sandbox resource ceilings.
///
/// The memory quota bounds every byte a sandbox's script holds on the heap,
/// counted across steps (see `arena_sandbox::CountingAllocator`).  On top of
/// that, no single string may exceed the quota in bytes and no array or map
/// may hold more than `quota / 16` elements (one script value is 16 bytes).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct SandboxLimits {
    /// Memory quota in MiB.  Default: 16.
    pub memory_mb: usize,

    /// Maximum script operations per step.  `0` disables the budget.
    pub max_operations: u64,

    /// Maximum function-call nesting depth.  Default: 8 in debug builds,
    /// 64 in release builds.
    pub max_call_levels: usize,

    /// Maximum expression nesting depth at the top level of a script.
    pub max_expr_depth: usize,

    /// Maximum expression nesting depth inside function bodies.
    pub max_function_expr_depth: usize,

    /// Wall-clock ceiling for one step in milliseconds.  `None` disables it.
    pub step_timeout_ms: Option<u64>,
}

impl SandboxLimits {
    #[inline]
    pub fn memory_bytes(&self) -> usize {
        self.memory_mb.saturating_mul(MIB)
    }

    /// Element ceiling for arrays and maps derived from the memory quota.
    #[inline]
    pub fn max_collection_len(&self) -> usize {
        self.memory_bytes() / 16
    }

    #[inline]
    pub fn step_timeout(&self) -> Option<Duration> {
        self.step_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for SandboxLimits {
    fn default() -> Self {
        Self {
            memory_mb:               16,
            max_operations:          1_000_000,
            max_call_levels:         DEFAULT_CALL_LEVELS,
            max_expr_depth:          DEFAULT_EXPR_DEPTH,
            max_function_expr_depth: DEFAULT_FUNCTION_EXPR_DEPTH,
            step_timeout_ms:         Some(50),
        }
    }
}

// ── WorldConfig ───────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct WorldConfig {
    /// Playable rectangle.  Default: 1400 × 1000.
    pub bounds: Bounds,

    /// Largest speed an actor may request via `changeSpeed`.  Default: 10.
    pub max_speed: f64,

    /// Visibility radius of `getNearbyActors`.  Default: 500.
    pub range: f64,

    /// Ceilings applied to every actor's sandbox.
    pub sandbox: SandboxLimits,

    /// Period between the starts of two sweeps in milliseconds.  Default: 100.
    pub tick_period_ms: u64,

    /// Master RNG seed for initial placement.
    pub seed: u64,

    /// Stop after this many ticks.  `None` runs until the process exits.
    pub total_ticks: Option<u64>,
}

impl WorldConfig {
    #[inline]
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    /// Reject configurations that would break the world invariants.
    pub fn validate(&self) -> CoreResult<()> {
        let Bounds { width, height } = self.bounds;
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(CoreError::Config(format!(
                "world bounds must be positive and finite, got {width} x {height}"
            )));
        }
        if !(self.max_speed.is_finite() && self.max_speed >= 0.0) {
            return Err(CoreError::Config(format!(
                "max_speed must be finite and non-negative, got {}",
                self.max_speed
            )));
        }
        if !(self.range.is_finite() && self.range >= 0.0) {
            return Err(CoreError::Config(format!(
                "range must be finite and non-negative, got {}",
                self.range
            )));
        }
        if self.sandbox.memory_mb == 0 {
            return Err(CoreError::Config("sandbox memory quota must be at least 1 MiB".into()));
        }
        Ok(())
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            bounds:         Bounds::default(),
            max_speed:      10.0,
            range:          500.0,
            sandbox:        SandboxLimits::default(),
            tick_period_ms: 100,
            seed:           0,
            total_ticks:    None,
        }
    }
}
