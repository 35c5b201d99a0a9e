//! `arena-sim` — tick scheduler for the sandboxed actor arena.
//!
//! # Sweep
//!
//! ```text
//! every tick_period_ms:
//!   ① Snapshot   — freeze all positions/types for perception queries.
//!   ② For each actor, in creation order:
//!        step       — run the behavior's main() in its sandbox
//!                     (fault → crash_count += 1, warn, keep going)
//!        integrate  — position = clamp(position + velocity)
//!        emit       — ActorSnapshot to the observer
//!   ③ Summary    — TickSummary to the observer
//! ```
//!
//! # Crate layout
//!
//! | Module           | Contents                                              |
//! |------------------|-------------------------------------------------------|
//! | [`sim`]          | `Sim`, `SchedulerState`                               |
//! | [`builder`]      | `SimBuilder`                                          |
//! | [`bridge`]       | `HostBridge`, `ScriptLogSink`, `TracingLogSink`       |
//! | [`integrator`]   | `integrate`                                           |
//! | [`observer`]     | `SimObserver`, `NoopObserver`                         |
//! | [`pacer`]        | `TickPacer`                                           |
//! | [`snapshot`]     | `ActorSnapshot`, `TickSummary`                        |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use arena_core::WorldConfig;
//! use arena_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(WorldConfig::default())
//!     .behavior("drifter", "fn main() { changeSpeed(1, 0); }")
//!     .spawn("drifter", 10)
//!     .build()?;
//! sim.run_ticks(50, &mut NoopObserver);
//! ```

pub mod bridge;
pub mod builder;
pub mod error;
pub mod integrator;
pub mod observer;
pub mod pacer;
pub mod sim;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use bridge::{HostBridge, ScriptLogSink, TracingLogSink, render_log_line};
pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use integrator::integrate;
pub use observer::{NoopObserver, SimObserver};
pub use pacer::TickPacer;
pub use sim::{SchedulerState, Sim};
pub use snapshot::{ActorSnapshot, TickSummary};
