//! `arena-core` — foundational types for the sandboxed actor arena.
//!
//! This crate is a dependency of every other `arena-*` crate.  It has no
//! `arena-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `ActorId`, `BehaviorType`                             |
//! | [`geo`]         | `Vec2`, `Bounds`, speed clamping                      |
//! | [`time`]        | `Tick`, `SimClock`                                    |
//! | [`rng`]         | `SimRng` (placement)                                  |
//! | [`config`]      | `WorldConfig`, `SandboxLimits`                        |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{SandboxLimits, WorldConfig};
pub use error::{CoreError, CoreResult};
pub use geo::{Bounds, Vec2};
pub use ids::{ActorId, BehaviorType};
pub use rng::SimRng;
pub use time::{SimClock, Tick};
