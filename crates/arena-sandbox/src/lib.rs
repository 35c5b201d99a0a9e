//! `arena-sandbox` — isolated execution of actor behavior scripts.
//!
//! Behaviors are [rhai](https://rhai.rs) scripts.  Every actor gets its own
//! [`ActorSandbox`]: a private engine and scope, resource limits taken from
//! [`SandboxLimits`][arena_core::SandboxLimits], and exactly three host
//! functions that forward to a [`CapabilityBridge`]:
//!
//! | Script function        | Bridge method                               |
//! |------------------------|---------------------------------------------|
//! | `log(v1, …, v16)`      | [`CapabilityBridge::log`]                   |
//! | `changeSpeed(x, y)`    | [`CapabilityBridge::change_speed`]          |
//! | `getNearbyActors()`    | [`CapabilityBridge::get_nearby_actors`]     |
//!
//! Module imports, `eval`, `print`, and `debug` are unavailable.  Values cross
//! the boundary only as deep copies in either direction.
//!
//! The memory quota counts heap bytes through [`CountingAllocator`], which
//! the final binary must install as its `#[global_allocator]`.
//!
//! # Crate layout
//!
//! | Module        | Contents                                               |
//! |---------------|--------------------------------------------------------|
//! | [`bridge`]    | `CapabilityBridge` trait                               |
//! | [`sandbox`]   | `ActorSandbox`, lifecycle, `step`                      |
//! | [`error`]     | `SandboxError`, `ScriptFault`, `FaultKind`             |
//! | [`meter`]     | `CountingAllocator` for the memory quota               |

pub mod bridge;
pub mod error;
pub mod meter;
pub mod sandbox;

mod engine;


pub use bridge::CapabilityBridge;
pub use engine::MAX_LOG_ARGS;
pub use error::{FaultKind, SandboxError, SandboxResult, ScriptFault};
pub use meter::CountingAllocator;
pub use sandbox::{ActorSandbox, ENTRY_POINT, MEMORY_VAR};
