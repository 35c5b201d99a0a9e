//! The capability bridge: the only host operations a behavior script can
//! reach.

use arena_actor::Neighbor;
use serde_json::Value;

/// Host-side implementation of the three sandbox-visible operations.
///
/// The sandbox never hands the implementor to the script.  Each operation is
/// installed as an opaque native function that forwards to the bridge, so a
/// script can call `log`, `changeSpeed`, and `getNearbyActors` but cannot
/// name, store, or inspect the object behind them.
///
/// All methods run synchronously on the thread executing the step; the
/// script resumes only after they return.
pub trait CapabilityBridge {
    /// `log(values...)` — each value has already been copied out of the
    /// sandbox into an independent JSON snapshot.
    fn log(&mut self, values: Vec<Value>);

    /// `changeSpeed(x, y)` — both components are finite.  Clamping to the
    /// world's speed limit is the bridge's responsibility.
    fn change_speed(&mut self, x: f64, y: f64);

    /// `getNearbyActors()` — the result is copied into fresh script values
    /// on every call.
    fn get_nearby_actors(&self) -> Vec<Neighbor>;
}
