//! Host side of the capability bridge.
//!
//! Every actor owns one [`HostBridge`].  Between steps it is idle; the
//! scheduler opens a *frame* before the actor's step (the sweep's perception
//! snapshot plus the actor's current velocity) and closes it afterwards,
//! committing whatever velocity the script settled on.

use std::rc::Rc;

use arena_actor::{Neighbor, PerceptionSnapshot};
use arena_core::{ActorId, BehaviorType, Vec2, WorldConfig};
use arena_sandbox::CapabilityBridge;
use serde_json::Value;

// ── Script log sink ───────────────────────────────────────────────────────────

/// Destination of the values behaviors pass to `log`.
pub trait ScriptLogSink {
    fn log(&self, actor: ActorId, behavior_type: &BehaviorType, values: &[Value]);
}

/// Emits every script `log` call as an `info` event on target
/// `arena::script`.
#[derive(Copy, Clone, Debug, Default)]
pub struct TracingLogSink;

impl ScriptLogSink for TracingLogSink {
    fn log(&self, actor: ActorId, behavior_type: &BehaviorType, values: &[Value]) {
        tracing::info!(
            target: "arena::script",
            actor = actor.0,
            behavior = %behavior_type,
            "{}",
            render_log_line(values)
        );
    }
}

/// Space-separated; strings appear bare, everything else as compact JSON.
pub fn render_log_line(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ── HostBridge ────────────────────────────────────────────────────────────────

pub struct HostBridge {
    id:            ActorId,
    behavior_type: BehaviorType,
    max_speed:     f64,
    range:         f64,
    sink:          Rc<dyn ScriptLogSink>,
    /// Velocity as last set by the script (or carried in by `begin_step`).
    velocity:      Vec2,
    /// Present only while a step is running.
    perception:    Option<Rc<PerceptionSnapshot>>,
}

impl HostBridge {
    pub fn new(
        id:            ActorId,
        behavior_type: BehaviorType,
        config:        &WorldConfig,
        sink:          Rc<dyn ScriptLogSink>,
    ) -> Self {
        Self {
            id,
            behavior_type,
            max_speed: config.max_speed,
            range: config.range,
            sink,
            velocity: Vec2::ZERO,
            perception: None,
        }
    }

    /// Open a frame for one step.
    pub fn begin_step(&mut self, perception: Rc<PerceptionSnapshot>, velocity: Vec2) {
        self.perception = Some(perception);
        self.velocity = velocity;
    }

    /// Close the frame and return the velocity to commit.
    pub fn end_step(&mut self) -> Vec2 {
        self.perception = None;
        self.velocity
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }
}

impl CapabilityBridge for HostBridge {
    fn log(&mut self, values: Vec<Value>) {
        self.sink.log(self.id, &self.behavior_type, &values);
    }

    fn change_speed(&mut self, x: f64, y: f64) {
        self.velocity = Vec2::new(x, y).clamp_speed(self.max_speed);
    }

    /// Outside a frame (during bootstrap) the world is not visible yet.
    fn get_nearby_actors(&self) -> Vec<Neighbor> {
        match &self.perception {
            Some(snapshot) => snapshot.nearby(self.id, self.range),
            None => Vec::new(),
        }
    }
}
