//! Fluent builder for constructing a [`Sim`].

use std::collections::HashMap;
use std::rc::Rc;

use arena_actor::ActorStoreBuilder;
use arena_core::{BehaviorType, Vec2, WorldConfig};

use crate::bridge::{ScriptLogSink, TracingLogSink};
use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Optional inputs (have defaults)
///
/// | Method                    | Default                         |
/// |---------------------------|---------------------------------|
/// | `.behavior(type, src)`    | No behaviors                    |
/// | `.spawn(type, n)`         | No actors                       |
/// | `.spawn_at(type, pos)`    | No actors                       |
/// | `.log_sink(sink)`         | [`TracingLogSink`]              |
///
/// Random placements are drawn from `config.seed`, in the order the spawn
/// calls were made.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(WorldConfig::default())
///     .behavior("actor1", std::fs::read_to_string("behaviors/actor1.rhai")?)
///     .spawn("actor1", 18)
///     .build()?;
/// sim.run_ticks(100, &mut NoopObserver);
/// ```
pub struct SimBuilder {
    config:    WorldConfig,
    behaviors: HashMap<BehaviorType, String>,
    placement: ActorStoreBuilder,
    log_sink:  Option<Rc<dyn ScriptLogSink>>,
}

impl SimBuilder {
    pub fn new(config: WorldConfig) -> Self {
        let placement = ActorStoreBuilder::new(config.bounds, config.seed);
        Self {
            config,
            behaviors: HashMap::new(),
            placement,
            log_sink: None,
        }
    }

    /// Register the script for `behavior_type`.  A later call for the same
    /// type replaces the source.
    pub fn behavior(mut self, behavior_type: impl Into<BehaviorType>, source: impl Into<String>) -> Self {
        self.behaviors.insert(behavior_type.into(), source.into());
        self
    }

    /// Add `count` actors of `behavior_type` at random positions.
    pub fn spawn(mut self, behavior_type: impl Into<BehaviorType>, count: usize) -> Self {
        self.placement = self.placement.spawn(behavior_type, count);
        self
    }

    /// Add one actor at an explicit position.  It must lie inside the world.
    pub fn spawn_at(mut self, behavior_type: impl Into<BehaviorType>, position: Vec2) -> Self {
        self.placement = self.placement.spawn_at(behavior_type, position);
        self
    }

    /// Route script `log` output somewhere other than `tracing`.
    pub fn log_sink<S: ScriptLogSink + 'static>(mut self, sink: Rc<S>) -> Self {
        self.log_sink = Some(sink);
        self
    }

    /// Validate the configuration, then create every planned actor in order.
    ///
    /// Fails on the first actor whose behavior is unknown, fails to compile
    /// or bootstrap, or whose explicit position is out of bounds.
    pub fn build(self) -> SimResult<Sim> {
        self.config
            .validate()
            .map_err(|e| SimError::Config(e.to_string()))?;

        let log_sink = self
            .log_sink
            .unwrap_or_else(|| Rc::new(TracingLogSink) as Rc<dyn ScriptLogSink>);
        let mut sim = Sim::new(self.config, self.behaviors, log_sink);

        for (behavior_type, position) in self.placement.into_placements() {
            sim.add_actor(behavior_type, position)?;
        }

        tracing::debug!(actors = sim.actors().len(), "simulation built");
        Ok(sim)
    }
}
