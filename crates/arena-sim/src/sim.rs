//! The `Sim` struct and its tick loop.

use std::collections::HashMap;
use std::rc::Rc;
use std::time::Instant;

use arena_actor::{ActorStore, PerceptionSnapshot};
use arena_core::{ActorId, BehaviorType, CoreError, SimClock, Tick, Vec2, WorldConfig};
use arena_sandbox::ActorSandbox;
use tracing::{debug, warn};

use crate::bridge::{HostBridge, ScriptLogSink};
use crate::integrator::integrate;
use crate::pacer::TickPacer;
use crate::{ActorSnapshot, SimError, SimObserver, SimResult, TickSummary};

/// Whether a sweep is in progress.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Sweeping,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// Each tick is one sequential sweep over every actor in creation order:
///
/// 1. **Snapshot**: positions and types of all actors are frozen into a
///    [`PerceptionSnapshot`].  Every `getNearbyActors` call made during the
///    sweep is answered from it.
/// 2. For each actor:
///    - **Step** its sandbox once.  `changeSpeed` updates the actor's
///      velocity; a fault bumps its crash count and is reported, then the
///      sweep carries on.
///    - **Integrate** its position with its current velocity, fault or not.
///    - **Emit** its [`ActorSnapshot`] to the observer.
/// 3. Report a [`TickSummary`].
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// World configuration.  Read-only after construction.
    pub config: WorldConfig,

    /// Tracks the current tick.
    pub clock: SimClock,

    /// Actor registry (SoA).  Parallel to `sandboxes`.
    actors: ActorStore,

    /// One sandbox per actor, indexed by `ActorId`.
    sandboxes: Vec<ActorSandbox<HostBridge>>,

    /// Behavior sources keyed by type.
    behaviors: HashMap<BehaviorType, String>,

    log_sink: Rc<dyn ScriptLogSink>,

    state: SchedulerState,
}

impl Sim {
    pub(crate) fn new(
        config:    WorldConfig,
        behaviors: HashMap<BehaviorType, String>,
        log_sink:  Rc<dyn ScriptLogSink>,
    ) -> Self {
        Self {
            clock: SimClock::new(config.tick_period()),
            actors: ActorStore::new(config.bounds),
            sandboxes: Vec::new(),
            behaviors,
            log_sink,
            state: SchedulerState::Idle,
            config,
        }
    }

    // ── Actors ────────────────────────────────────────────────────────────

    /// Register (or replace) the script used by future actors of
    /// `behavior_type`.  Existing actors keep the sandbox they were built
    /// with.
    pub fn register_behavior(&mut self, behavior_type: impl Into<BehaviorType>, source: String) {
        self.behaviors.insert(behavior_type.into(), source);
    }

    /// Create an actor at `position` running the `behavior_type` script.
    ///
    /// The sandbox is fully built and bootstrapped before the actor enters
    /// the registry, so a failure leaves the world unchanged.  Any velocity
    /// set by the script's top-level code is kept.
    pub fn add_actor(
        &mut self,
        behavior_type: impl Into<BehaviorType>,
        position:      Vec2,
    ) -> SimResult<ActorId> {
        let behavior_type = behavior_type.into();
        let bounds = self.config.bounds;
        if !bounds.contains(position) {
            return Err(SimError::PositionOutOfBounds {
                position,
                width: bounds.width,
                height: bounds.height,
            });
        }
        let source = self
            .behaviors
            .get(&behavior_type)
            .ok_or_else(|| SimError::UnknownBehavior(behavior_type.clone()))?;

        let id = self.actors.next_id();
        let bridge = HostBridge::new(
            id,
            behavior_type.clone(),
            &self.config,
            Rc::clone(&self.log_sink),
        );
        let sandbox = ActorSandbox::new(source, behavior_type.clone(), &self.config.sandbox, bridge)
            .map_err(|source| SimError::Sandbox {
                behavior: behavior_type.clone(),
                source,
            })?;

        let initial_velocity = sandbox.bridge().velocity();
        let pushed = self.actors.push(behavior_type, position);
        debug_assert_eq!(pushed, id);
        self.actors.handle_mut(id).set_velocity(initial_velocity);
        self.sandboxes.push(sandbox);

        debug!(actor = %id, behavior = %self.actors.behavior_type(id), %position, "actor created");
        Ok(id)
    }

    /// Read-only registry access.
    #[inline]
    pub fn actors(&self) -> &ActorStore {
        &self.actors
    }

    pub fn snapshot(&self, id: ActorId) -> SimResult<ActorSnapshot> {
        let record = self.actors.get(id).ok_or(CoreError::ActorNotFound(id))?;
        Ok(ActorSnapshot::from(record))
    }

    /// Every actor's current snapshot in creation order.
    pub fn snapshots(&self) -> Vec<ActorSnapshot> {
        self.actors.iter().map(ActorSnapshot::from).collect()
    }

    #[inline]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    #[inline]
    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    // ── Driving ───────────────────────────────────────────────────────────

    /// Run in real time, one sweep every `config.tick_period_ms`, until
    /// `config.total_ticks` have been run (or forever when unset).
    ///
    /// A zero period runs sweeps back to back.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) {
        let mut pacer = TickPacer::new(self.config.tick_period());
        while self
            .config
            .total_ticks
            .is_none_or(|total| self.clock.current_tick.0 < total)
        {
            if let Some(late) = pacer.wait() {
                debug!(
                    tick = %self.clock.current_tick,
                    late_ms = late.as_millis() as u64,
                    period_ms = pacer.period().as_millis() as u64,
                    "previous sweep overran its period"
                );
            }
            self.tick(observer);
        }
        observer.on_sim_end(self.clock.current_tick);
    }

    /// Run exactly `n` sweeps back to back from the current tick (ignores
    /// pacing and `total_ticks`).
    ///
    /// Useful for tests and batch runs.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.tick(observer);
        }
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn tick<O: SimObserver>(&mut self, observer: &mut O) {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let summary = self.sweep(now, observer);
        observer.on_tick_end(&summary);
        self.clock.advance();
    }

    fn sweep<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> TickSummary {
        let started = Instant::now();
        self.state = SchedulerState::Sweeping;

        let perception = Rc::new(PerceptionSnapshot::capture(&self.actors));
        let bounds = self.config.bounds;
        let mut faults = 0;

        for (id, sandbox) in self.actors.actor_ids().zip(self.sandboxes.iter_mut()) {
            let mut actor = self.actors.handle_mut(id);

            sandbox.bridge().begin_step(Rc::clone(&perception), actor.velocity());
            let outcome = sandbox.step();
            let velocity = sandbox.bridge().end_step();
            actor.set_velocity(velocity);

            if let Err(fault) = outcome {
                faults += 1;
                let crashes = actor.record_crash();
                warn!(
                    actor = %id,
                    behavior = %sandbox.behavior_type(),
                    kind = %fault.kind,
                    crashes,
                    "script step faulted: {}",
                    fault.message
                );
                observer.on_script_fault(now, id, &fault);
            }

            let next = integrate(actor.position(), actor.velocity(), bounds);
            actor.set_position(next);

            observer.on_actor_snapshot(now, &ActorSnapshot::from(self.actors.record(id)));
        }

        self.state = SchedulerState::Idle;
        TickSummary {
            tick:    now,
            actors:  self.sandboxes.len(),
            faults,
            elapsed: started.elapsed(),
        }
    }
}

impl std::fmt::Debug for Sim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sim")
            .field("clock", &self.clock)
            .field("actors", &self.actors.len())
            .field("behaviors", &self.behaviors.keys().collect::<Vec<_>>())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
