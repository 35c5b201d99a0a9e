//! Simulation observer trait: the broadcaster seam.

use arena_core::{ActorId, Tick};
use arena_sandbox::ScriptFault;

use crate::{ActorSnapshot, TickSummary};

/// Callbacks invoked by [`Sim`][crate::Sim] during every sweep.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — crash reporter
///
/// ```rust,ignore
/// struct CrashReporter;
///
/// impl SimObserver for CrashReporter {
///     fn on_script_fault(&mut self, tick: Tick, actor: ActorId, fault: &ScriptFault) {
///         eprintln!("{tick}: {actor} crashed ({fault})");
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any actor steps.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per actor per tick, immediately after that actor has been
    /// stepped and integrated.  Actors arrive in creation order.
    fn on_actor_snapshot(&mut self, _tick: Tick, _snapshot: &ActorSnapshot) {}

    /// Called when an actor's step faults, before its snapshot.
    fn on_script_fault(&mut self, _tick: Tick, _actor: ActorId, _fault: &ScriptFault) {}

    /// Called after the last actor of the sweep.
    fn on_tick_end(&mut self, _summary: &TickSummary) {}

    /// Called once when [`Sim::run`][crate::Sim::run] reaches `total_ticks`.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

impl<O: SimObserver + ?Sized> SimObserver for &mut O {
    fn on_tick_start(&mut self, tick: Tick) {
        (**self).on_tick_start(tick);
    }
    fn on_actor_snapshot(&mut self, tick: Tick, snapshot: &ActorSnapshot) {
        (**self).on_actor_snapshot(tick, snapshot);
    }
    fn on_script_fault(&mut self, tick: Tick, actor: ActorId, fault: &ScriptFault) {
        (**self).on_script_fault(tick, actor, fault);
    }
    fn on_tick_end(&mut self, summary: &TickSummary) {
        (**self).on_tick_end(summary);
    }
    fn on_sim_end(&mut self, final_tick: Tick) {
        (**self).on_sim_end(final_tick);
    }
}

/// An absent observer does nothing.
impl<O: SimObserver> SimObserver for Option<O> {
    fn on_tick_start(&mut self, tick: Tick) {
        if let Some(o) = self {
            o.on_tick_start(tick);
        }
    }
    fn on_actor_snapshot(&mut self, tick: Tick, snapshot: &ActorSnapshot) {
        if let Some(o) = self {
            o.on_actor_snapshot(tick, snapshot);
        }
    }
    fn on_script_fault(&mut self, tick: Tick, actor: ActorId, fault: &ScriptFault) {
        if let Some(o) = self {
            o.on_script_fault(tick, actor, fault);
        }
    }
    fn on_tick_end(&mut self, summary: &TickSummary) {
        if let Some(o) = self {
            o.on_tick_end(summary);
        }
    }
    fn on_sim_end(&mut self, final_tick: Tick) {
        if let Some(o) = self {
            o.on_sim_end(final_tick);
        }
    }
}

/// Fan out to two observers, first `A` then `B`.
impl<A: SimObserver, B: SimObserver> SimObserver for (A, B) {
    fn on_tick_start(&mut self, tick: Tick) {
        self.0.on_tick_start(tick);
        self.1.on_tick_start(tick);
    }
    fn on_actor_snapshot(&mut self, tick: Tick, snapshot: &ActorSnapshot) {
        self.0.on_actor_snapshot(tick, snapshot);
        self.1.on_actor_snapshot(tick, snapshot);
    }
    fn on_script_fault(&mut self, tick: Tick, actor: ActorId, fault: &ScriptFault) {
        self.0.on_script_fault(tick, actor, fault);
        self.1.on_script_fault(tick, actor, fault);
    }
    fn on_tick_end(&mut self, summary: &TickSummary) {
        self.0.on_tick_end(summary);
        self.1.on_tick_end(summary);
    }
    fn on_sim_end(&mut self, final_tick: Tick) {
        self.0.on_sim_end(final_tick);
        self.1.on_sim_end(final_tick);
    }
}
