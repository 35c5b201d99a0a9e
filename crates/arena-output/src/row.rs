//! Plain data row types written by history backends.

use arena_core::Tick;
use arena_sandbox::ScriptFault;
use arena_sim::{ActorSnapshot, TickSummary};

/// One actor's state after it was processed in a given tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorSnapshotRow {
    pub tick:          u64,
    pub actor_id:      u32,
    pub behavior_type: String,
    pub x:             f64,
    pub y:             f64,
    pub crashes:       u64,
}

impl ActorSnapshotRow {
    pub fn new(tick: Tick, snapshot: &ActorSnapshot) -> Self {
        Self {
            tick:          tick.0,
            actor_id:      snapshot.id.0,
            behavior_type: snapshot.behavior_type.to_string(),
            x:             snapshot.position.x,
            y:             snapshot.position.y,
            crashes:       snapshot.crashes,
        }
    }
}

/// One faulted script step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFaultRow {
    pub tick:     u64,
    pub actor_id: u32,
    pub kind:     String,
    pub message:  String,
}

impl ScriptFaultRow {
    pub fn new(tick: Tick, actor_id: u32, fault: &ScriptFault) -> Self {
        Self {
            tick:    tick.0,
            actor_id,
            kind:    fault.kind.to_string(),
            message: fault.message.clone(),
        }
    }
}

/// Summary statistics for one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:       u64,
    pub actors:     u64,
    pub faults:     u64,
    pub elapsed_us: u64,
}

impl From<&TickSummary> for TickSummaryRow {
    fn from(s: &TickSummary) -> Self {
        Self {
            tick:       s.tick.0,
            actors:     s.actors as u64,
            faults:     s.faults as u64,
            elapsed_us: u64::try_from(s.elapsed.as_micros()).unwrap_or(u64::MAX),
        }
    }
}
