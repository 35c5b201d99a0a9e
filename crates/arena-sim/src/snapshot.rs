//! Outbound records: what the broadcaster sees of the world.

use std::time::Duration;

use arena_actor::ActorRecord;
use arena_core::{ActorId, BehaviorType, Tick, Vec2};
use serde::{Deserialize, Serialize};

/// One actor's externally visible state, emitted right after it is processed.
///
/// Serializes as
/// `{"id":0,"type":"actor1","position":{"x":1.0,"y":2.0},"crashes":0}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActorSnapshot {
    pub id: ActorId,

    #[serde(rename = "type")]
    pub behavior_type: BehaviorType,

    pub position: Vec2,

    pub crashes: u64,
}

impl From<ActorRecord<'_>> for ActorSnapshot {
    fn from(record: ActorRecord<'_>) -> Self {
        Self {
            id:            record.id(),
            behavior_type: record.behavior_type().clone(),
            position:      record.position(),
            crashes:       record.crash_count(),
        }
    }
}

/// End-of-sweep statistics.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TickSummary {
    pub tick:    Tick,
    /// Actors stepped this sweep.
    pub actors:  usize,
    /// Steps that ended in a `ScriptFault`.
    pub faults:  usize,
    /// Wall-clock time spent in the sweep.
    pub elapsed: Duration,
}
