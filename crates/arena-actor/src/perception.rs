//! Perception query: which actors can a given actor see?
//!
//! # Algorithm
//!
//! Brute force, O(n) filter + O(k log k) sort per call:
//!
//! 1. drop the requester itself,
//! 2. keep every actor within `range` (inclusive) of the requester,
//! 3. express each survivor's position relative to the requester,
//! 4. stable-sort by distance, so equidistant actors keep creation order.
//!
//! No spatial index is used.  At a few hundred actors the scan is cheaper
//! than maintaining one; beyond a few thousand it becomes the dominant cost
//! of a sweep.
//!
//! # Read consistency
//!
//! [`PerceptionSnapshot`] freezes every actor's position and type once, at
//! the start of a sweep.  All queries made during that sweep are answered
//! from the snapshot, so an actor late in the sweep sees the same world as
//! the first one did, regardless of who has already moved.

use arena_core::{ActorId, BehaviorType, Vec2};

use crate::ActorStore;

/// One visible actor, as reported to a behavior script.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Neighbor {
    /// Position relative to the requester (`other − requester`).
    pub position: Vec2,

    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub behavior_type: BehaviorType,
}

/// Compute the visible-neighbor list for `requester` standing at `origin`.
///
/// `candidates` yields `(id, absolute position, type)` for every actor in the
/// world, the requester included.  The result is freshly allocated.
pub fn nearby_actors<'a, I>(
    requester:  ActorId,
    origin:     Vec2,
    candidates: I,
    range:      f64,
) -> Vec<Neighbor>
where
    I: IntoIterator<Item = (ActorId, Vec2, &'a BehaviorType)>,
{
    let mut visible: Vec<(f64, Neighbor)> = candidates
        .into_iter()
        .filter(|&(id, _, _)| id != requester)
        .filter_map(|(_, position, behavior_type)| {
            let distance = origin.distance(position);
            (distance <= range).then(|| {
                (distance, Neighbor {
                    position:      position - origin,
                    behavior_type: behavior_type.clone(),
                })
            })
        })
        .collect();

    visible.sort_by(|a, b| a.0.total_cmp(&b.0));
    visible.into_iter().map(|(_, neighbor)| neighbor).collect()
}

impl ActorStore {
    /// Live perception query against the current registry contents.
    pub fn nearby(&self, requester: ActorId, range: f64) -> Vec<Neighbor> {
        nearby_actors(
            requester,
            self.position(requester),
            self.iter().map(|r| (r.id(), r.position(), r.behavior_type())),
            range,
        )
    }
}

// ── PerceptionSnapshot ────────────────────────────────────────────────────────

/// Positions and types of every actor, frozen at one instant.
#[derive(Clone, Debug, Default)]
pub struct PerceptionSnapshot {
    /// Indexed by `ActorId`.
    entries: Vec<(Vec2, BehaviorType)>,
}

impl PerceptionSnapshot {
    /// Copy the current positions and types out of `store`.
    pub fn capture(store: &ActorStore) -> Self {
        Self {
            entries: store
                .iter()
                .map(|r| (r.position(), r.behavior_type().clone()))
                .collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Frozen position of `id`, if it existed when the snapshot was taken.
    pub fn position(&self, id: ActorId) -> Option<Vec2> {
        self.entries.get(id.index()).map(|(p, _)| *p)
    }

    /// Perception query answered from the frozen state.
    ///
    /// An unknown requester (created after the snapshot) sees nothing.
    pub fn nearby(&self, requester: ActorId, range: f64) -> Vec<Neighbor> {
        let Some(origin) = self.position(requester) else {
            return Vec::new();
        };
        let candidates = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (p, t))| (ActorId(i as u32), *p, t));
        nearby_actors(requester, origin, candidates, range)
    }
}
