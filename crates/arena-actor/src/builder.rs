//! Fluent builder for populating an `ActorStore`.
//!
//! # Usage
//!
//! ```rust
//! use arena_actor::ActorStoreBuilder;
//! use arena_core::{Bounds, Vec2};
//!
//! let store = ActorStoreBuilder::new(Bounds::new(100.0, 100.0), /*seed=*/ 42)
//!     .spawn("chaser", 3)
//!     .spawn_at("wall", Vec2::new(0.0, 50.0))
//!     .build();
//!
//! assert_eq!(store.len(), 4);
//! ```
//!
//! The simulation uses the builder's placement plan (see
//! [`ActorStoreBuilder::placements`]) so each actor's sandbox can be created
//! before its record is pushed.

use arena_core::{BehaviorType, Bounds, SimRng, Vec2};

use crate::ActorStore;

/// Fluent builder for [`ActorStore`].
///
/// Random placements are drawn from a `SimRng` seeded once at construction,
/// so the same seed and spawn order always produce the same layout.
pub struct ActorStoreBuilder {
    bounds:     Bounds,
    rng:        SimRng,
    placements: Vec<(BehaviorType, Vec2)>,
}

impl ActorStoreBuilder {
    pub fn new(bounds: Bounds, seed: u64) -> Self {
        Self {
            bounds,
            rng: SimRng::new(seed),
            placements: Vec::new(),
        }
    }

    /// Add `count` actors of `behavior_type` at uniformly random positions.
    pub fn spawn(mut self, behavior_type: impl Into<BehaviorType>, count: usize) -> Self {
        let behavior_type = behavior_type.into();
        for _ in 0..count {
            let position = self.rng.point_in(self.bounds);
            self.placements.push((behavior_type.clone(), position));
        }
        self
    }

    /// Add one actor of `behavior_type` at an explicit position.
    pub fn spawn_at(mut self, behavior_type: impl Into<BehaviorType>, position: Vec2) -> Self {
        self.placements.push((behavior_type.into(), position));
        self
    }

    /// The planned actors in creation order.
    pub fn placements(&self) -> &[(BehaviorType, Vec2)] {
        &self.placements
    }

    /// Consume the builder, returning the placement plan.
    pub fn into_placements(self) -> Vec<(BehaviorType, Vec2)> {
        self.placements
    }

    /// Construct the store with every planned actor pushed in order.
    pub fn build(self) -> ActorStore {
        let mut store = ActorStore::new(self.bounds);
        for (behavior_type, position) in self.placements {
            store.push(behavior_type, position);
        }
        store
    }
}
