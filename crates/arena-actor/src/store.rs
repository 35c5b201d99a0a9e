//! Actor registry: `ActorStore` (SoA data), read-only `ActorRecord` views,
//! and single-actor `ActorHandle` mutation handles.
//!
//! # Ownership
//!
//! The simulation owns the store exclusively.  Other components see either a
//! read-only [`ActorRecord`] or an [`ActorHandle`] that can only touch the one
//! actor it was created for, so no actor can write another actor's record.
//!
//! Sandboxes are deliberately *not* stored here: the scheduler needs
//! `&mut sandbox` and `&store` at the same time, which the borrow checker
//! only allows when they live in separate structs.

use arena_core::{ActorId, BehaviorType, Bounds, Vec2};

/// Structure-of-Arrays storage for all actor state.
///
/// Every `Vec` has exactly `len()` elements; the `ActorId` value is the index
/// into all of them.  Ids are assigned by [`push`](Self::push) in creation
/// order and never reused.
///
/// Accessors taking an `ActorId` index directly and panic on an id that was
/// never issued by this store; use [`get`](Self::get) for a fallible lookup.
#[derive(Clone, Debug)]
pub struct ActorStore {
    bounds:        Bounds,
    behavior_type: Vec<BehaviorType>,
    position:      Vec<Vec2>,
    velocity:      Vec<Vec2>,
    crash_count:   Vec<u64>,
}

impl ActorStore {
    /// An empty registry for a world of the given size.
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            behavior_type: Vec::new(),
            position:      Vec::new(),
            velocity:      Vec::new(),
            crash_count:   Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.position.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// The id the next [`push`](Self::push) will assign.
    #[inline]
    pub fn next_id(&self) -> ActorId {
        ActorId(self.len() as u32)
    }

    /// Register a new actor at `position` with zero velocity and no crashes.
    ///
    /// `position` is clamped into the world bounds.
    pub fn push(&mut self, behavior_type: BehaviorType, position: Vec2) -> ActorId {
        let id = self.next_id();
        self.behavior_type.push(behavior_type);
        self.position.push(self.bounds.clamp(position));
        self.velocity.push(Vec2::ZERO);
        self.crash_count.push(0);
        id
    }

    /// Iterator over all `ActorId`s in creation order.
    pub fn actor_ids(&self) -> impl Iterator<Item = ActorId> + use<> {
        (0..self.len() as u32).map(ActorId)
    }

    /// Read-only views of every actor in creation order.
    pub fn iter(&self) -> impl Iterator<Item = ActorRecord<'_>> + '_ {
        self.actor_ids().map(|id| self.record(id))
    }

    #[inline]
    pub fn contains(&self, id: ActorId) -> bool {
        id.index() < self.len()
    }

    // ── Per-actor reads ───────────────────────────────────────────────────

    #[inline]
    pub fn position(&self, id: ActorId) -> Vec2 {
        self.position[id.index()]
    }

    #[inline]
    pub fn velocity(&self, id: ActorId) -> Vec2 {
        self.velocity[id.index()]
    }

    #[inline]
    pub fn crash_count(&self, id: ActorId) -> u64 {
        self.crash_count[id.index()]
    }

    #[inline]
    pub fn behavior_type(&self, id: ActorId) -> &BehaviorType {
        &self.behavior_type[id.index()]
    }

    /// Read-only view of one actor.
    #[inline]
    pub fn record(&self, id: ActorId) -> ActorRecord<'_> {
        ActorRecord { store: self, id }
    }

    /// Fallible variant of [`record`](Self::record).
    pub fn get(&self, id: ActorId) -> Option<ActorRecord<'_>> {
        self.contains(id).then(|| self.record(id))
    }

    /// Mutation handle scoped to a single actor.
    #[inline]
    pub fn handle_mut(&mut self, id: ActorId) -> ActorHandle<'_> {
        assert!(self.contains(id), "{id} was never issued by this store");
        ActorHandle { store: self, id }
    }
}

// ── ActorRecord ───────────────────────────────────────────────────────────────

/// A read-only view of one actor's state.
#[derive(Copy, Clone)]
pub struct ActorRecord<'a> {
    store: &'a ActorStore,
    id:    ActorId,
}

impl<'a> ActorRecord<'a> {
    #[inline]
    pub fn id(&self) -> ActorId {
        self.id
    }

    #[inline]
    pub fn behavior_type(&self) -> &'a BehaviorType {
        self.store.behavior_type(self.id)
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.store.position(self.id)
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.store.velocity(self.id)
    }

    #[inline]
    pub fn crash_count(&self) -> u64 {
        self.store.crash_count(self.id)
    }
}

impl std::fmt::Debug for ActorRecord<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorRecord")
            .field("id", &self.id)
            .field("behavior_type", self.behavior_type())
            .field("position", &self.position())
            .field("velocity", &self.velocity())
            .field("crash_count", &self.crash_count())
            .finish()
    }
}

// ── ActorHandle ───────────────────────────────────────────────────────────────

/// Exclusive write access to exactly one actor's record.
pub struct ActorHandle<'a> {
    store: &'a mut ActorStore,
    id:    ActorId,
}

impl ActorHandle<'_> {
    #[inline]
    pub fn id(&self) -> ActorId {
        self.id
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.store.position[self.id.index()]
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.store.velocity[self.id.index()]
    }

    /// Store a velocity that has already been clamped by the caller.
    #[inline]
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.store.velocity[self.id.index()] = velocity;
    }

    /// Move the actor.  Out-of-bounds positions are clamped to the world
    /// edge.
    #[inline]
    pub fn set_position(&mut self, position: Vec2) {
        let clamped = self.store.bounds.clamp(position);
        self.store.position[self.id.index()] = clamped;
    }

    /// Count one faulted script step.  Returns the new total.
    #[inline]
    pub fn record_crash(&mut self) -> u64 {
        let count = &mut self.store.crash_count[self.id.index()];
        *count += 1;
        *count
    }
}
