//! Deterministic simulation-level RNG.
//!
//! The arena only needs randomness for initial placement.  Everything after
//! that is driven by the behavior scripts, so a single seeded `SmallRng` is
//! enough to make a run's starting layout reproducible.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{Bounds, Vec2};

/// Simulation-level RNG for global operations (initial placement).
///
/// Used only from the driver thread.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// A point drawn uniformly from the closed rectangle `bounds`.
    pub fn point_in(&mut self, bounds: Bounds) -> Vec2 {
        Vec2::new(
            self.0.gen_range(0.0..=bounds.width),
            self.0.gen_range(0.0..=bounds.height),
        )
    }
}
