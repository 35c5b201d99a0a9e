//! Strongly typed identifiers.
//!
//! `ActorId` is `Copy + Ord + Hash` and doubles as the index into every
//! registry array: ids are handed out densely (`0, 1, 2, …`) in creation order
//! and never reused, because actors are never removed.

use std::fmt;
use std::sync::Arc;

/// Stable identifier of an actor.  Assigned monotonically at creation.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
pub struct ActorId(pub u32);

impl ActorId {
    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorId({})", self.0)
    }
}

impl From<ActorId> for usize {
    #[inline(always)]
    fn from(id: ActorId) -> usize {
        id.0 as usize
    }
}

impl TryFrom<usize> for ActorId {
    type Error = std::num::TryFromIntError;
    fn try_from(n: usize) -> Result<ActorId, Self::Error> {
        u32::try_from(n).map(ActorId)
    }
}

// ── BehaviorType ──────────────────────────────────────────────────────────────

/// Tag selecting which behavior script an actor runs (e.g. `"actor1"`).
///
/// Cheap to clone: every actor of the same type shares one allocation.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct BehaviorType(Arc<str>);

impl BehaviorType {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BehaviorType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for BehaviorType {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl AsRef<str> for BehaviorType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BehaviorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for BehaviorType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for BehaviorType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <String as serde::Deserialize>::deserialize(deserializer).map(BehaviorType::from)
    }
}
