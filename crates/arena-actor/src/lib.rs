//! `arena-actor` — the actor registry and perception query.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                      |
//! |------------------|---------------------------------------------------------------|
//! | [`store`]        | `ActorStore` (SoA arrays), `ActorRecord`, `ActorHandle`       |
//! | [`builder`]      | `ActorStoreBuilder` (seeded placement)                        |
//! | [`perception`]   | `Neighbor`, `nearby_actors`, `PerceptionSnapshot`             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                 |
//! |---------|--------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Neighbor`.       |

pub mod builder;
pub mod perception;
pub mod store;


pub use builder::ActorStoreBuilder;
pub use perception::{Neighbor, PerceptionSnapshot, nearby_actors};
pub use store::{ActorHandle, ActorRecord, ActorStore};
