//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Delta-time driven, one `tick` per frame, no suspension
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod lane;
pub mod machine;
pub mod pool;
pub mod progress;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::CollisionShape;
pub use lane::{LaneController, LaneIntent};
pub use machine::{Trigger, transition};
pub use pool::EntityPool;
pub use snapshot::Snapshot;
pub use spawner::{Cadence, SpawnChannel, SpawnRequest, Spawner};
pub use state::{Archetype, Entity, EntityKind, GamePhase, GameSession, RunStats, Sled};
pub use tick::{SimEvent, TickInput, tick};
