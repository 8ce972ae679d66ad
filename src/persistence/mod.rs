//! Save/load of player progress
//!
//! Features:
//! - Pluggable key-value backend (LocalStorage on web, in-memory elsewhere)
//! - One key per value, stored as plain strings
//! - Corrupt or missing values fall back to defaults instead of failing

pub mod record;
pub mod store;

pub use record::{Record, day_key_from_unix_secs};
pub use store::{KeyValueStore, MemoryStore};

#[cfg(target_arch = "wasm32")]
pub use store::LocalStorage;
