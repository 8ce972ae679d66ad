//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (keys, swipes, on-screen buttons)

pub mod input;

pub use input::{SwipeTracker, intent_for_key};
