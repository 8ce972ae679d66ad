//! Snow Rider - a three-lane sled runner promo game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lanes, spawning, collisions, run state)
//! - `tuning`: Data-driven game balance
//! - `prize`: Result tier mapping
//! - `persistence`: Best score / attempts / daily-limit storage
//! - `platform`: Browser/native input normalization

pub mod persistence;
pub mod platform;
pub mod prize;
pub mod sim;
pub mod tuning;

pub use prize::{PrizeTable, PrizeTier, RunResult};
pub use tuning::Tuning;

/// World geometry defaults (shared by the presets in `tuning`)
pub mod consts {
    /// Reference frame rate the per-frame smoothing constants were tuned at
    pub const REFERENCE_HZ: f32 = 60.0;
    /// Largest delta-time a single frame may advance (tab switch, stalls)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Lateral lane offsets, left to right
    pub const LANE_OFFSETS: [f32; 3] = [-3.2, 0.0, 3.2];

    /// Sled rests at this depth; the world scrolls toward +z
    pub const SLED_Z: f32 = 4.0;
    pub const SLED_Y: f32 = 0.35;
    pub const SLED_RADIUS: f32 = 0.85;

    /// Entities appear this far ahead of the sled
    pub const SPAWN_Z: f32 = -60.0;
    /// Entities past this depth are behind the camera and get recycled
    pub const CLEANUP_Z: f32 = 10.0;

    pub const OBSTACLE_RADIUS: f32 = 0.85;
    pub const OBSTACLE_Y: f32 = 0.55;
    pub const GIFT_RADIUS: f32 = 0.65;
    pub const GIFT_Y: f32 = 0.9;
}

/// Linear interpolation from `a` toward `b` by fraction `t`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Convert a per-frame follow fraction (tuned at `REFERENCE_HZ`) into the
/// fraction to apply for a frame of length `dt`.
///
/// At exactly one reference frame this returns `per_frame` unchanged.
#[inline]
pub fn smoothing_factor(per_frame: f32, dt: f32) -> f32 {
    let per_frame = per_frame.clamp(0.0, 1.0);
    1.0 - (1.0 - per_frame).powf(dt * consts::REFERENCE_HZ)
}
