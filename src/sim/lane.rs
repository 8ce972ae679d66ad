//! Lane selection and smoothed lateral motion
//!
//! Lane requests are discrete and clamped; the sled's x position eases
//! toward the chosen lane by a fixed fraction of the remaining distance.

use serde::{Deserialize, Serialize};

use super::state::Sled;
use crate::tuning::Tuning;
use crate::{lerp, smoothing_factor};

/// A discrete steering request, regardless of where it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneIntent {
    Left,
    Right,
}

impl LaneIntent {
    /// Lane index delta
    pub fn delta(&self) -> i32 {
        match self {
            LaneIntent::Left => -1,
            LaneIntent::Right => 1,
        }
    }
}

/// Maps lane indices to world x and eases the sled between them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaneController {
    offsets: Vec<f32>,
    /// Per-frame follow fraction for x
    follow: f32,
    /// Per-frame follow fraction for tilt
    tilt_follow: f32,
    /// Bank angle per lane from center
    tilt_per_lane: f32,
}

impl LaneController {
    pub fn new(offsets: Vec<f32>, follow: f32, tilt_follow: f32, tilt_per_lane: f32) -> Self {
        Self {
            offsets,
            follow,
            tilt_follow,
            tilt_per_lane,
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(
            tuning.lanes.clone(),
            tuning.lane_follow,
            tuning.tilt_follow,
            tuning.tilt_per_lane,
        )
    }

    pub fn lane_count(&self) -> usize {
        self.offsets.len()
    }

    /// World x of a lane (clamped)
    pub fn lane_x(&self, lane: usize) -> f32 {
        let last = self.offsets.len().saturating_sub(1);
        self.offsets.get(lane.min(last)).copied().unwrap_or(0.0)
    }

    /// Clamp any requested index into `[0, lane_count - 1]`
    pub fn clamp_lane(&self, lane: i64) -> usize {
        let last = self.offsets.len().saturating_sub(1) as i64;
        lane.clamp(0, last) as usize
    }

    /// Jump the target lane; out-of-range requests are clamped
    pub fn set_lane(&self, sled: &mut Sled, lane: i64) {
        sled.lane = self.clamp_lane(lane);
    }

    /// Move the target lane by a relative amount
    pub fn step(&self, sled: &mut Sled, delta: i32) {
        self.set_lane(sled, sled.lane as i64 + delta as i64);
    }

    pub fn apply(&self, sled: &mut Sled, intent: LaneIntent) {
        self.step(sled, intent.delta());
    }

    /// Signed lanes away from the middle (-1, 0, 1 for three lanes)
    fn lanes_from_center(&self, lane: usize) -> f32 {
        lane as f32 - (self.offsets.len().saturating_sub(1)) as f32 / 2.0
    }

    /// Ease x and tilt toward the target lane
    pub fn advance(&self, sled: &mut Sled, dt: f32) {
        if !(dt > 0.0) {
            return;
        }
        let target_x = self.lane_x(sled.lane);
        sled.x = lerp(sled.x, target_x, smoothing_factor(self.follow, dt));

        // Bank into the turn
        let target_tilt = -self.lanes_from_center(sled.lane) * self.tilt_per_lane;
        sled.tilt = lerp(sled.tilt, target_tilt, smoothing_factor(self.tilt_follow, dt));
    }
}
