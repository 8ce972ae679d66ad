//! Data-driven game balance
//!
//! Every number the simulation reads comes from a [`Tuning`]. Two presets
//! ship with the game; operators can also hand the page a JSON document
//! (missing fields fall back to the endless preset).

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::prize::PrizeTable;
use crate::sim::collision::CollisionShape;
use crate::sim::progress::ScoreRules;
use crate::sim::spawner::{Cadence, SpawnChannel};
use crate::sim::state::EntityKind;

/// Forward speed: a base plus a bonus that ramps with time up to a cap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedCurve {
    /// Units per second at the start of a run
    pub base: f32,
    /// Bonus gained per second of play
    pub ramp_per_sec: f32,
    /// Bonus never exceeds this
    pub max_bonus: f32,
}

impl SpeedCurve {
    /// Constant speed, no ramp
    pub fn constant(speed: f32) -> Self {
        Self {
            base: speed,
            ramp_per_sec: 0.0,
            max_bonus: 0.0,
        }
    }

    /// Bonus after advancing `dt` seconds from `bonus` (monotonic, capped)
    pub fn next_bonus(&self, bonus: f32, dt: f32) -> f32 {
        (bonus + dt * self.ramp_per_sec.max(0.0)).min(self.max_bonus.max(0.0))
    }
}

/// Complete balance sheet for one game variant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Preset name, for logs
    pub name: String,

    // === Lanes ===
    /// Lateral world offsets, left to right
    pub lanes: Vec<f32>,
    /// Lane index the sled starts every run in
    pub start_lane: usize,
    /// Fraction of the remaining lateral distance covered per 60 Hz frame
    pub lane_follow: f32,
    /// Fraction of the remaining tilt covered per 60 Hz frame
    pub tilt_follow: f32,
    /// Bank angle (radians) per lane away from center
    pub tilt_per_lane: f32,

    // === Motion ===
    pub speed: SpeedCurve,
    /// Depth new entities appear at
    pub spawn_z: f32,
    /// Entities deeper than this are recycled
    pub cleanup_z: f32,
    /// Sled depth plane
    pub sled_z: f32,
    /// Largest delta-time a frame may advance
    pub max_frame_dt: f32,

    // === Entities ===
    pub spawn: Vec<SpawnChannel>,
    pub collision: CollisionShape,
    pub sled_radius: f32,
    pub obstacle_radius: f32,
    pub gift_radius: f32,

    // === Scoring ===
    pub score: ScoreRules,
    /// Distance that finishes the run (None = endless)
    pub goal_distance: Option<f32>,

    // === Limits ===
    /// Runs allowed before an external reset (None = unlimited)
    pub max_attempts: Option<u32>,
    /// Only one run per calendar day
    pub one_play_per_day: bool,

    pub prizes: PrizeTable,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::endless()
    }
}

impl Tuning {
    /// The shipped endless variant: ramping speed, continuous score,
    /// timed spawns, unlimited retries.
    pub fn endless() -> Self {
        Self {
            name: "endless".to_string(),

            lanes: LANE_OFFSETS.to_vec(),
            start_lane: 1,
            lane_follow: 0.14,
            tilt_follow: 0.12,
            tilt_per_lane: 0.08,

            speed: SpeedCurve {
                base: 18.0,
                ramp_per_sec: 0.65,
                max_bonus: 14.0,
            },
            spawn_z: SPAWN_Z,
            cleanup_z: CLEANUP_Z,
            sled_z: SLED_Z,
            max_frame_dt: MAX_FRAME_DT,

            spawn: vec![
                SpawnChannel {
                    kind: EntityKind::Obstacle,
                    cadence: Cadence::Timed {
                        base: 0.9,
                        tighten: 0.02,
                        min: 0.42,
                        max: 0.9,
                    },
                    chance: 1.0,
                },
                SpawnChannel {
                    kind: EntityKind::Gift,
                    cadence: Cadence::Timed {
                        base: 1.2,
                        tighten: 0.0,
                        min: 1.2,
                        max: 1.2,
                    },
                    chance: 0.55,
                },
            ],
            collision: CollisionShape::Circle,
            sled_radius: SLED_RADIUS,
            obstacle_radius: OBSTACLE_RADIUS,
            gift_radius: GIFT_RADIUS,

            score: ScoreRules::default(),
            goal_distance: None,

            max_attempts: None,
            one_play_per_day: false,

            prizes: PrizeTable::default(),
        }
    }

    /// Race-to-the-finish variant: constant speed, percentage progress,
    /// distance-checkpoint spawns, three attempts.
    pub fn goal_run() -> Self {
        Self {
            name: "goal".to_string(),
            speed: SpeedCurve::constant(28.0),
            spawn: vec![
                SpawnChannel {
                    kind: EntityKind::Obstacle,
                    cadence: Cadence::Distance {
                        base: 22.0,
                        tighten: 0.0,
                        min: 14.0,
                        max: 22.0,
                        jitter: 8.0,
                    },
                    chance: 1.0,
                },
                SpawnChannel {
                    kind: EntityKind::Gift,
                    cadence: Cadence::Distance {
                        base: 40.0,
                        tighten: 0.0,
                        min: 40.0,
                        max: 40.0,
                        jitter: 12.0,
                    },
                    chance: 0.6,
                },
            ],
            collision: CollisionShape::Band { depth: 1.2 },
            goal_distance: Some(520.0),
            max_attempts: Some(3),
            ..Self::endless()
        }
    }

    /// Look up a preset by name
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "endless" => Some(Self::endless()),
            "goal" | "goal_run" => Some(Self::goal_run()),
            _ => None,
        }
    }

    /// Parse a JSON document; missing fields take endless defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Repair values the simulation cannot run with
    pub fn sanitized(mut self) -> Self {
        if self.lanes.is_empty() {
            log::warn!("Tuning '{}' has no lanes, using defaults", self.name);
            self.lanes = LANE_OFFSETS.to_vec();
        }
        self.start_lane = self.start_lane.min(self.lanes.len() - 1);
        if !self.max_frame_dt.is_finite() || self.max_frame_dt <= 0.0 {
            self.max_frame_dt = MAX_FRAME_DT;
        }
        for channel in &mut self.spawn {
            if channel.chance.is_nan() {
                channel.chance = 0.0;
            }
        }
        if let Some(goal) = self.goal_distance {
            if !(goal > 0.0) {
                log::warn!("Ignoring non-positive goal distance {}", goal);
                self.goal_distance = None;
            }
        }
        self
    }

    /// Number of lanes
    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Collision radius for an entity kind
    pub fn radius_for(&self, kind: EntityKind) -> f32 {
        match kind {
            EntityKind::Obstacle => self.obstacle_radius,
            EntityKind::Gift => self.gift_radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let endless = Tuning::preset("endless").unwrap();
        assert_eq!(endless.lane_count(), 3);
        assert!(endless.goal_distance.is_none());
        assert!(endless.max_attempts.is_none());

        let goal = Tuning::preset("GOAL").unwrap();
        assert_eq!(goal.goal_distance, Some(520.0));
        assert_eq!(goal.speed, SpeedCurve::constant(28.0));
        assert_eq!(goal.max_attempts, Some(3));

        assert!(Tuning::preset("unknown").is_none());
    }

    #[test]
    fn test_speed_curve_is_capped() {
        let curve = Tuning::endless().speed;
        let mut bonus = 0.0;
        for _ in 0..10_000 {
            let next = curve.next_bonus(bonus, 0.1);
            assert!(next >= bonus);
            bonus = next;
        }
        assert_eq!(bonus, 14.0);
        assert_eq!(SpeedCurve::constant(28.0).next_bonus(0.0, 5.0), 0.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "goal_distance": 300.0, "max_attempts": 2 }"#).unwrap();
        assert_eq!(tuning.goal_distance, Some(300.0));
        assert_eq!(tuning.max_attempts, Some(2));
        assert_eq!(tuning.lanes, LANE_OFFSETS.to_vec());
        assert_eq!(tuning.spawn.len(), 2);
    }

    #[test]
    fn test_json_round_trip_keeps_cadence() {
        let json = Tuning::goal_run().to_json().unwrap();
        let back = Tuning::from_json(&json).unwrap();
        assert_eq!(back.spawn, Tuning::goal_run().spawn);
        assert_eq!(back.collision, CollisionShape::Band { depth: 1.2 });
    }

    #[test]
    fn test_sanitize_repairs_bad_values() {
        let tuning = Tuning::from_json(
            r#"{ "lanes": [], "start_lane": 9, "max_frame_dt": -1.0, "goal_distance": 0.0 }"#,
        )
        .unwrap();
        assert_eq!(tuning.lane_count(), 3);
        assert_eq!(tuning.start_lane, 2);
        assert_eq!(tuning.max_frame_dt, MAX_FRAME_DT);
        assert!(tuning.goal_distance.is_none());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Tuning::from_json("{ lanes: nope").is_err());
    }
}
