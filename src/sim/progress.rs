//! Score and goal progress
//!
//! Score grows with time scaled by speed, plus a fixed bonus per gift.
//! Variants with a goal distance also report a percentage that finishes the
//! run at 100.

use serde::{Deserialize, Serialize};

use super::state::RunStats;

/// Continuous score accrual
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreRules {
    /// Points per second at base speed
    pub time_rate: f32,
    /// Extra points per second per unit of speed bonus
    pub speed_rate: f32,
    /// Points per gift collected
    pub gift_bonus: f32,
}

impl Default for ScoreRules {
    fn default() -> Self {
        Self {
            time_rate: 30.0,
            speed_rate: 3.2,
            gift_bonus: 60.0,
        }
    }
}

impl ScoreRules {
    /// Add score for `dt` seconds at the run's current speed bonus
    pub fn accrue(&self, run: &mut RunStats, dt: f32) {
        if dt > 0.0 {
            let rate = (self.time_rate + run.speed_bonus * self.speed_rate).max(0.0);
            run.score += dt * rate;
        }
    }

    /// Count a gift and its bonus
    pub fn collect_gift(&self, run: &mut RunStats) {
        run.gifts += 1;
        run.score += self.gift_bonus.max(0.0);
    }
}

/// Percentage of `goal` covered by `distance`, capped at 100
pub fn goal_progress(distance: f32, goal: f32) -> f32 {
    if goal <= 0.0 {
        return 100.0;
    }
    (100.0 * distance / goal).clamp(0.0, 100.0)
}

/// Whether a run has covered its goal distance
pub fn goal_reached(distance: f32, goal: Option<f32>) -> bool {
    goal.is_some_and(|goal| distance >= goal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accrue_scales_with_speed_bonus() {
        let rules = ScoreRules::default();
        let mut run = RunStats::default();
        rules.accrue(&mut run, 1.0);
        assert!((run.score - 30.0).abs() < 1e-4);

        run.speed_bonus = 10.0;
        rules.accrue(&mut run, 0.5);
        assert!((run.score - (30.0 + 0.5 * 62.0)).abs() < 1e-4);
    }

    #[test]
    fn test_accrue_ignores_bad_dt() {
        let rules = ScoreRules::default();
        let mut run = RunStats::default();
        rules.accrue(&mut run, 0.0);
        rules.accrue(&mut run, -2.0);
        rules.accrue(&mut run, f32::NAN);
        assert_eq!(run.score, 0.0);
    }

    #[test]
    fn test_gift_bonus() {
        let rules = ScoreRules::default();
        let mut run = RunStats::default();
        rules.collect_gift(&mut run);
        rules.collect_gift(&mut run);
        assert_eq!(run.gifts, 2);
        assert_eq!(run.display_score(), 120);
    }

    #[test]
    fn test_goal_progress() {
        assert_eq!(goal_progress(0.0, 520.0), 0.0);
        assert_eq!(goal_progress(260.0, 520.0), 50.0);
        assert_eq!(goal_progress(700.0, 520.0), 100.0);
        assert!(!goal_reached(519.9, Some(520.0)));
        assert!(goal_reached(520.0, Some(520.0)));
        assert!(!goal_reached(1e9, None));
    }
}
