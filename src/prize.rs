//! Prize tiers awarded at the end of a run
//!
//! Tiers are ordered from smallest to largest. A tier is earned when ANY of
//! its thresholds is met; the best earned tier wins and the first tier is
//! the consolation prize.

use serde::{Deserialize, Serialize};

/// Numbers a prize decision looks at
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RunResult {
    /// Final score (floored)
    pub score: u64,
    /// Goal progress percentage (0 for endless runs)
    pub progress: f32,
    /// Gifts collected
    pub gifts: u32,
    /// Whether the goal was reached
    pub completed: bool,
}

/// One prize and the thresholds that unlock it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeTier {
    /// Stable identifier (for claim links / analytics)
    pub key: String,
    /// Text shown to the player
    pub label: String,
    #[serde(default)]
    pub min_gifts: Option<u32>,
    #[serde(default)]
    pub min_score: Option<u64>,
    #[serde(default)]
    pub min_progress: Option<f32>,
}

impl PrizeTier {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            min_gifts: None,
            min_score: None,
            min_progress: None,
        }
    }

    pub fn with_gifts(mut self, gifts: u32) -> Self {
        self.min_gifts = Some(gifts);
        self
    }

    pub fn with_score(mut self, score: u64) -> Self {
        self.min_score = Some(score);
        self
    }

    pub fn with_progress(mut self, progress: f32) -> Self {
        self.min_progress = Some(progress);
        self
    }

    /// True if any threshold is satisfied
    pub fn unlocked_by(&self, result: &RunResult) -> bool {
        self.min_gifts.is_some_and(|g| result.gifts >= g)
            || self.min_score.is_some_and(|s| result.score >= s)
            || self.min_progress.is_some_and(|p| result.progress >= p)
    }
}

/// Ordered prize ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeTable {
    pub tiers: Vec<PrizeTier>,
}

impl Default for PrizeTable {
    fn default() -> Self {
        Self {
            tiers: vec![
                PrizeTier::new("BONUS_100", "100% Bonus"),
                PrizeTier::new("BONUS_150", "150% Bonus")
                    .with_gifts(3)
                    .with_score(450),
                PrizeTier::new("BONUS_200", "200% Bonus (Legendary)")
                    .with_gifts(6)
                    .with_score(900),
            ],
        }
    }
}

impl PrizeTable {
    /// Best tier this result earns. `None` only for an empty table.
    pub fn award(&self, result: &RunResult) -> Option<&PrizeTier> {
        self.tiers
            .iter()
            .skip(1)
            .rev()
            .find(|tier| tier.unlocked_by(result))
            .or_else(|| self.tiers.first())
    }

    /// Index of the awarded tier (0 = consolation)
    pub fn award_index(&self, result: &RunResult) -> Option<usize> {
        let tier = self.award(result)?;
        self.tiers.iter().position(|t| t.key == tier.key)
    }
}
