//! Persisted player progress
//!
//! Read once when a session starts, written whenever a run ends.

use serde::{Deserialize, Serialize};

use super::store::KeyValueStore;
use crate::tuning::Tuning;

const KEY_BEST: &str = "snowrider_best";
const KEY_BEST_PROGRESS: &str = "snowrider_bestProgress";
const KEY_ATTEMPTS: &str = "snowrider_attempts";
const KEY_COMPLETED: &str = "snowrider_completed";
const KEY_LAST_PLAY: &str = "snowrider_lastPlay";
const KEY_LAST_PRIZE: &str = "snowrider_lastPrize";

/// Everything that survives between page loads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Highest floored score ever reached
    pub best_score: u64,
    /// Highest goal percentage ever reached
    pub best_progress: f32,
    /// Runs left before an external reset (None = unlimited)
    pub attempts_left: Option<u32>,
    /// Goal reached at least once
    pub completed: bool,
    /// Day key (YYYY-MM-DD) of the last started run
    pub last_played: Option<String>,
    /// Label of the last prize awarded
    pub last_prize: Option<String>,
}

impl Record {
    /// Every storage key a record reads or writes
    pub const KEYS: [&'static str; 6] = [
        KEY_BEST,
        KEY_BEST_PROGRESS,
        KEY_ATTEMPTS,
        KEY_COMPLETED,
        KEY_LAST_PLAY,
        KEY_LAST_PRIZE,
    ];

    /// Defaults for a player who has never played this variant
    pub fn fresh(tuning: &Tuning) -> Self {
        Self {
            best_score: 0,
            best_progress: 0.0,
            attempts_left: tuning.max_attempts,
            completed: false,
            last_played: None,
            last_prize: None,
        }
    }

    /// Load from a store. Each value is parsed on its own; anything missing
    /// or malformed keeps its default.
    pub fn load(store: &dyn KeyValueStore, tuning: &Tuning) -> Self {
        let mut record = Self::fresh(tuning);

        if let Some(best) = parse_key::<u64>(store, KEY_BEST) {
            record.best_score = best;
        }
        if let Some(progress) = parse_key::<f32>(store, KEY_BEST_PROGRESS) {
            if progress.is_finite() {
                record.best_progress = progress.clamp(0.0, 100.0);
            }
        }
        if let Some(limit) = tuning.max_attempts {
            if let Some(left) = parse_key::<u32>(store, KEY_ATTEMPTS) {
                record.attempts_left = Some(left.min(limit));
            }
        }
        if let Some(completed) = parse_key::<bool>(store, KEY_COMPLETED) {
            record.completed = completed;
        }
        record.last_played = store.get(KEY_LAST_PLAY).filter(|d| !d.is_empty());
        record.last_prize = store.get(KEY_LAST_PRIZE).filter(|p| !p.is_empty());

        log::info!(
            "Loaded record: best={} attempts={:?} completed={}",
            record.best_score,
            record.attempts_left,
            record.completed
        );
        record
    }

    /// Write every value back
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        store.set(KEY_BEST, &self.best_score.to_string());
        store.set(KEY_BEST_PROGRESS, &self.best_progress.to_string());
        match self.attempts_left {
            Some(left) => store.set(KEY_ATTEMPTS, &left.to_string()),
            None => store.remove(KEY_ATTEMPTS),
        }
        store.set(KEY_COMPLETED, &self.completed.to_string());
        if let Some(day) = &self.last_played {
            store.set(KEY_LAST_PLAY, day);
        }
        if let Some(prize) = &self.last_prize {
            store.set(KEY_LAST_PRIZE, prize);
        }
        log::info!("Record saved (best {})", self.best_score);
    }

    /// Keep the higher of the stored and new bests
    pub fn submit(&mut self, score: u64, progress: f32) {
        self.best_score = self.best_score.max(score);
        if progress.is_finite() {
            self.best_progress = self.best_progress.max(progress.min(100.0));
        }
    }

    /// Another attempt is available
    pub fn has_attempts(&self) -> bool {
        self.attempts_left.is_none_or(|left| left > 0)
    }

    /// Spend one attempt (never below zero)
    pub fn spend_attempt(&mut self) {
        if let Some(left) = &mut self.attempts_left {
            *left = left.saturating_sub(1);
        }
    }

    /// External reset of the attempt counter (operator action)
    pub fn reset_attempts(&mut self, tuning: &Tuning) {
        self.attempts_left = tuning.max_attempts;
        log::info!("Attempts reset to {:?}", self.attempts_left);
    }

    /// Daily limit check; `today` of None disables the limit
    pub fn played_on(&self, today: Option<&str>) -> bool {
        match (today, self.last_played.as_deref()) {
            (Some(today), Some(last)) => today == last,
            _ => false,
        }
    }
}

fn parse_key<T: std::str::FromStr>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring malformed value for {}: {:?}", key, raw);
            None
        }
    }
}

/// Calendar day (UTC) as YYYY-MM-DD for a Unix timestamp in seconds
pub fn day_key_from_unix_secs(secs: i64) -> String {
    // Days since 1970-01-01 to civil date
    let z = secs.div_euclid(86_400) + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    format!("{:04}-{:02}-{:02}", year, month, day)
}
