//! Phase transitions
//!
//! One table lists every legal move between [`GamePhase`]s. Anything not in
//! the table is ignored, so there is no way to reach an inconsistent state.

use serde::{Deserialize, Serialize};

use super::state::{GamePhase, GameSession};
use crate::prize::RunResult;

/// Something that may move the session to another phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    /// Player pressed play on the menu
    Start,
    /// Sled hit an obstacle
    Crash,
    /// Crashed with no attempts left
    OutOfAttempts,
    /// Player chose to go again after a crash
    Retry,
    /// Goal distance reached
    Finish,
    /// Player dismissed the result screen
    Acknowledge,
    /// External stop (back to menu mid-run)
    Abort,
}

/// Condition a transition needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Always,
    /// Attempts left and the daily limit allows it
    MayPlay,
    /// No attempts left
    NoAttempts,
}

/// Facts the guards are evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardContext {
    pub has_attempts: bool,
    pub daily_ok: bool,
}

impl Guard {
    fn allows(&self, ctx: GuardContext) -> bool {
        match self {
            Guard::Always => true,
            Guard::MayPlay => ctx.has_attempts && ctx.daily_ok,
            Guard::NoAttempts => !ctx.has_attempts,
        }
    }
}

use GamePhase::*;

/// (from, trigger, guard, to)
pub const TRANSITIONS: &[(GamePhase, Trigger, Guard, GamePhase)] = &[
    (Menu, Trigger::Start, Guard::MayPlay, Playing),
    (Playing, Trigger::Crash, Guard::Always, Crashed),
    (Playing, Trigger::Finish, Guard::Always, Finished),
    (Playing, Trigger::Abort, Guard::Always, Menu),
    (Crashed, Trigger::OutOfAttempts, Guard::NoAttempts, Exhausted),
    (Crashed, Trigger::Retry, Guard::MayPlay, Playing),
    (Crashed, Trigger::Acknowledge, Guard::Always, Menu),
    (Finished, Trigger::Acknowledge, Guard::Always, Menu),
    (Exhausted, Trigger::Acknowledge, Guard::Always, Menu),
];

/// Look up the phase a trigger leads to, if it is legal right now
pub fn transition(from: GamePhase, trigger: Trigger, ctx: GuardContext) -> Option<GamePhase> {
    TRANSITIONS
        .iter()
        .find(|(f, t, guard, _)| *f == from && *t == trigger && guard.allows(ctx))
        .map(|(_, _, _, to)| *to)
}

impl GameSession {
    pub fn guard_context(&self) -> GuardContext {
        let daily_ok = !self.tuning.one_play_per_day || !self.record.played_on(self.today.as_deref());
        GuardContext {
            has_attempts: self.record.has_attempts(),
            daily_ok,
        }
    }

    /// Whether the menu's play button should be enabled
    pub fn can_start(&self) -> bool {
        transition(self.phase, Trigger::Start, self.guard_context()).is_some()
    }

    /// Fire a trigger; returns true if the phase changed
    pub fn fire(&mut self, trigger: Trigger) -> bool {
        match transition(self.phase, trigger, self.guard_context()) {
            Some(next) => {
                log::info!("{:?} --{:?}--> {:?}", self.phase, trigger, next);
                self.phase = next;
                true
            }
            None => {
                log::debug!("Ignoring {:?} in {:?}", trigger, self.phase);
                false
            }
        }
    }

    /// Menu -> Playing with a fresh run
    pub fn start(&mut self) -> bool {
        self.begin_run(Trigger::Start)
    }

    /// Crashed -> Playing with a fresh run
    pub fn retry(&mut self) -> bool {
        self.begin_run(Trigger::Retry)
    }

    fn begin_run(&mut self, trigger: Trigger) -> bool {
        if !self.fire(trigger) {
            return false;
        }
        self.reset_run();
        if self.tuning.one_play_per_day {
            self.record.last_played = self.today.clone();
        }
        true
    }

    /// Result screen -> Menu
    pub fn acknowledge(&mut self) -> bool {
        if !self.fire(Trigger::Acknowledge) {
            return false;
        }
        self.clear_world();
        true
    }

    /// Playing -> Menu, discarding the run
    pub fn abort(&mut self) -> bool {
        if !self.fire(Trigger::Abort) {
            return false;
        }
        self.reset_run();
        true
    }

    /// Playing -> Crashed (-> Exhausted when that was the last attempt)
    pub(crate) fn crash(&mut self) -> bool {
        if !self.fire(Trigger::Crash) {
            return false;
        }
        self.record.spend_attempt();
        self.settle_result(false);
        self.fire(Trigger::OutOfAttempts);
        true
    }

    /// Playing -> Finished
    pub(crate) fn finish(&mut self) -> bool {
        if !self.fire(Trigger::Finish) {
            return false;
        }
        self.record.completed = true;
        self.settle_result(true);
        true
    }

    /// Freeze the run's numbers, pick the prize and fold them into the record
    fn settle_result(&mut self, completed: bool) {
        let result = RunResult {
            score: self.run.display_score(),
            progress: self.progress_pct().unwrap_or(0.0),
            gifts: self.run.gifts,
            completed,
        };
        self.record.submit(result.score, result.progress);

        let prize = self.tuning.prizes.award(&result).cloned();
        if let Some(prize) = &prize {
            log::info!(
                "Run over: score={} gifts={} progress={:.0}% -> {}",
                result.score,
                result.gifts,
                result.progress,
                prize.label
            );
            self.record.last_prize = Some(prize.label.clone());
        }
        self.last_result = Some(result);
        self.last_prize = prize;
    }
}
