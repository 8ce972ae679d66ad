//! Per-frame simulation tick
//!
//! Core game loop. Called once per render frame with the frame's delta-time;
//! runs to completion with no suspension.

use serde::{Deserialize, Serialize};

use super::lane::LaneIntent;
use super::progress::goal_reached;
use super::state::{EntityKind, GamePhase, GameSession};

/// Input gathered since the previous frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Net lane change from discrete intents (left = -1, right = +1)
    pub lane_step: i32,
    /// Absolute lane request (on-screen lane buttons); applied before `lane_step`
    pub target_lane: Option<usize>,
    /// Start from the menu
    pub start: bool,
    /// Go again after a crash
    pub retry: bool,
    /// Dismiss the result screen
    pub acknowledge: bool,
    /// Abandon the current run
    pub abort: bool,
}

impl TickInput {
    /// Accumulate a left/right intent
    pub fn push(&mut self, intent: LaneIntent) {
        self.lane_step += intent.delta();
    }

    /// Forget one-shot inputs after they were consumed
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Things that happened during a tick, for sound and overlays
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    Started,
    Retried,
    GiftCollected { id: u32, gifts: u32 },
    Crashed { attempts_left: Option<u32> },
    Exhausted,
    Finished,
    ReturnedToMenu,
}

impl SimEvent {
    /// A run ended; the record should be persisted
    pub fn ends_run(&self) -> bool {
        matches!(
            self,
            SimEvent::Crashed { .. } | SimEvent::Exhausted | SimEvent::Finished
        )
    }
}

/// Advance the session by one frame
pub fn tick(state: &mut GameSession, input: &TickInput, dt: f32) -> Vec<SimEvent> {
    let mut events = Vec::new();

    // Phase commands run even on a zero-length frame
    if input.abort && state.abort() {
        events.push(SimEvent::ReturnedToMenu);
    }
    if input.acknowledge && state.acknowledge() {
        events.push(SimEvent::ReturnedToMenu);
    }
    if input.start && state.start() {
        events.push(SimEvent::Started);
    }
    if input.retry && state.retry() {
        events.push(SimEvent::Retried);
    }

    if state.phase != GamePhase::Playing {
        return events;
    }

    // Steering is only listened to mid-run
    if let Some(lane) = input.target_lane {
        state.lanes.set_lane(&mut state.sled, lane as i64);
    }
    if input.lane_step != 0 {
        state.lanes.step(&mut state.sled, input.lane_step);
    }

    // Clock anomalies: nothing moves
    if !dt.is_finite() || dt <= 0.0 {
        return events;
    }
    let dt = dt.min(state.tuning.max_frame_dt);

    advance_run(state, dt, &mut events);
    events
}

/// One `Playing` step. Order matters: move, then collide, then score,
/// then recycle, then decide whether the run is over.
fn advance_run(state: &mut GameSession, dt: f32, events: &mut Vec<SimEvent>) {
    state.run.elapsed += dt;

    // Difficulty only goes up
    state.run.speed_bonus = state.tuning.speed.next_bonus(state.run.speed_bonus, dt);
    let speed = state.speed();

    state.lanes.advance(&mut state.sled, dt);

    // Spawn ahead of the sled
    let distance = state.run.distance;
    let difficulty = state.run.speed_bonus;
    let lane_count = state.lanes.lane_count();
    let requests = {
        let (spawner, rng) = state.spawner_and_rng();
        spawner.update(dt, distance, difficulty, lane_count, rng)
    };
    for request in requests {
        state.spawn(request);
    }

    // Scroll the world
    let dz = speed * dt;
    state.run.distance += dz;
    for entity in &mut state.entities {
        entity.advance(dz);
    }

    // Collisions cover the whole depth each entity swept this frame
    let mut crashed = false;
    let shape = state.tuning.collision;
    for entity in &mut state.entities {
        if entity.hit || !shape.test_swept(&state.sled, entity, dz) || !entity.mark_hit() {
            continue;
        }
        match entity.kind {
            EntityKind::Obstacle => crashed = true,
            EntityKind::Gift => {
                state.tuning.score.collect_gift(&mut state.run);
                events.push(SimEvent::GiftCollected {
                    id: entity.id,
                    gifts: state.run.gifts,
                });
            }
        }
    }

    state.tuning.score.accrue(&mut state.run, dt);

    // Recycle hit entities and anything behind the camera
    let cleanup_z = state.tuning.cleanup_z;
    let (done, live): (Vec<_>, Vec<_>) = std::mem::take(&mut state.entities)
        .into_iter()
        .partition(|e| e.hit || e.is_behind(cleanup_z));
    state.entities = live;
    for entity in done {
        state.pool.release(entity);
    }

    // Crash wins over reaching the goal on the same frame
    if crashed {
        state.crash();
        events.push(SimEvent::Crashed {
            attempts_left: state.record.attempts_left,
        });
        if state.phase == GamePhase::Exhausted {
            events.push(SimEvent::Exhausted);
        }
    } else if goal_reached(state.run.distance, state.tuning.goal_distance) && state.finish() {
        events.push(SimEvent::Finished);
    }
}
