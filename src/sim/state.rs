//! Game state and core simulation types
//!
//! Everything one run needs lives in [`GameSession`]; sub-systems receive it
//! (or pieces of it) by reference each tick.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::lane::LaneController;
use super::pool::EntityPool;
use super::spawner::{SpawnRequest, Spawner};
use crate::consts::{GIFT_Y, OBSTACLE_Y, SLED_Y};
use crate::persistence::Record;
use crate::prize::{PrizeTier, RunResult};
use crate::tuning::Tuning;

/// Machine state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen, nothing simulated
    Menu,
    /// Active run
    Playing,
    /// Hit an obstacle, retry possible
    Crashed,
    /// Reached the goal distance
    Finished,
    /// Hit an obstacle with no attempts left
    Exhausted,
}

impl GamePhase {
    /// Run has ended (result and prize are available)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GamePhase::Crashed | GamePhase::Finished | GamePhase::Exhausted
        )
    }
}

/// Gameplay role of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Ends the run on contact
    Obstacle,
    /// Adds to the gift count and score on contact
    Gift,
}

impl EntityKind {
    /// Resting height above the snow
    pub fn height(&self) -> f32 {
        match self {
            EntityKind::Obstacle => OBSTACLE_Y,
            EntityKind::Gift => GIFT_Y,
        }
    }
}

/// Visual look, never read by simulation logic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Archetype {
    Rock,
    Tree,
    Present,
}

/// An obstacle or gift, either live in the world or parked in the pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Allocation id, stable across pool reuse
    pub id: u32,
    pub kind: EntityKind,
    pub archetype: Archetype,
    pub lane: usize,
    pub pos: Vec3,
    pub radius: f32,
    /// Collision already applied; set at most once per placement
    pub hit: bool,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind) -> Self {
        Self {
            id,
            kind,
            archetype: match kind {
                EntityKind::Obstacle => Archetype::Rock,
                EntityKind::Gift => Archetype::Present,
            },
            lane: 0,
            pos: Vec3::ZERO,
            radius: 0.0,
            hit: false,
        }
    }

    /// Put the entity at the head of a lane, clearing any previous life
    pub fn place(&mut self, lane: usize, x: f32, z: f32, radius: f32, archetype: Archetype) {
        self.lane = lane;
        self.pos = Vec3::new(x, self.kind.height(), z);
        self.radius = radius;
        self.archetype = archetype;
        self.hit = false;
    }

    /// Scroll toward the sled
    #[inline]
    pub fn advance(&mut self, dz: f32) {
        self.pos.z += dz;
    }

    /// Flag the entity as hit. Returns true only the first time.
    pub fn mark_hit(&mut self) -> bool {
        if self.hit {
            return false;
        }
        self.hit = true;
        true
    }

    /// Passed behind the sled far enough to recycle
    #[inline]
    pub fn is_behind(&self, cleanup_z: f32) -> bool {
        self.pos.z > cleanup_z
    }
}

/// The player's sled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sled {
    /// Lane the player asked for
    pub lane: usize,
    /// Smoothed lateral position
    pub x: f32,
    pub y: f32,
    /// Depth plane (fixed)
    pub z: f32,
    /// Cosmetic bank angle (radians)
    pub tilt: f32,
    pub radius: f32,
}

impl Sled {
    pub fn new(tuning: &Tuning) -> Self {
        let lane = tuning.start_lane.min(tuning.lane_count().saturating_sub(1));
        Self {
            lane,
            x: tuning.lanes.get(lane).copied().unwrap_or(0.0),
            y: SLED_Y,
            z: tuning.sled_z,
            tilt: 0.0,
            radius: tuning.sled_radius,
        }
    }

    pub fn pos(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// Per-run counters, zeroed on every start/retry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Seconds of `Playing`
    pub elapsed: f32,
    /// World units scrolled
    pub distance: f32,
    pub score: f32,
    pub gifts: u32,
    /// Current speed on top of the base
    pub speed_bonus: f32,
}

impl RunStats {
    /// Score as shown to the player
    pub fn display_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }
}

/// Complete session: one player, one tuning, many runs
#[derive(Debug, Clone)]
pub struct GameSession {
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub sled: Sled,
    pub lanes: LaneController,
    /// Live entities (in spawn order)
    pub entities: Vec<Entity>,
    pub pool: EntityPool,
    pub spawner: Spawner,
    pub run: RunStats,
    /// Persisted progress, mirrored in memory
    pub record: Record,
    /// Outcome of the most recent finished/crashed run
    pub last_result: Option<RunResult>,
    pub last_prize: Option<PrizeTier>,
    /// Calendar day key supplied by the platform (YYYY-MM-DD)
    pub today: Option<String>,
    rng: Pcg32,
    next_id: u32,
}

impl GameSession {
    /// Create a session in the menu
    pub fn new(tuning: Tuning, record: Record, seed: u64) -> Self {
        let tuning = tuning.sanitized();
        Self {
            phase: GamePhase::Menu,
            sled: Sled::new(&tuning),
            lanes: LaneController::from_tuning(&tuning),
            entities: Vec::new(),
            pool: EntityPool::default(),
            spawner: Spawner::new(&tuning.spawn),
            run: RunStats::default(),
            record,
            last_result: None,
            last_prize: None,
            today: None,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Current forward speed
    pub fn speed(&self) -> f32 {
        self.tuning.speed.base + self.run.speed_bonus
    }

    /// Percentage toward the goal, if this variant has one
    pub fn progress_pct(&self) -> Option<f32> {
        self.tuning
            .goal_distance
            .map(|goal| super::progress::goal_progress(self.run.distance, goal))
    }

    /// Materialize a spawn request, reusing a pooled entity when possible
    pub fn spawn(&mut self, request: SpawnRequest) {
        let mut entity = match self.pool.acquire(request.kind) {
            Some(entity) => entity,
            None => {
                let id = self.next_entity_id();
                self.pool.allocate(id, request.kind)
            }
        };
        let x = self.lanes.lane_x(request.lane);
        let radius = self.tuning.radius_for(request.kind);
        entity.place(request.lane, x, self.tuning.spawn_z, radius, request.archetype);
        log::debug!(
            "Spawned {:?} #{} in lane {}",
            entity.kind,
            entity.id,
            entity.lane
        );
        self.entities.push(entity);
    }

    /// Return every live entity to the pool
    pub fn clear_world(&mut self) {
        for entity in self.entities.drain(..) {
            self.pool.release(entity);
        }
    }

    /// Fresh run: empty world, zeroed counters, sled back in its start lane
    pub fn reset_run(&mut self) {
        self.clear_world();
        self.run = RunStats::default();
        self.sled = Sled::new(&self.tuning);
        self.spawner.reset(&mut self.rng);
        self.last_result = None;
        self.last_prize = None;
    }

    /// Split-borrow the pieces the per-tick spawner needs
    pub(crate) fn spawner_and_rng(&mut self) -> (&mut Spawner, &mut Pcg32) {
        (&mut self.spawner, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawner::SpawnRequest;

    fn session() -> GameSession {
        let tuning = Tuning::endless();
        let record = Record::fresh(&tuning);
        GameSession::new(tuning, record, 7)
    }

    #[test]
    fn test_new_session_is_in_menu() {
        let s = session();
        assert_eq!(s.phase, GamePhase::Menu);
        assert_eq!(s.sled.lane, 1);
        assert_eq!(s.sled.x, 0.0);
        assert!(s.entities.is_empty());
        assert!(s.progress_pct().is_none());
    }

    #[test]
    fn test_entity_hit_flag_is_once() {
        let mut e = Entity::new(1, EntityKind::Gift);
        assert!(e.mark_hit());
        assert!(!e.mark_hit());
        e.place(0, -3.2, -60.0, 0.65, Archetype::Present);
        assert!(!e.hit);
        assert_eq!(e.pos.y, GIFT_Y);
    }

    #[test]
    fn test_spawn_reuses_pooled_entities() {
        let mut s = session();
        let request = SpawnRequest {
            kind: EntityKind::Obstacle,
            lane: 2,
            archetype: Archetype::Tree,
        };
        s.spawn(request);
        let first_id = s.entities[0].id;
        assert_eq!(s.entities[0].pos.x, 3.2);
        assert_eq!(s.entities[0].pos.z, s.tuning.spawn_z);

        s.clear_world();
        assert!(s.entities.is_empty());
        assert_eq!(s.pool.len(EntityKind::Obstacle), 1);

        s.spawn(request);
        assert_eq!(s.entities[0].id, first_id);
        assert_eq!(s.pool.created(), 1);
    }

    #[test]
    fn test_reset_run_zeroes_counters() {
        let mut s = session();
        s.run.score = 123.0;
        s.run.gifts = 4;
        s.sled.lane = 0;
        s.reset_run();
        assert_eq!(s.run.display_score(), 0);
        assert_eq!(s.run.gifts, 0);
        assert_eq!(s.sled.lane, 1);
    }
}
