//! Read-only view of a session for the renderer
//!
//! Carries positions, radii and kinds only; how they are drawn is up to the
//! presentation layer.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::{Archetype, EntityKind, GamePhase, GameSession};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SledView {
    pub pos: Vec3,
    pub tilt: f32,
    pub lane: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: u32,
    pub kind: EntityKind,
    pub archetype: Archetype,
    pub pos: Vec3,
    pub radius: f32,
}

/// Everything needed to draw one frame and its HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub sled: SledView,
    pub entities: Vec<EntityView>,
    pub score: u64,
    pub best: u64,
    /// Best goal percentage ever reached
    pub best_progress: f32,
    pub gifts: u32,
    /// Goal percentage (goal variants only)
    pub progress: Option<f32>,
    pub speed: f32,
    pub attempts_left: Option<u32>,
    pub can_start: bool,
    /// Label of the prize for the run that just ended
    pub prize: Option<String>,
}

impl Snapshot {
    pub fn capture(session: &GameSession) -> Self {
        Self {
            phase: session.phase,
            sled: SledView {
                pos: session.sled.pos(),
                tilt: session.sled.tilt,
                lane: session.sled.lane,
            },
            entities: session
                .entities
                .iter()
                .map(|e| EntityView {
                    id: e.id,
                    kind: e.kind,
                    archetype: e.archetype,
                    pos: e.pos,
                    radius: e.radius,
                })
                .collect(),
            score: session.run.display_score(),
            best: session.record.best_score,
            best_progress: session.record.best_progress,
            gifts: session.run.gifts,
            progress: session.progress_pct(),
            speed: session.speed(),
            attempts_left: session.record.attempts_left,
            can_start: session.can_start(),
            prize: session.last_prize.as_ref().map(|p| p.label.clone()),
        }
    }
}

impl GameSession {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::persistence::Record;
    use crate::sim::spawner::SpawnRequest;
    use crate::sim::state::{Archetype, EntityKind, GamePhase, GameSession};
    use crate::tuning::Tuning;

    #[test]
    fn test_snapshot_mirrors_session() {
        let tuning = Tuning::goal_run();
        let record = Record::fresh(&tuning);
        let mut session = GameSession::new(tuning, record, 3);
        assert!(session.start());
        session.spawn(SpawnRequest {
            kind: EntityKind::Gift,
            lane: 0,
            archetype: Archetype::Present,
        });
        session.run.distance = 130.0;
        session.record.submit(400, 62.5);

        let snap = session.snapshot();
        assert_eq!(snap.phase, GamePhase::Playing);
        assert_eq!(snap.entities.len(), 1);
        assert_eq!(snap.entities[0].kind, EntityKind::Gift);
        assert_eq!(snap.entities[0].pos.x, -3.2);
        assert_eq!(snap.progress, Some(25.0));
        assert_eq!(snap.attempts_left, Some(3));
        assert_eq!(snap.best, 400);
        assert_eq!(snap.best_progress, 62.5);
        assert_eq!(snap.speed, 28.0);
        assert!(snap.prize.is_none());
    }

    #[test]
    fn test_snapshot_serializes_for_js() {
        let tuning = Tuning::endless();
        let record = Record::fresh(&tuning);
        let session = GameSession::new(tuning, record, 3);
        let json = serde_json::to_string(&session.snapshot()).unwrap();
        assert!(json.contains("\"phase\":\"Menu\""));
        assert!(json.contains("\"progress\":null"));
        assert!(json.contains("\"can_start\":true"));
    }
}
