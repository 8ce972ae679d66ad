//! Obstacle and gift spawning
//!
//! Each [`SpawnChannel`] fires on its own cadence. Lanes are picked uniformly
//! and independently per spawn, so every lane can end up blocked in a short
//! window; runs are allowed to be unwinnable.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Archetype, EntityKind};

/// When a channel fires
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Cadence {
    /// Every `interval` seconds of play
    Timed {
        base: f32,
        /// Interval shrinks by this much per unit of speed bonus
        tighten: f32,
        min: f32,
        max: f32,
    },
    /// Every `interval` units of distance, plus up to `jitter` extra units
    Distance {
        base: f32,
        tighten: f32,
        min: f32,
        max: f32,
        jitter: f32,
    },
}

impl Cadence {
    /// Gap between spawns at the given difficulty, clamped to `[min, max]`
    pub fn interval(&self, difficulty: f32) -> f32 {
        let (base, tighten, min, max) = match *self {
            Cadence::Timed {
                base,
                tighten,
                min,
                max,
            } => (base, tighten, min, max),
            Cadence::Distance {
                base,
                tighten,
                min,
                max,
                ..
            } => (base, tighten, min, max),
        };
        let lo = min.min(max);
        (base - tighten * difficulty).clamp(lo, max.max(lo))
    }
}

/// One stream of spawns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnChannel {
    pub kind: EntityKind,
    pub cadence: Cadence,
    /// Probability that a due spawn actually happens
    pub chance: f32,
}

/// What to put in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnRequest {
    pub kind: EntityKind,
    pub lane: usize,
    pub archetype: Archetype,
}

/// Progress of one channel toward its next spawn
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChannelClock {
    /// Seconds since the channel last fired
    pub since_last: f32,
    /// Distance at which a distance cadence fires next
    pub next_checkpoint: f32,
}

impl SpawnChannel {
    /// Clock for the start of a run
    pub fn fresh_clock(&self, rng: &mut impl Rng) -> ChannelClock {
        let next_checkpoint = match self.cadence {
            Cadence::Timed { .. } => 0.0,
            Cadence::Distance { jitter, .. } => {
                self.cadence.interval(0.0) + jitter.max(0.0) * rng.random::<f32>()
            }
        };
        ChannelClock {
            since_last: 0.0,
            next_checkpoint,
        }
    }

    /// Decide whether this channel spawns now.
    ///
    /// `clock.since_last` must already include this frame's dt; `distance` is
    /// the total traveled this run.
    pub fn maybe_spawn(
        &self,
        clock: &mut ChannelClock,
        distance: f32,
        difficulty: f32,
        lane_count: usize,
        rng: &mut impl Rng,
    ) -> Option<SpawnRequest> {
        let due = match self.cadence {
            Cadence::Timed { .. } => {
                if clock.since_last >= self.cadence.interval(difficulty) {
                    clock.since_last = 0.0;
                    true
                } else {
                    false
                }
            }
            Cadence::Distance { jitter, .. } => {
                if distance >= clock.next_checkpoint {
                    clock.since_last = 0.0;
                    clock.next_checkpoint = distance
                        + self.cadence.interval(difficulty)
                        + jitter.max(0.0) * rng.random::<f32>();
                    true
                } else {
                    false
                }
            }
        };

        if !due || lane_count == 0 || !rng.random_bool(self.chance.clamp(0.0, 1.0) as f64) {
            return None;
        }

        let archetype = match self.kind {
            EntityKind::Obstacle if rng.random_bool(0.5) => Archetype::Tree,
            EntityKind::Obstacle => Archetype::Rock,
            EntityKind::Gift => Archetype::Present,
        };

        Some(SpawnRequest {
            kind: self.kind,
            lane: rng.random_range(0..lane_count),
            archetype,
        })
    }
}

/// All channels of a session and their clocks
#[derive(Debug, Clone)]
pub struct Spawner {
    channels: Vec<(SpawnChannel, ChannelClock)>,
}

impl Spawner {
    pub fn new(channels: &[SpawnChannel]) -> Self {
        Self {
            channels: channels
                .iter()
                .map(|c| (*c, ChannelClock::default()))
                .collect(),
        }
    }

    /// Restart every channel's clock for a new run
    pub fn reset(&mut self, rng: &mut impl Rng) {
        for (channel, clock) in &mut self.channels {
            *clock = channel.fresh_clock(rng);
        }
    }

    /// Advance all clocks by `dt` and collect due spawns (at most one per channel)
    pub fn update(
        &mut self,
        dt: f32,
        distance: f32,
        difficulty: f32,
        lane_count: usize,
        rng: &mut impl Rng,
    ) -> Vec<SpawnRequest> {
        let mut requests = Vec::new();
        for (channel, clock) in &mut self.channels {
            clock.since_last += dt;
            if let Some(request) = channel.maybe_spawn(clock, distance, difficulty, lane_count, rng) {
                requests.push(request);
            }
        }
        requests
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn timed_obstacles() -> SpawnChannel {
        SpawnChannel {
            kind: EntityKind::Obstacle,
            cadence: Cadence::Timed {
                base: 0.9,
                tighten: 0.02,
                min: 0.42,
                max: 0.9,
            },
            chance: 1.0,
        }
    }

    #[test]
    fn test_timed_interval_tightens_with_difficulty() {
        let cadence = timed_obstacles().cadence;
        assert_eq!(cadence.interval(0.0), 0.9);
        assert!((cadence.interval(10.0) - 0.7).abs() < 1e-6);
        // Clamped at the floor once difficulty is high
        assert_eq!(cadence.interval(100.0), 0.42);
        // Negative difficulty can't push past the ceiling
        assert_eq!(cadence.interval(-50.0), 0.9);
    }

    #[test]
    fn test_timed_channel_fires_on_interval() {
        let mut rng = Pcg32::seed_from_u64(1);
        let channel = timed_obstacles();
        let mut clock = channel.fresh_clock(&mut rng);

        clock.since_last = 0.5;
        assert!(channel.maybe_spawn(&mut clock, 0.0, 0.0, 3, &mut rng).is_none());
        assert_eq!(clock.since_last, 0.5);

        clock.since_last = 0.95;
        let request = channel.maybe_spawn(&mut clock, 0.0, 0.0, 3, &mut rng).unwrap();
        assert_eq!(request.kind, EntityKind::Obstacle);
        assert!(request.lane < 3);
        assert!(matches!(request.archetype, Archetype::Rock | Archetype::Tree));
        assert_eq!(clock.since_last, 0.0);
    }

    #[test]
    fn test_distance_channel_moves_checkpoint_forward() {
        let mut rng = Pcg32::seed_from_u64(2);
        let channel = SpawnChannel {
            kind: EntityKind::Gift,
            cadence: Cadence::Distance {
                base: 20.0,
                tighten: 0.0,
                min: 10.0,
                max: 20.0,
                jitter: 5.0,
            },
            chance: 1.0,
        };
        let mut clock = channel.fresh_clock(&mut rng);
        assert!(clock.next_checkpoint >= 20.0 && clock.next_checkpoint <= 25.0);

        assert!(channel.maybe_spawn(&mut clock, 19.0, 0.0, 3, &mut rng).is_none());

        let at = clock.next_checkpoint;
        let request = channel.maybe_spawn(&mut clock, at, 0.0, 3, &mut rng).unwrap();
        assert_eq!(request.archetype, Archetype::Present);
        assert!(clock.next_checkpoint >= at + 20.0);
        assert!(clock.next_checkpoint <= at + 25.0);
    }

    #[test]
    fn test_zero_chance_never_spawns() {
        let mut rng = Pcg32::seed_from_u64(3);
        let channel = SpawnChannel {
            chance: 0.0,
            ..timed_obstacles()
        };
        let mut spawner = Spawner::new(&[channel]);
        spawner.reset(&mut rng);
        for _ in 0..1000 {
            assert!(spawner.update(0.1, 0.0, 0.0, 3, &mut rng).is_empty());
        }
    }

    #[test]
    fn test_spawner_lanes_cover_all_lanes() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut spawner = Spawner::new(&[timed_obstacles()]);
        spawner.reset(&mut rng);
        let mut seen = [false; 3];
        for _ in 0..2000 {
            for r in spawner.update(0.1, 0.0, 0.0, 3, &mut rng) {
                seen[r.lane] = true;
            }
        }
        assert!(seen.iter().all(|s| *s));
    }

    proptest! {
        #[test]
        fn prop_interval_stays_clamped(
            base in 0.0f32..5.0,
            tighten in -1.0f32..1.0,
            min in 0.1f32..1.0,
            span in 0.0f32..2.0,
            difficulty in -100.0f32..100.0,
        ) {
            let cadence = Cadence::Timed { base, tighten, min, max: min + span };
            let interval = cadence.interval(difficulty);
            prop_assert!(interval >= min);
            prop_assert!(interval <= min + span);
        }
    }
}
