//! Sled vs entity proximity tests
//!
//! Everything happens on the ground plane: x is lateral, z is depth, height
//! is ignored. Two shapes are supported; a tuning picks one for all entities.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::state::{Entity, Sled};

/// Which proximity test a variant uses
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CollisionShape {
    /// Overlapping circles of the two radii
    Circle,
    /// Within `depth` along z and within the summed radii along x
    Band { depth: f32 },
}

/// Project a world position onto the ground plane (x, z)
#[inline]
pub fn ground_point(pos: Vec3) -> Vec2 {
    Vec2::new(pos.x, pos.z)
}

/// Circle-circle overlap (touching counts)
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a.distance_squared(b) <= reach * reach
}

/// Axis-aligned band overlap
#[inline]
pub fn band_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32, depth: f32) -> bool {
    (a.y - b.y).abs() < depth && (a.x - b.x).abs() < a_radius + b_radius
}

impl CollisionShape {
    /// Does the sled touch this entity? Pure; the caller applies effects
    /// through [`Entity::mark_hit`] so they land at most once.
    pub fn test(&self, sled: &Sled, entity: &Entity) -> bool {
        self.test_at(sled, entity.pos, entity.radius)
    }

    /// Like [`test`](Self::test), but over the depth `dz` the entity
    /// scrolled this frame, so a long frame cannot skip it past the sled.
    pub fn test_swept(&self, sled: &Sled, entity: &Entity, dz: f32) -> bool {
        let end = entity.pos.z;
        let start = end - dz.max(0.0);
        let mut nearest = entity.pos;
        nearest.z = sled.z.clamp(start, end);
        self.test_at(sled, nearest, entity.radius)
    }

    fn test_at(&self, sled: &Sled, pos: Vec3, radius: f32) -> bool {
        let a = ground_point(sled.pos());
        let b = ground_point(pos);
        match *self {
            CollisionShape::Circle => circles_overlap(a, sled.radius, b, radius),
            CollisionShape::Band { depth } => band_overlap(a, sled.radius, b, radius, depth),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Archetype, EntityKind};
    use crate::tuning::Tuning;

    fn sled() -> Sled {
        Sled::new(&Tuning::endless())
    }

    fn rock_at(x: f32, z: f32) -> Entity {
        let mut e = Entity::new(1, EntityKind::Obstacle);
        e.place(0, x, z, 0.85, Archetype::Rock);
        e
    }

    #[test]
    fn test_circle_hit_and_miss() {
        let sled = sled(); // x = 0, z = 4
        assert!(CollisionShape::Circle.test(&sled, &rock_at(0.0, 4.0)));
        // Just touching: 0.85 + 0.85
        assert!(CollisionShape::Circle.test(&sled, &rock_at(1.7, 4.0)));
        assert!(!CollisionShape::Circle.test(&sled, &rock_at(1.8, 4.0)));
        // Diagonal: inside each axis but outside the circle
        assert!(!CollisionShape::Circle.test(&sled, &rock_at(1.3, 5.3)));
        // Neighbor lane never collides
        assert!(!CollisionShape::Circle.test(&sled, &rock_at(3.2, 4.0)));
    }

    #[test]
    fn test_height_is_ignored() {
        let sled = sled();
        let mut gift = Entity::new(2, EntityKind::Gift);
        gift.place(1, 0.0, 4.0, 0.65, Archetype::Present);
        gift.pos.y = 100.0;
        assert!(CollisionShape::Circle.test(&sled, &gift));
    }

    #[test]
    fn test_band_is_boxy() {
        let sled = sled();
        let band = CollisionShape::Band { depth: 1.5 };
        // Diagonal corner the circle rejects is inside the band
        assert!(band.test(&sled, &rock_at(1.3, 5.3)));
        assert!(!band.test(&sled, &rock_at(0.0, 5.6)));
        assert!(!band.test(&sled, &rock_at(1.7, 4.0)));
    }

    #[test]
    fn test_swept_catches_long_frames() {
        let sled = sled();
        let band = CollisionShape::Band { depth: 1.2 };
        // Jumped from z 2.7 to 5.5 in one frame, straight through the sled
        let rock = rock_at(0.0, 5.5);
        assert!(!band.test(&sled, &rock));
        assert!(band.test_swept(&sled, &rock, 2.8));
        assert!(CollisionShape::Circle.test_swept(&sled, &rock, 2.8));

        // Swept range that stays clear of the sled
        assert!(!band.test_swept(&sled, &rock_at(0.0, -2.0), 2.8));
        // Other lane
        assert!(!band.test_swept(&sled, &rock_at(3.2, 5.5), 2.8));
        // No movement is the plain test
        assert_eq!(band.test_swept(&sled, &rock, 0.0), band.test(&sled, &rock));
    }

    #[test]
    fn test_circles_overlap_symmetric() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(1.0, 1.0);
        assert_eq!(circles_overlap(a, 1.0, b, 0.5), circles_overlap(b, 0.5, a, 1.0));
    }
}
