//! Entity recycling
//!
//! Entities move by value between the session's live list and this pool, so
//! an entity is always in exactly one of the two places and cannot be
//! released twice.

use serde::{Deserialize, Serialize};

use super::state::{Entity, EntityKind};

/// Free lists of parked entities, one per kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityPool {
    obstacles: Vec<Entity>,
    gifts: Vec<Entity>,
    /// Entities ever allocated through this pool
    created: u32,
}

impl EntityPool {
    fn list_mut(&mut self, kind: EntityKind) -> &mut Vec<Entity> {
        match kind {
            EntityKind::Obstacle => &mut self.obstacles,
            EntityKind::Gift => &mut self.gifts,
        }
    }

    /// Take a parked entity of this kind. `None` means the caller must
    /// [`allocate`](Self::allocate) a new one.
    pub fn acquire(&mut self, kind: EntityKind) -> Option<Entity> {
        let entity = self.list_mut(kind).pop();
        if let Some(e) = &entity {
            log::trace!("Reusing pooled {:?} #{}", kind, e.id);
        }
        entity
    }

    /// Create a brand new entity owned by the caller
    pub fn allocate(&mut self, id: u32, kind: EntityKind) -> Entity {
        self.created += 1;
        Entity::new(id, kind)
    }

    /// Park an entity for later reuse
    pub fn release(&mut self, entity: Entity) {
        self.list_mut(entity.kind).push(entity);
    }

    /// Parked entities of one kind
    pub fn len(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Obstacle => self.obstacles.len(),
            EntityKind::Gift => self.gifts.len(),
        }
    }

    /// Parked entities of every kind
    pub fn total(&self) -> usize {
        self.obstacles.len() + self.gifts.len()
    }

    pub fn created(&self) -> u32 {
        self.created
    }

    pub fn contains(&self, id: u32) -> bool {
        self.obstacles.iter().chain(&self.gifts).any(|e| e.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_acquire_from_empty_pool() {
        let mut pool = EntityPool::default();
        assert!(pool.acquire(EntityKind::Obstacle).is_none());
        let e = pool.allocate(1, EntityKind::Obstacle);
        assert_eq!(pool.created(), 1);
        pool.release(e);
        assert_eq!(pool.len(EntityKind::Obstacle), 1);
        assert_eq!(pool.len(EntityKind::Gift), 0);
        assert!(pool.contains(1));
    }

    #[test]
    fn test_kinds_do_not_mix() {
        let mut pool = EntityPool::default();
        let gift = pool.allocate(1, EntityKind::Gift);
        pool.release(gift);
        assert!(pool.acquire(EntityKind::Obstacle).is_none());
        let back = pool.acquire(EntityKind::Gift).unwrap();
        assert_eq!(back.id, 1);
        assert_eq!(pool.total(), 0);
    }

    proptest! {
        /// Live + parked always accounts for every allocated entity, with no id in both
        #[test]
        fn prop_live_and_parked_are_disjoint_and_exhaustive(
            ops in prop::collection::vec((any::<bool>(), any::<bool>()), 0..200)
        ) {
            let mut pool = EntityPool::default();
            let mut live: Vec<Entity> = Vec::new();
            let mut next_id = 1;

            for (spawn, gift) in ops {
                let kind = if gift { EntityKind::Gift } else { EntityKind::Obstacle };
                if spawn || live.is_empty() {
                    let e = match pool.acquire(kind) {
                        Some(e) => e,
                        None => {
                            next_id += 1;
                            pool.allocate(next_id, kind)
                        }
                    };
                    live.push(e);
                } else {
                    let e = live.swap_remove(0);
                    pool.release(e);
                }

                prop_assert_eq!(live.len() + pool.total(), pool.created() as usize);
                for e in &live {
                    prop_assert!(!pool.contains(e.id));
                }
            }
        }
    }
}
