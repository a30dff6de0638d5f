//! Storage for every live entity.
//!
//! Entities sit in one dense `Vec` with an id index beside it. Removal swaps
//! the last entity into the freed position, so **iteration order is not
//! stable across removals**; look entities up by [`EntityId`], never by
//! position.

use engine_core::Aabb;
use std::collections::HashMap;

use crate::entity::{Entity, EntityId};

#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
    index: HashMap<EntityId, usize>,
    next_id: u64,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a fresh id and store the entity.
    pub fn insert(&mut self, mut entity: Entity) -> EntityId {
        self.next_id += 1;
        let id = EntityId(self.next_id);
        entity.id = id;
        self.index.insert(id, self.entities.len());
        self.entities.push(entity);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index.get(&id).map(|&i| &self.entities[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.index.get(&id).map(|&i| &mut self.entities[i])
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Entity> {
        self.entities.iter_mut()
    }

    /// Ids in current storage order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(Entity::id).collect()
    }

    /// Swap-remove one entity, repairing the index of the one moved into its place.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let position = self.index.remove(&id)?;
        let removed = self.entities.swap_remove(position);
        if let Some(moved) = self.entities.get(position) {
            self.index.insert(moved.id, position);
        }
        Some(removed)
    }

    /// Remove every entity flagged `pending_removal`.
    ///
    /// Walks backward so a swapped-in entity has always been visited already.
    pub fn sweep_pending(&mut self) -> Vec<Entity> {
        let mut removed = Vec::new();
        for position in (0..self.entities.len()).rev() {
            if self.entities[position].pending_removal {
                let id = self.entities[position].id;
                if let Some(entity) = self.remove(id) {
                    removed.push(entity);
                }
            }
        }
        removed
    }

    /// Recompute every entity's `colliding` list from scratch.
    /// Pending entities take no part.
    pub fn rebuild_overlaps(&mut self) {
        let boxes: Vec<Option<Aabb>> = self
            .entities
            .iter_mut()
            .map(|e| {
                e.colliding.clear();
                e.is_active().then(|| e.body.aabb())
            })
            .collect();

        for (i, j) in physics::overlapping_pairs(&boxes) {
            let (a, b) = (self.entities[i].id, self.entities[j].id);
            self.entities[i].colliding.push(b);
            self.entities[j].colliding.push(a);
        }
    }
}
