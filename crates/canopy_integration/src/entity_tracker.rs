//! Collects entity-side notifications into per-world batches.

use std::collections::HashSet;
use std::mem;

use crate::events::{EntityChanges, EntityDesc, EntityId, EntityReparent, SceneTag, WorldId};

/// Accumulates entity and scene tag notifications for one world.
#[derive(Clone, Debug, Default)]
pub struct EntityChangeTracker {
    pending: EntityChanges,
    created: HashSet<EntityId>,
}

impl EntityChangeTracker {
    /// Creates a tracker for `world`.
    #[must_use]
    pub fn new(world: WorldId) -> Self {
        Self {
            pending: EntityChanges::new(world),
            created: HashSet::new(),
        }
    }

    /// The world this tracker listens to.
    #[must_use]
    pub fn world(&self) -> WorldId {
        self.pending.world
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of pending work items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Records a created entity.
    pub fn record_created(&mut self, desc: EntityDesc) {
        self.created.insert(desc.entity);
        self.pending
            .created_entities
            .retain(|d| d.entity != desc.entity);
        self.pending.created_entities.push(desc);
    }

    /// Records a destroyed entity.
    ///
    /// An entity created in the same batch drops out entirely.
    pub fn record_destroyed(&mut self, entity: EntityId) {
        self.pending
            .reparented_entities
            .retain(|r| r.entity != entity);
        if self.created.remove(&entity) {
            self.pending.created_entities.retain(|d| d.entity != entity);
        } else if !self.pending.destroyed_entities.contains(&entity) {
            self.pending.destroyed_entities.push(entity);
        }
    }

    /// Records a parent change.
    ///
    /// For an entity created in this batch the creation is updated instead;
    /// otherwise the latest parent wins.
    pub fn record_reparented(&mut self, entity: EntityId, parent: Option<EntityId>) {
        if self.created.contains(&entity) {
            if let Some(desc) = self
                .pending
                .created_entities
                .iter_mut()
                .find(|d| d.entity == entity)
            {
                desc.parent = parent;
            }
            return;
        }
        self.pending
            .reparented_entities
            .retain(|r| r.entity != entity);
        self.pending
            .reparented_entities
            .push(EntityReparent { entity, parent });
    }

    /// Records a scene tag that appeared.
    pub fn record_scene_tag_created(&mut self, tag: SceneTag) {
        if !self.pending.created_scene_tags.contains(&tag) {
            self.pending.created_scene_tags.push(tag);
        }
    }

    /// Records a scene tag that went away.
    ///
    /// A tag created in the same batch cancels out.
    pub fn record_scene_tag_destroyed(&mut self, tag: SceneTag) {
        let before = self.pending.created_scene_tags.len();
        self.pending.created_scene_tags.retain(|t| *t != tag);
        if self.pending.created_scene_tags.len() == before
            && !self.pending.destroyed_scene_tags.contains(&tag)
        {
            self.pending.destroyed_scene_tags.push(tag);
        }
    }

    /// Hands out the pending batch and starts a new one.
    pub fn take_changes(&mut self) -> EntityChanges {
        self.created.clear();
        let world = self.pending.world;
        mem::replace(&mut self.pending, EntityChanges::new(world))
    }
}
