//! Collects authoring-side notifications into batches.

use std::collections::HashSet;
use std::mem;

use crate::events::{GameObjectChange, GameObjectChangeTrackerEvents, GameObjectDesc, LoadedScene};

/// Accumulates scene and object notifications between integrations.
///
/// Work that cancels out inside one batch is dropped here so the
/// integration never sees it.
#[derive(Clone, Debug, Default)]
pub struct GameObjectChangeTracker {
    pending: GameObjectChangeTrackerEvents,
    created: HashSet<i32>,
}

impl GameObjectChangeTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
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

    /// Records a scene that finished loading.
    ///
    /// A second load of the same scene replaces the first.
    pub fn record_scene_loaded(&mut self, scene: LoadedScene) {
        self.pending.loaded_scenes.retain(|s| s.scene != scene.scene);
        self.pending.loaded_scenes.push(scene);
    }

    /// Records an unloaded scene.
    ///
    /// A pending load of the scene, and every pending event inside it,
    /// is dropped.
    pub fn record_scene_unloaded(&mut self, scene: i32) {
        self.pending.loaded_scenes.retain(|s| s.scene != scene);
        self.pending.events.retain(|event| match event {
            GameObjectChange::CreatedOrChanged { scene: s, .. }
            | GameObjectChange::Reparented { scene: s, .. } => *s != scene,
            _ => true,
        });
        if !self.pending.unloaded_scenes.contains(&scene) {
            self.pending.unloaded_scenes.push(scene);
        }
    }

    /// Records a newly created object.
    pub fn record_created(&mut self, scene: i32, object: GameObjectDesc) {
        self.created.insert(object.instance_id);
        self.pending
            .events
            .push(GameObjectChange::CreatedOrChanged { scene, object });
    }

    /// Records a changed object.
    pub fn record_changed(&mut self, scene: i32, object: GameObjectDesc) {
        self.pending
            .events
            .push(GameObjectChange::CreatedOrChanged { scene, object });
    }

    /// Records a destroyed object.
    ///
    /// Earlier events for the object are dropped, except a destroy of a
    /// previous incarnation. If the object was created in this batch, the
    /// creation cancels out and no new destroy is recorded.
    pub fn record_destroyed(&mut self, instance_id: i32) {
        let mut already_destroyed = false;
        self.pending.events.retain(|event| match event {
            GameObjectChange::Destroyed { instance_id: id } if *id == instance_id => {
                already_destroyed = true;
                true
            }
            event => event.instance_id() != instance_id,
        });
        let created_here = self.created.remove(&instance_id);
        if !created_here && !already_destroyed {
            self.pending
                .events
                .push(GameObjectChange::Destroyed { instance_id });
        }
    }

    /// Records a parent change.
    pub fn record_reparented(&mut self, instance_id: i32, scene: i32, parent: Option<i32>) {
        self.pending.events.push(GameObjectChange::Reparented {
            instance_id,
            scene,
            parent,
        });
    }

    /// Records a rename.
    pub fn record_renamed(&mut self, instance_id: i32, name: impl Into<String>) {
        self.pending.events.push(GameObjectChange::Renamed {
            instance_id,
            name: name.into(),
        });
    }

    /// Records a sibling order change.
    pub fn record_sort_index_changed(&mut self, instance_id: i32, sort_index: i32) {
        self.pending.events.push(GameObjectChange::SortIndexChanged {
            instance_id,
            sort_index,
        });
    }

    /// Hands out the pending batch and starts a new one.
    pub fn take_events(&mut self) -> GameObjectChangeTrackerEvents {
        self.created.clear();
        mem::take(&mut self.pending)
    }
}
