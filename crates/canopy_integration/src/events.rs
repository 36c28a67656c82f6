//! Change events produced by the authoring and simulation sides.
//!
//! These are the inbound interface of the hierarchy. They are plain data:
//! replayable, batchable, and possibly stale by the time they are applied.

use std::fmt;

use canopy_foundation::NodeHandle;

// =============================================================================
// GameObject side
// =============================================================================

/// An authoring object as reported by the scene system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameObjectDesc {
    /// Instance id of the object.
    pub instance_id: i32,
    /// Instance id of the parent object, `None` for scene roots.
    pub parent: Option<i32>,
    /// Display name.
    pub name: String,
    /// Position among siblings.
    pub sort_index: i32,
    /// True if the object hosts a SubScene.
    pub is_sub_scene: bool,
}

impl GameObjectDesc {
    /// Creates a root-level object.
    #[must_use]
    pub fn new(instance_id: i32, name: impl Into<String>) -> Self {
        Self {
            instance_id,
            parent: None,
            name: name.into(),
            sort_index: 0,
            is_sub_scene: false,
        }
    }

    /// Sets the parent object.
    #[must_use]
    pub fn with_parent(mut self, parent: i32) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the sort index.
    #[must_use]
    pub fn with_sort_index(mut self, sort_index: i32) -> Self {
        self.sort_index = sort_index;
        self
    }

    /// Marks the object as a SubScene host.
    #[must_use]
    pub fn sub_scene(mut self) -> Self {
        self.is_sub_scene = true;
        self
    }

    /// The node handle this object is mirrored as.
    #[must_use]
    pub fn handle(&self) -> NodeHandle {
        if self.is_sub_scene {
            NodeHandle::sub_scene(self.instance_id)
        } else {
            NodeHandle::game_object(self.instance_id)
        }
    }
}

/// A scene that finished loading, with its full object list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedScene {
    /// Scene handle.
    pub scene: i32,
    /// Display name.
    pub name: String,
    /// Position among loaded scenes.
    pub sort_index: i32,
    /// Set when this is the authoring scene of an open SubScene; its
    /// objects then live directly under the SubScene node.
    pub sub_scene: Option<i32>,
    /// Every object in the scene, in any order.
    pub objects: Vec<GameObjectDesc>,
}

impl LoadedScene {
    /// Creates an empty regular scene.
    #[must_use]
    pub fn new(scene: i32, name: impl Into<String>) -> Self {
        Self {
            scene,
            name: name.into(),
            sort_index: 0,
            sub_scene: None,
            objects: Vec::new(),
        }
    }

    /// Marks this scene as the authoring scene of a SubScene.
    #[must_use]
    pub fn authoring_for(mut self, sub_scene: i32) -> Self {
        self.sub_scene = Some(sub_scene);
        self
    }

    /// Sets the sort index.
    #[must_use]
    pub fn with_sort_index(mut self, sort_index: i32) -> Self {
        self.sort_index = sort_index;
        self
    }

    /// Adds an object.
    #[must_use]
    pub fn with_object(mut self, object: GameObjectDesc) -> Self {
        self.objects.push(object);
        self
    }
}

/// A per-object change notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameObjectChange {
    /// The object was created, or its description changed.
    CreatedOrChanged {
        /// Scene the object lives in.
        scene: i32,
        /// Current description.
        object: GameObjectDesc,
    },
    /// The object was destroyed. Its children are reported separately.
    Destroyed {
        /// Instance id of the destroyed object.
        instance_id: i32,
    },
    /// The object moved to a new parent.
    Reparented {
        /// Instance id of the moved object.
        instance_id: i32,
        /// Scene the object now lives in.
        scene: i32,
        /// New parent, `None` for a scene root.
        parent: Option<i32>,
    },
    /// The object was renamed.
    Renamed {
        /// Instance id of the object.
        instance_id: i32,
        /// New name.
        name: String,
    },
    /// The object moved among its siblings.
    SortIndexChanged {
        /// Instance id of the object.
        instance_id: i32,
        /// New sort index.
        sort_index: i32,
    },
}

impl GameObjectChange {
    /// Instance id of the object this event is about.
    #[must_use]
    pub fn instance_id(&self) -> i32 {
        match self {
            Self::CreatedOrChanged { object, .. } => object.instance_id,
            Self::Destroyed { instance_id }
            | Self::Reparented { instance_id, .. }
            | Self::Renamed { instance_id, .. }
            | Self::SortIndexChanged { instance_id, .. } => *instance_id,
        }
    }
}

/// One batch of GameObject-side changes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameObjectChangeTrackerEvents {
    /// Scenes that finished loading.
    pub loaded_scenes: Vec<LoadedScene>,
    /// Scenes that were unloaded.
    pub unloaded_scenes: Vec<i32>,
    /// Per-object changes, in the order they happened.
    pub events: Vec<GameObjectChange>,
}

impl GameObjectChangeTrackerEvents {
    /// Returns true if the batch carries no work.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loaded_scenes.is_empty() && self.unloaded_scenes.is_empty() && self.events.is_empty()
    }

    /// Total number of work items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.loaded_scenes.len() + self.unloaded_scenes.len() + self.events.len()
    }
}

// =============================================================================
// Entity side
// =============================================================================

/// Identifies the world an entity or scene tag comes from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorldId(pub u32);

/// A simulation entity reference.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    /// Entity index.
    pub index: i32,
    /// Entity version.
    pub version: i32,
}

impl EntityId {
    /// Creates an entity reference.
    #[must_use]
    pub const fn new(index: i32, version: i32) -> Self {
        Self { index, version }
    }

    /// The node handle this entity is mirrored as.
    #[must_use]
    pub const fn handle(self) -> NodeHandle {
        NodeHandle::entity(self.index, self.version)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({}:{})", self.index, self.version)
    }
}

/// Key of a scene tag: the originating world and its scene entity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SceneTagKey {
    /// World the tag lives in.
    pub world: WorldId,
    /// The scene entity the tag points at.
    pub scene_entity: EntityId,
}

/// Links entities of a world to the SubScene they were loaded from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SceneTag {
    /// World the tag lives in.
    pub world: WorldId,
    /// The scene entity the tag points at.
    pub scene_entity: EntityId,
    /// The SubScene the scene was loaded from.
    pub sub_scene: i32,
}

impl SceneTag {
    /// The map key of this tag.
    #[must_use]
    pub fn key(&self) -> SceneTagKey {
        SceneTagKey {
            world: self.world,
            scene_entity: self.scene_entity,
        }
    }
}

/// A created entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityDesc {
    /// The entity.
    pub entity: EntityId,
    /// Parent entity, if any.
    pub parent: Option<EntityId>,
    /// Scene entity of the scene tag the entity carries, if any.
    pub scene_entity: Option<EntityId>,
    /// Display name, if the entity has one.
    pub name: Option<String>,
}

impl EntityDesc {
    /// Creates an unparented, untagged, unnamed entity.
    #[must_use]
    pub fn new(entity: EntityId) -> Self {
        Self {
            entity,
            parent: None,
            scene_entity: None,
            name: None,
        }
    }

    /// Sets the parent entity.
    #[must_use]
    pub fn with_parent(mut self, parent: EntityId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the scene entity.
    #[must_use]
    pub fn in_scene(mut self, scene_entity: EntityId) -> Self {
        self.scene_entity = Some(scene_entity);
        self
    }

    /// Sets the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A parent change of an existing entity.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EntityReparent {
    /// The moved entity.
    pub entity: EntityId,
    /// New parent, `None` when the entity lost its parent.
    pub parent: Option<EntityId>,
}

/// One batch of entity-side changes from a single world.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntityChanges {
    /// World the entities belong to.
    pub world: WorldId,
    /// Entities that appeared.
    pub created_entities: Vec<EntityDesc>,
    /// Entities that were destroyed.
    pub destroyed_entities: Vec<EntityId>,
    /// Entities whose parent changed.
    pub reparented_entities: Vec<EntityReparent>,
    /// Scene tags that appeared (any world).
    pub created_scene_tags: Vec<SceneTag>,
    /// Scene tags that disappeared (any world).
    pub destroyed_scene_tags: Vec<SceneTag>,
}

impl EntityChanges {
    /// Creates an empty batch for a world.
    #[must_use]
    pub fn new(world: WorldId) -> Self {
        Self {
            world,
            ..Self::default()
        }
    }

    /// Returns true if the batch carries no work.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of work items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.created_entities.len()
            + self.destroyed_entities.len()
            + self.reparented_entities.len()
            + self.created_scene_tags.len()
            + self.destroyed_scene_tags.len()
    }
}
