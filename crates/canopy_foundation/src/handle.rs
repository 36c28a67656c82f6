//! Node handles: the stable identity of every hierarchy node.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The kind of object a hierarchy node mirrors.
///
/// Ordering follows declaration order, so handles of the same index sort
/// by kind first.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NodeKind {
    /// The single synthetic root.
    Root,
    /// A loaded authoring scene.
    Scene,
    /// A lazily loadable sub-hierarchy.
    SubScene,
    /// An authoring object.
    GameObject,
    /// A simulation entity.
    Entity,
}

impl NodeKind {
    /// Returns a short lowercase name for this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Scene => "scene",
            Self::SubScene => "subscene",
            Self::GameObject => "gameobject",
            Self::Entity => "entity",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity of a hierarchy node.
///
/// Equality and hashing cover all three fields. The `version` mirrors the
/// generation of the external object (entity version, scene reload count)
/// so a recycled index never aliases a stale node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeHandle {
    /// What the node mirrors.
    pub kind: NodeKind,
    /// Index of the external object (instance id, entity index, scene handle).
    pub index: i32,
    /// Version of the external object.
    pub version: i32,
}

impl NodeHandle {
    /// The reserved root handle.
    pub const ROOT: Self = Self {
        kind: NodeKind::Root,
        index: 0,
        version: 0,
    };

    /// Creates a handle from its parts.
    #[must_use]
    pub const fn new(kind: NodeKind, index: i32, version: i32) -> Self {
        Self {
            kind,
            index,
            version,
        }
    }

    /// Handle for a loaded scene.
    #[must_use]
    pub const fn scene(id: i32) -> Self {
        Self::new(NodeKind::Scene, id, 0)
    }

    /// Handle for a SubScene.
    #[must_use]
    pub const fn sub_scene(id: i32) -> Self {
        Self::new(NodeKind::SubScene, id, 0)
    }

    /// Handle for an authoring object.
    #[must_use]
    pub const fn game_object(instance_id: i32) -> Self {
        Self::new(NodeKind::GameObject, instance_id, 0)
    }

    /// Handle for a simulation entity.
    #[must_use]
    pub const fn entity(index: i32, version: i32) -> Self {
        Self::new(NodeKind::Entity, index, version)
    }

    /// Returns true if this is the reserved root handle.
    #[must_use]
    pub const fn is_root(self) -> bool {
        matches!(self.kind, NodeKind::Root)
    }
}

impl fmt::Debug for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NodeKind::Root => write!(f, "NodeHandle(root)"),
            kind => write!(f, "NodeHandle({kind} {}v{})", self.index, self.version),
        }
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NodeKind::Root => write!(f, "Root"),
            NodeKind::Entity => write!(f, "Entity({}:{})", self.index, self.version),
            NodeKind::Scene => write!(f, "Scene({})", self.index),
            NodeKind::SubScene => write!(f, "SubScene({})", self.index),
            NodeKind::GameObject => write!(f, "GameObject({})", self.index),
        }
    }
}
