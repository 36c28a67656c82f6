//! SubScene bookkeeping.
//!
//! A SubScene node can be kept alive by three independent sources:
//! the authoring object that hosts it, an open authoring scene whose
//! objects live under it, and scene tags from any number of worlds. The
//! node is created on demand by whichever source shows up first and is
//! removed when the last one lets go.

use std::collections::HashMap;

use canopy_foundation::{NodeHandle, NodeKind, Result};
use canopy_store::NodeStore;
use tracing::debug;

use crate::events::{SceneTag, SceneTagKey};

/// What keeps one SubScene node alive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
struct SubSceneRefs {
    game_object: bool,
    authoring_scenes: u32,
    tags: u32,
}

impl SubSceneRefs {
    fn is_unreferenced(self) -> bool {
        !self.game_object && self.authoring_scenes == 0 && self.tags == 0
    }
}

/// Tracks SubScene nodes and the scenes and scene tags that point at them.
#[derive(Clone, Debug, Default)]
pub struct SubSceneMap {
    refs: HashMap<i32, SubSceneRefs>,
    authoring_scenes: HashMap<i32, i32>,
    tags: HashMap<SceneTagKey, i32>,
}

impl SubSceneMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of SubScenes currently referenced.
    #[must_use]
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    /// Returns true if no SubScene is referenced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Returns true if the SubScene has a loaded authoring scene.
    #[must_use]
    pub fn is_open(&self, sub_scene: i32) -> bool {
        self.refs
            .get(&sub_scene)
            .is_some_and(|refs| refs.authoring_scenes > 0)
    }

    /// Iterates over every referenced SubScene with its open state.
    pub fn open_states(&self) -> impl Iterator<Item = (NodeHandle, bool)> + '_ {
        self.refs
            .iter()
            .map(|(id, refs)| (NodeHandle::sub_scene(*id), refs.authoring_scenes > 0))
    }

    /// Returns the SubScene a loaded authoring scene belongs to.
    #[must_use]
    pub fn sub_scene_for_scene(&self, scene: i32) -> Option<NodeHandle> {
        self.authoring_scenes
            .get(&scene)
            .map(|id| NodeHandle::sub_scene(*id))
    }

    /// Returns the SubScene a scene tag points at.
    #[must_use]
    pub fn sub_scene_for_tag(&self, key: SceneTagKey) -> Option<NodeHandle> {
        self.tags.get(&key).map(|id| NodeHandle::sub_scene(*id))
    }

    /// Drops every reference without touching the store.
    pub fn clear(&mut self) {
        self.refs.clear();
        self.authoring_scenes.clear();
        self.tags.clear();
    }

    // =========================================================================
    // Authoring side
    // =========================================================================

    /// Records the authoring object hosting `sub_scene` and places its node
    /// under `parent`.
    ///
    /// # Errors
    ///
    /// Propagates store errors (`ParentNotFound`, `CycleDetected`).
    pub fn register_game_object(
        &mut self,
        nodes: &mut NodeStore,
        sub_scene: i32,
        parent: NodeHandle,
    ) -> Result<NodeHandle> {
        let handle = NodeHandle::sub_scene(sub_scene);
        if nodes.exists(handle) {
            nodes.set_parent(handle, parent)?;
        } else {
            nodes.add_node(handle, Some(parent))?;
        }
        self.refs.entry(sub_scene).or_default().game_object = true;
        Ok(handle)
    }

    /// Forgets the authoring object hosting `sub_scene`.
    ///
    /// A SubScene still referenced elsewhere moves under the root.
    ///
    /// # Errors
    ///
    /// Propagates store errors.
    pub fn release_game_object(&mut self, nodes: &mut NodeStore, sub_scene: i32) -> Result<()> {
        let Some(refs) = self.refs.get_mut(&sub_scene) else {
            return Ok(());
        };
        refs.game_object = false;
        if refs.is_unreferenced() {
            return self.drop_sub_scene(nodes, sub_scene);
        }
        nodes.set_parent(NodeHandle::sub_scene(sub_scene), NodeHandle::ROOT)
    }

    /// Marks `scene` as the loaded authoring scene of `sub_scene`.
    ///
    /// Creates the SubScene node under the root if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Propagates store errors.
    pub fn set_authoring_scene(
        &mut self,
        nodes: &mut NodeStore,
        scene: i32,
        sub_scene: i32,
    ) -> Result<NodeHandle> {
        if let Some(previous) = self.authoring_scenes.get(&scene).copied() {
            if previous == sub_scene {
                return Ok(NodeHandle::sub_scene(sub_scene));
            }
            self.clear_authoring_scene(nodes, scene)?;
        }
        let handle = ensure_sub_scene_node(nodes, sub_scene)?;
        self.authoring_scenes.insert(scene, sub_scene);
        self.refs.entry(sub_scene).or_default().authoring_scenes += 1;
        Ok(handle)
    }

    /// Forgets the authoring scene `scene`, returning the SubScene it
    /// belonged to.
    ///
    /// # Errors
    ///
    /// Propagates store errors.
    pub fn clear_authoring_scene(
        &mut self,
        nodes: &mut NodeStore,
        scene: i32,
    ) -> Result<Option<NodeHandle>> {
        let Some(sub_scene) = self.authoring_scenes.remove(&scene) else {
            return Ok(None);
        };
        if let Some(refs) = self.refs.get_mut(&sub_scene) {
            refs.authoring_scenes = refs.authoring_scenes.saturating_sub(1);
            if refs.is_unreferenced() {
                self.drop_sub_scene(nodes, sub_scene)?;
            }
        }
        Ok(Some(NodeHandle::sub_scene(sub_scene)))
    }

    // =========================================================================
    // Scene tags
    // =========================================================================

    /// Folds one created scene tag into the store.
    ///
    /// # Errors
    ///
    /// Propagates store errors.
    pub fn integrate_created_tag(
        &mut self,
        nodes: &mut NodeStore,
        tag: &SceneTag,
    ) -> Result<NodeHandle> {
        let key = tag.key();
        match self.tags.get(&key).copied() {
            Some(existing) if existing == tag.sub_scene => {
                return Ok(NodeHandle::sub_scene(existing));
            }
            Some(_) => self.release_tag(nodes, key)?,
            None => {}
        }
        let handle = ensure_sub_scene_node(nodes, tag.sub_scene)?;
        self.tags.insert(key, tag.sub_scene);
        self.refs.entry(tag.sub_scene).or_default().tags += 1;
        Ok(handle)
    }

    /// Folds one destroyed scene tag into the store.
    ///
    /// Unknown tags are ignored.
    ///
    /// # Errors
    ///
    /// Propagates store errors.
    pub fn integrate_destroyed_tag(&mut self, nodes: &mut NodeStore, tag: &SceneTag) -> Result<()> {
        self.release_tag(nodes, tag.key())
    }

    /// Applies a batch of tag changes, destroyed tags first.
    ///
    /// Never fails; individual failures are logged and skipped.
    pub fn integrate_changes(
        &mut self,
        nodes: &mut NodeStore,
        created: &[SceneTag],
        destroyed: &[SceneTag],
    ) {
        for tag in destroyed {
            if let Err(error) = self.integrate_destroyed_tag(nodes, tag) {
                debug!(?tag, %error, "skipping destroyed scene tag");
            }
        }
        for tag in created {
            if let Err(error) = self.integrate_created_tag(nodes, tag) {
                debug!(?tag, %error, "skipping created scene tag");
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn release_tag(&mut self, nodes: &mut NodeStore, key: SceneTagKey) -> Result<()> {
        let Some(sub_scene) = self.tags.remove(&key) else {
            return Ok(());
        };
        if let Some(refs) = self.refs.get_mut(&sub_scene) {
            refs.tags = refs.tags.saturating_sub(1);
            if refs.is_unreferenced() {
                return self.drop_sub_scene(nodes, sub_scene);
            }
        }
        Ok(())
    }

    fn drop_sub_scene(&mut self, nodes: &mut NodeStore, sub_scene: i32) -> Result<()> {
        self.refs.remove(&sub_scene);
        let handle = NodeHandle::sub_scene(sub_scene);
        if nodes.exists(handle) {
            nodes.remove_node(handle)?;
        }
        Ok(())
    }
}

fn ensure_sub_scene_node(nodes: &mut NodeStore, sub_scene: i32) -> Result<NodeHandle> {
    let handle = NodeHandle::sub_scene(sub_scene);
    if !nodes.exists(handle) {
        nodes.add_node(handle, None)?;
    }
    Ok(handle)
}

/// Walks up from `handle` and returns the closest SubScene ancestor.
#[must_use]
pub fn nearest_sub_scene(nodes: &NodeStore, handle: NodeHandle) -> Option<NodeHandle> {
    let mut current = nodes.parent_of(handle).ok().flatten();
    while let Some(ancestor) = current {
        if ancestor.kind == NodeKind::SubScene {
            return Some(ancestor);
        }
        current = nodes.parent_of(ancestor).ok().flatten();
    }
    None
}
