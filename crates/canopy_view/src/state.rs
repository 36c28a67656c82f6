//! UI-owned expansion and open state.
//!
//! Both are persistent collections, so handing a copy to background work
//! is O(1) and never races with the UI editing its own copy.

use canopy_foundation::{HandleMap, HandleSet, NodeHandle};

/// Nodes the user has expanded.
pub type ExpandedSet = HandleSet;

/// Which SubScenes are open. Unknown SubScenes count as closed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubSceneOpenState(HandleMap<bool>);

impl SubSceneOpenState {
    /// Creates a state where every SubScene is closed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the SubScene is open.
    #[must_use]
    pub fn is_open(&self, sub_scene: NodeHandle) -> bool {
        self.0.get(sub_scene).copied().unwrap_or(false)
    }

    /// Records whether a SubScene is open.
    pub fn set_open(&mut self, sub_scene: NodeHandle, open: bool) {
        self.0.insert(sub_scene, open);
    }

    /// Returns a copy with one SubScene updated.
    #[must_use]
    pub fn with_open(&self, sub_scene: NodeHandle, open: bool) -> Self {
        Self(self.0.with(sub_scene, open))
    }

    /// Number of SubScenes with a recorded state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no state is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(NodeHandle, bool)> for SubSceneOpenState {
    fn from_iter<I: IntoIterator<Item = (NodeHandle, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
