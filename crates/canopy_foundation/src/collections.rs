//! Persistent handle collections with structural sharing.
//!
//! Thin wrappers around the `im` crate. UI-owned state such as the set of
//! expanded nodes is cloned into every background reduction, so cloning
//! must be O(1).

use std::fmt;
use std::iter::FromIterator;

use crate::handle::NodeHandle;

/// Persistent set of node handles.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct HandleSet(im::HashSet<NodeHandle>);

impl HandleSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self(im::HashSet::new())
    }

    /// Returns the number of handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if the set contains the handle.
    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.0.contains(&handle)
    }

    /// Inserts a handle in place. Returns true if it was not present.
    pub fn insert(&mut self, handle: NodeHandle) -> bool {
        self.0.insert(handle).is_none()
    }

    /// Removes a handle in place. Returns true if it was present.
    pub fn remove(&mut self, handle: NodeHandle) -> bool {
        self.0.remove(&handle).is_some()
    }

    /// Returns a new set with the handle inserted.
    #[must_use]
    pub fn with(&self, handle: NodeHandle) -> Self {
        Self(self.0.update(handle))
    }

    /// Returns a new set with the handle removed.
    #[must_use]
    pub fn without(&self, handle: NodeHandle) -> Self {
        Self(self.0.without(&handle))
    }

    /// Returns an iterator over the handles, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        self.0.iter().copied()
    }
}

impl fmt::Debug for HandleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut handles: Vec<_> = self.iter().collect();
        handles.sort_unstable();
        f.debug_set().entries(handles).finish()
    }
}

impl FromIterator<NodeHandle> for HandleSet {
    fn from_iter<I: IntoIterator<Item = NodeHandle>>(iter: I) -> Self {
        Self(im::HashSet::from_iter(iter))
    }
}

impl Extend<NodeHandle> for HandleSet {
    fn extend<I: IntoIterator<Item = NodeHandle>>(&mut self, iter: I) {
        for handle in iter {
            self.0.insert(handle);
        }
    }
}

/// Persistent map keyed by node handle.
#[derive(Clone, PartialEq, Eq)]
pub struct HandleMap<V: Clone>(im::HashMap<NodeHandle, V>);

impl<V: Clone> Default for HandleMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> HandleMap<V> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self(im::HashMap::new())
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gets a value by handle.
    #[must_use]
    pub fn get(&self, handle: NodeHandle) -> Option<&V> {
        self.0.get(&handle)
    }

    /// Returns true if the map contains the handle.
    #[must_use]
    pub fn contains_key(&self, handle: NodeHandle) -> bool {
        self.0.contains_key(&handle)
    }

    /// Inserts in place, returning the previous value.
    pub fn insert(&mut self, handle: NodeHandle, value: V) -> Option<V> {
        self.0.insert(handle, value)
    }

    /// Removes in place, returning the previous value.
    pub fn remove(&mut self, handle: NodeHandle) -> Option<V> {
        self.0.remove(&handle)
    }

    /// Returns a new map with the entry inserted.
    #[must_use]
    pub fn with(&self, handle: NodeHandle, value: V) -> Self {
        Self(self.0.update(handle, value))
    }

    /// Returns an iterator over entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeHandle, &V)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }
}

impl<V: Clone + fmt::Debug> fmt::Debug for HandleMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by_key(|(k, _)| *k);
        f.debug_map().entries(entries).finish()
    }
}

impl<V: Clone> FromIterator<(NodeHandle, V)> for HandleMap<V> {
    fn from_iter<I: IntoIterator<Item = (NodeHandle, V)>>(iter: I) -> Self {
        Self(im::HashMap::from_iter(iter))
    }
}
