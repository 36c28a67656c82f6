//! Display names keyed by node handle.
//!
//! Independent of tree shape: names survive reparenting and are only
//! dropped when the caller removes them. Oversized names are truncated.

use std::collections::HashMap;

use canopy_foundation::{FixedName, NodeHandle};

/// Side table from node handle to display name.
#[derive(Clone, Debug, Default)]
pub struct NameStore {
    names: HashMap<NodeHandle, FixedName>,
}

impl NameStore {
    /// Creates an empty name table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a node's name, truncating it to the fixed capacity.
    pub fn set_name(&mut self, handle: NodeHandle, name: &str) {
        self.names.insert(handle, FixedName::new(name));
    }

    /// Returns the stored name, if any.
    #[must_use]
    pub fn name(&self, handle: NodeHandle) -> Option<&FixedName> {
        self.names.get(&handle)
    }

    /// Returns the stored name, or a name derived from the handle.
    #[must_use]
    pub fn display_name(&self, handle: NodeHandle) -> FixedName {
        self.names
            .get(&handle)
            .copied()
            .unwrap_or_else(|| FixedName::new(&handle.to_string()))
    }

    /// Returns true if a name is stored for the handle.
    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.names.contains_key(&handle)
    }

    /// Removes a name, returning it.
    pub fn remove(&mut self, handle: NodeHandle) -> Option<FixedName> {
        self.names.remove(&handle)
    }

    /// Removes all names.
    pub fn clear(&mut self) {
        self.names.clear();
    }

    /// Returns the number of stored names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no names are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
