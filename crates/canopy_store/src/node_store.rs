//! The mutable node forest.
//!
//! `NodeStore` keeps every node in a slot arena addressed through a
//! handle index. Slots freed by removal go on a free list and are reused.
//! Parent and children are stored as handles, never as references, so the
//! structure cannot dangle and reparenting is validated against cycles.
//!
//! Every structural mutation bumps the store-wide change version exactly
//! once and stamps that version on the touched node and all of its
//! ancestors, which is what lets the bake reuse untouched subtrees.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use canopy_foundation::{Error, NodeHandle, Result};
use tracing::trace;

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

/// A node record. Owned exclusively by the store.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) handle: NodeHandle,
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,
    pub(crate) sort_index: i32,
    pub(crate) depth: i32,
    pub(crate) change_version: u64,
}

/// Single-writer forest rooted at [`NodeHandle::ROOT`].
///
/// There is no internal locking; the owner serializes writes. Reads are
/// valid until the next structural call.
#[derive(Debug)]
pub struct NodeStore {
    /// Identity used to match snapshots with the store that baked them.
    id: u64,
    /// Slot arena. Slot 0 always holds the root.
    slots: Vec<Option<Node>>,
    /// Free list of slots available for reuse.
    free_list: Vec<usize>,
    /// Handle to slot index.
    index: HashMap<NodeHandle, usize>,
    /// Bumped once per structural mutation.
    root_change_version: u64,
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeStore {
    /// Creates a store containing only the root.
    #[must_use]
    pub fn new() -> Self {
        let root = Node {
            handle: NodeHandle::ROOT,
            parent: None,
            children: Vec::new(),
            sort_index: 0,
            depth: -1,
            change_version: 0,
        };
        let mut index = HashMap::new();
        index.insert(NodeHandle::ROOT, 0);
        Self {
            id: NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed),
            slots: vec![Some(root)],
            free_list: Vec::new(),
            index,
            root_change_version: 0,
        }
    }

    /// Returns the process-unique identity of this store.
    #[must_use]
    pub fn store_id(&self) -> u64 {
        self.id
    }

    /// Returns the store-wide structural change version.
    #[must_use]
    pub fn root_change_version(&self) -> u64 {
        self.root_change_version
    }

    /// Returns the number of live nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if only the root is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.len() == 1
    }

    /// Checks if a node exists.
    #[must_use]
    pub fn exists(&self, handle: NodeHandle) -> bool {
        self.index.contains_key(&handle)
    }

    /// Returns a view of a node.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the node does not exist.
    pub fn get_node(&self, handle: NodeHandle) -> Result<NodeRef<'_>> {
        self.node(handle)
            .map(|node| NodeRef { node })
            .ok_or_else(|| Error::not_found(handle).in_operation("get_node"))
    }

    /// Returns the children of a node in sort order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the node does not exist.
    pub fn get_children(&self, handle: NodeHandle) -> Result<&[NodeHandle]> {
        self.node(handle)
            .map(|node| node.children.as_slice())
            .ok_or_else(|| Error::not_found(handle).in_operation("get_children"))
    }

    /// Returns the parent of a node, `None` for the root.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the node does not exist.
    pub fn parent_of(&self, handle: NodeHandle) -> Result<Option<NodeHandle>> {
        Ok(self.get_node(handle)?.parent())
    }

    /// Returns the depth of a node (`-1` for the root).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the node does not exist.
    pub fn depth_of(&self, handle: NodeHandle) -> Result<i32> {
        Ok(self.get_node(handle)?.depth())
    }

    /// Returns the sort index of a node.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the node does not exist.
    pub fn sort_index_of(&self, handle: NodeHandle) -> Result<i32> {
        Ok(self.get_node(handle)?.sort_index())
    }

    /// Returns true if `node` lies strictly below `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, node: NodeHandle, ancestor: NodeHandle) -> bool {
        let mut current = self.node(node).and_then(|n| n.parent);
        while let Some(handle) = current {
            if handle == ancestor {
                return true;
            }
            current = self.node(handle).and_then(|n| n.parent);
        }
        false
    }

    /// Iterates over all live nodes in slot order.
    pub fn iter(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.slots.iter().flatten().map(|node| NodeRef { node })
    }

    /// Adds a node under `parent` (the root when `None`).
    ///
    /// # Errors
    ///
    /// - `InvalidHandle` if `handle` is the root
    /// - `AlreadyExists` if `handle` is already present
    /// - `ParentNotFound` if `parent` does not exist
    pub fn add_node(
        &mut self,
        handle: NodeHandle,
        parent: Option<NodeHandle>,
    ) -> Result<NodeRef<'_>> {
        let parent = parent.unwrap_or(NodeHandle::ROOT);
        if handle.is_root() {
            return Err(Error::invalid_handle(handle).in_operation("add_node"));
        }
        if self.exists(handle) {
            return Err(Error::already_exists(handle).in_operation("add_node"));
        }
        let parent_depth = self
            .node(parent)
            .map(|n| n.depth)
            .ok_or_else(|| Error::parent_not_found(parent).in_operation("add_node"))?;

        let version = self.bump();
        let node = Node {
            handle,
            parent: Some(parent),
            children: Vec::new(),
            sort_index: 0,
            depth: parent_depth + 1,
            change_version: version,
        };
        let slot = if let Some(slot) = self.free_list.pop() {
            self.slots[slot] = Some(node);
            slot
        } else {
            self.slots.push(Some(node));
            self.slots.len() - 1
        };
        self.index.insert(handle, slot);
        self.insert_child_sorted(parent, handle, 0);
        self.stamp_ancestors(parent, version);

        trace!(?handle, ?parent, version, "add_node");
        self.get_node(handle)
    }

    /// Removes a node, promoting its children to its former parent.
    ///
    /// The promoted children keep their relative order.
    ///
    /// # Errors
    ///
    /// - `InvalidHandle` if `handle` is the root
    /// - `NotFound` if `handle` does not exist
    pub fn remove_node(&mut self, handle: NodeHandle) -> Result<()> {
        if handle.is_root() {
            return Err(Error::invalid_handle(handle).in_operation("remove_node"));
        }
        let slot = *self
            .index
            .get(&handle)
            .ok_or_else(|| Error::not_found(handle).in_operation("remove_node"))?;
        let Some(node) = self.slots[slot].take() else {
            return Err(Error::not_found(handle).in_operation("remove_node"));
        };
        self.index.remove(&handle);
        self.free_list.push(slot);

        let parent = node.parent.unwrap_or(NodeHandle::ROOT);
        self.detach_child(parent, handle);
        for child in node.children {
            let sort_index = self.sort_index_unchecked(child);
            if let Some(child_node) = self.node_mut(child) {
                child_node.parent = Some(parent);
            }
            self.insert_child_sorted(parent, child, sort_index);
            self.shift_depth(child, -1);
        }

        let version = self.bump();
        self.stamp_ancestors(parent, version);
        trace!(?handle, ?parent, version, "remove_node");
        Ok(())
    }

    /// Moves a node (and its subtree) under a new parent.
    ///
    /// Setting the current parent again is a no-op.
    ///
    /// # Errors
    ///
    /// - `SelfParenting` if `handle == new_parent`
    /// - `InvalidHandle` if `handle` is the root
    /// - `NotFound` if either node does not exist
    /// - `CycleDetected` if `new_parent` lies inside the subtree of `handle`
    pub fn set_parent(&mut self, handle: NodeHandle, new_parent: NodeHandle) -> Result<()> {
        if handle == new_parent {
            return Err(Error::self_parenting(handle).in_operation("set_parent"));
        }
        if handle.is_root() {
            return Err(Error::invalid_handle(handle).in_operation("set_parent"));
        }
        let (old_parent, sort_index, depth) = self
            .node(handle)
            .map(|n| (n.parent.unwrap_or(NodeHandle::ROOT), n.sort_index, n.depth))
            .ok_or_else(|| Error::not_found(handle).in_operation("set_parent"))?;
        let parent_depth = self
            .node(new_parent)
            .map(|n| n.depth)
            .ok_or_else(|| Error::not_found(new_parent).in_operation("set_parent"))?;
        if self.is_descendant_of(new_parent, handle) {
            return Err(Error::cycle_detected(handle, new_parent).in_operation("set_parent"));
        }
        if old_parent == new_parent {
            return Ok(());
        }

        self.detach_child(old_parent, handle);
        if let Some(node) = self.node_mut(handle) {
            node.parent = Some(new_parent);
        }
        self.insert_child_sorted(new_parent, handle, sort_index);
        self.shift_depth(handle, parent_depth + 1 - depth);

        let version = self.bump();
        self.stamp_ancestors(old_parent, version);
        self.stamp_ancestors(new_parent, version);
        trace!(?handle, ?old_parent, ?new_parent, version, "set_parent");
        Ok(())
    }

    /// Changes a node's sort index and reorders it among its siblings.
    ///
    /// # Errors
    ///
    /// - `InvalidHandle` if `handle` is the root
    /// - `NotFound` if `handle` does not exist
    pub fn set_sort_index(&mut self, handle: NodeHandle, sort_index: i32) -> Result<()> {
        if handle.is_root() {
            return Err(Error::invalid_handle(handle).in_operation("set_sort_index"));
        }
        let (parent, current) = self
            .node(handle)
            .map(|n| (n.parent.unwrap_or(NodeHandle::ROOT), n.sort_index))
            .ok_or_else(|| Error::not_found(handle).in_operation("set_sort_index"))?;
        if current == sort_index {
            return Ok(());
        }

        self.detach_child(parent, handle);
        if let Some(node) = self.node_mut(handle) {
            node.sort_index = sort_index;
        }
        self.insert_child_sorted(parent, handle, sort_index);

        let version = self.bump();
        self.stamp_ancestors(parent, version);
        trace!(?handle, sort_index, version, "set_sort_index");
        Ok(())
    }

    /// Removes every node except the root.
    ///
    /// The change version keeps counting; it is never reset.
    pub fn clear(&mut self) {
        self.slots.truncate(1);
        self.free_list.clear();
        self.index.clear();
        self.index.insert(NodeHandle::ROOT, 0);

        let version = self.bump();
        if let Some(root) = self.node_mut(NodeHandle::ROOT) {
            root.children.clear();
            root.change_version = version;
        }
        trace!(version, "clear");
    }

    // =========================================================================
    // Internals
    // =========================================================================

    pub(crate) fn node(&self, handle: NodeHandle) -> Option<&Node> {
        let slot = *self.index.get(&handle)?;
        self.slots.get(slot)?.as_ref()
    }

    fn node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        let slot = *self.index.get(&handle)?;
        self.slots.get_mut(slot)?.as_mut()
    }

    fn bump(&mut self) -> u64 {
        self.root_change_version += 1;
        self.root_change_version
    }

    fn sort_index_unchecked(&self, handle: NodeHandle) -> i32 {
        self.node(handle).map_or(0, |n| n.sort_index)
    }

    /// Stamps `version` on `from` and every ancestor up to the root.
    fn stamp_ancestors(&mut self, from: NodeHandle, version: u64) {
        let mut current = Some(from);
        while let Some(handle) = current {
            match self.node_mut(handle) {
                Some(node) => {
                    node.change_version = version;
                    current = node.parent;
                }
                None => break,
            }
        }
    }

    /// Inserts `child` after every sibling whose sort index is `<= sort_index`.
    fn insert_child_sorted(&mut self, parent: NodeHandle, child: NodeHandle, sort_index: i32) {
        let position = match self.node(parent) {
            Some(node) => node
                .children
                .partition_point(|c| self.sort_index_unchecked(*c) <= sort_index),
            None => return,
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.insert(position, child);
        }
    }

    fn detach_child(&mut self, parent: NodeHandle, child: NodeHandle) {
        if let Some(node) = self.node_mut(parent) {
            if let Some(position) = node.children.iter().position(|c| *c == child) {
                node.children.remove(position);
            }
        }
    }

    /// Adds `delta` to the depth of `from` and all of its descendants.
    fn shift_depth(&mut self, from: NodeHandle, delta: i32) {
        if delta == 0 {
            return;
        }
        let mut stack = vec![from];
        while let Some(handle) = stack.pop() {
            if let Some(node) = self.node_mut(handle) {
                node.depth += delta;
                stack.extend_from_slice(&node.children);
            }
        }
    }
}

/// Read-only view of a live node.
#[derive(Copy, Clone, Debug)]
pub struct NodeRef<'a> {
    node: &'a Node,
}

impl<'a> NodeRef<'a> {
    /// The node's handle.
    #[must_use]
    pub fn handle(&self) -> NodeHandle {
        self.node.handle
    }

    /// The node's parent, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.node.parent
    }

    /// The node's children in sort order.
    #[must_use]
    pub fn children(&self) -> &'a [NodeHandle] {
        &self.node.children
    }

    /// The node's sort index among its siblings.
    #[must_use]
    pub fn sort_index(&self) -> i32 {
        self.node.sort_index
    }

    /// The node's depth; the root is `-1`.
    #[must_use]
    pub fn depth(&self) -> i32 {
        self.node.depth
    }

    /// Version of the last structural change inside this node's subtree.
    #[must_use]
    pub fn change_version(&self) -> u64 {
        self.node.change_version
    }
}
