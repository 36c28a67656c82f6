//! Immutable export ("bake") of a node store.
//!
//! The bake flattens the live forest into one contiguous, depth-first
//! pre-order array. Row 0 is always the root, and the subtree of row `i`
//! is exactly the `descendant_count` rows that follow it, so child ranges
//! are found by skipping without any pointers.
//!
//! A previous snapshot of the same store is used as a cache: a subtree
//! whose root carries the same change version as before is copied as one
//! block. The result is always identical to a full walk.

use std::collections::HashMap;
use std::ops::Range;

use canopy_foundation::NodeHandle;
use tracing::debug_span;

use crate::node_store::NodeStore;

/// One row of a baked hierarchy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BakedNode {
    /// The node's handle.
    pub handle: NodeHandle,
    /// The node's parent, `None` for the root.
    pub parent: Option<NodeHandle>,
    /// Depth; the root is `-1`.
    pub depth: i32,
    /// Number of direct children.
    pub child_count: u32,
    /// Number of rows in the subtree below this one.
    pub descendant_count: u32,
    /// Subtree change version at bake time.
    pub change_version: u64,
}

/// An immutable, depth-first snapshot of a [`NodeStore`].
///
/// Once baked it is never written again, so it can be shared across
/// threads behind an `Arc` and read without synchronization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImmutableHierarchy {
    rows: Vec<BakedNode>,
    index: HashMap<NodeHandle, usize>,
    store_id: u64,
    change_version: u64,
}

impl ImmutableHierarchy {
    /// Creates an empty buffer, ready to be baked into.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if nothing was baked into this buffer yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns all rows in depth-first order.
    #[must_use]
    pub fn rows(&self) -> &[BakedNode] {
        &self.rows
    }

    /// Returns a row by index.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&BakedNode> {
        self.rows.get(row)
    }

    /// Returns the handle at a row.
    #[must_use]
    pub fn handle(&self, row: usize) -> Option<NodeHandle> {
        self.rows.get(row).map(|r| r.handle)
    }

    /// Returns the depth at a row.
    #[must_use]
    pub fn depth(&self, row: usize) -> Option<i32> {
        self.rows.get(row).map(|r| r.depth)
    }

    /// Returns the child count at a row.
    #[must_use]
    pub fn child_count(&self, row: usize) -> Option<u32> {
        self.rows.get(row).map(|r| r.child_count)
    }

    /// Returns the row of a handle.
    #[must_use]
    pub fn index_of(&self, handle: NodeHandle) -> Option<usize> {
        self.index.get(&handle).copied()
    }

    /// Returns true if the handle was present at bake time.
    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.index.contains_key(&handle)
    }

    /// Returns the rows below `row` (its whole subtree, excluding itself).
    #[must_use]
    pub fn subtree_range(&self, row: usize) -> Range<usize> {
        match self.rows.get(row) {
            Some(r) => row + 1..row + 1 + r.descendant_count as usize,
            None => row..row,
        }
    }

    /// Iterates over the rows of the direct children of `row`.
    pub fn children_of(&self, row: usize) -> impl Iterator<Item = usize> + '_ {
        let range = self.subtree_range(row);
        let end = range.end;
        std::iter::successors(Some(range.start).filter(|r| *r < end), move |r| {
            let next = r + 1 + self.rows[*r].descendant_count as usize;
            (next < end).then_some(next)
        })
    }

    /// Returns the row of the parent of `row`.
    #[must_use]
    pub fn parent_row(&self, row: usize) -> Option<usize> {
        self.rows.get(row)?.parent.and_then(|p| self.index_of(p))
    }

    /// Returns the identity of the store this was baked from.
    #[must_use]
    pub fn store_id(&self) -> u64 {
        self.store_id
    }

    /// Returns the store change version this was baked at.
    #[must_use]
    pub fn change_version(&self) -> u64 {
        self.change_version
    }

    /// Returns true if this snapshot reflects the current state of `store`.
    #[must_use]
    pub fn is_current(&self, store: &NodeStore) -> bool {
        !self.rows.is_empty()
            && self.store_id == store.store_id()
            && self.change_version == store.root_change_version()
    }

    fn reset(&mut self, store_id: u64, change_version: u64) {
        self.rows.clear();
        self.index.clear();
        self.store_id = store_id;
        self.change_version = change_version;
    }

    fn push(&mut self, row: BakedNode) -> usize {
        let at = self.rows.len();
        self.index.insert(row.handle, at);
        self.rows.push(row);
        at
    }
}

enum Visit {
    Enter(NodeHandle),
    Exit(usize),
}

impl NodeStore {
    /// Bakes the current forest into `target`.
    ///
    /// `previous`, when it was baked from this same store, lets unchanged
    /// subtrees be copied instead of walked. It never changes the result.
    pub fn export_immutable(
        &self,
        target: &mut ImmutableHierarchy,
        previous: Option<&ImmutableHierarchy>,
    ) {
        let _span = debug_span!("export_immutable", nodes = self.len()).entered();
        let previous = previous.filter(|p| p.store_id == self.store_id() && !p.is_empty());

        if let Some(prev) = previous {
            if prev.change_version == self.root_change_version() {
                target.clone_from(prev);
                return;
            }
        }

        target.reset(self.store_id(), self.root_change_version());
        target.rows.reserve(self.len());

        let mut stack = vec![Visit::Enter(NodeHandle::ROOT)];
        while let Some(visit) = stack.pop() {
            let handle = match visit {
                Visit::Enter(handle) => handle,
                Visit::Exit(row) => {
                    let below = target.rows.len() - row - 1;
                    target.rows[row].descendant_count = u32::try_from(below).unwrap_or(u32::MAX);
                    continue;
                }
            };
            let Some(node) = self.node(handle) else {
                continue;
            };

            if let Some(block) =
                previous.and_then(|p| reusable_block(p, handle, node.change_version))
            {
                let delta = node.depth - block[0].depth;
                for (i, row) in block.iter().enumerate() {
                    let mut row = *row;
                    row.depth += delta;
                    if i == 0 {
                        row.parent = node.parent;
                    }
                    target.push(row);
                }
                continue;
            }

            let row = target.push(BakedNode {
                handle,
                parent: node.parent,
                depth: node.depth,
                child_count: u32::try_from(node.children.len()).unwrap_or(u32::MAX),
                descendant_count: 0,
                change_version: node.change_version,
            });
            stack.push(Visit::Exit(row));
            stack.extend(node.children.iter().rev().map(|c| Visit::Enter(*c)));
        }
    }
}

/// Returns the previous rows of `handle`'s subtree if it is unchanged.
fn reusable_block(
    previous: &ImmutableHierarchy,
    handle: NodeHandle,
    change_version: u64,
) -> Option<&[BakedNode]> {
    let row = previous.index_of(handle)?;
    let baked = previous.rows.get(row)?;
    if baked.change_version != change_version {
        return None;
    }
    previous.rows.get(row..=row + baked.descendant_count as usize)
}
