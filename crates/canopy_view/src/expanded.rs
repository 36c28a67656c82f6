//! Reducing a baked hierarchy to the rows a tree view displays.

use std::collections::HashMap;

use canopy_foundation::{NodeHandle, NodeKind};
use canopy_search::FilterMask;
use canopy_store::ImmutableHierarchy;
use tracing::debug_span;

use crate::mode::ViewState;
use crate::state::{ExpandedSet, SubSceneOpenState};

/// One displayed row.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ExpandedRow {
    /// Row in the snapshot.
    pub row: usize,
    /// The node shown.
    pub handle: NodeHandle,
    /// Depth of the node; top-level nodes are `0`.
    pub depth: i32,
}

/// The ordered rows of a tree view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpandedNodes {
    rows: Vec<ExpandedRow>,
    index: HashMap<NodeHandle, usize>,
}

impl ExpandedNodes {
    fn push(&mut self, row: ExpandedRow) {
        self.index.insert(row.handle, self.rows.len());
        self.rows.push(row);
    }

    /// Number of displayed rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if nothing is displayed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Snapshot row shown at display position `at`.
    #[must_use]
    pub fn row(&self, at: usize) -> Option<usize> {
        self.rows.get(at).map(|r| r.row)
    }

    /// Node shown at display position `at`.
    #[must_use]
    pub fn handle(&self, at: usize) -> Option<NodeHandle> {
        self.rows.get(at).map(|r| r.handle)
    }

    /// Depth of the node at display position `at`.
    #[must_use]
    pub fn depth(&self, at: usize) -> Option<i32> {
        self.rows.get(at).map(|r| r.depth)
    }

    /// Display position of a node, if shown.
    #[must_use]
    pub fn index_of(&self, handle: NodeHandle) -> Option<usize> {
        self.index.get(&handle).copied()
    }

    /// Iterates over the displayed rows in order.
    pub fn iter(&self) -> impl Iterator<Item = &ExpandedRow> + '_ {
        self.rows.iter()
    }

    /// Handles in display order.
    pub fn handles(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        self.rows.iter().map(|r| r.handle)
    }
}

/// Reduces `snapshot` to the rows to display.
///
/// A node is shown when every ancestor is expanded, it passes `mask`
/// (`None` shows everything), and, as a direct child of a SubScene, the
/// view's data mode shows its kind. A hidden node hides its subtree. The
/// root itself is never shown.
#[must_use]
pub fn build_expanded_nodes(
    snapshot: &ImmutableHierarchy,
    mask: Option<&FilterMask>,
    expanded: &ExpandedSet,
    open_state: &SubSceneOpenState,
    view: ViewState,
) -> ExpandedNodes {
    let _span = debug_span!(
        "build_expanded_nodes",
        rows = snapshot.len(),
        mode = %view.data_mode
    )
    .entered();
    let expand_all = mask.is_some() && view.expand_all_while_filtering;
    let rows = snapshot.rows();
    let mut out = ExpandedNodes::default();

    let mut at = 1;
    while let Some(baked) = rows.get(at) {
        let subtree_end = at + 1 + baked.descendant_count as usize;
        let passes_mask = mask.is_none_or(|m| m.get(at));
        let passes_kind = match baked.parent {
            Some(parent) if parent.kind == NodeKind::SubScene => view
                .data_mode
                .shows_sub_scene_child(baked.handle.kind, open_state.is_open(parent)),
            _ => true,
        };
        if !(passes_mask && passes_kind) {
            at = subtree_end;
            continue;
        }

        out.push(ExpandedRow {
            row: at,
            handle: baked.handle,
            depth: baked.depth,
        });
        at = if expand_all || expanded.contains(baked.handle) {
            at + 1
        } else {
            subtree_end
        };
    }
    out
}
