//! Integration tests for baked snapshots and double buffering

use std::sync::Arc;

use canopy_foundation::NodeHandle;
use canopy_store::{ImmutableHierarchy, NodeStore, SnapshotBuffers};

fn sample() -> NodeStore {
    let mut store = NodeStore::new();
    let scene = NodeHandle::scene(1);
    let sub = NodeHandle::sub_scene(2);
    store.add_node(scene, None).unwrap();
    store.add_node(sub, Some(scene)).unwrap();
    store
        .add_node(NodeHandle::game_object(3), Some(sub))
        .unwrap();
    store.add_node(NodeHandle::entity(4, 1), Some(sub)).unwrap();
    store.add_node(NodeHandle::entity(5, 1), None).unwrap();
    store
}

#[test]
fn rows_are_depth_first_with_subtree_ranges() {
    let store = sample();
    let mut snapshot = ImmutableHierarchy::new();
    store.export_immutable(&mut snapshot, None);

    assert_eq!(snapshot.len(), store.len());
    assert_eq!(snapshot.handle(0), Some(NodeHandle::ROOT));
    assert_eq!(snapshot.depth(0), Some(-1));

    let sub = snapshot.index_of(NodeHandle::sub_scene(2)).unwrap();
    assert_eq!(snapshot.child_count(sub), Some(2));
    assert_eq!(snapshot.subtree_range(sub), sub + 1..sub + 3);
    assert_eq!(snapshot.parent_row(sub), snapshot.index_of(NodeHandle::scene(1)));
    let children: Vec<_> = snapshot
        .children_of(sub)
        .filter_map(|row| snapshot.handle(row))
        .collect();
    assert_eq!(children, vec![NodeHandle::game_object(3), NodeHandle::entity(4, 1)]);
}

#[test]
fn baking_twice_is_identical() {
    let store = sample();
    let mut first = ImmutableHierarchy::new();
    let mut second = ImmutableHierarchy::new();
    store.export_immutable(&mut first, None);
    store.export_immutable(&mut second, None);
    assert_eq!(first.rows(), second.rows());

    let mut reused = ImmutableHierarchy::new();
    store.export_immutable(&mut reused, Some(&first));
    assert_eq!(reused.rows(), first.rows());
}

#[test]
fn incremental_bake_matches_full_bake() {
    let mut store = sample();
    let mut previous = ImmutableHierarchy::new();
    store.export_immutable(&mut previous, None);

    store
        .set_parent(NodeHandle::entity(5, 1), NodeHandle::scene(1))
        .unwrap();
    store.remove_node(NodeHandle::game_object(3)).unwrap();

    let mut incremental = ImmutableHierarchy::new();
    let mut full = ImmutableHierarchy::new();
    store.export_immutable(&mut incremental, Some(&previous));
    store.export_immutable(&mut full, None);
    assert_eq!(incremental.rows(), full.rows());
    assert!(incremental.is_current(&store));
    assert!(!previous.is_current(&store));
}

#[test]
fn buffers_swap_and_keep_old_snapshots_alive() {
    let mut store = sample();
    let mut buffers = SnapshotBuffers::new();
    let before = buffers.bake(&store);
    assert!(Arc::ptr_eq(&before, &buffers.bake(&store)));
    assert_eq!(buffers.bake_count(), 1);

    store.remove_node(NodeHandle::entity(5, 1)).unwrap();
    let after = buffers.bake(&store);
    assert!(!Arc::ptr_eq(&before, &after));
    assert!(before.contains(NodeHandle::entity(5, 1)));
    assert!(!after.contains(NodeHandle::entity(5, 1)));
    assert_eq!(buffers.bake_count(), 2);
}
