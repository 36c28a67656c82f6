//! Integration tests for persistent handle collections
//!
//! Copies share structure, so edits to one never show up in another.

use canopy_foundation::{HandleMap, HandleSet, NodeHandle};

#[test]
fn set_with_leaves_original_unchanged() {
    let a = NodeHandle::sub_scene(1);
    let b = NodeHandle::sub_scene(2);
    let first = HandleSet::new().with(a);
    let second = first.with(b);

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 2);
    assert!(!first.contains(b));
    assert!(second.without(a).contains(b));
}

#[test]
fn set_collects_and_extends() {
    let mut set: HandleSet = (0..3).map(NodeHandle::game_object).collect();
    set.extend([NodeHandle::game_object(2), NodeHandle::game_object(9)]);
    assert_eq!(set.len(), 4);
}

#[test]
fn map_insert_and_clone_are_independent() {
    let handle = NodeHandle::sub_scene(3);
    let mut map = HandleMap::new();
    map.insert(handle, true);
    let snapshot = map.clone();
    map.insert(handle, false);

    assert_eq!(snapshot.get(handle), Some(&true));
    assert_eq!(map.get(handle), Some(&false));
    assert_eq!(map.with(NodeHandle::sub_scene(4), true).len(), 2);
}
