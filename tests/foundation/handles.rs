//! Integration tests for node handles

use canopy_foundation::{NodeHandle, NodeKind};
use std::collections::HashSet;

#[test]
fn root_is_the_only_root() {
    assert!(NodeHandle::ROOT.is_root());
    assert_eq!(NodeHandle::ROOT.kind, NodeKind::Root);
    for handle in [
        NodeHandle::scene(0),
        NodeHandle::sub_scene(0),
        NodeHandle::game_object(0),
        NodeHandle::entity(0, 0),
    ] {
        assert!(!handle.is_root());
    }
}

#[test]
fn equality_uses_kind_index_and_version() {
    assert_eq!(NodeHandle::entity(5, 1), NodeHandle::entity(5, 1));
    assert_ne!(NodeHandle::entity(5, 1), NodeHandle::entity(5, 2));
    assert_ne!(NodeHandle::scene(5), NodeHandle::sub_scene(5));
    assert_ne!(NodeHandle::game_object(5), NodeHandle::scene(5));
}

#[test]
fn handles_hash_by_identity() {
    let set: HashSet<_> = [
        NodeHandle::entity(1, 1),
        NodeHandle::entity(1, 1),
        NodeHandle::entity(1, 2),
    ]
    .into_iter()
    .collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn display_names_kind_and_index() {
    assert_eq!(NodeHandle::ROOT.to_string(), "Root");
    assert_eq!(NodeHandle::scene(3).to_string(), "Scene(3)");
    assert_eq!(NodeHandle::sub_scene(2).to_string(), "SubScene(2)");
    assert_eq!(NodeHandle::game_object(7).to_string(), "GameObject(7)");
    assert_eq!(NodeHandle::entity(5, 1).to_string(), "Entity(5:1)");
}
