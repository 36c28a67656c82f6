//! Integration tests for reducing snapshots to displayed rows

use canopy_foundation::NodeHandle;
use canopy_search::{HierarchyFilter, NoComponents, SearchTokenizer};
use canopy_store::{ImmutableHierarchy, NameStore, NodeStore};
use canopy_view::{DataMode, ExpandedSet, SubSceneOpenState, ViewState, build_expanded_nodes};

/// `Scene(1) -> SubScene(2) -> {GameObject(3), GameObject(4), Entity(5), Entity(6)}`,
/// `Entity(7)` and `Entity(8)` at the top, and `SubScene(9) -> Entity(10)`.
fn scenario() -> ImmutableHierarchy {
    let mut nodes = NodeStore::new();
    let scene = NodeHandle::scene(1);
    let sub = NodeHandle::sub_scene(2);
    nodes.add_node(scene, None).unwrap();
    nodes.add_node(sub, Some(scene)).unwrap();
    nodes
        .add_node(NodeHandle::game_object(3), Some(sub))
        .unwrap();
    nodes
        .add_node(NodeHandle::game_object(4), Some(sub))
        .unwrap();
    nodes.add_node(NodeHandle::entity(5, 1), Some(sub)).unwrap();
    nodes.add_node(NodeHandle::entity(6, 1), Some(sub)).unwrap();
    nodes.add_node(NodeHandle::entity(7, 1), None).unwrap();
    nodes.add_node(NodeHandle::entity(8, 1), None).unwrap();
    nodes.add_node(NodeHandle::sub_scene(9), None).unwrap();
    nodes
        .add_node(NodeHandle::entity(10, 1), Some(NodeHandle::sub_scene(9)))
        .unwrap();

    let mut snapshot = ImmutableHierarchy::new();
    nodes.export_immutable(&mut snapshot, None);
    snapshot
}

fn everything_expanded(snapshot: &ImmutableHierarchy) -> ExpandedSet {
    snapshot.rows().iter().map(|r| r.handle).collect()
}

#[test]
fn closed_sub_scene_in_runtime_mode() {
    let snapshot = scenario();
    let expanded = everything_expanded(&snapshot);
    let open = SubSceneOpenState::new()
        .with_open(NodeHandle::sub_scene(2), false)
        .with_open(NodeHandle::sub_scene(9), false);

    let rows = build_expanded_nodes(
        &snapshot,
        None,
        &expanded,
        &open,
        ViewState::new(DataMode::Runtime),
    );

    let indices: Vec<i32> = rows.handles().map(|h| h.index).collect();
    let depths: Vec<i32> = rows.iter().map(|r| r.depth).collect();
    assert_eq!(indices, vec![1, 2, 5, 6, 7, 8, 9, 10]);
    assert_eq!(depths, vec![0, 1, 2, 2, 0, 0, 0, 1]);
}

#[test]
fn open_sub_scene_in_mixed_mode_shows_everything() {
    let snapshot = scenario();
    let expanded = everything_expanded(&snapshot);
    let open = SubSceneOpenState::new().with_open(NodeHandle::sub_scene(2), true);

    let view = ViewState::new(DataMode::Mixed);
    let rows = build_expanded_nodes(&snapshot, None, &expanded, &open, view);
    assert_eq!(rows.len(), snapshot.len() - 1);
}

#[test]
fn open_sub_scene_in_authoring_mode_hides_entities() {
    let snapshot = scenario();
    let expanded = everything_expanded(&snapshot);
    let open = SubSceneOpenState::new().with_open(NodeHandle::sub_scene(2), true);

    let view = ViewState::new(DataMode::Authoring);
    let rows = build_expanded_nodes(&snapshot, None, &expanded, &open, view);
    let indices: Vec<i32> = rows.handles().map(|h| h.index).collect();
    assert_eq!(indices, vec![1, 2, 3, 4, 7, 8, 9, 10]);
}

#[test]
fn play_mode_only_changes_the_default_mode() {
    let snapshot = scenario();
    let expanded = everything_expanded(&snapshot);
    let open = SubSceneOpenState::new();

    let explicit = ViewState::new(DataMode::Runtime);
    let in_play = ViewState {
        is_play_mode: true,
        ..explicit
    };
    assert_eq!(
        build_expanded_nodes(&snapshot, None, &expanded, &open, explicit),
        build_expanded_nodes(&snapshot, None, &expanded, &open, in_play)
    );
    assert_eq!(ViewState::for_play_mode(true).data_mode, DataMode::Mixed);
}

#[test]
fn filtered_rows_expand_when_asked() {
    let snapshot = scenario();
    let mut names = NameStore::new();
    names.set_name(NodeHandle::entity(10, 1), "Beacon");
    let filter = HierarchyFilter::from_tokens(&["beacon"], &SearchTokenizer::default());
    let mask = filter.apply(&snapshot, &names, &NoComponents);
    let open = SubSceneOpenState::new();

    let none = ExpandedSet::new();
    let view = ViewState::default();
    let collapsed = build_expanded_nodes(&snapshot, Some(&mask), &none, &open, view);
    assert_eq!(collapsed.handles().collect::<Vec<_>>(), vec![NodeHandle::sub_scene(9)]);

    let view = ViewState::default().with_expand_all_while_filtering(true);
    let expanded = build_expanded_nodes(&snapshot, Some(&mask), &ExpandedSet::new(), &open, view);
    assert_eq!(
        expanded.handles().collect::<Vec<_>>(),
        vec![NodeHandle::sub_scene(9), NodeHandle::entity(10, 1)]
    );
    assert_eq!(expanded.index_of(NodeHandle::entity(10, 1)), Some(1));
}
