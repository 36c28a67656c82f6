//! Integration tests for filter masks over baked hierarchies

use std::collections::HashSet;

use canopy_foundation::NodeHandle;
use canopy_search::{
    ComponentLookup, ComponentTypeId, EntityFlags, HierarchyFilter, HierarchyQueryBuilder,
    NoComponents, SearchTokenizer,
};
use canopy_store::{ImmutableHierarchy, NameStore, NodeStore};

struct Fixture {
    nodes: NodeStore,
    names: NameStore,
    snapshot: ImmutableHierarchy,
}

/// `Scene(1) -> SubScene(2) -> GameObject(3) -> GameObject(4)`, with
/// `GameObject(5)` beside `GameObject(3)` and `Entity(6)` at the top.
fn fixture() -> Fixture {
    let mut nodes = NodeStore::new();
    let mut names = NameStore::new();
    let tree = [
        (NodeHandle::scene(1), None, "Level"),
        (NodeHandle::sub_scene(2), Some(NodeHandle::scene(1)), "Town"),
        (NodeHandle::game_object(3), Some(NodeHandle::sub_scene(2)), "Market"),
        (NodeHandle::game_object(4), Some(NodeHandle::game_object(3)), "Lantern"),
        (NodeHandle::game_object(5), Some(NodeHandle::sub_scene(2)), "Well"),
        (NodeHandle::entity(6, 1), None, "Lantern Light"),
    ];
    for (handle, parent, name) in tree {
        nodes.add_node(handle, parent).unwrap();
        names.set_name(handle, name);
    }
    let mut snapshot = ImmutableHierarchy::new();
    nodes.export_immutable(&mut snapshot, None);
    Fixture {
        nodes,
        names,
        snapshot,
    }
}

fn visible(
    fx: &Fixture,
    filter: &HierarchyFilter,
    lookup: &dyn ComponentLookup,
) -> Vec<NodeHandle> {
    filter
        .apply(&fx.snapshot, &fx.names, lookup)
        .iter_ones()
        .filter_map(|row| fx.snapshot.handle(row))
        .filter(|h| !h.is_root())
        .collect()
}

#[test]
fn deep_match_keeps_ancestor_chain() {
    let fx = fixture();
    let filter = HierarchyFilter::from_tokens(&["lantern"], &SearchTokenizer::default());
    let shown = visible(&fx, &filter, &NoComponents);

    assert_eq!(
        shown,
        vec![
            NodeHandle::scene(1),
            NodeHandle::sub_scene(2),
            NodeHandle::game_object(3),
            NodeHandle::game_object(4),
            NodeHandle::entity(6, 1),
        ]
    );
    assert!(!shown.contains(&NodeHandle::game_object(5)));
    assert_eq!(fx.snapshot.len(), fx.nodes.len());
}

#[test]
fn every_token_must_match() {
    let fx = fixture();
    let filter = HierarchyFilter::from_tokens(&["LIGHT", "lantern"], &SearchTokenizer::default());
    assert_eq!(visible(&fx, &filter, &NoComponents), vec![NodeHandle::entity(6, 1)]);
}

#[test]
fn empty_filter_admits_every_row() {
    let fx = fixture();
    let filter = HierarchyFilter::default();
    assert!(filter.is_empty());
    let mask = filter.apply(&fx.snapshot, &fx.names, &NoComponents);
    assert_eq!(mask.count_ones(), fx.snapshot.len());
}

struct Components {
    health: HashSet<NodeHandle>,
    disabled: HashSet<NodeHandle>,
    id: ComponentTypeId,
}

impl ComponentLookup for Components {
    fn has_components(&self, entity: NodeHandle, components: &[ComponentTypeId]) -> bool {
        components
            .iter()
            .all(|c| *c == self.id && self.health.contains(&entity))
    }

    fn flags(&self, entity: NodeHandle) -> EntityFlags {
        if self.disabled.contains(&entity) {
            EntityFlags::DISABLED
        } else {
            EntityFlags::empty()
        }
    }
}

#[test]
fn component_query_matches_entities_only() {
    let fx = fixture();
    let mut builder = HierarchyQueryBuilder::new(["Health"].into_iter().collect());
    let filter = HierarchyFilter::new("c=Health", &mut builder);
    let id = builder.catalog().resolve("health").unwrap();
    let entity = NodeHandle::entity(6, 1);

    let lookup = Components {
        health: [entity, NodeHandle::game_object(4)].into_iter().collect(),
        disabled: [entity].into_iter().collect(),
        id,
    };
    assert_eq!(visible(&fx, &filter, &lookup), vec![entity]);

    let without = Components {
        health: HashSet::new(),
        disabled: HashSet::new(),
        id,
    };
    assert!(visible(&fx, &filter, &without).is_empty());
}

#[test]
fn rejected_query_still_filters_by_name() {
    let fx = fixture();
    let mut builder = HierarchyQueryBuilder::new(["Health"].into_iter().collect());
    let filter = HierarchyFilter::new("well c=Mana", &mut builder);
    assert!(filter.error().is_some());
    assert!(filter.query().is_none());
    assert_eq!(
        visible(&fx, &filter, &NoComponents),
        vec![NodeHandle::scene(1), NodeHandle::sub_scene(2), NodeHandle::game_object(5)]
    );
}
