//! Integration tests for change trackers feeding integrations

use canopy_foundation::NodeHandle;
use canopy_integration::{
    EntityChangeTracker, EntityDesc, EntityId, EntityIntegration, GameObjectChange,
    GameObjectChangeTracker, GameObjectDesc, GameObjectIntegration, LoadedScene, WorldId,
};

use crate::World;

#[test]
fn created_then_destroyed_game_object_leaves_no_trace() {
    let mut tracker = GameObjectChangeTracker::new();
    tracker.record_created(1, GameObjectDesc::new(10, "Spark"));
    tracker.record_renamed(10, "Ember");
    tracker.record_destroyed(10);

    let batch = tracker.take_events();
    assert!(batch.is_empty());
    assert!(tracker.is_empty());
}

#[test]
fn unloading_a_pending_scene_drops_its_events() {
    let mut tracker = GameObjectChangeTracker::new();
    tracker.record_scene_loaded(LoadedScene::new(1, "Level"));
    tracker.record_created(1, GameObjectDesc::new(10, "Spark"));
    tracker.record_scene_unloaded(1);

    let batch = tracker.take_events();
    assert!(batch.loaded_scenes.is_empty());
    assert_eq!(batch.unloaded_scenes, vec![1]);
    let created = batch
        .events
        .iter()
        .any(|e| matches!(e, GameObjectChange::CreatedOrChanged { .. }));
    assert!(!created);
}

#[test]
fn game_object_edits_reach_the_store() {
    let mut world = World::new();
    let mut tracker = GameObjectChangeTracker::new();
    tracker.record_scene_loaded(
        LoadedScene::new(1, "Level")
            .with_object(GameObjectDesc::new(10, "A"))
            .with_object(GameObjectDesc::new(11, "B")),
    );
    world.run(&mut GameObjectIntegration::new(tracker.take_events(), 4));

    tracker.record_reparented(11, 1, Some(10));
    tracker.record_sort_index_changed(10, 3);
    tracker.record_created(1, GameObjectDesc::new(12, "C").with_parent(11));
    world.run(&mut GameObjectIntegration::new(tracker.take_events(), 4));

    let go = NodeHandle::game_object;
    assert_eq!(world.nodes.parent_of(go(11)).unwrap(), Some(go(10)));
    assert_eq!(world.nodes.parent_of(go(12)).unwrap(), Some(go(11)));
    assert_eq!(world.nodes.sort_index_of(go(10)).unwrap(), 3);

    tracker.record_destroyed(10);
    world.run(&mut GameObjectIntegration::new(tracker.take_events(), 4));
    assert!(!world.nodes.exists(go(10)));
    assert_eq!(world.nodes.parent_of(go(11)).unwrap(), Some(NodeHandle::scene(1)));
}

#[test]
fn recreated_then_destroyed_game_object_is_removed() {
    let mut world = World::new();
    let mut tracker = GameObjectChangeTracker::new();
    tracker.record_scene_loaded(
        LoadedScene::new(1, "Level").with_object(GameObjectDesc::new(5, "A")),
    );
    world.run(&mut GameObjectIntegration::new(tracker.take_events(), 4));
    assert!(world.nodes.exists(NodeHandle::game_object(5)));

    tracker.record_destroyed(5);
    tracker.record_created(1, GameObjectDesc::new(5, "B"));
    tracker.record_destroyed(5);
    world.run(&mut GameObjectIntegration::new(tracker.take_events(), 4));

    assert!(!world.nodes.exists(NodeHandle::game_object(5)));
}

#[test]
fn entity_create_destroy_pair_cancels() {
    let mut tracker = EntityChangeTracker::new(WorldId(4));
    let entity = EntityId::new(1, 1);
    tracker.record_created(EntityDesc::new(entity));
    tracker.record_reparented(entity, Some(EntityId::new(2, 1)));
    tracker.record_destroyed(entity);

    let changes = tracker.take_changes();
    assert!(changes.is_empty());
    assert_eq!(changes.world, WorldId(4));
}

#[test]
fn entity_reparent_and_destroy_reach_the_store() {
    let mut world = World::new();
    let mut tracker = EntityChangeTracker::new(WorldId(1));
    let (a, b) = (EntityId::new(1, 1), EntityId::new(2, 1));
    tracker.record_created(EntityDesc::new(a));
    tracker.record_created(EntityDesc::new(b));
    world.run(&mut EntityIntegration::new(tracker.take_changes(), 1));

    tracker.record_reparented(b, Some(a));
    world.run(&mut EntityIntegration::new(tracker.take_changes(), 1));
    assert_eq!(world.nodes.parent_of(b.handle()).unwrap(), Some(a.handle()));

    tracker.record_reparented(b, None);
    tracker.record_destroyed(a);
    world.run(&mut EntityIntegration::new(tracker.take_changes(), 1));
    assert!(!world.nodes.exists(a.handle()));
    assert_eq!(world.nodes.parent_of(b.handle()).unwrap(), Some(NodeHandle::ROOT));
}
