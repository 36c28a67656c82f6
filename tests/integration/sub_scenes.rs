//! Integration tests for SubScene bookkeeping across both sides

use canopy_foundation::NodeHandle;
use canopy_integration::{
    EntityChangeTracker, EntityDesc, EntityId, EntityIntegration, GameObjectChangeTracker,
    GameObjectDesc, GameObjectIntegration, LoadedScene, SceneTag, SceneTagKey, WorldId,
};

use crate::World;

fn tag(world: u32, scene_entity: i32, sub_scene: i32) -> SceneTag {
    SceneTag {
        world: WorldId(world),
        scene_entity: EntityId::new(scene_entity, 1),
        sub_scene,
    }
}

fn load_level(world: &mut World) {
    let mut tracker = GameObjectChangeTracker::new();
    tracker.record_scene_loaded(
        LoadedScene::new(1, "Level")
            .with_object(GameObjectDesc::new(2, "Town").sub_scene())
            .with_object(GameObjectDesc::new(3, "Sun")),
    );
    let mut integration = GameObjectIntegration::new(tracker.take_events(), 8);
    world.run(&mut integration);
}

#[test]
fn authoring_scene_opens_the_sub_scene() {
    let mut world = World::new();
    load_level(&mut world);
    let sub = NodeHandle::sub_scene(2);
    assert_eq!(world.nodes.parent_of(sub).unwrap(), Some(NodeHandle::scene(1)));
    assert!(!world.sub_scenes.is_open(2));

    let mut tracker = GameObjectChangeTracker::new();
    tracker.record_scene_loaded(
        LoadedScene::new(5, "Town")
            .authoring_for(2)
            .with_object(GameObjectDesc::new(50, "Well")),
    );
    world.run(&mut GameObjectIntegration::new(tracker.take_events(), 8));

    assert!(world.sub_scenes.is_open(2));
    assert_eq!(world.sub_scenes.sub_scene_for_scene(5), Some(sub));
    assert_eq!(world.nodes.parent_of(NodeHandle::game_object(50)).unwrap(), Some(sub));

    tracker.record_scene_unloaded(5);
    world.run(&mut GameObjectIntegration::new(tracker.take_events(), 8));
    assert!(!world.sub_scenes.is_open(2));
    assert!(!world.nodes.exists(NodeHandle::game_object(50)));
    assert!(world.nodes.exists(sub));
}

#[test]
fn cross_world_tags_are_independent() {
    let mut world = World::new();
    let (a, b) = (tag(1, 10, 2), tag(2, 10, 2));
    world.sub_scenes.integrate_changes(&mut world.nodes, &[a, b], &[]);
    assert_eq!(world.sub_scenes.sub_scene_for_tag(a.key()), Some(NodeHandle::sub_scene(2)));
    assert_eq!(world.sub_scenes.sub_scene_for_tag(b.key()), Some(NodeHandle::sub_scene(2)));

    world.sub_scenes.integrate_changes(&mut world.nodes, &[], &[a]);
    assert_eq!(world.sub_scenes.sub_scene_for_tag(a.key()), None);
    assert!(world.nodes.exists(NodeHandle::sub_scene(2)));

    world.sub_scenes.integrate_changes(&mut world.nodes, &[], &[b]);
    assert!(!world.nodes.exists(NodeHandle::sub_scene(2)));
    assert!(world.sub_scenes.is_empty());
}

#[test]
fn destroying_an_unknown_tag_is_harmless() {
    let mut world = World::new();
    world
        .sub_scenes
        .integrate_changes(&mut world.nodes, &[], &[tag(3, 1, 9)]);
    assert!(world.sub_scenes.is_empty());
    assert!(world.nodes.is_empty());
}

#[test]
fn entities_follow_their_scene_tag() {
    let mut world = World::new();
    load_level(&mut world);

    let mut tracker = EntityChangeTracker::new(WorldId(1));
    let scene_entity = EntityId::new(10, 1);
    tracker.record_scene_tag_created(tag(1, 10, 2));
    tracker.record_created(
        EntityDesc::new(EntityId::new(20, 1))
            .in_scene(scene_entity)
            .with_name("Guard"),
    );
    tracker.record_created(
        EntityDesc::new(EntityId::new(21, 1))
            .in_scene(scene_entity)
            .with_parent(EntityId::new(20, 1)),
    );
    tracker.record_created(EntityDesc::new(EntityId::new(30, 1)));
    world.run(&mut EntityIntegration::new(tracker.take_changes(), 2));

    let sub = NodeHandle::sub_scene(2);
    assert_eq!(world.nodes.parent_of(NodeHandle::entity(20, 1)).unwrap(), Some(sub));
    assert_eq!(
        world.nodes.parent_of(NodeHandle::entity(21, 1)).unwrap(),
        Some(NodeHandle::entity(20, 1))
    );
    assert_eq!(world.nodes.parent_of(NodeHandle::entity(30, 1)).unwrap(), Some(NodeHandle::ROOT));
    assert_eq!(world.names.display_name(NodeHandle::entity(20, 1)).as_str(), "Guard");
    assert_eq!(
        world.sub_scenes.sub_scene_for_tag(SceneTagKey {
            world: WorldId(1),
            scene_entity,
        }),
        Some(sub)
    );
}
