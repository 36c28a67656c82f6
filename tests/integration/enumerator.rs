//! Integration tests for budgeted, resumable integration

use canopy_foundation::NodeHandle;
use canopy_integration::{
    GameObjectChange, GameObjectChangeTracker, GameObjectChangeTrackerEvents, GameObjectDesc,
    GameObjectIntegration, IntegrationContext, IntegrationStep, LoadedScene, SteppedIntegration,
};

use crate::World;

fn renames(count: i32) -> GameObjectChangeTrackerEvents {
    GameObjectChangeTrackerEvents {
        events: (0..count)
            .map(|id| GameObjectChange::Renamed {
                instance_id: id,
                name: format!("Object {id}"),
            })
            .collect(),
        ..Default::default()
    }
}

#[test]
fn change_only_batch_skips_scene_steps() {
    let integration = GameObjectIntegration::new(renames(1), 10);
    assert_eq!(integration.current_step(), IntegrationStep::IntegrateChanges);
}

#[test]
fn thirty_events_with_budget_ten_take_three_calls() {
    let mut world = World::new();
    let mut integration = GameObjectIntegration::new(renames(30), 10);

    let calls = world.run(&mut integration);
    assert_eq!(calls, 3);
    assert!(integration.is_complete());
    assert_eq!(integration.remaining(), 0);
}

#[test]
fn complete_integration_stays_complete() {
    let mut world = World::new();
    let mut integration = GameObjectIntegration::new(renames(2), 10);
    let mut ctx =
        IntegrationContext::new(&mut world.nodes, &mut world.names, &mut world.sub_scenes);

    assert!(!integration.move_next(&mut ctx));
    assert!(!integration.move_next(&mut ctx));
    assert_eq!(integration.current_step(), IntegrationStep::Complete);
}

#[test]
fn unloads_run_before_loads_before_changes() {
    let mut world = World::new();
    let mut tracker = GameObjectChangeTracker::new();
    tracker.record_scene_loaded(
        LoadedScene::new(1, "Old").with_object(GameObjectDesc::new(10, "Lamp")),
    );
    let mut first = GameObjectIntegration::new(tracker.take_events(), 1);
    world.run(&mut first);

    tracker.record_scene_unloaded(1);
    tracker.record_scene_loaded(
        LoadedScene::new(2, "New").with_object(GameObjectDesc::new(20, "Door")),
    );
    tracker.record_renamed(20, "Gate");
    let mut second = GameObjectIntegration::new(tracker.take_events(), 1);

    let mut seen = vec![second.current_step()];
    let mut ctx =
        IntegrationContext::new(&mut world.nodes, &mut world.names, &mut world.sub_scenes);
    while second.move_next(&mut ctx) {
        seen.push(second.current_step());
    }
    assert_eq!(
        seen,
        vec![
            IntegrationStep::HandleUnloadedScenes,
            IntegrationStep::HandleLoadedScenes,
            IntegrationStep::IntegrateChanges,
        ]
    );

    assert!(!world.nodes.exists(NodeHandle::scene(1)));
    assert!(!world.nodes.exists(NodeHandle::game_object(10)));
    let renamed = world.names.display_name(NodeHandle::game_object(20));
    assert_eq!(renamed.as_str(), "Gate");
}

#[test]
fn stale_events_are_absorbed() {
    let mut world = World::new();
    let batch = GameObjectChangeTrackerEvents {
        events: vec![
            GameObjectChange::Destroyed { instance_id: 404 },
            GameObjectChange::Reparented {
                instance_id: 405,
                scene: 1,
                parent: Some(406),
            },
            GameObjectChange::SortIndexChanged {
                instance_id: 407,
                sort_index: 2,
            },
        ],
        ..Default::default()
    };
    let mut integration = GameObjectIntegration::new(batch, 1);
    assert_eq!(world.run(&mut integration), 3);
    assert!(world.nodes.is_empty());
}
