//! Stepped integration of authoring-side batches.

use canopy_foundation::{NodeHandle, NodeKind, Result};
use canopy_store::NodeStore;
use tracing::debug;

use crate::events::{GameObjectChange, GameObjectChangeTrackerEvents, GameObjectDesc, LoadedScene};
use crate::step::{IntegrationContext, IntegrationStep, SteppedIntegration, absorb};

/// Applies one [`GameObjectChangeTrackerEvents`] batch a budget at a time.
///
/// Unloaded scenes are handled first, then loaded scenes, then per-object
/// events. Each scene and each event costs one unit of budget.
#[derive(Clone, Debug)]
pub struct GameObjectIntegration {
    batch: GameObjectChangeTrackerEvents,
    step: IntegrationStep,
    budget: usize,
    unloaded: usize,
    loaded: usize,
    changes: usize,
}

impl GameObjectIntegration {
    /// Wraps a batch. A zero budget is raised to one.
    #[must_use]
    pub fn new(batch: GameObjectChangeTrackerEvents, budget: usize) -> Self {
        let mut integration = Self {
            batch,
            step: IntegrationStep::HandleUnloadedScenes,
            budget: budget.max(1),
            unloaded: 0,
            loaded: 0,
            changes: 0,
        };
        integration.settle();
        integration
    }

    fn pending(&self) -> [usize; 3] {
        [
            self.batch.unloaded_scenes.len() - self.unloaded,
            self.batch.loaded_scenes.len() - self.loaded,
            self.batch.events.len() - self.changes,
        ]
    }

    fn settle(&mut self) {
        let next = IntegrationStep::first_pending(self.step, self.pending());
        if next != self.step {
            debug!(from = %self.step, to = %next, "game object integration step");
            self.step = next;
        }
    }
}

impl SteppedIntegration for GameObjectIntegration {
    fn current_step(&self) -> IntegrationStep {
        self.step
    }

    fn budget(&self) -> usize {
        self.budget
    }

    fn remaining(&self) -> usize {
        self.pending().iter().sum()
    }

    fn advance(&mut self, ctx: &mut IntegrationContext<'_>, budget: usize) -> bool {
        let budget = budget.max(1);
        match self.step {
            IntegrationStep::HandleUnloadedScenes => {
                let end = self
                    .unloaded
                    .saturating_add(budget)
                    .min(self.batch.unloaded_scenes.len());
                for &scene in &self.batch.unloaded_scenes[self.unloaded..end] {
                    unload_scene(ctx, scene);
                }
                self.unloaded = end;
            }
            IntegrationStep::HandleLoadedScenes => {
                let end = self
                    .loaded
                    .saturating_add(budget)
                    .min(self.batch.loaded_scenes.len());
                for scene in &self.batch.loaded_scenes[self.loaded..end] {
                    load_scene(ctx, scene);
                }
                self.loaded = end;
            }
            IntegrationStep::IntegrateChanges => {
                let end = self
                    .changes
                    .saturating_add(budget)
                    .min(self.batch.events.len());
                for event in &self.batch.events[self.changes..end] {
                    integrate_change(ctx, event);
                }
                self.changes = end;
            }
            IntegrationStep::Complete => return false,
        }
        self.settle();
        self.step != IntegrationStep::Complete
    }
}

// =============================================================================
// Scenes
// =============================================================================

fn unload_scene(ctx: &mut IntegrationContext<'_>, scene: i32) {
    if let Some(sub_scene) = ctx.sub_scenes.sub_scene_for_scene(scene) {
        for handle in authoring_descendants(ctx.nodes, sub_scene) {
            absorb(remove_object(ctx, handle), "unload object");
        }
        absorb(
            ctx.sub_scenes.clear_authoring_scene(ctx.nodes, scene),
            "close sub scene",
        );
        forget_name_if_gone(ctx, sub_scene);
        return;
    }

    let handle = NodeHandle::scene(scene);
    if !ctx.nodes.exists(handle) {
        debug!(scene, "unloaded scene is not present");
        return;
    }
    for object in authoring_descendants(ctx.nodes, handle) {
        absorb(remove_object(ctx, object), "unload object");
    }
    absorb(ctx.nodes.remove_node(handle), "unload scene");
    ctx.names.remove(handle);
}

fn load_scene(ctx: &mut IntegrationContext<'_>, scene: &LoadedScene) {
    let container = if let Some(sub_scene) = scene.sub_scene {
        let opened = ctx
            .sub_scenes
            .set_authoring_scene(ctx.nodes, scene.scene, sub_scene);
        match absorb(opened, "open sub scene") {
            Some(handle) => handle,
            None => return,
        }
    } else {
        let handle = NodeHandle::scene(scene.scene);
        if !ctx.nodes.exists(handle)
            && absorb(ctx.nodes.add_node(handle, None), "load scene").is_none()
        {
            return;
        }
        absorb(ctx.nodes.set_sort_index(handle, scene.sort_index), "sort scene");
        ctx.names.set_name(handle, &scene.name);
        handle
    };

    // Objects arrive in any order, so every node exists before any parent
    // link is made.
    for object in &scene.objects {
        add_object(ctx, object, container);
    }
    for object in &scene.objects {
        place_object(ctx, object, container);
    }
}

// =============================================================================
// Objects
// =============================================================================

fn integrate_change(ctx: &mut IntegrationContext<'_>, event: &GameObjectChange) {
    match event {
        GameObjectChange::CreatedOrChanged { scene, object } => {
            let container = scene_container(ctx, *scene);
            if !ctx.nodes.exists(container) {
                debug!(scene, instance_id = object.instance_id, "scene is not loaded");
                return;
            }
            add_object(ctx, object, container);
            place_object(ctx, object, container);
        }
        GameObjectChange::Destroyed { instance_id } => {
            match resolve_object(ctx.nodes, *instance_id) {
                Some(handle) => {
                    absorb(remove_object(ctx, handle), "destroy object");
                }
                None => debug!(instance_id, "destroyed object is not present"),
            }
        }
        GameObjectChange::Reparented {
            instance_id,
            scene,
            parent,
        } => {
            let Some(handle) = resolve_object(ctx.nodes, *instance_id) else {
                debug!(instance_id, "reparented object is not present");
                return;
            };
            let new_parent = match parent {
                Some(parent) => resolve_object(ctx.nodes, *parent),
                None => Some(scene_container(ctx, *scene)),
            };
            match new_parent {
                Some(new_parent) => {
                    absorb(ctx.nodes.set_parent(handle, new_parent), "reparent object");
                }
                None => debug!(instance_id, ?parent, "new parent is not present"),
            }
        }
        GameObjectChange::Renamed { instance_id, name } => {
            match resolve_object(ctx.nodes, *instance_id) {
                Some(handle) => ctx.names.set_name(handle, name),
                None => debug!(instance_id, "renamed object is not present"),
            }
        }
        GameObjectChange::SortIndexChanged {
            instance_id,
            sort_index,
        } => match resolve_object(ctx.nodes, *instance_id) {
            Some(handle) => {
                absorb(ctx.nodes.set_sort_index(handle, *sort_index), "sort object");
            }
            None => debug!(instance_id, "sorted object is not present"),
        },
    }
}

fn add_object(ctx: &mut IntegrationContext<'_>, object: &GameObjectDesc, container: NodeHandle) {
    if object.is_sub_scene {
        let registered = ctx
            .sub_scenes
            .register_game_object(ctx.nodes, object.instance_id, container);
        absorb(registered, "register sub scene");
    } else if !ctx.nodes.exists(object.handle()) {
        absorb(ctx.nodes.add_node(object.handle(), Some(container)), "add object");
    }
}

fn place_object(ctx: &mut IntegrationContext<'_>, object: &GameObjectDesc, container: NodeHandle) {
    let handle = object.handle();
    if !ctx.nodes.exists(handle) {
        return;
    }
    let parent = match object.parent {
        Some(id) => resolve_object(ctx.nodes, id).unwrap_or_else(|| {
            debug!(instance_id = object.instance_id, parent = id, "parent is not present");
            container
        }),
        None => container,
    };
    absorb(ctx.nodes.set_parent(handle, parent), "place object");
    absorb(ctx.nodes.set_sort_index(handle, object.sort_index), "sort object");
    ctx.names.set_name(handle, &object.name);
}

fn remove_object(ctx: &mut IntegrationContext<'_>, handle: NodeHandle) -> Result<()> {
    let result = if handle.kind == NodeKind::SubScene {
        ctx.sub_scenes.release_game_object(ctx.nodes, handle.index)
    } else {
        ctx.nodes.remove_node(handle)
    };
    forget_name_if_gone(ctx, handle);
    result
}

fn forget_name_if_gone(ctx: &mut IntegrationContext<'_>, handle: NodeHandle) {
    if !ctx.nodes.exists(handle) {
        ctx.names.remove(handle);
    }
}

/// The node a scene's root objects hang under.
fn scene_container(ctx: &IntegrationContext<'_>, scene: i32) -> NodeHandle {
    ctx.sub_scenes
        .sub_scene_for_scene(scene)
        .unwrap_or(NodeHandle::scene(scene))
}

/// Finds the node mirroring an authoring object, plain or SubScene.
fn resolve_object(nodes: &NodeStore, instance_id: i32) -> Option<NodeHandle> {
    [
        NodeHandle::game_object(instance_id),
        NodeHandle::sub_scene(instance_id),
    ]
    .into_iter()
    .find(|handle| nodes.exists(*handle))
}

/// Authoring objects below `root` in post-order.
///
/// Does not descend into nested SubScenes or entities; those belong to
/// other scenes and worlds.
fn authoring_descendants(nodes: &NodeStore, root: NodeHandle) -> Vec<NodeHandle> {
    let mut out = Vec::new();
    let mut stack: Vec<(NodeHandle, bool)> = nodes
        .get_children(root)
        .map(|children| children.iter().rev().map(|c| (*c, false)).collect())
        .unwrap_or_default();
    while let Some((handle, visited)) = stack.pop() {
        match handle.kind {
            NodeKind::SubScene => out.push(handle),
            NodeKind::GameObject if visited => out.push(handle),
            NodeKind::GameObject => {
                stack.push((handle, true));
                if let Ok(children) = nodes.get_children(handle) {
                    stack.extend(children.iter().rev().map(|c| (*c, false)));
                }
            }
            NodeKind::Root | NodeKind::Scene | NodeKind::Entity => {}
        }
    }
    out
}
