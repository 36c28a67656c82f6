//! Stepped integration of entity-side batches.
//!
//! The scene steps fold destroyed and created scene tags into the
//! [`SubSceneMap`](crate::SubSceneMap). The change step then applies
//! destroyed entities, created entities and parent changes, in that order.
//! A created entity whose parent does not exist yet is placed under its
//! scene and its parent link is retried after every other change.

use canopy_foundation::NodeHandle;
use tracing::debug;

use crate::events::{EntityChanges, EntityDesc, EntityId, EntityReparent, SceneTagKey};
use crate::step::{IntegrationContext, IntegrationStep, SteppedIntegration, absorb};
use crate::sub_scene_map::nearest_sub_scene;

/// Applies one [`EntityChanges`] batch a budget at a time.
#[derive(Clone, Debug)]
pub struct EntityIntegration {
    batch: EntityChanges,
    step: IntegrationStep,
    budget: usize,
    destroyed_tags: usize,
    created_tags: usize,
    destroyed: usize,
    created: usize,
    reparented: usize,
}

impl EntityIntegration {
    /// Wraps a batch. A zero budget is raised to one.
    #[must_use]
    pub fn new(batch: EntityChanges, budget: usize) -> Self {
        let mut integration = Self {
            batch,
            step: IntegrationStep::HandleUnloadedScenes,
            budget: budget.max(1),
            destroyed_tags: 0,
            created_tags: 0,
            destroyed: 0,
            created: 0,
            reparented: 0,
        };
        integration.settle();
        integration
    }

    fn pending(&self) -> [usize; 3] {
        let batch = &self.batch;
        [
            batch.destroyed_scene_tags.len() - self.destroyed_tags,
            batch.created_scene_tags.len() - self.created_tags,
            (batch.destroyed_entities.len() - self.destroyed)
                + (batch.created_entities.len() - self.created)
                + (batch.reparented_entities.len() - self.reparented),
        ]
    }

    fn settle(&mut self) {
        let next = IntegrationStep::first_pending(self.step, self.pending());
        if next != self.step {
            debug!(
                world = ?self.batch.world,
                from = %self.step,
                to = %next,
                "entity integration step"
            );
            self.step = next;
        }
    }

    /// Applies the next entity change. Returns false when none is left.
    fn integrate_next_change(&mut self, ctx: &mut IntegrationContext<'_>) -> bool {
        if let Some(entity) = self.batch.destroyed_entities.get(self.destroyed).copied() {
            self.destroyed += 1;
            destroy_entity(ctx, entity);
        } else if let Some(desc) = self.batch.created_entities.get(self.created).cloned() {
            self.created += 1;
            if let Some(deferred) = self.create_entity(ctx, &desc) {
                self.batch.reparented_entities.push(deferred);
            }
        } else if let Some(reparent) =
            self.batch.reparented_entities.get(self.reparented).copied()
        {
            self.reparented += 1;
            reparent_entity(ctx, reparent);
        } else {
            return false;
        }
        true
    }

    /// Adds a created entity. Returns the parent link to retry later when
    /// the parent is not present yet.
    fn create_entity(
        &self,
        ctx: &mut IntegrationContext<'_>,
        desc: &EntityDesc,
    ) -> Option<EntityReparent> {
        let handle = desc.entity.handle();
        if ctx.nodes.exists(handle) {
            debug!(entity = ?desc.entity, "created entity is already present");
            return None;
        }
        let container = desc
            .scene_entity
            .and_then(|scene_entity| {
                ctx.sub_scenes.sub_scene_for_tag(SceneTagKey {
                    world: self.batch.world,
                    scene_entity,
                })
            })
            .unwrap_or(NodeHandle::ROOT);
        absorb(ctx.nodes.add_node(handle, Some(container)), "create entity")?;
        if let Some(name) = &desc.name {
            ctx.names.set_name(handle, name);
        }

        let parent = desc.parent?;
        if ctx.nodes.exists(parent.handle()) {
            absorb(ctx.nodes.set_parent(handle, parent.handle()), "parent entity");
            None
        } else {
            Some(EntityReparent {
                entity: desc.entity,
                parent: Some(parent),
            })
        }
    }
}

impl SteppedIntegration for EntityIntegration {
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
                    .destroyed_tags
                    .saturating_add(budget)
                    .min(self.batch.destroyed_scene_tags.len());
                for tag in &self.batch.destroyed_scene_tags[self.destroyed_tags..end] {
                    absorb(
                        ctx.sub_scenes.integrate_destroyed_tag(ctx.nodes, tag),
                        "destroy scene tag",
                    );
                }
                self.destroyed_tags = end;
            }
            IntegrationStep::HandleLoadedScenes => {
                let end = self
                    .created_tags
                    .saturating_add(budget)
                    .min(self.batch.created_scene_tags.len());
                for tag in &self.batch.created_scene_tags[self.created_tags..end] {
                    absorb(
                        ctx.sub_scenes.integrate_created_tag(ctx.nodes, tag),
                        "create scene tag",
                    );
                }
                self.created_tags = end;
            }
            IntegrationStep::IntegrateChanges => {
                for _ in 0..budget {
                    if !self.integrate_next_change(ctx) {
                        break;
                    }
                }
            }
            IntegrationStep::Complete => return false,
        }
        self.settle();
        self.step != IntegrationStep::Complete
    }
}

fn destroy_entity(ctx: &mut IntegrationContext<'_>, entity: EntityId) {
    let handle = entity.handle();
    if absorb(ctx.nodes.remove_node(handle), "destroy entity").is_some() {
        ctx.names.remove(handle);
    }
}

fn reparent_entity(ctx: &mut IntegrationContext<'_>, reparent: EntityReparent) {
    let handle = reparent.entity.handle();
    if !ctx.nodes.exists(handle) {
        debug!(entity = ?reparent.entity, "reparented entity is not present");
        return;
    }
    let new_parent = match reparent.parent {
        Some(parent) if ctx.nodes.exists(parent.handle()) => parent.handle(),
        Some(parent) => {
            debug!(entity = ?reparent.entity, ?parent, "new parent is not present");
            return;
        }
        None => nearest_sub_scene(ctx.nodes, handle).unwrap_or(NodeHandle::ROOT),
    };
    absorb(ctx.nodes.set_parent(handle, new_parent), "reparent entity");
}
