//! Change trackers, SubScene map, and stepped integration for Canopy.
//!
//! This crate provides:
//! - [`GameObjectChangeTracker`] / [`EntityChangeTracker`] - Collapse raw
//!   notifications into batches
//! - [`SubSceneMap`] - SubScene bookkeeping across authoring scenes and
//!   scene tags from any world
//! - [`GameObjectIntegration`] / [`EntityIntegration`] - Budgeted,
//!   resumable application of a batch to the node store

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entity_integration;
pub mod entity_tracker;
pub mod events;
pub mod game_object_integration;
pub mod game_object_tracker;
pub mod step;
pub mod sub_scene_map;

pub use entity_integration::EntityIntegration;
pub use entity_tracker::EntityChangeTracker;
pub use events::{
    EntityChanges, EntityDesc, EntityId, EntityReparent, GameObjectChange,
    GameObjectChangeTrackerEvents, GameObjectDesc, LoadedScene, SceneTag, SceneTagKey, WorldId,
};
pub use game_object_integration::GameObjectIntegration;
pub use game_object_tracker::GameObjectChangeTracker;
pub use step::{IntegrationContext, IntegrationStep, SteppedIntegration};
pub use sub_scene_map::SubSceneMap;
