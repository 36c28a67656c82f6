//! Expansion and visibility reduction for Canopy.
//!
//! This crate provides:
//! - [`DataMode`] / [`ViewState`] - What kind of children SubScenes show
//! - [`ExpandedSet`] / [`SubSceneOpenState`] - UI-owned persistent state
//! - [`build_expanded_nodes`] - Reduces a snapshot to the rows to display

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod expanded;
pub mod mode;
pub mod state;

pub use expanded::{ExpandedNodes, ExpandedRow, build_expanded_nodes};
pub use mode::{DataMode, ViewState};
pub use state::{ExpandedSet, SubSceneOpenState};
