//! Mutable node forest, name table, and immutable hierarchy export for Canopy.
//!
//! This crate provides:
//! - [`NodeStore`] - Single-writer forest with versioned structural edits
//! - [`NameStore`] - Handle to display name side table
//! - [`ImmutableHierarchy`] - Depth-first baked snapshot of a store
//! - [`SnapshotBuffers`] - Double-buffered bakes shared through `Arc`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod buffers;
pub mod export;
pub mod name_store;
pub mod node_store;

pub use buffers::SnapshotBuffers;
pub use export::{BakedNode, ImmutableHierarchy};
pub use name_store::NameStore;
pub use node_store::{NodeRef, NodeStore};
