//! The live hierarchy facade for Canopy.
//!
//! This crate provides:
//! - [`Hierarchy`] - Owns the stores, trackers and in-flight integrations
//!   and turns them into displayable rows
//! - [`HierarchyConfig`] - Budgets, tokenizer and view defaults

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod hierarchy;

pub use config::HierarchyConfig;
pub use hierarchy::Hierarchy;
