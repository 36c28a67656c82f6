//! Core types for Canopy.
//!
//! This crate provides:
//! - [`NodeHandle`] / [`NodeKind`] - Stable identities for hierarchy nodes
//! - [`FixedName`] - Fixed-capacity inline display names
//! - [`Error`] - Error types with operation context
//! - Persistent handle collections ([`HandleSet`], [`HandleMap`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod error;
pub mod handle;
pub mod name;

pub use collections::{HandleMap, HandleSet};
pub use error::{Error, ErrorContext, ErrorKind, QueryErrorReason, Result};
pub use handle::{NodeHandle, NodeKind};
pub use name::{FixedName, NAME_CAPACITY, truncate_to_capacity};
