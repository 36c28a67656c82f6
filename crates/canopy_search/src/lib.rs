//! Search and filtering over baked hierarchies for Canopy.
//!
//! This crate provides:
//! - [`SearchTokenizer`] - Splits and normalizes free-text search input
//! - [`HierarchyQueryBuilder`] - Resolves `c=Type` tokens into a [`ComponentQuery`]
//! - [`HierarchyFilter`] - Evaluates tokens and queries into a [`FilterMask`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod filter;
pub mod query;
pub mod tokenizer;

pub use filter::{ComponentLookup, EntityFlags, FilterMask, HierarchyFilter, NoComponents};
pub use query::{
    ComponentCatalog, ComponentQuery, ComponentTypeId, HierarchyQueryBuilder,
    QUERY_CACHE_CAPACITY, QueryBuildResult, QueryOptions,
};
pub use tokenizer::{SearchTokenizer, TokenDedup, TokenOrder, TokenizerOptions};
