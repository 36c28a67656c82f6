//! Canopy - Live scene hierarchy core
//!
//! This crate re-exports all layers of the Canopy system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: canopy_hierarchy   - Facade: trackers, budgeted updates, rows
//! Layer 3: canopy_view        - Data modes, expansion reduction
//! Layer 2: canopy_search      - Tokenizer, component queries, filter masks
//!          canopy_integration - Change trackers, SubScene map, stepped integration
//! Layer 1: canopy_store       - Node store, name store, immutable bake
//! Layer 0: canopy_foundation  - Core types (NodeHandle, FixedName, Error)
//! ```

pub use canopy_foundation as foundation;
pub use canopy_hierarchy as hierarchy;
pub use canopy_integration as integration;
pub use canopy_search as search;
pub use canopy_store as store;
pub use canopy_view as view;
