//! Evaluating a search against a baked hierarchy.
//!
//! A row matches when its display name contains every token and, if a
//! component query is set, it is an entity that satisfies the query. Every
//! ancestor of a matching row is marked as well, so a hit deep in the tree
//! keeps its whole parent chain visible. This is done in one forward pass
//! over the pre-order rows while keeping the current ancestor path.

use bitflags::bitflags;
use canopy_foundation::{Error, NodeHandle, NodeKind};
use canopy_store::{ImmutableHierarchy, NameStore};
use tracing::debug_span;

use crate::query::{ComponentQuery, ComponentTypeId, HierarchyQueryBuilder, QueryOptions};
use crate::tokenizer::SearchTokenizer;

bitflags! {
    /// Entity states a component query hides unless told otherwise.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EntityFlags: u8 {
        /// The entity is disabled.
        const DISABLED = 1;
        /// The entity is a prefab.
        const PREFAB = 1 << 1;
    }
}

impl QueryOptions {
    /// Returns true if an entity with `flags` is admitted.
    #[must_use]
    pub fn admits(self, flags: EntityFlags) -> bool {
        (!flags.contains(EntityFlags::DISABLED) || self.contains(Self::INCLUDE_DISABLED))
            && (!flags.contains(EntityFlags::PREFAB) || self.contains(Self::INCLUDE_PREFABS))
    }
}

/// Answers component questions about entities.
///
/// Implemented by whatever owns the entity data; the filter never
/// inspects components itself.
pub trait ComponentLookup {
    /// Returns true if `entity` has every component in `components`.
    fn has_components(&self, entity: NodeHandle, components: &[ComponentTypeId]) -> bool;

    /// Returns the entity's state flags.
    fn flags(&self, _entity: NodeHandle) -> EntityFlags {
        EntityFlags::empty()
    }
}

/// A lookup for hierarchies without component data.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoComponents;

impl ComponentLookup for NoComponents {
    fn has_components(&self, _entity: NodeHandle, components: &[ComponentTypeId]) -> bool {
        components.is_empty()
    }
}

/// One bit per snapshot row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterMask {
    words: Vec<u64>,
    len: usize,
}

impl FilterMask {
    /// Creates a mask of `len` cleared bits.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
            len,
        }
    }

    /// Creates a mask of `len` set bits.
    #[must_use]
    pub fn all(len: usize) -> Self {
        let mut mask = Self {
            words: vec![u64::MAX; len.div_ceil(64)],
            len,
        };
        if let Some(last) = mask.words.last_mut() {
            let used = len % 64;
            if used != 0 {
                *last = (1 << used) - 1;
            }
        }
        mask
    }

    /// Returns the bit for `row`; out of range rows read as cleared.
    #[must_use]
    pub fn get(&self, row: usize) -> bool {
        row < self.len && self.words[row / 64] & (1 << (row % 64)) != 0
    }

    /// Sets the bit for `row`. Out of range rows are ignored.
    pub fn set(&mut self, row: usize) {
        if row < self.len {
            self.words[row / 64] |= 1 << (row % 64);
        }
    }

    /// Number of rows covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the mask covers no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of set bits.
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterates over the rows whose bit is set, in order.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(|row| self.get(*row))
    }
}

/// A compiled search: name tokens plus an optional component query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HierarchyFilter {
    tokens: Vec<String>,
    query: Option<ComponentQuery>,
    error: Option<Error>,
}

impl HierarchyFilter {
    /// Compiles search text with the builder's catalog and tokenizer.
    ///
    /// Never fails; a rejected component part is kept in [`error`](Self::error)
    /// and the name tokens still apply.
    #[must_use]
    pub fn new(text: &str, builder: &mut HierarchyQueryBuilder) -> Self {
        let built = builder.build_query(text);
        Self {
            tokens: builder.tokenizer().tokenize(&built.filter),
            query: built.query,
            error: built.error,
        }
    }

    /// Builds a name-only filter from already split tokens.
    #[must_use]
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S], tokenizer: &SearchTokenizer) -> Self {
        Self {
            tokens: tokenizer.normalize(tokens),
            query: None,
            error: None,
        }
    }

    /// Returns true if the filter admits every row.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.query.is_none()
    }

    /// The normalized name tokens.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// The component query, if any.
    #[must_use]
    pub fn query(&self) -> Option<&ComponentQuery> {
        self.query.as_ref()
    }

    /// Why the component part of the search was rejected, if it was.
    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Returns true if the node itself passes the filter.
    #[must_use]
    pub fn matches(
        &self,
        handle: NodeHandle,
        names: &NameStore,
        components: &dyn ComponentLookup,
    ) -> bool {
        if let Some(query) = &self.query {
            if handle.kind != NodeKind::Entity
                || !components.has_components(handle, &query.all)
                || !query.options.admits(components.flags(handle))
            {
                return false;
            }
        }
        if self.tokens.is_empty() {
            return true;
        }
        let name = names.display_name(handle).to_lowercase();
        self.tokens
            .iter()
            .all(|token| name.contains(token.as_str()))
    }

    /// Evaluates the filter over every row of `snapshot`.
    #[must_use]
    pub fn apply(
        &self,
        snapshot: &ImmutableHierarchy,
        names: &NameStore,
        components: &dyn ComponentLookup,
    ) -> FilterMask {
        let _span = debug_span!("filter_apply", rows = snapshot.len()).entered();
        if self.is_empty() {
            return FilterMask::all(snapshot.len());
        }

        let rows = snapshot.rows();
        let mut mask = FilterMask::new(rows.len());
        let mut path: Vec<usize> = Vec::new();
        for (row, baked) in rows.iter().enumerate() {
            while let Some(&top) = path.last() {
                if rows[top].depth < baked.depth {
                    break;
                }
                path.pop();
            }
            // The root is an ancestor of everything but never a match.
            if row != 0 && self.matches(baked.handle, names, components) {
                mask.set(row);
                for ancestor in path.iter().rev() {
                    if mask.get(*ancestor) {
                        break;
                    }
                    mask.set(*ancestor);
                }
            }
            path.push(row);
        }
        mask
    }
}
