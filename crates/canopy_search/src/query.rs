//! Component queries built from `c=Type` search tokens.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use bitflags::bitflags;
use canopy_foundation::{Error, QueryErrorReason};

use crate::tokenizer::{SearchTokenizer, TokenizerOptions, is_component_token};

/// Identifies a component type known to a [`ComponentCatalog`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentTypeId(pub u32);

/// The set of component types a search may refer to.
///
/// Lookups are case-insensitive.
#[derive(Clone, Debug, Default)]
pub struct ComponentCatalog {
    names: Vec<String>,
    by_name: HashMap<String, ComponentTypeId>,
}

impl ComponentCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type, returning its id. Registering a known name
    /// returns the existing id.
    pub fn register(&mut self, name: &str) -> ComponentTypeId {
        let key = name.to_lowercase();
        if let Some(id) = self.by_name.get(&key) {
            return *id;
        }
        let id = ComponentTypeId(u32::try_from(self.names.len()).unwrap_or(u32::MAX));
        self.names.push(name.to_string());
        self.by_name.insert(key, id);
        id
    }

    /// Resolves a type name.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<ComponentTypeId> {
        self.by_name.get(&name.to_lowercase()).copied()
    }

    /// Returns the registered spelling of a type.
    #[must_use]
    pub fn name(&self, id: ComponentTypeId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no type is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for ComponentCatalog {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for name in iter {
            catalog.register(name);
        }
        catalog
    }
}

bitflags! {
    /// Which normally hidden entities a component query admits.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct QueryOptions: u8 {
        /// Admit disabled entities.
        const INCLUDE_DISABLED = 1;
        /// Admit prefab entities.
        const INCLUDE_PREFABS = 1 << 1;
    }
}

/// A component query: every listed component is required.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentQuery {
    /// Required components, in the order they were written.
    pub all: Vec<ComponentTypeId>,
    /// Admission options.
    pub options: QueryOptions,
}

/// Outcome of [`HierarchyQueryBuilder::build_query`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryBuildResult {
    /// The query, if the text held component tokens and all resolved.
    pub query: Option<ComponentQuery>,
    /// The free text left after removing component tokens.
    pub filter: String,
    /// Why the structured part was rejected.
    pub error: Option<Error>,
}

impl QueryBuildResult {
    /// Returns true if the structured part was rejected.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        self.error.is_some()
    }
}

/// Maximum number of built results a [`HierarchyQueryBuilder`] keeps.
pub const QUERY_CACHE_CAPACITY: usize = 16;

/// Builds component queries from search text.
///
/// Owns the catalog it resolves against and a cache of built results,
/// keyed by the exact input text. The cache holds at most
/// [`QUERY_CACHE_CAPACITY`] entries; the oldest entry is evicted first.
#[derive(Clone, Debug, Default)]
pub struct HierarchyQueryBuilder {
    catalog: ComponentCatalog,
    tokenizer: SearchTokenizer,
    cache: HashMap<String, QueryBuildResult>,
    cache_order: VecDeque<String>,
}

impl HierarchyQueryBuilder {
    /// Creates a builder over `catalog`.
    #[must_use]
    pub fn new(catalog: ComponentCatalog) -> Self {
        Self {
            catalog,
            tokenizer: SearchTokenizer::default(),
            cache: HashMap::new(),
            cache_order: VecDeque::new(),
        }
    }

    /// Sets the tokenizer options used by filters built from this builder.
    #[must_use]
    pub fn with_tokenizer(mut self, options: TokenizerOptions) -> Self {
        self.tokenizer = SearchTokenizer::new(options);
        self
    }

    /// The catalog in use.
    #[must_use]
    pub fn catalog(&self) -> &ComponentCatalog {
        &self.catalog
    }

    /// Mutable access to the catalog. Clears the cache.
    pub fn catalog_mut(&mut self) -> &mut ComponentCatalog {
        self.cache.clear();
        self.cache_order.clear();
        &mut self.catalog
    }

    /// The tokenizer in use.
    #[must_use]
    pub fn tokenizer(&self) -> &SearchTokenizer {
        &self.tokenizer
    }

    /// Number of cached results.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Builds the component query for `text`.
    ///
    /// Never fails. An unknown type, a negated filter (`c=!Type`) or a
    /// missing type name leaves `query` empty and reports the first
    /// offending token in `error`; `filter` still carries the free text.
    pub fn build_query(&mut self, text: &str) -> QueryBuildResult {
        if let Some(cached) = self.cache.get(text) {
            return cached.clone();
        }
        let result = self.build_uncached(text);
        if self.cache_order.len() >= QUERY_CACHE_CAPACITY {
            if let Some(oldest) = self.cache_order.pop_front() {
                self.cache.remove(&oldest);
            }
        }
        self.cache_order.push_back(text.to_string());
        self.cache.insert(text.to_string(), result.clone());
        result
    }

    fn build_uncached(&self, text: &str) -> QueryBuildResult {
        let mut all = Vec::new();
        let mut leftover = Vec::new();
        let mut error = None;

        for token in SearchTokenizer::split(text) {
            if !is_component_token(&token) {
                leftover.push(token);
                continue;
            }
            let type_name = &token[2..];
            let failure = if type_name.is_empty() {
                Some(QueryErrorReason::MissingTypeName)
            } else if type_name.starts_with('!') {
                Some(QueryErrorReason::NegationUnsupported)
            } else if let Some(id) = self.catalog.resolve(type_name) {
                if !all.contains(&id) {
                    all.push(id);
                }
                None
            } else {
                Some(QueryErrorReason::UnknownComponent)
            };
            if let Some(reason) = failure.filter(|_| error.is_none()) {
                error = Some(Error::invalid_query(type_name, reason));
            }
        }

        let query = (error.is_none() && !all.is_empty()).then(|| ComponentQuery {
            all,
            options: QueryOptions::INCLUDE_DISABLED | QueryOptions::INCLUDE_PREFABS,
        });
        QueryBuildResult {
            query,
            filter: join_tokens(&leftover),
            error,
        }
    }
}

/// Joins tokens back into text that splits into the same tokens.
fn join_tokens(tokens: &[String]) -> String {
    struct Joined<'a>(&'a [String]);

    impl fmt::Display for Joined<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            for (i, token) in self.0.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                if token.contains(char::is_whitespace) {
                    write!(f, "\"{token}\"")?;
                } else {
                    f.write_str(token)?;
                }
            }
            Ok(())
        }
    }

    Joined(tokens).to_string()
}
