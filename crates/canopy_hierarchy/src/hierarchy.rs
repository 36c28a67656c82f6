//! The live hierarchy.
//!
//! [`Hierarchy`] is the single writer over a node store. Raw notifications
//! are recorded into its trackers; [`update`](Hierarchy::update) turns
//! pending changes into batches and applies one budgeted step of every
//! in-flight batch; [`build_rows`](Hierarchy::build_rows) bakes the store
//! and reduces it to what a tree view shows.

use std::collections::BTreeMap;
use std::sync::Arc;

use canopy_foundation::Error;
use canopy_integration::{
    EntityChangeTracker, EntityIntegration, GameObjectChangeTracker, GameObjectIntegration,
    IntegrationContext, SteppedIntegration, SubSceneMap, WorldId,
};
use canopy_search::{
    ComponentCatalog, ComponentLookup, ComponentTypeId, HierarchyFilter, HierarchyQueryBuilder,
};
use canopy_store::{ImmutableHierarchy, NameStore, NodeStore, SnapshotBuffers};
use canopy_view::{ExpandedNodes, ExpandedSet, SubSceneOpenState, ViewState, build_expanded_nodes};
use tracing::{debug, debug_span};

use crate::config::HierarchyConfig;

/// Stores, trackers, in-flight integrations and search state of one
/// hierarchy.
#[derive(Debug)]
pub struct Hierarchy {
    config: HierarchyConfig,
    nodes: NodeStore,
    names: NameStore,
    sub_scenes: SubSceneMap,
    game_objects: GameObjectChangeTracker,
    entities: BTreeMap<WorldId, EntityChangeTracker>,
    game_object_integration: Option<GameObjectIntegration>,
    entity_integrations: BTreeMap<WorldId, EntityIntegration>,
    buffers: SnapshotBuffers,
    query_builder: HierarchyQueryBuilder,
    search: String,
    filter: HierarchyFilter,
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self::new(HierarchyConfig::default(), ComponentCatalog::new())
    }
}

impl Hierarchy {
    /// Creates an empty hierarchy.
    #[must_use]
    pub fn new(config: HierarchyConfig, catalog: ComponentCatalog) -> Self {
        let query_builder = HierarchyQueryBuilder::new(catalog).with_tokenizer(config.tokenizer);
        Self {
            config,
            nodes: NodeStore::new(),
            names: NameStore::new(),
            sub_scenes: SubSceneMap::new(),
            game_objects: GameObjectChangeTracker::new(),
            entities: BTreeMap::new(),
            game_object_integration: None,
            entity_integrations: BTreeMap::new(),
            buffers: SnapshotBuffers::new(),
            query_builder,
            search: String::new(),
            filter: HierarchyFilter::default(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &HierarchyConfig {
        &self.config
    }

    /// The node store.
    #[must_use]
    pub fn nodes(&self) -> &NodeStore {
        &self.nodes
    }

    /// The name store.
    #[must_use]
    pub fn names(&self) -> &NameStore {
        &self.names
    }

    /// The SubScene map.
    #[must_use]
    pub fn sub_scenes(&self) -> &SubSceneMap {
        &self.sub_scenes
    }

    /// The view described by the configuration.
    #[must_use]
    pub fn view_state(&self) -> ViewState {
        self.config.view_state()
    }

    /// Open state of every known SubScene, derived from loaded authoring
    /// scenes.
    #[must_use]
    pub fn sub_scene_open_state(&self) -> SubSceneOpenState {
        self.sub_scenes.open_states().collect()
    }

    // =========================================================================
    // Change recording
    // =========================================================================

    /// The tracker game object notifications are recorded into.
    pub fn game_objects_mut(&mut self) -> &mut GameObjectChangeTracker {
        &mut self.game_objects
    }

    /// The tracker entity notifications of `world` are recorded into.
    pub fn entities_mut(&mut self, world: WorldId) -> &mut EntityChangeTracker {
        self.entities
            .entry(world)
            .or_insert_with(|| EntityChangeTracker::new(world))
    }

    /// Returns true if a batch is being applied.
    #[must_use]
    pub fn is_integrating(&self) -> bool {
        self.game_object_integration.is_some() || !self.entity_integrations.is_empty()
    }

    /// Returns true if changes are recorded but not yet applied.
    #[must_use]
    pub fn has_pending_changes(&self) -> bool {
        !self.game_objects.is_empty() || self.entities.values().any(|t| !t.is_empty())
    }

    /// Starts batches for pending changes and applies one budgeted step of
    /// every in-flight batch.
    ///
    /// Game object batches step before entity batches so SubScene nodes
    /// exist before the entities that live under them. A source with a
    /// batch in flight keeps accumulating until that batch completes.
    ///
    /// Returns true while work remains.
    pub fn update(&mut self) -> bool {
        let _span = debug_span!("hierarchy_update").entered();
        let budget = self.config.budget();

        if self.game_object_integration.is_none() && !self.game_objects.is_empty() {
            let batch = self.game_objects.take_events();
            debug!(events = batch.len(), "starting game object batch");
            self.game_object_integration = Some(GameObjectIntegration::new(batch, budget));
        }
        for (world, tracker) in &mut self.entities {
            if !tracker.is_empty() && !self.entity_integrations.contains_key(world) {
                let batch = tracker.take_changes();
                debug!(world = world.0, changes = batch.len(), "starting entity batch");
                self.entity_integrations
                    .insert(*world, EntityIntegration::new(batch, budget));
            }
        }

        let mut ctx =
            IntegrationContext::new(&mut self.nodes, &mut self.names, &mut self.sub_scenes);
        let game_objects_done = self
            .game_object_integration
            .as_mut()
            .is_some_and(|integration| !integration.move_next(&mut ctx));
        if game_objects_done {
            self.game_object_integration = None;
        }
        self.entity_integrations
            .retain(|_, integration| integration.move_next(&mut ctx));

        self.is_integrating()
    }

    /// Runs [`update`](Self::update) until every recorded change is applied.
    ///
    /// Returns the number of update calls made.
    pub fn flush(&mut self) -> usize {
        let mut calls = 0;
        while self.is_integrating() || self.has_pending_changes() {
            self.update();
            calls += 1;
        }
        calls
    }

    /// Drops every node, name, pending change and in-flight batch.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.names.clear();
        self.sub_scenes.clear();
        self.game_objects = GameObjectChangeTracker::new();
        self.entities.clear();
        self.game_object_integration = None;
        self.entity_integrations.clear();
    }

    // =========================================================================
    // Snapshots and rows
    // =========================================================================

    /// Bakes the store, reusing the current snapshot when nothing changed.
    pub fn bake(&mut self) -> Arc<ImmutableHierarchy> {
        self.buffers.bake(&self.nodes)
    }

    /// The most recent snapshot, without baking.
    #[must_use]
    pub fn snapshot(&self) -> Arc<ImmutableHierarchy> {
        self.buffers.current()
    }

    /// Sets the search text and recompiles the filter.
    ///
    /// Returns why the component part was rejected, if it was; the name
    /// tokens apply either way.
    pub fn set_search(&mut self, text: &str) -> Option<&Error> {
        text.clone_into(&mut self.search);
        self.filter = HierarchyFilter::new(text, &mut self.query_builder);
        self.filter.error()
    }

    /// The current search text.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// The compiled filter for the current search text.
    #[must_use]
    pub fn filter(&self) -> &HierarchyFilter {
        &self.filter
    }

    /// Registers a component type for `c=` search tokens and recompiles
    /// the current search.
    pub fn register_component(&mut self, name: &str) -> ComponentTypeId {
        let id = self.query_builder.catalog_mut().register(name);
        if !self.search.is_empty() {
            self.filter = HierarchyFilter::new(&self.search, &mut self.query_builder);
        }
        id
    }

    /// Bakes the store and reduces it to the rows of one view.
    ///
    /// An empty search shows every row; otherwise matches and their
    /// ancestors pass.
    pub fn build_rows(
        &mut self,
        expanded: &ExpandedSet,
        open_state: &SubSceneOpenState,
        view: ViewState,
        components: &dyn ComponentLookup,
    ) -> ExpandedNodes {
        let snapshot = self.bake();
        let mask = (!self.filter.is_empty())
            .then(|| self.filter.apply(&snapshot, &self.names, components));
        build_expanded_nodes(&snapshot, mask.as_ref(), expanded, open_state, view)
    }
}
