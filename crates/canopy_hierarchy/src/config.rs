//! Configuration for a live hierarchy.

use canopy_search::TokenizerOptions;
use canopy_view::{DataMode, ViewState};

/// Default number of change items applied per update.
pub const DEFAULT_INTEGRATION_BUDGET: usize = 256;

/// Configuration for a [`Hierarchy`](crate::Hierarchy).
///
/// Controls how much integration work one update does, how search text
/// is normalized, and the view defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HierarchyConfig {
    /// Change items applied per update and per in-flight batch. Never zero.
    pub integration_budget: usize,

    /// Search token normalization.
    pub tokenizer: TokenizerOptions,

    /// Data mode of the default view.
    pub data_mode: DataMode,

    /// Whether the editor is in play mode.
    pub is_play_mode: bool,

    /// Expand every node while a search is active.
    pub expand_all_while_filtering: bool,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            integration_budget: DEFAULT_INTEGRATION_BUDGET,
            tokenizer: TokenizerOptions::default(),
            data_mode: DataMode::default_for_play_mode(false),
            is_play_mode: false,
            expand_all_while_filtering: false,
        }
    }
}

impl HierarchyConfig {
    /// Creates a configuration for editing, where searches expand the tree.
    #[must_use]
    pub fn editor() -> Self {
        Self {
            expand_all_while_filtering: true,
            ..Self::default()
        }
    }

    /// Creates a configuration for play mode, with a smaller per-frame
    /// budget and the play mode data mode.
    #[must_use]
    pub fn play_mode() -> Self {
        Self {
            integration_budget: 64,
            tokenizer: TokenizerOptions::default(),
            data_mode: DataMode::default_for_play_mode(true),
            is_play_mode: true,
            expand_all_while_filtering: true,
        }
    }

    /// Builder method to set the integration budget. Zero is raised to one.
    #[must_use]
    pub fn with_integration_budget(mut self, budget: usize) -> Self {
        self.integration_budget = budget.max(1);
        self
    }

    /// Builder method to set tokenizer options.
    #[must_use]
    pub fn with_tokenizer(mut self, tokenizer: TokenizerOptions) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Builder method to set the data mode.
    #[must_use]
    pub fn with_data_mode(mut self, data_mode: DataMode) -> Self {
        self.data_mode = data_mode;
        self
    }

    /// Builder method to set play mode. Does not change the data mode.
    #[must_use]
    pub fn with_play_mode(mut self, is_play_mode: bool) -> Self {
        self.is_play_mode = is_play_mode;
        self
    }

    /// Builder method to enable/disable expanding everything while searching.
    #[must_use]
    pub fn with_expand_all_while_filtering(mut self, enabled: bool) -> Self {
        self.expand_all_while_filtering = enabled;
        self
    }

    /// The effective integration budget.
    #[must_use]
    pub fn budget(&self) -> usize {
        self.integration_budget.max(1)
    }

    /// The view these settings describe.
    #[must_use]
    pub fn view_state(&self) -> ViewState {
        ViewState {
            data_mode: self.data_mode,
            is_play_mode: self.is_play_mode,
            expand_all_while_filtering: self.expand_all_while_filtering,
        }
    }
}
