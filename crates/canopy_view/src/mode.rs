//! Data modes and view settings.

use std::fmt;

use canopy_foundation::NodeKind;

/// Which side of a SubScene the hierarchy shows.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DataMode {
    /// Authoring objects.
    #[default]
    Authoring,
    /// Authoring objects and runtime entities side by side.
    Mixed,
    /// Runtime entities.
    Runtime,
}

impl DataMode {
    /// The mode assumed when the user has not picked one.
    #[must_use]
    pub fn default_for_play_mode(is_play_mode: bool) -> Self {
        if is_play_mode { Self::Mixed } else { Self::Authoring }
    }

    /// Returns true if authoring objects are shown.
    #[must_use]
    pub fn shows_authoring(self) -> bool {
        matches!(self, Self::Authoring | Self::Mixed)
    }

    /// Returns true if runtime entities are shown.
    #[must_use]
    pub fn shows_runtime(self) -> bool {
        matches!(self, Self::Runtime | Self::Mixed)
    }

    /// Returns true if a direct child of a SubScene is shown.
    ///
    /// Authoring children need the SubScene open. Entity children show in
    /// Runtime and Mixed mode, and in Authoring mode while the SubScene is
    /// closed, since no live authoring objects stand in for them then.
    #[must_use]
    pub fn shows_sub_scene_child(self, kind: NodeKind, sub_scene_open: bool) -> bool {
        match kind {
            NodeKind::GameObject | NodeKind::SubScene => sub_scene_open && self.shows_authoring(),
            NodeKind::Entity => self.shows_runtime() || !sub_scene_open,
            NodeKind::Root | NodeKind::Scene => true,
        }
    }
}

impl fmt::Display for DataMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Authoring => "Authoring",
            Self::Mixed => "Mixed",
            Self::Runtime => "Runtime",
        };
        f.write_str(name)
    }
}

/// Settings of one hierarchy view.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
    /// The data mode the reduction follows.
    pub data_mode: DataMode,
    /// Whether the editor is in play mode. Only picks the default data mode.
    pub is_play_mode: bool,
    /// Expand every node while a search is active.
    pub expand_all_while_filtering: bool,
}

impl ViewState {
    /// Creates a view with an explicit data mode.
    #[must_use]
    pub fn new(data_mode: DataMode) -> Self {
        Self {
            data_mode,
            ..Self::default()
        }
    }

    /// Creates a view for edit or play mode with the matching default mode.
    #[must_use]
    pub fn for_play_mode(is_play_mode: bool) -> Self {
        Self {
            data_mode: DataMode::default_for_play_mode(is_play_mode),
            is_play_mode,
            expand_all_while_filtering: false,
        }
    }

    /// Sets the data mode.
    #[must_use]
    pub fn with_data_mode(mut self, data_mode: DataMode) -> Self {
        self.data_mode = data_mode;
        self
    }

    /// Sets whether searches expand everything.
    #[must_use]
    pub fn with_expand_all_while_filtering(mut self, enabled: bool) -> Self {
        self.expand_all_while_filtering = enabled;
        self
    }
}
