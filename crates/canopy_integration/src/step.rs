//! The stepped integration contract.
//!
//! Integrating a large backlog in one go would stall a frame. Instead a
//! batch is wrapped in a state machine that applies at most `budget` items
//! per call and remembers where it stopped. Dropping the machine, or just
//! not calling it, cancels the rest of the batch; calling it again resumes
//! without loss or repetition.

use std::fmt;

use canopy_foundation::Result;
use canopy_store::{NameStore, NodeStore};
use tracing::debug;

use crate::sub_scene_map::SubSceneMap;

/// The phases of an integration, in the order they run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IntegrationStep {
    /// Removing scenes (or scene tags) that went away.
    HandleUnloadedScenes,
    /// Adding scenes (or scene tags) that appeared.
    HandleLoadedScenes,
    /// Applying per-object changes.
    IntegrateChanges,
    /// Nothing left to do. Terminal.
    Complete,
}

impl IntegrationStep {
    const ORDER: [Self; 3] = [
        Self::HandleUnloadedScenes,
        Self::HandleLoadedScenes,
        Self::IntegrateChanges,
    ];

    /// Returns the first step at or after `from` with work pending.
    ///
    /// `pending` holds the item counts of the three working steps, in order.
    #[must_use]
    pub fn first_pending(from: Self, pending: [usize; 3]) -> Self {
        Self::ORDER
            .iter()
            .zip(pending)
            .find(|(step, count)| **step >= from && *count > 0)
            .map_or(Self::Complete, |(step, _)| *step)
    }

    /// Returns the step that follows this one in the fixed order.
    #[must_use]
    pub fn following(self) -> Self {
        match self {
            Self::HandleUnloadedScenes => Self::HandleLoadedScenes,
            Self::HandleLoadedScenes => Self::IntegrateChanges,
            Self::IntegrateChanges | Self::Complete => Self::Complete,
        }
    }
}

impl fmt::Display for IntegrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::HandleUnloadedScenes => "HandleUnloadedScenes",
            Self::HandleLoadedScenes => "HandleLoadedScenes",
            Self::IntegrateChanges => "IntegrateChanges",
            Self::Complete => "Complete",
        };
        f.write_str(name)
    }
}

/// Everything an integration step is allowed to mutate.
#[derive(Debug)]
pub struct IntegrationContext<'a> {
    /// The live forest.
    pub nodes: &'a mut NodeStore,
    /// Display names.
    pub names: &'a mut NameStore,
    /// SubScene bookkeeping.
    pub sub_scenes: &'a mut SubSceneMap,
}

impl<'a> IntegrationContext<'a> {
    /// Bundles the stores an integration writes to.
    pub fn new(
        nodes: &'a mut NodeStore,
        names: &'a mut NameStore,
        sub_scenes: &'a mut SubSceneMap,
    ) -> Self {
        Self {
            nodes,
            names,
            sub_scenes,
        }
    }
}

/// A resumable, budgeted application of one change batch.
pub trait SteppedIntegration {
    /// The phase the next call will work on.
    fn current_step(&self) -> IntegrationStep;

    /// Items applied per [`move_next`](Self::move_next) call.
    fn budget(&self) -> usize;

    /// Number of items not applied yet.
    fn remaining(&self) -> usize;

    /// Applies up to `budget` items of the current phase.
    ///
    /// Returns true while there is more work.
    fn advance(&mut self, ctx: &mut IntegrationContext<'_>, budget: usize) -> bool;

    /// Applies up to [`budget`](Self::budget) items of the current phase.
    ///
    /// Returns true while there is more work; false forever once complete.
    fn move_next(&mut self, ctx: &mut IntegrationContext<'_>) -> bool {
        let budget = self.budget();
        self.advance(ctx, budget)
    }

    /// Returns true once every item was applied.
    fn is_complete(&self) -> bool {
        self.current_step() == IntegrationStep::Complete
    }
}

/// Logs and discards a failed per-item operation.
///
/// Change events are best-effort and may already be stale when applied.
pub(crate) fn absorb<T>(result: Result<T>, item: &'static str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            debug!(item, %error, "skipping stale change");
            None
        }
    }
}
