//! Supersede-on-change refitting
//!
//! Every parameter change starts a new fit for a target. A fit that finishes
//! after a newer one has started is discarded instead of being installed, so
//! the installed set always comes from the latest request. Installed sets
//! are shared as `Arc<ModelSet>` and replaced, never mutated.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use popcast_spi::{Dataset, Result, TargetColumn};
use tracing::{debug, info};

use crate::pipeline::{ModelSet, Pipeline};

/// Claim on the next install slot for one target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefitTicket {
    target: TargetColumn,
    generation: u64,
}

impl RefitTicket {
    pub fn target(&self) -> TargetColumn {
        self.target
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The set is now current for its target.
    Installed,
    /// A newer ticket was issued; the set was dropped.
    Superseded,
}

#[derive(Debug, Default)]
struct Slot {
    latest: u64,
    installed: Option<(u64, Arc<ModelSet>)>,
}

/// Tracks the current model set per target and rejects stale commits.
#[derive(Debug, Default)]
pub struct RefitCoordinator {
    slots: Mutex<HashMap<TargetColumn, Slot>>,
}

impl RefitCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<TargetColumn, Slot>> {
        match self.slots.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Start a fit for `target`, superseding any fit still in flight.
    pub fn begin(&self, target: TargetColumn) -> RefitTicket {
        let mut slots = self.slots();
        let slot = slots.entry(target).or_default();
        slot.latest += 1;
        debug!(age_group = %target, generation = slot.latest, "refit started");
        RefitTicket {
            target,
            generation: slot.latest,
        }
    }

    /// Whether `ticket` is still the latest for its target.
    ///
    /// Long fits may poll this to stop early.
    pub fn is_current(&self, ticket: &RefitTicket) -> bool {
        self.slots()
            .get(&ticket.target)
            .map_or(false, |slot| slot.latest == ticket.generation)
    }

    /// Install `set` if `ticket` is still current.
    pub fn commit(&self, ticket: RefitTicket, set: ModelSet) -> CommitOutcome {
        let mut slots = self.slots();
        let slot = slots.entry(ticket.target).or_default();
        if slot.latest != ticket.generation {
            info!(
                age_group = %ticket.target,
                generation = ticket.generation,
                latest = slot.latest,
                "discarding superseded refit"
            );
            return CommitOutcome::Superseded;
        }
        slot.installed = Some((ticket.generation, Arc::new(set)));
        CommitOutcome::Installed
    }

    /// Currently installed set for `target`.
    pub fn current(&self, target: TargetColumn) -> Option<Arc<ModelSet>> {
        self.slots()
            .get(&target)
            .and_then(|slot| slot.installed.as_ref())
            .map(|(_, set)| Arc::clone(set))
    }

    /// Generation of the installed set for `target`.
    pub fn installed_generation(&self, target: TargetColumn) -> Option<u64> {
        self.slots()
            .get(&target)
            .and_then(|slot| slot.installed.as_ref())
            .map(|(generation, _)| *generation)
    }

    /// Begin, fit every configured kind for `target` over `dataset`, and commit.
    pub fn refit(
        &self,
        pipeline: &Pipeline,
        dataset: &Dataset,
        target: TargetColumn,
    ) -> Result<CommitOutcome> {
        let ticket = self.begin(target);
        let set = pipeline.fit_target(dataset, target)?;
        Ok(self.commit(ticket, set))
    }
}
