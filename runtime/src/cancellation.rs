//! Bookkeeping for cancellable effects.
//!
//! Every [`EffectId`] owns a generation counter and the abort handles of the
//! tasks started under it. Starting a new cancellable effect aborts the tasks
//! of the previous generation and opens a new one; a result carrying a stale
//! generation is dropped before it reaches the reducer.

use casedesk_core::effect::EffectId;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tokio::task::AbortHandle;

/// Generation of an effect id that a spawned task belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CancelScope {
    pub(crate) id: EffectId,
    pub(crate) generation: u64,
}

#[derive(Default)]
struct InFlight {
    generation: u64,
    tasks: Vec<AbortHandle>,
}

impl InFlight {
    fn abort_all(&mut self) -> usize {
        let mut aborted = 0;
        for task in self.tasks.drain(..) {
            if !task.is_finished() {
                task.abort();
                aborted += 1;
            }
        }
        aborted
    }
}

/// Registry of in-flight cancellable effects, keyed by effect id.
#[derive(Default)]
pub(crate) struct CancellationRegistry {
    entries: Mutex<HashMap<EffectId, InFlight>>,
}

impl CancellationRegistry {
    /// Abort everything running under `id` and open a new generation.
    ///
    /// Returns the scope for the new generation and the number of aborted tasks.
    pub(crate) fn supersede(&self, id: EffectId) -> (CancelScope, usize) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.entry(id.clone()).or_default();
        let aborted = entry.abort_all();
        entry.generation += 1;

        (
            CancelScope {
                id,
                generation: entry.generation,
            },
            aborted,
        )
    }

    /// Abort everything running under `id`.
    ///
    /// The generation is bumped as well, so a result that already left its
    /// task is still discarded.
    pub(crate) fn cancel(&self, id: &EffectId) -> usize {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get_mut(id).map_or(0, |entry| {
            entry.generation += 1;
            entry.abort_all()
        })
    }

    /// Attach a spawned task to `scope`.
    ///
    /// A task started for a generation that has already been superseded is
    /// aborted immediately and `false` is returned.
    pub(crate) fn register(&self, scope: &CancelScope, task: AbortHandle) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.get_mut(&scope.id) {
            Some(entry) if entry.generation == scope.generation => {
                entry.tasks.retain(|t| !t.is_finished());
                entry.tasks.push(task);
                true
            },
            _ => {
                task.abort();
                false
            },
        }
    }

    /// Returns true while `scope` is the latest generation of its id.
    pub(crate) fn is_current(&self, scope: &CancelScope) -> bool {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&scope.id)
            .is_some_and(|entry| entry.generation == scope.generation)
    }
}
