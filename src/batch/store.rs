use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    batch::outcome::JobOutcome,
    foundation::{
        core::{BatchId, JobId},
        error::{ReelError, ReelResult},
    },
};

/// Append-only, ordered record of one batch's outcomes.
///
/// Cloning yields another handle onto the same store. Only the owning
/// [`BatchRun`](crate::BatchRun) appends; every other holder reads.
#[derive(Clone, Debug)]
pub struct ResultStore {
    inner: Arc<RwLock<StoreState>>,
}

#[derive(Debug)]
struct StoreState {
    batch: BatchId,
    expected: usize,
    outcomes: Vec<JobOutcome>,
    cancelled: bool,
}

impl ResultStore {
    pub(crate) fn new(batch: BatchId, expected: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreState {
                batch,
                expected,
                outcomes: Vec::with_capacity(expected),
                cancelled: false,
            })),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append the outcome for the next job in submission order.
    pub(crate) fn push(&self, outcome: JobOutcome) -> ReelResult<()> {
        let mut state = self.write();
        let next = state.outcomes.len();
        if next >= state.expected {
            return Err(ReelError::validation(format!(
                "{} already holds all {} outcomes",
                state.batch, state.expected
            )));
        }
        if outcome.job_id() != JobId(next) {
            return Err(ReelError::validation(format!(
                "{} expected an outcome for {}, got {}",
                state.batch,
                JobId(next),
                outcome.job_id()
            )));
        }
        state.outcomes.push(outcome);
        Ok(())
    }

    pub(crate) fn mark_cancelled(&self) {
        self.write().cancelled = true;
    }

    pub fn batch(&self) -> BatchId {
        self.read().batch
    }

    /// Number of outcomes recorded so far.
    pub fn count(&self) -> usize {
        self.read().outcomes.len()
    }

    /// Number of jobs submitted with the batch.
    pub fn expected(&self) -> usize {
        self.read().expected
    }

    /// Ordered snapshot of the outcomes recorded so far.
    pub fn outcomes(&self) -> Vec<JobOutcome> {
        self.read().outcomes.clone()
    }

    pub fn get(&self, job: JobId) -> Option<JobOutcome> {
        self.read().outcomes.get(job.0).cloned()
    }

    /// Every submitted job has an outcome.
    pub fn is_complete(&self) -> bool {
        let state = self.read();
        state.outcomes.len() == state.expected
    }

    /// A newer batch superseded this one before it completed.
    pub fn is_cancelled(&self) -> bool {
        self.read().cancelled
    }

    pub fn succeeded(&self) -> usize {
        self.read()
            .outcomes
            .iter()
            .filter(|o| o.is_success())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.read()
            .outcomes
            .iter()
            .filter(|o| !o.is_success())
            .count()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/batch/store.rs"]
mod tests;
