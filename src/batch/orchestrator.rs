use std::{
    panic::AssertUnwindSafe,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use crate::{
    batch::{
        outcome::{Artifact, JobOutcome},
        spec::{JobPlan, JobSpec, RowPolicy, build_job_specs},
        store::ResultStore,
    },
    engine::adapter::{EncodeEngine, EncodeError},
    foundation::{
        core::BatchId,
        error::{ReelError, ReelResult},
    },
    slides::{row::RowTable, theme::Theme},
};

/// Drives job plans through one exclusively owned engine.
///
/// Every [`start`](Self::start) opens a new batch and supersedes the previous one: the older
/// [`BatchRun`] stops submitting jobs and records nothing further.
pub struct Orchestrator<E: EncodeEngine> {
    engine: Arc<Mutex<E>>,
    epoch: Arc<AtomicU64>,
}

impl<E: EncodeEngine> Orchestrator<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Id of the most recently started batch, if any.
    pub fn current_batch(&self) -> Option<BatchId> {
        match self.epoch.load(Ordering::SeqCst) {
            0 => None,
            n => Some(BatchId(n)),
        }
    }

    /// Run `f` against the engine, waiting for any in-flight job to finish first.
    pub fn with_engine<R>(&self, f: impl FnOnce(&E) -> R) -> R {
        f(&lock_engine(&self.engine))
    }

    /// Open a batch for `plan`.
    ///
    /// Fails with [`ReelError::EngineUnavailable`] when engine setup fails; no job runs then and
    /// the batch in flight, if any, is left running.
    #[tracing::instrument(skip(self, plan), fields(jobs = plan.len()))]
    pub fn start(&self, plan: JobPlan) -> ReelResult<BatchRun<E>> {
        // The epoch only moves while the engine is held, so a superseded run can never record
        // an outcome after this returns.
        let batch = {
            let mut engine = lock_engine(&self.engine);
            engine.ensure_ready().map_err(|e| {
                tracing::warn!(engine = engine.name(), reason = %e, "engine setup failed");
                ReelError::engine_unavailable(e.reason)
            })?;

            let batch = BatchId(self.epoch.fetch_add(1, Ordering::SeqCst) + 1);
            if batch.0 > 1 {
                tracing::debug!(%batch, "superseding earlier batch");
            }
            tracing::info!(%batch, engine = engine.name(), jobs = plan.len(), "batch started");
            batch
        };

        let store = ResultStore::new(batch, plan.len());
        Ok(BatchRun {
            batch,
            specs: plan.into_specs(),
            cursor: 0,
            finished: false,
            store,
            engine: Arc::clone(&self.engine),
            epoch: Arc::clone(&self.epoch),
        })
    }

    /// Build specs from `rows` and open a batch for them.
    pub fn submit(
        &self,
        rows: &RowTable,
        count: usize,
        theme: &Theme,
        policy: RowPolicy,
    ) -> ReelResult<BatchRun<E>> {
        let plan = build_job_specs(rows, count, theme, policy)?;
        self.start(plan)
    }
}

fn lock_engine<E>(engine: &Mutex<E>) -> MutexGuard<'_, E> {
    engine.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Totals for a finished (or superseded) batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchSummary {
    pub batch: BatchId,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: bool,
}

/// One batch in flight.
///
/// Iterating runs the jobs one at a time in submission order and yields each outcome as soon as it
/// is recorded in [`store`](Self::store). The iterator ends after the last job, or early when a
/// newer batch was started on the same orchestrator.
pub struct BatchRun<E: EncodeEngine> {
    batch: BatchId,
    specs: Vec<JobSpec>,
    cursor: usize,
    finished: bool,
    store: ResultStore,
    engine: Arc<Mutex<E>>,
    epoch: Arc<AtomicU64>,
}

impl<E: EncodeEngine> BatchRun<E> {
    pub fn id(&self) -> BatchId {
        self.batch
    }

    pub fn specs(&self) -> &[JobSpec] {
        &self.specs
    }

    /// Handle onto this batch's outcomes; clone it to observe from elsewhere.
    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn is_cancelled(&self) -> bool {
        self.store.is_cancelled()
    }

    /// Run the remaining jobs and report the totals.
    pub fn run_to_end(mut self) -> BatchSummary {
        for _ in self.by_ref() {}
        self.summary()
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            batch: self.batch,
            total: self.specs.len(),
            succeeded: self.store.succeeded(),
            failed: self.store.failed(),
            cancelled: self.store.is_cancelled(),
        }
    }

    fn superseded(&self) -> bool {
        self.epoch.load(Ordering::SeqCst) != self.batch.0
    }

    fn cancel(&mut self) {
        self.finished = true;
        self.store.mark_cancelled();
        tracing::warn!(
            batch = %self.batch,
            recorded = self.store.count(),
            total = self.specs.len(),
            "batch superseded; remaining jobs dropped"
        );
    }
}

impl<E: EncodeEngine> Iterator for BatchRun<E> {
    type Item = JobOutcome;

    fn next(&mut self) -> Option<JobOutcome> {
        if self.finished {
            return None;
        }
        let Some(spec) = self.specs.get(self.cursor) else {
            self.finished = true;
            tracing::info!(
                batch = %self.batch,
                succeeded = self.store.succeeded(),
                failed = self.store.failed(),
                "batch complete"
            );
            return None;
        };

        // The engine stays locked until the outcome is recorded, so once a newer batch has
        // acquired it this batch can no longer append.
        let engine = Arc::clone(&self.engine);
        let mut engine = lock_engine(&engine);
        if self.superseded() {
            self.cancel();
            return None;
        }

        let result = encode_isolated(&mut *engine, spec);

        if self.superseded() {
            tracing::debug!(batch = %self.batch, job = %spec.id(), "discarding superseded result");
            self.cancel();
            return None;
        }

        let outcome = match result {
            Ok(bytes) => JobOutcome::Success {
                job: spec.id(),
                title: spec.title().to_owned(),
                artifact: Artifact::new(bytes),
            },
            Err(e) => {
                tracing::warn!(batch = %self.batch, job = %spec.id(), reason = %e, "job failed");
                JobOutcome::Failure {
                    job: spec.id(),
                    title: spec.title().to_owned(),
                    reason: e.reason,
                }
            }
        };

        if let Err(e) = self.store.push(outcome.clone()) {
            tracing::error!(batch = %self.batch, error = %e, "result store rejected outcome");
            self.finished = true;
            return None;
        }
        self.cursor += 1;
        tracing::debug!(
            batch = %self.batch,
            job = %outcome.job_id(),
            success = outcome.is_success(),
            "job finished"
        );
        Some(outcome)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            return (0, Some(0));
        }
        (0, Some(self.specs.len() - self.cursor))
    }
}

/// Run one encode, turning panics and empty payloads into job failures.
#[tracing::instrument(skip_all, fields(job = %spec.id(), engine = engine.name()))]
fn encode_isolated<E: EncodeEngine + ?Sized>(
    engine: &mut E,
    spec: &JobSpec,
) -> Result<Vec<u8>, EncodeError> {
    match std::panic::catch_unwind(AssertUnwindSafe(|| engine.encode(spec))) {
        Ok(Ok(bytes)) if bytes.is_empty() => Err(EncodeError::new("engine returned no data")),
        Ok(result) => result,
        Err(panic) => {
            let msg = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_owned())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_owned());
            Err(EncodeError::new(format!("engine panicked: {msg}")))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/batch/orchestrator.rs"]
mod tests;
