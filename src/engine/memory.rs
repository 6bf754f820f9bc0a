use std::{collections::HashMap, time::Duration};

use crate::{
    batch::spec::JobSpec,
    engine::adapter::{EncodeEngine, EncodeError},
    foundation::core::JobId,
    slides::theme::Background,
};

/// In-memory engine for tests and dry runs.
///
/// Produces a small deterministic payload describing the job instead of video. Failures, setup
/// errors and per-job latency can be scripted.
#[derive(Debug, Default)]
pub struct InMemoryEngine {
    failures: HashMap<JobId, String>,
    latencies: HashMap<JobId, Duration>,
    setup_failure: Option<String>,
    ready: bool,
    setup_calls: usize,
    encoded: Vec<JobId>,
}

impl InMemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail `job` with `reason` every time it is encoded.
    pub fn fail_on(mut self, job: JobId, reason: impl Into<String>) -> Self {
        self.failures.insert(job, reason.into());
        self
    }

    /// Sleep for `latency` before answering `job`.
    pub fn with_latency(mut self, job: JobId, latency: Duration) -> Self {
        self.latencies.insert(job, latency);
        self
    }

    /// Make `ensure_ready` fail with `reason`.
    pub fn unavailable(mut self, reason: impl Into<String>) -> Self {
        self.setup_failure = Some(reason.into());
        self
    }

    /// Number of times `ensure_ready` was called.
    pub fn setup_calls(&self) -> usize {
        self.setup_calls
    }

    /// Jobs passed to `encode`, in call order (including ones that failed).
    pub fn encoded(&self) -> &[JobId] {
        &self.encoded
    }

    /// The payload `encode` returns for `job`.
    pub fn render_payload(job: &JobSpec) -> Vec<u8> {
        let background = match job.background() {
            Background::Color(c) => format!("color:{c}"),
            Background::Image(img) => format!("image:sha256:{}", img.sha256()),
        };
        format!(
            "slidereel/memory v1\naspect={}\nbackground={}\nseconds={}\ntitle={}\ncontent={}\n",
            job.aspect_ratio(),
            background,
            job.duration().get(),
            job.title(),
            job.content(),
        )
        .into_bytes()
    }
}

impl EncodeEngine for InMemoryEngine {
    fn name(&self) -> &str {
        "memory"
    }

    fn ensure_ready(&mut self) -> Result<(), EncodeError> {
        self.setup_calls += 1;
        if let Some(reason) = &self.setup_failure {
            return Err(EncodeError::new(reason.clone()));
        }
        self.ready = true;
        Ok(())
    }

    fn encode(&mut self, job: &JobSpec) -> Result<Vec<u8>, EncodeError> {
        if !self.ready {
            return Err(EncodeError::new("memory engine used before ensure_ready"));
        }
        self.encoded.push(job.id());
        if let Some(latency) = self.latencies.get(&job.id()) {
            std::thread::sleep(*latency);
        }
        if let Some(reason) = self.failures.get(&job.id()) {
            return Err(EncodeError::new(reason.clone()));
        }
        Ok(Self::render_payload(job))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/memory.rs"]
mod tests;
