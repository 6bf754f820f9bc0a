use crate::batch::spec::JobSpec;

/// Failure of one engine call, attributable to a single job (or to engine setup).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct EncodeError {
    pub reason: String,
}

impl EncodeError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Engine contract consumed by the orchestrator.
///
/// Calls are never overlapped: the orchestrator holds the engine exclusively for the duration of
/// one `encode`. A failed `encode` must leave the engine usable for the next job.
pub trait EncodeEngine: Send {
    /// Short engine name used in logs.
    fn name(&self) -> &str;

    /// Prepare the engine. Called before the first job of every batch; must be idempotent so the
    /// setup cost is paid once.
    fn ensure_ready(&mut self) -> Result<(), EncodeError>;

    /// Produce the encoded video for `job`.
    fn encode(&mut self, job: &JobSpec) -> Result<Vec<u8>, EncodeError>;
}
