use std::{path::Path, sync::Arc};

use anyhow::Context as _;

use crate::foundation::{core::JobId, digest::sha256_hex, error::ReelResult};

/// Content-addressed handle for an artifact: `sha256:<hex>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct ArtifactHandle(String);

impl ArtifactHandle {
    pub fn for_bytes(bytes: &[u8]) -> Self {
        Self(format!("sha256:{}", sha256_hex(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ArtifactHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encoded video produced by one successful job.
#[derive(Clone, PartialEq, Eq)]
pub struct Artifact {
    handle: ArtifactHandle,
    bytes: Arc<[u8]>,
}

impl Artifact {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            handle: ArtifactHandle::for_bytes(&bytes),
            bytes: bytes.into(),
        }
    }

    pub fn handle(&self) -> &ArtifactHandle {
        &self.handle
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn write_to(&self, path: &Path) -> ReelResult<()> {
        std::fs::write(path, &self.bytes)
            .with_context(|| format!("write artifact '{}'", path.display()))?;
        Ok(())
    }
}

impl std::fmt::Debug for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifact")
            .field("handle", &self.handle)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Result of running one job. Failures are data, not errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JobOutcome {
    Success {
        job: JobId,
        title: String,
        artifact: Artifact,
    },
    Failure {
        job: JobId,
        title: String,
        reason: String,
    },
}

impl JobOutcome {
    pub fn job_id(&self) -> JobId {
        match self {
            JobOutcome::Success { job, .. } | JobOutcome::Failure { job, .. } => *job,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            JobOutcome::Success { title, .. } | JobOutcome::Failure { title, .. } => title,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Success { .. })
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        match self {
            JobOutcome::Success { artifact, .. } => Some(artifact),
            JobOutcome::Failure { .. } => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            JobOutcome::Success { .. } => None,
            JobOutcome::Failure { reason, .. } => Some(reason),
        }
    }

    /// `"<title>.mp4"`. The title is used verbatim and may not be filesystem-safe.
    pub fn suggested_file_name(&self) -> String {
        format!("{}.mp4", self.title())
    }
}
