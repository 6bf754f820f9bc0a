/// Convenience result type used across slidereel.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy for building and running batches.
///
/// Per-job encode failures are not represented here: they are recovered into
/// [`JobOutcome::Failure`](crate::JobOutcome::Failure) and never abort a batch.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid user-provided rows, theme or manifest values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Fewer of the selected rows are complete than were requested.
    #[error("incomplete input: {valid} of the first {requested} rows have a title and content")]
    IncompleteInput {
        /// Number of rows the caller asked for.
        requested: usize,
        /// Number of complete rows among them.
        valid: usize,
    },

    /// The encoding engine could not be prepared; no job was run.
    #[error("engine unavailable: {0}")]
    EngineUnavailable(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::EngineUnavailable`] value.
    pub fn engine_unavailable(msg: impl Into<String>) -> Self {
        Self::EngineUnavailable(msg.into())
    }

    /// Build a [`ReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
