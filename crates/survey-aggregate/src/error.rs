//! Aggregation errors.

use std::error::Error as StdError;

use thiserror::Error;

/// Boxed cause of an aggregation failure.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Aggregation could not be executed.
///
/// Opaque to the pipeline: the backend that ran it names itself and wraps
/// its own error. Failures are propagated as-is and never retried.
#[derive(Debug, Error)]
#[error("aggregation failed in {backend}: {source}")]
pub struct AggregationFailure {
    backend: String,
    #[source]
    source: BoxError,
}

impl AggregationFailure {
    pub fn new(backend: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            backend: backend.into(),
            source: source.into(),
        }
    }

    /// Name of the backend that failed.
    pub fn backend(&self) -> &str {
        &self.backend
    }
}
