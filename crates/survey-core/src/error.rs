//! Error types for the survey facade.

use serde_json::Value;
use survey_aggregate::AggregationFailure;
use survey_validate::{InvalidConfigurationError, SubmissionError};
use thiserror::Error;

use crate::store::StoreError;

/// Errors raised by [`CompiledSurvey`](crate::CompiledSurvey) operations.
#[derive(Debug, Error)]
pub enum SurveyError {
    #[error(transparent)]
    InvalidConfiguration(#[from] InvalidConfigurationError),

    #[error(transparent)]
    InvalidSubmission(#[from] SubmissionError),

    #[error(transparent)]
    Aggregation(#[from] AggregationFailure),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SurveyError {
    /// Machine-readable error category.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration(_) => "invalid_configuration",
            Self::InvalidSubmission(err) => err.code(),
            Self::Aggregation(_) => "aggregation_failed",
            Self::Store(_) => "store_failed",
        }
    }

    /// Client-facing error body for validation failures.
    ///
    /// Backend failures carry no details beyond their code.
    pub fn to_json(&self) -> Value {
        let details = match self {
            Self::InvalidConfiguration(err) => serde_json::to_value(err).ok(),
            Self::InvalidSubmission(err) => serde_json::to_value(err).ok(),
            Self::Aggregation(_) | Self::Store(_) => None,
        };
        serde_json::json!({
            "code": self.code(),
            "message": self.to_string(),
            "details": details,
        })
    }
}
