//! Survey facade.
//!
//! Ties validation, storage and aggregation together:
//! - [`CompiledSurvey`] - validate once, then submit and aggregate
//! - [`DocumentStore`] - the persistence collaborator, with [`InMemoryStore`]
//! - [`PipelineCache`] and [`ResultsCache`] - fingerprint-keyed caches

pub mod cache;
pub mod error;
pub mod store;
pub mod survey;

pub use cache::{PipelineCache, ResultsCache};
pub use error::SurveyError;
pub use store::{DocumentStore, InMemoryStore, StoreError};
pub use survey::{Accepted, CompiledSurvey};
