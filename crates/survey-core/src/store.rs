//! Document store contract and an in-memory implementation.
//!
//! The store is an external collaborator. The core only needs append-only
//! insertion, a scan, a count, bulk deletion and an aggregation primitive.
//! The default [`DocumentStore::aggregate`] runs the pipeline in memory over
//! [`DocumentStore::find`]; stores with a native aggregation engine override
//! it and translate the pipeline's stages.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;
use survey_aggregate::{AggregationFailure, Pipeline, RawAggregate};
use thiserror::Error;
use tracing::debug;

/// A store operation failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Persistence of submissions, keyed by survey name.
pub trait DocumentStore: Send + Sync {
    /// Append one accepted submission.
    fn insert(&self, survey: &str, submission: Value) -> Result<(), StoreError>;

    /// All submissions of `survey`, in insertion order.
    fn find(&self, survey: &str) -> Result<Vec<Value>, StoreError>;

    /// Number of submissions of `survey`.
    fn count(&self, survey: &str) -> Result<u64, StoreError>;

    /// Remove all submissions of `survey`, returning how many were removed.
    fn delete_all(&self, survey: &str) -> Result<u64, StoreError>;

    /// Execute `pipeline` over the submissions of `survey`.
    fn aggregate(
        &self,
        survey: &str,
        pipeline: &Pipeline,
    ) -> Result<RawAggregate, AggregationFailure> {
        let submissions = self
            .find(survey)
            .map_err(|err| AggregationFailure::new("document store", err))?;
        pipeline.run(&submissions)
    }
}

/// Append-only store guarded by a read-write lock.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for InMemoryStore {
    fn insert(&self, survey: &str, submission: Value) -> Result<(), StoreError> {
        let mut collections = self.collections.write().map_err(|_| StoreError::Poisoned)?;
        collections
            .entry(survey.to_string())
            .or_default()
            .push(submission);
        Ok(())
    }

    fn find(&self, survey: &str) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.read().map_err(|_| StoreError::Poisoned)?;
        Ok(collections.get(survey).cloned().unwrap_or_default())
    }

    fn count(&self, survey: &str) -> Result<u64, StoreError> {
        let collections = self.collections.read().map_err(|_| StoreError::Poisoned)?;
        Ok(collections.get(survey).map_or(0, |items| items.len() as u64))
    }

    fn delete_all(&self, survey: &str) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().map_err(|_| StoreError::Poisoned)?;
        let removed = collections.remove(survey).map_or(0, |items| items.len() as u64);
        debug!(survey, removed, "deleted submissions");
        Ok(removed)
    }

    /// Runs the pipeline under the read lock, without copying submissions.
    fn aggregate(
        &self,
        survey: &str,
        pipeline: &Pipeline,
    ) -> Result<RawAggregate, AggregationFailure> {
        let collections = self
            .collections
            .read()
            .map_err(|_| AggregationFailure::new("memory", StoreError::Poisoned))?;
        match collections.get(survey) {
            Some(submissions) => pipeline.run(submissions.as_slice()),
            None => pipeline.run(&[] as &[Value]),
        }
    }
}
