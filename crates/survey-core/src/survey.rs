//! A configuration compiled once into everything needed to serve it.

use std::sync::Arc;

use serde_json::Value;
use survey_aggregate::{Pipeline, ResultsFormatter};
use survey_model::{Configuration, Limits, Results};
use survey_validate::{ConfigurationValidator, SubmissionValidator, SubmissionValidatorFactory};
use tracing::{debug, info, info_span};

use crate::cache::{PipelineCache, ResultsCache};
use crate::error::SurveyError;
use crate::store::DocumentStore;

/// Outcome of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    /// Address that must receive a verification token, if the survey
    /// verifies an email field.
    pub verification_address: Option<String>,
}

/// Validated configuration with its compiled validator and pipeline.
///
/// Immutable and `Send + Sync`; share it between request handlers.
#[derive(Debug, Clone)]
pub struct CompiledSurvey {
    configuration: Arc<Configuration>,
    validator: SubmissionValidator,
    pipeline: Arc<Pipeline>,
    formatter: ResultsFormatter,
}

impl CompiledSurvey {
    /// Validate `candidate` and compile it with default limits.
    pub fn new(candidate: &Value) -> Result<Self, SurveyError> {
        Self::with_limits(candidate, Limits::default())
    }

    pub fn with_limits(candidate: &Value, limits: Limits) -> Result<Self, SurveyError> {
        let configuration =
            ConfigurationValidator::with_limits(limits.clone()).validate(candidate)?;
        Ok(Self::from_configuration(configuration, limits))
    }

    /// Compile an already validated configuration.
    pub fn from_configuration(configuration: Configuration, limits: Limits) -> Self {
        Self::compile(configuration, limits, &PipelineCache::new())
    }

    /// Compile, taking the pipeline from `pipelines`.
    pub fn compile(
        configuration: Configuration,
        limits: Limits,
        pipelines: &PipelineCache,
    ) -> Self {
        let validator = SubmissionValidatorFactory::with_limits(limits).compile(&configuration);
        let pipeline = pipelines.get_or_compile(&configuration);
        Self {
            configuration: Arc::new(configuration),
            validator,
            pipeline,
            formatter: ResultsFormatter::new(),
        }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn validator(&self) -> &SubmissionValidator {
        &self.validator
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn name(&self) -> &str {
        self.configuration.survey_name()
    }

    /// Validate `submission` and append it to the store.
    ///
    /// Rejected submissions are never inserted.
    pub fn submit(
        &self,
        store: &dyn DocumentStore,
        submission: &Value,
    ) -> Result<Accepted, SurveyError> {
        self.validator.validate(submission)?;
        let verification_address = self
            .validator
            .verification_address(submission)
            .map(str::to_string);
        store.insert(self.name(), submission.clone())?;
        debug!(survey = self.name(), "submission stored");
        Ok(Accepted {
            verification_address,
        })
    }

    /// Results, served from `cache` when present.
    ///
    /// A failed computation leaves the cache untouched.
    pub fn results(
        &self,
        store: &dyn DocumentStore,
        cache: &ResultsCache,
    ) -> Result<Results, SurveyError> {
        if let Some(results) = cache.get(&self.configuration) {
            debug!(survey = self.name(), "results cache hit");
            return Ok(results);
        }
        let results = self.recompute(store)?;
        cache.store(&self.configuration, results.clone());
        Ok(results)
    }

    /// Compute results from the store, ignoring any cache.
    pub fn recompute(&self, store: &dyn DocumentStore) -> Result<Results, SurveyError> {
        let _span = info_span!("aggregate", survey = self.name()).entered();
        let raw = store.aggregate(self.name(), &self.pipeline)?;
        let results = self.formatter.format(raw, &self.configuration);
        info!(count = results.count, "results computed");
        Ok(results)
    }
}
