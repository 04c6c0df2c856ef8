//! Survey aggregation.
//!
//! Compiles a configuration into a store-agnostic [`Pipeline`], runs it in
//! memory over any [`SubmissionSource`], and formats the raw output into the
//! canonical [`Results`](survey_model::Results) document.

pub mod compile;
pub mod error;
pub mod format;
pub mod pipeline;

pub use compile::{PipelineCompiler, compile_aggregation_pipeline};
pub use error::{AggregationFailure, BoxError};
pub use format::{ResultsFormatter, format_results};
pub use pipeline::{Pipeline, RawAggregate, RawValue, Reduce, Stage, SubmissionSource};

use survey_model::{Configuration, Results};

/// Compile, run and format in one step.
pub fn aggregate<S>(
    configuration: &Configuration,
    source: &S,
) -> Result<Results, AggregationFailure>
where
    S: SubmissionSource + ?Sized,
{
    let raw = compile_aggregation_pipeline(configuration).run(source)?;
    Ok(format_results(raw, configuration))
}
