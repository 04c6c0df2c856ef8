//! Pipeline compilation.

use survey_model::{AggregateRule, Configuration, OptionCounts};
use survey_validate::FieldTypeRegistry;
use tracing::debug;

use crate::pipeline::{Pipeline, RawAggregate, RawValue, Reduce, Stage};

/// Compile the aggregation pipeline of `configuration`.
pub fn compile_aggregation_pipeline(configuration: &Configuration) -> Pipeline {
    PipelineCompiler::new().compile(configuration)
}

/// Builds one stage per field from the registry's aggregation rules.
#[derive(Debug, Clone, Default)]
pub struct PipelineCompiler {
    registry: FieldTypeRegistry,
}

impl PipelineCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compile(&self, configuration: &Configuration) -> Pipeline {
        let mut stages = Vec::with_capacity(configuration.fields().len());
        let mut defaults = Vec::with_capacity(configuration.fields().len());
        for spec in configuration.fields() {
            let key = spec.submission_key();
            let rule = self.registry.aggregate_rule(spec);
            let (op, default) = match rule {
                AggregateRule::SumTrue => (Reduce::SumTrue, RawValue::Sum(0)),
                AggregateRule::CountPerOption { options, flatten } => (
                    Reduce::CountByValue { unwind: flatten },
                    RawValue::Counts(OptionCounts::zeroed(&options)),
                ),
                AggregateRule::CountOnly => (Reduce::Ignore, RawValue::Null),
            };
            defaults.push((key.clone(), default));
            stages.push(Stage {
                output: key.clone(),
                key,
                op,
            });
        }
        debug!(
            survey = configuration.survey_name(),
            stages = stages.len(),
            "compiled aggregation pipeline"
        );
        Pipeline::new(
            stages,
            RawAggregate {
                count: 0,
                fields: defaults,
            },
        )
    }
}
