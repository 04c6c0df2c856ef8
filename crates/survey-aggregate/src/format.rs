//! Results formatting.
//!
//! Raw aggregates only contain what a backend observed. Formatting
//! reconciles them with the configuration: every choice field lists all of
//! its configured options in configuration order, zero-filled, and `data`
//! follows field declaration order.

use survey_model::{AggregateRule, Configuration, FieldAggregate, OptionCounts, Results};
use survey_validate::FieldTypeRegistry;
use tracing::warn;

use crate::pipeline::{RawAggregate, RawValue};

/// Format `raw` into the canonical results document of `configuration`.
pub fn format_results(raw: RawAggregate, configuration: &Configuration) -> Results {
    ResultsFormatter::new().format(raw, configuration)
}

#[derive(Debug, Clone, Default)]
pub struct ResultsFormatter {
    registry: FieldTypeRegistry,
}

impl ResultsFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format(&self, mut raw: RawAggregate, configuration: &Configuration) -> Results {
        let data = configuration
            .fields()
            .iter()
            .map(|spec| {
                let identifier = spec.identifier();
                let value = raw.take(&spec.submission_key());
                let aggregate = match self.registry.aggregate_rule(spec) {
                    AggregateRule::SumTrue => FieldAggregate::Sum(sum(identifier, value)),
                    AggregateRule::CountPerOption { options, .. } => {
                        FieldAggregate::Counts(counts(identifier, &options, value))
                    }
                    AggregateRule::CountOnly => FieldAggregate::Unaggregated,
                };
                (identifier, aggregate)
            })
            .collect();
        if !raw.fields.is_empty() {
            warn!(
                outputs = ?raw.fields.iter().map(|(output, _)| output).collect::<Vec<_>>(),
                "raw aggregate has outputs for unknown fields"
            );
        }
        Results {
            count: raw.count,
            data,
        }
    }
}

fn sum(identifier: u32, value: Option<RawValue>) -> u64 {
    match value {
        Some(RawValue::Sum(sum)) => sum,
        None | Some(RawValue::Null) => 0,
        Some(RawValue::Counts(_)) => {
            warn!(identifier, "expected a sum, found counts; using 0");
            0
        }
    }
}

fn counts(identifier: u32, options: &[String], value: Option<RawValue>) -> OptionCounts {
    let mut counts = OptionCounts::zeroed(options);
    match value {
        Some(RawValue::Counts(observed)) => {
            for (option, count) in observed.iter() {
                if !counts.set(option, count) {
                    warn!(
                        identifier,
                        option = %option,
                        count,
                        "dropping count for unconfigured option"
                    );
                }
            }
        }
        None | Some(RawValue::Null) => {}
        Some(RawValue::Sum(_)) => {
            warn!(identifier, "expected counts, found a sum; using zeros");
        }
    }
    counts
}
