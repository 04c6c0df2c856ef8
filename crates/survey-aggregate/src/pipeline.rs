//! Store-agnostic aggregation pipelines and their in-memory executor.
//!
//! A [`Pipeline`] is a serializable description: one [`Stage`] per field plus
//! the document returned for an empty collection. A store adapter may
//! translate the stages into native aggregation calls; [`Pipeline::run`]
//! executes them in memory, reducing all stages together in a single pass.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use survey_model::{OptionCounts, ordered_map};
use tracing::trace;

use crate::error::AggregationFailure;

/// Reduction applied to one submission key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Reduce {
    /// Count `true` answers.
    SumTrue,
    /// Group answers by value and count each group. With `unwind`, each
    /// answer is a list and every element is one occurrence.
    CountByValue { unwind: bool },
    /// Only contributes to the overall count.
    Ignore,
}

/// One reduction: read `key` from every submission, write to `output`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub output: String,
    pub key: String,
    #[serde(flatten)]
    pub op: Reduce,
}

/// Raw value of one stage as produced by a backend.
///
/// Counts list the configured options first, in configuration order, when
/// the backend was seeded with the defaults; observed values that are not
/// configured follow in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Sum(u64),
    Counts(OptionCounts),
    Null,
}

/// Raw output of a pipeline run, before formatting.
///
/// Outputs keep stage order, which is field declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAggregate {
    pub count: u64,
    #[serde(with = "ordered_map")]
    pub fields: Vec<(String, RawValue)>,
}

impl RawAggregate {
    pub fn get(&self, output: &str) -> Option<&RawValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == output)
            .map(|(_, value)| value)
    }

    /// Remove and return the value of `output`.
    pub fn take(&mut self, output: &str) -> Option<RawValue> {
        let position = self.fields.iter().position(|(name, _)| name == output)?;
        Some(self.fields.remove(position).1)
    }
}

/// A collection of stored submissions that can be scanned once.
pub trait SubmissionSource {
    /// Call `visit` for every submission, in any order.
    fn scan(&self, visit: &mut dyn FnMut(&Value)) -> Result<(), AggregationFailure>;
}

impl SubmissionSource for [Value] {
    fn scan(&self, visit: &mut dyn FnMut(&Value)) -> Result<(), AggregationFailure> {
        self.iter().for_each(visit);
        Ok(())
    }
}

impl SubmissionSource for Vec<Value> {
    fn scan(&self, visit: &mut dyn FnMut(&Value)) -> Result<(), AggregationFailure> {
        self.as_slice().scan(visit)
    }
}

impl<const N: usize> SubmissionSource for [Value; N] {
    fn scan(&self, visit: &mut dyn FnMut(&Value)) -> Result<(), AggregationFailure> {
        self.as_slice().scan(visit)
    }
}

/// Compiled aggregation of one configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    stages: Vec<Stage>,
    defaults: RawAggregate,
}

impl Pipeline {
    pub fn new(stages: Vec<Stage>, defaults: RawAggregate) -> Self {
        Self { stages, defaults }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Result for an empty collection.
    pub fn defaults(&self) -> &RawAggregate {
        &self.defaults
    }

    /// Execute all stages over `source` in one pass.
    pub fn run<S>(&self, source: &S) -> Result<RawAggregate, AggregationFailure>
    where
        S: SubmissionSource + ?Sized,
    {
        let mut accumulators: Vec<Accumulator> = self
            .stages
            .iter()
            .map(|stage| Accumulator::seeded(stage.op, self.defaults.get(&stage.output)))
            .collect();
        let mut count = 0u64;
        source.scan(&mut |submission| {
            count += 1;
            for (stage, accumulator) in self.stages.iter().zip(accumulators.iter_mut()) {
                if let Some(value) = submission.get(&stage.key) {
                    accumulator.add(stage.op, value);
                }
            }
        })?;
        trace!(count, stages = self.stages.len(), "pipeline executed");

        if count == 0 {
            return Ok(self.defaults.clone());
        }
        let fields = self
            .stages
            .iter()
            .zip(accumulators)
            .map(|(stage, accumulator)| (stage.output.clone(), accumulator.finish()))
            .collect();
        Ok(RawAggregate { count, fields })
    }
}

enum Accumulator {
    Sum(u64),
    Counts(OptionCounts),
    Nothing,
}

impl Accumulator {
    /// Counters start from the zero-filled defaults so that configured
    /// options keep their order.
    fn seeded(op: Reduce, default: Option<&RawValue>) -> Self {
        match (op, default) {
            (Reduce::SumTrue, _) => Self::Sum(0),
            (Reduce::CountByValue { .. }, Some(RawValue::Counts(counts))) => {
                Self::Counts(counts.clone())
            }
            (Reduce::CountByValue { .. }, _) => Self::Counts(OptionCounts::new()),
            (Reduce::Ignore, _) => Self::Nothing,
        }
    }

    fn add(&mut self, op: Reduce, value: &Value) {
        match (self, op) {
            (Self::Sum(sum), Reduce::SumTrue) => {
                if value.as_bool() == Some(true) {
                    *sum += 1;
                }
            }
            (Self::Counts(counts), Reduce::CountByValue { unwind: false }) => {
                if let Some(option) = value.as_str() {
                    counts.increment(option);
                }
            }
            (Self::Counts(counts), Reduce::CountByValue { unwind: true }) => {
                for option in value.as_array().into_iter().flatten().filter_map(Value::as_str) {
                    counts.increment(option);
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> RawValue {
        match self {
            Self::Sum(sum) => RawValue::Sum(sum),
            Self::Counts(counts) => RawValue::Counts(counts),
            Self::Nothing => RawValue::Null,
        }
    }
}
