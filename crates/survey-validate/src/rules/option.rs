//! Option (checkbox) field rules.

use serde_json::Value;
use survey_model::{AggregateRule, OptionField};

use crate::error::{SpecError, ValueError, ValueShape};

pub(crate) fn spec_errors(_field: &OptionField) -> Vec<SpecError> {
    Vec::new()
}

pub(crate) fn aggregate_rule(_field: &OptionField) -> AggregateRule {
    AggregateRule::SumTrue
}

/// Value must be exactly a boolean; required fields only accept `true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRule {
    required: bool,
}

impl OptionRule {
    pub fn new(field: &OptionField) -> Self {
        Self {
            required: field.required,
        }
    }

    pub fn check(&self, value: &Value) -> Result<(), ValueError> {
        match value {
            Value::Bool(false) if self.required => Err(ValueError::RequiredUnchecked),
            Value::Bool(_) => Ok(()),
            other => Err(ValueError::wrong_type(ValueShape::Bool, other)),
        }
    }
}
