//! Text field rules.

use serde_json::Value;
use survey_model::{AggregateRule, Limits, TextField};

use super::char_len;
use crate::error::{SpecError, ValueError, ValueShape};

pub(crate) fn spec_errors(field: &TextField, limits: &Limits) -> Vec<SpecError> {
    if field.min_chars > field.max_chars || field.max_chars > limits.text_ceiling {
        vec![SpecError::CharBounds {
            min_chars: field.min_chars,
            max_chars: field.max_chars,
            ceiling: limits.text_ceiling,
        }]
    } else {
        Vec::new()
    }
}

pub(crate) fn aggregate_rule(_field: &TextField) -> AggregateRule {
    AggregateRule::CountOnly
}

/// Value must be a string with a character count in `[min_chars, max_chars]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRule {
    min_chars: usize,
    max_chars: usize,
}

impl TextRule {
    pub fn new(field: &TextField) -> Self {
        Self {
            min_chars: field.min_chars,
            max_chars: field.max_chars,
        }
    }

    pub fn check(&self, value: &Value) -> Result<(), ValueError> {
        let Some(text) = value.as_str() else {
            return Err(ValueError::wrong_type(ValueShape::String, value));
        };
        let found = char_len(text);
        if found < self.min_chars || found > self.max_chars {
            return Err(ValueError::CharCount {
                min: self.min_chars,
                max: self.max_chars,
                found,
            });
        }
        Ok(())
    }
}
