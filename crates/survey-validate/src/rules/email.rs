//! Email field rules.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use survey_model::{AggregateRule, EmailField, Limits, Pattern};

use super::{char_len, push_if_too_long};
use crate::error::{SpecError, ValueError, ValueShape};

/// General address shape: local part, `@`, and a dotted domain of labels
/// that neither start nor end with a hyphen.
pub static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
    )
    .expect("Invalid email regex")
});

pub(crate) fn spec_errors(field: &EmailField, limits: &Limits) -> Vec<SpecError> {
    let mut errors = Vec::new();
    push_if_too_long(&mut errors, "hint", &field.hint, limits.hint_max);
    push_if_too_long(&mut errors, "regex", field.regex.as_str(), limits.regex_max);
    if let Some(reason) = field.regex.error() {
        errors.push(SpecError::InvalidRegex {
            pattern: field.regex.as_str().to_string(),
            reason: reason.to_string(),
        });
    }
    errors
}

pub(crate) fn aggregate_rule(_field: &EmailField) -> AggregateRule {
    AggregateRule::CountOnly
}

/// Address must be a bounded string matching both the general email shape
/// and the field's own pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailRule {
    pattern: Pattern,
    max_len: usize,
}

impl EmailRule {
    pub fn new(field: &EmailField, limits: &Limits) -> Self {
        Self {
            pattern: field.regex.clone(),
            max_len: limits.email_max,
        }
    }

    pub fn check(&self, value: &Value) -> Result<(), ValueError> {
        let Some(address) = value.as_str() else {
            return Err(ValueError::wrong_type(ValueShape::String, value));
        };
        let found = char_len(address);
        if found > self.max_len {
            return Err(ValueError::TooLong {
                max: self.max_len,
                found,
            });
        }
        if !EMAIL_REGEX.is_match(address) {
            return Err(ValueError::InvalidEmail);
        }
        if !self.pattern.is_match(address) {
            return Err(ValueError::PatternMismatch {
                pattern: self.pattern.as_str().to_string(),
            });
        }
        Ok(())
    }
}
