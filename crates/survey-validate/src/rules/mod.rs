//! Per-kind field rules.
//!
//! Each kind module owns the three rule tables of its field kind:
//! - `spec_errors` - constraints on the field specification itself
//! - `new` + `check` - the compiled value rule applied to submissions
//! - `aggregate_rule` - how answers reduce into results
//!
//! The registry and the compiled submission validator both go through these
//! modules, so every rule exists exactly once.

mod choice;
mod email;
mod option;
mod text;

pub use choice::{RadioRule, SelectionRule};
pub use email::{EMAIL_REGEX, EmailRule};
pub use option::OptionRule;
pub use text::TextRule;

use serde_json::Value;
use survey_model::{AggregateRule, FieldSpec, Limits};

use crate::error::{SpecError, ValueError};

/// Compiled value rule of one field, bound to its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRule {
    Email(EmailRule),
    Option(OptionRule),
    Radio(RadioRule),
    Selection(SelectionRule),
    Text(TextRule),
}

impl FieldRule {
    /// Bind the value rule for `spec`.
    pub fn compile(spec: &FieldSpec, limits: &Limits) -> Self {
        match spec {
            FieldSpec::Email(field) => Self::Email(EmailRule::new(field, limits)),
            FieldSpec::Option(field) => Self::Option(OptionRule::new(field)),
            FieldSpec::Radio(field) => Self::Radio(RadioRule::new(field)),
            FieldSpec::Selection(field) => Self::Selection(SelectionRule::new(field)),
            FieldSpec::Text(field) => Self::Text(TextRule::new(field)),
        }
    }

    /// Check one submitted value.
    pub fn check(&self, value: &Value) -> Result<(), ValueError> {
        match self {
            Self::Email(rule) => rule.check(value),
            Self::Option(rule) => rule.check(value),
            Self::Radio(rule) => rule.check(value),
            Self::Selection(rule) => rule.check(value),
            Self::Text(rule) => rule.check(value),
        }
    }
}

/// Every violated constraint of `spec`, common attributes first.
pub(crate) fn spec_errors(spec: &FieldSpec, limits: &Limits) -> Vec<SpecError> {
    let mut errors = common_spec_errors(spec, limits);
    errors.extend(match spec {
        FieldSpec::Email(field) => email::spec_errors(field, limits),
        FieldSpec::Option(field) => option::spec_errors(field),
        FieldSpec::Radio(field) => choice::radio_spec_errors(field, limits),
        FieldSpec::Selection(field) => choice::selection_spec_errors(field, limits),
        FieldSpec::Text(field) => text::spec_errors(field, limits),
    });
    errors
}

pub(crate) fn aggregate_rule(spec: &FieldSpec) -> AggregateRule {
    match spec {
        FieldSpec::Email(field) => email::aggregate_rule(field),
        FieldSpec::Option(field) => option::aggregate_rule(field),
        FieldSpec::Radio(field) => choice::radio_aggregate_rule(field),
        FieldSpec::Selection(field) => choice::selection_aggregate_rule(field),
        FieldSpec::Text(field) => text::aggregate_rule(field),
    }
}

/// Constraints shared by every kind: title and description.
fn common_spec_errors(spec: &FieldSpec, limits: &Limits) -> Vec<SpecError> {
    let mut errors = Vec::new();
    let title = spec.title();
    if title.trim().is_empty() {
        errors.push(SpecError::BlankTitle);
    }
    push_if_too_long(&mut errors, "title", title, limits.title_max);
    push_if_too_long(
        &mut errors,
        "description",
        spec.description(),
        limits.description_max,
    );
    errors
}

fn push_if_too_long(
    errors: &mut Vec<SpecError>,
    attribute: &'static str,
    value: &str,
    max: usize,
) {
    let found = char_len(value);
    if found > max {
        errors.push(SpecError::TooLong {
            attribute,
            max,
            found,
        });
    }
}

/// Length in characters (not bytes).
fn char_len(value: &str) -> usize {
    value.chars().count()
}
