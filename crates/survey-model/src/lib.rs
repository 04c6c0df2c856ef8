//! Data model for survey configurations, submissions and results.
//!
//! This crate holds the plain types shared by the validation, aggregation and
//! CLI crates:
//! - `FieldSpec` - one typed question, a closed union over the five field kinds
//! - `Configuration` - the validated survey definition (header + ordered fields)
//! - `Results` - the zero-filled aggregate document returned to survey owners
//! - `Limits` - every bound the validators enforce

pub mod configuration;
pub mod field;
pub mod limits;
pub mod ordered_map;
pub mod pattern;
pub mod results;

pub use configuration::{Configuration, SurveyHeader};
pub use field::{
    EmailField, FieldKind, FieldSpec, OptionField, RadioField, SelectionField, TextField,
};
pub use limits::Limits;
pub use pattern::Pattern;
pub use results::{AggregateRule, FieldAggregate, OptionCounts, Results};

/// Submission key for a field identifier.
///
/// Submissions are JSON objects keyed by the stringified identifier.
pub fn submission_key(identifier: u32) -> String {
    identifier.to_string()
}
