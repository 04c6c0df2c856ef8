//! Validation error types.
//!
//! Every error variant carries only the data it needs, exposes a stable
//! machine-readable `code()`, and serializes with that code as its `kind`.
//!
//! - `SpecError` - one violated constraint of a field specification
//! - `ConfigError` - one violation anywhere in a configuration
//! - `ValueError` - one bad answer to a known question
//! - `SubmissionError` - a rejected submission (wrong key set or bad answers)

use serde::Serialize;
use serde_json::Value;
use survey_model::FieldKind;
use thiserror::Error;

/// JSON type of a value, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueShape {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueShape {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl std::fmt::Display for ValueShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A violated constraint of a single field specification.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpecError {
    #[error("title must not be blank")]
    BlankTitle,

    #[error("{attribute} is {found} characters long (maximum {max})")]
    TooLong {
        attribute: &'static str,
        max: usize,
        found: usize,
    },

    #[error("regex `{pattern}` does not compile: {reason}")]
    InvalidRegex { pattern: String, reason: String },

    #[error("field has {found} options (allowed {min}..={max})")]
    OptionCount { min: usize, max: usize, found: usize },

    #[error("option {position} is blank")]
    BlankOption { position: usize },

    #[error("option `{value}` appears more than once")]
    DuplicateOption { value: String },

    #[error(
        "selection bounds min_select={min_select}, max_select={max_select} do not fit {options} options"
    )]
    SelectBounds {
        min_select: usize,
        max_select: usize,
        options: usize,
    },

    #[error("character bounds min_chars={min_chars}, max_chars={max_chars} exceed ceiling {ceiling} or are inverted")]
    CharBounds {
        min_chars: usize,
        max_chars: usize,
        ceiling: usize,
    },
}

impl SpecError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::BlankTitle => "blank_title",
            Self::TooLong { .. } => "too_long",
            Self::InvalidRegex { .. } => "invalid_regex",
            Self::OptionCount { .. } => "option_count",
            Self::BlankOption { .. } => "blank_option",
            Self::DuplicateOption { .. } => "duplicate_option",
            Self::SelectBounds { .. } => "select_bounds",
            Self::CharBounds { .. } => "char_bounds",
        }
    }
}

/// One violation found while validating a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigError {
    #[error("configuration must be a JSON object, found {found}")]
    NotAnObject { found: ValueShape },

    #[error("missing required key `{key}`")]
    MissingKey { key: String },

    #[error("unknown key `{key}`")]
    UnknownKey { key: String },

    #[error("`{key}` must be {expected}, found {found}")]
    WrongType {
        key: String,
        expected: ValueShape,
        found: ValueShape,
    },

    #[error("survey_name `{value}` must be {min}..={max} characters of [a-z0-9-] starting with a letter or digit")]
    InvalidSurveyName { value: String, min: usize, max: usize },

    #[error("`{key}` must not be blank")]
    BlankText { key: String },

    #[error("`{key}` is {found} characters long (maximum {max})")]
    TooLong { key: String, max: usize, found: usize },

    #[error("`{key}` is not a valid Unix timestamp: {value}")]
    InvalidTimestamp { key: String, value: String },

    #[error("end {end} is before start {start}")]
    EndBeforeStart { start: i64, end: i64 },

    #[error("configuration has {found} fields (allowed {min}..={max})")]
    FieldCount { min: usize, max: usize, found: usize },

    #[error("fields[{index}] is malformed: {reason}")]
    FieldShape { index: usize, reason: String },

    #[error("fields[{index}] ({field_kind} {identifier}): {error}")]
    Field {
        index: usize,
        identifier: u32,
        field_kind: FieldKind,
        error: SpecError,
    },

    #[error("identifier {identifier} is used by more than one field")]
    DuplicateIdentifier { identifier: u32 },

    #[error("identifier {identifier} is missing from the 0-based range")]
    MissingIdentifier { identifier: u32 },

    #[error("fields[{index}] has identifier {identifier}; identifiers must follow declaration order")]
    MisplacedIdentifier { index: usize, identifier: u32 },

    #[error("at most one email field may be verified, found {}", .identifiers.len())]
    MultipleVerifiedEmails { identifiers: Vec<u32> },
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAnObject { .. } => "not_an_object",
            Self::MissingKey { .. } => "missing_key",
            Self::UnknownKey { .. } => "unknown_key",
            Self::WrongType { .. } => "wrong_type",
            Self::InvalidSurveyName { .. } => "invalid_survey_name",
            Self::BlankText { .. } => "blank_text",
            Self::TooLong { .. } => "too_long",
            Self::InvalidTimestamp { .. } => "invalid_timestamp",
            Self::EndBeforeStart { .. } => "end_before_start",
            Self::FieldCount { .. } => "field_count",
            Self::FieldShape { .. } => "field_shape",
            Self::Field { .. } => "field",
            Self::DuplicateIdentifier { .. } => "duplicate_identifier",
            Self::MissingIdentifier { .. } => "missing_identifier",
            Self::MisplacedIdentifier { .. } => "misplaced_identifier",
            Self::MultipleVerifiedEmails { .. } => "multiple_verified_emails",
        }
    }

    /// Position in `fields` the error refers to, if any.
    pub fn field_index(&self) -> Option<usize> {
        match self {
            Self::FieldShape { index, .. }
            | Self::Field { index, .. }
            | Self::MisplacedIdentifier { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Header key or `fields` path the error refers to, for display.
    pub fn location(&self) -> String {
        match self {
            Self::NotAnObject { .. } => "$".to_string(),
            Self::MissingKey { key }
            | Self::UnknownKey { key }
            | Self::WrongType { key, .. }
            | Self::BlankText { key }
            | Self::TooLong { key, .. }
            | Self::InvalidTimestamp { key, .. } => key.clone(),
            Self::InvalidSurveyName { .. } => "survey_name".to_string(),
            Self::EndBeforeStart { .. } => "end".to_string(),
            Self::FieldShape { index, .. }
            | Self::Field { index, .. }
            | Self::MisplacedIdentifier { index, .. } => format!("fields[{index}]"),
            Self::FieldCount { .. }
            | Self::DuplicateIdentifier { .. }
            | Self::MissingIdentifier { .. }
            | Self::MultipleVerifiedEmails { .. } => "fields".to_string(),
        }
    }
}

/// A configuration was rejected. Carries every violation found.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("invalid configuration: {} error(s), first: {}", .errors.len(), first_message(.errors))]
pub struct InvalidConfigurationError {
    pub errors: Vec<ConfigError>,
}

impl InvalidConfigurationError {
    pub fn new(errors: Vec<ConfigError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[ConfigError] {
        &self.errors
    }

    /// Errors attributed to the field at `index`.
    pub fn for_field(&self, index: usize) -> impl Iterator<Item = &ConfigError> {
        self.errors
            .iter()
            .filter(move |error| error.field_index() == Some(index))
    }
}

fn first_message<E: std::fmt::Display>(errors: &[E]) -> String {
    errors
        .first()
        .map(ToString::to_string)
        .unwrap_or_else(|| "none".to_string())
}

/// A bad answer to a known question.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueError {
    #[error("expected {expected}, found {found}")]
    WrongType {
        expected: ValueShape,
        found: ValueShape,
    },

    #[error("value is {found} characters long (maximum {max})")]
    TooLong { max: usize, found: usize },

    #[error("value is not a valid email address")]
    InvalidEmail,

    #[error("value does not match pattern `{pattern}`")]
    PatternMismatch { pattern: String },

    #[error("this option must be checked")]
    RequiredUnchecked,

    #[error("`{value}` is not one of the configured options")]
    UnknownOption { value: String },

    #[error("element {position} must be a string, found {found}")]
    WrongElementType { position: usize, found: ValueShape },

    #[error("`{value}` is selected more than once")]
    DuplicateSelection { value: String },

    #[error("{found} options selected (allowed {min}..={max})")]
    SelectionCount { min: usize, max: usize, found: usize },

    #[error("{found} characters entered (allowed {min}..={max})")]
    CharCount { min: usize, max: usize, found: usize },
}

impl ValueError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::WrongType { .. } => "wrong_type",
            Self::TooLong { .. } => "too_long",
            Self::InvalidEmail => "invalid_email",
            Self::PatternMismatch { .. } => "pattern_mismatch",
            Self::RequiredUnchecked => "required_unchecked",
            Self::UnknownOption { .. } => "unknown_option",
            Self::WrongElementType { .. } => "wrong_element_type",
            Self::DuplicateSelection { .. } => "duplicate_selection",
            Self::SelectionCount { .. } => "selection_count",
            Self::CharCount { .. } => "char_count",
        }
    }

    pub(crate) fn wrong_type(expected: ValueShape, value: &Value) -> Self {
        Self::WrongType {
            expected,
            found: ValueShape::of(value),
        }
    }
}

/// A value error attributed to a field identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("field {identifier}: {error}")]
pub struct FieldError {
    pub identifier: u32,
    pub error: ValueError,
}

/// One or more answers were invalid. Carries every field-level violation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("invalid submission: {} field error(s), first: {}", .errors.len(), first_message(.errors))]
pub struct InvalidSubmissionError {
    pub errors: Vec<FieldError>,
}

impl InvalidSubmissionError {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// The error reported for `identifier`, if any.
    pub fn for_field(&self, identifier: u32) -> Option<&ValueError> {
        self.errors
            .iter()
            .find(|error| error.identifier == identifier)
            .map(|error| &error.error)
    }

    pub fn identifiers(&self) -> Vec<u32> {
        self.errors.iter().map(|error| error.identifier).collect()
    }
}

/// The submission answered the wrong set of questions.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("submission keys do not match the survey: missing {missing:?}, unexpected {unexpected:?}")]
pub struct ShapeMismatchError {
    /// Configured identifiers absent from the submission.
    pub missing: Vec<String>,
    /// Submission keys that are not configured identifiers.
    pub unexpected: Vec<String>,
}

/// Why a submission was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubmissionError {
    #[error("submission must be a JSON object, found {found}")]
    NotAnObject { found: ValueShape },

    #[error(transparent)]
    ShapeMismatch(#[from] ShapeMismatchError),

    #[error(transparent)]
    InvalidFields(#[from] InvalidSubmissionError),
}

impl SubmissionError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAnObject { .. } => "not_an_object",
            Self::ShapeMismatch(_) => "shape_mismatch",
            Self::InvalidFields(_) => "invalid_fields",
        }
    }

    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, Self::NotAnObject { .. } | Self::ShapeMismatch(_))
    }

    /// Field-level errors, empty for shape mismatches.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::InvalidFields(invalid) => invalid.errors(),
            Self::NotAnObject { .. } | Self::ShapeMismatch(_) => &[],
        }
    }
}
