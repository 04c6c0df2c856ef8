//! Survey schema validation.
//!
//! - [`FieldTypeRegistry`] - spec, value and aggregation rules per field kind
//! - [`ConfigurationValidator`] - turns an untyped document into a [`Configuration`]
//! - [`SubmissionValidatorFactory`] - compiles a reusable [`SubmissionValidator`]
//!
//! [`Configuration`]: survey_model::Configuration

pub mod config;
pub mod error;
pub mod registry;
pub mod rules;
pub mod submission;

pub use config::{CONFIGURATION_KEYS, ConfigurationValidator, validate_configuration};
pub use error::{
    ConfigError, FieldError, InvalidConfigurationError, InvalidSubmissionError,
    ShapeMismatchError, SpecError, SubmissionError, ValueError, ValueShape,
};
pub use registry::FieldTypeRegistry;
pub use rules::FieldRule;
pub use submission::{
    SubmissionValidator, SubmissionValidatorFactory, compile_submission_validator,
};
