//! Compiled submission validators.

use std::collections::BTreeSet;

use serde_json::Value;
use survey_model::{Configuration, Limits};
use tracing::{debug, trace};

use crate::error::{
    FieldError, InvalidSubmissionError, ShapeMismatchError, SubmissionError, ValueShape,
};
use crate::registry::FieldTypeRegistry;
use crate::rules::FieldRule;

/// Compile a submission validator with default limits.
pub fn compile_submission_validator(configuration: &Configuration) -> SubmissionValidator {
    SubmissionValidatorFactory::new().compile(configuration)
}

/// Builds [`SubmissionValidator`]s from validated configurations.
#[derive(Debug, Clone, Default)]
pub struct SubmissionValidatorFactory {
    registry: FieldTypeRegistry,
}

impl SubmissionValidatorFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self {
            registry: FieldTypeRegistry::with_limits(limits),
        }
    }

    /// Bind one rule per configured field, in declaration order.
    pub fn compile(&self, configuration: &Configuration) -> SubmissionValidator {
        let fields = configuration
            .fields()
            .iter()
            .map(|spec| BoundRule {
                identifier: spec.identifier(),
                key: spec.submission_key(),
                rule: self.registry.rule_for(spec),
            })
            .collect();
        let verified_key = configuration
            .verified_email_field()
            .map(|field| survey_model::submission_key(field.identifier));
        SubmissionValidator {
            fields,
            verified_key,
        }
    }
}

/// A field rule bound to the submission key it checks.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BoundRule {
    identifier: u32,
    key: String,
    rule: FieldRule,
}

/// Checks submissions against one configuration.
///
/// Holds no reference to the configuration; compiling the same configuration
/// twice yields equal validators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionValidator {
    fields: Vec<BoundRule>,
    verified_key: Option<String>,
}

impl SubmissionValidator {
    /// Accept or reject `submission`.
    ///
    /// A wrong key set is rejected before any value is looked at. Otherwise
    /// every field is checked and all failures are returned together.
    pub fn validate(&self, submission: &Value) -> Result<(), SubmissionError> {
        let Some(object) = submission.as_object() else {
            return Err(SubmissionError::NotAnObject {
                found: ValueShape::of(submission),
            });
        };

        let expected: BTreeSet<&str> = self.fields.iter().map(|field| field.key.as_str()).collect();
        let actual: BTreeSet<&str> = object.keys().map(String::as_str).collect();
        if expected != actual {
            let mismatch = ShapeMismatchError {
                missing: self
                    .fields
                    .iter()
                    .filter(|field| !actual.contains(field.key.as_str()))
                    .map(|field| field.key.clone())
                    .collect(),
                unexpected: actual
                    .difference(&expected)
                    .map(|key| (*key).to_string())
                    .collect(),
            };
            debug!(
                missing = mismatch.missing.len(),
                unexpected = mismatch.unexpected.len(),
                "submission rejected: key mismatch"
            );
            return Err(mismatch.into());
        }

        let mut errors = Vec::new();
        for field in &self.fields {
            let Some(value) = object.get(&field.key) else {
                continue;
            };
            if let Err(error) = field.rule.check(value) {
                trace!(identifier = field.identifier, %value, "rejected value");
                errors.push(FieldError {
                    identifier: field.identifier,
                    error,
                });
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            debug!(
                errors = errors.len(),
                identifiers = ?errors.iter().map(|e| e.identifier).collect::<Vec<_>>(),
                "submission rejected: invalid fields"
            );
            Err(InvalidSubmissionError { errors }.into())
        }
    }

    /// The address that needs a verification token, if the survey has a
    /// verified email field and `submission` answers it with a string.
    pub fn verification_address<'a>(&self, submission: &'a Value) -> Option<&'a str> {
        let key = self.verified_key.as_deref()?;
        submission.get(key)?.as_str()
    }

    /// Configured identifiers in declaration order.
    pub fn identifiers(&self) -> impl Iterator<Item = u32> + '_ {
        self.fields.iter().map(|field| field.identifier)
    }

    /// Number of checked fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
