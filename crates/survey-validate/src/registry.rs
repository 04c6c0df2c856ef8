//! Field type registry.

use serde_json::Value;
use survey_model::{AggregateRule, FieldKind, FieldSpec, Limits};

use crate::error::{SpecError, ValueError};
use crate::rules::{self, FieldRule};

/// Registry of the five field kinds and their rules.
///
/// Dispatch is an exhaustive match over [`FieldSpec`]; the registry only
/// carries the [`Limits`] its rules are bound against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTypeRegistry {
    limits: Limits,
}

impl FieldTypeRegistry {
    /// Create a registry with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry bound to `limits`.
    pub fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Supported kinds in declaration order.
    pub fn kinds(&self) -> &'static [FieldKind] {
        &FieldKind::ALL
    }

    /// Check a field specification, reporting every violation.
    pub fn validate_spec(&self, spec: &FieldSpec) -> Result<(), Vec<SpecError>> {
        let errors = rules::spec_errors(spec, &self.limits);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Check one submitted value against `spec`.
    pub fn validate_value(&self, spec: &FieldSpec, value: &Value) -> Result<(), ValueError> {
        self.rule_for(spec).check(value)
    }

    /// How answers to `spec` reduce into results.
    pub fn aggregate_rule(&self, spec: &FieldSpec) -> AggregateRule {
        rules::aggregate_rule(spec)
    }

    /// The compiled value rule for `spec`.
    pub fn rule_for(&self, spec: &FieldSpec) -> FieldRule {
        FieldRule::compile(spec, &self.limits)
    }
}
