//! Configuration validation.
//!
//! Validation runs over the untyped JSON document so that every violation can
//! be collected and attributed, instead of stopping at the first decoding
//! failure. Order of checks:
//!
//! 1. header keys: presence, unknown keys, types and ranges
//! 2. field list length
//! 3. per field: shape decoding, then the registry's spec rules
//! 4. identifier uniqueness, contiguity and declaration order
//! 5. at most one verified email field

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use survey_model::{Configuration, FieldSpec, Limits, SurveyHeader};
use tracing::debug;

use crate::error::{ConfigError, InvalidConfigurationError, ValueShape};
use crate::registry::FieldTypeRegistry;

static SURVEY_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").expect("Invalid survey name regex"));

/// Keys of a configuration document, in canonical order.
pub const CONFIGURATION_KEYS: [&str; 7] = [
    "survey_name",
    "title",
    "description",
    "start",
    "end",
    "draft",
    "fields",
];

/// Validate a candidate configuration with default limits.
pub fn validate_configuration(
    candidate: &Value,
) -> Result<Configuration, InvalidConfigurationError> {
    ConfigurationValidator::new().validate(candidate)
}

/// Validates candidate survey definitions.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationValidator {
    registry: FieldTypeRegistry,
}

impl ConfigurationValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self::with_registry(FieldTypeRegistry::with_limits(limits))
    }

    pub fn with_registry(registry: FieldTypeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &FieldTypeRegistry {
        &self.registry
    }

    /// Validate `candidate`, returning the configuration or every violation.
    pub fn validate(&self, candidate: &Value) -> Result<Configuration, InvalidConfigurationError> {
        let Some(object) = candidate.as_object() else {
            return Err(InvalidConfigurationError::new(vec![ConfigError::NotAnObject {
                found: ValueShape::of(candidate),
            }]));
        };

        let mut errors = Vec::new();
        for key in object.keys() {
            if !CONFIGURATION_KEYS.contains(&key.as_str()) {
                errors.push(ConfigError::UnknownKey { key: key.clone() });
            }
        }

        let limits = self.registry.limits();
        let mut header = HeaderReader {
            object,
            errors: &mut errors,
        };
        let survey_name = header.survey_name(limits);
        let title = header.text("title", limits.title_max, true);
        let description = header.text("description", limits.description_max, false);
        let start = header.timestamp("start");
        let end = header.timestamp("end");
        let draft = header.boolean("draft");
        if let (Some(Some(start)), Some(Some(end))) = (start, end)
            && end < start
        {
            errors.push(ConfigError::EndBeforeStart {
                start: start.timestamp(),
                end: end.timestamp(),
            });
        }

        let fields = self.fields(object, &mut errors);

        if !errors.is_empty() {
            debug!(errors = errors.len(), "configuration rejected");
            return Err(InvalidConfigurationError::new(errors));
        }

        // Every header value is present once no error was recorded.
        match (survey_name, title, description, start, end, draft, fields) {
            (
                Some(survey_name),
                Some(title),
                Some(description),
                Some(start),
                Some(end),
                Some(draft),
                Some(fields),
            ) => {
                let header = SurveyHeader {
                    survey_name,
                    title,
                    description,
                    start,
                    end,
                    draft,
                };
                debug!(
                    survey = %header.survey_name,
                    fields = fields.len(),
                    "configuration accepted"
                );
                Ok(Configuration::new(header, fields))
            }
            _ => Err(InvalidConfigurationError::new(vec![ConfigError::MissingKey {
                key: "fields".to_string(),
            }])),
        }
    }

    /// Decode and check the field list. Returns the fields only when all of
    /// them decoded.
    fn fields(
        &self,
        object: &Map<String, Value>,
        errors: &mut Vec<ConfigError>,
    ) -> Option<Vec<FieldSpec>> {
        let value = match object.get("fields") {
            Some(value) => value,
            None => {
                errors.push(ConfigError::MissingKey {
                    key: "fields".to_string(),
                });
                return None;
            }
        };
        let Some(items) = value.as_array() else {
            errors.push(ConfigError::WrongType {
                key: "fields".to_string(),
                expected: ValueShape::Array,
                found: ValueShape::of(value),
            });
            return None;
        };

        let max_fields = self.registry.limits().max_fields;
        if items.is_empty() || items.len() > max_fields {
            errors.push(ConfigError::FieldCount {
                min: 1,
                max: max_fields,
                found: items.len(),
            });
        }

        let mut decoded = Vec::with_capacity(items.len());
        let mut all_decoded = true;
        for (index, item) in items.iter().enumerate() {
            match serde_json::from_value::<FieldSpec>(item.clone()) {
                Ok(spec) => {
                    if let Err(spec_errors) = self.registry.validate_spec(&spec) {
                        errors.extend(spec_errors.into_iter().map(|error| ConfigError::Field {
                            index,
                            identifier: spec.identifier(),
                            field_kind: spec.kind(),
                            error,
                        }));
                    }
                    decoded.push(spec);
                }
                Err(err) => {
                    all_decoded = false;
                    errors.push(ConfigError::FieldShape {
                        index,
                        reason: err.to_string(),
                    });
                }
            }
        }

        identifier_errors(&decoded, all_decoded, errors);
        verified_email_errors(&decoded, errors);

        all_decoded.then_some(decoded)
    }
}

fn identifier_errors(fields: &[FieldSpec], complete: bool, errors: &mut Vec<ConfigError>) {
    let mut occurrences: BTreeMap<u32, usize> = BTreeMap::new();
    for spec in fields {
        *occurrences.entry(spec.identifier()).or_default() += 1;
    }
    let mut duplicated = false;
    for (&identifier, &count) in &occurrences {
        if count > 1 {
            duplicated = true;
            errors.push(ConfigError::DuplicateIdentifier { identifier });
        }
    }

    // Contiguity and order are only meaningful for the full list.
    if !complete {
        return;
    }
    let present: BTreeSet<u32> = occurrences.keys().copied().collect();
    let mut missing = false;
    for identifier in (0..fields.len()).filter_map(|i| u32::try_from(i).ok()) {
        if !present.contains(&identifier) {
            missing = true;
            errors.push(ConfigError::MissingIdentifier { identifier });
        }
    }
    if duplicated || missing {
        return;
    }
    for (index, spec) in fields.iter().enumerate() {
        if u32::try_from(index).ok() != Some(spec.identifier()) {
            errors.push(ConfigError::MisplacedIdentifier {
                index,
                identifier: spec.identifier(),
            });
        }
    }
}

fn verified_email_errors(fields: &[FieldSpec], errors: &mut Vec<ConfigError>) {
    let identifiers: Vec<u32> = fields
        .iter()
        .filter_map(|spec| match spec {
            FieldSpec::Email(field) if field.verify => Some(field.identifier),
            _ => None,
        })
        .collect();
    if identifiers.len() > 1 {
        errors.push(ConfigError::MultipleVerifiedEmails { identifiers });
    }
}

/// Reads header keys, recording violations as it goes.
///
/// Each reader returns `None` when the key is missing or invalid.
struct HeaderReader<'a> {
    object: &'a Map<String, Value>,
    errors: &'a mut Vec<ConfigError>,
}

impl<'a> HeaderReader<'a> {
    fn get(&mut self, key: &str) -> Option<&'a Value> {
        let value = self.object.get(key);
        if value.is_none() {
            self.errors.push(ConfigError::MissingKey {
                key: key.to_string(),
            });
        }
        value
    }

    fn wrong_type(&mut self, key: &str, expected: ValueShape, value: &Value) {
        self.errors.push(ConfigError::WrongType {
            key: key.to_string(),
            expected,
            found: ValueShape::of(value),
        });
    }

    fn string(&mut self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(text) => Some(text.clone()),
            other => {
                self.wrong_type(key, ValueShape::String, other);
                None
            }
        }
    }

    fn survey_name(&mut self, limits: &Limits) -> Option<String> {
        let name = self.string("survey_name")?;
        let length = name.chars().count();
        if SURVEY_NAME_REGEX.is_match(&name)
            && (limits.survey_name_min..=limits.survey_name_max).contains(&length)
        {
            Some(name)
        } else {
            self.errors.push(ConfigError::InvalidSurveyName {
                value: name,
                min: limits.survey_name_min,
                max: limits.survey_name_max,
            });
            None
        }
    }

    fn text(&mut self, key: &str, max: usize, non_blank: bool) -> Option<String> {
        let text = self.string(key)?;
        let mut valid = true;
        if non_blank && text.trim().is_empty() {
            valid = false;
            self.errors.push(ConfigError::BlankText {
                key: key.to_string(),
            });
        }
        let found = text.chars().count();
        if found > max {
            valid = false;
            self.errors.push(ConfigError::TooLong {
                key: key.to_string(),
                max,
                found,
            });
        }
        valid.then_some(text)
    }

    /// `Some(None)` for an explicit `null`.
    fn timestamp(&mut self, key: &str) -> Option<Option<DateTime<Utc>>> {
        match self.get(key)? {
            Value::Null => Some(None),
            Value::Number(number) => {
                let parsed = number
                    .as_i64()
                    .and_then(|seconds| DateTime::from_timestamp(seconds, 0));
                if parsed.is_none() {
                    self.errors.push(ConfigError::InvalidTimestamp {
                        key: key.to_string(),
                        value: number.to_string(),
                    });
                }
                parsed.map(Some)
            }
            other => {
                self.wrong_type(key, ValueShape::Number, other);
                None
            }
        }
    }

    fn boolean(&mut self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(flag) => Some(*flag),
            other => {
                self.wrong_type(key, ValueShape::Bool, other);
                None
            }
        }
    }
}
