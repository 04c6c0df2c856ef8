//! Survey configuration: header plus ordered fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::Digest;

use crate::field::{EmailField, FieldSpec};

/// Survey-level attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyHeader {
    /// URL-safe survey name, unique per account.
    pub survey_name: String,
    pub title: String,
    pub description: String,
    /// Opening time. Serialized as Unix seconds or `null`.
    #[serde(with = "chrono::serde::ts_seconds_option")]
    pub start: Option<DateTime<Utc>>,
    /// Closing time. Serialized as Unix seconds or `null`.
    #[serde(with = "chrono::serde::ts_seconds_option")]
    pub end: Option<DateTime<Utc>>,
    /// Drafts are not open for submissions.
    pub draft: bool,
}

/// A survey definition.
///
/// Obtain values through `survey_validate::validate_configuration`, which
/// guarantees the invariants (contiguous identifiers, field constraints, at
/// most one verified email field). [`Configuration::new`] performs no checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Configuration {
    #[serde(flatten)]
    header: SurveyHeader,
    fields: Vec<FieldSpec>,
}

impl Configuration {
    /// Assemble a configuration without validating it.
    pub fn new(header: SurveyHeader, fields: Vec<FieldSpec>) -> Self {
        Self { header, fields }
    }

    pub fn header(&self) -> &SurveyHeader {
        &self.header
    }

    pub fn survey_name(&self) -> &str {
        &self.header.survey_name
    }

    pub fn title(&self) -> &str {
        &self.header.title
    }

    pub fn is_draft(&self) -> bool {
        self.header.draft
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.header.start
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.header.end
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Look up a field by identifier.
    pub fn field(&self, identifier: u32) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|field| field.identifier() == identifier)
    }

    /// The email field whose address gets verified, if any.
    pub fn verified_email_field(&self) -> Option<&EmailField> {
        self.fields.iter().find_map(|field| match field {
            FieldSpec::Email(email) if email.verify => Some(email),
            _ => None,
        })
    }

    /// Hex SHA-256 of the canonical JSON encoding.
    ///
    /// Two configurations share a fingerprint exactly when they serialize
    /// identically, which makes it a stable key for compiled artifacts.
    pub fn fingerprint(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_else(|_| format!("{self:?}").into_bytes());
        hex::encode(sha2::Sha256::digest(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{OptionField, TextField};
    use serde_json::json;

    fn header() -> SurveyHeader {
        SurveyHeader {
            survey_name: "feedback".to_string(),
            title: "Feedback".to_string(),
            description: String::new(),
            start: DateTime::from_timestamp(1_700_000_000, 0),
            end: None,
            draft: false,
        }
    }

    fn config() -> Configuration {
        Configuration::new(
            header(),
            vec![
                FieldSpec::Option(OptionField {
                    identifier: 0,
                    title: "Agree".to_string(),
                    description: String::new(),
                    required: false,
                }),
                FieldSpec::Text(TextField {
                    identifier: 1,
                    title: "Comment".to_string(),
                    description: String::new(),
                    min_chars: 0,
                    max_chars: 100,
                }),
            ],
        )
    }

    #[test]
    fn serializes_flat_with_unix_timestamps() {
        let value = serde_json::to_value(config()).expect("serialize configuration");
        assert_eq!(value["survey_name"], json!("feedback"));
        assert_eq!(value["start"], json!(1_700_000_000));
        assert_eq!(value["end"], json!(null));
        assert_eq!(value["fields"][1]["type"], json!("text"));
    }

    #[test]
    fn fingerprint_is_stable_and_content_sensitive() {
        let a = config();
        let b = config();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);

        let mut header = header();
        header.title = "Other".to_string();
        let c = Configuration::new(header, a.fields().to_vec());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn looks_up_fields_by_identifier() {
        let config = config();
        assert_eq!(config.field(1).map(FieldSpec::title), Some("Comment"));
        assert!(config.field(7).is_none());
        assert!(config.verified_email_field().is_none());
    }
}
