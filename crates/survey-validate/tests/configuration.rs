//! Configuration validation over whole documents.

mod common;

use common::{document, email_field, full_document, radio_field, text_field};
use serde_json::json;
use survey_model::{FieldKind, Limits};
use survey_validate::{ConfigError, ConfigurationValidator, SpecError, validate_configuration};

fn codes(candidate: &serde_json::Value) -> Vec<&'static str> {
    match validate_configuration(candidate) {
        Ok(_) => Vec::new(),
        Err(err) => err.errors().iter().map(ConfigError::code).collect(),
    }
}

#[test]
fn test_full_configuration_is_accepted() {
    let configuration = validate_configuration(&full_document()).expect("valid");
    assert_eq!(configuration.survey_name(), "campus-poll");
    assert_eq!(configuration.fields().len(), 5);
    assert_eq!(configuration.start().map(|t| t.timestamp()), Some(1_700_000_000));
    assert_eq!(
        configuration.verified_email_field().map(|f| f.identifier),
        Some(0)
    );
    let kinds: Vec<FieldKind> = configuration.fields().iter().map(|f| f.kind()).collect();
    assert_eq!(kinds, FieldKind::ALL);
}

#[test]
fn test_accepted_configuration_round_trips_to_same_document() {
    let configuration = validate_configuration(&full_document()).expect("valid");
    let encoded = serde_json::to_value(&configuration).expect("serialize");
    let again = validate_configuration(&encoded).expect("re-validate");
    assert_eq!(configuration, again);
    assert_eq!(configuration.fingerprint(), again.fingerprint());
}

#[test]
fn test_missing_and_unknown_header_keys() {
    let mut candidate = full_document();
    let object = candidate.as_object_mut().expect("object");
    object.remove("draft");
    object.insert("owner".to_string(), json!("ada"));
    let err = validate_configuration(&candidate).unwrap_err();
    assert_eq!(
        err.errors(),
        &[
            ConfigError::UnknownKey {
                key: "owner".to_string()
            },
            ConfigError::MissingKey {
                key: "draft".to_string()
            },
        ]
    );
}

#[test]
fn test_header_types_and_ranges() {
    let mut candidate = full_document();
    candidate["title"] = json!(42);
    candidate["description"] = json!("d".repeat(1025));
    candidate["draft"] = json!("no");
    candidate["start"] = json!("tomorrow");
    assert_eq!(
        codes(&candidate),
        vec!["wrong_type", "too_long", "wrong_type", "wrong_type"]
    );
}

#[test]
fn test_end_before_start() {
    let mut candidate = full_document();
    candidate["start"] = json!(2_000);
    candidate["end"] = json!(1_000);
    let err = validate_configuration(&candidate).unwrap_err();
    assert_eq!(
        err.errors(),
        &[ConfigError::EndBeforeStart {
            start: 2_000,
            end: 1_000
        }]
    );
}

#[test]
fn test_open_ended_window_is_allowed() {
    let mut candidate = full_document();
    candidate["start"] = json!(null);
    candidate["end"] = json!(null);
    let configuration = validate_configuration(&candidate).expect("valid");
    assert!(configuration.start().is_none());
    assert!(configuration.end().is_none());
}

#[test]
fn test_fractional_timestamp_is_invalid() {
    let mut candidate = full_document();
    candidate["end"] = json!(1.5);
    assert_eq!(codes(&candidate), vec!["invalid_timestamp"]);
}

#[test]
fn test_field_count_bounds() {
    assert_eq!(codes(&document(vec![])), vec!["field_count"]);

    let fields = (0..3).map(radio_field).collect();
    let validator = ConfigurationValidator::with_limits(Limits::default().with_max_fields(2));
    let err = validator.validate(&document(fields)).unwrap_err();
    assert_eq!(
        err.errors(),
        &[ConfigError::FieldCount {
            min: 1,
            max: 2,
            found: 3
        }]
    );
}

#[test]
fn test_unbalanced_email_regex_rejects_configuration() {
    let mut email = email_field(0);
    email["regex"] = json!("a)|(b");
    assert_eq!(codes(&document(vec![email])), vec!["field"]);
}

#[test]
fn test_field_errors_carry_position_and_identifier() {
    let mut bad_text = text_field(1);
    bad_text["min_chars"] = json!(20);
    let err = validate_configuration(&document(vec![radio_field(0), bad_text])).unwrap_err();
    assert_eq!(
        err.errors(),
        &[ConfigError::Field {
            index: 1,
            identifier: 1,
            field_kind: FieldKind::Text,
            error: SpecError::CharBounds {
                min_chars: 20,
                max_chars: 10,
                ceiling: 5000
            }
        }]
    );
    assert_eq!(err.for_field(1).count(), 1);
    assert_eq!(err.for_field(0).count(), 0);
    assert_eq!(err.errors()[0].location(), "fields[1]");
}

#[test]
fn test_unknown_field_type_and_keys_are_shape_errors() {
    let mut unknown_kind = radio_field(0);
    unknown_kind["type"] = json!("slider");
    let mut extra_key = text_field(1);
    extra_key["placeholder"] = json!("...");
    let err = validate_configuration(&document(vec![unknown_kind, extra_key])).unwrap_err();
    let indices: Vec<Option<usize>> = err.errors().iter().map(ConfigError::field_index).collect();
    assert_eq!(indices, vec![Some(0), Some(1)]);
    assert!(err.errors().iter().all(|e| e.code() == "field_shape"));
}

#[test]
fn test_identifier_gap_is_reported() {
    let err = validate_configuration(&document(vec![radio_field(0), radio_field(2)])).unwrap_err();
    assert_eq!(
        err.errors(),
        &[ConfigError::MissingIdentifier { identifier: 1 }]
    );
}

#[test]
fn test_single_verified_email() {
    let err = validate_configuration(&document(vec![email_field(0), email_field(1)])).unwrap_err();
    assert_eq!(
        err.errors(),
        &[ConfigError::MultipleVerifiedEmails {
            identifiers: vec![0, 1]
        }]
    );

    let mut unverified = email_field(1);
    unverified["verify"] = json!(false);
    assert!(validate_configuration(&document(vec![email_field(0), unverified])).is_ok());
}

#[test]
fn test_errors_are_collected_across_header_and_fields() {
    let mut candidate = document(vec![radio_field(0), radio_field(0)]);
    candidate["survey_name"] = json!("X");
    candidate["title"] = json!("");
    assert_eq!(
        codes(&candidate),
        vec![
            "invalid_survey_name",
            "blank_text",
            "duplicate_identifier",
            "missing_identifier"
        ]
    );
}

#[test]
fn test_error_serializes_with_kind_tags() {
    let err = validate_configuration(&document(vec![radio_field(1)])).unwrap_err();
    let value = serde_json::to_value(&err).expect("serialize");
    assert_eq!(
        value,
        json!({"errors": [{"kind": "missing_identifier", "identifier": 0}]})
    );
}
