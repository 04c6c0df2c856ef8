//! Field type registry: spec rules, value rules and aggregation rules per kind.

mod common;

use common::{email_field, option_field, radio_field, selection_field, text_field};
use serde_json::{Value, json};
use survey_model::{AggregateRule, FieldKind, FieldSpec, Limits};
use survey_validate::{FieldTypeRegistry, SpecError, ValueError};

fn spec(value: Value) -> FieldSpec {
    serde_json::from_value(value).expect("field decodes")
}

fn with(mut value: Value, key: &str, replacement: Value) -> FieldSpec {
    value[key] = replacement;
    spec(value)
}

fn spec_codes(registry: &FieldTypeRegistry, spec: &FieldSpec) -> Vec<&'static str> {
    match registry.validate_spec(spec) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.iter().map(SpecError::code).collect(),
    }
}

#[test]
fn test_lists_all_kinds() {
    let registry = FieldTypeRegistry::new();
    assert_eq!(
        registry.kinds(),
        &[
            FieldKind::Email,
            FieldKind::Option,
            FieldKind::Radio,
            FieldKind::Selection,
            FieldKind::Text
        ]
    );
}

#[test]
fn test_valid_specs_pass() {
    let registry = FieldTypeRegistry::new();
    for value in [
        email_field(0),
        option_field(0),
        radio_field(0),
        selection_field(0),
        text_field(0),
    ] {
        let spec = spec(value);
        assert_eq!(registry.validate_spec(&spec), Ok(()), "{:?}", spec.kind());
    }
}

#[test]
fn test_blank_title_is_rejected_for_every_kind() {
    let registry = FieldTypeRegistry::new();
    for value in [
        email_field(0),
        option_field(0),
        radio_field(0),
        selection_field(0),
        text_field(0),
    ] {
        let spec = with(value, "title", json!("   "));
        assert_eq!(spec_codes(&registry, &spec), vec!["blank_title"]);
    }
}

#[test]
fn test_email_spec_constraints() {
    let registry = FieldTypeRegistry::new();
    let spec = with(email_field(0), "regex", json!("(unclosed"));
    assert_eq!(spec_codes(&registry, &spec), vec!["invalid_regex"]);
    let spec = with(email_field(0), "regex", json!("a)|(b"));
    assert_eq!(spec_codes(&registry, &spec), vec!["invalid_regex"]);

    let spec = with(email_field(0), "hint", json!("h".repeat(129)));
    assert_eq!(
        registry.validate_spec(&spec),
        Err(vec![SpecError::TooLong {
            attribute: "hint",
            max: 128,
            found: 129
        }])
    );
}

#[test]
fn test_email_regex_cannot_escape_anchors() {
    let registry = FieldTypeRegistry::new();
    let spec = with(email_field(0), "regex", json!(r"ada@uni\.edu)|(?:.*"));
    assert_eq!(spec_codes(&registry, &spec), vec!["invalid_regex"]);
    assert!(registry.validate_value(&spec, &json!("ada@example.com")).is_err());
}

#[test]
fn test_option_limit_is_configurable() {
    let registry = FieldTypeRegistry::with_limits(Limits::default().with_max_options(2));
    let three = spec(selection_field(0));
    assert_eq!(spec_codes(&registry, &three), vec!["option_count"]);
    assert!(spec_codes(&registry, &spec(radio_field(0))).is_empty());
}

#[test]
fn test_choice_spec_constraints() {
    let registry = FieldTypeRegistry::new();
    let spec = with(radio_field(0), "options", json!(["A", "B", "A"]));
    assert_eq!(spec_codes(&registry, &spec), vec!["duplicate_option"]);

    let spec = with(radio_field(0), "options", json!([]));
    assert_eq!(spec_codes(&registry, &spec), vec!["option_count"]);

    let spec = with(selection_field(0), "options", json!(["X", ""]));
    assert_eq!(spec_codes(&registry, &spec), vec!["blank_option"]);

    let spec = with(selection_field(0), "min_select", json!(3));
    assert_eq!(spec_codes(&registry, &spec), vec!["select_bounds"]);

    let spec = with(selection_field(0), "max_select", json!(4));
    assert_eq!(spec_codes(&registry, &spec), vec!["select_bounds"]);
}

#[test]
fn test_text_spec_constraints() {
    let registry = FieldTypeRegistry::new();
    let spec = with(text_field(0), "min_chars", json!(11));
    assert_eq!(spec_codes(&registry, &spec), vec!["char_bounds"]);

    let spec = with(text_field(0), "max_chars", json!(5001));
    assert_eq!(spec_codes(&registry, &spec), vec!["char_bounds"]);

    let relaxed = FieldTypeRegistry::with_limits(Limits::default().with_text_ceiling(10_000));
    assert_eq!(relaxed.validate_spec(&spec), Ok(()));
}

#[test]
fn test_every_violation_is_reported() {
    let registry = FieldTypeRegistry::new();
    let mut value = selection_field(0);
    value["title"] = json!("");
    value["options"] = json!(["X", "X"]);
    value["min_select"] = json!(2);
    value["max_select"] = json!(1);
    assert_eq!(
        spec_codes(&registry, &spec(value)),
        vec!["blank_title", "duplicate_option", "select_bounds"]
    );
}

#[test]
fn test_values_must_match_variant_shape() {
    let registry = FieldTypeRegistry::new();
    let radio = spec(radio_field(0));
    assert_eq!(registry.validate_value(&radio, &json!("A")), Ok(()));
    assert!(matches!(
        registry.validate_value(&radio, &json!(["A"])),
        Err(ValueError::WrongType { .. })
    ));

    let option = spec(option_field(0));
    assert!(matches!(
        registry.validate_value(&option, &json!(1)),
        Err(ValueError::WrongType { .. })
    ));
    assert_eq!(
        registry.validate_value(&option, &json!(false)),
        Err(ValueError::RequiredUnchecked)
    );

    let email = spec(email_field(0));
    assert_eq!(registry.validate_value(&email, &json!("ada@uni.edu")), Ok(()));
    assert!(matches!(
        registry.validate_value(&email, &json!("ada@example.com")),
        Err(ValueError::PatternMismatch { .. })
    ));
}

#[test]
fn test_aggregate_rules() {
    let registry = FieldTypeRegistry::new();
    assert_eq!(
        registry.aggregate_rule(&spec(option_field(0))),
        AggregateRule::SumTrue
    );
    assert_eq!(
        registry.aggregate_rule(&spec(radio_field(0))),
        AggregateRule::CountPerOption {
            options: vec!["A".to_string(), "B".to_string()],
            flatten: false
        }
    );
    assert_eq!(
        registry.aggregate_rule(&spec(selection_field(0))),
        AggregateRule::CountPerOption {
            options: vec!["X".to_string(), "Y".to_string(), "Z".to_string()],
            flatten: true
        }
    );
    assert_eq!(
        registry.aggregate_rule(&spec(email_field(0))),
        AggregateRule::CountOnly
    );
    assert_eq!(
        registry.aggregate_rule(&spec(text_field(0))),
        AggregateRule::CountOnly
    );
}
