//! End-to-end aggregation: compile, run in memory, format.

use serde_json::{Value, json};
use survey_aggregate::{
    AggregationFailure, RawAggregate, RawValue, SubmissionSource, aggregate,
    compile_aggregation_pipeline, format_results,
};
use survey_model::{Configuration, FieldAggregate, OptionCounts};
use survey_validate::validate_configuration;

fn configuration(fields: Value) -> Configuration {
    validate_configuration(&json!({
        "survey_name": "poll",
        "title": "Poll",
        "description": "",
        "start": null,
        "end": null,
        "draft": false,
        "fields": fields
    }))
    .expect("valid configuration")
}

fn radio_ab() -> Configuration {
    configuration(json!([{
        "type": "radio",
        "identifier": 0,
        "title": "Pick one",
        "description": "",
        "options": ["A", "B"]
    }]))
}

fn encoded(configuration: &Configuration, submissions: &[Value]) -> String {
    let results = aggregate(configuration, submissions).expect("aggregate");
    serde_json::to_string(&results).expect("serialize")
}

#[test]
fn test_radio_counts() {
    let submissions = [json!({"0": "A"}), json!({"0": "A"}), json!({"0": "B"})];
    assert_eq!(
        encoded(&radio_ab(), &submissions),
        r#"{"count":3,"data":{"0":{"A":2,"B":1}}}"#
    );
}

#[test]
fn test_empty_collection_is_zero_filled() {
    assert_eq!(
        encoded(&radio_ab(), &[]),
        r#"{"count":0,"data":{"0":{"A":0,"B":0}}}"#
    );
}

#[test]
fn test_unseen_options_are_zero_filled_in_configuration_order() {
    let submissions = [json!({"0": "B"})];
    assert_eq!(
        encoded(&radio_ab(), &submissions),
        r#"{"count":1,"data":{"0":{"A":0,"B":1}}}"#
    );
}

#[test]
fn test_selection_flattens_lists() {
    let configuration = configuration(json!([{
        "type": "selection",
        "identifier": 0,
        "title": "Pick some",
        "description": "",
        "options": ["X", "Y", "Z"],
        "min_select": 0,
        "max_select": 2
    }]));
    let submissions = [json!({"0": ["X"]}), json!({"0": []})];
    assert_eq!(
        encoded(&configuration, &submissions),
        r#"{"count":2,"data":{"0":{"X":1,"Y":0,"Z":0}}}"#
    );
}

#[test]
fn test_option_sums_true_answers() {
    let configuration = configuration(json!([{
        "type": "option",
        "identifier": 0,
        "title": "Subscribe",
        "description": "",
        "required": false
    }]));
    let submissions = [json!({"0": true}), json!({"0": false}), json!({"0": true})];
    assert_eq!(
        encoded(&configuration, &submissions),
        r#"{"count":3,"data":{"0":2}}"#
    );
}

fn mixed() -> Configuration {
    configuration(json!([
        {"type": "email", "identifier": 0, "title": "Email", "description": "",
         "hint": "", "regex": ".*", "verify": false},
        {"type": "option", "identifier": 1, "title": "Agree", "description": "",
         "required": false},
        {"type": "radio", "identifier": 2, "title": "Color", "description": "",
         "options": ["Zebra", "Apple"]},
        {"type": "selection", "identifier": 3, "title": "Fruit", "description": "",
         "options": ["Pear", "Fig", "Kiwi"], "min_select": 0, "max_select": 3},
        {"type": "text", "identifier": 4, "title": "Notes", "description": "",
         "min_chars": 0, "max_chars": 100}
    ]))
}

#[test]
fn test_mixed_results_snapshot() {
    let submissions = [
        json!({"0": "a@b.io", "1": true, "2": "Apple", "3": ["Kiwi", "Pear"], "4": "x"}),
        json!({"0": "c@d.io", "1": false, "2": "Apple", "3": [], "4": ""}),
        json!({"0": "e@f.io", "1": true, "2": "Zebra", "3": ["Kiwi"], "4": "y"}),
    ];
    let results = aggregate(&mixed(), &submissions).expect("aggregate");
    insta::assert_json_snapshot!(results, @r#"
    {
      "count": 3,
      "data": {
        "0": null,
        "1": 2,
        "2": {
          "Zebra": 1,
          "Apple": 2
        },
        "3": {
          "Pear": 1,
          "Fig": 0,
          "Kiwi": 2
        },
        "4": null
      }
    }
    "#);
}

#[test]
fn test_mixed_empty_snapshot() {
    let results = aggregate(&mixed(), &[] as &[Value]).expect("aggregate");
    insta::assert_json_snapshot!(results, @r#"
    {
      "count": 0,
      "data": {
        "0": null,
        "1": 0,
        "2": {
          "Zebra": 0,
          "Apple": 0
        },
        "3": {
          "Pear": 0,
          "Fig": 0,
          "Kiwi": 0
        },
        "4": null
      }
    }
    "#);
}

#[test]
fn test_formatter_drops_unconfigured_options_and_defaults_missing_sums() {
    let configuration = mixed();
    let mut observed = OptionCounts::new();
    observed.insert("Apple", 4);
    observed.insert("Mango", 9);
    let raw = RawAggregate {
        count: 4,
        fields: vec![
            ("2".to_string(), RawValue::Counts(observed)),
            ("9".to_string(), RawValue::Sum(1)),
        ],
    };
    let results = format_results(raw, &configuration);
    assert_eq!(results.count, 4);
    assert_eq!(results.get(1), Some(&FieldAggregate::Sum(0)));
    let Some(FieldAggregate::Counts(colors)) = results.get(2) else {
        panic!("expected counts");
    };
    assert_eq!(
        colors.iter().collect::<Vec<_>>(),
        vec![("Zebra", 0), ("Apple", 4)]
    );
    assert_eq!(results.get(0), Some(&FieldAggregate::Unaggregated));
    assert_eq!(
        results.data.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
        vec![0, 1, 2, 3, 4]
    );
}

#[test]
fn test_compilation_is_idempotent() {
    let configuration = mixed();
    let a = compile_aggregation_pipeline(&configuration);
    let b = compile_aggregation_pipeline(&configuration);
    assert_eq!(a, b);
    let submissions = vec![json!({"0": "a@b.io", "1": true, "2": "Apple", "3": ["Fig"], "4": ""})];
    assert_eq!(a.run(&submissions).unwrap(), b.run(&submissions).unwrap());
}

#[test]
fn test_pipeline_is_a_serializable_description() {
    let pipeline = compile_aggregation_pipeline(&radio_ab());
    let value = serde_json::to_value(&pipeline).expect("serialize");
    assert_eq!(
        value,
        json!({
            "stages": [{"output": "0", "key": "0", "op": "count_by_value", "unwind": false}],
            "defaults": {"count": 0, "fields": {"0": {"A": 0, "B": 0}}}
        })
    );
    let decoded: survey_aggregate::Pipeline = serde_json::from_value(value).expect("deserialize");
    assert_eq!(decoded, pipeline);
}

#[test]
fn test_pipeline_defaults_keep_configuration_order() {
    let pipeline = compile_aggregation_pipeline(&mixed());
    let defaults = serde_json::to_string(pipeline.defaults()).expect("serialize");
    assert_eq!(
        defaults,
        r#"{"count":0,"fields":{"0":null,"1":0,"2":{"Zebra":0,"Apple":0},"3":{"Pear":0,"Fig":0,"Kiwi":0},"4":null}}"#
    );

    let submission = json!({"0": "a@b.io", "1": true, "2": "Apple", "3": ["Kiwi"], "4": ""});
    let raw = pipeline.run(&[submission]).expect("run");
    let raw = serde_json::to_string(&raw).expect("serialize");
    assert_eq!(
        raw,
        r#"{"count":1,"fields":{"0":null,"1":1,"2":{"Zebra":0,"Apple":1},"3":{"Pear":0,"Fig":0,"Kiwi":1},"4":null}}"#
    );
}

struct FailingSource;

impl SubmissionSource for FailingSource {
    fn scan(&self, _visit: &mut dyn FnMut(&Value)) -> Result<(), AggregationFailure> {
        Err(AggregationFailure::new("test", "cursor closed"))
    }
}

#[test]
fn test_backend_failure_is_propagated() {
    let err = aggregate(&radio_ab(), &FailingSource).unwrap_err();
    assert_eq!(err.backend(), "test");
}
