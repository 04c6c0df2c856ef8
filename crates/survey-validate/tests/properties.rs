//! Property tests: valid submissions pass, single-field violations are
//! attributed, key-set mismatches dominate.

mod common;

use common::full_configuration;
use proptest::prelude::*;
use proptest::sample::subsequence;
use serde_json::{Value, json};
use survey_validate::{SubmissionError, compile_submission_validator};

fn submission_strategy() -> impl Strategy<Value = Value> {
    (
        "[a-z][a-z0-9.]{0,15}",
        prop::sample::select(vec!["A", "B"]),
        subsequence(vec!["X", "Y", "Z"], 0..=2).prop_shuffle(),
        "[a-zA-Z0-9 äöü]{1,10}",
    )
        .prop_map(|(local, radio, selection, text)| {
            json!({
                "0": format!("{local}@uni.edu"),
                "1": true,
                "2": radio,
                "3": selection,
                "4": text
            })
        })
}

/// A value violating the rule of each field of the full configuration.
fn violation(identifier: usize) -> Value {
    match identifier {
        0 => json!("ada@example.com"),
        1 => json!(false),
        2 => json!("C"),
        3 => json!(["X", "X"]),
        _ => json!("this text is far too long"),
    }
}

proptest! {
    #[test]
    fn valid_submissions_pass(submission in submission_strategy()) {
        let validator = compile_submission_validator(&full_configuration());
        prop_assert_eq!(validator.validate(&submission), Ok(()));
    }

    #[test]
    fn single_violation_is_attributed(
        submission in submission_strategy(),
        identifier in 0usize..5,
    ) {
        let validator = compile_submission_validator(&full_configuration());
        let mut submission = submission;
        submission[identifier.to_string()] = violation(identifier);
        match validator.validate(&submission) {
            Err(SubmissionError::InvalidFields(invalid)) => {
                prop_assert_eq!(invalid.identifiers(), vec![u32::try_from(identifier).unwrap()]);
            }
            other => prop_assert!(false, "unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn missing_key_is_shape_mismatch(
        submission in submission_strategy(),
        identifier in 0usize..5,
        flip in any::<bool>(),
    ) {
        let validator = compile_submission_validator(&full_configuration());
        let mut submission = submission;
        if flip {
            submission[((identifier + 1) % 5).to_string()] = violation((identifier + 1) % 5);
        }
        submission.as_object_mut().unwrap().remove(&identifier.to_string());
        let err = validator.validate(&submission).unwrap_err();
        prop_assert!(err.is_shape_mismatch());
    }

    #[test]
    fn extra_key_is_shape_mismatch(
        submission in submission_strategy(),
        extra in "[a-z5-9][a-z0-9]{0,4}",
    ) {
        let validator = compile_submission_validator(&full_configuration());
        let mut submission = submission;
        submission[extra.as_str()] = json!(true);
        let err = validator.validate(&submission).unwrap_err();
        prop_assert!(err.is_shape_mismatch());
    }
}
