//! Shared fixtures for validation tests.

#![allow(dead_code)]

use serde_json::{Value, json};
use survey_model::Configuration;
use survey_validate::validate_configuration;

pub fn email_field(identifier: u32) -> Value {
    json!({
        "type": "email",
        "identifier": identifier,
        "title": "Email",
        "description": "Where we reach you",
        "hint": "you@uni.edu",
        "regex": r".+@uni\.edu",
        "verify": true
    })
}

pub fn option_field(identifier: u32) -> Value {
    json!({
        "type": "option",
        "identifier": identifier,
        "title": "I accept the terms",
        "description": "",
        "required": true
    })
}

pub fn radio_field(identifier: u32) -> Value {
    json!({
        "type": "radio",
        "identifier": identifier,
        "title": "Favourite",
        "description": "",
        "options": ["A", "B"]
    })
}

pub fn selection_field(identifier: u32) -> Value {
    json!({
        "type": "selection",
        "identifier": identifier,
        "title": "Languages",
        "description": "",
        "options": ["X", "Y", "Z"],
        "min_select": 0,
        "max_select": 2
    })
}

pub fn text_field(identifier: u32) -> Value {
    json!({
        "type": "text",
        "identifier": identifier,
        "title": "Comment",
        "description": "",
        "min_chars": 1,
        "max_chars": 10
    })
}

pub fn document(fields: Vec<Value>) -> Value {
    json!({
        "survey_name": "campus-poll",
        "title": "Campus poll",
        "description": "Tell us what you think",
        "start": 1_700_000_000,
        "end": 1_800_000_000,
        "draft": false,
        "fields": fields
    })
}

/// One field of every kind, identifiers 0..=4.
pub fn full_document() -> Value {
    document(vec![
        email_field(0),
        option_field(1),
        radio_field(2),
        selection_field(3),
        text_field(4),
    ])
}

pub fn full_configuration() -> Configuration {
    validate_configuration(&full_document()).expect("valid configuration")
}

/// A submission accepted by [`full_configuration`].
pub fn valid_submission() -> Value {
    json!({
        "0": "ada@uni.edu",
        "1": true,
        "2": "B",
        "3": ["Z", "X"],
        "4": "great"
    })
}
