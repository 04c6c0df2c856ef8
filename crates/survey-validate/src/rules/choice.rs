//! Radio and selection field rules.
//!
//! Both kinds carry an ordered list of unique, non-blank options. Radio
//! answers are one option string; selection answers are a list of distinct
//! option strings whose length lies within `[min_select, max_select]`.

use std::collections::BTreeSet;

use serde_json::Value;
use survey_model::{AggregateRule, Limits, RadioField, SelectionField};

use super::push_if_too_long;
use crate::error::{SpecError, ValueError, ValueShape};

fn option_errors(options: &[String], limits: &Limits) -> Vec<SpecError> {
    let mut errors = Vec::new();
    if options.is_empty() || options.len() > limits.max_options {
        errors.push(SpecError::OptionCount {
            min: 1,
            max: limits.max_options,
            found: options.len(),
        });
    }
    let mut seen = BTreeSet::new();
    let mut reported = BTreeSet::new();
    for (position, option) in options.iter().enumerate() {
        if option.trim().is_empty() {
            errors.push(SpecError::BlankOption { position });
        }
        push_if_too_long(&mut errors, "option", option, limits.option_max);
        if !seen.insert(option.as_str()) && reported.insert(option.as_str()) {
            errors.push(SpecError::DuplicateOption {
                value: option.clone(),
            });
        }
    }
    errors
}

pub(crate) fn radio_spec_errors(field: &RadioField, limits: &Limits) -> Vec<SpecError> {
    option_errors(&field.options, limits)
}

pub(crate) fn selection_spec_errors(field: &SelectionField, limits: &Limits) -> Vec<SpecError> {
    let mut errors = option_errors(&field.options, limits);
    if field.min_select > field.max_select || field.max_select > field.options.len() {
        errors.push(SpecError::SelectBounds {
            min_select: field.min_select,
            max_select: field.max_select,
            options: field.options.len(),
        });
    }
    errors
}

pub(crate) fn radio_aggregate_rule(field: &RadioField) -> AggregateRule {
    AggregateRule::CountPerOption {
        options: field.options.clone(),
        flatten: false,
    }
}

pub(crate) fn selection_aggregate_rule(field: &SelectionField) -> AggregateRule {
    AggregateRule::CountPerOption {
        options: field.options.clone(),
        flatten: true,
    }
}

/// Value must be one configured option string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioRule {
    options: Vec<String>,
}

impl RadioRule {
    pub fn new(field: &RadioField) -> Self {
        Self {
            options: field.options.clone(),
        }
    }

    pub fn check(&self, value: &Value) -> Result<(), ValueError> {
        let Some(choice) = value.as_str() else {
            return Err(ValueError::wrong_type(ValueShape::String, value));
        };
        if self.options.iter().any(|option| option == choice) {
            Ok(())
        } else {
            Err(ValueError::UnknownOption {
                value: choice.to_string(),
            })
        }
    }
}

/// Value must be a duplicate-free list of configured options, bounded in size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRule {
    options: Vec<String>,
    min_select: usize,
    max_select: usize,
}

impl SelectionRule {
    pub fn new(field: &SelectionField) -> Self {
        Self {
            options: field.options.clone(),
            min_select: field.min_select,
            max_select: field.max_select,
        }
    }

    pub fn check(&self, value: &Value) -> Result<(), ValueError> {
        let Some(items) = value.as_array() else {
            return Err(ValueError::wrong_type(ValueShape::Array, value));
        };
        let mut chosen = BTreeSet::new();
        for (position, item) in items.iter().enumerate() {
            let Some(choice) = item.as_str() else {
                return Err(ValueError::WrongElementType {
                    position,
                    found: ValueShape::of(item),
                });
            };
            if !self.options.iter().any(|option| option == choice) {
                return Err(ValueError::UnknownOption {
                    value: choice.to_string(),
                });
            }
            if !chosen.insert(choice) {
                return Err(ValueError::DuplicateSelection {
                    value: choice.to_string(),
                });
            }
        }
        if items.len() < self.min_select || items.len() > self.max_select {
            return Err(ValueError::SelectionCount {
                min: self.min_select,
                max: self.max_select,
                found: items.len(),
            });
        }
        Ok(())
    }
}
