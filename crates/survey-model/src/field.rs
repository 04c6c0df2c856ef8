//! Field specifications.
//!
//! A survey is an ordered list of fields. Each field is one of five kinds and
//! carries the attributes common to all kinds (`identifier`, `title`,
//! `description`) plus kind-specific parameters.
//!
//! ## JSON shape
//!
//! ```text
//! {"type": "radio", "identifier": 0, "title": "Color", "description": "",
//!  "options": ["Red", "Green"]}
//! ```
//!
//! Unknown keys inside a field object are rejected during decoding.

use serde::{Deserialize, Serialize};

use crate::Pattern;

/// Tag of a field kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Email,
    Option,
    Radio,
    Selection,
    Text,
}

impl FieldKind {
    /// All kinds in declaration order.
    pub const ALL: [FieldKind; 5] = [
        FieldKind::Email,
        FieldKind::Option,
        FieldKind::Radio,
        FieldKind::Selection,
        FieldKind::Text,
    ];

    /// Parse a kind from its JSON tag.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "email" => Some(Self::Email),
            "option" => Some(Self::Option),
            "radio" => Some(Self::Radio),
            "selection" => Some(Self::Selection),
            "text" => Some(Self::Text),
            _ => None,
        }
    }

    /// JSON tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Option => "option",
            Self::Radio => "radio",
            Self::Selection => "selection",
            Self::Text => "text",
        }
    }

    /// Short human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Email => "Email address, optionally restricted by a pattern and verified",
            Self::Option => "Single checkbox, optionally required to be checked",
            Self::Radio => "Exactly one choice out of a list of options",
            Self::Selection => "Any number of choices out of a list, within bounds",
            Self::Text => "Free text with a character count range",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One typed question of a survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldSpec {
    Email(EmailField),
    Option(OptionField),
    Radio(RadioField),
    Selection(SelectionField),
    Text(TextField),
}

impl FieldSpec {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Email(_) => FieldKind::Email,
            Self::Option(_) => FieldKind::Option,
            Self::Radio(_) => FieldKind::Radio,
            Self::Selection(_) => FieldKind::Selection,
            Self::Text(_) => FieldKind::Text,
        }
    }

    pub fn identifier(&self) -> u32 {
        match self {
            Self::Email(field) => field.identifier,
            Self::Option(field) => field.identifier,
            Self::Radio(field) => field.identifier,
            Self::Selection(field) => field.identifier,
            Self::Text(field) => field.identifier,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Email(field) => &field.title,
            Self::Option(field) => &field.title,
            Self::Radio(field) => &field.title,
            Self::Selection(field) => &field.title,
            Self::Text(field) => &field.title,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::Email(field) => &field.description,
            Self::Option(field) => &field.description,
            Self::Radio(field) => &field.description,
            Self::Selection(field) => &field.description,
            Self::Text(field) => &field.description,
        }
    }

    /// Configured options for choice fields (radio, selection).
    pub fn options(&self) -> Option<&[String]> {
        match self {
            Self::Radio(field) => Some(&field.options),
            Self::Selection(field) => Some(&field.options),
            Self::Email(_) | Self::Option(_) | Self::Text(_) => None,
        }
    }

    /// Key of this field in a submission object.
    pub fn submission_key(&self) -> String {
        crate::submission_key(self.identifier())
    }
}

/// Email address field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmailField {
    pub identifier: u32,
    pub title: String,
    pub description: String,
    /// Placeholder shown to respondents.
    pub hint: String,
    /// Pattern the whole address must additionally match.
    pub regex: Pattern,
    /// Whether the address receives a verification token on submission.
    pub verify: bool,
}

/// Single checkbox field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionField {
    pub identifier: u32,
    pub title: String,
    pub description: String,
    /// When set, only `true` is accepted.
    pub required: bool,
}

/// Pick-exactly-one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RadioField {
    pub identifier: u32,
    pub title: String,
    pub description: String,
    pub options: Vec<String>,
}

/// Pick-many field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectionField {
    pub identifier: u32,
    pub title: String,
    pub description: String,
    pub options: Vec<String>,
    pub min_select: usize,
    pub max_select: usize,
}

/// Free text field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextField {
    pub identifier: u32,
    pub title: String,
    pub description: String,
    pub min_chars: usize,
    pub max_chars: usize,
}
