//! Bounds enforced by configuration and submission validation.
//!
//! All bounds live in one explicit value so that callers can tighten or
//! relax them in one place. Validators never read environment variables.

use serde::{Deserialize, Serialize};

/// Validation bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Maximum number of fields in a configuration.
    pub max_fields: usize,
    /// Maximum number of options of a radio or selection field.
    pub max_options: usize,
    /// Minimum length of `survey_name`.
    pub survey_name_min: usize,
    /// Maximum length of `survey_name`.
    pub survey_name_max: usize,
    /// Maximum length of configuration and field titles.
    pub title_max: usize,
    /// Maximum length of configuration and field descriptions.
    pub description_max: usize,
    /// Maximum length of an email field hint.
    pub hint_max: usize,
    /// Maximum length of an email field regex source.
    pub regex_max: usize,
    /// Maximum length of one option string.
    pub option_max: usize,
    /// Ceiling for a text field's `max_chars`.
    pub text_ceiling: usize,
    /// Maximum length of a submitted email address.
    pub email_max: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_fields: 32,
            max_options: 32,
            survey_name_min: 2,
            survey_name_max: 20,
            title_max: 128,
            description_max: 1024,
            hint_max: 128,
            regex_max: 256,
            option_max: 256,
            text_ceiling: 5000,
            email_max: 254,
        }
    }
}

impl Limits {
    #[must_use]
    pub fn with_max_fields(mut self, max: usize) -> Self {
        self.max_fields = max;
        self
    }

    #[must_use]
    pub fn with_max_options(mut self, max: usize) -> Self {
        self.max_options = max;
        self
    }

    #[must_use]
    pub fn with_text_ceiling(mut self, ceiling: usize) -> Self {
        self.text_ceiling = ceiling;
        self
    }

    #[must_use]
    pub fn with_email_max(mut self, max: usize) -> Self {
        self.email_max = max;
        self
    }
}
