//! Whole-value regular expressions configured on email fields.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A user supplied pattern together with its compiled form.
///
/// The pattern is anchored on both ends, so it must match the entire value.
/// A pattern that fails to compile is still representable; it never matches,
/// and its compile error is available through [`Pattern::error`] so that
/// configuration validation can report it.
///
/// Equality, hashing of configurations and serialization use the source text
/// only.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    compiled: Result<Regex, String>,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        // The source must parse on its own before it is wrapped, or unbalanced
        // groups could close the anchoring group early.
        let compiled = Regex::new(&source)
            .and_then(|_| Regex::new(&format!("^(?:{source})$")))
            .map_err(|e| e.to_string());
        Self { source, compiled }
    }

    /// Source text as configured.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Compile error, if the source is not a valid regular expression.
    pub fn error(&self) -> Option<&str> {
        self.compiled.as_ref().err().map(String::as_str)
    }

    pub fn is_valid(&self) -> bool {
        self.compiled.is_ok()
    }

    /// Whether `text` matches the pattern in full.
    pub fn is_match(&self, text: &str) -> bool {
        match &self.compiled {
            Ok(regex) => regex.is_match(text),
            Err(_) => false,
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Ok(Pattern::new(source))
    }
}
