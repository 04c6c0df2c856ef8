//! Aggregate results of a survey.
//!
//! ```text
//! {"count": 3, "data": {"0": {"A": 2, "B": 1}, "1": 2, "2": null}}
//! ```
//!
//! - Option fields aggregate to the number of `true` answers
//! - Radio and selection fields aggregate to a count per configured option,
//!   every option present, in configuration order
//! - Email and text fields are counted but not aggregated (`null`)

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ordered_map;

/// How the values of one field reduce over a collection of submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateRule {
    /// Sum boolean answers read as 0/1.
    SumTrue,
    /// Count occurrences per configured option, zero-filled.
    ///
    /// With `flatten`, each answer is a list whose elements count
    /// independently.
    CountPerOption { options: Vec<String>, flatten: bool },
    /// Only included in the submission count.
    CountOnly,
}

/// Per-option counts in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionCounts(Vec<(String, u64)>);

impl OptionCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every option mapped to zero.
    pub fn zeroed<S: AsRef<str>>(options: &[S]) -> Self {
        Self(
            options
                .iter()
                .map(|option| (option.as_ref().to_string(), 0))
                .collect(),
        )
    }

    pub fn get(&self, option: &str) -> Option<u64> {
        self.0
            .iter()
            .find(|(name, _)| name == option)
            .map(|(_, count)| *count)
    }

    /// Overwrite the count of an existing option.
    ///
    /// Returns `false` when the option is not present.
    pub fn set(&mut self, option: &str, count: u64) -> bool {
        match self.0.iter_mut().find(|(name, _)| name == option) {
            Some(entry) => {
                entry.1 = count;
                true
            }
            None => false,
        }
    }

    /// Append an option, or overwrite its count if present.
    pub fn insert(&mut self, option: impl Into<String>, count: u64) {
        let option = option.into();
        if !self.set(&option, count) {
            self.0.push((option, count));
        }
    }

    /// Add one occurrence of `option`, appending it when not yet present.
    pub fn increment(&mut self, option: &str) {
        match self.0.iter_mut().find(|(name, _)| name == option) {
            Some(entry) => entry.1 += 1,
            None => self.0.push((option.to_string(), 1)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum over all options.
    pub fn total(&self) -> u64 {
        self.0.iter().map(|(_, count)| count).sum()
    }
}

impl Serialize for OptionCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ordered_map::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for OptionCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ordered_map::deserialize(deserializer).map(Self)
    }
}

/// Aggregate of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldAggregate {
    Sum(u64),
    Counts(OptionCounts),
    Unaggregated,
}

/// Canonical results document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Results {
    /// Number of aggregated submissions.
    pub count: u64,
    /// Aggregates keyed by field identifier, in configuration order.
    #[serde(with = "ordered_map")]
    pub data: Vec<(u32, FieldAggregate)>,
}

impl Results {
    pub fn get(&self, identifier: u32) -> Option<&FieldAggregate> {
        self.data
            .iter()
            .find(|(id, _)| *id == identifier)
            .map(|(_, aggregate)| aggregate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Results {
        let mut counts = OptionCounts::zeroed(&["Zebra", "Apple"]);
        counts.set("Apple", 4);
        Results {
            count: 4,
            data: vec![
                (1, FieldAggregate::Counts(counts)),
                (0, FieldAggregate::Sum(3)),
                (2, FieldAggregate::Unaggregated),
            ],
        }
    }

    #[test]
    fn serializes_in_configuration_order() {
        let text = serde_json::to_string(&sample()).expect("serialize results");
        assert_eq!(
            text,
            r#"{"count":4,"data":{"1":{"Zebra":0,"Apple":4},"0":3,"2":null}}"#
        );
    }

    #[test]
    fn deserializes_each_aggregate_shape() {
        let text = r#"{"count":4,"data":{"1":{"Zebra":0,"Apple":4},"0":3,"2":null}}"#;
        let results: Results = serde_json::from_str(text).expect("deserialize results");
        assert_eq!(results, sample());
    }

    #[test]
    fn option_counts_helpers() {
        let mut counts = OptionCounts::zeroed(&["A", "B"]);
        assert!(counts.set("B", 2));
        assert!(!counts.set("C", 1));
        counts.insert("C", 5);
        assert_eq!(counts.get("C"), Some(5));
        assert_eq!(counts.total(), 7);
        assert_eq!(
            serde_json::to_value(&counts).expect("serialize counts"),
            json!({"A": 0, "B": 2, "C": 5})
        );
    }
}
