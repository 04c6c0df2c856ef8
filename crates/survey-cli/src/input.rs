//! Reading configuration and submission files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value;

/// Read one JSON document.
pub fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse JSON in {}", path.display()))
}

/// Read a submission collection: a JSON array, or JSON Lines with one
/// submission per non-blank line.
pub fn read_submissions(path: &Path) -> Result<Vec<Value>> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_submissions(&text).with_context(|| format!("parse submissions in {}", path.display()))
}

pub fn parse_submissions(text: &str) -> Result<Vec<Value>> {
    if text.trim_start().starts_with('[') {
        let value: Value = serde_json::from_str(text).context("parse JSON array")?;
        let Value::Array(items) = value else {
            bail!("expected a JSON array");
        };
        return Ok(items);
    }
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).with_context(|| format!("line {}", index + 1))
        })
        .collect()
}
