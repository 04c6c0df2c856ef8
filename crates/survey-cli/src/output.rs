//! Writing results documents.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use survey_model::Results;

/// Write `results` as pretty JSON.
///
/// Uses atomic write (temp file + rename): readers see either the previous
/// document or the complete new one.
pub fn write_results(results: &Results, path: &Path) -> Result<()> {
    let mut bytes = serde_json::to_vec_pretty(results).context("serialize results")?;
    bytes.push(b'\n');

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }

    let temp_path = path.with_extension("json.tmp");
    let mut file =
        File::create(&temp_path).with_context(|| format!("create {}", temp_path.display()))?;
    file.write_all(&bytes)
        .with_context(|| format!("write {}", temp_path.display()))?;
    file.sync_all()
        .with_context(|| format!("sync {}", temp_path.display()))?;

    fs::rename(&temp_path, path).with_context(|| {
        format!(
            "rename {} to {}",
            temp_path.display(),
            path.display()
        )
    })?;

    tracing::info!("Wrote results to {}", path.display());
    Ok(())
}
