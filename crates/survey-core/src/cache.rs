//! Caches for compiled pipelines and computed results.
//!
//! Both caches are keyed by configuration fingerprint, so a changed
//! configuration never reads artifacts compiled for an older one. Results
//! are only ever stored whole; invalidation is the caller's decision.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use survey_aggregate::{Pipeline, compile_aggregation_pipeline};
use survey_model::{Configuration, Results};
use tracing::debug;

/// Compiled pipelines keyed by configuration fingerprint.
#[derive(Debug, Default)]
pub struct PipelineCache {
    pipelines: Mutex<HashMap<String, Arc<Pipeline>>>,
}

impl PipelineCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached pipeline for `configuration`, compiling it on first use.
    pub fn get_or_compile(&self, configuration: &Configuration) -> Arc<Pipeline> {
        let fingerprint = configuration.fingerprint();
        if let Ok(pipelines) = self.pipelines.lock()
            && let Some(pipeline) = pipelines.get(&fingerprint)
        {
            return Arc::clone(pipeline);
        }
        let pipeline = Arc::new(compile_aggregation_pipeline(configuration));
        if let Ok(mut pipelines) = self.pipelines.lock() {
            pipelines
                .entry(fingerprint)
                .or_insert_with(|| Arc::clone(&pipeline));
        }
        pipeline
    }

    pub fn len(&self) -> usize {
        self.pipelines.lock().map(|p| p.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Results documents keyed by survey name and configuration fingerprint.
#[derive(Debug, Default)]
pub struct ResultsCache {
    entries: Mutex<HashMap<(String, String), Results>>,
}

impl ResultsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, configuration: &Configuration) -> Option<Results> {
        let key = cache_key(configuration);
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(&key).cloned())
    }

    /// Store a fully computed results document, replacing any previous one.
    pub fn store(&self, configuration: &Configuration, results: Results) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(cache_key(configuration), results);
        }
    }

    /// Drop every cached document of `survey`. Returns how many were dropped.
    pub fn reset(&self, survey: &str) -> usize {
        let Ok(mut entries) = self.entries.lock() else {
            return 0;
        };
        let before = entries.len();
        entries.retain(|(name, _), _| name != survey);
        let dropped = before - entries.len();
        debug!(survey, dropped, "results cache reset");
        dropped
    }
}

fn cache_key(configuration: &Configuration) -> (String, String) {
    (
        configuration.survey_name().to_string(),
        configuration.fingerprint(),
    )
}
