//! Concrete quest sources
//!
//! Both sources funnel raw JSON through [`ingest`], which is where malformed
//! records are rejected. The discovery pipeline only ever sees validated quests.

use crate::{DiscoveryError, Quest, QuestSource, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Parse a JSON array of quest records, keeping the valid ones
///
/// Records that fail validation (missing stops, non-finite or out-of-range
/// coordinates, out-of-range ratings, unknown themes) and records repeating an
/// earlier id are skipped with a warning. A document that is not a JSON array
/// is an error.
pub fn ingest(json: &str) -> Result<Vec<Quest>> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let total = raw.len();

    let mut seen = HashSet::with_capacity(total);
    let mut quests = Vec::with_capacity(total);
    for value in raw {
        let label = record_label(&value);
        match serde_json::from_value::<Quest>(value) {
            Ok(quest) => {
                if seen.insert(quest.id().clone()) {
                    quests.push(quest);
                } else {
                    tracing::warn!("Skipping quest {label}: duplicate id");
                }
            }
            Err(err) => tracing::warn!("Skipping quest {label}: {err}"),
        }
    }

    if quests.len() < total {
        tracing::info!("Ingested {} of {} quest records", quests.len(), total);
    }
    Ok(quests)
}

/// Best-effort id of a raw record for log messages
fn record_label(value: &serde_json::Value) -> String {
    value
        .get("id")
        .or_else(|| value.get("_id"))
        .and_then(serde_json::Value::as_str)
        .unwrap_or("<unknown>")
        .to_string()
}

/// In-memory quest source
#[derive(Clone, Debug, Default)]
pub struct StaticSource {
    quests: Vec<Quest>,
}

impl StaticSource {
    pub fn new(quests: Vec<Quest>) -> Self {
        Self { quests }
    }

    /// Build a source from a JSON array of quest records
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(ingest(json)?))
    }
}

impl QuestSource for StaticSource {
    async fn fetch_all_quests(&self) -> Result<Vec<Quest>> {
        Ok(self.quests.clone())
    }
}

/// Quest source reading a JSON array of records from a file
#[derive(Clone, Debug)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl QuestSource for JsonFileSource {
    async fn fetch_all_quests(&self) -> Result<Vec<Quest>> {
        let unavailable = |err: DiscoveryError| {
            DiscoveryError::DataUnavailable(format!("{}: {err}", self.path.display()))
        };

        let json = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| unavailable(err.into()))?;
        let quests = ingest(&json).map_err(unavailable)?;

        tracing::debug!("Read {} quests from {}", quests.len(), self.path.display());
        Ok(quests)
    }
}
