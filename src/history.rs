//! History Store
//!
//! Append-only, capped log of past generation batches, persisted as one
//! JSON file. The log is hydrated once at construction and rewritten
//! whole on every record. It is a best-effort cache, not a durability
//! guarantee: a corrupt or unwritable file degrades to an empty or
//! unmodified in-memory log, never an error for the caller.

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::activity_log;
use crate::config::Config;
use crate::options::PromptResult;

/// Maximum number of batches kept; inserting one more evicts the oldest
pub const HISTORY_CAP: usize = 10;

/// One recorded batch: every prompt card it produced, frozen at the
/// moment the batch completed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    /// Unix-ms timestamp of the recording moment
    pub id: u64,
    /// Human-readable local timestamp
    pub timestamp: String,
    pub results: Vec<PromptResult>,
}

impl HistoryItem {
    fn new(results: Vec<PromptResult>) -> Self {
        Self {
            id: Utc::now().timestamp_millis() as u64,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            results,
        }
    }
}

/// The persisted history log. Single-writer, single-reader within one
/// session; constructed once at startup and passed where needed.
pub struct HistoryStore {
    path: PathBuf,
    items: Vec<HistoryItem>,
}

impl HistoryStore {
    /// Open a store at the given file path, hydrating the in-memory log
    /// from whatever is persisted there
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let items = Self::read_items(&path);
        Self { path, items }
    }

    /// Open the store at the default `~/.promptstudio/history.json`
    pub fn at_default_location() -> anyhow::Result<Self> {
        Ok(Self::new(Config::history_path()?))
    }

    /// The current log, newest first
    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    /// Record one completed batch: prepend a fresh item, truncate to the
    /// cap, persist the whole log. Persistence failures are logged and
    /// swallowed.
    pub fn record(&mut self, results: Vec<PromptResult>) -> &HistoryItem {
        let batch_size = results.len();
        self.items.insert(0, HistoryItem::new(results));

        let evicted = self.items.len() > HISTORY_CAP;
        self.items.truncate(HISTORY_CAP);

        activity_log::log_history_record(batch_size, self.items.len(), evicted);
        self.persist();

        &self.items[0]
    }

    /// Read the persisted log; absent or corrupt data yields an empty log
    fn read_items(path: &Path) -> Vec<HistoryItem> {
        if !path.exists() {
            return Vec::new();
        }
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                activity_log::log_persistence_warning("load", &e.to_string());
                return Vec::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(items) => items,
            Err(e) => {
                activity_log::log_persistence_warning("load", &e.to_string());
                Vec::new()
            }
        }
    }

    /// Synchronous whole-log overwrite
    fn persist(&self) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                activity_log::log_persistence_warning("record", &e.to_string());
                return;
            }
        }
        let content = match serde_json::to_string_pretty(&self.items) {
            Ok(content) => content,
            Err(e) => {
                activity_log::log_persistence_warning("record", &e.to_string());
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, content) {
            activity_log::log_persistence_warning("record", &e.to_string());
        }
    }
}
