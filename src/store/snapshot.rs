//! Ledger snapshot
//!
//! The persistence hand-off: the whole state serialized verbatim. A
//! snapshot is handed to the ledger at startup and handed back for
//! saving; there is no storage engine or migration logic here.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{DiaryEntry, Food, Ingredient, Macros};

/// Snapshot load/save error types
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// Serialized form of the entire ledger state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub foods: Vec<Food>,
    #[serde(default)]
    pub entries: Vec<DiaryEntry>,
    #[serde(default)]
    pub goals: Macros,
    #[serde(default)]
    pub next_ingredient_id: i64,
    #[serde(default)]
    pub next_food_id: i64,
    #[serde(default)]
    pub next_entry_id: i64,
}

impl Snapshot {
    /// Read a snapshot from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Write the snapshot to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SnapshotError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}
