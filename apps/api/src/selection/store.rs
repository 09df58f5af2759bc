//! Selection persistence across reloads.
//!
//! Whether a selection survives a reload is an explicit policy, never implied
//! by which store is wired in.

use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::SelectedEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistencePolicy {
    /// Save after every mutation, restore on load.
    Persist,
    /// Start empty and wipe anything stored.
    #[default]
    ClearOnLoad,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("selection store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored selection is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("selection store lock poisoned")]
    Poisoned,
}

/// On-disk shape of a saved selection.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSelection {
    #[serde(rename = "selectedChars")]
    selected_chars: Vec<SelectedEntry>,
}

pub trait SelectionStore: Send + Sync {
    fn load(&self) -> Result<Option<Vec<SelectedEntry>>, StoreError>;
    fn save(&self, entries: &[SelectedEntry]) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// Process-local store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<Vec<SelectedEntry>>>,
}

impl SelectionStore for MemoryStore {
    fn load(&self) -> Result<Option<Vec<SelectedEntry>>, StoreError> {
        let slot = self.slot.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(slot.clone())
    }

    fn save(&self, entries: &[SelectedEntry]) -> Result<(), StoreError> {
        let mut slot = self.slot.lock().map_err(|_| StoreError::Poisoned)?;
        *slot = Some(entries.to_vec());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut slot = self.slot.lock().map_err(|_| StoreError::Poisoned)?;
        *slot = None;
        Ok(())
    }
}

/// JSON file store, one selection per file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SelectionStore for JsonFileStore {
    fn load(&self) -> Result<Option<Vec<SelectedEntry>>, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let stored: StoredSelection = serde_json::from_str(&text)?;
        Ok(Some(stored.selected_chars))
    }

    fn save(&self, entries: &[SelectedEntry]) -> Result<(), StoreError> {
        let stored = StoredSelection {
            selected_chars: entries.to_vec(),
        };
        std::fs::write(&self.path, serde_json::to_vec_pretty(&stored)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
