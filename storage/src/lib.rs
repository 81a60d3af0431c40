//! Orecoin Storage Layer - File-Based Ledger Snapshots
//!
//! The ledger lives in memory while the host executes operations; this
//! crate persists named snapshots between runs. Every snapshot is
//! written twice:
//! - JSON for human inspection
//! - Bincode for fast loading (preferred on read)

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ore_core::{LedgerSnapshot, TokenLedger};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Ledger snapshot not found: {0}")]
    SnapshotNotFound(String),
}

/// A ledger snapshot together with the wall-clock time it was written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedLedger {
    pub saved_at: DateTime<Utc>,
    pub snapshot: LedgerSnapshot,
}

impl SavedLedger {
    /// Rebuilds the captured ledger
    pub fn into_ledger(self) -> TokenLedger {
        TokenLedger::restore(self.snapshot)
    }
}

/// File-backed store for named ledger snapshots
pub struct LedgerStore {
    data_dir: PathBuf,
}

impl LedgerStore {
    /// Open the storage directory, creating it if needed
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let data_dir = path.as_ref().to_path_buf();
        if !data_dir.exists() {
            fs::create_dir_all(&data_dir)?;
        }
        Ok(Self { data_dir })
    }

    /// Persist a ledger under `name`, stamped with the current time
    pub fn save(&self, name: &str, ledger: &TokenLedger) -> Result<(), StorageError> {
        let saved = SavedLedger {
            saved_at: Utc::now(),
            snapshot: ledger.snapshot(),
        };
        self.write(name, &saved)
    }

    /// Load a saved ledger by name
    pub fn load(&self, name: &str) -> Result<SavedLedger, StorageError> {
        let bin_path = self.bin_path(name);
        if bin_path.exists() {
            let data = fs::read(&bin_path)?;
            return bincode::deserialize(&data)
                .map_err(|e| StorageError::SerializationError(e.to_string()));
        }

        let json_path = self.json_path(name);
        if json_path.exists() {
            let data = fs::read_to_string(&json_path)?;
            return serde_json::from_str(&data)
                .map_err(|e| StorageError::SerializationError(e.to_string()));
        }

        Err(StorageError::SnapshotNotFound(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.bin_path(name).exists() || self.json_path(name).exists()
    }

    /// Names of every saved ledger in the directory
    pub fn list(&self) -> Result<Vec<String>, StorageError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.data_dir)? {
            let path = entry?.path();
            if let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) {
                if !names.iter().any(|existing| existing == name) {
                    names.push(name.to_string());
                }
            }
        }
        Ok(names)
    }

    /// Remove both encodings of a saved ledger
    pub fn delete(&self, name: &str) -> Result<(), StorageError> {
        for path in [self.bin_path(name), self.json_path(name)] {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn write(&self, name: &str, saved: &SavedLedger) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(saved)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(self.json_path(name), json)?;

        let bin = bincode::serialize(saved)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(self.bin_path(name), bin)?;

        Ok(())
    }

    fn bin_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.bin", name))
    }

    fn json_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", name))
    }
}
