use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::domain::error::{AppError, Result};
use crate::domain::history::{HistoryEntry, MAX_HISTORY_ENTRIES};

const HISTORY_FILE: &str = "reflection_history.json";

pub fn ensure_data_dir(data_dir: &Path) -> std::io::Result<PathBuf> {
    ensure_dir(data_dir)?;
    Ok(data_dir.to_path_buf())
}

fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Completed reflections, newest first, in a single JSON file
pub struct HistoryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(HISTORY_FILE),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file reads as empty; an unreadable one is logged and ignored
    pub fn load(&self) -> Result<Vec<HistoryEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(&self.path).map_err(|e| {
            AppError::IoError(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Discarding corrupt history file");
                Ok(Vec::new())
            }
        }
    }

    /// Put `entry` first and keep the newest entries only
    pub fn push(&self, entry: HistoryEntry) -> Result<Vec<HistoryEntry>> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| AppError::Internal(format!("History lock poisoned: {}", e)))?;

        let mut entries = self.load()?;
        entries.insert(0, entry);
        entries.truncate(MAX_HISTORY_ENTRIES);

        self.save(&entries)?;
        Ok(entries)
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }

        // Readers only ever see a complete file
        let json = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|e| {
            AppError::IoError(format!("Failed to write {}: {}", tmp_path.display(), e))
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            AppError::IoError(format!("Failed to replace {}: {}", self.path.display(), e))
        })?;

        debug!(entries = entries.len(), path = %self.path.display(), "Saved history");
        Ok(())
    }
}
