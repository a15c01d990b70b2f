//! Persistence adapter for the reminder collection.
//!
//! The whole collection is kept under one fixed JSON file and is always
//! written as a unit. Writes go through a temporary file in the same
//! directory and an atomic rename, so a crash mid-write never corrupts
//! the stored collection.

use std::{fs, io::Write, path::PathBuf};

use log::{debug, error, warn};
use tempfile::NamedTempFile;

use crate::{PillboxError, Reminder, Result};

/// File name the collection is stored under inside the data directory.
pub const STORE_FILE: &str = "reminders.json";

/// Reads and writes the serialized reminder collection.
pub struct JsonStore {
    /// Full path of the collection file
    path: PathBuf,
}

impl JsonStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            path: data_dir.join(STORE_FILE),
        }
    }

    /// Path of the backing file, mainly for diagnostics.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Loads the persisted collection.
    ///
    /// A missing file or malformed content is treated as "no data yet"
    /// and yields an empty collection; this never returns an error.
    pub fn load(&self) -> Vec<Reminder> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!(
                    "No readable collection at {} ({}), starting empty",
                    self.path.display(),
                    e
                );
                return Vec::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(reminders) => reminders,
            Err(e) => {
                warn!(
                    "Malformed collection at {} ({}), starting empty",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Serializes and writes the full collection, replacing any prior value.
    pub fn save(&self, reminders: &[Reminder]) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                debug!("Creating data directory: {}", parent.display());
                fs::create_dir_all(parent).map_err(|e| {
                    error!("Failed to create data directory: {}", e);
                    PillboxError::DirectoryError {
                        path: parent.to_path_buf(),
                    }
                })?;
            }
        }

        let json = serde_json::to_string_pretty(reminders)?;

        // Write to a temporary file in the same directory, then move it
        // into place atomically
        let dir = self
            .path
            .parent()
            .ok_or_else(|| PillboxError::DirectoryError {
                path: self.path.clone(),
            })?;
        let mut temp_file = NamedTempFile::new_in(dir)?;
        temp_file.write_all(json.as_bytes())?;
        temp_file.flush()?;
        temp_file.persist(&self.path).map_err(|e| {
            error!("Failed to persist {}: {}", self.path.display(), e.error);
            PillboxError::Io(e.error)
        })?;

        debug!(
            "Saved {} reminder(s) to {}",
            reminders.len(),
            self.path.display()
        );
        Ok(())
    }
}
