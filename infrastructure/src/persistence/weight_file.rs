//! JSON file persistence for the Weight Store
//!
//! Saves go to a sibling temp file first and are renamed into place, so a
//! crash mid-write never leaves a truncated weight file behind.

use quorum_application::{PersistenceError, WeightRepository};
use quorum_domain::WeightSnapshot;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

pub struct JsonWeightFile {
    path: PathBuf,
    /// Serializes concurrent saves
    write_lock: Mutex<()>,
}

impl JsonWeightFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WeightRepository for JsonWeightFile {
    fn load(&self) -> Result<Option<WeightSnapshot>, PersistenceError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| PersistenceError::Format(format!("{}: {}", self.path.display(), e)))
    }

    fn save(&self, snapshot: &WeightSnapshot) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| PersistenceError::Format(e.to_string()))?;

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!("Saved agent weights to {}", self.path.display());
        Ok(())
    }
}
