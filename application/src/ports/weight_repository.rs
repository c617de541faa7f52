//! Weight persistence port

use quorum_domain::WeightSnapshot;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid weight file: {0}")]
    Format(String),
}

/// Loads and saves the Weight Store
pub trait WeightRepository: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<WeightSnapshot>, PersistenceError>;

    fn save(&self, snapshot: &WeightSnapshot) -> Result<(), PersistenceError>;
}

/// Keeps the last saved snapshot in memory; used by tests and dry runs
#[derive(Debug, Default)]
pub struct InMemoryWeights {
    saved: Mutex<Option<WeightSnapshot>>,
}

impl InMemoryWeights {
    pub fn last_saved(&self) -> Option<WeightSnapshot> {
        self.saved
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl WeightRepository for InMemoryWeights {
    fn load(&self) -> Result<Option<WeightSnapshot>, PersistenceError> {
        Ok(self.last_saved())
    }

    fn save(&self, snapshot: &WeightSnapshot) -> Result<(), PersistenceError> {
        *self
            .saved
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(snapshot.clone());
        Ok(())
    }
}
