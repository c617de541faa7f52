//! Weight Store persistence shared by every use case that learns

use crate::ports::weight_repository::{PersistenceError, WeightRepository};
use quorum_domain::WeightStore;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::warn;

/// Writes Weight Store snapshots through a [`WeightRepository`].
///
/// The snapshot is taken while holding the write order lock, so a save can
/// never overwrite the file with a snapshot older than the one on disk.
/// Clones share the lock.
#[derive(Clone)]
pub struct WeightPersister {
    weights: Arc<WeightStore>,
    repository: Arc<dyn WeightRepository>,
    order: Arc<Mutex<()>>,
}

impl WeightPersister {
    pub fn new(weights: Arc<WeightStore>, repository: Arc<dyn WeightRepository>) -> Self {
        Self {
            weights,
            repository,
            order: Arc::new(Mutex::new(())),
        }
    }

    /// Snapshot and save on the calling thread
    pub fn save_now(&self) -> Result<(), PersistenceError> {
        let _order = self.order.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = self.weights.snapshot();
        self.repository.save(&snapshot)
    }

    /// Snapshot and save on the blocking pool; failures are logged only
    pub async fn persist(&self) {
        let persister = self.clone();
        match tokio::task::spawn_blocking(move || persister.save_now()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to persist agent weights: {}", e),
            Err(e) => warn!("Weight persistence task did not finish: {}", e),
        }
    }
}
