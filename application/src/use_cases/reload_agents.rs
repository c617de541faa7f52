//! Reload Agents use case
//!
//! Re-reads the agent list and swaps the registry. Queries already in
//! flight keep the registry they started with.

use crate::ports::agent_source::{AgentSource, AgentSourceError};
use crate::registry::RegistryHandle;
use quorum_domain::{AgentRegistry, DomainError, WeightStore};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ReloadError {
    #[error(transparent)]
    Source(#[from] AgentSourceError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub struct ReloadAgentsUseCase {
    source: Arc<dyn AgentSource>,
    registry: Arc<RegistryHandle>,
    weights: Arc<WeightStore>,
}

impl ReloadAgentsUseCase {
    pub fn new(
        source: Arc<dyn AgentSource>,
        registry: Arc<RegistryHandle>,
        weights: Arc<WeightStore>,
    ) -> Self {
        Self {
            source,
            registry,
            weights,
        }
    }

    /// Returns the number of agents now registered
    pub async fn execute(&self) -> Result<usize, ReloadError> {
        // Sources read files, so they run on the blocking pool
        let source = Arc::clone(&self.source);
        let agents = tokio::task::spawn_blocking(move || source.load_agents())
            .await
            .map_err(|e| AgentSourceError::Read(e.to_string()))??;
        let registry = AgentRegistry::new(agents)?;
        let seeded = self.weights.initialize(registry.all());
        let count = registry.len();
        let previous = self.registry.replace(registry);
        info!(
            "Reloaded agents: {} → {} ({} new weights seeded)",
            previous.len(),
            count,
            seeded
        );
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::agent_source::StaticAgents;
    use quorum_domain::{AgentDescriptor, AgentId};

    #[tokio::test]
    async fn test_reload_swaps_registry_and_seeds_weights() {
        let registry = Arc::new(RegistryHandle::default());
        let weights = Arc::new(WeightStore::default());
        let source = StaticAgents(vec![
            AgentDescriptor::new("a", "h", 1, "m"),
            AgentDescriptor::new("b", "h", 2, "m").with_base_weight(2.0),
        ]);
        let use_case =
            ReloadAgentsUseCase::new(Arc::new(source), Arc::clone(&registry), Arc::clone(&weights));

        assert_eq!(use_case.execute().await.unwrap(), 2);
        assert_eq!(registry.snapshot().len(), 2);
        assert_eq!(weights.get(&AgentId::from("b")), 2.0);
    }

    #[tokio::test]
    async fn test_duplicate_ids_keep_old_registry() {
        let registry = Arc::new(RegistryHandle::default());
        let source = StaticAgents(vec![
            AgentDescriptor::new("a", "h", 1, "m"),
            AgentDescriptor::new("a", "h", 2, "m"),
        ]);
        let use_case = ReloadAgentsUseCase::new(
            Arc::new(source),
            Arc::clone(&registry),
            Arc::new(WeightStore::default()),
        );
        assert!(matches!(
            use_case.execute().await,
            Err(ReloadError::Domain(_))
        ));
        assert!(registry.snapshot().is_empty());
    }
}
