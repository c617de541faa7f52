//! Shared handle to the current agent registry
//!
//! Queries take an `Arc` snapshot when they start. A reload swaps the
//! pointer; queries already running keep the registry they started with.

use quorum_domain::AgentRegistry;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Default)]
pub struct RegistryHandle {
    current: RwLock<Arc<AgentRegistry>>,
}

impl RegistryHandle {
    pub fn new(registry: AgentRegistry) -> Self {
        Self {
            current: RwLock::new(Arc::new(registry)),
        }
    }

    /// The registry as of now
    pub fn snapshot(&self) -> Arc<AgentRegistry> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Swap in a new registry; returns the previous one
    pub fn replace(&self, registry: AgentRegistry) -> Arc<AgentRegistry> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, Arc::new(registry))
    }
}
