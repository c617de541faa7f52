//! Agent source port
//!
//! Where the agent list comes from when the registry is (re)loaded.

use quorum_domain::AgentDescriptor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentSourceError {
    #[error("Failed to read agents: {0}")]
    Read(String),

    #[error("Invalid agent configuration: {0}")]
    Invalid(String),
}

pub trait AgentSource: Send + Sync {
    fn load_agents(&self) -> Result<Vec<AgentDescriptor>, AgentSourceError>;
}

/// Fixed agent list
pub struct StaticAgents(pub Vec<AgentDescriptor>);

impl AgentSource for StaticAgents {
    fn load_agents(&self) -> Result<Vec<AgentDescriptor>, AgentSourceError> {
        Ok(self.0.clone())
    }
}
