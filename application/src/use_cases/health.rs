//! Health use case
//!
//! Probes every enabled agent concurrently and reports which are up.

use crate::ports::agent_gateway::AgentGateway;
use crate::registry::RegistryHandle;
use futures::future::join_all;
use quorum_domain::AgentId;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Every enabled agent answered the probe
    Ok,
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentHealth {
    pub id: AgentId,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub agents: Vec<AgentHealth>,
}

impl HealthReport {
    pub fn reachable(&self) -> usize {
        self.agents.iter().filter(|a| a.error.is_none()).count()
    }
}

pub struct HealthUseCase<G: AgentGateway + 'static> {
    gateway: Arc<G>,
    registry: Arc<RegistryHandle>,
    probe_timeout: Duration,
}

impl<G: AgentGateway + 'static> HealthUseCase<G> {
    pub fn new(gateway: Arc<G>, registry: Arc<RegistryHandle>) -> Self {
        Self {
            gateway,
            registry,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub async fn execute(&self) -> HealthReport {
        let registry = self.registry.snapshot();
        let probes = registry.enabled().map(|agent| async move {
            let result =
                tokio::time::timeout(self.probe_timeout, self.gateway.probe(agent)).await;
            let error = match result {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(e.to_string()),
                Err(_) => Some(format!("probe timed out after {:?}", self.probe_timeout)),
            };
            debug!("Probe {}: {}", agent.id, error.as_deref().unwrap_or("ok"));
            AgentHealth {
                id: agent.id.clone(),
                status: if error.is_none() { "ok" } else { "unreachable" },
                error,
            }
        });
        let agents = join_all(probes).await;

        let status = if agents.iter().all(|a| a.error.is_none()) {
            HealthStatus::Ok
        } else {
            HealthStatus::Degraded
        };
        HealthReport { status, agents }
    }
}
