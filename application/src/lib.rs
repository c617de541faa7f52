//! Application layer for ensemble-quorum
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod registry;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DispatchParams, OrchestratorConfig};
pub use ports::{
    agent_gateway::{AgentGateway, GatewayError, GenerateRequest, Generation},
    agent_source::{AgentSource, AgentSourceError, StaticAgents},
    metrics_sink::{MetricsSink, NoMetrics, QueryMetricsRecord},
    progress::{DispatchProgress, NoProgress},
    weight_repository::{InMemoryWeights, PersistenceError, WeightRepository},
};
pub use registry::RegistryHandle;
pub use use_cases::debate::{DebateController, DebateOutcome, DebateTrace};
pub use use_cases::dispatch::{FanOutDispatcher, RoundBounds, RoundJob, RoundOutcome};
pub use use_cases::feedback::{FeedbackInput, FeedbackUseCase};
pub use use_cases::health::{AgentHealth, HealthReport, HealthStatus, HealthUseCase};
pub use use_cases::persist_weights::WeightPersister;
pub use use_cases::reload_agents::{ReloadAgentsUseCase, ReloadError};
pub use use_cases::run_query::{QueryOutcome, RunQueryError, RunQueryUseCase};
