//! Agent gateway port
//!
//! Defines how the application layer talks to one agent. The only capability
//! an agent must have is "generate": prompt in, text out. Adapters (HTTP,
//! simulated) live in the infrastructure layer.

use async_trait::async_trait;
use quorum_domain::{AgentDescriptor, AgentError, GenerationParams};
use thiserror::Error;

/// Errors an adapter can report for one call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("Timeout")]
    Timeout,

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl GatewayError {
    /// Inline per-agent error for a call that took `elapsed_ms`
    pub fn into_agent_error(self, elapsed_ms: u64) -> AgentError {
        match self {
            GatewayError::Connection(message) => AgentError::unreachable(message),
            GatewayError::HttpStatus(status) => {
                AgentError::unreachable(format!("agent answered with HTTP {}", status))
            }
            GatewayError::Timeout => AgentError::Timeout {
                after_ms: elapsed_ms,
            },
            GatewayError::Malformed(message) => AgentError::malformed(message),
        }
    }
}

/// One generate call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub prompt: String,
    pub model: String,
    /// Already forced to 0 for deterministic requests
    pub temperature: f64,
    pub max_tokens: u32,
    pub seed: u64,
    pub deterministic: bool,
    pub stop: Vec<String>,
    /// 1 for the shared dispatch, 2 for the debate round
    pub round: u32,
}

impl GenerateRequest {
    pub fn new(
        agent: &AgentDescriptor,
        prompt: impl Into<String>,
        params: &GenerationParams,
        stop: &[String],
        round: u32,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            model: agent.model_id.clone(),
            temperature: params.effective_temperature(),
            max_tokens: params.max_tokens,
            seed: params.seed,
            deterministic: params.deterministic,
            stop: stop.to_vec(),
            round,
        }
    }
}

/// What an agent produced
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub text: String,
    /// Reported by the agent; estimated from the text when absent
    pub token_count: Option<u32>,
    /// Model name the agent reports, if it differs from the configured one
    pub model: Option<String>,
}

impl Generation {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            token_count: None,
            model: None,
        }
    }

    pub fn with_token_count(mut self, count: u32) -> Self {
        self.token_count = Some(count);
        self
    }

    /// Token count, falling back to a whitespace estimate
    pub fn tokens(&self) -> u32 {
        self.token_count
            .unwrap_or_else(|| self.text.split_whitespace().count() as u32)
    }
}

/// Gateway for agent communication
#[async_trait]
pub trait AgentGateway: Send + Sync {
    /// Run one generation on `agent`
    async fn generate(
        &self,
        agent: &AgentDescriptor,
        request: &GenerateRequest,
    ) -> Result<Generation, GatewayError>;

    /// Check that the agent is up
    async fn probe(&self, agent: &AgentDescriptor) -> Result<(), GatewayError>;
}
