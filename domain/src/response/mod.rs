//! Per-agent responses
//!
//! Exactly one [`AgentResponse`] exists per dispatched agent per round. It is
//! either a success (raw text plus normalized answer) or a failure (an
//! [`AgentError`]), never both.

use crate::agent::descriptor::AgentId;
use crate::answer::answer_token;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-agent failure, captured inline instead of aborting the query
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum AgentError {
    #[error("agent unreachable: {message}")]
    #[serde(rename = "AgentUnreachable")]
    Unreachable { message: String },

    #[error("agent timed out after {after_ms}ms")]
    #[serde(rename = "AgentTimeout")]
    Timeout { after_ms: u64 },

    #[error("malformed agent response: {message}")]
    #[serde(rename = "AgentMalformedResponse")]
    MalformedResponse { message: String },
}

impl AgentError {
    pub fn unreachable(message: impl Into<String>) -> Self {
        AgentError::Unreachable {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        AgentError::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, AgentError::Timeout { .. })
    }
}

/// One agent's answer (or failure) for one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub agent_id: AgentId,
    pub model_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized_answer: Option<String>,
    pub latency_ms: f64,
    pub token_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<AgentError>,
}

impl AgentResponse {
    /// Build a response from raw agent text.
    ///
    /// The answer is extracted and normalized here so every strategy sees
    /// the same token. Text that normalizes to nothing is recorded as a
    /// malformed response.
    pub fn success(
        agent_id: AgentId,
        model_id: impl Into<String>,
        raw_text: impl Into<String>,
        token_count: u32,
        latency_ms: f64,
    ) -> Self {
        let model_id = model_id.into();
        let raw_text = raw_text.into();
        let normalized = answer_token(&raw_text);
        if normalized.is_empty() {
            return Self::failure(
                agent_id,
                model_id,
                AgentError::malformed("answer is empty after normalization"),
                latency_ms,
            );
        }
        Self {
            agent_id,
            model_id,
            raw_text: Some(raw_text),
            normalized_answer: Some(normalized),
            latency_ms,
            token_count,
            error: None,
        }
    }

    pub fn failure(
        agent_id: AgentId,
        model_id: impl Into<String>,
        error: AgentError,
        latency_ms: f64,
    ) -> Self {
        Self {
            agent_id,
            model_id: model_id.into(),
            raw_text: None,
            normalized_answer: None,
            latency_ms,
            token_count: 0,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// The normalized answer of a successful response
    pub fn answer(&self) -> Option<&str> {
        match self.error {
            None => self.normalized_answer.as_deref(),
            Some(_) => None,
        }
    }
}
