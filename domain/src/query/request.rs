//! Query requests
//!
//! [`QueryRequest`] is the wire form accepted by `POST /query` and the CLI.
//! [`QueryRequest::resolve`] validates it against an [`AgentRegistry`]
//! snapshot and produces a [`ResolvedQuery`]; nothing is dispatched for a
//! request that fails to resolve.

use super::params::{DEFAULT_MAX_TOKENS, DEFAULT_SEED, DEFAULT_TEMPERATURE, GenerationParams};
use crate::agent::descriptor::{AgentDescriptor, AgentId};
use crate::agent::registry::AgentRegistry;
use crate::core::error::DomainError;
use crate::quorum::strategy::Strategy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Highest temperature accepted from callers
pub const MAX_TEMPERATURE: f64 = 2.0;

/// A query as submitted by a caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub prompt: String,
    #[serde(default = "default_strategy")]
    pub strategy: String,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_deterministic")]
    pub deterministic: bool,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Restrict the fan-out to these agents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_ids: Option<Vec<AgentId>>,
    /// Cap the fan-out size when `agent_ids` is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_agents: Option<usize>,
    /// Evaluate majority, weighted, isp and topic over the same dispatch
    #[serde(default)]
    pub compare_strategies: bool,
    /// Known correct answer; updates agent weights after aggregation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_truth: Option<String>,
    /// Opaque caller data copied into the metrics record
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

fn default_strategy() -> String {
    Strategy::Majority.as_str().to_string()
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_deterministic() -> bool {
    true
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

impl QueryRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            strategy: default_strategy(),
            seed: DEFAULT_SEED,
            temperature: DEFAULT_TEMPERATURE,
            deterministic: true,
            max_tokens: DEFAULT_MAX_TOKENS,
            agent_ids: None,
            max_agents: None,
            compare_strategies: false,
            ground_truth: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = strategy.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_agent_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<AgentId>,
    {
        self.agent_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_max_agents(mut self, max_agents: usize) -> Self {
        self.max_agents = Some(max_agents);
        self
    }

    pub fn with_compare_strategies(mut self, compare: bool) -> Self {
        self.compare_strategies = compare;
        self
    }

    pub fn with_ground_truth(mut self, ground_truth: impl Into<String>) -> Self {
        self.ground_truth = Some(ground_truth.into());
        self
    }

    /// Validate the request and pick the agents it fans out to.
    ///
    /// Errors, in the order they are checked:
    /// - [`DomainError::InvalidRequest`] for an empty prompt, a temperature
    ///   outside `[0, 2]`, zero `max_tokens` or zero `max_agents`
    /// - [`DomainError::UnknownStrategy`] for an unrecognised strategy name
    /// - [`DomainError::InvalidRequest`] for `compare_strategies` with debate
    ///   or an unknown agent id
    /// - [`DomainError::NoAgentsAvailable`] when no enabled agent remains
    pub fn resolve(&self, registry: &AgentRegistry) -> Result<ResolvedQuery, DomainError> {
        let prompt = self.prompt.trim();
        if prompt.is_empty() {
            return Err(DomainError::InvalidRequest(
                "prompt cannot be empty".to_string(),
            ));
        }
        if !self.temperature.is_finite() || !(0.0..=MAX_TEMPERATURE).contains(&self.temperature)
        {
            return Err(DomainError::InvalidRequest(format!(
                "temperature must be within [0, {}], got {}",
                MAX_TEMPERATURE, self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(DomainError::InvalidRequest(
                "max_tokens must be positive".to_string(),
            ));
        }
        if self.max_agents == Some(0) {
            return Err(DomainError::InvalidRequest(
                "max_agents must be positive".to_string(),
            ));
        }

        let strategy: Strategy = self.strategy.parse()?;
        if self.compare_strategies && strategy == Strategy::Debate {
            return Err(DomainError::InvalidRequest(
                "compare_strategies cannot be combined with debate".to_string(),
            ));
        }

        let agents = registry.resolve(self.agent_ids.as_deref(), self.max_agents)?;

        Ok(ResolvedQuery {
            prompt: prompt.to_string(),
            strategy,
            params: GenerationParams {
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                seed: self.seed,
                deterministic: self.deterministic,
            },
            agents,
            max_agents: self.max_agents,
            compare_strategies: self.compare_strategies,
            ground_truth: self
                .ground_truth
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            metadata: self.metadata.clone(),
        })
    }
}

/// A validated query with its agent subset fixed
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedQuery {
    pub prompt: String,
    pub strategy: Strategy,
    pub params: GenerationParams,
    /// Non-empty, enabled, in registry order
    pub agents: Vec<AgentDescriptor>,
    pub max_agents: Option<usize>,
    pub compare_strategies: bool,
    pub ground_truth: Option<String>,
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl ResolvedQuery {
    pub fn agent_ids(&self) -> Vec<AgentId> {
        self.agents.iter().map(|a| a.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> AgentRegistry {
        AgentRegistry::new(vec![
            AgentDescriptor::new("a", "h", 1, "m"),
            AgentDescriptor::new("b", "h", 2, "m"),
            AgentDescriptor::new("c", "h", 3, "m").disabled(),
        ])
        .unwrap()
    }

    #[test]
    fn test_wire_defaults() {
        let request: QueryRequest = serde_json::from_str(r#"{"prompt":"2+2?"}"#).unwrap();
        assert_eq!(request.strategy, "majority");
        assert_eq!(request.seed, 42);
        assert_eq!(request.temperature, 0.2);
        assert!(request.deterministic);
        assert_eq!(request.max_tokens, 64);
        assert!(request.agent_ids.is_none());
        assert!(!request.compare_strategies);
    }

    #[test]
    fn test_resolve_ok() {
        let resolved = QueryRequest::new("  What is 2+2?  ")
            .with_strategy("Weighted")
            .resolve(&registry())
            .unwrap();
        assert_eq!(resolved.prompt, "What is 2+2?");
        assert_eq!(resolved.strategy, Strategy::Weighted);
        let ids: Vec<_> = resolved.agent_ids().iter().map(|i| i.to_string()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_unknown_strategy() {
        let error = QueryRequest::new("q")
            .with_strategy("borda")
            .resolve(&registry())
            .unwrap_err();
        assert_eq!(error, DomainError::UnknownStrategy("borda".to_string()));
    }

    #[test]
    fn test_invalid_fields() {
        let registry = registry();
        let cases = [
            QueryRequest::new("   "),
            QueryRequest {
                temperature: 2.5,
                ..QueryRequest::new("q")
            },
            QueryRequest {
                temperature: f64::NAN,
                ..QueryRequest::new("q")
            },
            QueryRequest {
                max_tokens: 0,
                ..QueryRequest::new("q")
            },
            QueryRequest::new("q").with_max_agents(0),
            QueryRequest::new("q")
                .with_strategy("debate")
                .with_compare_strategies(true),
        ];
        for request in cases {
            assert!(matches!(
                request.resolve(&registry),
                Err(DomainError::InvalidRequest(_))
            ));
        }
    }

    #[test]
    fn test_only_disabled_agents_selected() {
        let error = QueryRequest::new("q")
            .with_agent_ids(["c"])
            .resolve(&registry())
            .unwrap_err();
        assert_eq!(error, DomainError::NoAgentsAvailable);
    }

    #[test]
    fn test_blank_ground_truth_is_dropped() {
        let resolved = QueryRequest::new("q")
            .with_ground_truth("  ")
            .resolve(&registry())
            .unwrap();
        assert!(resolved.ground_truth.is_none());
    }
}
