//! Agent descriptor value objects

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique agent identifier
///
/// Ordering is byte-wise on the underlying string; the majority tie-break
/// relies on it, so `"agent-10"` sorts before `"agent-2"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AgentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for AgentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Wire protocol spoken by an agent's generate endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentApi {
    /// `POST /generate` with `{prompt, model, ...}` answering `{text, token_count}`
    #[default]
    Generic,
    /// Ollama-compatible `POST /api/generate`
    Ollama,
}

impl fmt::Display for AgentApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentApi::Generic => write!(f, "generic"),
            AgentApi::Ollama => write!(f, "ollama"),
        }
    }
}

/// An independently hosted model-serving endpoint
///
/// Immutable for the duration of a query; the registry holding it may be
/// swapped between queries.
///
/// # Example
///
/// ```
/// use quorum_domain::AgentDescriptor;
///
/// let agent = AgentDescriptor::new("agent-a", "10.0.0.2", 11434, "llama3:8b")
///     .with_topic_tags(["math"]);
/// assert!(agent.enabled);
/// assert_eq!(agent.base_url(), "http://10.0.0.2:11434");
/// assert!(agent.serves_topic("math"));
/// assert!(!agent.serves_topic("coding"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    pub id: AgentId,
    pub host: String,
    pub port: u16,
    /// Model identifier forwarded to the agent
    pub model_id: String,
    pub enabled: bool,
    /// Initial weight seeded into the Weight Store
    #[serde(default = "default_base_weight")]
    pub base_weight: f64,
    /// Topics this agent is considered competent for
    #[serde(default)]
    pub topic_tags: Vec<String>,
    #[serde(default)]
    pub api: AgentApi,
}

fn default_base_weight() -> f64 {
    1.0
}

impl AgentDescriptor {
    pub fn new(
        id: impl Into<AgentId>,
        host: impl Into<String>,
        port: u16,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            host: host.into(),
            port,
            model_id: model_id.into(),
            enabled: true,
            base_weight: default_base_weight(),
            topic_tags: Vec::new(),
            api: AgentApi::default(),
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn with_base_weight(mut self, weight: f64) -> Self {
        self.base_weight = weight;
        self
    }

    pub fn with_topic_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topic_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_api(mut self, api: AgentApi) -> Self {
        self.api = api;
        self
    }

    /// `http://host:port`
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Whether this agent is tagged for `topic` (or for everything via `general`)
    pub fn serves_topic(&self, topic: &str) -> bool {
        self.topic_tags
            .iter()
            .any(|t| t.eq_ignore_ascii_case(topic) || t.eq_ignore_ascii_case("general"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_id_ordering_is_bytewise() {
        let mut ids = vec![AgentId::from("b"), AgentId::from("a10"), AgentId::from("a2")];
        ids.sort();
        let sorted: Vec<_> = ids.iter().map(AgentId::as_str).collect();
        assert_eq!(sorted, vec!["a10", "a2", "b"]);
    }

    #[test]
    fn test_general_tag_serves_every_topic() {
        let agent = AgentDescriptor::new("a", "localhost", 1, "m").with_topic_tags(["general"]);
        assert!(agent.serves_topic("math"));
        assert!(agent.serves_topic("coding"));

        let untagged = AgentDescriptor::new("b", "localhost", 1, "m");
        assert!(!untagged.serves_topic("math"));
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{"id":"x","host":"h","port":80,"model_id":"m","enabled":false}"#;
        let agent: AgentDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(agent.id.as_str(), "x");
        assert!(!agent.enabled);
        assert_eq!(agent.base_weight, 1.0);
        assert_eq!(agent.api, AgentApi::Generic);
        assert!(agent.topic_tags.is_empty());
    }
}
