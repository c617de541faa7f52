//! Agent list from TOML (`[[agents]]` tables)
//!
//! ```toml
//! [[agents]]
//! id = "agent-a"
//! host = "10.0.0.2"
//! port = 11434
//! model = "llama3:8b"
//! topic_tags = ["math"]
//! api = "ollama"
//! ```

use quorum_domain::{AgentApi, AgentDescriptor, ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAgentEntry {
    pub id: String,
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
    /// Model identifier forwarded to the agent
    pub model: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_base_weight")]
    pub base_weight: f64,
    #[serde(default)]
    pub topic_tags: Vec<String>,
    #[serde(default)]
    pub api: AgentApi,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_base_weight() -> f64 {
    1.0
}

impl FileAgentEntry {
    pub fn to_descriptor(&self) -> AgentDescriptor {
        let mut agent = AgentDescriptor::new(
            self.id.trim(),
            self.host.trim(),
            self.port,
            self.model.trim(),
        )
        .with_base_weight(self.base_weight)
        .with_topic_tags(self.topic_tags.iter().map(|t| t.trim().to_lowercase()))
        .with_api(self.api);
        agent.enabled = self.enabled;
        agent
    }
}

/// Check a whole agent list; every problem is reported, not just the first
pub fn validate_agents(agents: &[FileAgentEntry]) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for agent in agents {
        let id = agent.id.trim();
        let missing = |field: &'static str| {
            ConfigIssue::error(
                ConfigIssueCode::MissingAgentField {
                    id: id.to_string(),
                    field,
                },
                format!("agents: '{}' has no {}", id, field),
            )
        };

        if id.is_empty() {
            issues.push(missing("id"));
            continue;
        }
        if !seen.insert(id) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::DuplicateAgentId { id: id.to_string() },
                format!("agents: duplicate agent id '{}'", id),
            ));
        }
        if agent.model.trim().is_empty() {
            issues.push(missing("model"));
        }
        if agent.host.trim().is_empty() {
            issues.push(missing("host"));
        }
        if agent.port == 0 {
            issues.push(missing("port"));
        }
        if !(agent.base_weight.is_finite() && agent.base_weight > 0.0) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: format!("agents.{}.base_weight", id),
                },
                format!(
                    "agents: '{}' base_weight {} is not positive, it will be clamped",
                    id, agent.base_weight
                ),
            ));
        }
    }

    if !agents.iter().any(|a| a.enabled) {
        issues.push(ConfigIssue::warning(
            ConfigIssueCode::NoEnabledAgents,
            "no enabled agents configured; every query will be rejected",
        ));
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, port: u16, model: &str) -> FileAgentEntry {
        FileAgentEntry {
            id: id.to_string(),
            host: default_host(),
            port,
            model: model.to_string(),
            enabled: true,
            base_weight: 1.0,
            topic_tags: vec![],
            api: AgentApi::Generic,
        }
    }

    #[test]
    fn test_to_descriptor() {
        let mut file = entry(" a ", 9000, "llama3");
        file.topic_tags = vec![" Math ".to_string()];
        file.enabled = false;
        let agent = file.to_descriptor();
        assert_eq!(agent.id.as_str(), "a");
        assert_eq!(agent.model_id, "llama3");
        assert_eq!(agent.topic_tags, vec!["math".to_string()]);
        assert!(!agent.enabled);
    }

    #[test]
    fn test_validate_reports_every_issue() {
        let agents = vec![
            entry("a", 9000, "m"),
            entry("a", 9001, "m"),
            entry("b", 0, ""),
        ];
        let issues = validate_agents(&agents);
        let codes: Vec<_> = issues.iter().map(|i| &i.code).collect();
        assert_eq!(issues.len(), 3);
        assert!(codes.contains(&&ConfigIssueCode::DuplicateAgentId {
            id: "a".to_string()
        }));
        assert!(codes.contains(&&ConfigIssueCode::MissingAgentField {
            id: "b".to_string(),
            field: "port"
        }));
    }

    #[test]
    fn test_no_enabled_agents_is_a_warning() {
        let issues = validate_agents(&[]);
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
    }
}
