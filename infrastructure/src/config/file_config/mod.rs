//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application/domain
//! types by the `to_*` helpers.

mod agents;
mod debate;
mod dispatch;
mod metrics;
mod output;
mod server;
mod topics;
mod weights;

pub use agents::{FileAgentEntry, validate_agents};
pub use debate::FileDebateConfig;
pub use dispatch::FileDispatchConfig;
pub use metrics::{DEFAULT_METRICS_PATH, FileMetricsConfig};
pub use output::FileOutputConfig;
pub use server::{DEFAULT_BIND, FileServerConfig};
pub use topics::FileTopicConfig;
pub use weights::{DEFAULT_WEIGHTS_PATH, FileWeightsConfig};

use quorum_application::OrchestratorConfig;
use quorum_domain::{AgentDescriptor, ConfigIssue, TopicTaxonomy};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: FileServerConfig,
    /// Timeouts, preamble and stop sequences
    pub dispatch: FileDispatchConfig,
    /// Weight Store policy and persistence
    pub weights: FileWeightsConfig,
    pub debate: FileDebateConfig,
    pub metrics: FileMetricsConfig,
    pub output: FileOutputConfig,
    /// Topic taxonomy; empty means the built-in one
    pub topics: Vec<FileTopicConfig>,
    pub agents: Vec<FileAgentEntry>,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. It checks:
    /// 1. Agent list (ids, required fields, at least one enabled)
    /// 2. Dispatch timeouts
    /// 3. Weight policy bounds
    /// 4. Debate final strategy
    /// 5. Output format
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(validate_agents(&self.agents));
        issues.extend(self.dispatch.validate());
        issues.extend(self.weights.validate());
        issues.extend(self.debate.parse_final_strategy().1);
        issues.extend(self.output.validate());
        issues
    }

    /// Check whether any issues are errors (i.e. fatal).
    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(ConfigIssue::is_error)
    }

    pub fn agent_descriptors(&self) -> Vec<AgentDescriptor> {
        self.agents.iter().map(FileAgentEntry::to_descriptor).collect()
    }

    pub fn taxonomy(&self) -> TopicTaxonomy {
        topics::to_taxonomy(&self.topics)
    }

    pub fn to_orchestrator_config(&self) -> OrchestratorConfig {
        let mut config = OrchestratorConfig::default()
            .with_dispatch(self.dispatch.to_dispatch_params())
            .with_debate_final(self.debate.parse_final_strategy().0)
            .with_track_consensus(self.weights.track_consensus)
            .with_taxonomy(self.taxonomy());
        config.round2_seed_offset = self.debate.round2_seed_offset;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_domain::{AgentApi, VotingStrategy};
    use std::time::Duration;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[server]
bind = "0.0.0.0:9000"
cors_origins = []

[dispatch]
request_timeout_secs = 30
debate_round_timeout_secs = 10

[weights]
learning_rate = 0.1
path = "/tmp/weights.json"

[debate]
final_strategy = "weighted"
round2_seed_offset = 3

[[topics]]
label = "law"
keywords = ["statute", "court"]

[[agents]]
id = "agent-a"
host = "10.0.0.2"
port = 11434
model = "llama3:8b"
topic_tags = ["law"]
api = "ollama"

[[agents]]
id = "agent-b"
port = 8001
model = "mistral"
enabled = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert!(config.server.cors_origins.is_empty());
        assert_eq!(config.agents.len(), 2);
        assert_eq!(config.agents[0].api, AgentApi::Ollama);
        assert_eq!(config.agents[1].host, "localhost");
        assert!(config.validate().is_empty());

        let orchestrator = config.to_orchestrator_config();
        assert_eq!(orchestrator.dispatch.request_timeout, Duration::from_secs(30));
        assert_eq!(orchestrator.dispatch.query_deadline, Duration::from_secs(180));
        assert_eq!(orchestrator.debate_final, VotingStrategy::Weighted);
        assert_eq!(orchestrator.round2_seed_offset, 3);
        assert_eq!(orchestrator.taxonomy.topics[0].label, "law");

        let agents = config.agent_descriptors();
        assert!(agents[0].serves_topic("law"));
        assert!(!agents[1].enabled);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[dispatch]
query_deadline_secs = 60
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.dispatch.query_deadline_secs, 60);
        // Defaults should apply
        assert_eq!(config.dispatch.request_timeout_secs, 180);
        assert_eq!(config.server.bind, DEFAULT_BIND);
        assert_eq!(config.server.cors_origins.len(), 2);
        assert!(config.weights.track_consensus);
    }

    #[test]
    fn test_default_config_only_warns() {
        let config = FileConfig::default();
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(!FileConfig::has_errors(&issues));
    }

    #[test]
    fn test_errors_are_collected_across_sections() {
        let toml_str = r#"
[dispatch]
request_timeout_secs = 0

[debate]
final_strategy = "borda"

[[agents]]
id = "a"
port = 1
model = ""
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 3);
        assert!(FileConfig::has_errors(&issues));
    }
}
