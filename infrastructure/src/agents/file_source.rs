//! Agent source backed by the configuration files
//!
//! A reload re-runs the full configuration discovery so edits to
//! `quorum.toml` (or the `--config` file) are picked up without a restart.

use crate::config::{ConfigLoader, validate_agents};
use quorum_application::{AgentSource, AgentSourceError};
use quorum_domain::AgentDescriptor;
use std::path::PathBuf;
use tracing::warn;

pub struct FileAgentSource {
    config_path: Option<PathBuf>,
}

impl FileAgentSource {
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self { config_path }
    }
}

impl AgentSource for FileAgentSource {
    fn load_agents(&self) -> Result<Vec<AgentDescriptor>, AgentSourceError> {
        let config = ConfigLoader::load(self.config_path.as_ref())
            .map_err(|e| AgentSourceError::Read(e.to_string()))?;

        let issues = validate_agents(&config.agents);
        if let Some(error) = issues.iter().find(|i| i.is_error()) {
            return Err(AgentSourceError::Invalid(error.message.clone()));
        }
        for issue in &issues {
            warn!("{}", issue);
        }
        Ok(config.agent_descriptors())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("agents.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_loads_agents_from_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "[[agents]]\nid = \"a\"\nport = 9000\nmodel = \"m\"\n\n[[agents]]\nid = \"b\"\nport = 9001\nmodel = \"m\"\n",
        );
        let agents = FileAgentSource::new(Some(path)).load_agents().unwrap();
        let ids: Vec<_> = agents.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_invalid_agents_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "[[agents]]\nid = \"a\"\nport = 9000\nmodel = \"m\"\n\n[[agents]]\nid = \"a\"\nport = 9001\nmodel = \"m\"\n",
        );
        assert!(matches!(
            FileAgentSource::new(Some(path)).load_agents(),
            Err(AgentSourceError::Invalid(_))
        ));
    }
}
