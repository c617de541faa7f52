//! Debate configuration from TOML (`[debate]` section)

use quorum_domain::{ConfigIssue, ConfigIssueCode, VotingStrategy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    /// Strategy applied to round-2 answers: "majority" or "weighted"
    pub final_strategy: String,
    /// Added to the request seed in round 2
    pub round2_seed_offset: u64,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        Self {
            final_strategy: "majority".to_string(),
            round2_seed_offset: 7,
        }
    }
}

impl FileDebateConfig {
    /// Parse `final_strategy`, falling back to majority with an error issue
    pub fn parse_final_strategy(&self) -> (VotingStrategy, Vec<ConfigIssue>) {
        match self.final_strategy.parse::<VotingStrategy>() {
            Ok(strategy) => (strategy, vec![]),
            Err(_) => {
                let issue = ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "debate.final_strategy".to_string(),
                        value: self.final_strategy.clone(),
                        valid_values: VotingStrategy::ALL
                            .iter()
                            .map(ToString::to_string)
                            .collect(),
                    },
                    format!(
                        "debate.final_strategy: unknown value '{}'",
                        self.final_strategy
                    ),
                );
                (VotingStrategy::Majority, vec![issue])
            }
        }
    }
}
