//! Weight Store configuration from TOML (`[weights]` section)

use quorum_domain::{ConfigIssue, ConfigIssueCode, WeightPolicy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_WEIGHTS_PATH: &str = "logs/agent_weights.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileWeightsConfig {
    /// α in `(0, 1]`
    pub learning_rate: f64,
    pub floor: f64,
    pub ceiling: f64,
    /// Update per-agent consensus rates after every query
    pub track_consensus: bool,
    /// Where weights are restored from and saved to; `None` keeps them in memory
    pub path: Option<PathBuf>,
}

impl Default for FileWeightsConfig {
    fn default() -> Self {
        let policy = WeightPolicy::default();
        Self {
            learning_rate: policy.learning_rate,
            floor: policy.floor,
            ceiling: policy.ceiling,
            track_consensus: true,
            path: Some(PathBuf::from(DEFAULT_WEIGHTS_PATH)),
        }
    }
}

impl FileWeightsConfig {
    pub fn to_policy(&self) -> WeightPolicy {
        WeightPolicy::new(self.learning_rate, self.floor, self.ceiling)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.learning_rate.is_nan() || self.learning_rate <= 0.0 || self.learning_rate > 1.0 {
            issues.push(out_of_range(
                "weights.learning_rate",
                format!(
                    "weights.learning_rate must be in (0, 1], got {}",
                    self.learning_rate
                ),
            ));
        }
        if self.floor.is_nan() || self.floor <= 0.0 {
            issues.push(out_of_range(
                "weights.floor",
                format!("weights.floor must be positive, got {}", self.floor),
            ));
        }
        if self.ceiling.is_nan() || self.ceiling < self.floor {
            issues.push(out_of_range(
                "weights.ceiling",
                format!(
                    "weights.ceiling ({}) must not be below weights.floor ({})",
                    self.ceiling, self.floor
                ),
            ));
        }
        issues
    }
}

fn out_of_range(field: &str, message: String) -> ConfigIssue {
    ConfigIssue::error(
        ConfigIssueCode::OutOfRange {
            field: field.to_string(),
        },
        message,
    )
}
