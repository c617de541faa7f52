//! Metrics sink configuration from TOML (`[metrics]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_METRICS_PATH: &str = "logs/query_metrics.jsonl";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMetricsConfig {
    /// JSONL file receiving one record per query; `None` disables metrics
    pub path: Option<PathBuf>,
}

impl Default for FileMetricsConfig {
    fn default() -> Self {
        Self {
            path: Some(PathBuf::from(DEFAULT_METRICS_PATH)),
        }
    }
}
