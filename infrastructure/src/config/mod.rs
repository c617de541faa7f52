//! Configuration file loading for ensemble-quorum
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables `QUORUM_*` (nested keys joined by `__`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./quorum.toml` or `./.quorum.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/ensemble-quorum/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    DEFAULT_BIND, DEFAULT_METRICS_PATH, DEFAULT_WEIGHTS_PATH, FileAgentEntry, FileConfig,
    FileDebateConfig, FileDispatchConfig, FileMetricsConfig, FileOutputConfig, FileServerConfig,
    FileTopicConfig, FileWeightsConfig, validate_agents,
};
pub use loader::ConfigLoader;
