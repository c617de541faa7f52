//! Dispatch configuration from TOML (`[dispatch]` section)
//!
//! ```toml
//! [dispatch]
//! request_timeout_secs = 180
//! query_deadline_secs = 180
//! debate_round_timeout_secs = 75
//! system_prompt = "Answer with a single letter."
//! stop = ["\n\n", "Explanation:"]
//! ```

use quorum_application::DispatchParams;
use quorum_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDispatchConfig {
    /// Per-call timeout
    pub request_timeout_secs: u64,
    /// Whole-round deadline
    pub query_deadline_secs: u64,
    /// Debate round-2 bound (per call and deadline)
    pub debate_round_timeout_secs: u64,
    /// Replaces the default answer-format preamble
    pub system_prompt: Option<String>,
    /// Replaces the default stop sequences
    pub stop: Option<Vec<String>>,
}

impl Default for FileDispatchConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 180,
            query_deadline_secs: 180,
            debate_round_timeout_secs: 75,
            system_prompt: None,
            stop: None,
        }
    }
}

impl FileDispatchConfig {
    pub fn to_dispatch_params(&self) -> DispatchParams {
        let mut params = DispatchParams::default()
            .with_request_timeout(Duration::from_secs(self.request_timeout_secs))
            .with_query_deadline(Duration::from_secs(self.query_deadline_secs))
            .with_debate_round_timeout(Duration::from_secs(self.debate_round_timeout_secs));
        if let Some(prompt) = self.system_prompt.as_deref().filter(|p| !p.trim().is_empty()) {
            params = params.with_preamble(prompt);
        }
        if let Some(stop) = &self.stop {
            params = params.with_stop(stop.clone());
        }
        params
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        [
            ("dispatch.request_timeout_secs", self.request_timeout_secs),
            ("dispatch.query_deadline_secs", self.query_deadline_secs),
            (
                "dispatch.debate_round_timeout_secs",
                self.debate_round_timeout_secs,
            ),
        ]
        .into_iter()
        .filter(|(_, secs)| *secs == 0)
        .map(|(field, _)| {
            ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: field.to_string(),
                },
                format!("{} cannot be 0", field),
            )
        })
        .collect()
    }
}
