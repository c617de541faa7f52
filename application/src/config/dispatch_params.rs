//! Dispatch parameters: timeouts and outbound prompt shape.

use quorum_domain::DEFAULT_PREAMBLE;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Stop sequences forwarded to agents unless configured otherwise
pub fn default_stop() -> Vec<String> {
    vec![
        "\n\n".to_string(),
        "\nExplanation:".to_string(),
        "Explanation:".to_string(),
    ]
}

/// Timing and prompt parameters for every dispatch round.
///
/// | Field | Round 1 | Debate round 2 |
/// |-------|---------|----------------|
/// | per-call timeout | `request_timeout` | `min(request_timeout, debate_round_timeout)` |
/// | round deadline | `query_deadline` | `min(request_timeout, debate_round_timeout)` |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchParams {
    /// Bound on a single agent call
    pub request_timeout: Duration,
    /// Bound on a whole round; outstanding calls are cancelled after it
    pub query_deadline: Duration,
    /// Stricter bound for the debate round
    pub debate_round_timeout: Duration,
    /// Text placed before the question in round 1
    pub preamble: String,
    pub stop: Vec<String>,
}

impl Default for DispatchParams {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(180),
            query_deadline: Duration::from_secs(180),
            debate_round_timeout: Duration::from_secs(75),
            preamble: DEFAULT_PREAMBLE.to_string(),
            stop: default_stop(),
        }
    }
}

impl DispatchParams {
    // ==================== Builder Methods ====================

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_query_deadline(mut self, deadline: Duration) -> Self {
        self.query_deadline = deadline;
        self
    }

    pub fn with_debate_round_timeout(mut self, timeout: Duration) -> Self {
        self.debate_round_timeout = timeout;
        self
    }

    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = preamble.into();
        self
    }

    pub fn with_stop(mut self, stop: Vec<String>) -> Self {
        self.stop = stop;
        self
    }

    /// Bound used for both the per-call timeout and the deadline of round 2
    pub fn round2_timeout(&self) -> Duration {
        self.request_timeout.min(self.debate_round_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = DispatchParams::default();
        assert_eq!(params.request_timeout, Duration::from_secs(180));
        assert_eq!(params.round2_timeout(), Duration::from_secs(75));
        assert_eq!(params.stop.len(), 3);
    }

    #[test]
    fn test_round2_never_exceeds_request_timeout() {
        let params = DispatchParams::default().with_request_timeout(Duration::from_secs(30));
        assert_eq!(params.round2_timeout(), Duration::from_secs(30));
    }
}
