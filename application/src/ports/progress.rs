//! Progress notification port
//!
//! Defines the interface for reporting fan-out progress.

use quorum_domain::AgentId;

/// Callback for progress updates during a dispatch round
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console spinner, nothing at all for the server).
pub trait DispatchProgress: Send + Sync {
    /// Called when a round is sent to `agents` agents
    fn on_round_start(&self, round: u32, agents: usize);

    /// Called when one agent answered or failed
    fn on_agent_complete(&self, round: u32, agent: &AgentId, success: bool);

    /// Called when the round is over (all answered or deadline hit)
    fn on_round_complete(&self, round: u32);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DispatchProgress for NoProgress {
    fn on_round_start(&self, _round: u32, _agents: usize) {}
    fn on_agent_complete(&self, _round: u32, _agent: &AgentId, _success: bool) {}
    fn on_round_complete(&self, _round: u32) {}
}
