//! Weight Store
//!
//! Adaptive per-agent weights shared across concurrent queries. Strategies
//! never see the raw maps: they read through [`WeightLookup`], usually from a
//! [`WeightSnapshot`] taken when aggregation starts.

pub mod policy;
pub mod store;

pub use policy::WeightPolicy;
pub use store::{WeightSnapshot, WeightStore};

use crate::agent::descriptor::AgentId;

/// Weight an agent has before anything is known about it
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Consensus rate an agent has before its first aggregation
pub const DEFAULT_CONSENSUS_RATE: f64 = 1.0;

/// Read-only view of agent weights handed to strategies
pub trait WeightLookup: Send + Sync {
    /// Global weight of an agent
    fn weight(&self, agent: &AgentId) -> f64;

    /// Topic-scoped weight, falling back to the global weight for unseen
    /// (agent, topic) pairs
    fn topic_weight(&self, agent: &AgentId, topic: &str) -> f64;

    /// How often the agent agreed with the winning answer, in `[0, 1]`
    fn consensus_rate(&self, agent: &AgentId) -> f64;
}
