//! Aggregation strategies
//!
//! Every strategy reduces one completed response collection to an
//! [`AggregateResult`]. Majority, weighted, ISP and topic are pure functions
//! of that collection (plus a read-only weight view), so a single dispatch
//! round can feed all four. Debate drives a second round and lives in
//! [`crate::debate`].
//!
//! # Shared fan-out
//!
//! ```text
//!                ┌──────────── majority ────────┐
//!  dispatch ───▶ │  responses ─ weighted ───────│──▶ AggregateResult (× N)
//!   (once)       │            ─ isp ────────────│
//!                └──────────── topic ───────────┘
//! ```
//!
//! # Determinism
//!
//! Results never depend on the order responses arrived in: ballots are
//! sorted by agent id before any score is summed, and ties go to the answer
//! produced by the lowest agent id.

pub mod isp;
pub mod majority;
pub mod result;
pub mod strategy;
mod tally;
pub mod topic;
pub mod weighted;

pub use result::AggregateResult;
pub use strategy::{Strategy, VotingStrategy};

use crate::agent::descriptor::AgentDescriptor;
use crate::weights::WeightLookup;
use topic::TopicTaxonomy;

/// Read-only inputs a strategy may need besides the responses
#[derive(Clone, Copy)]
pub struct AggregationContext<'a> {
    pub prompt: &'a str,
    pub weights: &'a dyn WeightLookup,
    pub taxonomy: &'a TopicTaxonomy,
    /// Descriptors of the dispatched agents (topic tags)
    pub agents: &'a [AgentDescriptor],
}

impl<'a> AggregationContext<'a> {
    pub fn new(
        prompt: &'a str,
        weights: &'a dyn WeightLookup,
        taxonomy: &'a TopicTaxonomy,
        agents: &'a [AgentDescriptor],
    ) -> Self {
        Self {
            prompt,
            weights,
            taxonomy,
            agents,
        }
    }
}
