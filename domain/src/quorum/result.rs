//! Aggregation result

use super::strategy::Strategy;
use super::tally::Ballot;
use crate::agent::descriptor::AgentId;
use crate::response::AgentResponse;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The consensus answer of one strategy over one response collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub answer: String,
    /// answer → vote count (majority, isp) or summed weight (weighted, topic)
    pub votes: BTreeMap<String, f64>,
    /// Fraction of successful responses matching `answer`
    pub agreement_rate: f64,
    pub strategy: Strategy,
    /// Debate only: 1 on early stop, 2 otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounds: Option<u32>,
    pub successful_count: usize,
    pub queried_count: usize,
    /// Agents whose answer won, by id
    pub winning_agents: Vec<AgentId>,
    /// Detected topic (topic strategy)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// answer → σ(a) = s(a) − p(a) (isp strategy)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surprise: Option<BTreeMap<String, f64>>,
}

impl AggregateResult {
    /// Assemble a result once a winner is known.
    ///
    /// `ballots` are every successful response, so agreement and the winning
    /// agents are measured against all of them even when a strategy scored a
    /// subset.
    pub(crate) fn assemble(
        strategy: Strategy,
        answer: &str,
        votes: BTreeMap<String, f64>,
        ballots: &[Ballot<'_>],
        responses: &[AgentResponse],
    ) -> Self {
        let winning_agents: Vec<AgentId> = ballots
            .iter()
            .filter(|b| b.answer == answer)
            .map(|b| b.agent.clone())
            .collect();
        let agreement_rate = if ballots.is_empty() {
            0.0
        } else {
            winning_agents.len() as f64 / ballots.len() as f64
        };
        Self {
            answer: answer.to_string(),
            votes,
            agreement_rate,
            strategy,
            rounds: None,
            successful_count: ballots.len(),
            queried_count: responses.len(),
            winning_agents,
            topic: None,
            surprise: None,
        }
    }

    pub fn is_unanimous(&self) -> bool {
        self.successful_count > 0 && self.winning_agents.len() == self.successful_count
    }

    /// Some agents failed but an answer was still produced
    pub fn is_degraded(&self) -> bool {
        self.successful_count < self.queried_count
    }
}
