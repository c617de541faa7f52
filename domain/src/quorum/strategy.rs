//! Strategy selection

use super::AggregationContext;
use super::result::AggregateResult;
use super::{isp, majority, topic, weighted};
use crate::core::error::DomainError;
use crate::response::AgentResponse;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every aggregation strategy a query can name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Majority,
    Weighted,
    Isp,
    Topic,
    /// Two dispatch rounds with early stop
    Debate,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Majority,
        Strategy::Weighted,
        Strategy::Isp,
        Strategy::Topic,
        Strategy::Debate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Majority => "majority",
            Strategy::Weighted => "weighted",
            Strategy::Isp => "isp",
            Strategy::Topic => "topic",
            Strategy::Debate => "debate",
        }
    }

    /// The single-round strategy, or `None` for debate
    pub fn voting(&self) -> Option<VotingStrategy> {
        match self {
            Strategy::Majority => Some(VotingStrategy::Majority),
            Strategy::Weighted => Some(VotingStrategy::Weighted),
            Strategy::Isp => Some(VotingStrategy::Isp),
            Strategy::Topic => Some(VotingStrategy::Topic),
            Strategy::Debate => None,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == wanted)
            .ok_or_else(|| DomainError::UnknownStrategy(s.to_string()))
    }
}

/// Strategies that are a pure function of one response collection
///
/// These four share a single dispatch round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VotingStrategy {
    Majority,
    Weighted,
    Isp,
    Topic,
}

impl VotingStrategy {
    pub const ALL: [VotingStrategy; 4] = [
        VotingStrategy::Majority,
        VotingStrategy::Weighted,
        VotingStrategy::Isp,
        VotingStrategy::Topic,
    ];

    pub fn strategy(&self) -> Strategy {
        match self {
            VotingStrategy::Majority => Strategy::Majority,
            VotingStrategy::Weighted => Strategy::Weighted,
            VotingStrategy::Isp => Strategy::Isp,
            VotingStrategy::Topic => Strategy::Topic,
        }
    }

    /// Aggregate a completed response collection.
    ///
    /// Fails with [`DomainError::NoAgentsResponded`] when no response succeeded.
    pub fn aggregate(
        &self,
        responses: &[AgentResponse],
        ctx: &AggregationContext<'_>,
    ) -> Result<AggregateResult, DomainError> {
        match self {
            VotingStrategy::Majority => majority::aggregate(responses),
            VotingStrategy::Weighted => weighted::aggregate(responses, ctx.weights),
            VotingStrategy::Isp => isp::aggregate(responses, ctx.weights),
            VotingStrategy::Topic => topic::aggregate(responses, ctx),
        }
    }
}

impl fmt::Display for VotingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.strategy().as_str())
    }
}

impl FromStr for VotingStrategy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Strategy>()?
            .voting()
            .ok_or_else(|| DomainError::UnknownStrategy(s.to_string()))
    }
}
