//! Accuracy-weighted vote

use super::result::AggregateResult;
use super::strategy::Strategy;
use super::tally::{Tally, ballots};
use crate::core::error::DomainError;
use crate::response::AgentResponse;
use crate::weights::WeightLookup;

/// Each successful response adds its agent's current weight to its answer.
///
/// With equal weights this picks the same answer as majority.
pub fn aggregate(
    responses: &[AgentResponse],
    weights: &dyn WeightLookup,
) -> Result<AggregateResult, DomainError> {
    let ballots = ballots(responses);
    let tally = Tally::weighted(&ballots, |agent| weights.weight(agent));
    let winner = tally.winner().ok_or(DomainError::NoAgentsResponded {
        queried: responses.len(),
    })?;
    Ok(AggregateResult::assemble(
        Strategy::Weighted,
        winner,
        tally.scores(),
        &ballots,
        responses,
    ))
}
