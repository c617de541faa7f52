//! Majority vote

use super::result::AggregateResult;
use super::strategy::Strategy;
use super::tally::{Tally, ballots};
use crate::core::error::DomainError;
use crate::response::AgentResponse;

/// One vote per successful response; ties go to the lowest agent id
pub fn aggregate(responses: &[AgentResponse]) -> Result<AggregateResult, DomainError> {
    let ballots = ballots(responses);
    let tally = Tally::counted(&ballots);
    let winner = tally.winner().ok_or(DomainError::NoAgentsResponded {
        queried: responses.len(),
    })?;
    Ok(AggregateResult::assemble(
        Strategy::Majority,
        winner,
        tally.counts(),
        &ballots,
        responses,
    ))
}
