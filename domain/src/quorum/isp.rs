//! Inverse surprising popularity
//!
//! For every answer `a` over `n` successful responses:
//!
//! ```text
//! s(a)     = votes(a) / n
//! prior_i  = weight_i × consensus_rate_i
//! p(a)     = Σ prior_i (i voted a) / Σ prior_i (all successful i)
//! σ(a)     = s(a) − p(a)
//! ```
//!
//! The winner is the answer with the highest σ: its support is larger than
//! the track records of its voters alone would predict. Ties on σ go to the
//! higher `s`, then to the majority tie-break. With uniform track records σ
//! is zero everywhere and the result matches majority.

use super::result::AggregateResult;
use super::strategy::Strategy;
use super::tally::{Tally, ballots, cmp_with_tolerance};
use crate::core::error::DomainError;
use crate::response::AgentResponse;
use crate::weights::WeightLookup;
use std::collections::BTreeMap;

pub fn aggregate(
    responses: &[AgentResponse],
    weights: &dyn WeightLookup,
) -> Result<AggregateResult, DomainError> {
    let ballots = ballots(responses);
    if ballots.is_empty() {
        return Err(DomainError::NoAgentsResponded {
            queried: responses.len(),
        });
    }

    let counts = Tally::counted(&ballots);
    let priors = Tally::weighted(&ballots, |agent| {
        weights.weight(agent) * weights.consensus_rate(agent)
    });
    let n = ballots.len() as f64;
    let total_prior: f64 = priors.buckets.values().map(|b| b.score).sum();

    let surprise: BTreeMap<&str, f64> = counts
        .buckets
        .iter()
        .map(|(answer, bucket)| {
            let observed = bucket.count as f64 / n;
            let predicted = match priors.buckets.get(answer) {
                Some(prior) if total_prior > 0.0 => prior.score / total_prior,
                // No usable track record: predict the observed share
                _ => observed,
            };
            (*answer, observed - predicted)
        })
        .collect();

    let winner = counts
        .buckets
        .iter()
        .max_by(|(a_answer, a), (b_answer, b)| {
            cmp_with_tolerance(surprise[*a_answer], surprise[*b_answer])
                .then_with(|| a.count.cmp(&b.count))
                .then_with(|| b.first_agent.cmp(a.first_agent))
        })
        .map(|(answer, _)| *answer)
        .ok_or(DomainError::NoAgentsResponded {
            queried: responses.len(),
        })?;

    let mut result = AggregateResult::assemble(
        Strategy::Isp,
        winner,
        counts.counts(),
        &ballots,
        responses,
    );
    result.surprise = Some(
        surprise
            .into_iter()
            .map(|(answer, sigma)| (answer.to_string(), sigma))
            .collect(),
    );
    Ok(result)
}
