//! Vote tallying shared by every strategy
//!
//! Ballots are sorted by agent id before anything is summed, so float sums,
//! winners and tie-breaks do not depend on the order responses arrived in.

use crate::agent::descriptor::AgentId;
use crate::response::AgentResponse;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// One successful agent's normalized answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Ballot<'a> {
    pub agent: &'a AgentId,
    pub answer: &'a str,
}

/// Ballots of the successful responses, ordered by agent id
pub(crate) fn ballots(responses: &[AgentResponse]) -> Vec<Ballot<'_>> {
    let mut ballots: Vec<Ballot<'_>> = responses
        .iter()
        .filter_map(|r| {
            r.answer().map(|answer| Ballot {
                agent: &r.agent_id,
                answer,
            })
        })
        .collect();
    ballots.sort();
    ballots
}

/// Per-answer bucket
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Bucket<'a> {
    pub score: f64,
    pub count: usize,
    /// Lowest agent id that produced this answer
    pub first_agent: &'a AgentId,
}

/// Scores per answer
#[derive(Debug, Clone, Default)]
pub(crate) struct Tally<'a> {
    pub buckets: BTreeMap<&'a str, Bucket<'a>>,
}

impl<'a> Tally<'a> {
    /// Sum `weight(agent)` per answer over ballots already in agent order
    pub fn weighted<F>(ballots: &[Ballot<'a>], mut weight: F) -> Self
    where
        F: FnMut(&AgentId) -> f64,
    {
        let mut buckets: BTreeMap<&'a str, Bucket<'a>> = BTreeMap::new();
        for ballot in ballots {
            let w = weight(ballot.agent);
            buckets
                .entry(ballot.answer)
                .and_modify(|b| {
                    b.score += w;
                    b.count += 1;
                })
                .or_insert(Bucket {
                    score: w,
                    count: 1,
                    first_agent: ballot.agent,
                });
        }
        Self { buckets }
    }

    pub fn counted(ballots: &[Ballot<'a>]) -> Self {
        Self::weighted(ballots, |_| 1.0)
    }

    /// Highest score; ties (up to summation noise) go to the answer whose
    /// lowest producing agent id is smallest
    pub fn winner(&self) -> Option<&'a str> {
        let best = self
            .buckets
            .values()
            .map(|b| b.score)
            .max_by(f64::total_cmp)?;
        self.buckets
            .iter()
            .filter(|(_, b)| cmp_with_tolerance(b.score, best) == Ordering::Equal)
            .min_by_key(|(_, b)| b.first_agent)
            .map(|(answer, _)| *answer)
    }

    pub fn scores(&self) -> BTreeMap<String, f64> {
        self.buckets
            .iter()
            .map(|(answer, bucket)| (answer.to_string(), bucket.score))
            .collect()
    }

    pub fn counts(&self) -> BTreeMap<String, f64> {
        self.buckets
            .iter()
            .map(|(answer, bucket)| (answer.to_string(), bucket.count as f64))
            .collect()
    }
}

/// Compare floats that are equal up to summation noise as equal
pub(crate) fn cmp_with_tolerance(a: f64, b: f64) -> Ordering {
    const EPSILON: f64 = 1e-9;
    if (a - b).abs() <= EPSILON {
        Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(agent: &str, raw: &str) -> AgentResponse {
        AgentResponse::success(AgentId::from(agent), "m", raw, 1, 1.0)
    }

    #[test]
    fn test_ballots_skip_failures_and_sort() {
        let responses = vec![
            response("c", "4"),
            AgentResponse::failure(
                AgentId::from("b"),
                "m",
                crate::response::AgentError::Timeout { after_ms: 1 },
                1.0,
            ),
            response("a", "5"),
        ];
        let ballots = ballots(&responses);
        let agents: Vec<_> = ballots.iter().map(|b| b.agent.as_str()).collect();
        assert_eq!(agents, vec!["a", "c"]);
    }

    #[test]
    fn test_tie_goes_to_lowest_agent() {
        let responses = vec![response("b", "X"), response("a", "Y")];
        let ballots = ballots(&responses);
        let tally = Tally::counted(&ballots);
        // Y was produced by "a"
        assert_eq!(tally.winner(), Some("y"));
    }

    #[test]
    fn test_noisy_weight_sums_tie_to_lowest_agent() {
        let responses = vec![response("a", "Y"), response("b", "X"), response("c", "X")];
        let ballots = ballots(&responses);
        let tally = Tally::weighted(&ballots, |agent| match agent.as_str() {
            "a" => 0.3,
            "b" => 0.1,
            _ => 0.2,
        });
        // 0.1 + 0.2 sums just above 0.3
        assert!(tally.buckets["x"].score > tally.buckets["y"].score);
        assert_eq!(tally.winner(), Some("y"));
    }

    #[test]
    fn test_clear_margin_beats_lower_agent() {
        let responses = vec![response("a", "Y"), response("b", "X"), response("c", "X")];
        let ballots = ballots(&responses);
        let tally = Tally::counted(&ballots);
        assert_eq!(tally.winner(), Some("x"));
    }

    #[test]
    fn test_tolerance() {
        assert_eq!(cmp_with_tolerance(0.1 + 0.2, 0.3), Ordering::Equal);
        assert_eq!(cmp_with_tolerance(0.5, 0.3), Ordering::Greater);
    }
}
