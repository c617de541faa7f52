//! Debate state machine

use super::state::{DebateState, TransitionError};
use crate::agent::descriptor::{AgentDescriptor, AgentId};
use crate::core::error::DomainError;
use crate::prompt::PromptTemplate;
use crate::quorum::{AggregateResult, AggregationContext, Strategy, VotingStrategy, majority};
use crate::response::AgentResponse;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DebateError {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// What the caller has to do after round 1
#[derive(Debug, Clone, PartialEq)]
pub enum DebateStep {
    /// Round 1 was unanimous; this is the final result (`rounds == 1`)
    Finish(AggregateResult),
    /// Run round 2 with one prompt per agent
    Dispatch2 {
        round1: AggregateResult,
        prompts: Vec<(AgentId, String)>,
    },
}

/// Drives one debate from round-1 collection to a final result
///
/// # Example
///
/// ```
/// use quorum_domain::{AgentId, AgentResponse, DebateMachine, DebateState, DebateStep, VotingStrategy};
///
/// let responses = vec![
///     AgentResponse::success(AgentId::from("a"), "m", "4", 1, 10.0),
///     AgentResponse::success(AgentId::from("b"), "m", "4", 1, 12.0),
/// ];
/// let mut machine = DebateMachine::new(VotingStrategy::Majority);
/// match machine.collect_round1("2+2?", &responses, &[]).unwrap() {
///     DebateStep::Finish(result) => assert_eq!(result.rounds, Some(1)),
///     DebateStep::Dispatch2 { .. } => unreachable!(),
/// }
/// assert_eq!(machine.state(), DebateState::EarlyStopped);
/// ```
#[derive(Debug, Clone)]
pub struct DebateMachine {
    state: DebateState,
    visited: Vec<DebateState>,
    final_strategy: VotingStrategy,
}

impl DebateMachine {
    /// A machine whose round 1 has just been dispatched
    pub fn new(final_strategy: VotingStrategy) -> Self {
        Self {
            state: DebateState::Dispatched1,
            visited: vec![DebateState::Dispatched1],
            final_strategy,
        }
    }

    pub fn state(&self) -> DebateState {
        self.state
    }

    /// Every state entered so far, in order
    pub fn visited(&self) -> &[DebateState] {
        &self.visited
    }

    pub fn final_strategy(&self) -> VotingStrategy {
        self.final_strategy
    }

    fn transition(&mut self, to: DebateState) -> Result<(), TransitionError> {
        if !self.state.can_transition_to(to) {
            return Err(TransitionError {
                from: self.state,
                to,
            });
        }
        self.state = to;
        self.visited.push(to);
        Ok(())
    }

    /// Apply majority to round 1 and decide whether round 2 runs.
    ///
    /// Round 2 goes to every agent in `agents`, each shown the other
    /// agents' successful round-1 answers. Fails with
    /// [`DomainError::NoAgentsResponded`] when round 1 had no success.
    pub fn collect_round1(
        &mut self,
        question: &str,
        responses: &[AgentResponse],
        agents: &[AgentDescriptor],
    ) -> Result<DebateStep, DebateError> {
        self.transition(DebateState::Collected1)?;
        let mut round1 = majority::aggregate(responses)?;

        if round1.agreement_rate >= 1.0 {
            self.transition(DebateState::EarlyStopped)?;
            round1.strategy = Strategy::Debate;
            round1.rounds = Some(1);
            return Ok(DebateStep::Finish(round1));
        }

        self.transition(DebateState::Dispatched2)?;
        let mut answers: Vec<(&AgentId, &str)> = responses
            .iter()
            .filter_map(|r| r.answer().map(|a| (&r.agent_id, a)))
            .collect();
        answers.sort();

        let prompts = agents
            .iter()
            .map(|agent| {
                let previous = answers
                    .iter()
                    .find(|(id, _)| **id == agent.id)
                    .map(|(_, answer)| *answer);
                let peers: Vec<(AgentId, String)> = answers
                    .iter()
                    .filter(|(id, _)| **id != agent.id)
                    .map(|(id, answer)| (AgentId::clone(id), answer.to_string()))
                    .collect();
                (
                    agent.id.clone(),
                    PromptTemplate::debate_round(question, previous, &peers),
                )
            })
            .collect();

        Ok(DebateStep::Dispatch2 { round1, prompts })
    }

    /// Aggregate the revised answers with the final strategy
    pub fn collect_round2(
        &mut self,
        responses: &[AgentResponse],
        ctx: &AggregationContext<'_>,
    ) -> Result<AggregateResult, DebateError> {
        self.transition(DebateState::Collected2)?;
        let mut result = self.final_strategy.aggregate(responses, ctx)?;
        self.transition(DebateState::Finalized)?;
        result.strategy = Strategy::Debate;
        result.rounds = Some(2);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quorum::topic::TopicTaxonomy;
    use crate::response::AgentError;
    use crate::weights::WeightSnapshot;

    fn response(agent: &str, raw: &str) -> AgentResponse {
        AgentResponse::success(AgentId::from(agent), "m", raw, 1, 1.0)
    }

    fn agents(ids: &[&str]) -> Vec<AgentDescriptor> {
        ids.iter()
            .map(|id| AgentDescriptor::new(*id, "h", 1, "m"))
            .collect()
    }

    #[test]
    fn test_unanimous_round_one_stops_early() {
        let agents = agents(&["a", "b", "c"]);
        let responses = vec![response("a", "B"), response("b", "b."), response("c", "(b)")];
        let mut machine = DebateMachine::new(VotingStrategy::Majority);

        let step = machine.collect_round1("q", &responses, &agents).unwrap();
        let DebateStep::Finish(result) = step else {
            panic!("expected early stop");
        };
        assert_eq!(result.answer, "B");
        assert_eq!(result.rounds, Some(1));
        assert_eq!(result.strategy, Strategy::Debate);
        assert_eq!(
            machine.visited(),
            &[
                DebateState::Dispatched1,
                DebateState::Collected1,
                DebateState::EarlyStopped
            ]
        );
    }

    #[test]
    fn test_convergence_over_two_rounds() {
        let agents = agents(&["a", "b", "c", "d"]);
        let round1 = vec![
            response("a", "A"),
            response("b", "A"),
            response("c", "B"),
            response("d", "B"),
        ];
        let mut machine = DebateMachine::new(VotingStrategy::Majority);

        let DebateStep::Dispatch2 { round1: first, prompts } =
            machine.collect_round1("Pick A or B", &round1, &agents).unwrap()
        else {
            panic!("expected a second round");
        };
        assert_eq!(first.answer, "A");
        assert_eq!(prompts.len(), 4);

        let (target, prompt_a) = &prompts[0];
        assert_eq!(target.as_str(), "a");
        assert!(prompt_a.contains("Your previous answer: A"));
        assert!(prompt_a.contains("- b: A\n- c: B\n- d: B\n"));
        assert!(!prompt_a.contains("- a:"));

        let round2 = vec![
            response("a", "B"),
            response("b", "B"),
            response("c", "B"),
            response("d", "B"),
        ];
        let weights = WeightSnapshot::default();
        let taxonomy = TopicTaxonomy::default();
        let ctx = AggregationContext::new("Pick A or B", &weights, &taxonomy, &agents);
        let result = machine.collect_round2(&round2, &ctx).unwrap();
        assert_eq!(result.answer, "B");
        assert_eq!(result.rounds, Some(2));
        assert_eq!(result.agreement_rate, 1.0);
        assert_eq!(machine.state(), DebateState::Finalized);
    }

    #[test]
    fn test_failed_agent_still_gets_round_two() {
        let agents = agents(&["a", "b", "c"]);
        let round1 = vec![
            response("a", "1"),
            response("b", "2"),
            AgentResponse::failure(
                AgentId::from("c"),
                "m",
                AgentError::Timeout { after_ms: 10 },
                10.0,
            ),
        ];
        let mut machine = DebateMachine::new(VotingStrategy::Majority);
        let DebateStep::Dispatch2 { prompts, .. } =
            machine.collect_round1("q", &round1, &agents).unwrap()
        else {
            panic!("expected a second round");
        };
        let prompt_c = &prompts[2].1;
        assert!(prompt_c.contains("Your previous answer: (none)"));
        assert!(prompt_c.contains("- a: 1\n- b: 2\n"));
    }

    #[test]
    fn test_round_one_total_failure() {
        let agents = agents(&["a"]);
        let round1 = vec![AgentResponse::failure(
            AgentId::from("a"),
            "m",
            AgentError::unreachable("refused"),
            1.0,
        )];
        let mut machine = DebateMachine::new(VotingStrategy::Majority);
        assert_eq!(
            machine.collect_round1("q", &round1, &agents).unwrap_err(),
            DebateError::Domain(DomainError::NoAgentsResponded { queried: 1 })
        );
    }

    #[test]
    fn test_round_two_requires_round_one() {
        let weights = WeightSnapshot::default();
        let taxonomy = TopicTaxonomy::default();
        let ctx = AggregationContext::new("q", &weights, &taxonomy, &[]);
        let mut machine = DebateMachine::new(VotingStrategy::Majority);
        assert!(matches!(
            machine.collect_round2(&[response("a", "x")], &ctx),
            Err(DebateError::Transition(_))
        ));
    }
}
