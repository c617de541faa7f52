//! Debate controller
//!
//! Drives the [`DebateMachine`] over real dispatch rounds: round 1 is the
//! shared dispatch the orchestrator already ran, round 2 (when round 1 was
//! not unanimous) re-asks every round-1 agent with its peers' answers under
//! the stricter debate bound.

use super::dispatch::{FanOutDispatcher, RoundBounds, RoundJob, RoundOutcome};
use crate::config::DispatchParams;
use crate::ports::agent_gateway::AgentGateway;
use crate::ports::progress::DispatchProgress;
use quorum_domain::{
    AgentResponse, AggregateResult, AggregationContext, DebateError, DebateMachine, DebateState,
    DebateStep, GenerationParams, VotingStrategy,
};
use serde::Serialize;
use tracing::info;

/// Everything that happened in one debate
#[derive(Debug, Clone, Serialize)]
pub struct DebateTrace {
    pub round1: Vec<AgentResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round2: Option<Vec<AgentResponse>>,
    pub round1_aggregate: AggregateResult,
    /// States entered, in order
    pub states: Vec<DebateState>,
    /// One entry per round that ran
    pub round_latency_ms: Vec<f64>,
}

impl DebateTrace {
    pub fn early_stopped(&self) -> bool {
        self.round2.is_none()
    }

    /// Responses the final answer was computed from
    pub fn final_responses(&self) -> &[AgentResponse] {
        self.round2.as_deref().unwrap_or(&self.round1)
    }
}

/// Final result plus the trace that produced it
#[derive(Debug, Clone)]
pub struct DebateOutcome {
    pub result: AggregateResult,
    pub trace: DebateTrace,
}

pub struct DebateController<G: AgentGateway + 'static> {
    dispatcher: FanOutDispatcher<G>,
    dispatch: DispatchParams,
    final_strategy: VotingStrategy,
    round2_seed_offset: u64,
}

impl<G: AgentGateway + 'static> DebateController<G> {
    pub fn new(
        dispatcher: FanOutDispatcher<G>,
        dispatch: DispatchParams,
        final_strategy: VotingStrategy,
        round2_seed_offset: u64,
    ) -> Self {
        Self {
            dispatcher,
            dispatch,
            final_strategy,
            round2_seed_offset,
        }
    }

    /// Continue a debate whose round 1 has been collected.
    ///
    /// `ctx.agents` are the round-1 agents; each of them gets a round-2
    /// prompt, including agents that failed round 1.
    pub async fn run(
        &self,
        question: &str,
        params: &GenerationParams,
        round1: RoundOutcome,
        ctx: &AggregationContext<'_>,
        progress: &dyn DispatchProgress,
    ) -> Result<DebateOutcome, DebateError> {
        let mut machine = DebateMachine::new(self.final_strategy);

        let (round1_aggregate, prompts) =
            match machine.collect_round1(question, &round1.responses, ctx.agents)? {
                DebateStep::Finish(result) => {
                    info!(
                        "Debate: round 1 unanimous on '{}', stopping early",
                        result.answer
                    );
                    return Ok(DebateOutcome {
                        trace: DebateTrace {
                            round1: round1.responses,
                            round2: None,
                            round1_aggregate: result.clone(),
                            states: machine.visited().to_vec(),
                            round_latency_ms: vec![round1.latency_ms],
                        },
                        result,
                    });
                }
                DebateStep::Dispatch2 { round1, prompts } => (round1, prompts),
            };

        info!(
            "Debate: round 1 agreement {:.2} on '{}', starting round 2",
            round1_aggregate.agreement_rate, round1_aggregate.answer
        );

        let jobs = prompts
            .into_iter()
            .filter_map(|(id, prompt)| {
                ctx.agents
                    .iter()
                    .find(|agent| agent.id == id)
                    .map(|agent| RoundJob {
                        agent: agent.clone(),
                        prompt,
                    })
            })
            .collect();
        let bound = self.dispatch.round2_timeout();
        let round2 = self
            .dispatcher
            .dispatch(
                2,
                jobs,
                &params.for_round(self.round2_seed_offset),
                RoundBounds {
                    per_call: bound,
                    deadline: bound,
                },
                progress,
            )
            .await;

        let result = machine.collect_round2(&round2.responses, ctx)?;
        info!(
            "Debate: final answer '{}' after 2 rounds ({} strategy)",
            result.answer, self.final_strategy
        );

        Ok(DebateOutcome {
            result,
            trace: DebateTrace {
                round1: round1.responses,
                round2: Some(round2.responses),
                round1_aggregate,
                states: machine.visited().to_vec(),
                round_latency_ms: vec![round1.latency_ms, round2.latency_ms],
            },
        })
    }
}
