//! Fan-out dispatch
//!
//! Sends one generate call per agent concurrently. Every call is bounded by
//! a per-call timeout and the whole round by a deadline; when the deadline
//! passes, outstanding calls are aborted and recorded as timeouts. Agent
//! failures are captured as inline [`AgentError`]s and never abort the
//! round. There are no retries.

use crate::ports::agent_gateway::{AgentGateway, GenerateRequest};
use crate::ports::progress::DispatchProgress;
use quorum_domain::{AgentDescriptor, AgentError, AgentResponse, GenerationParams};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// One agent and the prompt it receives
#[derive(Debug, Clone)]
pub struct RoundJob {
    pub agent: AgentDescriptor,
    pub prompt: String,
}

/// Time bounds of one round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundBounds {
    pub per_call: Duration,
    pub deadline: Duration,
}

/// Collected responses of one round, in job order
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    pub round: u32,
    pub responses: Vec<AgentResponse>,
    /// Wall time from first send to last response or deadline
    pub latency_ms: f64,
}

impl RoundOutcome {
    pub fn successful_count(&self) -> usize {
        self.responses.iter().filter(|r| r.is_success()).count()
    }

    pub fn timed_out_count(&self) -> usize {
        self.responses
            .iter()
            .filter(|r| r.error.as_ref().is_some_and(AgentError::is_timeout))
            .count()
    }
}

pub(crate) fn elapsed_ms(started: Instant) -> f64 {
    let ms = started.elapsed().as_secs_f64() * 1000.0;
    (ms * 1000.0).round() / 1000.0
}

/// Concurrent dispatcher over an [`AgentGateway`]
pub struct FanOutDispatcher<G: AgentGateway + 'static> {
    gateway: Arc<G>,
    stop: Vec<String>,
}

impl<G: AgentGateway + 'static> Clone for FanOutDispatcher<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            stop: self.stop.clone(),
        }
    }
}

impl<G: AgentGateway + 'static> FanOutDispatcher<G> {
    pub fn new(gateway: Arc<G>, stop: Vec<String>) -> Self {
        Self { gateway, stop }
    }

    /// Send the same prompt to every agent
    pub async fn broadcast(
        &self,
        round: u32,
        agents: &[AgentDescriptor],
        prompt: &str,
        params: &GenerationParams,
        bounds: RoundBounds,
        progress: &dyn DispatchProgress,
    ) -> RoundOutcome {
        let jobs = agents
            .iter()
            .map(|agent| RoundJob {
                agent: agent.clone(),
                prompt: prompt.to_string(),
            })
            .collect();
        self.dispatch(round, jobs, params, bounds, progress).await
    }

    /// Run one round: exactly one call per job, one response per job
    pub async fn dispatch(
        &self,
        round: u32,
        jobs: Vec<RoundJob>,
        params: &GenerationParams,
        bounds: RoundBounds,
        progress: &dyn DispatchProgress,
    ) -> RoundOutcome {
        info!(
            "Round {}: dispatching to {} agents (per-call {:?}, deadline {:?})",
            round,
            jobs.len(),
            bounds.per_call,
            bounds.deadline
        );
        progress.on_round_start(round, jobs.len());

        let started = Instant::now();
        let deadline = started + bounds.deadline;
        let order: Vec<AgentDescriptor> = jobs.iter().map(|j| j.agent.clone()).collect();

        let mut join_set = JoinSet::new();
        let mut pending = HashMap::new();

        for job in jobs {
            let gateway = Arc::clone(&self.gateway);
            let request = GenerateRequest::new(&job.agent, job.prompt, params, &self.stop, round);
            let agent = job.agent.clone();
            let per_call = bounds.per_call;

            let handle = join_set.spawn(async move {
                let call_started = Instant::now();
                let result = tokio::time::timeout(per_call, gateway.generate(&agent, &request)).await;
                let latency_ms = elapsed_ms(call_started);
                match result {
                    Ok(Ok(generation)) => AgentResponse::success(
                        agent.id.clone(),
                        generation.model.clone().unwrap_or(agent.model_id.clone()),
                        generation.text.clone(),
                        generation.tokens(),
                        latency_ms,
                    ),
                    Ok(Err(error)) => AgentResponse::failure(
                        agent.id.clone(),
                        agent.model_id.clone(),
                        error.into_agent_error(latency_ms as u64),
                        latency_ms,
                    ),
                    Err(_) => AgentResponse::failure(
                        agent.id.clone(),
                        agent.model_id.clone(),
                        AgentError::Timeout {
                            after_ms: per_call.as_millis() as u64,
                        },
                        latency_ms,
                    ),
                }
            });
            pending.insert(handle.id(), job.agent);
        }

        let mut responses = Vec::with_capacity(order.len());

        loop {
            match tokio::time::timeout_at(deadline, join_set.join_next_with_id()).await {
                Ok(Some(Ok((id, response)))) => {
                    pending.remove(&id);
                    match &response.error {
                        None => debug!(
                            "Agent {} answered in {:.1}ms",
                            response.agent_id, response.latency_ms
                        ),
                        Some(error) => warn!("Agent {} failed: {}", response.agent_id, error),
                    }
                    progress.on_agent_complete(round, &response.agent_id, response.is_success());
                    responses.push(response);
                }
                Ok(Some(Err(join_error))) => {
                    if let Some(agent) = pending.remove(&join_error.id()) {
                        warn!("Agent {} task failed: {}", agent.id, join_error);
                        progress.on_agent_complete(round, &agent.id, false);
                        responses.push(AgentResponse::failure(
                            agent.id.clone(),
                            agent.model_id.clone(),
                            AgentError::unreachable(format!("dispatch task failed: {}", join_error)),
                            elapsed_ms(started),
                        ));
                    }
                }
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        "Round {}: deadline of {:?} reached with {} agents outstanding",
                        round,
                        bounds.deadline,
                        pending.len()
                    );
                    join_set.abort_all();
                    break;
                }
            }
        }

        let deadline_ms = bounds.deadline.as_millis() as u64;
        for agent in pending.into_values() {
            progress.on_agent_complete(round, &agent.id, false);
            responses.push(AgentResponse::failure(
                agent.id.clone(),
                agent.model_id.clone(),
                AgentError::Timeout {
                    after_ms: deadline_ms,
                },
                elapsed_ms(started),
            ));
        }

        // Report in dispatch order, not arrival order
        let position: HashMap<_, _> = order
            .iter()
            .enumerate()
            .map(|(i, agent)| (agent.id.clone(), i))
            .collect();
        responses.sort_by_key(|r| position.get(&r.agent_id).copied().unwrap_or(usize::MAX));

        let outcome = RoundOutcome {
            round,
            responses,
            latency_ms: elapsed_ms(started),
        };
        info!(
            "Round {}: {}/{} agents succeeded in {:.1}ms",
            round,
            outcome.successful_count(),
            outcome.responses.len(),
            outcome.latency_ms
        );
        progress.on_round_complete(round);
        outcome
    }
}
