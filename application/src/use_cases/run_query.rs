//! Run Query use case
//!
//! The orchestrator entry point: validate a request against a registry
//! snapshot, dispatch once, aggregate, then feed the Weight Store and the
//! metrics sink.
//!
//! ```text
//! QueryRequest ─ resolve ─▶ round 1 ─┬─ majority/weighted/isp/topic ─┐
//!                                    └─ debate ─▶ (round 2) ─────────┴─▶ QueryOutcome
//! ```

use super::debate::{DebateController, DebateTrace};
use super::dispatch::{FanOutDispatcher, RoundBounds, elapsed_ms};
use crate::config::OrchestratorConfig;
use crate::ports::agent_gateway::AgentGateway;
use crate::ports::metrics_sink::{
    DependentVariables, IndependentVariables, MetricsSink, NoMetrics, QueryMetricsRecord,
};
use crate::ports::progress::{DispatchProgress, NoProgress};
use super::persist_weights::WeightPersister;
use crate::registry::RegistryHandle;
use chrono::Utc;
use quorum_domain::{
    AgentId, AgentResponse, AggregateResult, AggregationContext, DebateError, DomainError,
    PromptTemplate, QueryRequest, ResolvedQuery, Strategy, TopicClassifier, TransitionError,
    VotingStrategy, WeightStore,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Query-level failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunQueryError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Debate protocol error: {0}")]
    Protocol(#[from] TransitionError),
}

impl From<DebateError> for RunQueryError {
    fn from(error: DebateError) -> Self {
        match error {
            DebateError::Domain(e) => RunQueryError::Domain(e),
            DebateError::Transition(e) => RunQueryError::Protocol(e),
        }
    }
}

impl RunQueryError {
    pub fn code(&self) -> &'static str {
        match self {
            RunQueryError::Domain(e) => e.code(),
            RunQueryError::Protocol(_) => "Internal",
        }
    }

    /// Rejected before any agent was contacted
    pub fn is_rejection(&self) -> bool {
        matches!(self, RunQueryError::Domain(e) if e.is_rejection())
    }
}

/// Result of one query
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome {
    pub query_id: String,
    pub strategy: Strategy,
    pub aggregate: AggregateResult,
    /// Every voting strategy over the shared dispatch (`compare_strategies`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregates: Option<BTreeMap<VotingStrategy, AggregateResult>>,
    /// Responses of the final round
    pub agent_responses: Vec<AgentResponse>,
    pub total_latency_ms: f64,
    pub selected_agent_ids: Vec<AgentId>,
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debate: Option<DebateTrace>,
    /// New global weights when a ground truth was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_weights: Option<BTreeMap<AgentId, f64>>,
}

/// Use case for answering one query with the agent ensemble
pub struct RunQueryUseCase<G: AgentGateway + 'static> {
    dispatcher: FanOutDispatcher<G>,
    registry: Arc<RegistryHandle>,
    weights: Arc<WeightStore>,
    metrics: Arc<dyn MetricsSink>,
    persister: Option<WeightPersister>,
    config: OrchestratorConfig,
}

impl<G: AgentGateway + 'static> RunQueryUseCase<G> {
    pub fn new(
        gateway: Arc<G>,
        registry: Arc<RegistryHandle>,
        weights: Arc<WeightStore>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            dispatcher: FanOutDispatcher::new(gateway, config.dispatch.stop.clone()),
            registry,
            weights,
            metrics: Arc::new(NoMetrics),
            persister: None,
            config,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_weight_persister(mut self, persister: WeightPersister) -> Self {
        self.persister = Some(persister);
        self
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, request: QueryRequest) -> Result<QueryOutcome, RunQueryError> {
        self.execute_with_progress(request, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        request: QueryRequest,
        progress: &dyn DispatchProgress,
    ) -> Result<QueryOutcome, RunQueryError> {
        // In-flight queries keep this snapshot even if agents are reloaded
        let registry = self.registry.snapshot();
        let query = request.resolve(&registry)?;
        let query_id = Uuid::new_v4().to_string();
        info!(
            "Query {}: strategy {} over {} agents",
            query_id,
            query.strategy,
            query.agents.len()
        );

        let started = Instant::now();
        let dispatch = &self.config.dispatch;
        let prompt = PromptTemplate::initial_query(&query.prompt, &dispatch.preamble);
        let round1 = self
            .dispatcher
            .broadcast(
                1,
                &query.agents,
                &prompt,
                &query.params,
                RoundBounds {
                    per_call: dispatch.request_timeout,
                    deadline: dispatch.query_deadline,
                },
                progress,
            )
            .await;

        let topic = TopicClassifier::new(&self.config.taxonomy)
            .classify(&query.prompt)
            .to_string();
        debug!("Query {}: topic '{}'", query_id, topic);

        // Aggregate against a frozen view so concurrent feedback cannot skew one query
        let weights = self.weights.snapshot();
        let ctx = AggregationContext::new(
            &query.prompt,
            &weights,
            &self.config.taxonomy,
            &query.agents,
        );

        let (aggregate, aggregates, debate, agent_responses, round_latency_ms) = match query.strategy.voting() {
            Some(voting) => {
                let aggregate = voting.aggregate(&round1.responses, &ctx)?;
                let aggregates = if query.compare_strategies {
                    let mut all = BTreeMap::new();
                    for strategy in VotingStrategy::ALL {
                        all.insert(strategy, strategy.aggregate(&round1.responses, &ctx)?);
                    }
                    Some(all)
                } else {
                    None
                };
                let latency = vec![round1.latency_ms];
                (aggregate, aggregates, None, round1.responses, latency)
            }
            None => {
                let controller = DebateController::new(
                    self.dispatcher.clone(),
                    dispatch.clone(),
                    self.config.debate_final,
                    self.config.round2_seed_offset,
                );
                let outcome = controller
                    .run(&query.prompt, &query.params, round1, &ctx, progress)
                    .await?;
                let responses = outcome.trace.final_responses().to_vec();
                let latency = outcome.trace.round_latency_ms.clone();
                (outcome.result, None, Some(outcome.trace), responses, latency)
            }
        };

        if aggregate.is_degraded() {
            warn!(
                "Query {}: degraded answer from {}/{} agents",
                query_id, aggregate.successful_count, aggregate.queried_count
            );
        }

        let updated_weights = self
            .learn(&query, &aggregate, &agent_responses, &topic)
            .await;
        let total_latency_ms = elapsed_ms(started);

        self.metrics.record(&metrics_record(
            &query_id,
            &query,
            &aggregate,
            &agent_responses,
            &topic,
            total_latency_ms,
            round_latency_ms,
        ));

        info!(
            "Query {}: answer '{}' (agreement {:.2}) in {:.1}ms",
            query_id, aggregate.answer, aggregate.agreement_rate, total_latency_ms
        );

        Ok(QueryOutcome {
            query_id,
            strategy: query.strategy,
            selected_agent_ids: query.agent_ids(),
            aggregate,
            aggregates,
            agent_responses,
            total_latency_ms,
            topic,
            debate,
            updated_weights,
        })
    }

    /// Update consensus rates and, with a ground truth, accuracy weights.
    /// Returns the new global weights when a ground truth was applied.
    async fn learn(
        &self,
        query: &ResolvedQuery,
        aggregate: &AggregateResult,
        responses: &[AgentResponse],
        topic: &str,
    ) -> Option<BTreeMap<AgentId, f64>> {
        let answers: Vec<(&AgentId, &str)> = responses
            .iter()
            .filter_map(|r| r.answer().map(|a| (&r.agent_id, a)))
            .collect();

        if self.config.track_consensus {
            for (agent, answer) in &answers {
                self.weights
                    .record_consensus(agent, *answer == aggregate.answer);
            }
        }

        let updated = query.ground_truth.as_deref().map(|truth| {
            self.weights
                .apply_ground_truth(answers.iter().copied(), truth, Some(topic))
        });

        if (updated.is_some() || self.config.track_consensus)
            && let Some(persister) = &self.persister
        {
            persister.persist().await;
        }

        updated
    }
}

fn metrics_record(
    query_id: &str,
    query: &ResolvedQuery,
    aggregate: &AggregateResult,
    responses: &[AgentResponse],
    topic: &str,
    total_latency_ms: f64,
    round_latency_ms: Vec<f64>,
) -> QueryMetricsRecord {
    QueryMetricsRecord {
        record_type: "query",
        timestamp: Utc::now(),
        query_id: query_id.to_string(),
        independent_variables: IndependentVariables {
            strategy: query.strategy.to_string(),
            seed: query.params.seed,
            deterministic: query.params.deterministic,
            temperature: query.params.effective_temperature(),
            max_agents: query.max_agents,
            compare_strategies: query.compare_strategies,
            agent_ids: query.agent_ids(),
        },
        dependent_variables: DependentVariables {
            answer: aggregate.answer.clone(),
            agreement_rate: aggregate.agreement_rate,
            successful_count: aggregate.successful_count,
            queried_count: aggregate.queried_count,
            rounds: aggregate.rounds,
            total_latency_ms,
            round_latency_ms,
            agent_latency_ms: responses
                .iter()
                .map(|r| (r.agent_id.clone(), r.latency_ms))
                .collect(),
        },
        topic: Some(topic.to_string()),
        ground_truth: query.ground_truth.clone(),
        metadata: query.metadata.clone(),
        agent_responses: responses.to_vec(),
    }
}
