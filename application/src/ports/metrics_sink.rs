//! Port for per-query metrics records.
//!
//! One structured record per successful query, holding the independent
//! variables of the run (strategy, seed, sampling) and the dependent ones
//! (answer, agreement, latencies). The benchmark layer reads these; tracing
//! output is not a substitute.

use chrono::{DateTime, Utc};
use quorum_domain::{AgentId, AgentResponse};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndependentVariables {
    pub strategy: String,
    pub seed: u64,
    pub deterministic: bool,
    pub temperature: f64,
    pub max_agents: Option<usize>,
    pub compare_strategies: bool,
    pub agent_ids: Vec<AgentId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependentVariables {
    pub answer: String,
    pub agreement_rate: f64,
    pub successful_count: usize,
    pub queried_count: usize,
    pub rounds: Option<u32>,
    pub total_latency_ms: f64,
    /// One entry per dispatch round
    pub round_latency_ms: Vec<f64>,
    /// Final-round latency per agent
    pub agent_latency_ms: BTreeMap<AgentId, f64>,
}

/// One line of the metrics log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryMetricsRecord {
    #[serde(rename = "type")]
    pub record_type: &'static str,
    pub timestamp: DateTime<Utc>,
    pub query_id: String,
    pub independent_variables: IndependentVariables,
    pub dependent_variables: DependentVariables,
    pub topic: Option<String>,
    pub ground_truth: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
    pub agent_responses: Vec<AgentResponse>,
}

/// Port for appending metrics records.
///
/// `record` is synchronous and non-fallible: a sink that cannot write logs
/// the problem itself, and the query still succeeds.
pub trait MetricsSink: Send + Sync {
    fn record(&self, record: &QueryMetricsRecord);
}

/// No-op implementation for tests and when metrics are disabled.
pub struct NoMetrics;

impl MetricsSink for NoMetrics {
    fn record(&self, _record: &QueryMetricsRecord) {}
}
