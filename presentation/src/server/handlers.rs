//! Route handlers

use super::error::{ApiError, ApiResult};
use super::state::AppState;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use quorum_application::{AgentGateway, FeedbackInput, HealthReport, QueryOutcome};
use quorum_domain::{AgentDescriptor, AgentId, QueryRequest, WeightSnapshot};
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// One entry of `GET /agents`
#[derive(Debug, Serialize)]
pub struct AgentView {
    pub id: AgentId,
    pub model: String,
    pub host: String,
    pub port: u16,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub topic_tags: Vec<String>,
}

impl From<&AgentDescriptor> for AgentView {
    fn from(agent: &AgentDescriptor) -> Self {
        Self {
            id: agent.id.clone(),
            model: agent.model_id.clone(),
            host: agent.host.clone(),
            port: agent.port,
            enabled: agent.enabled,
            topic_tags: agent.topic_tags.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AgentsResponse {
    pub agents: Vec<AgentView>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub status: &'static str,
    pub updated_weights: BTreeMap<AgentId, f64>,
}

pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "ensemble-quorum",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn health<G: AgentGateway + 'static>(
    State(state): State<AppState<G>>,
) -> Json<HealthReport> {
    Json(state.health.execute().await)
}

pub async fn agents<G: AgentGateway + 'static>(
    State(state): State<AppState<G>>,
) -> Json<AgentsResponse> {
    let registry = state.registry.snapshot();
    Json(AgentsResponse {
        agents: registry.all().iter().map(AgentView::from).collect(),
    })
}

pub async fn query<G: AgentGateway + 'static>(
    State(state): State<AppState<G>>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> ApiResult<Json<QueryOutcome>> {
    let Json(request) = payload?;
    match state.run_query.execute(request).await {
        Ok(outcome) => Ok(Json(outcome)),
        Err(e) => {
            if e.is_rejection() {
                info!("Query rejected: {}", e);
            } else {
                warn!("Query failed: {}", e);
            }
            Err(e.into())
        }
    }
}

pub async fn weights<G: AgentGateway + 'static>(
    State(state): State<AppState<G>>,
) -> Json<WeightSnapshot> {
    Json(state.weights.snapshot())
}

pub async fn reload_agents<G: AgentGateway + 'static>(
    State(state): State<AppState<G>>,
) -> ApiResult<Json<Value>> {
    let agent_count = state.reload.execute().await.map_err(|e| {
        warn!("Agent reload failed: {}", e);
        ApiError::from(e)
    })?;
    Ok(Json(json!({
        "status": "reloaded",
        "agent_count": agent_count,
    })))
}

pub async fn feedback<G: AgentGateway + 'static>(
    State(state): State<AppState<G>>,
    payload: Result<Json<FeedbackInput>, JsonRejection>,
) -> ApiResult<Json<FeedbackResponse>> {
    let Json(input) = payload?;
    let updated_weights = state.feedback.execute(input).await.inspect_err(|e| {
        info!("Feedback rejected: {}", e);
    })?;
    Ok(Json(FeedbackResponse {
        status: "ok",
        updated_weights,
    }))
}
