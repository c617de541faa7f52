//! HTTP agent gateway
//!
//! Calls each agent's generate endpoint over plain HTTP with `reqwest`.
//! One pooled client serves every agent. Per-call timeouts are enforced by
//! the dispatcher; the client only bounds connection setup.

use super::wire::{
    GenericRequest, GenericResponse, OllamaRequest, OllamaResponse, generate_path, probe_path,
};
use async_trait::async_trait;
use quorum_application::{AgentGateway, GatewayError, GenerateRequest, Generation};
use quorum_domain::{AgentApi, AgentDescriptor};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct HttpAgentGateway {
    client: Client,
}

impl HttpAgentGateway {
    pub fn new() -> Result<Self, GatewayError> {
        Self::with_connect_timeout(DEFAULT_CONNECT_TIMEOUT)
    }

    pub fn with_connect_timeout(timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Connection(e.to_string()))?;
        Ok(Self { client })
    }

    fn url(agent: &AgentDescriptor, path: &str) -> String {
        format!("{}{}", agent.base_url(), path)
    }

    fn check_status(response: Response) -> Result<Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(GatewayError::HttpStatus(status.as_u16()))
        }
    }
}

fn map_send_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Connection(error.to_string())
    }
}

fn map_body_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Malformed(error.to_string())
    }
}

#[async_trait]
impl AgentGateway for HttpAgentGateway {
    async fn generate(
        &self,
        agent: &AgentDescriptor,
        request: &GenerateRequest,
    ) -> Result<Generation, GatewayError> {
        let url = Self::url(agent, generate_path(agent.api));
        debug!("POST {} (round {}, seed {})", url, request.round, request.seed);

        let builder = self.client.post(&url);
        let builder = match agent.api {
            AgentApi::Generic => builder.json(&GenericRequest::from(request)),
            AgentApi::Ollama => builder.json(&OllamaRequest::from(request)),
        };
        let response = Self::check_status(builder.send().await.map_err(map_send_error)?)?;

        let generation = match agent.api {
            AgentApi::Generic => response
                .json::<GenericResponse>()
                .await
                .map_err(map_body_error)?
                .into(),
            AgentApi::Ollama => response
                .json::<OllamaResponse>()
                .await
                .map_err(map_body_error)?
                .into(),
        };
        Ok(generation)
    }

    async fn probe(&self, agent: &AgentDescriptor) -> Result<(), GatewayError> {
        let url = Self::url(agent, probe_path(agent.api));
        let response = self.client.get(&url).send().await.map_err(map_send_error)?;
        Self::check_status(response).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::get, routing::post};
    use quorum_domain::GenerationParams;
    use serde_json::{Value, json};

    /// Serve `router` on an ephemeral port and return an agent pointing at it
    async fn spawn_agent(router: Router, api: AgentApi) -> AgentDescriptor {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        AgentDescriptor::new("a", "127.0.0.1", port, "test-model").with_api(api)
    }

    fn request(agent: &AgentDescriptor) -> GenerateRequest {
        GenerateRequest::new(agent, "What is 2+2?", &GenerationParams::default(), &[], 1)
    }

    #[tokio::test]
    async fn test_generic_agent() {
        let router = Router::new()
            .route(
                "/generate",
                post(|Json(body): Json<Value>| async move {
                    assert_eq!(body["model"], "test-model");
                    Json(json!({"text": "4", "token_count": 1}))
                }),
            )
            .route("/health", get(|| async { "ok" }));
        let agent = spawn_agent(router, AgentApi::Generic).await;
        let gateway = HttpAgentGateway::new().unwrap();

        let generation = gateway.generate(&agent, &request(&agent)).await.unwrap();
        assert_eq!(generation.text, "4");
        assert_eq!(generation.token_count, Some(1));
        assert!(gateway.probe(&agent).await.is_ok());
    }

    #[tokio::test]
    async fn test_ollama_agent() {
        let router = Router::new().route(
            "/api/generate",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["stream"], false);
                Json(json!({"response": "Paris", "eval_count": 2, "model": "llama3:8b"}))
            }),
        );
        let agent = spawn_agent(router, AgentApi::Ollama).await;
        let gateway = HttpAgentGateway::new().unwrap();

        let generation = gateway.generate(&agent, &request(&agent)).await.unwrap();
        assert_eq!(generation.text, "Paris");
        assert_eq!(generation.model.as_deref(), Some("llama3:8b"));
        // No /api/tags route
        assert_eq!(
            gateway.probe(&agent).await,
            Err(GatewayError::HttpStatus(404))
        );
    }

    #[tokio::test]
    async fn test_error_statuses_and_bodies() {
        let router = Router::new().route(
            "/generate",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let agent = spawn_agent(router, AgentApi::Generic).await;
        let gateway = HttpAgentGateway::new().unwrap();
        assert_eq!(
            gateway.generate(&agent, &request(&agent)).await,
            Err(GatewayError::HttpStatus(500))
        );

        let router = Router::new().route("/generate", post(|| async { "not json" }));
        let agent = spawn_agent(router, AgentApi::Generic).await;
        assert!(matches!(
            gateway.generate(&agent, &request(&agent)).await,
            Err(GatewayError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_agent() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let agent = AgentDescriptor::new("a", "127.0.0.1", port, "m");
        let gateway = HttpAgentGateway::new().unwrap();
        assert!(matches!(
            gateway.generate(&agent, &request(&agent)).await,
            Err(GatewayError::Connection(_))
        ));
    }
}
