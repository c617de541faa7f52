//! Wire formats of the agent generate endpoints
//!
//! | API | Path | Request | Response |
//! |-----|------|---------|----------|
//! | generic | `POST /generate` | `{prompt, model, temperature, max_tokens, seed, deterministic, stop}` | `{text, token_count}` |
//! | ollama | `POST /api/generate` | `{model, prompt, stream: false, options: {...}}` | `{response, eval_count, model}` |

use quorum_application::{GenerateRequest, Generation};
use quorum_domain::AgentApi;
use serde::{Deserialize, Serialize};

pub fn generate_path(api: AgentApi) -> &'static str {
    match api {
        AgentApi::Generic => "/generate",
        AgentApi::Ollama => "/api/generate",
    }
}

pub fn probe_path(api: AgentApi) -> &'static str {
    match api {
        AgentApi::Generic => "/health",
        AgentApi::Ollama => "/api/tags",
    }
}

fn no_stop(stop: &&[String]) -> bool {
    stop.is_empty()
}

#[derive(Debug, Serialize)]
pub struct GenericRequest<'a> {
    pub prompt: &'a str,
    pub model: &'a str,
    pub temperature: f64,
    pub max_tokens: u32,
    pub seed: u64,
    pub deterministic: bool,
    #[serde(skip_serializing_if = "no_stop")]
    pub stop: &'a [String],
}

impl<'a> From<&'a GenerateRequest> for GenericRequest<'a> {
    fn from(request: &'a GenerateRequest) -> Self {
        Self {
            prompt: &request.prompt,
            model: &request.model,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            seed: request.seed,
            deterministic: request.deterministic,
            stop: &request.stop,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenericResponse {
    pub text: String,
    #[serde(default)]
    pub token_count: Option<u32>,
    #[serde(default)]
    pub model: Option<String>,
}

impl From<GenericResponse> for Generation {
    fn from(response: GenericResponse) -> Self {
        Generation {
            text: response.text,
            token_count: response.token_count,
            model: response.model,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OllamaRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
    pub options: OllamaOptions<'a>,
}

#[derive(Debug, Serialize)]
pub struct OllamaOptions<'a> {
    pub temperature: f64,
    pub seed: u64,
    pub num_predict: u32,
    #[serde(skip_serializing_if = "no_stop")]
    pub stop: &'a [String],
}

impl<'a> From<&'a GenerateRequest> for OllamaRequest<'a> {
    fn from(request: &'a GenerateRequest) -> Self {
        Self {
            model: &request.model,
            prompt: &request.prompt,
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature,
                seed: request.seed,
                num_predict: request.max_tokens,
                stop: &request.stop,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OllamaResponse {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub eval_count: Option<u32>,
    #[serde(default)]
    pub model: Option<String>,
}

impl From<OllamaResponse> for Generation {
    fn from(response: OllamaResponse) -> Self {
        Generation {
            text: response.response,
            // Ollama reports 0 for cached prompts; fall back to the estimate
            token_count: response.eval_count.filter(|n| *n > 0),
            model: response.model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_domain::{AgentDescriptor, GenerationParams};
    use serde_json::json;

    fn request() -> GenerateRequest {
        let agent = AgentDescriptor::new("a", "h", 1, "llama3");
        GenerateRequest::new(
            &agent,
            "What is 2+2?",
            &GenerationParams::default().with_seed(5),
            &["\n\n".to_string()],
            1,
        )
    }

    #[test]
    fn test_generic_request_shape() {
        let request = request();
        let body = serde_json::to_value(GenericRequest::from(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "prompt": "What is 2+2?",
                "model": "llama3",
                "temperature": 0.0,
                "max_tokens": 64,
                "seed": 5,
                "deterministic": true,
                "stop": ["\n\n"],
            })
        );
    }

    #[test]
    fn test_ollama_request_shape() {
        let request = request();
        let body = serde_json::to_value(OllamaRequest::from(&request)).unwrap();
        assert_eq!(body["stream"], json!(false));
        assert_eq!(body["options"]["num_predict"], json!(64));
        assert_eq!(body["options"]["seed"], json!(5));
    }

    #[test]
    fn test_ollama_response_zero_eval_count_is_estimated() {
        let response: OllamaResponse =
            serde_json::from_value(json!({"response": "four apples", "eval_count": 0})).unwrap();
        let generation = Generation::from(response);
        assert_eq!(generation.tokens(), 2);
    }

    #[test]
    fn test_generic_response_requires_text() {
        assert!(serde_json::from_value::<GenericResponse>(json!({"token_count": 3})).is_err());
    }
}
