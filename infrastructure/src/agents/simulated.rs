//! Simulated agents for dry runs and tests
//!
//! Answers are a pure function of (seed, agent, question, round), so the
//! same request always produces the same ensemble behaviour without any
//! model server.
//!
//! | Question contains | Answer |
//! |-------------------|--------|
//! | `2+2` | `4` |
//! | `capital of france` | `paris` |
//! | an `a.`..`d.` option list | one of `a`..`d`, fixed per (seed, agent, question) |
//! | anything else | one of `true`, `false`, `42`, `paris`, `b`, varying by round |

use async_trait::async_trait;
use quorum_application::{AgentGateway, GatewayError, GenerateRequest, Generation};
use quorum_domain::AgentDescriptor;
use std::collections::HashSet;
use std::time::Duration;

const CHOICES: [&str; 4] = ["a", "b", "c", "d"];
const FREE_FORM: [&str; 5] = ["true", "false", "42", "paris", "b"];

/// FNV-1a; stable across runs and platforms
fn stable_hash(parts: &[&str]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for part in parts {
        for byte in part.bytes().chain(std::iter::once(0x1f)) {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
    }
    hash
}

fn pick<'a>(options: &[&'a str], parts: &[&str]) -> &'a str {
    options[(stable_hash(parts) % options.len() as u64) as usize]
}

/// The question inside a round-1 or round-2 prompt
fn question_of(prompt: &str) -> &str {
    let start = ["Original question:\n", "Question:\n"]
        .iter()
        .find_map(|marker| prompt.find(marker).map(|i| i + marker.len()))
        .unwrap_or(0);
    let rest = &prompt[start..];
    rest.split("\n\n").next().unwrap_or(rest).trim()
}

#[derive(Debug, Default)]
pub struct SimulatedAgentGateway {
    /// Sleep for a pseudo-random 60–280 ms per call
    latency: bool,
    /// Agents that refuse every call
    offline: HashSet<String>,
}

impl SimulatedAgentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: bool) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_offline_agent(mut self, id: impl Into<String>) -> Self {
        self.offline.insert(id.into());
        self
    }

    fn answer(agent: &str, request: &GenerateRequest) -> &'static str {
        let question = question_of(&request.prompt);
        let lowered = question.to_lowercase();
        let seed = request.seed.to_string();
        let round = request.round.to_string();

        if lowered.contains("2+2") || lowered.contains("2 + 2") {
            "4"
        } else if lowered.contains("capital of france") {
            "paris"
        } else if ["a.", "b.", "c.", "d."].iter().any(|k| lowered.contains(k)) {
            pick(&CHOICES, &[seed.as_str(), agent, question])
        } else {
            pick(&FREE_FORM, &[seed.as_str(), agent, question, round.as_str()])
        }
    }
}

#[async_trait]
impl AgentGateway for SimulatedAgentGateway {
    async fn generate(
        &self,
        agent: &AgentDescriptor,
        request: &GenerateRequest,
    ) -> Result<Generation, GatewayError> {
        if self.offline.contains(agent.id.as_str()) {
            return Err(GatewayError::Connection(format!(
                "simulated agent {} is offline",
                agent.id
            )));
        }
        if self.latency {
            let jitter = stable_hash(&[agent.id.as_str(), request.prompt.as_str()]) % 220;
            tokio::time::sleep(Duration::from_millis(60 + jitter)).await;
        }

        let answer = Self::answer(agent.id.as_str(), request);
        let text = serde_json::json!({ "answer": answer }).to_string();
        Ok(Generation {
            text,
            token_count: None,
            model: Some(agent.model_id.clone()),
        })
    }

    async fn probe(&self, agent: &AgentDescriptor) -> Result<(), GatewayError> {
        if self.offline.contains(agent.id.as_str()) {
            Err(GatewayError::Connection("offline".to_string()))
        } else {
            Ok(())
        }
    }
}
