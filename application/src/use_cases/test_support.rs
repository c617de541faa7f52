//! Scripted gateway shared by the use-case tests

use crate::ports::agent_gateway::{AgentGateway, GatewayError, GenerateRequest, Generation};
use async_trait::async_trait;
use quorum_domain::{AgentDescriptor, AgentId};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
pub(crate) enum Script {
    Answer(&'static str),
    AnswerAfter(&'static str, Duration),
    Fail(GatewayError),
    /// Never answers
    Hang,
}

/// One recorded call
#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub agent: AgentId,
    pub round: u32,
    pub prompt: String,
    pub seed: u64,
}

#[derive(Default)]
pub(crate) struct ScriptedGateway {
    scripts: HashMap<(String, u32), Script>,
    calls: Mutex<Vec<Call>>,
    down: Vec<String>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, agent: &str, round: u32, script: Script) -> Self {
        self.scripts.insert((agent.to_string(), round), script);
        self
    }

    /// Same answer from every listed agent in round 1
    pub fn round1(mut self, answers: &[(&str, &'static str)]) -> Self {
        for (agent, answer) in answers {
            self = self.on(agent, 1, Script::Answer(answer));
        }
        self
    }

    pub fn round2(mut self, answers: &[(&str, &'static str)]) -> Self {
        for (agent, answer) in answers {
            self = self.on(agent, 2, Script::Answer(answer));
        }
        self
    }

    pub fn down(mut self, agent: &str) -> Self {
        self.down.push(agent.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_in_round(&self, round: u32) -> usize {
        self.calls().iter().filter(|c| c.round == round).count()
    }
}

#[async_trait]
impl AgentGateway for ScriptedGateway {
    async fn generate(
        &self,
        agent: &AgentDescriptor,
        request: &GenerateRequest,
    ) -> Result<Generation, GatewayError> {
        self.calls.lock().unwrap().push(Call {
            agent: agent.id.clone(),
            round: request.round,
            prompt: request.prompt.clone(),
            seed: request.seed,
        });
        let script = self
            .scripts
            .get(&(agent.id.to_string(), request.round))
            .cloned()
            .unwrap_or(Script::Fail(GatewayError::Connection(
                "no script".to_string(),
            )));
        match script {
            Script::Answer(text) => Ok(Generation::text(text).with_token_count(1)),
            Script::AnswerAfter(text, delay) => {
                tokio::time::sleep(delay).await;
                Ok(Generation::text(text).with_token_count(1))
            }
            Script::Fail(error) => Err(error),
            Script::Hang => std::future::pending().await,
        }
    }

    async fn probe(&self, agent: &AgentDescriptor) -> Result<(), GatewayError> {
        if self.down.contains(&agent.id.to_string()) {
            Err(GatewayError::Connection("refused".to_string()))
        } else {
            Ok(())
        }
    }
}

pub(crate) fn agents(ids: &[&str]) -> Vec<AgentDescriptor> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| AgentDescriptor::new(*id, "localhost", 9000 + i as u16, "test-model"))
        .collect()
}
