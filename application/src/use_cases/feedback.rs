//! Feedback use case
//!
//! Applies a ground truth learned after the fact to the Weight Store.

use super::persist_weights::WeightPersister;
use crate::registry::RegistryHandle;
use quorum_domain::{
    AgentId, DomainError, GENERAL_TOPIC, TopicTaxonomy, WeightStore, answer_token,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Ground truth for one earlier query
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackInput {
    pub ground_truth: String,
    /// Answer each agent gave, raw or normalized
    pub agent_answers: BTreeMap<AgentId, String>,
    #[serde(default)]
    pub topic: Option<String>,
}

pub struct FeedbackUseCase {
    weights: Arc<WeightStore>,
    registry: Arc<RegistryHandle>,
    taxonomy: TopicTaxonomy,
    persister: Option<WeightPersister>,
}

impl FeedbackUseCase {
    pub fn new(
        weights: Arc<WeightStore>,
        registry: Arc<RegistryHandle>,
        taxonomy: TopicTaxonomy,
    ) -> Self {
        Self {
            weights,
            registry,
            taxonomy,
            persister: None,
        }
    }

    pub fn with_weight_persister(mut self, persister: WeightPersister) -> Self {
        self.persister = Some(persister);
        self
    }

    /// Score every agent answer and return the new global weights.
    ///
    /// Only registered agents and known topics are accepted, so the Weight
    /// Store only ever holds entries the registry and taxonomy can name.
    pub async fn execute(
        &self,
        input: FeedbackInput,
    ) -> Result<BTreeMap<AgentId, f64>, DomainError> {
        if input.ground_truth.trim().is_empty() {
            return Err(DomainError::InvalidRequest(
                "ground_truth cannot be empty".to_string(),
            ));
        }
        if input.agent_answers.is_empty() {
            return Err(DomainError::InvalidRequest(
                "agent_answers cannot be empty".to_string(),
            ));
        }

        let registry = self.registry.snapshot();
        if let Some(unknown) = input
            .agent_answers
            .keys()
            .find(|id| registry.get(id).is_none())
        {
            return Err(DomainError::InvalidRequest(format!(
                "unknown agent id: {}",
                unknown
            )));
        }
        let topic = match input.topic.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(topic) => Some(self.known_topic(topic).ok_or_else(|| {
                DomainError::InvalidRequest(format!("unknown topic: {}", topic))
            })?),
        };

        // Raw replies go through the same extraction as dispatched ones
        let tokens: Vec<(&AgentId, String)> = input
            .agent_answers
            .iter()
            .map(|(agent, answer)| (agent, answer_token(answer)))
            .collect();
        let updated = self.weights.apply_ground_truth(
            tokens.iter().map(|(agent, token)| (*agent, token.as_str())),
            &input.ground_truth,
            topic,
        );
        info!(
            "Feedback applied to {} agents (topic: {})",
            updated.len(),
            topic.unwrap_or("none")
        );

        if let Some(persister) = &self.persister {
            persister.persist().await;
        }
        Ok(updated)
    }

    /// Canonical label for a taxonomy topic or `general`, ignoring case
    fn known_topic(&self, topic: &str) -> Option<&str> {
        self.taxonomy
            .labels()
            .chain(std::iter::once(GENERAL_TOPIC))
            .find(|label| label.eq_ignore_ascii_case(topic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::weight_repository::InMemoryWeights;
    use quorum_domain::{AgentDescriptor, AgentRegistry};

    fn input(truth: &str, answers: &[(&str, &str)], topic: Option<&str>) -> FeedbackInput {
        FeedbackInput {
            ground_truth: truth.to_string(),
            agent_answers: answers
                .iter()
                .map(|(a, s)| (AgentId::from(*a), s.to_string()))
                .collect(),
            topic: topic.map(str::to_string),
        }
    }

    fn use_case(weights: &Arc<WeightStore>) -> FeedbackUseCase {
        let registry = AgentRegistry::new(vec![
            AgentDescriptor::new("a", "h", 1, "m"),
            AgentDescriptor::new("b", "h", 2, "m"),
            AgentDescriptor::new("c", "h", 3, "m").disabled(),
        ])
        .unwrap();
        FeedbackUseCase::new(
            Arc::clone(weights),
            Arc::new(RegistryHandle::new(registry)),
            TopicTaxonomy::default(),
        )
    }

    #[tokio::test]
    async fn test_feedback_rewards_correct_agents() {
        let weights = Arc::new(WeightStore::default());
        let saved = Arc::new(InMemoryWeights::default());
        let use_case = use_case(&weights)
            .with_weight_persister(WeightPersister::new(Arc::clone(&weights), saved.clone()));

        let updated = use_case
            .execute(input("B", &[("a", "Answer: b"), ("b", "C")], Some("Math")))
            .await
            .unwrap();

        let a = AgentId::from("a");
        let b = AgentId::from("b");
        assert!((updated[&a] - 1.0).abs() < 1e-12);
        assert!((updated[&b] - 0.8).abs() < 1e-12);
        assert!((weights.get_topic(&b, "math") - 0.8).abs() < 1e-12);
        assert_eq!(saved.last_saved().unwrap().weights[&b], updated[&b]);
    }

    #[tokio::test]
    async fn test_raw_multiline_reply_is_extracted() {
        let weights = Arc::new(WeightStore::default());
        let updated = use_case(&weights)
            .execute(input(
                "42",
                &[("a", "Let me think.\nFinal answer: 42"), ("b", "Let me think.\n41")],
                None,
            ))
            .await
            .unwrap();
        assert_eq!(updated[&AgentId::from("a")], 1.0);
        assert!((updated[&AgentId::from("b")] - 0.8).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_feedback_rejects_empty_input() {
        let weights = Arc::new(WeightStore::default());
        let use_case = use_case(&weights);
        assert!(matches!(
            use_case.execute(input(" ", &[("a", "x")], None)).await,
            Err(DomainError::InvalidRequest(_))
        ));
        assert!(matches!(
            use_case.execute(input("x", &[], None)).await,
            Err(DomainError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_agents_and_topics_leave_store_untouched() {
        let weights = Arc::new(WeightStore::default());
        let use_case = use_case(&weights);
        for i in 0..20 {
            let ghost = format!("ghost-{}", i);
            assert!(matches!(
                use_case
                    .execute(input("x", &[("a", "x"), (ghost.as_str(), "x")], None))
                    .await,
                Err(DomainError::InvalidRequest(_))
            ));
            let topic = format!("t{}", i);
            assert!(matches!(
                use_case
                    .execute(input("x", &[("a", "x")], Some(topic.as_str())))
                    .await,
                Err(DomainError::InvalidRequest(_))
            ));
        }
        let snapshot = weights.snapshot();
        assert!(snapshot.weights.is_empty());
        assert!(snapshot.topic_weights.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_agents_and_general_topic_are_accepted() {
        let weights = Arc::new(WeightStore::default());
        let updated = use_case(&weights)
            .execute(input("x", &[("c", "x")], Some("general")))
            .await
            .unwrap();
        assert_eq!(updated.len(), 1);
        assert!(weights.snapshot().topic_weights.contains_key("general"));
    }
}
