//! Topic routing
//!
//! The prompt is classified into a coarse topic by keyword hits. The vote
//! then uses topic-scoped weights and only the agents tagged for that topic
//! (or `general`).

use super::AggregationContext;
use super::result::AggregateResult;
use super::strategy::Strategy;
use super::tally::{Tally, ballots};
use crate::agent::descriptor::{AgentDescriptor, AgentId};
use crate::core::error::DomainError;
use crate::response::AgentResponse;
use serde::{Deserialize, Serialize};

/// Label used when no topic keyword matches
pub const GENERAL_TOPIC: &str = "general";

/// One topic and the keywords that indicate it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRule {
    pub label: String,
    pub keywords: Vec<String>,
}

impl TopicRule {
    pub fn new<I, S>(label: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.into(),
            keywords: keywords
                .into_iter()
                .map(|k| k.into().to_lowercase())
                .collect(),
        }
    }
}

/// Ordered list of topics; earlier topics win ties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicTaxonomy {
    pub topics: Vec<TopicRule>,
}

impl Default for TopicTaxonomy {
    fn default() -> Self {
        Self {
            topics: vec![
                TopicRule::new(
                    "math",
                    ["math", "algebra", "equation", "calculate", "number", "proof", "gsm8k"],
                ),
                TopicRule::new(
                    "factual",
                    ["who", "when", "where", "capital", "history", "fact", "truthful", "truthfulqa"],
                ),
                TopicRule::new(
                    "science",
                    ["biology", "chemistry", "physics", "scientific", "experiment", "mmlu"],
                ),
                TopicRule::new(
                    "coding",
                    ["python", "code", "algorithm", "function", "debug", "program"],
                ),
                TopicRule::new(
                    "reasoning",
                    ["why", "reason", "logic", "infer", "deduce", "explain"],
                ),
            ],
        }
    }
}

impl TopicTaxonomy {
    pub fn new(topics: Vec<TopicRule>) -> Self {
        Self { topics }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().map(|t| t.label.as_str())
    }
}

/// Keyword classifier over a [`TopicTaxonomy`]
///
/// # Example
///
/// ```
/// use quorum_domain::{TopicClassifier, TopicTaxonomy};
///
/// let taxonomy = TopicTaxonomy::default();
/// let classifier = TopicClassifier::new(&taxonomy);
/// assert_eq!(classifier.classify("Solve the equation x + 2 = 5"), "math");
/// assert_eq!(classifier.classify("Write a Python function"), "coding");
/// assert_eq!(classifier.classify("Hello there"), "general");
/// ```
pub struct TopicClassifier<'a> {
    taxonomy: &'a TopicTaxonomy,
}

impl<'a> TopicClassifier<'a> {
    pub fn new(taxonomy: &'a TopicTaxonomy) -> Self {
        Self { taxonomy }
    }

    /// Topic with the most keyword hits (substring match, case-insensitive)
    pub fn classify(&self, prompt: &str) -> &'a str {
        let text = prompt.to_lowercase();
        let mut best = (GENERAL_TOPIC, 0usize);
        for topic in &self.taxonomy.topics {
            let hits = topic
                .keywords
                .iter()
                .filter(|k| !k.is_empty() && text.contains(k.as_str()))
                .count();
            if hits > best.1 {
                best = (topic.label.as_str(), hits);
            }
        }
        best.0
    }
}

/// Whether an agent is tagged for `topic`
fn serves(agent: &AgentId, topic: &str, agents: &[AgentDescriptor]) -> bool {
    agents
        .iter()
        .find(|a| &a.id == agent)
        .is_some_and(|a| a.serves_topic(topic))
}

/// Weighted vote over topic-scoped weights.
///
/// Only responses from agents tagged for the detected topic (or `general`)
/// vote; when none of them succeeded, every successful response votes.
pub fn aggregate(
    responses: &[AgentResponse],
    ctx: &AggregationContext<'_>,
) -> Result<AggregateResult, DomainError> {
    let topic = TopicClassifier::new(ctx.taxonomy).classify(ctx.prompt);
    let all = ballots(responses);

    let tagged: Vec<_> = all
        .iter()
        .filter(|b| serves(b.agent, topic, ctx.agents))
        .copied()
        .collect();
    let scoped = if topic == GENERAL_TOPIC || tagged.is_empty() {
        all.clone()
    } else {
        tagged
    };

    let tally = Tally::weighted(&scoped, |agent| ctx.weights.topic_weight(agent, topic));
    let winner = tally.winner().ok_or(DomainError::NoAgentsResponded {
        queried: responses.len(),
    })?;

    let mut result =
        AggregateResult::assemble(Strategy::Topic, winner, tally.scores(), &all, responses);
    result.topic = Some(topic.to_string());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::WeightSnapshot;

    fn response(agent: &str, raw: &str) -> AgentResponse {
        AgentResponse::success(AgentId::from(agent), "m", raw, 1, 1.0)
    }

    fn agents() -> Vec<AgentDescriptor> {
        vec![
            AgentDescriptor::new("a", "h", 1, "m").with_topic_tags(["math"]),
            AgentDescriptor::new("b", "h", 1, "m").with_topic_tags(["coding"]),
            AgentDescriptor::new("c", "h", 1, "m").with_topic_tags(["coding"]),
            AgentDescriptor::new("d", "h", 1, "m").with_topic_tags(["general"]),
        ]
    }

    #[test]
    fn test_classify_picks_most_hits() {
        let taxonomy = TopicTaxonomy::default();
        let classifier = TopicClassifier::new(&taxonomy);
        // "why" (reasoning) vs "calculate" + "number" (math)
        assert_eq!(classifier.classify("Why calculate this number?"), "math");
        assert_eq!(classifier.classify("Who wrote history?"), "factual");
        assert_eq!(classifier.classify(""), "general");
    }

    #[test]
    fn test_classify_ties_use_taxonomy_order() {
        let taxonomy = TopicTaxonomy::default();
        let classifier = TopicClassifier::new(&taxonomy);
        // one math hit ("proof") and one coding hit ("debug")
        assert_eq!(classifier.classify("debug the proof"), "math");
    }

    #[test]
    fn test_only_tagged_agents_vote() {
        let agents = agents();
        let taxonomy = TopicTaxonomy::default();
        let weights = WeightSnapshot::default();
        let ctx = AggregationContext::new("Solve this equation", &weights, &taxonomy, &agents);

        let responses = vec![
            response("a", "7"),
            response("b", "9"),
            response("c", "9"),
            response("d", "7"),
        ];
        let result = aggregate(&responses, &ctx).unwrap();
        assert_eq!(result.topic.as_deref(), Some("math"));
        assert_eq!(result.answer, "7");
        assert_eq!(result.votes.len(), 1);
        assert_eq!(result.agreement_rate, 0.5);
        assert_eq!(result.successful_count, 4);
    }

    #[test]
    fn test_topic_weights_are_used() {
        let agents = agents();
        let taxonomy = TopicTaxonomy::default();
        let mut weights = WeightSnapshot::default();
        weights
            .topic_weights
            .entry("coding".to_string())
            .or_default()
            .insert(AgentId::from("d"), 3.0);
        let ctx = AggregationContext::new("debug my python code", &weights, &taxonomy, &agents);

        let responses = vec![
            response("b", "x"),
            response("c", "x"),
            response("d", "y"),
        ];
        let result = aggregate(&responses, &ctx).unwrap();
        assert_eq!(result.topic.as_deref(), Some("coding"));
        assert_eq!(result.answer, "y");
        assert_eq!(result.votes["y"], 3.0);
    }

    #[test]
    fn test_falls_back_to_everyone_without_tagged_answers() {
        let agents = agents();
        let taxonomy = TopicTaxonomy::default();
        let weights = WeightSnapshot::default();
        let ctx = AggregationContext::new("the capital of France", &weights, &taxonomy, &agents);

        // Topic is "factual"; only "d" (general) is eligible, but it failed
        let responses = vec![
            response("a", "paris"),
            response("b", "paris"),
            AgentResponse::failure(
                AgentId::from("d"),
                "m",
                crate::response::AgentError::unreachable("refused"),
                1.0,
            ),
        ];
        let result = aggregate(&responses, &ctx).unwrap();
        assert_eq!(result.answer, "paris");
        assert_eq!(result.votes["paris"], 2.0);
    }

    #[test]
    fn test_order_independence() {
        let agents = agents();
        let taxonomy = TopicTaxonomy::default();
        let mut weights = WeightSnapshot::default();
        let coding = weights.topic_weights.entry("coding".to_string()).or_default();
        coding.insert(AgentId::from("b"), 0.1);
        coding.insert(AgentId::from("c"), 0.2);
        coding.insert(AgentId::from("d"), 0.3);
        let ctx = AggregationContext::new("fix this python code", &weights, &taxonomy, &agents);

        // "a" is not tagged for coding; b + c tie with d up to float noise
        let mut responses = vec![
            response("a", "z"),
            response("b", "x"),
            response("c", "x"),
            response("d", "y"),
        ];
        let expected = aggregate(&responses, &ctx).unwrap();
        assert_eq!(expected.answer, "x");
        for _ in 0..responses.len() {
            responses.rotate_left(1);
            assert_eq!(aggregate(&responses, &ctx).unwrap(), expected);
            responses.reverse();
            assert_eq!(aggregate(&responses, &ctx).unwrap(), expected);
        }
    }
}
