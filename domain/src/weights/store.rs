//! Concurrency-safe Weight Store

use super::policy::WeightPolicy;
use super::{DEFAULT_CONSENSUS_RATE, DEFAULT_WEIGHT, WeightLookup};
use crate::agent::descriptor::{AgentDescriptor, AgentId};
use crate::answer::normalize::normalize_answer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Point-in-time copy of every weight; also the persisted form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightSnapshot {
    #[serde(default)]
    pub weights: BTreeMap<AgentId, f64>,
    /// topic → agent → weight
    #[serde(default)]
    pub topic_weights: BTreeMap<String, BTreeMap<AgentId, f64>>,
    #[serde(default)]
    pub consensus_rates: BTreeMap<AgentId, f64>,
}

impl WeightLookup for WeightSnapshot {
    fn weight(&self, agent: &AgentId) -> f64 {
        self.weights.get(agent).copied().unwrap_or(DEFAULT_WEIGHT)
    }

    fn topic_weight(&self, agent: &AgentId, topic: &str) -> f64 {
        self.topic_weights
            .get(topic)
            .and_then(|scoped| scoped.get(agent))
            .copied()
            .unwrap_or_else(|| self.weight(agent))
    }

    fn consensus_rate(&self, agent: &AgentId) -> f64 {
        self.consensus_rates
            .get(agent)
            .copied()
            .unwrap_or(DEFAULT_CONSENSUS_RATE)
    }
}

/// Process-wide adaptive weights
///
/// A single mutex guards the whole store, so a read-modify-write on one
/// agent never interleaves with another update and no update is lost when
/// several queries finish at once.
///
/// # Example
///
/// ```
/// use quorum_domain::{AgentId, WeightLookup, WeightPolicy, WeightStore};
///
/// let store = WeightStore::new(WeightPolicy::default());
/// let agent = AgentId::from("agent-a");
/// assert_eq!(store.get(&agent), 1.0);
///
/// store.update(&agent, false, None);
/// assert!((store.get(&agent) - 0.8).abs() < 1e-12);
/// ```
#[derive(Debug, Default)]
pub struct WeightStore {
    policy: WeightPolicy,
    state: Mutex<WeightSnapshot>,
}

impl WeightStore {
    pub fn new(policy: WeightPolicy) -> Self {
        Self {
            policy,
            state: Mutex::new(WeightSnapshot::default()),
        }
    }

    pub fn policy(&self) -> WeightPolicy {
        self.policy
    }

    fn lock(&self) -> MutexGuard<'_, WeightSnapshot> {
        // Every mutation leaves the maps consistent, so a poisoned lock is still usable
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed agents that have no weight yet with their `base_weight`
    ///
    /// Returns the number of agents seeded.
    pub fn initialize(&self, agents: &[AgentDescriptor]) -> usize {
        let mut state = self.lock();
        let mut seeded = 0;
        for agent in agents {
            if !state.weights.contains_key(&agent.id) {
                state
                    .weights
                    .insert(agent.id.clone(), self.policy.clamp(agent.base_weight));
                seeded += 1;
            }
        }
        seeded
    }

    pub fn get(&self, agent: &AgentId) -> f64 {
        self.lock().weight(agent)
    }

    pub fn get_topic(&self, agent: &AgentId, topic: &str) -> f64 {
        self.lock().topic_weight(agent, topic)
    }

    /// Apply one correctness observation; returns the new global weight.
    ///
    /// With a topic, the topic-scoped weight is updated too, starting from
    /// the global weight when the pair has not been seen.
    pub fn update(&self, agent: &AgentId, correct: bool, topic: Option<&str>) -> f64 {
        let mut state = self.lock();
        if let Some(topic) = topic {
            let current = state.topic_weight(agent, topic);
            let next = self.policy.step(current, correct);
            state
                .topic_weights
                .entry(topic.to_string())
                .or_default()
                .insert(agent.clone(), next);
        }
        let next = self.policy.step(state.weight(agent), correct);
        state.weights.insert(agent.clone(), next);
        next
    }

    /// Score agent answers against a ground truth and update every agent.
    ///
    /// Both sides are normalized before comparison. Returns the new global
    /// weight per agent.
    pub fn apply_ground_truth<'a, I>(
        &self,
        answers: I,
        ground_truth: &str,
        topic: Option<&str>,
    ) -> BTreeMap<AgentId, f64>
    where
        I: IntoIterator<Item = (&'a AgentId, &'a str)>,
    {
        let truth = normalize_answer(ground_truth);
        answers
            .into_iter()
            .map(|(agent, answer)| {
                let correct = !truth.is_empty() && normalize_answer(answer) == truth;
                (agent.clone(), self.update(agent, correct, topic))
            })
            .collect()
    }

    /// Track whether an agent agreed with a query's winning answer
    pub fn record_consensus(&self, agent: &AgentId, agreed: bool) -> f64 {
        let mut state = self.lock();
        let current = state.consensus_rate(agent);
        let next = self.policy.ema(current, agreed).clamp(0.0, 1.0);
        state.consensus_rates.insert(agent.clone(), next);
        next
    }

    pub fn snapshot(&self) -> WeightSnapshot {
        self.lock().clone()
    }

    /// Replace the stored weights, clamping every value to the policy bounds
    pub fn restore(&self, mut snapshot: WeightSnapshot) {
        for weight in snapshot.weights.values_mut() {
            *weight = self.policy.clamp(*weight);
        }
        for scoped in snapshot.topic_weights.values_mut() {
            for weight in scoped.values_mut() {
                *weight = self.policy.clamp(*weight);
            }
        }
        for rate in snapshot.consensus_rates.values_mut() {
            *rate = if rate.is_finite() {
                rate.clamp(0.0, 1.0)
            } else {
                DEFAULT_CONSENSUS_RATE
            };
        }
        *self.lock() = snapshot;
    }
}

impl WeightLookup for WeightStore {
    fn weight(&self, agent: &AgentId) -> f64 {
        self.get(agent)
    }

    fn topic_weight(&self, agent: &AgentId, topic: &str) -> f64 {
        self.get_topic(agent, topic)
    }

    fn consensus_rate(&self, agent: &AgentId) -> f64 {
        self.lock().consensus_rate(agent)
    }
}
