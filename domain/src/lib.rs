//! Domain layer for ensemble-quorum
//!
//! This crate contains the pure core of the fan-out/aggregation engine:
//! agent descriptors, answer normalization, the Weight Store, the five
//! aggregation strategies and the debate state machine.
//! It has no dependencies on network, file system or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Fan-out
//!
//! One query is sent to several independently hosted agents. Each agent
//! answers (or fails) on its own; the collected [`AgentResponse`]s are the
//! only input the strategies see.
//!
//! ## Aggregation
//!
//! - **Majority**: one vote per successful agent
//! - **Weighted**: votes carry the agent's learned weight
//! - **ISP**: rewards answers whose support beats the track-record prior
//! - **Topic**: weighted vote with topic-scoped weights
//! - **Debate**: two rounds, early stop on unanimity

pub mod agent;
pub mod answer;
pub mod core;
pub mod debate;
pub mod prompt;
pub mod query;
pub mod quorum;
pub mod response;
pub mod weights;

// Re-export commonly used types
pub use agent::{
    descriptor::{AgentApi, AgentDescriptor, AgentId},
    registry::AgentRegistry,
    validation::{ConfigIssue, ConfigIssueCode, Severity},
};
pub use answer::{answer_token, extract::extract_answer, normalize::normalize_answer};
pub use core::error::DomainError;
pub use debate::{DebateError, DebateMachine, DebateState, DebateStep, TransitionError};
pub use prompt::{DEFAULT_PREAMBLE, PromptTemplate};
pub use query::{
    params::GenerationParams,
    request::{QueryRequest, ResolvedQuery},
};
pub use quorum::{
    AggregateResult, AggregationContext, Strategy, VotingStrategy,
    topic::{GENERAL_TOPIC, TopicClassifier, TopicRule, TopicTaxonomy},
};
pub use response::{AgentError, AgentResponse};
pub use weights::{WeightLookup, WeightPolicy, WeightSnapshot, WeightStore};
