//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod debate;
pub mod dispatch;
pub mod feedback;
pub mod health;
pub mod persist_weights;
pub mod reload_agents;
pub mod run_query;

#[cfg(test)]
pub(crate) mod test_support;
