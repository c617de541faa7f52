//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod agent_gateway;
pub mod agent_source;
pub mod metrics_sink;
pub mod progress;
pub mod weight_repository;
