//! Infrastructure layer for ensemble-quorum
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod agents;
pub mod config;
pub mod metrics;
pub mod persistence;

// Re-export commonly used types
pub use agents::{FileAgentSource, HttpAgentGateway, SimulatedAgentGateway};
pub use config::{ConfigLoader, FileConfig};
pub use metrics::JsonlMetricsSink;
pub use persistence::JsonWeightFile;
