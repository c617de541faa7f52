//! Application-level configuration.
//!
//! - [`DispatchParams`]: timeouts, preamble and stop sequences per round
//! - [`OrchestratorConfig`]: dispatch params plus debate and weight options

pub mod dispatch_params;
pub mod orchestrator_config;

pub use dispatch_params::DispatchParams;
pub use orchestrator_config::OrchestratorConfig;
