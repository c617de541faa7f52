//! Agent subdomain: who can be asked.
//!
//! - [`descriptor::AgentDescriptor`]: one independently hosted inference service
//! - [`registry::AgentRegistry`]: immutable snapshot of known agents
//! - [`validation`]: configuration issues detected while building the registry

pub mod descriptor;
pub mod registry;
pub mod validation;
