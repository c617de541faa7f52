//! Agent adapters
//!
//! - [`HttpAgentGateway`]: real agents over HTTP (generic or Ollama wire format)
//! - [`SimulatedAgentGateway`]: deterministic in-process agents
//! - [`FileAgentSource`]: agent list from the configuration files

mod file_source;
mod http_gateway;
mod simulated;
mod wire;

pub use file_source::FileAgentSource;
pub use http_gateway::{DEFAULT_CONNECT_TIMEOUT, HttpAgentGateway};
pub use simulated::SimulatedAgentGateway;
