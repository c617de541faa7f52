//! Presentation layer for ensemble-quorum
//!
//! This crate contains the orchestrator HTTP surface, CLI definitions,
//! output formatters and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;
pub mod server;

// Re-export commonly used types
pub use cli::commands::{AskArgs, Cli, Command, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
pub use server::{ApiError, AppState, cors_layer, router, serve};
