//! Prompt domain
//!
//! Templates for the round-1 question and the round-2 debate prompt.

mod template;

pub use template::{DEFAULT_PREAMBLE, PromptTemplate};
