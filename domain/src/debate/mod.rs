//! Debate protocol
//!
//! Two rounds of generation with an early stop:
//!
//! ```text
//! Dispatched1 ─▶ Collected1 ─┬─▶ EarlyStopped            (round 1 unanimous)
//!                            └─▶ Dispatched2 ─▶ Collected2 ─▶ Finalized
//! ```
//!
//! [`DebateMachine`] owns the states and the decisions taken at each one; it
//! never performs I/O. The application layer runs the dispatches it asks for.

pub mod machine;
pub mod state;

pub use machine::{DebateError, DebateMachine, DebateStep};
pub use state::{DebateState, TransitionError};
