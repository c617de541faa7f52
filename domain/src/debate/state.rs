//! Debate states and transitions

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// State of one debate run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebateState {
    /// Round 1 sent to every selected agent
    Dispatched1,
    /// Round 1 responses in hand
    Collected1,
    /// Round 1 was unanimous; no second round
    EarlyStopped,
    /// Round 2 sent with peer answers
    Dispatched2,
    Collected2,
    Finalized,
}

impl DebateState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::EarlyStopped | Self::Finalized)
    }

    pub fn valid_transitions(self) -> &'static [DebateState] {
        match self {
            Self::Dispatched1 => &[Self::Collected1],
            Self::Collected1 => &[Self::EarlyStopped, Self::Dispatched2],
            Self::Dispatched2 => &[Self::Collected2],
            Self::Collected2 => &[Self::Finalized],
            Self::EarlyStopped | Self::Finalized => &[],
        }
    }

    pub fn can_transition_to(self, to: DebateState) -> bool {
        self.valid_transitions().contains(&to)
    }
}

impl std::fmt::Display for DebateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dispatched1 => write!(f, "dispatched1"),
            Self::Collected1 => write!(f, "collected1"),
            Self::EarlyStopped => write!(f, "early_stopped"),
            Self::Dispatched2 => write!(f, "dispatched2"),
            Self::Collected2 => write!(f, "collected2"),
            Self::Finalized => write!(f, "finalized"),
        }
    }
}

/// Attempted a transition the protocol does not allow
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid debate transition {from} → {to}")]
pub struct TransitionError {
    pub from: DebateState,
    pub to: DebateState,
}
