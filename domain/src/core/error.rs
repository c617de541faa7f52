//! Domain error types

use thiserror::Error;

/// Query-level errors
///
/// Per-agent failures are not represented here: they travel inline in
/// [`AgentResponse`](crate::AgentResponse) as an [`AgentError`](crate::AgentError)
/// and never abort a query on their own.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("No enabled agents available for this request")]
    NoAgentsAvailable,

    #[error("None of the {queried} dispatched agents responded")]
    NoAgentsResponded { queried: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DomainError {
    /// Stable taxonomy name used in API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::InvalidRequest(_) => "InvalidRequest",
            DomainError::UnknownStrategy(_) => "UnknownStrategy",
            DomainError::NoAgentsAvailable => "NoAgentsAvailable",
            DomainError::NoAgentsResponded { .. } => "NoAgentsResponded",
            DomainError::InvalidConfig(_) => "InvalidConfig",
        }
    }

    /// Whether the request was rejected before any agent was contacted
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidRequest(_)
                | DomainError::UnknownStrategy(_)
                | DomainError::NoAgentsAvailable
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DomainError::NoAgentsResponded { queried: 4 };
        assert_eq!(error.to_string(), "None of the 4 dispatched agents responded");
        assert_eq!(
            DomainError::UnknownStrategy("borda".to_string()).to_string(),
            "Unknown strategy: borda"
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(DomainError::NoAgentsAvailable.code(), "NoAgentsAvailable");
        assert_eq!(
            DomainError::NoAgentsResponded { queried: 1 }.code(),
            "NoAgentsResponded"
        );
        assert_eq!(
            DomainError::InvalidRequest("x".to_string()).code(),
            "InvalidRequest"
        );
    }

    #[test]
    fn test_is_rejection() {
        assert!(DomainError::NoAgentsAvailable.is_rejection());
        assert!(DomainError::UnknownStrategy("x".to_string()).is_rejection());
        assert!(!DomainError::NoAgentsResponded { queried: 3 }.is_rejection());
    }
}
