//! Configuration issues.
//!
//! The configuration loader does not fail on the first problem it sees; it
//! collects every issue with a severity so the operator gets one complete
//! report. Only [`Severity::Error`] issues abort startup.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// Two agents share an id.
    DuplicateAgentId { id: String },
    /// An agent field that must be set is empty or zero.
    MissingAgentField { id: String, field: &'static str },
    /// A numeric setting is outside its valid range.
    OutOfRange { field: String },
    /// A string setting does not parse into its enum.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// No agent is enabled, so every query will be rejected.
    NoEnabledAgents,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_display() {
        let issue = ConfigIssue::error(
            ConfigIssueCode::DuplicateAgentId {
                id: "a".to_string(),
            },
            "duplicate agent id 'a'",
        );
        assert!(issue.is_error());
        assert_eq!(issue.to_string(), "error: duplicate agent id 'a'");

        let warning = ConfigIssue::warning(ConfigIssueCode::NoEnabledAgents, "no agents");
        assert!(!warning.is_error());
        assert_eq!(warning.to_string(), "warning: no agents");
    }
}
