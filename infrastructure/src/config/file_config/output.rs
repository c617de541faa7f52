//! `ask` output settings from TOML (`[output]` section)

use quorum_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Formats the CLI knows how to print
const OUTPUT_FORMATS: [&str; 3] = ["answer", "full", "json"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Default `ask` output when `--output` is absent
    pub format: Option<String>,
    /// `false` strips ANSI colors from console output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

impl FileOutputConfig {
    /// An unknown format falls back to `answer`, so it only warns
    pub fn validate(&self) -> Vec<ConfigIssue> {
        match &self.format {
            Some(format) if !OUTPUT_FORMATS.contains(&format.to_ascii_lowercase().as_str()) => {
                vec![ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "output.format".to_string(),
                        value: format.clone(),
                        valid_values: OUTPUT_FORMATS.iter().map(|f| f.to_string()).collect(),
                    },
                    format!(
                        "output.format: unknown value '{}', using 'answer' (valid: {})",
                        format,
                        OUTPUT_FORMATS.join(", ")
                    ),
                )]
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_formats_pass() {
        for format in ["answer", "FULL", "json"] {
            let config = FileOutputConfig {
                format: Some(format.to_string()),
                color: false,
            };
            assert!(config.validate().is_empty(), "{} should be accepted", format);
        }
        assert!(FileOutputConfig::default().validate().is_empty());
    }

    #[test]
    fn test_unknown_format_warns() {
        let config = FileOutputConfig {
            format: Some("markdown".to_string()),
            color: true,
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
        assert!(issues[0].message.contains("markdown"));
    }
}
