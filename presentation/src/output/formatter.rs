//! Output formatter trait

use quorum_application::QueryOutcome;

/// Trait for formatting query outcomes
pub trait OutputFormatter {
    /// Format the complete outcome
    fn format(&self, outcome: &QueryOutcome) -> String;

    /// Format as JSON
    fn format_json(&self, outcome: &QueryOutcome) -> String;

    /// Format the consensus answer only (concise output)
    fn format_answer_only(&self, outcome: &QueryOutcome) -> String;
}
