//! Console output formatter for query outcomes

use crate::cli::commands::OutputFormat;
use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use quorum_application::QueryOutcome;
use quorum_domain::core::string::truncate;
use quorum_domain::{AgentDescriptor, AgentResponse, AggregateResult, ConfigIssue, Severity};

/// Widest answer shown per agent line
const ANSWER_COLUMN: usize = 40;

/// Formats query outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format `outcome` the way `format` asks for
    pub fn render(outcome: &QueryOutcome, format: OutputFormat) -> String {
        match format {
            OutputFormat::Answer => Self::format_answer_only(outcome),
            OutputFormat::Full => Self::format(outcome),
            OutputFormat::Json => Self::format_json(outcome),
        }
    }

    /// Format the complete outcome
    pub fn format(outcome: &QueryOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Ensemble Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}   {} {}   {} {}\n",
            "Strategy:".cyan().bold(),
            outcome.strategy,
            "Topic:".cyan().bold(),
            outcome.topic,
            "Query:".cyan().bold(),
            outcome.query_id.dimmed()
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Agents:".cyan().bold(),
            outcome
                .selected_agent_ids
                .iter()
                .map(|id| id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));

        if let Some(trace) = &outcome.debate {
            output.push_str(&Self::section_header("Round 1"));
            output.push_str(&Self::responses(&trace.round1));
            output.push_str(&Self::aggregate(&trace.round1_aggregate));
            if let Some(round2) = &trace.round2 {
                output.push_str(&Self::section_header("Round 2"));
                output.push_str(&Self::responses(round2));
            } else {
                output.push_str(&format!("\n{}\n", "Unanimous after round 1; no debate needed".green()));
            }
        } else {
            output.push_str(&Self::section_header("Agent Responses"));
            output.push_str(&Self::responses(&outcome.agent_responses));
        }

        output.push_str(&Self::section_header("Consensus"));
        output.push_str(&Self::aggregate(&outcome.aggregate));

        if let Some(aggregates) = &outcome.aggregates {
            output.push_str(&Self::section_header("Strategy Comparison"));
            for (strategy, result) in aggregates {
                output.push_str(&format!(
                    "  {:<10} {:<16} {:>5.1}%\n",
                    strategy.to_string().bold(),
                    result.answer,
                    result.agreement_rate * 100.0
                ));
            }
        }

        if let Some(weights) = &outcome.updated_weights {
            output.push_str(&Self::section_header("Updated Weights"));
            for (agent, weight) in weights {
                output.push_str(&format!("  {:<16} {:.3}\n", agent.as_str(), weight));
            }
        }

        output.push_str(&format!(
            "\n{} {:.0} ms\n",
            "Total latency:".dimmed(),
            outcome.total_latency_ms
        ));
        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(outcome: &QueryOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the consensus answer only (concise output)
    pub fn format_answer_only(outcome: &QueryOutcome) -> String {
        let aggregate = &outcome.aggregate;
        let mut output = format!("{}\n", aggregate.answer.bold());
        let agreement = format!(
            "{}/{} agents agree ({})",
            aggregate.winning_agents.len(),
            aggregate.successful_count,
            outcome.strategy
        );
        output.push_str(&format!("{}\n", agreement.dimmed()));
        if aggregate.is_degraded() {
            output.push_str(&format!(
                "{}\n",
                format!(
                    "{} of {} agents failed",
                    aggregate.queried_count - aggregate.successful_count,
                    aggregate.queried_count
                )
                .yellow()
            ));
        }
        output
    }

    /// Table of registered agents for the `agents` subcommand
    pub fn format_agents(agents: &[AgentDescriptor]) -> String {
        if agents.is_empty() {
            return format!("{}\n", "No agents configured".yellow());
        }

        let mut output = format!(
            "{}\n",
            format!(
                "{:<16} {:<24} {:<24} {:<8} {}",
                "ID", "MODEL", "ADDRESS", "API", "TOPICS"
            )
            .bold()
        );
        for agent in agents {
            let address = format!("{}:{}", agent.host, agent.port);
            let line = format!(
                "{:<16} {:<24} {:<24} {:<8} {}",
                agent.id.as_str(),
                agent.model_id,
                address,
                agent.api,
                agent.topic_tags.join(",")
            );
            if agent.enabled {
                output.push_str(&line);
            } else {
                output.push_str(&format!("{} {}", line.dimmed(), "(disabled)".dimmed()));
            }
            output.push('\n');
        }
        output
    }

    /// One line per configuration issue
    pub fn format_issues(issues: &[ConfigIssue]) -> String {
        issues
            .iter()
            .map(|issue| match issue.severity {
                Severity::Error => format!("{} {}\n", "error:".red().bold(), issue.message),
                Severity::Warning => format!("{} {}\n", "warning:".yellow().bold(), issue.message),
            })
            .collect()
    }

    fn responses(responses: &[AgentResponse]) -> String {
        let mut output = String::new();
        for response in responses {
            match (&response.normalized_answer, &response.error) {
                (Some(answer), None) => output.push_str(&format!(
                    "  {} {:<16} {:<16} {}\n",
                    "v".green(),
                    response.agent_id.as_str(),
                    truncate(answer, ANSWER_COLUMN),
                    format!("{:.0} ms", response.latency_ms).dimmed()
                )),
                (_, Some(error)) => output.push_str(&format!(
                    "  {} {:<16} {}\n",
                    "x".red(),
                    response.agent_id.as_str(),
                    error.to_string().red()
                )),
                (None, None) => {}
            }
        }
        output
    }

    fn aggregate(result: &AggregateResult) -> String {
        let mut output = format!(
            "\n  {} {}  ({:.1}% agreement, {}/{} responded)\n",
            "Answer:".green().bold(),
            result.answer.bold(),
            result.agreement_rate * 100.0,
            result.successful_count,
            result.queried_count
        );
        let votes = result
            .votes
            .iter()
            .map(|(answer, score)| format!("{}={}", answer, Self::score(*score)))
            .collect::<Vec<_>>()
            .join("  ");
        output.push_str(&format!("  {} {}\n", "Votes:".dimmed(), votes));
        if let Some(surprise) = &result.surprise {
            let scores = surprise
                .iter()
                .map(|(answer, sigma)| format!("{}={:+.3}", answer, sigma))
                .collect::<Vec<_>>()
                .join("  ");
            output.push_str(&format!("  {} {}\n", "Surprise:".dimmed(), scores));
        }
        output
    }

    /// Whole counts print without decimals
    fn score(value: f64) -> String {
        if value.fract() == 0.0 {
            format!("{:.0}", value)
        } else {
            format!("{:.3}", value)
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, outcome: &QueryOutcome) -> String {
        Self::format(outcome)
    }

    fn format_json(&self, outcome: &QueryOutcome) -> String {
        Self::format_json(outcome)
    }

    fn format_answer_only(&self, outcome: &QueryOutcome) -> String {
        Self::format_answer_only(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_application::{OrchestratorConfig, RegistryHandle, RunQueryUseCase};
    use quorum_domain::{AgentRegistry, ConfigIssueCode, QueryRequest, WeightStore};
    use quorum_infrastructure::SimulatedAgentGateway;
    use std::sync::Arc;

    async fn outcome(request: QueryRequest) -> QueryOutcome {
        let agents = vec![
            AgentDescriptor::new("a", "h", 1, "m"),
            AgentDescriptor::new("b", "h", 2, "m"),
            AgentDescriptor::new("c", "h", 3, "m"),
        ];
        let use_case = RunQueryUseCase::new(
            Arc::new(SimulatedAgentGateway::new().with_offline_agent("c")),
            Arc::new(RegistryHandle::new(AgentRegistry::new(agents).unwrap())),
            Arc::new(WeightStore::default()),
            OrchestratorConfig::default(),
        );
        use_case.execute(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_answer_only() {
        colored::control::set_override(false);
        let outcome = outcome(QueryRequest::new("What is 2+2?")).await;
        let text = ConsoleFormatter::render(&outcome, OutputFormat::Answer);
        assert!(text.starts_with("4\n"));
        assert!(text.contains("2/2 agents agree (majority)"));
        assert!(text.contains("1 of 3 agents failed"));
    }

    #[tokio::test]
    async fn test_full_with_comparison() {
        colored::control::set_override(false);
        let request = QueryRequest::new("What is 2+2?").with_compare_strategies(true);
        let text = ConsoleFormatter::render(&outcome(request).await, OutputFormat::Full);
        assert!(text.contains("Strategy Comparison"));
        assert!(text.contains("weighted"));
        assert!(text.contains("agent unreachable"));
        assert!(text.contains("Votes: 4=2"));
    }

    #[tokio::test]
    async fn test_json_round_trips_answer() {
        let text = ConsoleFormatter::render(&outcome(QueryRequest::new("What is 2+2?")).await, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["aggregate"]["answer"], "4");
    }

    #[test]
    fn test_agents_table_marks_disabled() {
        colored::control::set_override(false);
        let agents = [
            AgentDescriptor::new("a", "10.0.0.1", 8001, "llama3").with_topic_tags(["math"]),
            AgentDescriptor::new("b", "10.0.0.2", 8001, "phi3").disabled(),
        ];
        let table = ConsoleFormatter::format_agents(&agents);
        assert_eq!(table.lines().count(), 3);
        assert!(table.contains("10.0.0.1:8001"));
        assert!(table.lines().nth(2).unwrap().ends_with("(disabled)"));
        assert!(ConsoleFormatter::format_agents(&[]).contains("No agents"));
    }

    #[test]
    fn test_issues() {
        colored::control::set_override(false);
        let issues = [ConfigIssue::warning(ConfigIssueCode::NoEnabledAgents, "no enabled agents")];
        assert_eq!(ConsoleFormatter::format_issues(&issues), "warning: no enabled agents\n");
    }
}
