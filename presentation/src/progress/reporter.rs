//! Progress reporting for dispatch rounds

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use quorum_application::DispatchProgress;
use quorum_domain::AgentId;
use std::sync::{Mutex, PoisonError};

struct RoundBar {
    bar: ProgressBar,
    failed: usize,
}

/// One indicatif bar per dispatch round; agents tick it as they answer
pub struct ProgressReporter {
    multi: MultiProgress,
    current: Mutex<Option<RoundBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            current: Mutex::new(None),
        }
    }

    fn round_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn round_name(round: u32) -> &'static str {
        match round {
            1 => "Round 1: Fan-out",
            _ => "Round 2: Debate",
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchProgress for ProgressReporter {
    fn on_round_start(&self, round: u32, agents: usize) {
        let bar = self.multi.add(ProgressBar::new(agents as u64));
        bar.set_style(Self::round_style());
        bar.set_prefix(Self::round_name(round));
        bar.set_message("dispatching");

        *self.current.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(RoundBar { bar, failed: 0 });
    }

    fn on_agent_complete(&self, _round: u32, agent: &AgentId, success: bool) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(round) = current.as_mut() else {
            return;
        };
        if success {
            round.bar.set_message(format!("{} {}", "v".green(), agent));
        } else {
            round.failed += 1;
            round.bar.set_message(format!("{} {}", "x".red(), agent));
        }
        round.bar.inc(1);
    }

    fn on_round_complete(&self, _round: u32) {
        let finished = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(RoundBar { bar, failed }) = finished {
            let answered = bar.position().saturating_sub(failed as u64);
            let summary = format!("{} answered, {} failed", answered, failed);
            let summary = if failed == 0 {
                summary.green()
            } else {
                summary.yellow()
            };
            bar.finish_with_message(summary.to_string());
        }
    }
}

/// Line-per-event progress for runs where log output would tear a bar
pub struct SimpleProgress;

impl DispatchProgress for SimpleProgress {
    fn on_round_start(&self, round: u32, agents: usize) {
        eprintln!(
            "{} {} ({} agents)",
            "->".cyan(),
            ProgressReporter::round_name(round).bold(),
            agents
        );
    }

    fn on_agent_complete(&self, _round: u32, agent: &AgentId, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), agent);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), agent);
        }
    }

    fn on_round_complete(&self, _round: u32) {
        eprintln!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_bar_lifecycle() {
        let reporter = ProgressReporter::new();
        reporter.on_round_start(1, 2);
        reporter.on_agent_complete(1, &AgentId::from("a"), true);
        reporter.on_agent_complete(1, &AgentId::from("b"), false);
        {
            let current = reporter.current.lock().unwrap();
            let round = current.as_ref().unwrap();
            assert_eq!(round.bar.position(), 2);
            assert_eq!(round.failed, 1);
        }
        reporter.on_round_complete(1);
        assert!(reporter.current.lock().unwrap().is_none());
    }

    #[test]
    fn test_completion_without_round_is_ignored() {
        let reporter = ProgressReporter::new();
        reporter.on_agent_complete(2, &AgentId::from("a"), true);
        reporter.on_round_complete(2);
    }
}
