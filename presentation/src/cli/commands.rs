//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use quorum_domain::QueryRequest;
use quorum_domain::query::params::{DEFAULT_MAX_TOKENS, DEFAULT_SEED, DEFAULT_TEMPERATURE};
use std::path::PathBuf;

/// Output format for `ask`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Only the consensus answer
    Answer,
    /// Aggregate, votes and every agent response
    Full,
    /// The query outcome as JSON
    Json,
}

impl OutputFormat {
    /// Parse the `[output] format` config value
    pub fn from_config(value: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(value, true).ok()
    }
}

/// CLI arguments for ensemble-quorum
#[derive(Parser, Debug)]
#[command(name = "ensemble-quorum")]
#[command(author, version, about = "Ensemble orchestrator - fan a question out to many LLM agents and aggregate the answers")]
#[command(long_about = r#"
Ensemble Quorum sends one question to several independently hosted LLM agents
and combines their answers with a consensus strategy:

  majority   one vote per agent
  weighted   votes carry each agent's learned weight
  isp        favours answers more popular than the agents' track record predicts
  topic      weighted vote among agents tagged for the detected topic
  debate     agents see their peers' answers and may revise (two rounds)

Configuration files are loaded from (in priority order):
1. QUORUM_* environment variables (nested with __)
2. --config <path>     Explicit config file
3. ./quorum.toml       Project-level config
4. ~/.config/ensemble-quorum/config.toml   Global config

Example:
  ensemble-quorum serve --bind 0.0.0.0:8000
  ensemble-quorum ask "What is the capital of France?" --strategy debate
  ensemble-quorum --simulate ask "What is 2+2?" --compare --output full
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Answer with deterministic in-process agents instead of calling hosts
    #[arg(long, global = true)]
    pub simulate: bool,

    /// Also write logs to daily-rolling files in this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the orchestrator HTTP server
    Serve {
        /// Listen address (overrides `[server] bind`)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Ask the ensemble one question
    Ask(AskArgs),

    /// List configured agents
    Agents,
}

#[derive(Args, Debug, Clone)]
pub struct AskArgs {
    /// The question to ask
    pub prompt: String,

    /// Consensus strategy: majority, weighted, isp, topic or debate
    #[arg(short, long, default_value = "majority")]
    pub strategy: String,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Sampling temperature (ignored unless --non-deterministic)
    #[arg(short, long, default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f64,

    /// Sample with --temperature instead of forcing 0
    #[arg(long)]
    pub non_deterministic: bool,

    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Restrict the fan-out to these agents (repeatable)
    #[arg(short, long = "agent", value_name = "ID")]
    pub agents: Vec<String>,

    /// Cap the number of agents queried
    #[arg(long, value_name = "N")]
    pub max_agents: Option<usize>,

    /// Evaluate every voting strategy over the same answers
    #[arg(long)]
    pub compare: bool,

    /// Known correct answer; updates agent weights
    #[arg(long, value_name = "ANSWER")]
    pub ground_truth: Option<String>,

    /// Output format (defaults to `[output] format`, then `answer`)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,
}

impl AskArgs {
    /// Build the query this invocation submits
    pub fn to_request(&self) -> QueryRequest {
        let mut request = QueryRequest::new(self.prompt.clone())
            .with_strategy(self.strategy.clone())
            .with_seed(self.seed)
            .with_compare_strategies(self.compare);
        request.temperature = self.temperature;
        request.deterministic = !self.non_deterministic;
        request.max_tokens = self.max_tokens;
        if !self.agents.is_empty() {
            request = request.with_agent_ids(self.agents.iter().map(String::as_str));
        }
        if let Some(max_agents) = self.max_agents {
            request = request.with_max_agents(max_agents);
        }
        if let Some(truth) = &self.ground_truth {
            request = request.with_ground_truth(truth.clone());
        }
        request
    }
}
