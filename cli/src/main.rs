//! CLI entrypoint for Ensemble Quorum
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use quorum_application::{
    AgentGateway, FeedbackUseCase, HealthUseCase, MetricsSink, NoMetrics, RegistryHandle,
    ReloadAgentsUseCase, RunQueryUseCase, WeightPersister, WeightRepository,
};
use quorum_domain::{AgentRegistry, WeightStore};
use quorum_infrastructure::{
    ConfigLoader, FileAgentSource, FileConfig, HttpAgentGateway, JsonWeightFile,
    JsonlMetricsSink, SimulatedAgentGateway,
};
use quorum_presentation::{
    AppState, AskArgs, Cli, Command, ConsoleFormatter, OutputFormat, ProgressReporter,
    SimpleProgress,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    // Dropping the guard flushes the file writer, so it lives until exit
    let _log_guard = init_logging(&cli)?;

    if cli.show_config {
        print!("{}", ConfigLoader::describe_sources(cli.config.as_ref()));
        return Ok(());
    }

    let config = ConfigLoader::load(cli.config.as_ref())
        .map_err(|e| anyhow!("Failed to load configuration: {}", e))?;
    let issues = config.validate();
    if !issues.is_empty() {
        eprint!("{}", ConsoleFormatter::format_issues(&issues));
    }
    if FileConfig::has_errors(&issues) {
        bail!("Configuration has errors; fix them and retry");
    }
    if !config.output.color {
        colored::control::set_override(false);
    }

    let Some(command) = cli.command.as_ref() else {
        bail!("No command given. Try `ensemble-quorum --help`.");
    };

    if let Command::Agents = command {
        print!("{}", ConsoleFormatter::format_agents(&config.agent_descriptors()));
        return Ok(());
    }

    info!("Starting Ensemble Quorum");

    // === Dependency Injection ===
    if cli.simulate {
        info!("Using simulated agents");
        let gateway = Arc::new(SimulatedAgentGateway::new().with_latency(true));
        run(&cli, command, &config, gateway).await
    } else {
        let gateway = Arc::new(HttpAgentGateway::new().context("Failed to create HTTP client")?);
        run(&cli, command, &config, gateway).await
    }
}

/// Initialize logging based on verbosity level; `RUST_LOG` wins when set
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let stderr = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let Some(dir) = &cli.log_dir else {
        tracing_subscriber::registry().with(filter).with(stderr).init();
        return Ok(None);
    };

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("ensemble-quorum")
        .filename_suffix("log")
        .build(dir)
        .with_context(|| format!("Failed to open log directory {}", dir.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();
    Ok(Some(guard))
}

async fn run<G: AgentGateway + 'static>(
    cli: &Cli,
    command: &Command,
    config: &FileConfig,
    gateway: Arc<G>,
) -> Result<()> {
    let state = build_state(cli, config, gateway)?;

    match command {
        Command::Serve { bind } => {
            let bind = bind.clone().unwrap_or_else(|| config.server.bind.clone());
            let shutdown = CancellationToken::new();
            let trigger = shutdown.clone();
            tokio::spawn(async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        info!("Shutdown requested");
                        trigger.cancel();
                    }
                    Err(e) => warn!("Cannot listen for Ctrl-C: {}", e),
                }
            });

            quorum_presentation::serve(state, &bind, &config.server.cors_origins, shutdown)
                .await
                .with_context(|| format!("Server on {} failed", bind))
        }
        Command::Ask(args) => ask(&state, args, config, cli.verbose > 0).await,
        Command::Agents => Ok(()),
    }
}

async fn ask<G: AgentGateway + 'static>(
    state: &AppState<G>,
    args: &AskArgs,
    config: &FileConfig,
    verbose: bool,
) -> Result<()> {
    // An unknown configured format was already reported by validation
    let format = args
        .output
        .or_else(|| OutputFormat::from_config(config.output.format.as_deref()?))
        .unwrap_or(OutputFormat::Answer);

    let request = args.to_request();
    let outcome = if args.quiet || format == OutputFormat::Json {
        state.run_query.execute(request).await?
    } else if verbose {
        // Log lines would tear an indicatif bar
        state
            .run_query
            .execute_with_progress(request, &SimpleProgress)
            .await?
    } else {
        let progress = ProgressReporter::new();
        state
            .run_query
            .execute_with_progress(request, &progress)
            .await?
    };

    println!("{}", ConsoleFormatter::render(&outcome, format));
    Ok(())
}

/// Build every use case over one gateway, registry and Weight Store
fn build_state<G: AgentGateway + 'static>(
    cli: &Cli,
    config: &FileConfig,
    gateway: Arc<G>,
) -> Result<AppState<G>> {
    let registry = Arc::new(RegistryHandle::new(AgentRegistry::new(
        config.agent_descriptors(),
    )?));

    let weights = Arc::new(WeightStore::new(config.weights.to_policy()));
    let repository: Option<Arc<dyn WeightRepository>> = config
        .weights
        .path
        .as_ref()
        .map(|path| Arc::new(JsonWeightFile::new(path)) as Arc<dyn WeightRepository>);
    if let Some(repository) = &repository {
        match repository.load() {
            Ok(Some(snapshot)) => {
                info!("Restored {} agent weights", snapshot.weights.len());
                weights.restore(snapshot);
            }
            Ok(None) => {}
            Err(e) => warn!("Ignoring unreadable weight file: {}", e),
        }
    }
    let seeded = weights.initialize(registry.snapshot().all());
    info!("Seeded {} agent weights from configuration", seeded);

    let metrics: Arc<dyn MetricsSink> = match &config.metrics.path {
        Some(path) => match JsonlMetricsSink::open(path) {
            Ok(sink) => Arc::new(sink),
            Err(e) => {
                warn!("Metrics disabled, cannot open {}: {}", path.display(), e);
                Arc::new(NoMetrics)
            }
        },
        None => Arc::new(NoMetrics),
    };

    let mut run_query = RunQueryUseCase::new(
        Arc::clone(&gateway),
        Arc::clone(&registry),
        Arc::clone(&weights),
        config.to_orchestrator_config(),
    )
    .with_metrics(metrics);
    let mut feedback = FeedbackUseCase::new(
        Arc::clone(&weights),
        Arc::clone(&registry),
        config.taxonomy(),
    );
    if let Some(repository) = repository {
        let persister = WeightPersister::new(Arc::clone(&weights), repository);
        run_query = run_query.with_weight_persister(persister.clone());
        feedback = feedback.with_weight_persister(persister);
    }

    let reload = ReloadAgentsUseCase::new(
        Arc::new(FileAgentSource::new(cli.config.clone())),
        Arc::clone(&registry),
        Arc::clone(&weights),
    );

    Ok(AppState {
        run_query: Arc::new(run_query),
        health: Arc::new(HealthUseCase::new(gateway, Arc::clone(&registry))),
        feedback: Arc::new(feedback),
        reload: Arc::new(reload),
        registry,
        weights,
    })
}
