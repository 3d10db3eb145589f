use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use nocode_bot::EventDispatcher;
use nocode_channels::{SocketModeClient, SocketModeConfig};
use nocode_config::{BotConfig, PreparedConfig, DEFAULT_CONFIG_FILE};
use nocode_core::{Transport, WorkflowDefinition};
use nocode_workflows::{CompletionLedger, TemplateStore, WorkflowRegistry};

#[derive(Parser)]
#[command(name = "nocode-slackbot")]
#[command(about = "Slack bot that walks users through message-template workflows")]
#[command(version)]
struct Cli {
    /// Path to the YAML config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let PreparedConfig { config, warnings } = nocode_config::load_and_prepare(&cli.config)
        .await
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    nocode_logging::init_logger(config.log_dir(), config.log_level(), config.log_json());
    info!(path = %cli.config.display(), "Loaded config");
    for warning in &warnings {
        warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    debug!(config = %nocode_config::redact(&config), "Effective config");

    run(config).await
}

async fn run(config: BotConfig) -> Result<()> {
    let demo_dir = config.demo_dir();
    info!(demo_dir = %demo_dir.display(), "Starting Slack workflow bot");

    let templates = TemplateStore::load(demo_dir)
        .await
        .with_context(|| format!("Failed to load templates from {}", demo_dir.display()))?;

    let workflows = WorkflowRegistry::build(
        config
            .workflows
            .iter()
            .map(|wf| WorkflowDefinition::new(&wf.name, &wf.file)),
    );
    for name in workflows.names() {
        if let Some(def) = workflows.lookup(name) {
            if !templates.contains(&def.file) {
                warn!(workflow = %name, file = %def.file, "Workflow points at a missing template");
            }
        }
    }

    let ledger = CompletionLedger::new();
    let cancel = CancellationToken::new();

    let client = Arc::new(SocketModeClient::new(SocketModeConfig::new(
        config.slack_app_token.clone(),
        config.slack_bot_token.clone(),
    )));
    let events = client.start(cancel.child_token());

    let transport: Arc<dyn Transport> = client;
    let dispatcher = EventDispatcher::new(transport, Arc::new(templates), Arc::new(workflows), ledger);
    let mut dispatcher_task = tokio::spawn(dispatcher.run(events, cancel.child_token()));

    info!("All components started");

    tokio::select! {
        signal = shutdown_signal() => {
            info!(signal = %signal, "Caught signal. Shutting down");
        }
        res = &mut dispatcher_task => {
            match res {
                Ok(Ok(())) => info!("Event dispatcher finished"),
                Ok(Err(e)) => error!(error = %e, "Event dispatcher failed"),
                Err(e) => error!(error = %e, "Event dispatcher task panicked"),
            }
            cancel.cancel();
            return Ok(());
        }
    }

    cancel.cancel();
    if let Err(e) = dispatcher_task.await {
        error!(error = %e, "Event dispatcher task panicked");
    }
    Ok(())
}

/// Resolve on the first SIGINT or SIGTERM and name it.
#[cfg(unix)]
async fn shutdown_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = match signal(SignalKind::terminate()) {
        Ok(term) => term,
        Err(e) => {
            error!(error = %e, "Failed to install SIGTERM handler; only Ctrl-C will stop the bot");
            let _ = tokio::signal::ctrl_c().await;
            return "SIGINT";
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => "SIGINT",
        _ = term.recv() => "SIGTERM",
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> &'static str {
    let _ = tokio::signal::ctrl_c().await;
    "ctrl-c"
}
