mod cli;
mod stdio;

use clap::Parser;
use cli::Cli;
use qna_core::agent::{IntentClassifier, Orchestrator, TaskExecutor};
use qna_core::model::GeminiClient;
use qna_core::tooling::{McpProcess, ProtocolClient};
use qna_core::AppConfig;
use std::error::Error;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.quiet);
    info!("Starting qna");

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err.user_message());
            return Err(err.into());
        }
    };
    info!(
        model = config.model.as_str(),
        intent_model = config.intent_model.as_str(),
        server = config.server.name.as_str(),
        "Loaded configuration"
    );

    let intent_provider = Arc::new(GeminiClient::from_config(
        &config.provider,
        &config.intent_model,
    ));
    let task_provider = Arc::new(GeminiClient::from_config(&config.provider, &config.model));
    let process = Arc::new(McpProcess::new(config.server.clone()));
    let protocol: Arc<dyn ProtocolClient> = process.clone();

    let classifier = IntentClassifier::new(intent_provider, Arc::clone(&protocol))
        .with_intents_uri(config.resources.intents.clone());
    let executor = TaskExecutor::new(task_provider, protocol)
        .with_resources(config.resources.clone())
        .with_tool_gating(config.tool_gating);
    let mut orchestrator = Orchestrator::new(classifier, executor);

    if let Err(err) = orchestrator.setup().await {
        error!(error = %err, "Agent setup failed");
        eprintln!("{}", err.user_message());
        process.shutdown().await;
        return Err(err.into());
    }
    orchestrator.subscribe(Arc::new(stdio::StdoutObserver));

    let outcome = stdio::run(&mut orchestrator).await;
    process.shutdown().await;
    outcome?;
    Ok(())
}

fn init_tracing(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
