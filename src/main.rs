// src/main.rs

use std::env;
use std::sync::Arc;

use anyhow::{Context, bail};
use tokio::io::{self, BufReader};
use tracing_subscriber::EnvFilter;

use search_prompter::{
    Config, DatasetIndex, EditDistanceSpeller, PromptEngine, ReadinessCoordinator, RemoteClient,
    RemoteStatus, session,
};

type Engine = PromptEngine<EditDistanceSpeller, RemoteClient>;

/// Dispatches to the requested command (search by default).
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map_or("search", |s| s.as_str());

    match command {
        "search" => run_search().await,
        "suggest" => run_suggest(&args[2..].join(" ")).await,
        "ping" => run_ping().await,
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("search_prompter=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn remote_client(config: &Config) -> anyhow::Result<RemoteClient> {
    let base_url = config.service.base_url()?;
    RemoteClient::new(base_url, config.service.timeout()).context("Failed to build HTTP client")
}

/// Indexes the dataset. Failing here aborts startup.
fn build_engine(config: &Config) -> anyhow::Result<Engine> {
    let dataset = &config.dataset;
    let index = DatasetIndex::load(&dataset.path, dataset.ratings)
        .with_context(|| format!("Failed to index dataset '{}'", dataset.path.display()))?;

    Ok(PromptEngine::new(Arc::new(index), EditDistanceSpeller, remote_client(config)?)
        .with_capacity(config.prompts.max_candidates)
        .with_policy(config.prompts.remote_failure))
}

/// Waits for the inference service, then runs the interactive prompt.
async fn run_search() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let engine = build_engine(&config)?;

    tracing::info!(service = %engine.source().base_url(), "Waiting for inference service");
    ReadinessCoordinator::new(engine.source().clone(), config.service.ping_interval())
        .wait_until_ready()
        .await;

    session::run(&engine, BufReader::new(io::stdin()), io::stdout()).await?;
    Ok(())
}

/// Prints prompts for a single query without waiting for readiness.
async fn run_suggest(query: &str) -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let engine = build_engine(&config)?;

    let suggestions = engine.generate_candidates(query).await?;
    for phrase in suggestions.candidates.iter() {
        println!("{phrase}");
    }
    if let RemoteStatus::Unavailable(reason) = suggestions.remote {
        eprintln!("inference service unavailable: {reason}");
    }
    Ok(())
}

/// One readiness probe; the exit status tells whether the service is up.
async fn run_ping() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let client = remote_client(&config)?;

    let status = client.ping().await.context("Inference service unreachable")?;
    if status != reqwest::StatusCode::OK {
        bail!("Inference service not ready: {status}");
    }
    println!("ready");
    Ok(())
}

/// Prints the help message for the user.
fn print_usage() {
    println!("--- Movie Search Prompter ---");
    println!("Usage: search-prompter [COMMAND]");
    println!("\nCommands:");
    println!("  search            Wait for the inference service, then start the interactive prompt (default).");
    println!("  suggest <QUERY>   Print prompts for one query and exit.");
    println!("  ping              Check once whether the inference service is ready.");
    println!("\nSettings come from prompter.toml (or $PROMPTER_CONFIG) and PROMPTER_* variables.");
}
