//! tech-writer: autonomous codebase analysis agent
//!
//! Points a tool-using model at a directory, lets it explore with read-only
//! tools, and saves its final answer as a markdown file.

mod agent;
mod output;
mod progress;
mod tools;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use llm_core::{Config, OpenAiClient};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use agent::{AgentConfig, ChatModel, ModelClient, Strategy};

#[derive(Debug, Parser)]
#[command(name = "tech-writer")]
#[command(about = "Analyze a codebase with an LLM agent and write up the answer", version)]
struct Cli {
    /// Directory to analyze
    #[arg(short, long, default_value = ".")]
    directory: PathBuf,

    /// File containing the analysis prompt
    #[arg(short, long)]
    prompt: PathBuf,

    /// Model to use (overrides config)
    #[arg(short, long)]
    model: Option<String>,

    /// Agent strategy
    #[arg(short, long = "agent-type", value_enum, default_value_t = Strategy::React)]
    agent_type: Strategy,

    /// Base URL of the OpenAI-compatible API (overrides config)
    #[arg(long, env = "OPENAI_BASE_URL")]
    base_url: Option<String>,

    /// Directory to write results to (overrides config)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Path to a tech-writer.toml config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Setup logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load_or_default()?,
    };

    let prompt = read_prompt(&cli.prompt)?;
    validate_directory(&cli.directory)?;

    let model = cli.model.clone().unwrap_or_else(|| config.llm.model.clone());
    let base_url = cli.base_url.clone().unwrap_or_else(|| config.llm.base_url.clone());
    let output_dir = cli.output_dir.clone().unwrap_or_else(|| config.output.dir.clone());
    debug!(%model, %base_url, output_dir = %output_dir.display(), "Resolved configuration");

    let client = OpenAiClient::with_timeout(
        base_url,
        config.api_key(),
        Duration::from_secs(config.llm.timeout_secs),
    )?;
    let model_client: Arc<dyn ModelClient> = Arc::new(ChatModel::new(client, model.clone()));

    let agent_config = AgentConfig::new(model)
        .with_output_dir(output_dir)
        .with_verbose(cli.verbose);
    let strategy = cli.agent_type.build(model_client, agent_config);

    info!(
        strategy = strategy.name(),
        directory = %cli.directory.display(),
        "Starting analysis"
    );
    let path = strategy
        .run(&prompt, &cli.directory)
        .await
        .with_context(|| format!("{} analysis failed", strategy.name()))?;

    println!("{}", path.display());
    Ok(())
}

/// Read the prompt file; blank prompts are rejected
fn read_prompt(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read prompt file: {}", path.display()))?;
    let prompt = content.trim();
    if prompt.is_empty() {
        bail!("Prompt file is empty: {}", path.display());
    }
    Ok(prompt.to_string())
}

fn validate_directory(dir: &Path) -> Result<()> {
    let metadata = std::fs::metadata(dir)
        .with_context(|| format!("Failed to access directory: {}", dir.display()))?;
    if !metadata.is_dir() {
        bail!("Not a directory: {}", dir.display());
    }
    Ok(())
}
