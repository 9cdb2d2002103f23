//! Diffusion CLI
//!
//! Command-line front end for an image-generation backend: submit prompts,
//! follow jobs to completion, and check backend health.

mod commands;
mod config;
mod output;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "diffusion")]
#[command(about = "Image generation CLI", long_about = None)]
struct Cli {
    /// Backend URL
    #[arg(long, env = "DIFFUSION_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    /// Delay between job status polls, in milliseconds
    #[arg(long, env = "DIFFUSION_POLL_INTERVAL_MS", default_value_t = 2000)]
    poll_interval_ms: u64,

    /// Delay between health checks, in milliseconds
    #[arg(long, env = "DIFFUSION_HEALTH_INTERVAL_MS", default_value_t = 10_000)]
    health_interval_ms: u64,

    /// Per-request HTTP timeout, in seconds
    #[arg(long, env = "DIFFUSION_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "diffusion_cli=warn,diffusion_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        api_url: cli.api_url,
        poll_interval: Duration::from_millis(cli.poll_interval_ms),
        health_interval: Duration::from_millis(cli.health_interval_ms),
        request_timeout: Duration::from_secs(cli.timeout_secs),
    };
    config.validate()?;

    handle_command(cli.command, &config).await
}
