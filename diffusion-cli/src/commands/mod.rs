//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod generate;
mod health;
mod job;

pub use generate::GenerateArgs;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Submit a prompt and wait for the image
    Generate(GenerateArgs),
    /// Show the current status of a job
    Status {
        /// Job ID returned at submission
        job_id: String,

        /// Print the raw status as JSON
        #[arg(long)]
        json: bool,
    },
    /// Follow a job until it completes or fails
    Watch {
        /// Job ID returned at submission
        job_id: String,

        /// Save the finished image to this file or directory
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },
    /// Print the image URL of a job
    ImageUrl {
        /// Job ID returned at submission
        job_id: String,
    },
    /// Check backend health
    Health {
        /// Keep checking on the configured interval
        #[arg(short, long)]
        watch: bool,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Generate(args) => generate::handle_generate(args, config).await,
        Commands::Status { job_id, json } => job::show_status(&job_id, json, config).await,
        Commands::Watch { job_id, output } => job::watch_job(&job_id, output, config).await,
        Commands::ImageUrl { job_id } => job::print_image_url(&job_id, config),
        Commands::Health { watch } => {
            if watch {
                health::watch_health(config).await
            } else {
                health::check_once(config).await
            }
        }
    }
}
