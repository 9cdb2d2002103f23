//! Job command handlers
//!
//! Status lookups, following a job to completion, and fetching the image.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::*;
use diffusion_client::{DiffusionClient, JobPoller, PollPhase, PollState};

use crate::config::Config;
use crate::output::{colorize_state, print_job_details};

/// Show the current status of a job
pub async fn show_status(job_id: &str, json: bool, config: &Config) -> Result<()> {
    let client = config.client()?;
    let status = client
        .get_job_status(job_id)
        .await
        .with_context(|| format!("Failed to fetch status of job {}", job_id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        print_job_details(&status);
        if status.status.is_terminal() && status.failure_reason().is_none() {
            println!("  Image:       {}", client.image_url(job_id).underline());
        }
    }

    Ok(())
}

/// Follow an existing job until it settles
pub async fn watch_job(job_id: &str, output: Option<PathBuf>, config: &Config) -> Result<()> {
    let client = Arc::new(config.client()?);
    let poller = JobPoller::new(client.clone(), config.poll_interval);

    poller.watch(Some(job_id.to_string()));
    let state = follow(&poller).await?;

    finish(&client, &state, output).await
}

/// Print the image URL of a job
pub fn print_image_url(job_id: &str, config: &Config) -> Result<()> {
    let client = config.client()?;
    println!("{}", client.image_url(job_id));
    Ok(())
}

/// Prints status transitions until the poller stops
///
/// Ctrl-C stops polling locally; the job itself keeps running on the
/// backend.
pub(super) async fn follow(poller: &JobPoller) -> Result<PollState> {
    let mut rx = poller.subscribe();
    let mut last_seen = None;

    loop {
        let state = rx.borrow_and_update().clone();

        let observed = state.status.as_ref().map(|s| s.status);
        if observed != last_seen {
            if let Some(current) = observed {
                println!("  Status: {}", colorize_state(current));
            }
            last_seen = observed;
        }

        if !state.is_polling {
            return Ok(state);
        }

        tokio::select! {
            changed = rx.changed() => {
                changed.context("Job poller shut down unexpectedly")?;
            }
            _ = tokio::signal::ctrl_c() => {
                poller.stop();
                anyhow::bail!("Interrupted; the job keeps running on the backend");
            }
        }
    }
}

/// Reports the final state of a job and saves the image if requested
pub(super) async fn finish(
    client: &DiffusionClient,
    state: &PollState,
    output: Option<PathBuf>,
) -> Result<()> {
    match state.phase() {
        PollPhase::Completed => {
            let Some(status) = &state.status else {
                anyhow::bail!("Job completed without a status");
            };
            println!();
            print_job_details(status);
            println!(
                "  Image:       {}",
                client.image_url(&status.job_id).underline()
            );

            if let Some(output) = output {
                let path = resolve_output(&output, &status.image_name).await;
                let bytes = client
                    .download_image(&status.job_id)
                    .await
                    .context("Failed to download image")?;
                tokio::fs::write(&path, &bytes)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("{} Saved {}", "✓".green(), path.display().to_string().bold());
            }

            Ok(())
        }
        PollPhase::Failed => {
            let message = state.failure_message().unwrap_or("Generation failed");
            println!("{} {}", "✗ Generation failed:".red().bold(), message.red());
            anyhow::bail!("Job did not complete: {}", message)
        }
        PollPhase::Idle | PollPhase::Generating => {
            anyhow::bail!("Polling stopped before the job finished")
        }
    }
}

/// A directory target gets `{image_name}.png` appended
async fn resolve_output(output: &Path, image_name: &str) -> PathBuf {
    match tokio::fs::metadata(output).await {
        Ok(meta) if meta.is_dir() => output.join(format!("{}.png", image_name)),
        _ => output.to_path_buf(),
    }
}
