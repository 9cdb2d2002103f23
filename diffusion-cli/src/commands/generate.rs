//! Generate command handler

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use diffusion_client::{ClientError, GenerationSession, SubmitError};
use diffusion_core::dto::generation::GenerationRequest;

use super::job::{finish, follow};
use crate::config::Config;
use crate::output::print_validation_errors;

/// Arguments of `diffusion generate`
#[derive(Args)]
pub struct GenerateArgs {
    /// Text prompt describing the image
    pub prompt: String,

    /// Image width in pixels (512-2048, multiple of 64)
    #[arg(long, default_value_t = GenerationRequest::DEFAULT_SIZE)]
    pub width: u32,

    /// Image height in pixels (512-2048, multiple of 64)
    #[arg(long, default_value_t = GenerationRequest::DEFAULT_SIZE)]
    pub height: u32,

    /// Number of inference steps (1-50)
    #[arg(long, default_value_t = GenerationRequest::DEFAULT_STEPS)]
    pub steps: u32,

    /// Save the finished image to this file or directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the job ID and exit without waiting
    #[arg(long)]
    pub detach: bool,
}

impl GenerateArgs {
    fn request(&self) -> GenerationRequest {
        GenerationRequest::new(self.prompt.clone())
            .with_size(self.width, self.height)
            .with_steps(self.steps)
    }
}

/// Submit a generation request and, unless detached, follow it to the end
pub async fn handle_generate(args: GenerateArgs, config: &Config) -> Result<()> {
    let client = Arc::new(config.client()?);
    let session = GenerationSession::new(Arc::clone(&client), config.poll_interval);

    let job = match session.submit(args.request()).await {
        Ok(job) => job,
        Err(SubmitError::Invalid(errors)) => {
            print_validation_errors(&errors);
            anyhow::bail!("Invalid generation request");
        }
        Err(SubmitError::Transport(e)) => {
            let context = submit_failure_context(&e, &config.api_url);
            return Err(e).context(context);
        }
    };

    println!(
        "{} Started job {} ({})",
        "✓".green(),
        job.job_id.cyan(),
        job.image_name.dimmed()
    );

    if args.detach {
        println!(
            "  Follow it with: {}",
            format!("diffusion watch {}", job.job_id).bold()
        );
        return Ok(());
    }

    let state = follow(session.poller()).await?;
    finish(&client, &state, args.output).await
}

/// Points at the backend for 4xx/5xx, at connectivity otherwise
fn submit_failure_context(err: &ClientError, api_url: &str) -> String {
    if err.is_client_error() {
        "Backend rejected the generation request".to_string()
    } else if err.is_server_error() {
        "Backend failed to start the generation job".to_string()
    } else {
        format!("Is the API running at {}?", api_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: GenerateArgs,
    }

    #[test]
    fn test_defaults_match_request_defaults() {
        let harness = Harness::parse_from(["diffusion", "a cat"]);
        let request = harness.args.request();

        assert_eq!(request, GenerationRequest::new("a cat"));
        assert!(!harness.args.detach);
        assert!(harness.args.output.is_none());
    }

    #[test]
    fn test_explicit_parameters() {
        let harness = Harness::parse_from([
            "diffusion", "a cat", "--width", "768", "--height", "512", "--steps", "20", "-o",
            "out.png",
        ]);
        let request = harness.args.request();

        assert_eq!(request.width, 768);
        assert_eq!(request.height, 512);
        assert_eq!(request.steps, 20);
        assert_eq!(harness.args.output, Some(PathBuf::from("out.png")));
    }

    #[test]
    fn test_submit_failure_context_by_status() {
        let url = "http://localhost:8000";

        let rejected = ClientError::api_error(422, "bad prompt");
        assert_eq!(
            submit_failure_context(&rejected, url),
            "Backend rejected the generation request"
        );

        let crashed = ClientError::api_error(500, "CUDA out of memory");
        assert_eq!(
            submit_failure_context(&crashed, url),
            "Backend failed to start the generation job"
        );

        let garbled = ClientError::ParseError("expected value".to_string());
        assert_eq!(
            submit_failure_context(&garbled, url),
            "Is the API running at http://localhost:8000?"
        );
    }
}
