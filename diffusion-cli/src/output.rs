//! Terminal rendering helpers

use chrono::Local;
use colored::*;
use diffusion_core::domain::health::HealthSnapshot;
use diffusion_core::domain::job::{JobState, JobStatus};
use diffusion_core::validation::ValidationErrors;

/// Colorize a job state for display
pub fn colorize_state(state: JobState) -> ColoredString {
    let state_str = state.as_str().to_uppercase();
    match state {
        JobState::Generating => state_str.cyan(),
        JobState::Completed => state_str.green(),
        JobState::Failed => state_str.red(),
    }
}

/// Print detailed job information
pub fn print_job_details(status: &JobStatus) {
    println!("{}", "Job Details:".bold());
    println!("  ID:          {}", status.job_id.cyan());
    println!("  Image name:  {}", status.image_name.dimmed());
    println!("  Status:      {}", colorize_state(status.status));
    println!("  Prompt:      {}", status.prompt);
    println!(
        "  Size:        {}x{} ({} steps)",
        status.width, status.height, status.steps
    );
    println!(
        "  Created:     {}",
        status.created_at.format("%Y-%m-%d %H:%M:%S")
    );

    if let Some(completed) = status.completed_at {
        println!("  Completed:   {}", completed.format("%Y-%m-%d %H:%M:%S"));
    }

    if let Some(duration) = status.duration() {
        println!("  Duration:    {}s", duration.num_seconds());
    }

    if let Some(reason) = status.failure_reason() {
        println!("\n{}", "Error:".bold());
        println!("{}", reason.red());
    }
}

/// Print one line per invalid field
pub fn print_validation_errors(errors: &ValidationErrors) {
    println!("{}", "Invalid generation request:".red().bold());
    for (field, message) in errors.iter() {
        println!("  {} {}", format!("{}:", field).yellow(), message);
    }
}

/// Print an online/offline line with the local check time
pub fn print_health(snapshot: &HealthSnapshot) {
    let status = if snapshot.healthy {
        "Online".green().bold()
    } else {
        "Offline".red().bold()
    };

    println!(
        "API Status: {}  {}",
        status,
        format!("Last check: {}", format_check_time(snapshot)).dimmed()
    );
}

fn format_check_time(snapshot: &HealthSnapshot) -> String {
    match snapshot.last_checked {
        Some(at) => at.with_timezone(&Local).format("%H:%M:%S").to_string(),
        None => "Never".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_time_before_first_check() {
        assert_eq!(format_check_time(&HealthSnapshot::default()), "Never");
    }

    #[test]
    fn test_check_time_is_formatted() {
        let snapshot = HealthSnapshot::unhealthy_at(chrono::Utc::now());
        let formatted = format_check_time(&snapshot);
        assert_eq!(formatted.len(), 8);
        assert_eq!(formatted.matches(':').count(), 2);
    }
}
