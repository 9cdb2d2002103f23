//! Health command handlers

use std::sync::Arc;

use anyhow::Result;
use diffusion_client::HealthProber;
use diffusion_core::domain::health::HealthSnapshot;

use crate::config::Config;
use crate::output::print_health;

/// Run a single health check
pub async fn check_once(config: &Config) -> Result<()> {
    let client = config.client()?;

    let snapshot = match client.check_health().await {
        Ok(_) => HealthSnapshot::healthy_at(chrono::Utc::now()),
        Err(e) => {
            tracing::debug!("Health check failed: {}", e);
            HealthSnapshot::unhealthy_at(chrono::Utc::now())
        }
    };
    print_health(&snapshot);

    if !snapshot.healthy {
        anyhow::bail!("Backend at {} is offline", config.api_url);
    }
    Ok(())
}

/// Keep probing until interrupted
pub async fn watch_health(config: &Config) -> Result<()> {
    let client = Arc::new(config.client()?);
    let probe = HealthProber::new(client, config.health_interval).start();
    let mut rx = probe.subscribe();

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let snapshot = *rx.borrow_and_update();
                print_health(&snapshot);
            }
            _ = tokio::signal::ctrl_c() => {
                probe.stop();
                return Ok(());
            }
        }
    }
}
