//! Prioritizer service binary.
//!
//! Standalone HTTP service exposing the analyze and suggest endpoints.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use prioritizer::{run_server, AppState, ConfigDomain, LogFormat, RankingDomain, ScoringConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::default();

    // Initialize tracing
    let filter = EnvFilter::from_default_env().add_directive("prioritizer=info".parse()?);
    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init(),
    }

    info!("Starting prioritizer service...");

    let scoring = match &config.scoring_config {
        Some(path) => {
            let scoring = ConfigDomain::new(path)
                .load()
                .await
                .with_context(|| format!("Failed to load scoring config from {}", path.display()))?;
            info!(path = %path.display(), "Loaded scoring configuration");
            scoring
        }
        None => ScoringConfig::default(),
    };

    let ranking = RankingDomain::new(scoring).context("Invalid scoring configuration")?;
    let state = Arc::new(AppState::new(ranking));

    info!(addr = %config.bind_addr(), cors = config.cors_enabled, "Configuration loaded");

    run_server(state, &config).await
}
