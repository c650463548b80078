//! Prioritizer CLI - rank a batch of tasks from a file or stdin.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::disallowed_macros)]
#![allow(clippy::uninlined_format_args)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tokio::io::AsyncReadExt;

use prioritizer::domain::{local_today, ConfigDomain, RankingDomain};
use prioritizer::entities::{ScoredTask, ScoringConfig, WeightConfig};
use prioritizer::errors::{PrioritizerError, PrioritizerResult};
use prioritizer::payload::TaskBatch;
use prioritizer::{run_server, ui, AppState, ServerConfig};

#[derive(Parser)]
#[command(name = "prioritizer")]
#[command(about = "Rank tasks by urgency, importance, effort and dependencies", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Scoring configuration file
    #[arg(long, global = true, env = "PRIORITIZER_CONFIG", default_value = "prioritizer.json")]
    config: PathBuf,

    /// Weights as JSON, e.g. '{"urgency": 2, "effort": 0.5}'
    #[arg(long, global = true)]
    weights: Option<String>,

    /// Evaluate as of this date (YYYY-MM-DD) instead of today
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Score and rank every task in a batch
    Analyze {
        /// Task batch file, or '-' for stdin
        #[arg(default_value = "-")]
        input: String,
    },

    /// Show the top tasks of a batch
    Suggest {
        /// Task batch file, or '-' for stdin
        #[arg(default_value = "-")]
        input: String,

        /// Number of tasks to return
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Run the HTTP service
    Serve {
        /// Bind host
        #[arg(long)]
        host: Option<String>,

        /// Bind port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show or initialize the scoring configuration
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        ui::print_error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> PrioritizerResult<()> {
    let config_domain = ConfigDomain::new(&cli.config);
    let today = cli.today.unwrap_or_else(local_today);

    match cli.command {
        Commands::Analyze { input } => {
            let ranking = RankingDomain::new(config_domain.load().await?)?;
            let batch = read_batch(&input, cli.weights.as_deref()).await?;

            let ranked = ranking.analyze(&batch.tasks, &batch.weights, today)?;
            print_ranked(&ranked, cli.json)?;
        }

        Commands::Suggest { input, limit } => {
            let ranking = RankingDomain::new(config_domain.load().await?)?;
            let batch = read_batch(&input, cli.weights.as_deref()).await?;
            if batch.tasks.is_empty() {
                return Err(PrioritizerError::EmptyBatch);
            }

            let limit = limit
                .or(batch.limit)
                .unwrap_or(ranking.config().suggest_limit);
            let suggested = ranking.suggest(&batch.tasks, &batch.weights, today, Some(limit))?;

            if cli.json {
                let envelope = serde_json::json!({
                    "message": format!("Top {limit} recommended tasks based on priority score"),
                    "suggested_tasks": suggested,
                });
                println!("{}", serde_json::to_string_pretty(&envelope)?);
            } else {
                println!(
                    "{}",
                    format!("Top {} recommended tasks", suggested.len()).cyan().bold()
                );
                ui::display_ranked(&suggested);
            }
        }

        Commands::Serve { host, port } => {
            let ranking = RankingDomain::new(config_domain.load().await?)?;
            let mut server_config = ServerConfig::default();
            if let Some(host) = host {
                server_config.host = host;
            }
            if let Some(port) = port {
                server_config.port = port;
            }

            let mut state = AppState::new(ranking);
            if let Some(today) = cli.today {
                state = state.with_fixed_today(today);
            }

            ui::print_info(&format!("Serving on http://{}", server_config.bind_addr()));
            run_server(Arc::new(state), &server_config)
                .await
                .map_err(|e| PrioritizerError::Internal {
                    reason: e.to_string(),
                })?;
        }

        Commands::Config { init } => {
            if init {
                if config_domain.path().exists() {
                    ui::print_warning(&format!(
                        "Configuration already exists: {}",
                        config_domain.path().display()
                    ));
                    return Ok(());
                }
                config_domain.save(&ScoringConfig::default()).await?;
                ui::print_success(&format!(
                    "Wrote default configuration to {}",
                    config_domain.path().display()
                ));
            } else {
                let config = config_domain.load().await?;
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&config)?);
                } else {
                    ui::display_scoring_config(&config);
                }
            }
        }
    }

    Ok(())
}

/// Read a batch from a file or stdin and apply `--weights`.
async fn read_batch(input: &str, weights: Option<&str>) -> PrioritizerResult<TaskBatch> {
    let bytes = if input == "-" {
        let mut buf = Vec::new();
        tokio::io::stdin().read_to_end(&mut buf).await?;
        buf
    } else {
        tokio::fs::read(Path::new(input))
            .await
            .map_err(|e| PrioritizerError::FileReadError {
                path: input.to_string(),
                reason: e.to_string(),
            })?
    };

    let mut batch = TaskBatch::from_body(&bytes)?.ok_or(PrioritizerError::EmptyBatch)?;

    if let Some(text) = weights {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|_| PrioritizerError::InvalidPayload {
                reason: "Invalid JSON supplied in '--weights'.".to_string(),
            })?;
        batch.weights = WeightConfig::from_value(&value);
    }

    Ok(batch)
}

fn print_ranked(tasks: &[ScoredTask], json: bool) -> PrioritizerResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(tasks)?);
    } else if tasks.is_empty() {
        ui::print_info("No tasks to rank");
    } else {
        ui::display_ranked(tasks);
    }
    Ok(())
}
