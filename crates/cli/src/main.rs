//! Vehicle Maintenance Predictor CLI
//!
//! A command-line tool for generating maintenance predictions, cost
//! estimates, and oil-interval recommendations from vehicle and history
//! documents.

mod commands;
mod input;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use engine_lib::config::EngineConfig;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Vehicle Maintenance Predictor CLI
#[derive(Parser)]
#[command(name = "vmp")]
#[command(author, version, about = "CLI for the Vehicle Maintenance Predictor", long_about = None)]
pub struct Cli {
    /// Directory holding predictor artifacts (can also be set via ENGINE_MODEL_DIR)
    #[arg(long, env = "ENGINE_MODEL_DIR", default_value = "models")]
    pub model_dir: PathBuf,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a combined schedule + cost prediction
    Predict {
        /// Path to the vehicle profile JSON document
        #[arg(long)]
        vehicle: PathBuf,

        /// Path to the service history JSON document (array, most recent first)
        #[arg(long)]
        history: Option<PathBuf>,

        /// Service type to estimate the cost for
        #[arg(long)]
        service_type: Option<String>,
    },

    /// Estimate the cost of the next service
    Cost {
        /// Path to the vehicle profile JSON document
        #[arg(long)]
        vehicle: PathBuf,

        /// Path to the service history JSON document
        #[arg(long)]
        history: Option<PathBuf>,

        /// Service type to estimate the cost for
        #[arg(long)]
        service_type: Option<String>,
    },

    /// Recommend an oil-change distance interval
    Interval {
        /// Path to the vehicle profile JSON document
        #[arg(long)]
        vehicle: PathBuf,

        /// Default interval to start from, in km
        #[arg(long)]
        default_km: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = EngineConfig {
        model_dir: cli.model_dir.clone(),
        ..EngineConfig::load()?
    };

    match cli.command {
        Commands::Predict {
            vehicle,
            history,
            service_type,
        } => {
            commands::predict::run(
                &config,
                &vehicle,
                history.as_deref(),
                service_type.as_deref(),
                cli.format,
                cli.verbose,
            )
            .await?;
        }
        Commands::Cost {
            vehicle,
            history,
            service_type,
        } => {
            commands::cost::run(
                &config,
                &vehicle,
                history.as_deref(),
                service_type.as_deref(),
                cli.format,
            )?;
        }
        Commands::Interval { vehicle, default_km } => {
            commands::interval::run(&config, &vehicle, default_km, cli.format)?;
        }
    }

    Ok(())
}
