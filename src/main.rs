use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use tracing::{error, info};

use demand_forecast as forecast;
use forecast::config::{self, AppConfig};
use forecast::ServiceError;

/// Batch demand forecast: database in, JSON report out.
#[derive(Debug, Parser)]
#[command(name = "demand-forecast", version, about)]
struct Cli {
    /// Report destination (defaults to `output_path` from configuration)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Days to forecast past the last sale
    #[arg(long)]
    horizon: Option<u32>,

    /// Also write prediction rows to the database
    #[arg(long)]
    persist: bool,

    /// Configuration profile to load (config/<name>.toml)
    #[arg(long)]
    config_env: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = tracing::subscriber::with_default(config::bootstrap_subscriber(), || {
        let loaded = load(&cli);
        if let Err(e) = &loaded {
            error!(class = ?e.failure_class(), "Configuration error: {}", e);
        }
        loaded
    });
    let cfg = match loaded {
        Ok(cfg) => cfg,
        Err(e) => return exit_code(&e),
    };
    config::init_tracing(cfg.log_level(), cfg.log_json);

    match forecast::run_with_config(&cfg, Utc::now()).await {
        Ok(outcome) => {
            info!(
                output = %cfg.output_path,
                general_points = outcome.report.general.len(),
                persisted = outcome.report.persisted_predictions,
                "Done"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(class = ?e.failure_class(), "Forecast run failed: {}", e);
            exit_code(&e)
        }
    }
}

fn load(cli: &Cli) -> Result<AppConfig, ServiceError> {
    let mut cfg = match &cli.config_env {
        Some(profile) => config::load_config_for(profile)?,
        None => config::load_config()?,
    };

    if let Some(output) = &cli.output {
        cfg.output_path = output.to_string_lossy().into_owned();
    }
    if let Some(horizon) = cli.horizon {
        cfg.horizon_days = horizon;
    }
    if cli.persist {
        cfg.persist_predictions = true;
    }
    cfg.check()?;
    Ok(cfg)
}

fn exit_code(err: &ServiceError) -> ExitCode {
    ExitCode::from(err.failure_class().exit_code() as u8)
}
