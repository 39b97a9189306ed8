use chrono::NaiveDate;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError, ValidationErrors};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const CONFIG_DIR: &str = "config";
const DEFAULT_DATABASE_URL: &str = "mysql://root@127.0.0.1:3306/typica_bd";
const DEFAULT_OUTPUT_PATH: &str = "storage/app/forecast.json";
const DEFAULT_HORIZON_DAYS: u32 = 7;
const DEFAULT_MIN_HISTORY_POINTS: usize = 2;
const DEFAULT_PAID_STATUS_CODE: i32 = 6;
const DEFAULT_TREND_WINDOW_DAYS: u32 = 30;
const DEFAULT_INSERT_BATCH_SIZE: usize = 1000;
const DEFAULT_STOCK_ALERT_DAYS: f64 = 7.0;
const DEFAULT_HOLIDAY_UPPER_WINDOW: i64 = 1;

/// Bolivian public holidays used for the overall demand series.
const DEFAULT_HOLIDAYS: [&str; 9] = [
    "2025-01-01", // Año nuevo
    "2025-02-20", // Carnaval
    "2025-02-21",
    "2025-04-18", // Viernes Santo
    "2025-05-01", // Día del Trabajador
    "2025-06-21", // Año Nuevo Aymara
    "2025-08-06", // Independencia
    "2025-11-02", // Todos los Santos
    "2025-12-25", // Navidad
];

/// Where combo definitions come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComboSource {
    /// `detallecombo` rows grouped by combo
    Database,
    /// The `static_combos` table in configuration
    Static,
}

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct AppConfig {
    /// Database connection URL
    #[validate(length(min = 1))]
    pub database_url: String,

    /// Application environment
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Forecast document destination, replaced on every run
    #[serde(default = "default_output_path")]
    #[validate(length(min = 1))]
    pub output_path: String,

    /// Number of future days forecast for every series
    #[serde(default = "default_horizon_days")]
    #[validate(range(min = 1, max = 365))]
    pub horizon_days: u32,

    /// Series shorter than this are skipped
    #[serde(default = "default_min_history_points")]
    #[validate(range(min = 2))]
    pub min_history_points: usize,

    /// `pedido.estado_actual` value of a completed (paid) order
    #[serde(default = "default_paid_status_code")]
    pub paid_status_code: i32,

    /// Length of each trend comparison window
    #[serde(default = "default_trend_window_days")]
    #[validate(range(min = 1, max = 365))]
    pub trend_window_days: u32,

    /// Write forecast rows back into the `prediccion` table
    #[serde(default)]
    pub persist_predictions: bool,

    /// Rows per insert batch on the prediction write path
    #[serde(default = "default_insert_batch_size")]
    #[validate(range(min = 1))]
    pub insert_batch_size: usize,

    #[serde(default = "default_combo_source")]
    pub combo_source: ComboSource,

    /// Combo key -> product ids, used when `combo_source = static`
    #[serde(default = "default_static_combos")]
    pub static_combos: BTreeMap<String, Vec<i32>>,

    /// Holiday dates (YYYY-MM-DD) applied to the overall series
    #[serde(default = "default_holidays")]
    #[validate(custom = "validate_holidays")]
    pub holidays: Vec<String>,

    /// Days after each holiday that share its effect
    #[serde(default = "default_holiday_upper_window")]
    #[validate(range(min = 0, max = 7))]
    pub holiday_upper_window: i64,

    /// Days-of-stock threshold below which a stock alert is raised
    #[serde(default = "default_stock_alert_days")]
    #[validate(range(min = 0.0))]
    pub stock_alert_days: f64,

    /// Whether to run database migrations before extracting
    #[serde(default)]
    pub auto_migrate: bool,

    /// DB pool: max connections
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// DB pool: min connections
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,

    /// DB timeouts (seconds)
    #[serde(default = "default_db_connect_timeout_secs")]
    pub db_connect_timeout_secs: u64,
    #[serde(default = "default_db_idle_timeout_secs")]
    pub db_idle_timeout_secs: u64,
    #[serde(default = "default_db_acquire_timeout_secs")]
    pub db_acquire_timeout_secs: u64,
}

impl AppConfig {
    /// Creates a configuration with defaults for everything but the database
    pub fn new(database_url: String, environment: String) -> Self {
        Self {
            database_url,
            environment,
            log_level: default_log_level(),
            log_json: false,
            output_path: default_output_path(),
            horizon_days: default_horizon_days(),
            min_history_points: default_min_history_points(),
            paid_status_code: default_paid_status_code(),
            trend_window_days: default_trend_window_days(),
            persist_predictions: false,
            insert_batch_size: default_insert_batch_size(),
            combo_source: default_combo_source(),
            static_combos: default_static_combos(),
            holidays: default_holidays(),
            holiday_upper_window: default_holiday_upper_window(),
            stock_alert_days: default_stock_alert_days(),
            auto_migrate: false,
            db_max_connections: default_db_max_connections(),
            db_min_connections: default_db_min_connections(),
            db_connect_timeout_secs: default_db_connect_timeout_secs(),
            db_idle_timeout_secs: default_db_idle_timeout_secs(),
            db_acquire_timeout_secs: default_db_acquire_timeout_secs(),
        }
    }

    /// Gets log level reference
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Parsed holiday calendar. Invalid entries are rejected by validation,
    /// so anything unparsable here is skipped.
    pub fn holiday_dates(&self) -> Vec<NaiveDate> {
        self.holidays
            .iter()
            .filter_map(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok())
            .collect()
    }

    /// Runs field validation plus the cross-field checks.
    pub fn check(&self) -> Result<(), AppConfigError> {
        self.validate()?;
        self.validate_additional_constraints()?;
        Ok(())
    }

    fn validate_additional_constraints(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.db_min_connections > self.db_max_connections {
            let mut err = ValidationError::new("db_min_connections");
            err.message = Some("db_min_connections must not exceed db_max_connections".into());
            errors.add("db_min_connections", err);
        }

        if self.combo_source == ComboSource::Static
            && self.static_combos.values().any(|ids| ids.is_empty())
        {
            let mut err = ValidationError::new("static_combos");
            err.message = Some("every static combo needs at least one product id".into());
            errors.add("static_combos", err);
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Default value functions
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}

fn default_horizon_days() -> u32 {
    DEFAULT_HORIZON_DAYS
}

fn default_min_history_points() -> usize {
    DEFAULT_MIN_HISTORY_POINTS
}

fn default_paid_status_code() -> i32 {
    DEFAULT_PAID_STATUS_CODE
}

fn default_trend_window_days() -> u32 {
    DEFAULT_TREND_WINDOW_DAYS
}

fn default_insert_batch_size() -> usize {
    DEFAULT_INSERT_BATCH_SIZE
}

fn default_combo_source() -> ComboSource {
    ComboSource::Database
}

fn default_static_combos() -> BTreeMap<String, Vec<i32>> {
    BTreeMap::from([
        ("combo_1".to_string(), vec![1, 4, 5]),
        ("combo_2".to_string(), vec![2, 68, 21]),
    ])
}

fn default_holidays() -> Vec<String> {
    DEFAULT_HOLIDAYS.iter().map(|d| d.to_string()).collect()
}

fn default_holiday_upper_window() -> i64 {
    DEFAULT_HOLIDAY_UPPER_WINDOW
}

fn default_stock_alert_days() -> f64 {
    DEFAULT_STOCK_ALERT_DAYS
}

fn default_db_max_connections() -> u32 {
    4
}
fn default_db_min_connections() -> u32 {
    1
}
fn default_db_connect_timeout_secs() -> u64 {
    30
}
fn default_db_idle_timeout_secs() -> u64 {
    600
}
fn default_db_acquire_timeout_secs() -> u64 {
    8
}

/// Validates log level values
fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if valid_levels.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        Err(err)
    }
}

fn validate_holidays(holidays: &Vec<String>) -> Result<(), ValidationError> {
    for raw in holidays {
        if NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").is_err() {
            let mut err = ValidationError::new("holidays");
            err.message = Some(format!("'{}' is not a YYYY-MM-DD date", raw).into());
            return Err(err);
        }
    }
    Ok(())
}

fn env_filter(level: &str) -> tracing_subscriber::EnvFilter {
    let default_directive = format!("demand_forecast={},sea_orm=warn,sqlx=warn", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);
    tracing_subscriber::EnvFilter::new(filter_directive)
}

/// Subscriber for the window before configuration is loaded. Install it with
/// `tracing::subscriber::with_default` around the load; `init_tracing` then
/// sets the global one from the loaded level.
pub fn bootstrap_subscriber() -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(DEFAULT_LOG_LEVEL))
        .finish()
}

/// Initializes tracing using the provided log level as the default filter
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::fmt;

    let filter = env_filter(level);
    if json {
        let _ = fmt().with_env_filter(filter).json().try_init();
    } else {
        let _ = fmt().with_env_filter(filter).try_init();
    }
}

/// Loads application configuration
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults
/// 2. Default config (config/default.toml)
/// 3. Environment-specific config (config/{env}.toml)
/// 4. Environment variables (APP__*)
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    load_config_for(&run_env)
}

/// Loads configuration for an explicit environment profile
pub fn load_config_for(run_env: &str) -> Result<AppConfig, AppConfigError> {
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let config = Config::builder()
        .set_default("database_url", DEFAULT_DATABASE_URL)?
        .set_default("environment", run_env)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("holidays"),
        )
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.check().map_err(|e| {
        error!("Configuration validation failed: {}", e);
        e
    })?;

    info!("Configuration loaded successfully");
    Ok(app_config)
}
