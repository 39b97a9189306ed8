//! Demand forecasting batch job
//!
//! Reads paid order history from the café database, forecasts short-horizon
//! demand overall, per product and per combo, derives restock analytics and
//! writes the result as JSON (optionally also into `prediccion`).
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod analytics;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod forecasting;
pub mod migrator;
pub mod pipeline;
pub mod report;
pub mod repositories;
pub mod services;

pub use errors::{AppError, FailureClass, ServiceError};
pub use pipeline::{run_with_config, ForecastPipeline, PipelineOptions, PipelineOutcome};
