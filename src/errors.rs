use sea_orm::error::DbErr;
use serde::Serialize;

use crate::forecasting::ForecastError;

/// Broad failure categories reported by the batch run.
///
/// Connectivity failures mean the database could not be reached at all;
/// everything else (bad data, I/O, serialization, config) is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    Connectivity,
    Other,
}

impl FailureClass {
    /// Process exit status used by the binary for this class.
    pub fn exit_code(self) -> i32 {
        match self {
            FailureClass::Connectivity => 2,
            FailureClass::Other => 1,
        }
    }
}

#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(
        #[from]
        #[serde(skip)]
        DbErr,
    ),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Forecast error: {0}")]
    ForecastError(
        #[from]
        #[serde(skip)]
        ForecastError,
    ),

    #[error("Insufficient data for {entity}: {points} point(s)")]
    InsufficientData { entity: String, points: usize },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::IoError(err.to_string())
    }
}

impl From<crate::config::AppConfigError> for ServiceError {
    fn from(err: crate::config::AppConfigError) -> Self {
        ServiceError::ConfigError(err.to_string())
    }
}

impl ServiceError {
    /// Wraps a transaction or statement failure.
    pub fn db_error(error: DbErr) -> Self {
        ServiceError::DatabaseError(error)
    }

    /// Classifies the error for top-level reporting and the exit status.
    pub fn failure_class(&self) -> FailureClass {
        match self {
            Self::ConnectionError(_) => FailureClass::Connectivity,
            Self::DatabaseError(DbErr::Conn(_)) | Self::DatabaseError(DbErr::ConnectionAcquire(_)) => {
                FailureClass::Connectivity
            }
            _ => FailureClass::Other,
        }
    }
}

pub type AppError = ServiceError;
