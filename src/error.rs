// src/error.rs
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ForecastError>;

#[derive(Error, Debug)]
pub enum ForecastError {
    /// Dataset missing or malformed.
    #[error("Failed to load dataset: {0}")]
    Data(String),

    #[error("No data available for {0}")]
    NotFound(String),

    #[error("Insufficient data to train models for {0}")]
    InsufficientData(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Model file could not be read, written or decoded.
    #[error("Model store error: {0}")]
    Persistence(String),
}

impl ForecastError {
    pub fn kind(&self) -> &'static str {
        match self {
            ForecastError::Data(_) => "DataError",
            ForecastError::NotFound(_) => "NotFound",
            ForecastError::InsufficientData(_) => "InsufficientDataError",
            ForecastError::Configuration(_) => "ConfigurationError",
            ForecastError::Persistence(_) => "PersistenceError",
        }
    }
}

impl From<csv::Error> for ForecastError {
    fn from(e: csv::Error) -> Self {
        ForecastError::Data(e.to_string())
    }
}
