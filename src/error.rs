use thiserror::Error;

pub type Result<T> = std::result::Result<T, AqiError>;

#[derive(Error, Debug)]
pub enum AqiError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Cannot forecast from an empty series")]
    EmptySeries,

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
