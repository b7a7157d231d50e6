use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("CSV writing failed: {0}")]
    CsvError(#[from] csv::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Responder '{name}' failed: {message}")]
    ResponderError { name: String, message: String },
}

pub type Result<T> = std::result::Result<T, EvalError>;
