use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShelfwatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid rule '{key}': {message}")]
    InvalidRule { key: String, message: String },

    #[error("TOML error: {0}")]
    Toml(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ShelfwatchError>;
