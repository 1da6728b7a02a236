use thiserror::Error;

/// Whole-file import failures. Individual bad rows are skipped and counted,
/// never reported here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("CSV has no data rows")]
    EmptyInput,

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("CSV contained no valid rows")]
    NoValidRows,
}

#[derive(Error, Debug)]
pub enum WeekError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("GitHub API error: {message}")]
    GitHub { message: String },

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),
}

pub type Result<T> = std::result::Result<T, WeekError>;
