use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Expected element not found: {selector}")]
    Extraction { selector: String },

    #[error("Invalid date format: {0} (expected YYYY-MM-DD)")]
    InvalidDateFormat(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Dataset contains no measurements")]
    EmptyDataset,

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Template rendering failed: {0}")]
    Template(#[from] askama::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Database {
            message: err.to_string(),
        }
    }
}

impl AppError {
    pub fn missing(selector: &str) -> Self {
        AppError::Extraction {
            selector: selector.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
