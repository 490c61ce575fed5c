//! Error types shared by the content, feed and server layers

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SiteError>;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("{0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SiteError {
    pub fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        SiteError::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
