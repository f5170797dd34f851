//! Error types for knowledge-base construction and caching.

use thiserror::Error;

/// Top-level error for api-knowledge operations.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// Filesystem errors on the cache directory.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Knowledge-base JSON (de)serialization errors.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The specification document is not valid YAML.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yml::Error),

    /// Download failed (transport, timeout or non-2xx status).
    #[error("download error: {0}")]
    Download(#[from] reqwest::Error),

    /// Invalid configuration value.
    #[error("config error: {0}")]
    Config(String),
}

pub type KnowledgeResult<T> = Result<T, KnowledgeError>;
