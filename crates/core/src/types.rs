use thiserror::Error;

/// The main error type for dotsmith operations
#[derive(Debug, Error)]
pub enum DotsmithError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Task error: {0}")]
    Task(String),

    #[error("Backup error: {0}")]
    Backup(String),

    #[error("Download error: {0}")]
    Download(String),

    #[error("Path error: {0}")]
    Path(String),
}

/// Result type alias for dotsmith operations
pub type DotsmithResult<T> = Result<T, DotsmithError>;
