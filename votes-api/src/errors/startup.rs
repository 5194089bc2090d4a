use thiserror::Error;
use votes_repository::RepositoryError;

/// Errors that can occur while wiring up or running the server.
#[derive(Error, Debug)]
pub enum StartupError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

impl StartupError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
