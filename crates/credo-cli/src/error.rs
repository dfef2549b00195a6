//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Engine configuration could not be loaded
    #[error(transparent)]
    EngineConfig(#[from] credo_engine::ConfigError),

    /// Engine error
    #[error("Engine error: {0}")]
    Engine(#[from] credo_engine::EngineError),

    /// Graph rejected the input
    #[error("Invalid graph input: {0}")]
    Graph(#[from] credo_graph::GraphError),

    /// Ledger error
    #[error("Ledger error: {0}")]
    Store(#[from] credo_store::StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
