//! CLI error types.

use standfirst::config::ConfigError;
use standfirst::logging::LoggingError;
use thiserror::Error;

/// Errors that end a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid argument or configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Config file could not be read, written or validated.
    #[error(transparent)]
    ConfigFile(#[from] ConfigError),

    #[error("Failed to start logging: {0}")]
    Logging(#[from] LoggingError),

    /// Terminal setup, drawing or restore failed.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("Failed to install Ctrl+C handler: {0}")]
    Signal(#[from] ctrlc::Error),
}
