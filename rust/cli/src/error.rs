//! Error types for the CLI application.

use std::fmt;

use arcade_floor::FloorError;

use crate::config::ConfigError;

/// Everything a command can fail with. Each variant maps to exit code 2.
#[derive(Debug)]
pub enum CliError {
    /// I/O error (stdout/stderr writes, data directory access)
    Io(std::io::Error),

    /// Invalid user input or command-line arguments
    InvalidInput(String),

    /// Configuration error
    Config(String),

    /// A request the floor refused
    Floor(FloorError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Floor(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            CliError::Floor(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::Io(error)
    }
}

impl From<FloorError> for CliError {
    fn from(error: FloorError) -> Self {
        CliError::Floor(error)
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        CliError::Config(error.to_string())
    }
}

impl From<&str> for CliError {
    fn from(error: &str) -> Self {
        CliError::InvalidInput(error.to_string())
    }
}
