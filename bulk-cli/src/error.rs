//! Error handling for the CLI application

use std::fmt;

/// Custom error type for CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// Group size argument missing
    MissingGroupSize,
    /// Group size argument is not a canonical positive integer
    InvalidGroupSize(String),
    /// Configuration error
    ConfigError(String),
    /// Input file not found or unreadable
    InputError(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::MissingGroupSize => write!(f, "The parameter is missing"),
            CliError::InvalidGroupSize(value) => write!(f, "Incorrect parameter: {value}"),
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            CliError::InputError(msg) => write!(f, "Input error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;
