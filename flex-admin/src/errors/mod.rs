//! Error types for the flex admin tool.

use thiserror::Error;

use flex_repository::FlexError;

/// Errors that can occur while running an admin command.
#[derive(Error, Debug)]
pub enum AdminError {
    /// Configuration or connection setup error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid command input, such as a malformed JSON body.
    #[error("Invalid input: {0}")]
    InputError(String),

    /// Failed to read an input file.
    #[error("I/O error: {0}")]
    IoError(String),

    /// The search operation failed.
    #[error("Flex error: {0}")]
    FlexError(#[from] FlexError),
}

impl AdminError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create an input error.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::InputError(msg.into())
    }
}

impl From<std::io::Error> for AdminError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}
