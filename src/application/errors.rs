//! Application layer error types

use thiserror::Error;

/// Application layer errors
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Generation error: {0}")]
    GenerationError(#[from] crate::generation::GenerationError),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("Output error: {0}")]
    OutputError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ApplicationError {
    /// The document problem behind this error, if that is what it is
    pub fn as_spec_error(&self) -> Option<&crate::generation::SpecError> {
        match self {
            Self::GenerationError(e) => e.as_spec_error(),
            _ => None,
        }
    }
}

/// Validation errors for requests
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Package name cannot be empty")]
    EmptyPackageName,

    #[error("Invalid package name: {0}")]
    InvalidPackageName(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
