//! Error types for the generation domain

use thiserror::Error;

/// A Swagger document the generator cannot turn into code
///
/// Every variant is fatal: generation stops and nothing is written.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpecError {
    #[error("{operation}: parameter '{parameter}' uses unsupported location '{location}'")]
    UnsupportedParameterLocation {
        operation: String,
        parameter: String,
        location: String,
    },

    #[error("{context}: unsupported schema shape: {reason}")]
    UnsupportedSchemaShape { context: String, reason: String },

    #[error(
        "{operation}: status {status} is reserved for the shared {shared_type} response and cannot be redefined"
    )]
    DuplicateDefaultResponseDefinition {
        operation: String,
        status: u16,
        shared_type: &'static str,
    },

    #[error("{operation}: response key '{status}' is not 'default' or a status code in [200, 599]")]
    OutOfRangeStatusCode { operation: String, status: String },

    #[error("{operation}: parameter '{parameter}' is declared more than once")]
    DuplicateParameter {
        operation: String,
        parameter: String,
    },

    #[error("{operation}: path parameter '{parameter}' {reason}")]
    PathParameterMismatch {
        operation: String,
        parameter: String,
        reason: String,
    },

    #[error("{operation}: parameter '{parameter}' has an invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        operation: String,
        parameter: String,
        pattern: String,
        reason: String,
    },

    #[error("{context}: unresolved reference '{reference}'")]
    UnresolvedReference { context: String, reference: String },

    #[error("operation name '{name}' is generated by more than one operation")]
    DuplicateOperation { name: String },

    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

impl SpecError {
    pub fn unsupported_shape(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedSchemaShape {
            context: context.into(),
            reason: reason.into(),
        }
    }

    pub fn unresolved(context: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            context: context.into(),
            reference: reference.into(),
        }
    }

    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument(message.into())
    }
}

/// Errors that can occur during code generation
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error("Swagger loading error: {0}")]
    LoadError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl GenerationError {
    /// The underlying document problem, if that is what failed
    pub fn as_spec_error(&self) -> Option<&SpecError> {
        match self {
            GenerationError::Spec(e) => Some(e),
            _ => None,
        }
    }
}
