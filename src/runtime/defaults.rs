//! The two response types every operation shares for 400 and 500

use serde::{Deserialize, Serialize};

/// Message carried by the catch-all for undeclared status codes
pub const UNKNOWN_RESPONSE: &str = "Unknown response";

/// Shared body for `400 Bad Request`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadRequest {
    #[serde(default)]
    pub message: String,
}

impl BadRequest {
    pub const STATUS: u16 = 400;

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        Self::STATUS
    }
}

impl std::fmt::Display for BadRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bad request: {}", self.message)
    }
}

impl std::error::Error for BadRequest {}

/// Shared body for `500 Internal Server Error`
///
/// Also produced locally when a response body cannot be decoded or the
/// status code is not declared for the operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalError {
    #[serde(default)]
    pub message: String,
}

impl InternalError {
    pub const STATUS: u16 = 500;

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn unknown_response() -> Self {
        Self::new(UNKNOWN_RESPONSE)
    }

    pub fn is_unknown_response(&self) -> bool {
        self.message == UNKNOWN_RESPONSE
    }

    pub fn status_code(&self) -> u16 {
        Self::STATUS
    }
}

impl std::fmt::Display for InternalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "internal error: {}", self.message)
    }
}

impl std::error::Error for InternalError {}
