//! Operation outputs, errors and response dispatchers for Items
//!
//! Generated by swaggen 0.1.0. Do not edit.

#![allow(unused_imports)]

use swaggen::runtime::{self, BadRequest, InternalError};

/// Successful responses of `getItem`
#[derive(Debug, Clone, PartialEq)]
pub enum GetItemOutput {
    /// 200 OK
    Ok(crate::models::Item),
}

impl GetItemOutput {
    pub fn status(&self) -> u16 {
        match self {
            Self::Ok(_) => 200,
        }
    }

    /// Response body as JSON, if the status declares one
    pub fn data(&self) -> Option<serde_json::Value> {
        match self {
            Self::Ok(data) => serde_json::to_value(data).ok(),
        }
    }
}

/// Error responses of `getItem`
#[derive(Debug, Clone, PartialEq)]
pub enum GetItemError {
    /// 404 Not Found
    NotFound,
    /// 400 Bad Request
    BadRequest(BadRequest),
    /// 500 Internal Server Error, or a response that could not be interpreted
    InternalError(InternalError),
}

impl GetItemError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::BadRequest(_) => BadRequest::STATUS,
            Self::InternalError(_) => InternalError::STATUS,
        }
    }

    /// Response body as JSON, if the status declares one
    pub fn data(&self) -> Option<serde_json::Value> {
        match self {
            Self::NotFound => None,
            Self::BadRequest(data) => serde_json::to_value(data).ok(),
            Self::InternalError(data) => serde_json::to_value(data).ok(),
        }
    }
}

impl std::fmt::Display for GetItemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => f.write_str("404 Not Found"),
            Self::BadRequest(error) => std::fmt::Display::fmt(error, f),
            Self::InternalError(error) => std::fmt::Display::fmt(error, f),
        }
    }
}

impl std::error::Error for GetItemError {}

/// Decode a `getItem` response by status code
pub fn dispatch_get_item(
    status: u16,
    body: &[u8],
) -> Result<GetItemOutput, GetItemError> {
    match status {
        200 => runtime::dispatch::success(body, GetItemOutput::Ok).map_err(GetItemError::InternalError),
        404 => Err(GetItemError::NotFound),
        400 => Err(runtime::dispatch::error(body, GetItemError::BadRequest, GetItemError::InternalError)),
        500 => Err(runtime::dispatch::error(body, GetItemError::InternalError, GetItemError::InternalError)),
        _ => Err(GetItemError::InternalError(InternalError::unknown_response())),
    }
}
