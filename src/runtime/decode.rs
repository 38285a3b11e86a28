//! Server-side request decoding for generated handlers
//!
//! Handlers collect the raw request into [`RequestParts`] and pull typed
//! parameters out of it. Framework types stay in the generated code.

use std::collections::HashMap;
use std::str::FromStr;

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Why a request could not be turned into an operation input
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("missing required {location} parameter '{name}'")]
    Missing { location: &'static str, name: String },

    #[error("invalid {location} parameter '{name}': {reason}")]
    Invalid {
        location: &'static str,
        name: String,
        reason: String,
    },

    #[error("invalid request body: {0}")]
    Body(#[from] serde_json::Error),
}

/// Raw pieces of an incoming request
#[derive(Debug, Clone, Default)]
pub struct RequestParts {
    path: HashMap<String, String>,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl RequestParts {
    pub fn new(
        path: HashMap<String, String>,
        raw_query: Option<&str>,
        headers: HeaderMap,
        body: Vec<u8>,
    ) -> Self {
        let query = raw_query
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();
        Self {
            path,
            query,
            headers,
            body,
        }
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn path_param<T: FromStr>(&self, name: &str) -> Result<T, DecodeError>
    where
        T::Err: std::fmt::Display,
    {
        let raw = self.path.get(name).ok_or_else(|| DecodeError::Missing {
            location: "path",
            name: name.to_string(),
        })?;
        parse("path", name, raw)
    }

    pub fn query<T: FromStr>(&self, name: &str) -> Result<Option<T>, DecodeError>
    where
        T::Err: std::fmt::Display,
    {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, raw)| parse("query", name, raw))
            .transpose()
    }

    pub fn query_required<T: FromStr>(&self, name: &str) -> Result<T, DecodeError>
    where
        T::Err: std::fmt::Display,
    {
        self.query(name)?.ok_or_else(|| DecodeError::Missing {
            location: "query",
            name: name.to_string(),
        })
    }

    /// Every value of a repeated query key, in request order
    pub fn query_all<T: FromStr>(&self, name: &str) -> Result<Vec<T>, DecodeError>
    where
        T::Err: std::fmt::Display,
    {
        self.query
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, raw)| parse("query", name, raw))
            .collect()
    }

    pub fn header<T: FromStr>(&self, name: &str) -> Result<Option<T>, DecodeError>
    where
        T::Err: std::fmt::Display,
    {
        match self.headers.get(name) {
            None => Ok(None),
            Some(value) => {
                let raw = value.to_str().map_err(|e| DecodeError::Invalid {
                    location: "header",
                    name: name.to_string(),
                    reason: e.to_string(),
                })?;
                parse("header", name, raw).map(Some)
            }
        }
    }

    pub fn header_required<T: FromStr>(&self, name: &str) -> Result<T, DecodeError>
    where
        T::Err: std::fmt::Display,
    {
        self.header(name)?.ok_or_else(|| DecodeError::Missing {
            location: "header",
            name: name.to_string(),
        })
    }

    /// JSON body
    pub fn body<T: DeserializeOwned>(&self) -> Result<T, DecodeError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

fn parse<T: FromStr>(location: &'static str, name: &str, raw: &str) -> Result<T, DecodeError>
where
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| DecodeError::Invalid {
        location,
        name: name.to_string(),
        reason: e.to_string(),
    })
}
