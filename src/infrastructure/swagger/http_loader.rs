//! HTTP-based Swagger loader

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::parser::{SwaggerParser, parse_content};
use crate::generation::{ApiDocument, GenerationError, SwaggerLoader};

/// Loads Swagger documents from HTTP/HTTPS URLs
#[derive(Debug, Clone)]
pub struct HttpSwaggerLoader {
    client: Client,
}

impl HttpSwaggerLoader {
    pub fn new() -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| GenerationError::LoadError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SwaggerLoader for HttpSwaggerLoader {
    async fn load(&self, source: &str) -> Result<ApiDocument, GenerationError> {
        if !is_url(source) {
            return Err(GenerationError::LoadError(format!(
                "HttpSwaggerLoader only handles HTTP(S) URLs, got: {source}"
            )));
        }

        let response = self.client.get(source).send().await.map_err(|e| {
            GenerationError::LoadError(format!("Failed to fetch Swagger document from {source}: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::LoadError(format!(
                "HTTP {status} when fetching {source}"
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let content = response.text().await.map_err(|e| {
            GenerationError::LoadError(format!("Failed to read response body: {e}"))
        })?;

        let value = parse_content(source, content_type.as_deref(), &content)?;
        SwaggerParser::new(value).parse()
    }
}

pub(crate) fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
