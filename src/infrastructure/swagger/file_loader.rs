//! File-based Swagger loader
//!
//! This loader handles only file I/O. Parsing is done by the SwaggerParser.

use async_trait::async_trait;
use tokio::fs;

use super::parser::{SwaggerParser, parse_content};
use crate::generation::{ApiDocument, GenerationError, SwaggerLoader};

/// Loads Swagger documents from local files
#[derive(Debug, Clone, Default)]
pub struct FileSwaggerLoader;

impl FileSwaggerLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SwaggerLoader for FileSwaggerLoader {
    async fn load(&self, source: &str) -> Result<ApiDocument, GenerationError> {
        let content = fs::read_to_string(source).await.map_err(|e| {
            GenerationError::LoadError(format!("Failed to read {source}: {e}"))
        })?;

        let value = parse_content(source, None, &content)?;
        SwaggerParser::new(value).parse()
    }
}
