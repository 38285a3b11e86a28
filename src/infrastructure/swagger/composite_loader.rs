//! Composite loader that picks a strategy by source

use async_trait::async_trait;

use super::http_loader::is_url;
use super::{FileSwaggerLoader, HttpSwaggerLoader};
use crate::generation::{ApiDocument, GenerationError, SwaggerLoader};

/// URLs go to the HTTP loader, everything else to the file loader
pub struct CompositeSwaggerLoader {
    http: Box<dyn SwaggerLoader>,
    file: Box<dyn SwaggerLoader>,
}

impl CompositeSwaggerLoader {
    pub fn new() -> Result<Self, GenerationError> {
        Ok(Self {
            http: Box::new(HttpSwaggerLoader::new()?),
            file: Box::new(FileSwaggerLoader::new()),
        })
    }
}

#[async_trait]
impl SwaggerLoader for CompositeSwaggerLoader {
    async fn load(&self, source: &str) -> Result<ApiDocument, GenerationError> {
        if is_url(source) {
            tracing::debug!(source, "CompositeSwaggerLoader: using HTTP loader");
            self.http.load(source).await
        } else {
            tracing::debug!(source, "CompositeSwaggerLoader: using file loader");
            self.file.load(source).await
        }
    }
}
