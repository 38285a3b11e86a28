//! Port interfaces for the generation domain

use crate::generation::{ApiDocument, Artifact, GenerationError, RenderContext};
use async_trait::async_trait;

/// Loads Swagger 2.0 documents
#[async_trait]
pub trait SwaggerLoader: Send + Sync {
    /// Load a document from a file path or URL
    async fn load(&self, source: &str) -> Result<ApiDocument, GenerationError>;
}

/// Renders one part of the generated package
#[async_trait]
pub trait Emitter: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    async fn emit(&self, context: &RenderContext) -> Result<Vec<Artifact>, GenerationError>;
}
