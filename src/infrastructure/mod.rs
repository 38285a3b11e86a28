//! Infrastructure layer - concrete implementations of domain ports

pub mod emit;
pub mod output;
pub mod swagger;

use std::sync::Arc;

use crate::generation::{GenerationError, GenerationOrchestrator};

pub use emit::{TemplateEmitter, TeraRenderer, rust_emitters};
pub use output::FileSystemOutputService;
pub use swagger::{CompositeSwaggerLoader, FileSwaggerLoader, HttpSwaggerLoader};

/// Orchestrator reading files or URLs and rendering the embedded templates
pub fn default_orchestrator() -> Result<GenerationOrchestrator, GenerationError> {
    let loader = CompositeSwaggerLoader::new()?;
    let renderer = Arc::new(TeraRenderer::embedded()?);
    Ok(GenerationOrchestrator::new(
        Arc::new(loader),
        rust_emitters(renderer),
    ))
}
