//! Emitters: which templates render to which package files

use async_trait::async_trait;
use std::sync::Arc;

use super::renderer::TeraRenderer;
use crate::generation::{Artifact, Emitter, GenerationError, RenderContext};

/// `(template, output path)` pairs
type FileMap = &'static [(&'static str, &'static str)];

const PACKAGE_FILES: FileMap = &[
    ("rust/Cargo.toml.tera", "Cargo.toml"),
    ("rust/lib.rs.tera", "src/lib.rs"),
    ("rust/inputs.rs.tera", "src/inputs.rs"),
    ("rust/outputs.rs.tera", "src/outputs.rs"),
];

const CLIENT_FILES: FileMap = &[("rust/client.rs.tera", "src/client.rs")];

const SERVER_FILES: FileMap = &[
    ("rust/controller.rs.tera", "src/controller.rs"),
    ("rust/server.rs.tera", "src/server.rs"),
    ("rust/mock.rs.tera", "src/mock.rs"),
];

/// Renders a fixed set of templates into package files
pub struct TemplateEmitter {
    name: &'static str,
    files: FileMap,
    renderer: Arc<TeraRenderer>,
}

impl TemplateEmitter {
    /// Manifest, crate root, inputs and outputs
    pub fn package(renderer: Arc<TeraRenderer>) -> Self {
        Self {
            name: "package",
            files: PACKAGE_FILES,
            renderer,
        }
    }

    /// The client constructor and one method per operation
    pub fn client(renderer: Arc<TeraRenderer>) -> Self {
        Self {
            name: "client",
            files: CLIENT_FILES,
            renderer,
        }
    }

    /// Controller capability set, routing table and mock controller
    pub fn server(renderer: Arc<TeraRenderer>) -> Self {
        Self {
            name: "server",
            files: SERVER_FILES,
            renderer,
        }
    }
}

#[async_trait]
impl Emitter for TemplateEmitter {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn emit(&self, context: &RenderContext) -> Result<Vec<Artifact>, GenerationError> {
        self.files
            .iter()
            .map(|(template, path)| {
                let content = self.renderer.render(template, context)?;
                tracing::debug!(emitter = self.name, path, bytes = content.len(), "Rendered artifact");
                Ok(Artifact::new(*path, content))
            })
            .collect()
    }
}

/// Every emitter needed for a complete package
pub fn rust_emitters(renderer: Arc<TeraRenderer>) -> Vec<Arc<dyn Emitter>> {
    vec![
        Arc::new(TemplateEmitter::package(Arc::clone(&renderer))),
        Arc::new(TemplateEmitter::client(Arc::clone(&renderer))),
        Arc::new(TemplateEmitter::server(renderer)),
    ]
}
