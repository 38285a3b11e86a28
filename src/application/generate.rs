//! Use case for generating a client/server package

use std::sync::Arc;

use crate::application::{ApplicationError, GenerateRequest, GenerateResponse, OutputService};
use crate::generation::GenerationOrchestrator;

/// Use case for generating a package into an output directory
pub struct GenerateUseCase {
    generation_orchestrator: Arc<GenerationOrchestrator>,
    output_service: Arc<dyn OutputService>,
}

impl GenerateUseCase {
    pub fn new(
        generation_orchestrator: Arc<GenerationOrchestrator>,
        output_service: Arc<dyn OutputService>,
    ) -> Self {
        Self {
            generation_orchestrator,
            output_service,
        }
    }

    /// Nothing is written unless the whole package rendered
    pub async fn execute(
        &self,
        request: GenerateRequest,
    ) -> Result<GenerateResponse, ApplicationError> {
        request.validate()?;

        let result = self
            .generation_orchestrator
            .generate(&request.generation_request())
            .await?;

        self.output_service
            .ensure_directory(&request.output_dir)
            .await?;

        let mut output_artifacts = result.artifacts;
        for artifact in &mut output_artifacts {
            artifact.path = request.output_dir.join(&artifact.path);
        }
        let artifacts_count = output_artifacts.len();

        let written = self
            .output_service
            .write_artifacts(&output_artifacts)
            .await?;

        tracing::info!(
            package = %request.package,
            operations = result.operations,
            artifacts = artifacts_count,
            written,
            "Generated package"
        );

        Ok(GenerateResponse {
            artifacts_count,
            written,
            operations: result.operations,
            output_path: request.output_dir,
            fingerprint: result.fingerprint,
        })
    }
}
