//! Use case for validating a document without writing anything

use std::sync::Arc;

use crate::application::{ApplicationError, ValidationError};
use crate::generation::{CheckReport, GenerationOrchestrator};

pub struct CheckUseCase {
    generation_orchestrator: Arc<GenerationOrchestrator>,
}

impl CheckUseCase {
    pub fn new(generation_orchestrator: Arc<GenerationOrchestrator>) -> Self {
        Self {
            generation_orchestrator,
        }
    }

    pub async fn execute(&self, spec_source: &str) -> Result<CheckReport, ApplicationError> {
        if spec_source.trim().is_empty() {
            return Err(ValidationError::MissingField("spec".to_string()).into());
        }
        let report = self.generation_orchestrator.check(spec_source).await?;
        tracing::info!(
            title = %report.title,
            operations = report.operations.len(),
            models = report.models,
            "Document is valid"
        );
        Ok(report)
    }
}
