//! Generation orchestration - coordinates the generation workflow

use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::Arc;

use crate::generation::utils::is_valid_package_name;
use crate::generation::{
    ApiDocument, Artifact, CheckReport, CompiledOperation, Emitter, GenerationContext,
    GenerationError, GenerationRequest, GenerationResult, OperationCompiler, RenderContext,
    SpecWalker, SwaggerLoader, TypeMapper,
};

/// Orchestrates the code generation workflow
pub struct GenerationOrchestrator {
    loader: Arc<dyn SwaggerLoader>,
    emitters: Vec<Arc<dyn Emitter>>,
}

impl GenerationOrchestrator {
    pub fn new(loader: Arc<dyn SwaggerLoader>, emitters: Vec<Arc<dyn Emitter>>) -> Self {
        Self { loader, emitters }
    }

    /// Load, walk, compile and render
    ///
    /// Either every artifact renders or an error is returned; nothing here
    /// touches the filesystem.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        if !is_valid_package_name(&request.package) {
            return Err(GenerationError::InvalidConfiguration(format!(
                "'{}' is not a valid package name",
                request.package
            )));
        }

        let document = self.loader.load(&request.spec_source).await?;
        let operations = compile_document(&document)?;
        let operation_count = operations.len();
        tracing::debug!(
            title = %document.title,
            operations = operation_count,
            "Orchestrator compiled document"
        );

        let context = GenerationContext::new(request, &document, operations);
        let render_context = RenderContext::from_context(&context)?;

        let mut artifacts = Vec::new();
        for emitter in &self.emitters {
            let emitted = emitter.emit(&render_context).await?;
            tracing::debug!(emitter = emitter.name(), artifacts = emitted.len(), "Emitter finished");
            artifacts.extend(emitted);
        }
        artifacts.sort_by(|a, b| a.path.cmp(&b.path));

        let mut seen = HashSet::new();
        if let Some(duplicate) = artifacts.iter().find(|a| !seen.insert(a.path.clone())) {
            return Err(GenerationError::RenderError(format!(
                "more than one emitter produced {}",
                duplicate.path.display()
            )));
        }

        Ok(GenerationResult {
            fingerprint: fingerprint(&artifacts),
            artifacts,
            operations: operation_count,
        })
    }

    /// Load and compile without rendering
    pub async fn check(&self, source: &str) -> Result<CheckReport, GenerationError> {
        let document = self.loader.load(source).await?;
        let operations = compile_document(&document)?;
        Ok(CheckReport {
            title: document.title.clone(),
            operations: operations.into_iter().map(|op| op.id).collect(),
            models: document.definitions.len(),
        })
    }
}

fn compile_document(document: &ApiDocument) -> Result<Vec<CompiledOperation>, GenerationError> {
    let mapper = TypeMapper::new().with_known_models(document.definitions.clone());
    let descriptors = SpecWalker::new(mapper.clone()).walk(document)?;
    Ok(OperationCompiler::new(mapper).compile_all(&descriptors)?)
}

/// SHA-256 over every artifact path and content, hex encoded
pub fn fingerprint(artifacts: &[Artifact]) -> String {
    let mut hasher = Sha256::new();
    for artifact in artifacts {
        hasher.update(artifact.path.to_string_lossy().as_bytes());
        hasher.update([0]);
        hasher.update(artifact.content.as_bytes());
        hasher.update([0]);
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{
        ApiPath, ClientDefaults, HttpMethod, RawOperation, RawParameter, RawResponse, SpecError,
    };
    use async_trait::async_trait;
    use serde_json::json;

    struct StaticLoader(ApiDocument);

    #[async_trait]
    impl SwaggerLoader for StaticLoader {
        async fn load(&self, _source: &str) -> Result<ApiDocument, GenerationError> {
            Ok(self.0.clone())
        }
    }

    /// One file per operation, named after it
    struct ListingEmitter;

    #[async_trait]
    impl Emitter for ListingEmitter {
        fn name(&self) -> &'static str {
            "listing"
        }

        async fn emit(&self, context: &RenderContext) -> Result<Vec<Artifact>, GenerationError> {
            let operations = context.data["operations"].as_array().cloned().unwrap_or_default();
            Ok(operations
                .iter()
                .rev()
                .map(|op| {
                    let name = op["fn_name"].as_str().unwrap_or_default();
                    Artifact::new(format!("ops/{name}.txt"), op["path_template"].to_string())
                })
                .collect())
        }
    }

    fn document(responses: Vec<RawResponse>) -> ApiDocument {
        ApiDocument {
            title: "Items".to_string(),
            version: "1.0".to_string(),
            base_path: "/v1".to_string(),
            definitions: ["Item".to_string()].into(),
            paths: vec![
                ApiPath {
                    path: "/items/{id}".to_string(),
                    parameters: vec![RawParameter {
                        name: "id".to_string(),
                        location: "path".to_string(),
                        required: true,
                        description: None,
                        schema: json!({"name": "id", "in": "path", "type": "string"}),
                    }],
                    operations: vec![RawOperation {
                        method: HttpMethod::Get,
                        operation_id: Some("getItem".to_string()),
                        summary: None,
                        description: None,
                        parameters: vec![],
                        responses,
                    }],
                },
                ApiPath {
                    path: "/items".to_string(),
                    parameters: vec![],
                    operations: vec![RawOperation {
                        method: HttpMethod::Get,
                        operation_id: Some("listItems".to_string()),
                        summary: None,
                        description: None,
                        parameters: vec![],
                        responses: vec![],
                    }],
                },
            ],
            ..Default::default()
        }
    }

    fn ok_response() -> RawResponse {
        RawResponse {
            key: "200".to_string(),
            description: None,
            schema: Some(json!({"$ref": "#/definitions/Item"})),
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            spec_source: "items.json".to_string(),
            package: "items-client".to_string(),
            service_name: None,
            client: ClientDefaults::default(),
        }
    }

    fn orchestrator(document: ApiDocument) -> GenerationOrchestrator {
        GenerationOrchestrator::new(Arc::new(StaticLoader(document)), vec![Arc::new(ListingEmitter)])
    }

    #[tokio::test]
    async fn test_generate_sorts_artifacts_and_is_deterministic() {
        let orchestrator = orchestrator(document(vec![ok_response()]));
        let first = orchestrator.generate(&request()).await.unwrap();
        let second = orchestrator.generate(&request()).await.unwrap();

        assert_eq!(first.operations, 2);
        let paths: Vec<_> = first.artifacts.iter().map(|a| a.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                std::path::PathBuf::from("ops/get_item.txt"),
                std::path::PathBuf::from("ops/list_items.txt"),
            ]
        );
        assert_eq!(first.artifacts, second.artifacts);
        assert_eq!(first.fingerprint, second.fingerprint);
        assert_eq!(first.fingerprint.len(), 64);
    }

    #[tokio::test]
    async fn test_generate_fails_on_redefined_bad_request() {
        let bad = RawResponse {
            key: "400".to_string(),
            description: None,
            schema: Some(json!({"$ref": "#/definitions/Item"})),
        };
        let err = orchestrator(document(vec![ok_response(), bad]))
            .generate(&request())
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_spec_error(),
            Some(SpecError::DuplicateDefaultResponseDefinition { status: 400, .. })
        ));
    }

    #[tokio::test]
    async fn test_generate_rejects_bad_package_name() {
        let mut request = request();
        request.package = "9 lives".to_string();
        let err = orchestrator(document(vec![]))
            .generate(&request)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::InvalidConfiguration(_)));
    }

    #[tokio::test]
    async fn test_check_reports_operations() {
        let report = orchestrator(document(vec![ok_response()]))
            .check("items.json")
            .await
            .unwrap();
        assert_eq!(report.title, "Items");
        assert_eq!(report.operations, vec!["listItems", "getItem"]);
        assert_eq!(report.models, 1);
    }

    #[test]
    fn test_fingerprint_depends_on_paths_and_content() {
        let a = vec![Artifact::new("a.rs", "x")];
        let b = vec![Artifact::new("b.rs", "x")];
        let c = vec![Artifact::new("a.rs", "y")];
        assert_ne!(fingerprint(&a), fingerprint(&b));
        assert_ne!(fingerprint(&a), fingerprint(&c));
        assert_eq!(fingerprint(&a), fingerprint(&a.clone()));
    }
}
