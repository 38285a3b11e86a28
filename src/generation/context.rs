//! Generation context - everything the templates see

use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

use crate::generation::sanitizers::sanitize_doc_lines;
use crate::generation::{
    ApiDocument, ClientDefaults, CompiledOperation, GenerationError, GenerationRequest,
};

/// Operations sharing one route path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteGroup {
    /// Base path joined with the path template
    pub path: String,
    /// `axum::routing::get(handle_get_item::<C>).put(handle_update_item::<C>)`
    pub method_chain: String,
}

/// The serializable aggregate the emitters render from
#[derive(Debug, Clone, Serialize)]
pub struct GenerationContext {
    pub package: String,
    /// The package name as a Rust identifier
    pub crate_ident: String,
    pub service_name: String,
    pub title: String,
    pub api_version: String,
    pub description: Vec<String>,
    pub base_path: String,
    pub generator_version: String,
    pub client: ClientDefaults,
    /// Expression building the client's default retry policy
    pub retry_policy: String,
    pub operations: Vec<CompiledOperation>,
    pub routes: Vec<RouteGroup>,
}

impl GenerationContext {
    pub fn new(
        request: &GenerationRequest,
        document: &ApiDocument,
        operations: Vec<CompiledOperation>,
    ) -> Self {
        let routes = route_groups(&document.base_path, &operations);
        Self {
            package: request.package.clone(),
            crate_ident: request.package.replace('-', "_"),
            service_name: request
                .service_name
                .clone()
                .unwrap_or_else(|| request.package.clone()),
            title: document.title.clone(),
            api_version: document.version.clone(),
            description: document
                .description
                .as_deref()
                .map(sanitize_doc_lines)
                .unwrap_or_default(),
            base_path: document.base_path.clone(),
            generator_version: crate::runtime::GENERATOR_VERSION.to_string(),
            client: request.client.clone(),
            retry_policy: retry_policy_expr(request.client.retries),
            operations,
            routes,
        }
    }
}

/// `retries` extra attempts after the first
fn retry_policy_expr(retries: u32) -> String {
    match retries {
        0 => "runtime::NoRetryPolicy".to_string(),
        1 => "runtime::SingleRetryPolicy::default()".to_string(),
        n => format!("runtime::BoundedRetryPolicy::new({})", n.saturating_add(1)),
    }
}

fn route_groups(base_path: &str, operations: &[CompiledOperation]) -> Vec<RouteGroup> {
    let mut groups: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for op in operations {
        groups
            .entry(op.path_template.as_str())
            .or_default()
            .push(format!("{}(handle_{}::<C>)", op.method_fn, op.fn_name));
    }
    groups
        .into_iter()
        .map(|(path, handlers)| RouteGroup {
            path: format!("{base_path}{path}"),
            method_chain: format!("axum::routing::{}", handlers.join(".")),
        })
        .collect()
}

/// Render context used for template rendering
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub data: JsonValue,
}

impl RenderContext {
    pub fn new() -> Self {
        Self {
            data: JsonValue::Object(serde_json::Map::new()),
        }
    }

    /// Serialize a generation context as the template data
    pub fn from_context(context: &GenerationContext) -> Result<Self, GenerationError> {
        Ok(Self {
            data: serde_json::to_value(context)?,
        })
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}
