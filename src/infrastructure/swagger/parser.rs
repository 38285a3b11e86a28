//! Swagger 2.0 document parser
//!
//! Works directly on the `serde_json::Value` tree. Local references to
//! `#/parameters/...` and `#/responses/...` are resolved here; references to
//! `#/definitions/...` are left for the type mapper, which only needs the
//! model name.

use serde_json::{Map, Value as JsonValue};

use crate::generation::{
    ApiDocument, ApiPath, GenerationError, HttpMethod, RawOperation, RawParameter, RawResponse,
    SpecError,
};

const PARAMETERS_PREFIX: &str = "#/parameters/";
const RESPONSES_PREFIX: &str = "#/responses/";

/// Parse document text as JSON or YAML
///
/// The content type or file extension picks the format; otherwise JSON is
/// tried first, then YAML.
pub fn parse_content(
    source: &str,
    content_type: Option<&str>,
    content: &str,
) -> Result<JsonValue, GenerationError> {
    let content_type = content_type.unwrap_or_default();
    if content_type.contains("json") || source.ends_with(".json") {
        serde_json::from_str(content).map_err(GenerationError::SerializationError)
    } else if content_type.contains("yaml") || source.ends_with(".yaml") || source.ends_with(".yml") {
        serde_yaml::from_str(content)
            .map_err(|e| GenerationError::LoadError(format!("Failed to parse YAML: {e}")))
    } else {
        serde_json::from_str(content)
            .or_else(|_| serde_yaml::from_str(content))
            .map_err(|e| GenerationError::LoadError(format!("Failed to parse Swagger document: {e}")))
    }
}

/// Parser over one raw document
pub struct SwaggerParser {
    json: JsonValue,
}

impl SwaggerParser {
    pub fn new(json: JsonValue) -> Self {
        Self { json }
    }

    pub fn parse(&self) -> Result<ApiDocument, GenerationError> {
        self.check_version()?;

        let info = self
            .json
            .get("info")
            .and_then(JsonValue::as_object)
            .ok_or_else(|| invalid("missing info object"))?;
        let title = text(info.get("title")).ok_or_else(|| invalid("missing info.title"))?;
        let version = text(info.get("version")).ok_or_else(|| invalid("missing info.version"))?;

        let definitions = self
            .json
            .get("definitions")
            .and_then(JsonValue::as_object)
            .map(|defs| defs.keys().cloned().collect())
            .unwrap_or_default();

        Ok(ApiDocument {
            title,
            version,
            description: text(info.get("description")),
            base_path: normalize_base_path(
                self.json.get("basePath").and_then(JsonValue::as_str).unwrap_or_default(),
            ),
            paths: self.paths()?,
            definitions,
        })
    }

    fn check_version(&self) -> Result<(), GenerationError> {
        if self.json.get("openapi").is_some() {
            return Err(invalid("OpenAPI 3 documents are not supported; expected swagger: \"2.0\""));
        }
        match self.json.get("swagger").and_then(JsonValue::as_str) {
            Some("2.0") => Ok(()),
            Some(other) => Err(invalid(format!("unsupported swagger version '{other}'"))),
            None => Err(invalid("missing swagger version")),
        }
    }

    fn paths(&self) -> Result<Vec<ApiPath>, GenerationError> {
        let Some(paths) = self.json.get("paths") else {
            return Err(invalid("missing paths object"));
        };
        let paths = paths
            .as_object()
            .ok_or_else(|| invalid("paths must be an object"))?;

        let mut result = Vec::with_capacity(paths.len());
        for (path, item) in paths {
            if path.starts_with("x-") {
                continue;
            }
            if !path.starts_with('/') {
                return Err(invalid(format!("path '{path}' must start with '/'")));
            }
            let item = item
                .as_object()
                .ok_or_else(|| invalid(format!("path item '{path}' must be an object")))?;
            if item.contains_key("$ref") {
                return Err(SpecError::unresolved(
                    format!("path '{path}'"),
                    text(item.get("$ref")).unwrap_or_default(),
                )
                .into());
            }
            result.push(self.path_item(path, item)?);
        }
        Ok(result)
    }

    fn path_item(&self, path: &str, item: &Map<String, JsonValue>) -> Result<ApiPath, GenerationError> {
        let context = format!("path '{path}'");
        let parameters = self.parameters(&context, item.get("parameters"))?;

        let mut operations = Vec::new();
        for (key, value) in item {
            let Some(method) = HttpMethod::from_key(key) else {
                continue;
            };
            operations.push(self.operation(path, method, value)?);
        }

        Ok(ApiPath {
            path: path.to_string(),
            parameters,
            operations,
        })
    }

    fn operation(
        &self,
        path: &str,
        method: HttpMethod,
        value: &JsonValue,
    ) -> Result<RawOperation, GenerationError> {
        let context = format!("{method} {path}");
        let operation = value
            .as_object()
            .ok_or_else(|| invalid(format!("{context}: operation must be an object")))?;

        Ok(RawOperation {
            method,
            operation_id: text(operation.get("operationId")),
            summary: text(operation.get("summary")),
            description: text(operation.get("description")),
            parameters: self.parameters(&context, operation.get("parameters"))?,
            responses: self.responses(&context, operation.get("responses"))?,
        })
    }

    fn parameters(
        &self,
        context: &str,
        value: Option<&JsonValue>,
    ) -> Result<Vec<RawParameter>, GenerationError> {
        let Some(value) = value else {
            return Ok(Vec::new());
        };
        let items = value
            .as_array()
            .ok_or_else(|| invalid(format!("{context}: parameters must be an array")))?;

        items
            .iter()
            .map(|item| {
                let param = self.resolve(context, item, PARAMETERS_PREFIX, "parameters")?;
                parameter(context, param)
            })
            .collect()
    }

    fn responses(
        &self,
        context: &str,
        value: Option<&JsonValue>,
    ) -> Result<Vec<RawResponse>, GenerationError> {
        let Some(value) = value else {
            return Ok(Vec::new());
        };
        let responses = value
            .as_object()
            .ok_or_else(|| invalid(format!("{context}: responses must be an object")))?;

        let mut result = Vec::with_capacity(responses.len());
        for (key, item) in responses {
            if key.starts_with("x-") {
                continue;
            }
            let response = self.resolve(context, item, RESPONSES_PREFIX, "responses")?;
            result.push(RawResponse {
                key: key.clone(),
                description: text(response.get("description")),
                schema: response.get("schema").cloned(),
            });
        }
        Ok(result)
    }

    /// Follow a local `$ref` into a top-level section
    fn resolve<'a>(
        &'a self,
        context: &str,
        item: &'a JsonValue,
        prefix: &str,
        section: &str,
    ) -> Result<&'a JsonValue, GenerationError> {
        let Some(reference) = item.get("$ref").and_then(JsonValue::as_str) else {
            return Ok(item);
        };
        reference
            .strip_prefix(prefix)
            .and_then(|name| self.json.get(section)?.get(name))
            .ok_or_else(|| SpecError::unresolved(context, reference).into())
    }
}

fn parameter(context: &str, param: &JsonValue) -> Result<RawParameter, GenerationError> {
    let name = text(param.get("name"))
        .ok_or_else(|| invalid(format!("{context}: parameter without a name")))?;
    let location = text(param.get("in"))
        .ok_or_else(|| invalid(format!("{context}: parameter '{name}' has no 'in'")))?;

    let schema = if location == "body" {
        param
            .get("schema")
            .cloned()
            .ok_or_else(|| invalid(format!("{context}: body parameter '{name}' has no schema")))?
    } else {
        param.clone()
    };

    Ok(RawParameter {
        required: param
            .get("required")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false),
        description: text(param.get("description")),
        name,
        location,
        schema,
    })
}

/// Empty, or a leading `/` with no trailing one
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Strings as-is; YAML may hand us a number for `version: 1.0`
fn text(value: Option<&JsonValue>) -> Option<String> {
    match value? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn invalid(message: impl Into<String>) -> GenerationError {
    SpecError::invalid_document(message).into()
}
