//! Core types for the generation domain
//!
//! Two families live here. The `Api*`/`Raw*` types are the loaded Swagger
//! document, close to its JSON shape. The `*Descriptor` types are the
//! normalized, ordered view the walker builds from it and the compiler
//! consumes. Descriptors exist only for the duration of one generation run.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// HTTP methods a Swagger path item may declare
///
/// Variants are declared in name order so the derived `Ord` sorts by method
/// name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
}

impl HttpMethod {
    pub fn all() -> &'static [HttpMethod] {
        &[
            HttpMethod::Delete,
            HttpMethod::Get,
            HttpMethod::Head,
            HttpMethod::Options,
            HttpMethod::Patch,
            HttpMethod::Post,
            HttpMethod::Put,
        ]
    }

    /// Lowercase name, as used for path item keys and axum routing functions
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Delete => "delete",
            HttpMethod::Get => "get",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
            HttpMethod::Patch => "patch",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
        }
    }

    /// Uppercase name, as used for `Method::<NAME>` constants
    pub fn as_upper(&self) -> &'static str {
        match self {
            HttpMethod::Delete => "DELETE",
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|m| m.as_str() == key)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter travels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Body,
}

impl ParameterLocation {
    /// Parse a Swagger `in` value; `formData` and unknown values are `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "path" => Some(ParameterLocation::Path),
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            "body" => Some(ParameterLocation::Body),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Body => "body",
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primitive value kinds, refined by Swagger `format`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    String,
    Int32,
    Int64,
    Float,
    Double,
    Boolean,
}

impl PrimitiveType {
    /// Map a Swagger `type`/`format` pair
    pub fn from_swagger(kind: &str, format: Option<&str>) -> Option<Self> {
        match (kind, format) {
            ("string", _) => Some(PrimitiveType::String),
            ("integer", Some("int32")) => Some(PrimitiveType::Int32),
            ("integer", _) => Some(PrimitiveType::Int64),
            ("number", Some("float")) => Some(PrimitiveType::Float),
            ("number", _) => Some(PrimitiveType::Double),
            ("boolean", _) => Some(PrimitiveType::Boolean),
            _ => None,
        }
    }

    pub fn rust_type(&self) -> &'static str {
        match self {
            PrimitiveType::String => "String",
            PrimitiveType::Int32 => "i32",
            PrimitiveType::Int64 => "i64",
            PrimitiveType::Float => "f32",
            PrimitiveType::Double => "f64",
            PrimitiveType::Boolean => "bool",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            PrimitiveType::Int32 | PrimitiveType::Int64 | PrimitiveType::Float | PrimitiveType::Double
        )
    }
}

/// Value representation chosen by the type mapper
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaRef {
    Primitive(PrimitiveType),
    NamedModel(String),
    ArrayOf(Box<SchemaRef>),
}

impl SchemaRef {
    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            SchemaRef::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, SchemaRef::ArrayOf(_))
    }

    pub fn is_named(&self, name: &str) -> bool {
        matches!(self, SchemaRef::NamedModel(n) if n == name)
    }
}

/// Declared value constraints of a non-body parameter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    pub max_length: Option<u64>,
    pub min_length: Option<u64>,
    pub pattern: Option<String>,
    /// Allowed values in their text form
    pub enum_values: Vec<String>,
    pub maximum: Option<f64>,
    pub minimum: Option<f64>,
    pub exclusive_maximum: bool,
    pub exclusive_minimum: bool,
    pub multiple_of: Option<f64>,
}

impl Constraints {
    /// Read the constraint keywords of a parameter object
    pub fn from_json(value: &JsonValue) -> Self {
        let enum_values = value
            .get("enum")
            .and_then(JsonValue::as_array)
            .map(|values| {
                values
                    .iter()
                    .map(|v| match v {
                        JsonValue::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            max_length: value.get("maxLength").and_then(JsonValue::as_u64),
            min_length: value.get("minLength").and_then(JsonValue::as_u64),
            pattern: value
                .get("pattern")
                .and_then(JsonValue::as_str)
                .map(str::to_string),
            enum_values,
            maximum: value.get("maximum").and_then(JsonValue::as_f64),
            minimum: value.get("minimum").and_then(JsonValue::as_f64),
            exclusive_maximum: value
                .get("exclusiveMaximum")
                .and_then(JsonValue::as_bool)
                .unwrap_or(false),
            exclusive_minimum: value
                .get("exclusiveMinimum")
                .and_then(JsonValue::as_bool)
                .unwrap_or(false),
            multiple_of: value.get("multipleOf").and_then(JsonValue::as_f64),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// A response key: a numeric status code or the literal `default`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKey {
    Code(u16),
    Default,
}

impl StatusKey {
    pub fn code(&self) -> Option<u16> {
        match self {
            StatusKey::Code(code) => Some(*code),
            StatusKey::Default => None,
        }
    }
}

/// Numeric codes ascend; `default` sorts last
impl Ord for StatusKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (StatusKey::Code(a), StatusKey::Code(b)) => a.cmp(b),
            (StatusKey::Code(_), StatusKey::Default) => Ordering::Less,
            (StatusKey::Default, StatusKey::Code(_)) => Ordering::Greater,
            (StatusKey::Default, StatusKey::Default) => Ordering::Equal,
        }
    }
}

impl PartialOrd for StatusKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for StatusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusKey::Code(code) => write!(f, "{code}"),
            StatusKey::Default => f.write_str("default"),
        }
    }
}

// ----------------------------------------------------------------------------
// Loaded document
// ----------------------------------------------------------------------------

/// A loaded Swagger 2.0 document, local `$ref`s to parameters and responses
/// already resolved
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiDocument {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
    /// Normalized: empty, or a leading `/` without a trailing one
    pub base_path: String,
    /// Paths in document order
    pub paths: Vec<ApiPath>,
    /// Names under `#/definitions`
    pub definitions: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiPath {
    pub path: String,
    /// Parameters shared by every operation of the path
    pub parameters: Vec<RawParameter>,
    pub operations: Vec<RawOperation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawOperation {
    pub method: HttpMethod,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub parameters: Vec<RawParameter>,
    /// Response keys as written, with their definitions
    pub responses: Vec<RawResponse>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawParameter {
    pub name: String,
    /// The `in` value as written
    pub location: String,
    pub required: bool,
    pub description: Option<String>,
    /// The full parameter object; for `in: body` this is the `schema` value
    pub schema: JsonValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub key: String,
    pub description: Option<String>,
    pub schema: Option<JsonValue>,
}

// ----------------------------------------------------------------------------
// Descriptors
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub location: ParameterLocation,
    pub value_type: SchemaRef,
    pub required: bool,
    pub constraints: Constraints,
    pub description: Option<String>,
}

impl ParameterDescriptor {
    /// Non-required, non-body parameters are optional
    pub fn is_optional(&self) -> bool {
        !self.required && self.location != ParameterLocation::Body
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseDescriptor {
    pub status: StatusKey,
    pub schema: Option<SchemaRef>,
    pub description: Option<String>,
}

impl ResponseDescriptor {
    pub fn is_error(&self) -> bool {
        self.status.code().is_some_and(|code| code >= 400)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationDescriptor {
    pub id: String,
    pub method: HttpMethod,
    pub path_template: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    /// Declaration order
    pub parameters: Vec<ParameterDescriptor>,
    /// Ascending status codes, `default` last
    pub responses: Vec<ResponseDescriptor>,
}

// ----------------------------------------------------------------------------
// Generation inputs and outputs
// ----------------------------------------------------------------------------

/// Defaults baked into the generated client constructor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientDefaults {
    pub timeout_ms: u64,
    /// Extra attempts after the first one
    pub retries: u32,
    pub max_concurrent_requests: usize,
    pub request_volume_threshold: u32,
    pub error_percent_threshold: u32,
    pub sleep_window_ms: u64,
}

impl Default for ClientDefaults {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            retries: 1,
            max_concurrent_requests: 100,
            request_volume_threshold: 20,
            error_percent_threshold: 90,
            sleep_window_ms: 5_000,
        }
    }
}

/// What to generate
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// File path or HTTP(S) URL of the Swagger document
    pub spec_source: String,
    /// Name of the generated package
    pub package: String,
    /// Circuit name prefix; defaults to the package name
    pub service_name: Option<String>,
    pub client: ClientDefaults,
}

/// Generated artifact, path relative to the package root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub content: String,
    pub permissions: Option<u32>,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            permissions: None,
        }
    }
}

/// Result of generation
#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// Sorted by path
    pub artifacts: Vec<Artifact>,
    pub operations: usize,
    /// SHA-256 over every artifact path and content
    pub fingerprint: String,
}

/// Result of a dry run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub title: String,
    pub operations: Vec<String>,
    pub models: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_keys_sort_numerically_with_default_last() {
        let mut keys = vec![
            StatusKey::Default,
            StatusKey::Code(404),
            StatusKey::Code(200),
            StatusKey::Code(201),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                StatusKey::Code(200),
                StatusKey::Code(201),
                StatusKey::Code(404),
                StatusKey::Default
            ]
        );
    }

    #[test]
    fn test_methods_sort_by_name() {
        let mut methods = vec![HttpMethod::Put, HttpMethod::Get, HttpMethod::Delete, HttpMethod::Post];
        methods.sort();
        let names: Vec<_> = methods.iter().map(HttpMethod::as_str).collect();
        assert_eq!(names, vec!["delete", "get", "post", "put"]);
    }

    #[test]
    fn test_primitive_from_swagger() {
        assert_eq!(
            PrimitiveType::from_swagger("integer", Some("int32")),
            Some(PrimitiveType::Int32)
        );
        assert_eq!(PrimitiveType::from_swagger("integer", None), Some(PrimitiveType::Int64));
        assert_eq!(PrimitiveType::from_swagger("number", None), Some(PrimitiveType::Double));
        assert_eq!(PrimitiveType::from_swagger("file", None), None);
    }

    #[test]
    fn test_constraints_from_json() {
        let constraints = Constraints::from_json(&serde_json::json!({
            "type": "integer",
            "maximum": 100,
            "exclusiveMaximum": true,
            "enum": [1, 2, "three"]
        }));
        assert_eq!(constraints.maximum, Some(100.0));
        assert!(constraints.exclusive_maximum);
        assert_eq!(constraints.enum_values, vec!["1", "2", "three"]);
        assert!(!constraints.is_empty());
        assert!(Constraints::from_json(&serde_json::json!({"type": "string"})).is_empty());
    }

    #[test]
    fn test_optionality() {
        let param = ParameterDescriptor {
            name: "body".to_string(),
            location: ParameterLocation::Body,
            value_type: SchemaRef::NamedModel("Item".to_string()),
            required: false,
            constraints: Constraints::default(),
            description: None,
        };
        assert!(!param.is_optional());

        let query = ParameterDescriptor {
            location: ParameterLocation::Query,
            ..param
        };
        assert!(query.is_optional());
    }
}
