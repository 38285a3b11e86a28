//! Compiles operation descriptors into the pieces of generated source
//!
//! The compiler decides everything that depends on the operation: type and
//! function names, fields, the statements of `validate()` and `path()`, the
//! client's header and body statements, the server's input decoding, the
//! output variants and the response dispatch table. Templates only lay those
//! pieces out.
//!
//! Generated statements refer to the runtime as `runtime::...`; every
//! emitted module imports `swaggen::runtime`.

use std::collections::HashSet;

use regex::Regex;
use serde::Serialize;

use crate::generation::sanitizers::{operation_doc, sanitize_doc_lines};
use crate::generation::utils::{sanitize_rust_field_name, status_variant_name, to_proper_case};
use crate::generation::{
    OperationDescriptor, ParameterDescriptor, ParameterLocation, PrimitiveType, ResponseDescriptor,
    SchemaRef, SpecError, StatusKey, TypeMapper,
};

const BAD_REQUEST: &str = "BadRequest";
const INTERNAL_ERROR: &str = "InternalError";

/// One input field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledField {
    pub name: String,
    pub wire_name: String,
    pub location: ParameterLocation,
    pub rust_type: String,
    pub optional: bool,
    /// `#[serde(...)]` attribute, when one is needed
    pub serde_attr: Option<String>,
    pub doc: Vec<String>,
}

/// One variant of an output or error enum
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledVariant {
    pub name: String,
    pub status: u16,
    /// Rust type of the decoded body, if the response declares a schema
    pub payload: Option<String>,
    /// `404 Not Found`
    pub label: String,
}

/// Everything the templates need to emit one operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledOperation {
    pub id: String,
    pub method: String,
    pub method_fn: String,
    pub path_template: String,
    pub fn_name: String,
    pub input_type: String,
    pub output_type: String,
    pub error_type: String,
    pub dispatcher: String,
    pub decoder: String,
    pub doc: Vec<String>,
    pub fields: Vec<CompiledField>,
    pub has_path_params: bool,
    pub validate_lines: Vec<String>,
    pub path_lines: Vec<String>,
    pub request_lines: Vec<String>,
    pub decode_lines: Vec<String>,
    pub success_variants: Vec<CompiledVariant>,
    /// Declared error variants; the shared 400/500 variants are implicit
    pub error_variants: Vec<CompiledVariant>,
    pub dispatch_arms: Vec<String>,
}

/// Turns descriptors into [`CompiledOperation`]s
#[derive(Debug, Clone, Default)]
pub struct OperationCompiler {
    type_mapper: TypeMapper,
}

impl OperationCompiler {
    pub fn new(type_mapper: TypeMapper) -> Self {
        Self { type_mapper }
    }

    /// Compile every operation, rejecting two that would share generated names
    pub fn compile_all(
        &self,
        operations: &[OperationDescriptor],
    ) -> Result<Vec<CompiledOperation>, SpecError> {
        let mut names = HashSet::new();
        let mut compiled = Vec::with_capacity(operations.len());
        for operation in operations {
            let op = self.compile(operation)?;
            if !names.insert(op.fn_name.clone()) || !names.insert(op.input_type.clone()) {
                return Err(SpecError::DuplicateOperation { name: op.fn_name });
            }
            compiled.push(op);
        }
        Ok(compiled)
    }

    pub fn compile(&self, operation: &OperationDescriptor) -> Result<CompiledOperation, SpecError> {
        let prefix = to_proper_case(&operation.id);
        if prefix.is_empty() {
            return Err(SpecError::invalid_document(format!(
                "operation id '{}' yields no usable identifier",
                operation.id
            )));
        }
        check_patterns(operation)?;
        let fn_name = sanitize_rust_field_name(&operation.id);

        let params: Vec<(&ParameterDescriptor, String)> = operation
            .parameters
            .iter()
            .map(|p| (p, sanitize_rust_field_name(&p.name)))
            .collect();

        let fields = params
            .iter()
            .map(|(param, name)| self.field(param, name))
            .collect();

        let (success_variants, error_variants) = self.variants(operation)?;
        let output_type = format!("{prefix}Output");
        let error_type = format!("{prefix}Error");
        let dispatch_arms = dispatch_arms(
            &output_type,
            &error_type,
            &success_variants,
            &error_variants,
        );

        Ok(CompiledOperation {
            id: operation.id.clone(),
            method: operation.method.as_upper().to_string(),
            method_fn: operation.method.as_str().to_string(),
            path_template: operation.path_template.clone(),
            fn_name: fn_name.clone(),
            input_type: format!("{prefix}Input"),
            output_type,
            error_type,
            dispatcher: format!("dispatch_{fn_name}"),
            decoder: format!("decode_{fn_name}"),
            doc: operation_doc(operation.summary.as_deref(), operation.description.as_deref()),
            fields,
            has_path_params: params
                .iter()
                .any(|(p, _)| p.location == ParameterLocation::Path),
            validate_lines: validate_lines(&operation.id, &params),
            path_lines: path_lines(&operation.path_template, &params),
            request_lines: request_lines(&params),
            decode_lines: decode_lines(&params),
            success_variants,
            error_variants,
            dispatch_arms,
        })
    }

    fn field(&self, param: &ParameterDescriptor, name: &str) -> CompiledField {
        let optional = param.is_optional();
        let mut serde_args = Vec::new();
        if name != param.name {
            serde_args.push(format!("rename = {:?}", param.name));
        }
        if optional {
            serde_args.push("default".to_string());
            serde_args.push("skip_serializing_if = \"Option::is_none\"".to_string());
        }

        CompiledField {
            name: name.to_string(),
            wire_name: param.name.clone(),
            location: param.location,
            rust_type: self.type_mapper.field_type(param),
            optional,
            serde_attr: (!serde_args.is_empty())
                .then(|| format!("#[serde({})]", serde_args.join(", "))),
            doc: param
                .description
                .as_deref()
                .map(sanitize_doc_lines)
                .unwrap_or_default(),
        }
    }

    /// Success and declared error variants; 400 and 500 may only restate the
    /// shared defaults
    fn variants(
        &self,
        operation: &OperationDescriptor,
    ) -> Result<(Vec<CompiledVariant>, Vec<CompiledVariant>), SpecError> {
        let mut success = Vec::new();
        let mut errors = Vec::new();

        for response in &operation.responses {
            let code = match response.status {
                StatusKey::Code(code) => code,
                StatusKey::Default => {
                    tracing::debug!(operation = %operation.id, "default response is not dispatched");
                    continue;
                }
            };

            match code {
                400 => check_shared(operation, response, 400, BAD_REQUEST)?,
                500 => check_shared(operation, response, 500, INTERNAL_ERROR)?,
                _ => {
                    let variant = CompiledVariant {
                        name: status_variant_name(code),
                        status: code,
                        payload: response.schema.as_ref().map(|s| self.type_mapper.rust_type(s)),
                        label: status_label(code),
                    };
                    if response.is_error() {
                        errors.push(variant);
                    } else {
                        success.push(variant);
                    }
                }
            }
        }
        Ok((success, errors))
    }
}

fn check_shared(
    operation: &OperationDescriptor,
    response: &ResponseDescriptor,
    status: u16,
    shared_type: &'static str,
) -> Result<(), SpecError> {
    match &response.schema {
        None => Ok(()),
        Some(schema) if schema.is_named(shared_type) => Ok(()),
        Some(_) => Err(SpecError::DuplicateDefaultResponseDefinition {
            operation: operation.id.clone(),
            status,
            shared_type,
        }),
    }
}

fn status_label(code: u16) -> String {
    match reqwest::StatusCode::from_u16(code)
        .ok()
        .and_then(|s| s.canonical_reason())
    {
        Some(reason) => format!("{code} {reason}"),
        None => format!("{code}"),
    }
}

/// Declared codes first, then the shared 400/500 defaults, then the catch-all
fn dispatch_arms(
    output_type: &str,
    error_type: &str,
    success: &[CompiledVariant],
    errors: &[CompiledVariant],
) -> Vec<String> {
    let mut declared: Vec<(u16, String)> = Vec::new();

    for v in success {
        let arm = match v.payload {
            Some(_) => format!(
                "{} => runtime::dispatch::success(body, {output_type}::{}).map_err({error_type}::InternalError),",
                v.status, v.name
            ),
            None => format!("{} => Ok({output_type}::{}),", v.status, v.name),
        };
        declared.push((v.status, arm));
    }
    for v in errors {
        let arm = match v.payload {
            Some(_) => format!(
                "{} => Err(runtime::dispatch::error(body, {error_type}::{}, {error_type}::InternalError)),",
                v.status, v.name
            ),
            None => format!("{} => Err({error_type}::{}),", v.status, v.name),
        };
        declared.push((v.status, arm));
    }
    declared.sort_by_key(|(status, _)| *status);

    let mut arms: Vec<String> = declared.into_iter().map(|(_, arm)| arm).collect();
    arms.push(format!(
        "400 => Err(runtime::dispatch::error(body, {error_type}::BadRequest, {error_type}::InternalError)),"
    ));
    arms.push(format!(
        "500 => Err(runtime::dispatch::error(body, {error_type}::InternalError, {error_type}::InternalError)),"
    ));
    arms.push(format!(
        "_ => Err({error_type}::InternalError(InternalError::unknown_response())),"
    ));
    arms
}

fn string_literal(s: &str) -> String {
    format!("{s:?}")
}

fn float_literal(value: f64) -> String {
    format!("{value:?}")
}

/// Every declared `pattern` must compile
fn check_patterns(operation: &OperationDescriptor) -> Result<(), SpecError> {
    for param in &operation.parameters {
        if let Some(pattern) = &param.constraints.pattern {
            Regex::new(pattern).map_err(|e| SpecError::InvalidPattern {
                operation: operation.id.clone(),
                parameter: param.name.clone(),
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
        }
    }
    Ok(())
}

/// Checks for one field; `text` and `number` are the expressions to check
fn constraint_checks(
    operation: &str,
    param: &ParameterDescriptor,
    text: &str,
    number: &str,
) -> Vec<String> {
    let c = &param.constraints;
    let wire = string_literal(&param.name);
    let mut checks = Vec::new();

    let primitive = match &param.value_type {
        SchemaRef::Primitive(p) => *p,
        _ => {
            if !c.is_empty() {
                tracing::debug!(
                    operation,
                    parameter = %param.name,
                    "constraints on non-primitive parameters are not checked"
                );
            }
            return checks;
        }
    };
    let allowed = || {
        c.enum_values
            .iter()
            .map(|v| string_literal(v))
            .collect::<Vec<_>>()
            .join(", ")
    };

    if primitive == PrimitiveType::String {
        if let Some(max) = c.max_length {
            checks.push(format!("runtime::validation::max_length({wire}, {text}, {max})?;"));
        }
        if let Some(min) = c.min_length {
            checks.push(format!("runtime::validation::min_length({wire}, {text}, {min})?;"));
        }
        if let Some(pattern) = &c.pattern {
            checks.push(format!(
                "runtime::validation::pattern({wire}, {text}, {})?;",
                string_literal(pattern)
            ));
        }
        if !c.enum_values.is_empty() {
            checks.push(format!(
                "runtime::validation::one_of({wire}, {text}, &[{}])?;",
                allowed()
            ));
        }
        return checks;
    }

    if !c.enum_values.is_empty() {
        checks.push(format!(
            "runtime::validation::one_of({wire}, &{number}.to_string(), &[{}])?;",
            allowed()
        ));
    }
    if !primitive.is_numeric() {
        return checks;
    }
    if let Some(max) = c.maximum {
        checks.push(format!(
            "runtime::validation::maximum({wire}, {number} as f64, {}, {})?;",
            float_literal(max),
            c.exclusive_maximum
        ));
    }
    if let Some(min) = c.minimum {
        checks.push(format!(
            "runtime::validation::minimum({wire}, {number} as f64, {}, {})?;",
            float_literal(min),
            c.exclusive_minimum
        ));
    }
    if let Some(factor) = c.multiple_of {
        checks.push(format!(
            "runtime::validation::multiple_of({wire}, {number} as f64, {})?;",
            float_literal(factor)
        ));
    }
    checks
}

/// Statements of `validate()`, fail-fast, in field order
fn validate_lines(operation: &str, params: &[(&ParameterDescriptor, String)]) -> Vec<String> {
    let mut lines = Vec::new();
    for (param, field) in params {
        if param.location == ParameterLocation::Body {
            continue;
        }
        if param.is_optional() {
            let checks = constraint_checks(operation, param, "value", "*value");
            if checks.is_empty() {
                continue;
            }
            lines.push(format!("if let Some(value) = &self.{field} {{"));
            lines.extend(checks.into_iter().map(|c| format!("    {c}")));
            lines.push("}".to_string());
        } else {
            let text = format!("&self.{field}");
            let number = format!("self.{field}");
            lines.extend(constraint_checks(operation, param, &text, &number));
        }
    }
    lines
}

/// Statements of `path()`; the last one is the returned expression
fn path_lines(template: &str, params: &[(&ParameterDescriptor, String)]) -> Vec<String> {
    let path_params: Vec<_> = params
        .iter()
        .filter(|(p, _)| p.location == ParameterLocation::Path)
        .collect();
    let query_params: Vec<_> = params
        .iter()
        .filter(|(p, _)| p.location == ParameterLocation::Query)
        .collect();

    let mut lines = Vec::new();
    let binding = if path_params.is_empty() { "let path" } else { "let mut path" };
    lines.push(format!("{binding} = String::from({});", string_literal(template)));
    for (param, field) in path_params {
        lines.push(format!(
            "path = runtime::path::substitute(&path, {}, &self.{field});",
            string_literal(&param.name)
        ));
    }

    let binding = if query_params.is_empty() { "let query" } else { "let mut query" };
    lines.push(format!("{binding} = runtime::path::QueryString::new();"));
    for (param, field) in query_params {
        let wire = string_literal(&param.name);
        let (method, item) = if param.value_type.is_array() {
            ("push_all", "values")
        } else {
            ("push", "value")
        };
        if param.is_optional() {
            lines.push(format!(
                "if let Some({item}) = &self.{field} {{ query.{method}({wire}, {item}); }}"
            ));
        } else {
            lines.push(format!("query.{method}({wire}, &self.{field});"));
        }
    }
    lines.push("query.finish(&path)".to_string());
    lines
}

/// Client statements attaching headers and the body to `request`
fn request_lines(params: &[(&ParameterDescriptor, String)]) -> Vec<String> {
    let mut lines = Vec::new();
    for (param, field) in params {
        let wire = string_literal(&param.name);
        match param.location {
            ParameterLocation::Header if param.is_optional() => lines.push(format!(
                "if let Some(value) = &input.{field} {{ request.header({wire}, &value.to_string())?; }}"
            )),
            ParameterLocation::Header => lines.push(format!(
                "request.header({wire}, &input.{field}.to_string())?;"
            )),
            ParameterLocation::Body => lines.push(format!("request.json_body(&input.{field})?;")),
            ParameterLocation::Path | ParameterLocation::Query => {}
        }
    }
    lines
}

/// Server field initializers reading from `parts`
fn decode_lines(params: &[(&ParameterDescriptor, String)]) -> Vec<String> {
    params
        .iter()
        .map(|(param, field)| {
            let wire = string_literal(&param.name);
            let expr = match param.location {
                ParameterLocation::Path => format!("parts.path_param({wire})?"),
                ParameterLocation::Query if param.value_type.is_array() => {
                    if param.is_optional() {
                        format!(
                            "{{ let values = parts.query_all({wire})?; (!values.is_empty()).then_some(values) }}"
                        )
                    } else {
                        format!("parts.query_all({wire})?")
                    }
                }
                ParameterLocation::Query if param.is_optional() => format!("parts.query({wire})?"),
                ParameterLocation::Query => format!("parts.query_required({wire})?"),
                ParameterLocation::Header if param.is_optional() => {
                    format!("parts.header({wire})?")
                }
                ParameterLocation::Header => format!("parts.header_required({wire})?"),
                ParameterLocation::Body => "parts.body()?".to_string(),
            };
            format!("{field}: {expr},")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{Constraints, HttpMethod};

    fn param(name: &str, location: ParameterLocation, value_type: SchemaRef, required: bool) -> ParameterDescriptor {
        ParameterDescriptor {
            name: name.to_string(),
            location,
            value_type,
            required,
            constraints: Constraints::default(),
            description: None,
        }
    }

    fn response(code: u16, schema: Option<SchemaRef>) -> ResponseDescriptor {
        ResponseDescriptor {
            status: StatusKey::Code(code),
            schema,
            description: None,
        }
    }

    fn get_item() -> OperationDescriptor {
        OperationDescriptor {
            id: "getItem".to_string(),
            method: HttpMethod::Get,
            path_template: "/items/{id}".to_string(),
            summary: Some("Fetch one item".to_string()),
            description: None,
            parameters: vec![
                param(
                    "id",
                    ParameterLocation::Path,
                    SchemaRef::Primitive(PrimitiveType::String),
                    true,
                ),
                param(
                    "fields",
                    ParameterLocation::Query,
                    SchemaRef::Primitive(PrimitiveType::String),
                    false,
                ),
            ],
            responses: vec![
                response(200, Some(SchemaRef::NamedModel("Item".to_string()))),
                response(404, None),
            ],
        }
    }

    #[test]
    fn test_names_and_fields() {
        let op = OperationCompiler::default().compile(&get_item()).unwrap();
        assert_eq!(op.fn_name, "get_item");
        assert_eq!(op.input_type, "GetItemInput");
        assert_eq!(op.output_type, "GetItemOutput");
        assert_eq!(op.error_type, "GetItemError");
        assert_eq!(op.method, "GET");
        assert_eq!(op.doc, vec!["Fetch one item"]);
        assert!(op.has_path_params);

        assert_eq!(op.fields[0].rust_type, "String");
        assert_eq!(op.fields[1].rust_type, "Option<String>");
        assert_eq!(
            op.fields[1].serde_attr.as_deref(),
            Some("#[serde(default, skip_serializing_if = \"Option::is_none\")]")
        );
    }

    #[test]
    fn test_path_lines() {
        let op = OperationCompiler::default().compile(&get_item()).unwrap();
        assert_eq!(
            op.path_lines,
            vec![
                "let mut path = String::from(\"/items/{id}\");",
                "path = runtime::path::substitute(&path, \"id\", &self.id);",
                "let mut query = runtime::path::QueryString::new();",
                "if let Some(value) = &self.fields { query.push(\"fields\", value); }",
                "query.finish(&path)",
            ]
        );
    }

    #[test]
    fn test_variants_and_dispatch_order() {
        let op = OperationCompiler::default().compile(&get_item()).unwrap();
        assert_eq!(op.success_variants[0].name, "Ok");
        assert_eq!(
            op.success_variants[0].payload.as_deref(),
            Some("crate::models::Item")
        );
        assert_eq!(op.error_variants[0].name, "NotFound");
        assert_eq!(op.error_variants[0].label, "404 Not Found");

        assert_eq!(
            op.dispatch_arms,
            vec![
                "200 => runtime::dispatch::success(body, GetItemOutput::Ok).map_err(GetItemError::InternalError),",
                "404 => Err(GetItemError::NotFound),",
                "400 => Err(runtime::dispatch::error(body, GetItemError::BadRequest, GetItemError::InternalError)),",
                "500 => Err(runtime::dispatch::error(body, GetItemError::InternalError, GetItemError::InternalError)),",
                "_ => Err(GetItemError::InternalError(InternalError::unknown_response())),",
            ]
        );
    }

    #[test]
    fn test_invalid_pattern_is_rejected_at_generation() {
        let mut op = get_item();
        op.parameters[1].constraints.pattern = Some("([a-z".to_string());

        let err = OperationCompiler::default().compile(&op).unwrap_err();
        match err {
            SpecError::InvalidPattern {
                operation,
                parameter,
                pattern,
                ..
            } => {
                assert_eq!(operation, "getItem");
                assert_eq!(parameter, "fields");
                assert_eq!(pattern, "([a-z");
            }
            other => panic!("Expected InvalidPattern, got {other:?}"),
        }
    }

    #[test]
    fn test_redefining_shared_responses_fails() {
        let mut op = get_item();
        op.responses
            .push(response(400, Some(SchemaRef::NamedModel("ValidationProblem".to_string()))));
        let err = OperationCompiler::default().compile(&op).unwrap_err();
        assert_eq!(
            err,
            SpecError::DuplicateDefaultResponseDefinition {
                operation: "getItem".to_string(),
                status: 400,
                shared_type: "BadRequest",
            }
        );

        let mut op = get_item();
        op.responses
            .push(response(500, Some(SchemaRef::Primitive(PrimitiveType::String))));
        assert!(matches!(
            OperationCompiler::default().compile(&op),
            Err(SpecError::DuplicateDefaultResponseDefinition { status: 500, .. })
        ));
    }

    #[test]
    fn test_restating_shared_responses_is_allowed() {
        let mut op = get_item();
        op.responses.push(response(400, None));
        op.responses
            .push(response(500, Some(SchemaRef::NamedModel("InternalError".to_string()))));
        let compiled = OperationCompiler::default().compile(&op).unwrap();
        assert_eq!(compiled.error_variants.len(), 1);
    }

    #[test]
    fn test_validate_lines_fail_fast_in_field_order() {
        let mut name = param(
            "name",
            ParameterLocation::Query,
            SchemaRef::Primitive(PrimitiveType::String),
            true,
        );
        name.constraints = Constraints {
            max_length: Some(10),
            pattern: Some("^[a-z]+$".to_string()),
            ..Default::default()
        };
        let mut limit = param(
            "limit",
            ParameterLocation::Query,
            SchemaRef::Primitive(PrimitiveType::Int32),
            false,
        );
        limit.constraints = Constraints {
            maximum: Some(100.0),
            minimum: Some(1.0),
            exclusive_minimum: true,
            enum_values: vec!["10".to_string(), "50".to_string()],
            ..Default::default()
        };

        let op = OperationDescriptor {
            id: "findItems".to_string(),
            method: HttpMethod::Get,
            path_template: "/items".to_string(),
            summary: None,
            description: None,
            parameters: vec![name, limit],
            responses: vec![],
        };
        let compiled = OperationCompiler::default().compile(&op).unwrap();
        assert_eq!(
            compiled.validate_lines,
            vec![
                "runtime::validation::max_length(\"name\", &self.name, 10)?;",
                "runtime::validation::pattern(\"name\", &self.name, \"^[a-z]+$\")?;",
                "if let Some(value) = &self.limit {",
                "    runtime::validation::one_of(\"limit\", &*value.to_string(), &[\"10\", \"50\"])?;",
                "    runtime::validation::maximum(\"limit\", *value as f64, 100.0, false)?;",
                "    runtime::validation::minimum(\"limit\", *value as f64, 1.0, true)?;",
                "}",
            ]
        );
        assert!(compiled.success_variants.is_empty());
    }

    #[test]
    fn test_client_and_server_lines() {
        let op = OperationDescriptor {
            id: "createItem".to_string(),
            method: HttpMethod::Post,
            path_template: "/items".to_string(),
            summary: None,
            description: None,
            parameters: vec![
                param(
                    "X-Tenant",
                    ParameterLocation::Header,
                    SchemaRef::Primitive(PrimitiveType::String),
                    false,
                ),
                param(
                    "item",
                    ParameterLocation::Body,
                    SchemaRef::NamedModel("Item".to_string()),
                    true,
                ),
            ],
            responses: vec![response(201, Some(SchemaRef::NamedModel("Item".to_string())))],
        };
        let compiled = OperationCompiler::default().compile(&op).unwrap();

        assert_eq!(
            compiled.fields[0].serde_attr.as_deref(),
            Some("#[serde(rename = \"X-Tenant\", default, skip_serializing_if = \"Option::is_none\")]")
        );
        assert_eq!(
            compiled.request_lines,
            vec![
                "if let Some(value) = &input.x_tenant { request.header(\"X-Tenant\", &value.to_string())?; }",
                "request.json_body(&input.item)?;",
            ]
        );
        assert_eq!(
            compiled.decode_lines,
            vec![
                "x_tenant: parts.header(\"X-Tenant\")?,",
                "item: parts.body()?,",
            ]
        );
        assert!(!compiled.has_path_params);
        assert_eq!(compiled.path_lines[0], "let path = String::from(\"/items\");");
    }

    #[test]
    fn test_colliding_operation_names() {
        let a = get_item();
        let mut b = get_item();
        b.id = "get_item".to_string();
        b.method = HttpMethod::Put;
        let err = OperationCompiler::default().compile_all(&[a, b]).unwrap_err();
        assert!(matches!(err, SpecError::DuplicateOperation { .. }));
    }
}
