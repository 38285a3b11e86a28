//! Normalizes a loaded document into ordered operation descriptors
//!
//! Ordering is what makes generated output diff-stable: paths sort
//! lexicographically, operations within a path by method name, and
//! responses by numeric status with `default` last. Parameters keep their
//! declaration order.

use std::collections::HashSet;

use crate::generation::utils::{sanitize_rust_field_name, to_camel_case};
use crate::generation::{
    ApiDocument, ApiPath, Constraints, OperationDescriptor, ParameterDescriptor,
    ParameterLocation, RawOperation, RawParameter, ResponseDescriptor, SpecError, StatusKey,
    TypeMapper,
};

/// Walks a document in a fixed order, building descriptors
#[derive(Debug, Clone, Default)]
pub struct SpecWalker {
    type_mapper: TypeMapper,
}

impl SpecWalker {
    pub fn new(type_mapper: TypeMapper) -> Self {
        Self { type_mapper }
    }

    pub fn type_mapper(&self) -> &TypeMapper {
        &self.type_mapper
    }

    /// Every operation of `document`, in generation order
    pub fn walk(&self, document: &ApiDocument) -> Result<Vec<OperationDescriptor>, SpecError> {
        let mut paths: Vec<&ApiPath> = document.paths.iter().collect();
        paths.sort_by(|a, b| a.path.cmp(&b.path));

        let mut descriptors = Vec::new();
        for path in paths {
            let mut operations: Vec<&RawOperation> = path.operations.iter().collect();
            operations.sort_by_key(|op| op.method);

            for operation in operations {
                let descriptor = self.describe(path, operation)?;
                tracing::debug!(
                    operation = %descriptor.id,
                    method = %descriptor.method,
                    path = %descriptor.path_template,
                    parameters = descriptor.parameters.len(),
                    responses = descriptor.responses.len(),
                    "walked operation"
                );
                descriptors.push(descriptor);
            }
        }
        Ok(descriptors)
    }

    fn describe(
        &self,
        path: &ApiPath,
        operation: &RawOperation,
    ) -> Result<OperationDescriptor, SpecError> {
        let id = operation
            .operation_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| synthesize_operation_id(operation, &path.path));

        let parameters = self.parameters(&id, &path.parameters, &operation.parameters)?;
        check_path_placeholders(&id, &path.path, &parameters)?;
        let responses = self.responses(&id, operation)?;

        Ok(OperationDescriptor {
            id,
            method: operation.method,
            path_template: path.path.clone(),
            summary: operation.summary.clone(),
            description: operation.description.clone(),
            parameters,
            responses,
        })
    }

    /// Path-level parameters not overridden by the operation come first,
    /// then the operation's own, each in declaration order
    fn parameters(
        &self,
        operation: &str,
        shared: &[RawParameter],
        own: &[RawParameter],
    ) -> Result<Vec<ParameterDescriptor>, SpecError> {
        let overridden = |p: &RawParameter| {
            own.iter()
                .any(|o| o.name == p.name && o.location == p.location)
        };
        let merged = shared
            .iter()
            .filter(|p| !overridden(*p))
            .chain(own.iter());

        let mut names = HashSet::new();
        let mut fields = HashSet::new();
        let mut has_body = false;
        let mut descriptors = Vec::new();

        for raw in merged {
            let (location, value_type) = self.type_mapper.map_parameter(operation, raw)?;

            if !names.insert(raw.name.clone()) || !fields.insert(sanitize_rust_field_name(&raw.name)) {
                return Err(SpecError::DuplicateParameter {
                    operation: operation.to_string(),
                    parameter: raw.name.clone(),
                });
            }
            if location == ParameterLocation::Body {
                if has_body {
                    return Err(SpecError::invalid_document(format!(
                        "{operation}: more than one body parameter"
                    )));
                }
                has_body = true;
            }

            let constraints = match location {
                ParameterLocation::Body => Constraints::default(),
                _ => Constraints::from_json(&raw.schema),
            };

            descriptors.push(ParameterDescriptor {
                name: raw.name.clone(),
                location,
                value_type,
                required: raw.required || location == ParameterLocation::Path,
                constraints,
                description: raw.description.clone(),
            });
        }
        Ok(descriptors)
    }

    fn responses(
        &self,
        operation: &str,
        raw: &RawOperation,
    ) -> Result<Vec<ResponseDescriptor>, SpecError> {
        let mut responses = Vec::with_capacity(raw.responses.len());
        for response in &raw.responses {
            let status = parse_status_key(operation, &response.key)?;
            let context = format!("{operation}: response {status}");
            let schema = response
                .schema
                .as_ref()
                .map(|schema| self.type_mapper.map_schema(&context, schema))
                .transpose()?;

            responses.push(ResponseDescriptor {
                status,
                schema,
                description: response.description.clone(),
            });
        }
        responses.sort_by_key(|r| r.status);
        Ok(responses)
    }
}

/// `default`, or a status code in [200, 599]
pub fn parse_status_key(operation: &str, key: &str) -> Result<StatusKey, SpecError> {
    if key == "default" {
        return Ok(StatusKey::Default);
    }
    match key.parse::<u16>() {
        Ok(code) if (200..=599).contains(&code) => Ok(StatusKey::Code(code)),
        _ => Err(SpecError::OutOfRangeStatusCode {
            operation: operation.to_string(),
            status: key.to_string(),
        }),
    }
}

/// `{name}` placeholders of a path template, in order
pub fn path_placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                names.push(&after[..end]);
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    names
}

fn check_path_placeholders(
    operation: &str,
    template: &str,
    parameters: &[ParameterDescriptor],
) -> Result<(), SpecError> {
    let placeholders = path_placeholders(template);
    let mismatch = |parameter: &str, reason: &str| SpecError::PathParameterMismatch {
        operation: operation.to_string(),
        parameter: parameter.to_string(),
        reason: reason.to_string(),
    };

    let mut seen = HashSet::new();
    for placeholder in &placeholders {
        if !seen.insert(*placeholder) {
            return Err(mismatch(*placeholder, "appears more than once in the path"));
        }
        let declared = parameters
            .iter()
            .any(|p| p.location == ParameterLocation::Path && p.name == *placeholder);
        if !declared {
            return Err(mismatch(*placeholder, "has no matching path parameter"));
        }
    }

    if let Some(orphan) = parameters
        .iter()
        .find(|p| p.location == ParameterLocation::Path && !seen.contains(p.name.as_str()))
    {
        return Err(mismatch(orphan.name.as_str(), "does not appear in the path template"));
    }
    Ok(())
}

/// `get /items/{id}` becomes `getItemsById`
fn synthesize_operation_id(operation: &RawOperation, path: &str) -> String {
    let words: Vec<String> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => format!("by {name}"),
            None => segment.to_string(),
        })
        .collect();
    to_camel_case(&format!("{} {}", operation.method, words.join(" ")))
}
