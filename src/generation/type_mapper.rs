//! Maps Swagger parameter and schema shapes to value representations
//!
//! Three shapes are understood:
//!
//! - a primitive `type` (`string`, `integer`, `number`, `boolean`) on a
//!   non-body parameter or a response schema
//! - a schema holding only `$ref: '#/definitions/<Name>'`
//! - `type: array` whose `items` is such a reference or a primitive
//!
//! Anything else is an [`SpecError::UnsupportedSchemaShape`].

use std::collections::BTreeSet;

use serde_json::Value as JsonValue;

use crate::generation::{
    ParameterDescriptor, ParameterLocation, PrimitiveType, RawParameter, SchemaRef, SpecError,
};

const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Chooses value representations and renders them as Rust types
#[derive(Debug, Clone)]
pub struct TypeMapper {
    models_path: String,
    known_models: Option<BTreeSet<String>>,
}

impl Default for TypeMapper {
    fn default() -> Self {
        Self {
            models_path: "crate::models".to_string(),
            known_models: None,
        }
    }
}

impl TypeMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject references to definitions not in `models`
    pub fn with_known_models(mut self, models: BTreeSet<String>) -> Self {
        self.known_models = Some(models);
        self
    }

    /// Module path that named models are referenced through
    pub fn with_models_path(mut self, path: impl Into<String>) -> Self {
        self.models_path = path.into();
        self
    }

    /// Location and value type of a parameter
    pub fn map_parameter(
        &self,
        operation: &str,
        raw: &RawParameter,
    ) -> Result<(ParameterLocation, SchemaRef), SpecError> {
        let location = ParameterLocation::parse(&raw.location).ok_or_else(|| {
            SpecError::UnsupportedParameterLocation {
                operation: operation.to_string(),
                parameter: raw.name.clone(),
                location: raw.location.clone(),
            }
        })?;
        let context = format!("{operation}: parameter '{}'", raw.name);

        let value_type = match location {
            ParameterLocation::Body => self.map_body(&context, &raw.schema)?,
            ParameterLocation::Query => self.map_plain(&context, &raw.schema, true)?,
            ParameterLocation::Path | ParameterLocation::Header => {
                self.map_plain(&context, &raw.schema, false)?
            }
        };
        Ok((location, value_type))
    }

    /// A response schema: any of the three shapes
    pub fn map_schema(&self, context: &str, schema: &JsonValue) -> Result<SchemaRef, SpecError> {
        if let Some(reference) = reference_of(schema) {
            return self.named(context, reference);
        }
        match schema_type(schema) {
            Some("array") => self.map_items(context, schema),
            Some(kind) => primitive(schema, kind)
                .map(SchemaRef::Primitive)
                .ok_or_else(|| {
                    SpecError::unsupported_shape(context, format!("type '{kind}' with no model"))
                }),
            None => Err(SpecError::unsupported_shape(
                context,
                "schema has neither $ref nor type",
            )),
        }
    }

    /// A body schema: a named model or an array of one
    fn map_body(&self, context: &str, schema: &JsonValue) -> Result<SchemaRef, SpecError> {
        match self.map_schema(context, schema)? {
            SchemaRef::Primitive(_) => Err(SpecError::unsupported_shape(
                context,
                "body schema must reference a definition",
            )),
            other => Ok(other),
        }
    }

    /// A non-body parameter: a primitive, or for queries an array of primitives
    fn map_plain(
        &self,
        context: &str,
        param: &JsonValue,
        allow_array: bool,
    ) -> Result<SchemaRef, SpecError> {
        match schema_type(param) {
            Some("array") if allow_array => match self.map_items(context, param)? {
                SchemaRef::ArrayOf(inner) if inner.as_primitive().is_some() => {
                    Ok(SchemaRef::ArrayOf(inner))
                }
                _ => Err(SpecError::unsupported_shape(
                    context,
                    "array parameters must hold primitive items",
                )),
            },
            Some("array") => Err(SpecError::unsupported_shape(
                context,
                "arrays are only supported for query parameters",
            )),
            Some(kind) => primitive(param, kind)
                .map(SchemaRef::Primitive)
                .ok_or_else(|| {
                    SpecError::unsupported_shape(context, format!("unsupported type '{kind}'"))
                }),
            None => Err(SpecError::unsupported_shape(context, "missing type")),
        }
    }

    fn map_items(&self, context: &str, schema: &JsonValue) -> Result<SchemaRef, SpecError> {
        let items = schema.get("items").ok_or_else(|| {
            SpecError::unsupported_shape(context, "array declared without items")
        })?;
        if let Some(reference) = reference_of(items) {
            return Ok(SchemaRef::ArrayOf(Box::new(self.named(context, reference)?)));
        }
        match schema_type(items).and_then(|kind| primitive(items, kind)) {
            Some(p) => Ok(SchemaRef::ArrayOf(Box::new(SchemaRef::Primitive(p)))),
            None => Err(SpecError::unsupported_shape(
                context,
                "array items must be a $ref or a primitive type",
            )),
        }
    }

    fn named(&self, context: &str, reference: &str) -> Result<SchemaRef, SpecError> {
        let name = reference
            .strip_prefix(DEFINITIONS_PREFIX)
            .filter(|name| !name.is_empty() && !name.contains('/'))
            .ok_or_else(|| SpecError::unresolved(context, reference))?;

        if let Some(models) = &self.known_models {
            if !models.contains(name) {
                return Err(SpecError::unresolved(context, reference));
            }
        }
        Ok(SchemaRef::NamedModel(name.to_string()))
    }

    /// Rust spelling of a value type
    pub fn rust_type(&self, schema: &SchemaRef) -> String {
        match schema {
            SchemaRef::Primitive(p) => p.rust_type().to_string(),
            SchemaRef::NamedModel(name) => format!("{}::{name}", self.models_path),
            SchemaRef::ArrayOf(inner) => format!("Vec<{}>", self.rust_type(inner)),
        }
    }

    /// Field type of a parameter, wrapped in `Option` when optional
    pub fn field_type(&self, param: &ParameterDescriptor) -> String {
        let inner = self.rust_type(&param.value_type);
        if param.is_optional() {
            format!("Option<{inner}>")
        } else {
            inner
        }
    }
}

/// The `$ref` of a schema holding nothing else of substance
fn reference_of(schema: &JsonValue) -> Option<&str> {
    let object = schema.as_object()?;
    let reference = object.get("$ref")?.as_str()?;
    let only_annotations = object
        .keys()
        .all(|key| matches!(key.as_str(), "$ref" | "description" | "title") || key.starts_with("x-"));
    only_annotations.then_some(reference)
}

fn schema_type(schema: &JsonValue) -> Option<&str> {
    schema.get("type").and_then(JsonValue::as_str)
}

fn primitive(schema: &JsonValue, kind: &str) -> Option<PrimitiveType> {
    let format = schema.get("format").and_then(JsonValue::as_str);
    PrimitiveType::from_swagger(kind, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::Constraints;
    use serde_json::json;

    fn raw(name: &str, location: &str, schema: JsonValue) -> RawParameter {
        RawParameter {
            name: name.to_string(),
            location: location.to_string(),
            required: false,
            description: None,
            schema,
        }
    }

    #[test]
    fn test_primitive_parameters() {
        let mapper = TypeMapper::new();
        let (location, value) = mapper
            .map_parameter("getItem", &raw("id", "path", json!({"type": "integer", "format": "int32"})))
            .unwrap();
        assert_eq!(location, ParameterLocation::Path);
        assert_eq!(value, SchemaRef::Primitive(PrimitiveType::Int32));
        assert_eq!(mapper.rust_type(&value), "i32");
    }

    #[test]
    fn test_body_reference_and_array_of_reference() {
        let mapper = TypeMapper::new();
        let (_, single) = mapper
            .map_parameter("createItem", &raw("body", "body", json!({"$ref": "#/definitions/Item"})))
            .unwrap();
        assert_eq!(mapper.rust_type(&single), "crate::models::Item");

        let (_, many) = mapper
            .map_parameter(
                "createItems",
                &raw("body", "body", json!({"type": "array", "items": {"$ref": "#/definitions/Item"}})),
            )
            .unwrap();
        assert_eq!(mapper.rust_type(&many), "Vec<crate::models::Item>");
    }

    #[test]
    fn test_form_data_is_unsupported_location() {
        let err = TypeMapper::new()
            .map_parameter("upload", &raw("file", "formData", json!({"type": "file"})))
            .unwrap_err();
        assert!(matches!(err, SpecError::UnsupportedParameterLocation { location, .. } if location == "formData"));
    }

    #[test]
    fn test_unsupported_shapes() {
        let mapper = TypeMapper::new();
        let cases = [
            raw("body", "body", json!({"type": "object", "properties": {"a": {"type": "string"}}})),
            raw("body", "body", json!({"type": "string"})),
            raw("tags", "query", json!({"type": "array"})),
            raw("ids", "path", json!({"type": "array", "items": {"type": "string"}})),
            raw("q", "query", json!({"description": "no type"})),
        ];
        for case in &cases {
            let err = mapper.map_parameter("op", case).unwrap_err();
            assert!(
                matches!(err, SpecError::UnsupportedSchemaShape { .. }),
                "{case:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_query_array_of_primitives() {
        let (_, value) = TypeMapper::new()
            .map_parameter("find", &raw("tags", "query", json!({"type": "array", "items": {"type": "string"}})))
            .unwrap();
        assert_eq!(
            value,
            SchemaRef::ArrayOf(Box::new(SchemaRef::Primitive(PrimitiveType::String)))
        );
    }

    #[test]
    fn test_unknown_definition_is_unresolved() {
        let mapper = TypeMapper::new().with_known_models(["Item".to_string()].into());
        assert!(mapper.map_schema("r", &json!({"$ref": "#/definitions/Item"})).is_ok());
        let err = mapper
            .map_schema("r", &json!({"$ref": "#/definitions/Missing"}))
            .unwrap_err();
        assert!(matches!(err, SpecError::UnresolvedReference { .. }));
        assert!(mapper.map_schema("r", &json!({"$ref": "other.json#/Item"})).is_err());
    }

    #[test]
    fn test_field_type_optionality() {
        let mapper = TypeMapper::new();
        let mut param = ParameterDescriptor {
            name: "limit".to_string(),
            location: ParameterLocation::Query,
            value_type: SchemaRef::Primitive(PrimitiveType::Int64),
            required: false,
            constraints: Constraints::default(),
            description: None,
        };
        assert_eq!(mapper.field_type(&param), "Option<i64>");
        param.required = true;
        assert_eq!(mapper.field_type(&param), "i64");
    }
}
