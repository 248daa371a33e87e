//! IR to JSON document serialization.
//!
//! The structural inverse of [`crate::decode`]: not perfectly lossless (the
//! collapsed multi-type primitive re-emits as `"type": "object"`), but any
//! schema built from representable scalar metadata survives a
//! serialize/decode round trip unchanged.

use serde_json::{Map, Number, Value};

use crate::ir::{MetaValue, ObjectSchema, PrimitiveType, RootSchema, Schema};

/// Render a root schema back to a JSON Schema document.
///
/// Definitions are emitted under `$defs` only when present; the root
/// schema's own keys follow at the top level.
pub fn to_json(root: &RootSchema) -> Value {
    let mut document = Map::new();
    if !root.definitions.is_empty() {
        let mut entries = Map::new();
        for (name, schema) in &root.definitions {
            entries.insert(name.clone(), Value::Object(schema_fields(schema)));
        }
        document.insert("$defs".to_string(), Value::Object(entries));
    }
    document.extend(schema_fields(&root.schema));
    Value::Object(document)
}

/// Render one schema node to a JSON object.
pub fn schema_to_json(schema: &Schema) -> Value {
    Value::Object(schema_fields(schema))
}

fn schema_fields(schema: &Schema) -> Map<String, Value> {
    let mut fields = Map::new();

    // Metadata and the nullable flag come first; `false` is never emitted.
    for (key, value) in schema.metadata() {
        fields.insert(key.clone(), meta_to_json(value));
    }
    if schema.is_nullable() {
        fields.insert("nullable".to_string(), Value::Bool(true));
    }

    match schema {
        Schema::Empty { .. } => {}
        Schema::Type { ty, .. } => {
            fields.insert("type".to_string(), Value::String(type_keyword(*ty).to_string()));
        }
        Schema::Enum { variants, .. } => {
            fields.insert(
                "enum".to_string(),
                Value::Array(variants.iter().cloned().map(Value::String).collect()),
            );
        }
        Schema::Object { object, .. } => {
            object_fields(object, &mut fields);
        }
        Schema::Array { items, .. } => {
            fields.insert("items".to_string(), schema_to_json(items));
        }
        Schema::Ref { pointer, .. } => {
            fields.insert("$ref".to_string(), Value::String(pointer.clone()));
        }
        Schema::OneOf { schemas, .. } => {
            fields.insert("oneOf".to_string(), members(schemas));
        }
        Schema::AnyOf { schemas, .. } => {
            fields.insert("anyOf".to_string(), members(schemas));
        }
        Schema::AllOf { schemas, .. } => {
            fields.insert("allOf".to_string(), members(schemas));
        }
        Schema::Not { schema, .. } => {
            fields.insert("not".to_string(), schema_to_json(schema));
        }
    }
    fields
}

/// Object keys in a fixed presentation order: `type`, `patternProperties`,
/// `additionalProperties`, `required`, `properties`. The explicit
/// `"type": "object"` keeps property-less objects decodable.
fn object_fields(object: &ObjectSchema, fields: &mut Map<String, Value>) {
    fields.insert("type".to_string(), Value::String("object".to_string()));
    if !object.pattern_properties.is_empty() {
        let mut entries = Map::new();
        for (pattern, schema) in &object.pattern_properties {
            entries.insert(pattern.clone(), schema_to_json(schema));
        }
        fields.insert("patternProperties".to_string(), Value::Object(entries));
    }
    match &object.additional_properties {
        None => {
            fields.insert("additionalProperties".to_string(), Value::Bool(false));
        }
        // The decode default: omit rather than emit `true`.
        Some(schema) if **schema == Schema::empty() => {}
        Some(schema) => {
            fields.insert("additionalProperties".to_string(), schema_to_json(schema));
        }
    }
    if !object.required.is_empty() {
        fields.insert(
            "required".to_string(),
            Value::Array(
                object
                    .required
                    .iter()
                    .cloned()
                    .map(Value::String)
                    .collect(),
            ),
        );
    }
    if !object.properties.is_empty() {
        let mut entries = Map::new();
        for (name, schema) in &object.properties {
            entries.insert(name.clone(), schema_to_json(schema));
        }
        fields.insert("properties".to_string(), Value::Object(entries));
    }
}

fn members(schemas: &[Schema]) -> Value {
    Value::Array(schemas.iter().map(schema_to_json).collect())
}

fn type_keyword(ty: PrimitiveType) -> &'static str {
    match ty {
        PrimitiveType::Boolean => "boolean",
        PrimitiveType::String => "string",
        PrimitiveType::Number => "number",
        PrimitiveType::Integer => "integer",
        PrimitiveType::ArrayType => "array",
        PrimitiveType::ObjectType => "object",
        PrimitiveType::Null => "null",
    }
}

fn meta_to_json(value: &MetaValue) -> Value {
    match value {
        MetaValue::String(text) => Value::String(text.clone()),
        MetaValue::Int(int) => Value::Number(Number::from(*int)),
        MetaValue::Float(float) => Number::from_f64(*float)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        MetaValue::Bool(flag) => Value::Bool(*flag),
        MetaValue::Opaque(text) => Value::String(text.clone()),
    }
}
