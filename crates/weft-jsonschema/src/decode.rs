//! JSON document to IR decoding.
//!
//! A schema node is classified by a fixed keyword priority, tried in order,
//! first match wins: `enum`, `$ref`, `items`, `properties`, `oneOf`,
//! `anyOf`, `allOf`, `not`, `type`, then the unconstrained fallback. Failures
//! never panic: each mismatch is recorded with its document path, lists of
//! sub-schemas accumulate the errors of every element, and a single node's
//! own shape decoding stops at its first mismatch.

use serde_json::{Map, Value};

use crate::ir::{MetaValue, Metadata, ObjectSchema, PrimitiveType, RootSchema, Schema};

/// Keywords claimed by the structural decoder; everything else on a node is
/// carried through as opaque metadata.
const RESERVED: &[&str] = &[
    "type",
    "enum",
    "$ref",
    "items",
    "properties",
    "required",
    "additionalProperties",
    "patternProperties",
    "oneOf",
    "anyOf",
    "allOf",
    "not",
    "$defs",
    "definitions",
    "nullable",
];

/// One structural mismatch, tagged with where in the document it happened.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{path}: expected {expected}, found {found}")]
pub struct DecodeError {
    /// JSON-pointer style location, e.g. `#/$defs/Point/properties/x`.
    pub path: String,
    pub expected: String,
    pub found: String,
}

/// Every mismatch found while decoding one document. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid schema document: {}", describe(.0))]
pub struct DecodeErrors(pub Vec<DecodeError>);

fn describe(errors: &[DecodeError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Decode a JSON Schema document into the IR.
///
/// The top-level value must be an object. Definitions are read from `$defs`
/// when present, from `definitions` otherwise, and the top-level object is
/// then decoded as the root schema.
pub fn from_json(value: &Value) -> Result<RootSchema, DecodeErrors> {
    let mut decoder = Decoder { path: Vec::new() };
    let Some(object) = value.as_object() else {
        return Err(DecodeErrors(vec![decoder.mismatch("an object", value)]));
    };

    let mut errors = Vec::new();
    let mut definitions = Vec::new();
    let defs = object
        .get("$defs")
        .map(|entries| ("$defs", entries))
        .or_else(|| object.get("definitions").map(|entries| ("definitions", entries)));
    if let Some((keyword, entries)) = defs {
        decoder.scoped(keyword, |decoder| match entries.as_object() {
            Some(entries) => {
                for (name, entry) in entries {
                    match decoder.scoped(name, |decoder| decoder.schema(entry)) {
                        Ok(schema) => definitions.push((name.clone(), schema)),
                        Err(mut found) => errors.append(&mut found),
                    }
                }
            }
            None => errors.push(decoder.mismatch("an object", entries)),
        });
    }

    let root = match decoder.schema(value) {
        Ok(schema) => Some(schema),
        Err(mut found) => {
            errors.append(&mut found);
            None
        }
    };
    match (root, errors.is_empty()) {
        (Some(schema), true) => Ok(RootSchema {
            definitions,
            schema,
        }),
        _ => Err(DecodeErrors(errors)),
    }
}

struct Decoder {
    path: Vec<String>,
}

impl Decoder {
    fn scoped<T>(&mut self, segment: &str, body: impl FnOnce(&mut Self) -> T) -> T {
        self.path.push(segment.to_string());
        let out = body(self);
        self.path.pop();
        out
    }

    fn pointer(&self) -> String {
        let mut out = String::from("#");
        for segment in &self.path {
            out.push('/');
            out.push_str(segment);
        }
        out
    }

    fn mismatch(&self, expected: &str, found: &Value) -> DecodeError {
        DecodeError {
            path: self.pointer(),
            expected: expected.to_string(),
            found: kind_of(found).to_string(),
        }
    }

    fn schema(&mut self, value: &Value) -> Result<Schema, Vec<DecodeError>> {
        let Some(object) = value.as_object() else {
            return Err(vec![self.mismatch("an object", value)]);
        };
        let nullable = nullability(object);
        let metadata = metadata_of(object);

        // Fixed keyword priority: a node carrying both `type` and
        // `properties` must decode as an object, and `enum` beats everything
        // as the most specific constraint.
        if let Some(variants) = object.get("enum") {
            return self
                .scoped("enum", |decoder| decoder.enum_variants(variants))
                .map(|variants| Schema::Enum {
                    nullable,
                    metadata,
                    variants,
                });
        }
        if let Some(pointer) = object.get("$ref") {
            let Some(pointer) = pointer.as_str() else {
                return Err(vec![
                    self.scoped("$ref", |decoder| decoder.mismatch("a string", pointer)),
                ]);
            };
            return Ok(Schema::Ref {
                nullable,
                metadata,
                pointer: pointer.to_string(),
            });
        }
        if let Some(items) = object.get("items") {
            return self
                .scoped("items", |decoder| decoder.schema(items))
                .map(|items| Schema::Array {
                    nullable,
                    metadata,
                    items: Box::new(items),
                });
        }
        if object.get("properties").is_some() {
            return self.object_schema(object).map(|object| Schema::Object {
                nullable,
                metadata,
                object,
            });
        }
        if let Some(members) = object.get("oneOf") {
            return self
                .scoped("oneOf", |decoder| decoder.members(members))
                .map(|schemas| Schema::OneOf {
                    nullable,
                    metadata,
                    schemas,
                });
        }
        if let Some(members) = object.get("anyOf") {
            return self
                .scoped("anyOf", |decoder| decoder.members(members))
                .map(|schemas| Schema::AnyOf {
                    nullable,
                    metadata,
                    schemas,
                });
        }
        if let Some(members) = object.get("allOf") {
            return self
                .scoped("allOf", |decoder| decoder.members(members))
                .map(|schemas| Schema::AllOf {
                    nullable,
                    metadata,
                    schemas,
                });
        }
        if let Some(negated) = object.get("not") {
            return self
                .scoped("not", |decoder| decoder.schema(negated))
                .map(|schema| Schema::Not {
                    nullable,
                    metadata,
                    schema: Box::new(schema),
                });
        }
        if let Some(keyword) = object.get("type") {
            return self.typed(object, keyword, nullable, metadata);
        }
        Ok(Schema::Empty { metadata })
    }

    fn enum_variants(&mut self, value: &Value) -> Result<Vec<String>, Vec<DecodeError>> {
        let Some(entries) = value.as_array() else {
            return Err(vec![self.mismatch("an array of strings", value)]);
        };
        let mut variants = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            match entry.as_str() {
                Some(variant) => variants.push(variant.to_string()),
                None => {
                    return Err(vec![self.scoped(&index.to_string(), |decoder| {
                        decoder.mismatch("a string", entry)
                    })]);
                }
            }
        }
        Ok(variants)
    }

    fn members(&mut self, value: &Value) -> Result<Vec<Schema>, Vec<DecodeError>> {
        let Some(entries) = value.as_array() else {
            return Err(vec![self.mismatch("an array of schemas", value)]);
        };
        let mut schemas = Vec::new();
        let mut errors = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            match self.scoped(&index.to_string(), |decoder| decoder.schema(entry)) {
                Ok(schema) => schemas.push(schema),
                Err(mut found) => errors.append(&mut found),
            }
        }
        if errors.is_empty() {
            Ok(schemas)
        } else {
            Err(errors)
        }
    }

    fn object_schema(
        &mut self,
        object: &Map<String, Value>,
    ) -> Result<ObjectSchema, Vec<DecodeError>> {
        let mut errors = Vec::new();

        let mut properties = Vec::new();
        if let Some(value) = object.get("properties") {
            self.scoped("properties", |decoder| match value.as_object() {
                Some(entries) => {
                    for (name, entry) in entries {
                        match decoder.scoped(name, |decoder| decoder.schema(entry)) {
                            Ok(schema) => properties.push((name.clone(), schema)),
                            Err(mut found) => errors.append(&mut found),
                        }
                    }
                }
                None => errors.push(decoder.mismatch("an object", value)),
            });
        }

        let mut required = Vec::new();
        if let Some(value) = object.get("required") {
            self.scoped("required", |decoder| match value.as_array() {
                Some(entries) => {
                    for entry in entries {
                        match entry.as_str() {
                            Some(name) => required.push(name.to_string()),
                            None => errors.push(decoder.mismatch("a string", entry)),
                        }
                    }
                }
                None => errors.push(decoder.mismatch("an array of strings", value)),
            });
        }

        let additional_properties = match object.get("additionalProperties") {
            // Absent or `true`: extra keys permitted and unconstrained.
            None | Some(Value::Bool(true)) => Some(Box::new(Schema::empty())),
            Some(Value::Bool(false)) => None,
            Some(value) => {
                match self.scoped("additionalProperties", |decoder| decoder.schema(value)) {
                    Ok(schema) => Some(Box::new(schema)),
                    Err(mut found) => {
                        errors.append(&mut found);
                        Some(Box::new(Schema::empty()))
                    }
                }
            }
        };

        let mut pattern_properties = Vec::new();
        if let Some(value) = object.get("patternProperties") {
            self.scoped("patternProperties", |decoder| match value.as_object() {
                Some(entries) => {
                    for (pattern, entry) in entries {
                        match decoder.scoped(pattern, |decoder| decoder.schema(entry)) {
                            Ok(schema) => pattern_properties.push((pattern.clone(), schema)),
                            Err(mut found) => errors.append(&mut found),
                        }
                    }
                }
                None => errors.push(decoder.mismatch("an object", value)),
            });
        }

        if errors.is_empty() {
            Ok(ObjectSchema {
                properties,
                required,
                additional_properties,
                pattern_properties,
            })
        } else {
            Err(errors)
        }
    }

    fn typed(
        &mut self,
        object: &Map<String, Value>,
        keyword: &Value,
        nullable: bool,
        metadata: Metadata,
    ) -> Result<Schema, Vec<DecodeError>> {
        match keyword {
            Value::String(name) => self.primitive(object, name, nullable, metadata),
            Value::Array(entries) => {
                let mut names = Vec::new();
                for (index, entry) in entries.iter().enumerate() {
                    match entry.as_str() {
                        Some(name) => names.push(name),
                        None => {
                            return Err(vec![self.scoped("type", |decoder| {
                                decoder.scoped(&index.to_string(), |decoder| {
                                    decoder.mismatch("a string", entry)
                                })
                            })]);
                        }
                    }
                }
                let non_null: Vec<&str> = names
                    .iter()
                    .copied()
                    .filter(|name| *name != "null")
                    .collect();
                match non_null.as_slice() {
                    [] => Ok(Schema::Type {
                        nullable,
                        metadata,
                        ty: PrimitiveType::Null,
                    }),
                    [single] => self.primitive(object, single, nullable, metadata),
                    // Ambiguous multi-type schemas are not modeled precisely;
                    // they collapse to the generic object primitive.
                    _ => Ok(Schema::Type {
                        nullable,
                        metadata,
                        ty: PrimitiveType::ObjectType,
                    }),
                }
            }
            other => Err(vec![self.scoped("type", |decoder| {
                decoder.mismatch("a string or an array", other)
            })]),
        }
    }

    fn primitive(
        &mut self,
        object: &Map<String, Value>,
        name: &str,
        nullable: bool,
        metadata: Metadata,
    ) -> Result<Schema, Vec<DecodeError>> {
        let ty = match name {
            "boolean" => PrimitiveType::Boolean,
            "string" => PrimitiveType::String,
            "number" => PrimitiveType::Number,
            "integer" => PrimitiveType::Integer,
            "array" => PrimitiveType::ArrayType,
            "null" => PrimitiveType::Null,
            "object" => {
                // An object typed node still reads required/additional/pattern
                // keys even when it declares no properties.
                return self.object_schema(object).map(|object| Schema::Object {
                    nullable,
                    metadata,
                    object,
                });
            }
            other => {
                return Err(vec![self.scoped("type", |decoder| DecodeError {
                    path: decoder.pointer(),
                    expected: "a JSON Schema type name".to_string(),
                    found: format!("\"{other}\""),
                })]);
            }
        };
        Ok(Schema::Type {
            nullable,
            metadata,
            ty,
        })
    }
}

/// Explicit `nullable` key when present, otherwise `true` when a `type`
/// array mentions `"null"`.
fn nullability(object: &Map<String, Value>) -> bool {
    if let Some(flag) = object.get("nullable").and_then(Value::as_bool) {
        return flag;
    }
    object
        .get("type")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().any(|entry| entry.as_str() == Some("null")))
        .unwrap_or(false)
}

fn metadata_of(object: &Map<String, Value>) -> Metadata {
    object
        .iter()
        .filter(|(key, _)| !RESERVED.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), meta_value(value)))
        .collect()
}

fn meta_value(value: &Value) -> MetaValue {
    match value {
        Value::String(text) => MetaValue::String(text.clone()),
        Value::Bool(flag) => MetaValue::Bool(*flag),
        Value::Number(number) => match number.as_i64() {
            Some(int) => MetaValue::Int(int),
            None => MetaValue::Float(number.as_f64().unwrap_or(f64::NAN)),
        },
        other => MetaValue::Opaque(other.to_string()),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_beats_bare_type() {
        let root = from_json(&json!({
            "type": "object",
            "properties": { "id": { "type": "string" } },
            "required": ["id"]
        }))
        .unwrap();

        let Schema::Object { object, .. } = &root.schema else {
            panic!("expected object, got {:?}", root.schema);
        };
        assert_eq!(object.properties.len(), 1);
        assert!(object.is_required("id"));
    }

    #[test]
    fn enum_beats_type() {
        let root = from_json(&json!({
            "type": "string",
            "enum": ["a", "b"]
        }))
        .unwrap();
        assert_eq!(
            root.schema,
            Schema::string_enum(vec!["a", "b"]),
        );
    }

    #[test]
    fn nullable_inferred_from_type_array() {
        let root = from_json(&json!({ "type": ["string", "null"] })).unwrap();
        assert_eq!(
            root.schema,
            Schema::typed(PrimitiveType::String).with_nullable(true)
        );
    }

    #[test]
    fn explicit_nullable_key_wins() {
        let root = from_json(&json!({ "type": "integer", "nullable": true })).unwrap();
        assert!(root.schema.is_nullable());
    }

    #[test]
    fn multi_type_collapses_to_object() {
        let root = from_json(&json!({ "type": ["string", "integer"] })).unwrap();
        assert_eq!(root.schema, Schema::typed(PrimitiveType::ObjectType));
    }

    #[test]
    fn additional_properties_defaults_to_permitted() {
        let root = from_json(&json!({ "type": "object" })).unwrap();
        let Schema::Object { object, .. } = &root.schema else {
            panic!("expected object");
        };
        assert_eq!(
            object.additional_properties.as_deref(),
            Some(&Schema::empty())
        );

        let root = from_json(&json!({ "type": "object", "additionalProperties": false })).unwrap();
        let Schema::Object { object, .. } = &root.schema else {
            panic!("expected object");
        };
        assert_eq!(object.additional_properties, None);
    }

    #[test]
    fn defs_preferred_over_definitions() {
        let root = from_json(&json!({
            "$defs": { "A": { "type": "string" } },
            "definitions": { "B": { "type": "integer" } }
        }))
        .unwrap();
        assert_eq!(root.definitions.len(), 1);
        assert_eq!(root.definitions[0].0, "A");
    }

    #[test]
    fn unknown_keywords_become_metadata() {
        let root = from_json(&json!({
            "type": "string",
            "title": "Name",
            "minLength": 1
        }))
        .unwrap();
        assert_eq!(
            root.schema.metadata(),
            &[
                ("title".to_string(), MetaValue::String("Name".to_string())),
                ("minLength".to_string(), MetaValue::Int(1)),
            ]
        );
    }

    #[test]
    fn errors_accumulate_across_properties() {
        let errors = from_json(&json!({
            "properties": {
                "a": 1,
                "b": true
            }
        }))
        .unwrap_err();
        assert_eq!(errors.0.len(), 2);
        assert_eq!(errors.0[0].path, "#/properties/a");
        assert_eq!(errors.0[1].path, "#/properties/b");
        assert_eq!(errors.0[0].expected, "an object");
        assert_eq!(errors.0[0].found, "a number");
    }

    #[test]
    fn top_level_must_be_an_object() {
        let errors = from_json(&json!([1, 2])).unwrap_err();
        assert_eq!(errors.0[0].path, "#");
        assert_eq!(errors.0[0].found, "an array");
    }

    #[test]
    fn nested_definition_error_has_full_path() {
        let errors = from_json(&json!({
            "$defs": { "Point": { "properties": { "x": { "type": 3 } } } }
        }))
        .unwrap_err();
        assert_eq!(errors.0.len(), 1);
        assert_eq!(errors.0[0].path, "#/$defs/Point/properties/x/type");
    }
}
