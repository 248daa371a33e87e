//! Intermediate representation for JSON Schema documents.
//!
//! The decoder normalizes a schema document into these types before the
//! generator or serializer sees it. Values are plain data: built once,
//! compared structurally, never mutated.

/// A complete schema document: named definitions plus one root schema.
///
/// Definitions come from `$defs` (or `definitions`) and keep their source
/// insertion order, which downstream consumers rely on for deterministic
/// defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RootSchema {
    /// Named, reusable schemas referenced through `Ref` pointers.
    pub definitions: Vec<(String, Schema)>,
    /// The schema described by the top-level document itself.
    pub schema: Schema,
}

/// One schema node.
///
/// Exactly one variant per structural shape the toolkit models. Every
/// variant except `Empty` carries a `nullable` flag; every variant carries
/// the unrecognized keywords of its source object as ordered metadata.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// An unconstrained schema: any JSON value.
    Empty { metadata: Metadata },
    /// A bare `type` keyword with no richer structure.
    Type {
        nullable: bool,
        metadata: Metadata,
        ty: PrimitiveType,
    },
    /// A closed set of string values.
    Enum {
        nullable: bool,
        metadata: Metadata,
        variants: Vec<String>,
    },
    /// An object with named properties.
    Object {
        nullable: bool,
        metadata: Metadata,
        object: ObjectSchema,
    },
    /// A homogeneous array.
    Array {
        nullable: bool,
        metadata: Metadata,
        items: Box<Schema>,
    },
    /// A local reference such as `#/$defs/Point`.
    Ref {
        nullable: bool,
        metadata: Metadata,
        pointer: String,
    },
    /// `oneOf` combinator.
    OneOf {
        nullable: bool,
        metadata: Metadata,
        schemas: Vec<Schema>,
    },
    /// `anyOf` combinator.
    AnyOf {
        nullable: bool,
        metadata: Metadata,
        schemas: Vec<Schema>,
    },
    /// `allOf` combinator.
    AllOf {
        nullable: bool,
        metadata: Metadata,
        schemas: Vec<Schema>,
    },
    /// `not` combinator.
    Not {
        nullable: bool,
        metadata: Metadata,
        schema: Box<Schema>,
    },
}

/// The scalar and container kinds a bare `type` keyword can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    Boolean,
    String,
    Number,
    Integer,
    /// `type: "array"` with no `items` keyword: a list of anything.
    ArrayType,
    /// A generic string-keyed object, including the collapse of ambiguous
    /// multi-type schemas.
    ObjectType,
    Null,
}

/// The structural parts of an object schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSchema {
    /// `(property name, schema)` pairs in source insertion order.
    pub properties: Vec<(String, Schema)>,
    /// Property names listed under `required`.
    pub required: Vec<String>,
    /// `None` forbids extra keys; `Some` constrains them. Absence of the
    /// keyword in source decodes to `Some(Empty)`: permitted, unconstrained.
    pub additional_properties: Option<Box<Schema>>,
    /// `(regex, schema)` pairs from `patternProperties`, in source order.
    pub pattern_properties: Vec<(String, Schema)>,
}

/// Unrecognized schema keywords, preserved verbatim in source order.
pub type Metadata = Vec<(String, MetaValue)>;

/// An opaque metadata value.
///
/// JSON scalars pass through; anything else degrades to its compact JSON
/// text and re-serializes as a string. The generator never interprets
/// these.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Compact JSON rendering of a value the scalar kinds cannot represent.
    Opaque(String),
}

impl Default for Schema {
    fn default() -> Self {
        Schema::Empty {
            metadata: Vec::new(),
        }
    }
}

impl Schema {
    /// An unconstrained schema with no metadata.
    pub fn empty() -> Self {
        Schema::default()
    }

    /// A non-nullable primitive with no metadata.
    pub fn typed(ty: PrimitiveType) -> Self {
        Schema::Type {
            nullable: false,
            metadata: Vec::new(),
            ty,
        }
    }

    /// A non-nullable object with no metadata.
    pub fn object(object: ObjectSchema) -> Self {
        Schema::Object {
            nullable: false,
            metadata: Vec::new(),
            object,
        }
    }

    /// A non-nullable array with no metadata.
    pub fn array(items: Schema) -> Self {
        Schema::Array {
            nullable: false,
            metadata: Vec::new(),
            items: Box::new(items),
        }
    }

    /// A non-nullable local reference with no metadata.
    pub fn reference(pointer: impl Into<String>) -> Self {
        Schema::Ref {
            nullable: false,
            metadata: Vec::new(),
            pointer: pointer.into(),
        }
    }

    /// A non-nullable string enum with no metadata.
    pub fn string_enum(variants: Vec<&str>) -> Self {
        Schema::Enum {
            nullable: false,
            metadata: Vec::new(),
            variants: variants.into_iter().map(String::from).collect(),
        }
    }

    /// Set the nullable flag. A no-op on `Empty`, which has none.
    pub fn with_nullable(mut self, value: bool) -> Self {
        match &mut self {
            Schema::Empty { .. } => {}
            Schema::Type { nullable, .. }
            | Schema::Enum { nullable, .. }
            | Schema::Object { nullable, .. }
            | Schema::Array { nullable, .. }
            | Schema::Ref { nullable, .. }
            | Schema::OneOf { nullable, .. }
            | Schema::AnyOf { nullable, .. }
            | Schema::AllOf { nullable, .. }
            | Schema::Not { nullable, .. } => *nullable = value,
        }
        self
    }

    /// Whether this schema admits JSON null in addition to its shape.
    pub fn is_nullable(&self) -> bool {
        match self {
            Schema::Empty { .. } => false,
            Schema::Type { nullable, .. }
            | Schema::Enum { nullable, .. }
            | Schema::Object { nullable, .. }
            | Schema::Array { nullable, .. }
            | Schema::Ref { nullable, .. }
            | Schema::OneOf { nullable, .. }
            | Schema::AnyOf { nullable, .. }
            | Schema::AllOf { nullable, .. }
            | Schema::Not { nullable, .. } => *nullable,
        }
    }

    /// The object payload when this schema is an `Object` variant.
    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            Schema::Object { object, .. } => Some(object),
            _ => None,
        }
    }

    /// The preserved non-structural keywords of this node.
    pub fn metadata(&self) -> &[(String, MetaValue)] {
        match self {
            Schema::Empty { metadata }
            | Schema::Type { metadata, .. }
            | Schema::Enum { metadata, .. }
            | Schema::Object { metadata, .. }
            | Schema::Array { metadata, .. }
            | Schema::Ref { metadata, .. }
            | Schema::OneOf { metadata, .. }
            | Schema::AnyOf { metadata, .. }
            | Schema::AllOf { metadata, .. }
            | Schema::Not { metadata, .. } => metadata,
        }
    }
}

impl Default for ObjectSchema {
    fn default() -> Self {
        ObjectSchema {
            properties: Vec::new(),
            required: Vec::new(),
            additional_properties: Some(Box::new(Schema::empty())),
            pattern_properties: Vec::new(),
        }
    }
}

impl ObjectSchema {
    /// An object schema with the given properties and required names,
    /// extra keys permitted and unconstrained.
    pub fn with_properties(properties: Vec<(&str, Schema)>, required: Vec<&str>) -> Self {
        ObjectSchema {
            properties: properties
                .into_iter()
                .map(|(name, schema)| (name.to_string(), schema))
                .collect(),
            required: required.into_iter().map(String::from).collect(),
            ..ObjectSchema::default()
        }
    }

    /// Whether `name` appears in the `required` list.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|entry| entry == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_schema_programmatically() {
        let root = RootSchema {
            definitions: vec![(
                "Status".to_string(),
                Schema::string_enum(vec!["pending", "active", "done"]),
            )],
            schema: Schema::object(ObjectSchema::with_properties(
                vec![
                    ("id", Schema::typed(PrimitiveType::String)),
                    ("status", Schema::reference("#/$defs/Status")),
                    (
                        "age",
                        Schema::typed(PrimitiveType::Integer).with_nullable(true),
                    ),
                ],
                vec!["id", "status"],
            )),
        };

        assert_eq!(root.definitions.len(), 1);
        let Schema::Object { object, .. } = &root.schema else {
            panic!("expected object root");
        };
        assert!(object.is_required("id"));
        assert!(!object.is_required("age"));
        assert!(object.properties[2].1.is_nullable());
    }

    #[test]
    fn nullable_is_inert_on_empty() {
        let schema = Schema::empty().with_nullable(true);
        assert!(!schema.is_nullable());
        assert!(schema.metadata().is_empty());
    }

    #[test]
    fn default_object_permits_extra_keys() {
        let object = ObjectSchema::default();
        assert_eq!(
            object.additional_properties.as_deref(),
            Some(&Schema::empty())
        );
    }
}
