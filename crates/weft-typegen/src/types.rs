//! Type registration and type-reference resolution.
//!
//! `collect_types` walks a schema and registers a named Gleam type for
//! every object and enum it finds, synthesizing names for nested schemas
//! from the parent name plus a role suffix. `type_text` is the read side:
//! it resolves a schema to the Gleam type expression that refers to it,
//! flipping feature flags for `Dynamic`, `Option`, and `Dict` as they
//! appear.

use std::collections::BTreeSet;

use weft_jsonschema::{ObjectSchema, PrimitiveType, Schema};

use crate::error::CodegenError;
use crate::generator::Generator;
use crate::names;

impl Generator {
    /// Register the named types a schema gives rise to. `name` is already
    /// in type case.
    pub(crate) fn collect_types(&mut self, name: &str, schema: &Schema) -> Result<(), CodegenError> {
        match schema {
            Schema::Object { object, .. } => self.record_type(name, object),
            Schema::Enum { variants, .. } => self.enum_type(name, variants),
            Schema::Array { items, .. } => self.collect_types(&format!("{name}Item"), items),
            Schema::OneOf { schemas, .. }
            | Schema::AnyOf { schemas, .. }
            | Schema::AllOf { schemas, .. } => {
                for member in schemas {
                    self.collect_types(&format!("{name}Element"), member)?;
                }
                Ok(())
            }
            Schema::Not { schema, .. } => self.collect_types(&format!("{name}Not"), schema),
            Schema::Empty { .. } | Schema::Type { .. } | Schema::Ref { .. } => Ok(()),
        }
    }

    /// The Gleam type expression that refers to `schema`, assuming its
    /// named types were registered under `name`.
    pub(crate) fn type_text(&mut self, name: &str, schema: &Schema) -> String {
        let core = match schema {
            Schema::Empty { .. } => {
                self.features.dynamic = true;
                "Dynamic".to_string()
            }
            Schema::Type { ty, .. } => match ty {
                PrimitiveType::Boolean => "Bool".to_string(),
                PrimitiveType::String => "String".to_string(),
                PrimitiveType::Integer => "Int".to_string(),
                PrimitiveType::Number => "Float".to_string(),
                PrimitiveType::Null => "Nil".to_string(),
                PrimitiveType::ArrayType => {
                    self.features.dynamic = true;
                    "List(Dynamic)".to_string()
                }
                PrimitiveType::ObjectType => {
                    self.features.dynamic = true;
                    self.features.dict = true;
                    "Dict(String, Dynamic)".to_string()
                }
            },
            Schema::Enum { .. } | Schema::Object { .. } => name.to_string(),
            Schema::Array { items, .. } => {
                let inner = self.type_text(&format!("{name}Item"), items);
                format!("List({inner})")
            }
            Schema::Ref { pointer, .. } => names::ref_target(pointer),
            Schema::OneOf { schemas, .. }
            | Schema::AnyOf { schemas, .. }
            | Schema::AllOf { schemas, .. } => match schemas.first() {
                Some(first) => self.type_text(&format!("{name}Element"), first),
                None => {
                    self.features.dynamic = true;
                    "Dynamic".to_string()
                }
            },
            Schema::Not { schema, .. } => self.type_text(&format!("{name}Not"), schema),
        };
        if schema.is_nullable() {
            self.features.option = true;
            format!("Option({core})")
        } else {
            core
        }
    }

    fn record_type(&mut self, name: &str, object: &ObjectSchema) -> Result<(), CodegenError> {
        self.register_constructor(name)?;

        // Two property names can collapse to one field name.
        let mut claimed = BTreeSet::new();
        for (property, _) in &object.properties {
            let field = names::field_name(property);
            if !claimed.insert(field.clone()) {
                return Err(CodegenError::DuplicateProperty {
                    type_name: name.to_string(),
                    constructor: name.to_string(),
                    field,
                });
            }
        }

        for (property, schema) in &object.properties {
            self.collect_types(&format!("{name}{}", names::type_name(property)), schema)?;
        }

        // Constructor arguments are sorted by property name so reordering
        // the document does not reorder the type.
        let mut sorted: Vec<&(String, Schema)> = object.properties.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        let mut fields = Vec::new();
        for (property, schema) in sorted {
            let nested = format!("{name}{}", names::type_name(property));
            let mut ty = self.type_text(&nested, schema);
            if !object.is_required(property) && !schema.is_nullable() {
                self.features.option = true;
                ty = format!("Option({ty})");
            }
            fields.push(format!("{}: {ty}", names::field_name(property)));
        }

        let text = if fields.is_empty() {
            format!("pub type {name} {{\n  {name}\n}}")
        } else {
            format!("pub type {name} {{\n  {name}({})\n}}", fields.join(", "))
        };
        self.register_type(name, text)
    }

    fn enum_type(&mut self, name: &str, variants: &[String]) -> Result<(), CodegenError> {
        if variants.is_empty() {
            return Err(CodegenError::EmptyEnum(name.to_string()));
        }
        let mut lines = Vec::new();
        for variant in variants {
            let constructor = names::type_name(variant);
            self.register_constructor(&constructor)?;
            lines.push(format!("  {constructor}"));
        }
        let text = format!("pub type {name} {{\n{}\n}}", lines.join("\n"));
        self.register_type(name, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(schema: &Schema) -> String {
        Generator::new().type_text("T", schema)
    }

    #[test]
    fn primitives_resolve_to_builtin_types() {
        assert_eq!(resolve(&Schema::typed(PrimitiveType::Boolean)), "Bool");
        assert_eq!(resolve(&Schema::typed(PrimitiveType::Integer)), "Int");
        assert_eq!(resolve(&Schema::typed(PrimitiveType::Number)), "Float");
        assert_eq!(resolve(&Schema::typed(PrimitiveType::Null)), "Nil");
        assert_eq!(
            resolve(&Schema::typed(PrimitiveType::ObjectType)),
            "Dict(String, Dynamic)"
        );
    }

    #[test]
    fn nullable_wraps_in_option() {
        let schema = Schema::typed(PrimitiveType::String).with_nullable(true);
        assert_eq!(resolve(&schema), "Option(String)");
    }

    #[test]
    fn arrays_nest() {
        let schema = Schema::array(Schema::array(Schema::typed(PrimitiveType::Integer)));
        assert_eq!(resolve(&schema), "List(List(Int))");
    }

    #[test]
    fn references_resolve_to_their_target() {
        assert_eq!(resolve(&Schema::reference("#/$defs/point")), "Point");
    }

    #[test]
    fn record_fields_are_sorted_by_property_name() {
        let mut generator = Generator::new();
        let object = ObjectSchema::with_properties(
            vec![
                ("zulu", Schema::typed(PrimitiveType::String)),
                ("alpha", Schema::typed(PrimitiveType::Integer)),
            ],
            vec!["zulu", "alpha"],
        );
        generator.collect_types("Pair", &Schema::object(object)).unwrap();
        assert_eq!(
            generator.types["Pair"],
            "pub type Pair {\n  Pair(alpha: Int, zulu: String)\n}"
        );
    }

    #[test]
    fn colliding_field_names_are_rejected() {
        let object = ObjectSchema::with_properties(
            vec![
                ("fooBar", Schema::typed(PrimitiveType::String)),
                ("foo_bar", Schema::typed(PrimitiveType::Integer)),
            ],
            vec![],
        );
        let error = Generator::new()
            .collect_types("Clash", &Schema::object(object))
            .unwrap_err();
        assert_eq!(
            error,
            CodegenError::DuplicateProperty {
                type_name: "Clash".to_string(),
                constructor: "Clash".to_string(),
                field: "foo_bar".to_string(),
            }
        );
    }

    #[test]
    fn variant_names_collide_across_types() {
        let mut generator = Generator::new();
        generator
            .collect_types("Status", &Schema::string_enum(vec!["point"]))
            .unwrap();
        let error = generator
            .collect_types("Point", &Schema::object(ObjectSchema::default()))
            .unwrap_err();
        assert_eq!(error, CodegenError::DuplicateConstructor("Point".to_string()));
    }
}
