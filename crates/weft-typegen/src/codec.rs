//! Decoder and encoder expression emission.
//!
//! Decoders compose `gleam/dynamic/decode` combinators; encoders compose
//! `gleam/json` constructors around an access path rooted at the function
//! argument. Both walk the schema with the same synthesized names as type
//! registration so references between the three outputs line up.

use weft_jsonschema::{ObjectSchema, PrimitiveType, Schema};

use crate::error::CodegenError;
use crate::generator::Generator;
use crate::names;

impl Generator {
    /// The decoder expression for `schema`, nullability included. `indent`
    /// is the column at which the expression's first line already sits.
    pub(crate) fn decoder_expr(
        &mut self,
        name: &str,
        schema: &Schema,
        indent: usize,
    ) -> Result<String, CodegenError> {
        let core = self.decoder_core(name, schema, indent)?;
        if schema.is_nullable() {
            self.features.option = true;
            Ok(format!("decode.optional({core})"))
        } else {
            Ok(core)
        }
    }

    fn decoder_core(
        &mut self,
        name: &str,
        schema: &Schema,
        indent: usize,
    ) -> Result<String, CodegenError> {
        match schema {
            Schema::Empty { .. } => {
                self.features.dynamic = true;
                Ok("decode.dynamic".to_string())
            }
            Schema::Type { ty, .. } => Ok(match ty {
                PrimitiveType::Boolean => "decode.bool".to_string(),
                PrimitiveType::String => "decode.string".to_string(),
                PrimitiveType::Integer => "decode.int".to_string(),
                PrimitiveType::Number => "decode.float".to_string(),
                PrimitiveType::Null => "decode.success(Nil)".to_string(),
                PrimitiveType::ArrayType => {
                    self.features.dynamic = true;
                    "decode.list(decode.dynamic)".to_string()
                }
                PrimitiveType::ObjectType => {
                    self.features.dynamic = true;
                    self.features.dict = true;
                    "decode.dict(decode.string, decode.dynamic)".to_string()
                }
            }),
            Schema::Enum { variants, .. } => self.enum_decoder(name, variants, indent),
            Schema::Object { object, .. } => self.object_decoder(name, object, indent),
            Schema::Array { items, .. } => {
                let inner = self.decoder_expr(&format!("{name}Item"), items, indent)?;
                Ok(format!("decode.list({inner})"))
            }
            Schema::Ref { pointer, .. } => {
                let target = names::ref_target(pointer);
                Ok(format!("{}()", names::decoder_name(&target)))
            }
            Schema::OneOf { schemas, .. }
            | Schema::AnyOf { schemas, .. }
            | Schema::AllOf { schemas, .. } => match schemas.first() {
                Some(first) => self.decoder_expr(&format!("{name}Element"), first, indent),
                None => {
                    self.features.dynamic = true;
                    Ok("decode.dynamic".to_string())
                }
            },
            Schema::Not { schema, .. } => {
                self.decoder_expr(&format!("{name}Not"), schema, indent)
            }
        }
    }

    fn enum_decoder(
        &mut self,
        name: &str,
        variants: &[String],
        indent: usize,
    ) -> Result<String, CodegenError> {
        let Some(first) = variants.first() else {
            return Err(CodegenError::EmptyEnum(name.to_string()));
        };
        let zero = names::type_name(first);
        let pad = " ".repeat(indent);
        let mut out = String::from("decode.string\n");
        out.push_str(&format!("{pad}|> decode.then(fn(variant) {{\n"));
        out.push_str(&format!("{pad}  case variant {{\n"));
        for variant in variants {
            out.push_str(&format!(
                "{pad}    \"{variant}\" -> decode.success({})\n",
                names::type_name(variant)
            ));
        }
        out.push_str(&format!("{pad}    _ -> decode.failure({zero}, \"{name}\")\n"));
        out.push_str(&format!("{pad}  }}\n"));
        out.push_str(&format!("{pad}}})"));
        Ok(out)
    }

    fn object_decoder(
        &mut self,
        name: &str,
        object: &ObjectSchema,
        indent: usize,
    ) -> Result<String, CodegenError> {
        let pad = " ".repeat(indent);
        let inner = " ".repeat(indent + 2);
        let mut out = String::from("{\n");
        let mut arguments = Vec::new();
        for (property, schema) in &object.properties {
            let field = names::field_name(property);
            let nested = format!("{name}{}", names::type_name(property));
            let line = if object.is_required(property) {
                let decoder = self.decoder_expr(&nested, schema, indent + 2)?;
                format!("use {field} <- decode.field(\"{property}\", {decoder})")
            } else {
                // Absent and null both land on None.
                self.features.option = true;
                let core = self.decoder_core(&nested, schema, indent + 2)?;
                format!(
                    "use {field} <- decode.optional_field(\"{property}\", None, decode.optional({core}))"
                )
            };
            out.push_str(&format!("{inner}{line}\n"));
            arguments.push(format!("{field}: {field}"));
        }
        let construct = if arguments.is_empty() {
            name.to_string()
        } else {
            format!("{name}({})", arguments.join(", "))
        };
        out.push_str(&format!("{inner}decode.success({construct})\n"));
        out.push_str(&format!("{pad}}}"));
        Ok(out)
    }

    /// The encoder expression serializing the value at `path`.
    pub(crate) fn encoder_expr(
        &mut self,
        name: &str,
        schema: &Schema,
        path: &str,
        indent: usize,
    ) -> Result<String, CodegenError> {
        if schema.is_nullable() {
            self.features.option = true;
            let core = self.encoder_core(name, schema, "inner", indent)?;
            Ok(format!("json.nullable({path}, fn(inner) {{ {core} }})"))
        } else {
            self.encoder_core(name, schema, path, indent)
        }
    }

    fn encoder_core(
        &mut self,
        name: &str,
        schema: &Schema,
        path: &str,
        indent: usize,
    ) -> Result<String, CodegenError> {
        match schema {
            // Opaque values inside a document have no schema to re-encode
            // under; emit a null placeholder. Entry points reject earlier.
            Schema::Empty { .. } => Ok("json.null()".to_string()),
            Schema::Type { ty, .. } => Ok(match ty {
                PrimitiveType::Boolean => format!("json.bool({path})"),
                PrimitiveType::String => format!("json.string({path})"),
                PrimitiveType::Integer => format!("json.int({path})"),
                PrimitiveType::Number => format!("json.float({path})"),
                PrimitiveType::Null => "json.null()".to_string(),
                PrimitiveType::ArrayType => {
                    format!("json.array({path}, fn(_) {{ json.null() }})")
                }
                PrimitiveType::ObjectType => {
                    self.features.dynamic = true;
                    self.features.dict = true;
                    self.features.dict_encode = true;
                    format!("dict_to_json({path})")
                }
            }),
            Schema::Enum { variants, .. } => self.enum_encoder(name, variants, path, indent),
            Schema::Object { object, .. } => self.object_encoder(name, object, path, indent),
            Schema::Array { items, .. } => {
                let inner = self.encoder_expr(&format!("{name}Item"), items, "item", indent)?;
                Ok(format!("json.array({path}, fn(item) {{ {inner} }})"))
            }
            Schema::Ref { pointer, .. } => {
                let target = names::ref_target(pointer);
                Ok(format!("{}({path})", names::encoder_name(&target)))
            }
            Schema::OneOf { schemas, .. }
            | Schema::AnyOf { schemas, .. }
            | Schema::AllOf { schemas, .. } => match schemas.first() {
                Some(member) => self.encoder_expr(&format!("{name}Element"), member, path, indent),
                None => Ok("json.null()".to_string()),
            },
            Schema::Not { schema, .. } => {
                self.encoder_expr(&format!("{name}Not"), schema, path, indent)
            }
        }
    }

    fn enum_encoder(
        &mut self,
        name: &str,
        variants: &[String],
        path: &str,
        indent: usize,
    ) -> Result<String, CodegenError> {
        if variants.is_empty() {
            return Err(CodegenError::EmptyEnum(name.to_string()));
        }
        let pad = " ".repeat(indent);
        let mut out = format!("case {path} {{\n");
        for variant in variants {
            out.push_str(&format!(
                "{pad}  {} -> json.string(\"{variant}\")\n",
                names::type_name(variant)
            ));
        }
        out.push_str(&format!("{pad}}}"));
        Ok(out)
    }

    fn object_encoder(
        &mut self,
        name: &str,
        object: &ObjectSchema,
        path: &str,
        indent: usize,
    ) -> Result<String, CodegenError> {
        if object.properties.is_empty() {
            return Ok("json.object([])".to_string());
        }
        let pad = " ".repeat(indent);
        let inner_pad = " ".repeat(indent + 2);
        let has_optional = object
            .properties
            .iter()
            .any(|(property, _)| !object.is_required(property));
        let callee = if has_optional {
            self.features.option = true;
            self.features.omit = true;
            "omit_absent_fields"
        } else {
            "json.object"
        };
        let mut out = format!("{callee}([\n");
        for (property, schema) in &object.properties {
            let nested = format!("{name}{}", names::type_name(property));
            let access = format!("{path}.{}", names::field_name(property));
            let entry = if !has_optional {
                self.encoder_expr(&nested, schema, &access, indent + 2)?
            } else if object.is_required(property) {
                let expr = self.encoder_expr(&nested, schema, &access, indent + 2)?;
                format!("Some({expr})")
            } else {
                let core = self.encoder_core(&nested, schema, "inner", indent + 2)?;
                format!("option.map({access}, fn(inner) {{ {core} }})")
            };
            out.push_str(&format!("{inner_pad}#(\"{property}\", {entry}),\n"));
        }
        out.push_str(&format!("{pad}])"));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_decoders() {
        let mut generator = Generator::new();
        let schema = Schema::typed(PrimitiveType::Number);
        assert_eq!(
            generator.decoder_expr("T", &schema, 2).unwrap(),
            "decode.float"
        );
    }

    #[test]
    fn nullable_decoder_wraps_in_optional() {
        let mut generator = Generator::new();
        let schema = Schema::typed(PrimitiveType::String).with_nullable(true);
        assert_eq!(
            generator.decoder_expr("T", &schema, 2).unwrap(),
            "decode.optional(decode.string)"
        );
        assert!(generator.features.option);
    }

    #[test]
    fn reference_decoder_delegates() {
        let mut generator = Generator::new();
        let schema = Schema::reference("#/$defs/home_address");
        assert_eq!(
            generator.decoder_expr("T", &schema, 2).unwrap(),
            "home_address_decoder()"
        );
    }

    #[test]
    fn array_encoder_rebinds_the_path() {
        let mut generator = Generator::new();
        let schema = Schema::array(Schema::typed(PrimitiveType::Integer));
        assert_eq!(
            generator.encoder_expr("T", &schema, "value.scores", 2).unwrap(),
            "json.array(value.scores, fn(item) { json.int(item) })"
        );
    }

    #[test]
    fn nullable_encoder_uses_json_nullable() {
        let mut generator = Generator::new();
        let schema = Schema::typed(PrimitiveType::Boolean).with_nullable(true);
        assert_eq!(
            generator.encoder_expr("T", &schema, "value.flag", 2).unwrap(),
            "json.nullable(value.flag, fn(inner) { json.bool(inner) })"
        );
    }

    #[test]
    fn generic_map_encoder_requests_the_helper() {
        let mut generator = Generator::new();
        let schema = Schema::typed(PrimitiveType::ObjectType);
        assert_eq!(
            generator.encoder_expr("T", &schema, "value.extra", 2).unwrap(),
            "dict_to_json(value.extra)"
        );
        assert!(generator.features.dict_encode);
    }
}
