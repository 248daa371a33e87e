//! The generation pipeline.
//!
//! [`Generator`] is an owned builder threaded through every step: it
//! accumulates generated type and function text, tracks which language
//! features the output needs (each maps to one conditional import), and
//! holds the constructor-name set used for collision detection. One
//! `generate` call owns one context; there is no sharing and no partial
//! output on error.

use std::collections::{BTreeMap, BTreeSet};

use weft_jsonschema::{RootSchema, Schema};

use crate::error::CodegenError;
use crate::names;

/// Feature usage discovered while walking the schema. Each flag pulls in
/// exactly one import; the two helper flags additionally pull in a helper
/// function at the end of the output.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Features {
    /// `Dynamic` appeared in a type or decoder.
    pub dynamic: bool,
    /// `Option` appeared in a type or codec.
    pub option: bool,
    /// `Dict` appeared in a type or codec.
    pub dict: bool,
    /// An encoder skipped absent optional fields.
    pub omit: bool,
    /// An encoder serialized a generic map.
    pub dict_encode: bool,
}

/// Builder for one code-generation run.
#[derive(Debug)]
pub struct Generator {
    pub(crate) root_name: String,
    pub(crate) decoders: bool,
    pub(crate) encoders: bool,
    pub(crate) features: Features,
    /// Generated type name -> source text. Keyed so assembly is sorted.
    pub(crate) types: BTreeMap<String, String>,
    /// Generated function name -> source text.
    pub(crate) functions: BTreeMap<String, String>,
    /// Record and variant constructors already claimed in the module.
    pub(crate) constructors: BTreeSet<String>,
}

impl Generator {
    pub fn new() -> Self {
        Generator {
            root_name: "Data".to_string(),
            decoders: false,
            encoders: false,
            features: Features::default(),
            types: BTreeMap::new(),
            functions: BTreeMap::new(),
            constructors: BTreeSet::new(),
        }
    }

    /// Name the root schema's generated type and functions. Defaults to
    /// `"Data"`.
    pub fn with_root_name(mut self, name: &str) -> Self {
        self.root_name = name.to_string();
        self
    }

    /// Emit `*_decoder` functions for the definitions and the root.
    pub fn enable_decoders(mut self, enabled: bool) -> Self {
        self.decoders = enabled;
        self
    }

    /// Emit `encode_*` functions for the definitions and the root.
    pub fn enable_encoders(mut self, enabled: bool) -> Self {
        self.encoders = enabled;
        self
    }

    /// Run the pipeline: register types, then decoder functions, then
    /// encoder functions, then assemble. The first error aborts the run.
    pub fn generate(mut self, root: &RootSchema) -> Result<String, CodegenError> {
        let root_name = self.root_name.clone();

        for (name, schema) in &root.definitions {
            self.collect_types(&names::type_name(name), schema)?;
        }
        self.collect_types(&names::type_name(&root_name), &root.schema)?;

        if self.decoders {
            for (name, schema) in &root.definitions {
                self.decoder_function(name, schema)?;
            }
            self.decoder_function(&root_name, &root.schema)?;
        }

        if self.encoders {
            if matches!(root.schema, Schema::Empty { .. }) {
                return Err(CodegenError::EncoderForAny(root_name));
            }
            for (name, schema) in &root.definitions {
                self.encoder_function(name, schema)?;
            }
            self.encoder_function(&root_name, &root.schema)?;
        }

        Ok(self.assemble())
    }

    fn decoder_function(&mut self, name: &str, schema: &Schema) -> Result<(), CodegenError> {
        let function = names::decoder_name(name);
        let type_name = names::type_name(name);
        let decoded = self.type_text(&type_name, schema);
        let body = self.decoder_expr(&type_name, schema, 2)?;
        let text = format!("pub fn {function}() -> decode.Decoder({decoded}) {{\n  {body}\n}}");
        self.register_function(function, text)
    }

    fn encoder_function(&mut self, name: &str, schema: &Schema) -> Result<(), CodegenError> {
        let function = names::encoder_name(name);
        let type_name = names::type_name(name);
        let accepted = self.type_text(&type_name, schema);
        let body = self.encoder_expr(&type_name, schema, "value", 2)?;
        let text = format!("pub fn {function}(value: {accepted}) -> json.Json {{\n  {body}\n}}");
        self.register_function(function, text)
    }

    pub(crate) fn register_type(&mut self, name: &str, text: String) -> Result<(), CodegenError> {
        if self.types.contains_key(name) {
            return Err(CodegenError::DuplicateType(name.to_string()));
        }
        self.types.insert(name.to_string(), text);
        Ok(())
    }

    pub(crate) fn register_constructor(&mut self, name: &str) -> Result<(), CodegenError> {
        if !self.constructors.insert(name.to_string()) {
            return Err(CodegenError::DuplicateConstructor(name.to_string()));
        }
        Ok(())
    }

    fn register_function(&mut self, name: String, text: String) -> Result<(), CodegenError> {
        if self.functions.contains_key(&name) {
            return Err(CodegenError::DuplicateFunction(name));
        }
        self.functions.insert(name, text);
        Ok(())
    }

    /// Concatenate imports, types, functions, and helpers. Identical input
    /// always yields byte-identical text.
    fn assemble(&self) -> String {
        let mut sections = Vec::new();

        let mut imports = Vec::new();
        if self.decoders {
            imports.push("import gleam/dynamic/decode");
        }
        if self.encoders {
            imports.push("import gleam/json");
        }
        if self.features.dynamic {
            imports.push("import gleam/dynamic.{type Dynamic}");
        }
        if self.features.option {
            imports.push("import gleam/option.{type Option, None, Some}");
        }
        if self.features.dict {
            imports.push("import gleam/dict.{type Dict}");
        }
        if self.features.omit {
            imports.push("import gleam/list");
        }
        imports.sort_unstable();
        if !imports.is_empty() {
            sections.push(imports.join("\n"));
        }

        if !self.types.is_empty() {
            sections.push(self.types.values().cloned().collect::<Vec<_>>().join("\n\n"));
        }
        if !self.functions.is_empty() {
            sections.push(
                self.functions
                    .values()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join("\n\n"),
            );
        }
        if self.features.dict_encode {
            sections.push(DICT_TO_JSON.to_string());
        }
        if self.features.omit {
            sections.push(OMIT_ABSENT_FIELDS.to_string());
        }

        let mut output = sections.join("\n\n");
        output.push('\n');
        output
    }
}

impl Default for Generator {
    fn default() -> Self {
        Generator::new()
    }
}

/// Generic maps hold `Dynamic` values; without a schema there is nothing to
/// re-encode, so only the keys survive.
const DICT_TO_JSON: &str = r##"fn dict_to_json(input: Dict(String, Dynamic)) -> json.Json {
  json.object(
    dict.fold(input, [], fn(entries, key, _value) {
      [#(key, json.null()), ..entries]
    }),
  )
}"##;

const OMIT_ABSENT_FIELDS: &str = r##"fn omit_absent_fields(entries: List(#(String, Option(json.Json)))) -> json.Json {
  json.object(
    list.filter_map(entries, fn(entry) {
      case entry.1 {
        Some(value) -> Ok(#(entry.0, value))
        None -> Error(Nil)
      }
    }),
  )
}"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_produces_no_sections() {
        let output = Generator::new().generate(&RootSchema::default()).unwrap();
        assert_eq!(output, "\n");
    }

    #[test]
    fn imports_are_sorted_and_conditional() {
        let generator = Generator {
            decoders: true,
            encoders: true,
            features: Features {
                dynamic: true,
                option: true,
                dict: true,
                omit: true,
                dict_encode: false,
            },
            ..Generator::new()
        };
        let output = generator.assemble();
        let expected = "import gleam/dict.{type Dict}\n\
                        import gleam/dynamic.{type Dynamic}\n\
                        import gleam/dynamic/decode\n\
                        import gleam/json\n\
                        import gleam/list\n\
                        import gleam/option.{type Option, None, Some}";
        assert!(output.starts_with(expected));
    }
}
