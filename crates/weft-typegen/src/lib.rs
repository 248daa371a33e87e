//! Gleam source generation for JSON Schema documents.
//!
//! Feeds on the schema model from `weft-jsonschema` and emits a single
//! Gleam module: one custom type per object or enum schema, and, when
//! enabled, a `*_decoder` and `encode_*` function per named schema. Output
//! is deterministic: types and functions are emitted in sorted order and
//! imports appear only for the features the module actually uses.
//!
//! ```
//! use weft_typegen::Generator;
//!
//! let document = serde_json::json!({
//!     "type": "object",
//!     "required": ["name"],
//!     "properties": {
//!         "name": { "type": "string" },
//!         "age": { "type": "integer", "nullable": true },
//!     },
//! });
//! let root = weft_jsonschema::from_json(&document).unwrap();
//! let module = Generator::new()
//!     .with_root_name("Person")
//!     .enable_decoders(true)
//!     .generate(&root)
//!     .unwrap();
//! assert!(module.contains("pub type Person {"));
//! assert!(module.contains("pub fn person_decoder()"));
//! ```
//!
//! Name resolution is strict: two schemas that normalize to the same type,
//! constructor, field, or function name abort generation with a
//! [`CodegenError`] instead of shadowing each other.

mod codec;
mod error;
mod generator;
mod names;
mod types;

pub use error::CodegenError;
pub use generator::Generator;
