//! JSON Schema intermediate representation.
//!
//! `weft-jsonschema` models a practical subset of JSON Schema as plain data
//! and converts it to and from JSON documents:
//!
//! ```text
//! JSON document ──decode──> RootSchema / Schema (ir.rs) ──serialize──> JSON document
//!                                    │
//!                                    └──> consumed by weft-typegen
//! ```
//!
//! Structural keywords (`type`, `enum`, `$ref`, `items`, `properties`,
//! `required`, `additionalProperties`, `patternProperties`,
//! `oneOf`/`anyOf`/`allOf`, `not`, `$defs`/`definitions`, `nullable`)
//! become IR structure; every other keyword rides along as opaque
//! metadata so it survives a round trip. Validation of data against a
//! schema is out of scope, as is resolution of non-local `$ref` targets.
//!
//! # Example
//!
//! ```
//! use weft_jsonschema::{from_json, to_json};
//!
//! let document = serde_json::json!({
//!     "type": "object",
//!     "required": ["name"],
//!     "properties": {
//!         "name": { "type": "string" },
//!         "age": { "type": ["integer", "null"] }
//!     }
//! });
//!
//! let root = from_json(&document).unwrap();
//! let (_, age) = &root.schema.as_object().unwrap().properties[1];
//! assert!(age.is_nullable());
//!
//! // Round trip: decode(to_json(x)) == x
//! assert_eq!(from_json(&to_json(&root)).unwrap(), root);
//! ```

pub mod decode;
pub mod ir;
pub mod serialize;

pub use decode::{DecodeError, DecodeErrors, from_json};
pub use ir::{MetaValue, Metadata, ObjectSchema, PrimitiveType, RootSchema, Schema};
pub use serialize::{schema_to_json, to_json};
