//! Identifier mapping between schema names and Gleam names.
//!
//! All casing goes through `heck`: type and constructor names are
//! UpperCamelCase, fields and functions snake_case. Distinct schema names
//! can collapse to one generated name; callers detect that with explicit
//! set checks rather than leaving it to the Gleam compiler.

use heck::{ToSnakeCase, ToUpperCamelCase};

/// Gleam type or constructor name for a schema name.
pub fn type_name(name: &str) -> String {
    name.to_upper_camel_case()
}

/// Gleam record field name for a property name.
pub fn field_name(name: &str) -> String {
    name.to_snake_case()
}

/// Generated decoder function name for a schema name.
pub fn decoder_name(name: &str) -> String {
    format!("{}_decoder", name.to_snake_case())
}

/// Generated encoder function name for a schema name.
pub fn encoder_name(name: &str) -> String {
    format!("encode_{}", name.to_snake_case())
}

/// The definition name a local `$ref` pointer targets, pascal-cased.
///
/// Only `#/definitions/<name>` and `#/$defs/<name>` are supported; any
/// other pointer shape resolves to the `Unknown` sentinel instead of
/// failing generation.
pub fn ref_target(pointer: &str) -> String {
    let target = pointer
        .strip_prefix("#/definitions/")
        .or_else(|| pointer.strip_prefix("#/$defs/"));
    match target {
        Some(name) if !name.is_empty() && !name.contains('/') => type_name(name),
        _ => "Unknown".to_string(),
    }
}
