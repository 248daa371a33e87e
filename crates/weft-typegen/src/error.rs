//! Fatal generation errors.

/// A reason code generation aborted. No partial output is ever returned
/// alongside one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodegenError {
    /// An enum schema declared zero variants; an empty Gleam type would be
    /// uninhabitable.
    #[error("enum `{0}` declares no variants")]
    EmptyEnum(String),

    /// An encoder entry point was requested for an unconstrained schema;
    /// there is no sensible JSON representation to emit.
    #[error("cannot generate an encoder for `{0}`: the schema is unconstrained")]
    EncoderForAny(String),

    /// Two properties of one object normalize to the same Gleam field name.
    #[error(
        "type `{type_name}`, constructor `{constructor}`: properties collide on field `{field}`"
    )]
    DuplicateProperty {
        type_name: String,
        constructor: String,
        field: String,
    },

    /// Two schemas normalize to the same generated type name.
    #[error("generated type name `{0}` is already in use")]
    DuplicateType(String),

    /// Two record or enum variant names normalize to the same constructor.
    #[error("generated constructor name `{0}` is already in use")]
    DuplicateConstructor(String),

    /// Two schemas normalize to the same generated function name.
    #[error("generated function name `{0}` is already in use")]
    DuplicateFunction(String),
}
