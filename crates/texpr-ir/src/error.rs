//! Error types for the tensor expression IR.

/// Errors raised when constructing IR nodes with inconsistent types.
#[derive(Debug, thiserror::Error)]
pub enum IrError {
    /// Binary or compare-select operands of differing scalar types.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// A loop was constructed with a constant `stop < start`.
    #[error("loop range {start}..{stop} is negative")]
    NegativeLoopRange { start: i64, stop: i64 },

    /// A call argument or store/loop index is not integer-typed.
    #[error("index expression must be integer-typed, found {found}")]
    NonIntegerIndex { found: String },

    /// A float literal holding NaN or an infinity.
    #[error("float literal must be finite")]
    NonFiniteLiteral,
}

/// Errors raised while decoding a serialized tree.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The `kind` tag names no known node variant.
    #[error("unknown node kind `{0}`")]
    UnknownKind(String),

    /// A required field or child is absent.
    #[error("missing field `{field}` in `{kind}` record")]
    MissingField { kind: String, field: String },

    /// The `type` tag names no known scalar type.
    #[error("unknown scalar type `{0}`")]
    UnknownScalar(String),

    /// The `type` tag is inconsistent with the variant's requirement.
    #[error("type `{ty}` is not valid for `{kind}`")]
    BadType { kind: String, ty: String },

    /// The record is not structurally well-formed (wrong JSON shape,
    /// wrong child count, out-of-range value).
    #[error("malformed `{kind}` record: {detail}")]
    Malformed { kind: String, detail: String },

    /// Reconstruction through the node factories failed re-validation.
    #[error(transparent)]
    Invalid(#[from] IrError),
}
