//! Scalar element types that tag every expression node.

/// Width of a scalar type in bytes.
pub type Bytes = u8;

/// The kind of a scalar element type.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum ScalarKind {
    /// Signed integer.
    Sint,
    /// Unsigned integer.
    Uint,
    /// Floating point.
    Float,
}

/// A scalar element type: kind + byte width.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Scalar {
    pub kind: ScalarKind,
    pub width: Bytes,
}

impl Scalar {
    pub const I8: Self = Self {
        kind: ScalarKind::Sint,
        width: 1,
    };
    pub const I16: Self = Self {
        kind: ScalarKind::Sint,
        width: 2,
    };
    pub const I32: Self = Self {
        kind: ScalarKind::Sint,
        width: 4,
    };
    pub const I64: Self = Self {
        kind: ScalarKind::Sint,
        width: 8,
    };
    pub const U8: Self = Self {
        kind: ScalarKind::Uint,
        width: 1,
    };
    pub const U32: Self = Self {
        kind: ScalarKind::Uint,
        width: 4,
    };
    pub const F16: Self = Self {
        kind: ScalarKind::Float,
        width: 2,
    };
    pub const F32: Self = Self {
        kind: ScalarKind::Float,
        width: 4,
    };
    pub const F64: Self = Self {
        kind: ScalarKind::Float,
        width: 8,
    };

    /// Returns `true` for signed and unsigned integer types.
    pub fn is_integer(self) -> bool {
        matches!(self.kind, ScalarKind::Sint | ScalarKind::Uint)
    }

    /// The lowercase source-level name used when printing casts,
    /// e.g. `float(x)` or `half(x)`.
    pub fn cast_name(self) -> &'static str {
        match (self.kind, self.width) {
            (ScalarKind::Float, 2) => "half",
            (ScalarKind::Float, 8) => "double",
            (ScalarKind::Float, _) => "float",
            (ScalarKind::Sint, 1) => "char",
            (ScalarKind::Sint, 2) => "short",
            (ScalarKind::Sint, 8) => "long",
            (ScalarKind::Sint, _) => "int",
            (ScalarKind::Uint, 1) => "byte",
            (ScalarKind::Uint, 8) => "ulong",
            (ScalarKind::Uint, _) => "uint",
        }
    }
}
