//! Expressions — immutable, typed value trees.

use crate::error::IrError;
use crate::name::NameRegistry;
use crate::types::Scalar;

/// A literal constant value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Literal {
    I32(i32),
    I64(i64),
    U32(u32),
    F32(f32),
    F64(f64),
}

impl Literal {
    /// Returns the scalar type of this literal.
    pub fn scalar(&self) -> Scalar {
        match *self {
            Self::I32(_) => Scalar::I32,
            Self::I64(_) => Scalar::I64,
            Self::U32(_) => Scalar::U32,
            Self::F32(_) => Scalar::F32,
            Self::F64(_) => Scalar::F64,
        }
    }
}

/// A binary operator.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    /// Binding strength used for parenthesization; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div | Self::Mod => 2,
        }
    }
}

/// A comparison used by compare-select expressions.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// An expression node — an immutable, typed value tree.
///
/// Nodes are built bottom-up through the factory operations below, which
/// validate operand types and own their children exclusively. There is no
/// in-place mutation once a node exists.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// A literal constant.
    Literal(Literal),
    /// A named, typed placeholder.
    Var { name: String, scalar: Scalar },
    /// A binary operator over same-typed operands.
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Compare two same-typed operands, yielding int 1 or 0.
    CompareSelect {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Explicit scalar type conversion.
    Cast { scalar: Scalar, value: Box<Expr> },
    /// Reference to a named tensor computation's element at the given
    /// integer index expressions. The callee is not resolved here, so its
    /// element type is carried alongside the name. `base` is the
    /// generator base iff the name was minted by a [`NameRegistry`].
    Call {
        name: String,
        base: Option<String>,
        scalar: Scalar,
        args: Vec<Expr>,
    },
}

impl Expr {
    /// An `i32` literal.
    pub fn int(value: i32) -> Self {
        Self::Literal(Literal::I32(value))
    }

    /// An `i64` literal.
    pub fn long(value: i64) -> Self {
        Self::Literal(Literal::I64(value))
    }

    /// A `u32` literal.
    pub fn uint(value: u32) -> Self {
        Self::Literal(Literal::U32(value))
    }

    /// A single-precision float literal. NaN and infinities are rejected
    /// so the structural encoding stays total.
    pub fn float(value: f32) -> Result<Self, IrError> {
        if !value.is_finite() {
            return Err(IrError::NonFiniteLiteral);
        }
        Ok(Self::Literal(Literal::F32(value)))
    }

    /// A double-precision float literal; NaN and infinities are rejected.
    pub fn double(value: f64) -> Result<Self, IrError> {
        if !value.is_finite() {
            return Err(IrError::NonFiniteLiteral);
        }
        Ok(Self::Literal(Literal::F64(value)))
    }

    /// A named variable of the given scalar type.
    pub fn var(name: impl Into<String>, scalar: Scalar) -> Self {
        Self::Var {
            name: name.into(),
            scalar,
        }
    }

    /// A binary operation. Operands must share a scalar type; there is no
    /// implicit promotion — insert a [`Expr::cast`] explicitly.
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Result<Self, IrError> {
        let (lt, rt) = (left.scalar(), right.scalar());
        if lt != rt {
            return Err(IrError::TypeMismatch {
                expected: lt.cast_name().to_owned(),
                found: rt.cast_name().to_owned(),
            });
        }
        Ok(Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn add(left: Expr, right: Expr) -> Result<Self, IrError> {
        Self::binary(BinaryOp::Add, left, right)
    }

    pub fn sub(left: Expr, right: Expr) -> Result<Self, IrError> {
        Self::binary(BinaryOp::Sub, left, right)
    }

    pub fn mul(left: Expr, right: Expr) -> Result<Self, IrError> {
        Self::binary(BinaryOp::Mul, left, right)
    }

    pub fn div(left: Expr, right: Expr) -> Result<Self, IrError> {
        Self::binary(BinaryOp::Div, left, right)
    }

    /// A compare-select over same-typed operands.
    pub fn compare_select(op: CompareOp, left: Expr, right: Expr) -> Result<Self, IrError> {
        let (lt, rt) = (left.scalar(), right.scalar());
        if lt != rt {
            return Err(IrError::TypeMismatch {
                expected: lt.cast_name().to_owned(),
                found: rt.cast_name().to_owned(),
            });
        }
        Ok(Self::CompareSelect {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// An explicit conversion of `value` to `scalar`.
    pub fn cast(scalar: Scalar, value: Expr) -> Self {
        Self::Cast {
            scalar,
            value: Box::new(value),
        }
    }

    /// A call to an explicitly named computation. All index arguments
    /// must be integer-typed.
    pub fn call(
        name: impl Into<String>,
        scalar: Scalar,
        args: Vec<Expr>,
    ) -> Result<Self, IrError> {
        Self::call_with_base(name.into(), None, scalar, args)
    }

    /// A call to a derived computation whose name is minted from `base`
    /// by the registry. The minted name is unique but not stable across
    /// serialization round trips.
    pub fn call_generated(
        names: &mut NameRegistry,
        base: &str,
        scalar: Scalar,
        args: Vec<Expr>,
    ) -> Result<Self, IrError> {
        let name = names.fresh(base);
        Self::call_with_base(name, Some(base.to_owned()), scalar, args)
    }

    fn call_with_base(
        name: String,
        base: Option<String>,
        scalar: Scalar,
        args: Vec<Expr>,
    ) -> Result<Self, IrError> {
        for arg in &args {
            let at = arg.scalar();
            if !at.is_integer() {
                return Err(IrError::NonIntegerIndex {
                    found: at.cast_name().to_owned(),
                });
            }
        }
        Ok(Self::Call {
            name,
            base,
            scalar,
            args,
        })
    }

    /// Returns the scalar type this expression evaluates to.
    pub fn scalar(&self) -> Scalar {
        match self {
            Self::Literal(lit) => lit.scalar(),
            Self::Var { scalar, .. } => *scalar,
            Self::Binary { left, .. } => left.scalar(),
            Self::CompareSelect { .. } => Scalar::I32,
            Self::Cast { scalar, .. } => *scalar,
            Self::Call { scalar, .. } => *scalar,
        }
    }

    /// Ordered child expressions, for generic visitors.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Self::Literal(_) | Self::Var { .. } => Vec::new(),
            Self::Binary { left, right, .. } | Self::CompareSelect { left, right, .. } => {
                vec![left, right]
            }
            Self::Cast { value, .. } => vec![value],
            Self::Call { args, .. } => args.iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_scalars() {
        assert_eq!(Literal::F32(1.0).scalar(), Scalar::F32);
        assert_eq!(Literal::I32(-1).scalar(), Scalar::I32);
        assert_eq!(Literal::U32(42).scalar(), Scalar::U32);
        assert_eq!(Literal::F64(2.5).scalar(), Scalar::F64);
    }

    #[test]
    fn binary_derives_operand_type() {
        let sum = Expr::add(Expr::int(2), Expr::int(3)).unwrap();
        assert_eq!(sum.scalar(), Scalar::I32);
        assert_eq!(sum.children().len(), 2);
    }

    #[test]
    fn binary_rejects_mismatched_operands() {
        let err = Expr::add(Expr::int(2), Expr::float(3.0).unwrap()).unwrap_err();
        assert!(matches!(err, IrError::TypeMismatch { .. }));
    }

    #[test]
    fn cast_bridges_operand_types() {
        let x = Expr::var("x", Scalar::F16);
        let widened = Expr::cast(Scalar::F32, x);
        assert_eq!(widened.scalar(), Scalar::F32);
        let sum = Expr::add(widened, Expr::float(1.0).unwrap()).unwrap();
        assert_eq!(sum.scalar(), Scalar::F32);
    }

    #[test]
    fn compare_select_yields_int() {
        let cs = Expr::compare_select(
            CompareOp::Lt,
            Expr::float(1.0).unwrap(),
            Expr::float(2.0).unwrap(),
        )
        .unwrap();
        assert_eq!(cs.scalar(), Scalar::I32);
    }

    #[test]
    fn call_rejects_non_integer_index() {
        let err = Expr::call("producer", Scalar::F32, vec![Expr::float(0.5).unwrap()]).unwrap_err();
        assert!(matches!(err, IrError::NonIntegerIndex { .. }));
    }

    #[test]
    fn call_generated_mints_suffixed_names() {
        let mut names = NameRegistry::new();
        let i = Expr::var("i", Scalar::I32);
        let a = Expr::call_generated(&mut names, "chunk", Scalar::I32, vec![i.clone()]).unwrap();
        let b = Expr::call_generated(&mut names, "chunk", Scalar::I32, vec![i]).unwrap();
        let Expr::Call { name: na, base, .. } = &a else {
            panic!("expected Call");
        };
        let Expr::Call { name: nb, .. } = &b else {
            panic!("expected Call");
        };
        assert_eq!(na, "chunk_0");
        assert_eq!(nb, "chunk_1");
        assert_eq!(base.as_deref(), Some("chunk"));
    }

    #[test]
    fn non_finite_literals_rejected() {
        assert!(Expr::float(f32::NAN).is_err());
        assert!(Expr::float(f32::INFINITY).is_err());
        assert!(Expr::double(f64::NEG_INFINITY).is_err());
    }
}
