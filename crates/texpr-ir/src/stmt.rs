//! Statements — immutable effect-producing nodes referencing expressions.

use crate::error::IrError;
use crate::expr::{Expr, Literal};

/// A statement node.
///
/// Same immutability and child-enumeration contract as [`Expr`]:
/// constructed once through validating factories, owned exclusively by
/// the enclosing tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    /// A counted loop: `var` ranges over `start..stop`.
    For {
        var: String,
        start: Expr,
        stop: Expr,
        body: Box<Stmt>,
    },
    /// An ordered sequence of statements; order is execution order.
    Block(Vec<Stmt>),
    /// Write `value` to the named buffer at the given indices. The target
    /// is an opaque name resolved by the enclosing computation graph.
    Store {
        target: String,
        indices: Vec<Expr>,
        value: Expr,
    },
}

/// The constant value of an integer literal expression, if it is one.
fn const_int(expr: &Expr) -> Option<i64> {
    match expr {
        Expr::Literal(Literal::I32(v)) => Some(i64::from(*v)),
        Expr::Literal(Literal::I64(v)) => Some(*v),
        Expr::Literal(Literal::U32(v)) => Some(i64::from(*v)),
        _ => None,
    }
}

impl Stmt {
    /// A loop over `start..stop`. Bounds must be integer-typed and share
    /// a scalar type. A constant negative range is a construction error;
    /// zero-trip loops are legal. Symbolic bounds are accepted as-is.
    pub fn for_range(
        var: impl Into<String>,
        start: Expr,
        stop: Expr,
        body: Stmt,
    ) -> Result<Self, IrError> {
        let (st, et) = (start.scalar(), stop.scalar());
        if !st.is_integer() {
            return Err(IrError::NonIntegerIndex {
                found: st.cast_name().to_owned(),
            });
        }
        if st != et {
            return Err(IrError::TypeMismatch {
                expected: st.cast_name().to_owned(),
                found: et.cast_name().to_owned(),
            });
        }
        if let (Some(lo), Some(hi)) = (const_int(&start), const_int(&stop)) {
            if hi < lo {
                return Err(IrError::NegativeLoopRange { start: lo, stop: hi });
            }
        }
        Ok(Self::For {
            var: var.into(),
            start,
            stop,
            body: Box::new(body),
        })
    }

    /// An ordered block of statements.
    pub fn block(stmts: Vec<Stmt>) -> Self {
        Self::Block(stmts)
    }

    /// A store to the named buffer. Indices must be integer-typed.
    pub fn store(
        target: impl Into<String>,
        indices: Vec<Expr>,
        value: Expr,
    ) -> Result<Self, IrError> {
        for idx in &indices {
            let it = idx.scalar();
            if !it.is_integer() {
                return Err(IrError::NonIntegerIndex {
                    found: it.cast_name().to_owned(),
                });
            }
        }
        Ok(Self::Store {
            target: target.into(),
            indices,
            value,
        })
    }

    /// Ordered child expressions, for generic visitors.
    pub fn child_exprs(&self) -> Vec<&Expr> {
        match self {
            Self::For { start, stop, .. } => vec![start, stop],
            Self::Block(_) => Vec::new(),
            Self::Store { indices, value, .. } => {
                indices.iter().chain(std::iter::once(value)).collect()
            }
        }
    }

    /// Ordered child statements, for generic visitors.
    pub fn child_stmts(&self) -> Vec<&Stmt> {
        match self {
            Self::For { body, .. } => vec![body],
            Self::Block(stmts) => stmts.iter().collect(),
            Self::Store { .. } => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Scalar;

    fn empty_body() -> Stmt {
        Stmt::block(Vec::new())
    }

    #[test]
    fn for_range_accepts_zero_trip() {
        let stmt = Stmt::for_range("i", Expr::int(5), Expr::int(5), empty_body()).unwrap();
        assert!(matches!(stmt, Stmt::For { .. }));
    }

    #[test]
    fn for_range_rejects_negative_range() {
        let err = Stmt::for_range("i", Expr::int(10), Expr::int(2), empty_body()).unwrap_err();
        assert!(matches!(
            err,
            IrError::NegativeLoopRange { start: 10, stop: 2 }
        ));
    }

    #[test]
    fn for_range_rejects_float_bounds() {
        let err = Stmt::for_range(
            "i",
            Expr::float(0.0).unwrap(),
            Expr::float(1.0).unwrap(),
            empty_body(),
        )
        .unwrap_err();
        assert!(matches!(err, IrError::NonIntegerIndex { .. }));
    }

    #[test]
    fn for_range_rejects_mixed_bound_types() {
        let err = Stmt::for_range("i", Expr::int(0), Expr::long(4), empty_body()).unwrap_err();
        assert!(matches!(err, IrError::TypeMismatch { .. }));
    }

    #[test]
    fn for_range_accepts_symbolic_bounds() {
        let n = Expr::var("n", Scalar::I32);
        let stmt = Stmt::for_range("i", Expr::int(0), n, empty_body()).unwrap();
        assert_eq!(stmt.child_exprs().len(), 2);
    }

    #[test]
    fn store_rejects_non_integer_index() {
        let err = Stmt::store(
            "out",
            vec![Expr::float(0.5).unwrap()],
            Expr::int(1),
        )
        .unwrap_err();
        assert!(matches!(err, IrError::NonIntegerIndex { .. }));
    }

    #[test]
    fn store_children_are_indices_then_value() {
        let stmt = Stmt::store(
            "out",
            vec![Expr::var("i", Scalar::I32), Expr::var("j", Scalar::I32)],
            Expr::int(0),
        )
        .unwrap();
        assert_eq!(stmt.child_exprs().len(), 3);
        assert!(stmt.child_stmts().is_empty());
    }
}
