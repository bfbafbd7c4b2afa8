//! Canonical text rendering of expression and statement trees.
//!
//! The printed form is a compatibility contract: downstream tests and
//! diagnostics pattern-match against it, so token and spacing rules here
//! are exact. Printing is pure and total over any constructed tree.

use std::fmt;

use crate::expr::{BinaryOp, CompareOp, Expr, Literal};
use crate::stmt::Stmt;
use crate::types::{Scalar, ScalarKind};

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ScalarKind::Sint => write!(f, "i{}", self.width * 8),
            ScalarKind::Uint => write!(f, "u{}", self.width * 8),
            ScalarKind::Float => write!(f, "f{}", self.width * 8),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "+"),
            Self::Sub => write!(f, "-"),
            Self::Mul => write!(f, "*"),
            Self::Div => write!(f, "/"),
            Self::Mod => write!(f, "%"),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => write!(f, "=="),
            Self::Ne => write!(f, "!="),
            Self::Lt => write!(f, "<"),
            Self::Le => write!(f, "<="),
            Self::Gt => write!(f, ">"),
            Self::Ge => write!(f, ">="),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::F32(v) => {
                // Shortest round-trippable digits, `f`-suffixed; a bare
                // integral value gets a forced dot: 2.0 prints as `2.f`.
                let digits = format!("{v}");
                if digits.contains('.') || digits.contains('e') {
                    write!(f, "{digits}f")
                } else {
                    write!(f, "{digits}.f")
                }
            }
            Self::F64(v) => write!(f, "{v}"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(f, self, 0)
    }
}

/// Writes `expr`, parenthesizing a binary node whose operator binds no
/// tighter than the enclosing one. `parent_prec` is 0 at the top level
/// and in argument/index positions, where parentheses are never needed.
fn write_expr(f: &mut fmt::Formatter<'_>, expr: &Expr, parent_prec: u8) -> fmt::Result {
    match expr {
        Expr::Literal(lit) => write!(f, "{lit}"),
        Expr::Var { name, .. } => write!(f, "{name}"),
        Expr::Binary { op, left, right } => {
            let prec = op.precedence();
            let paren = prec <= parent_prec;
            if paren {
                write!(f, "(")?;
            }
            write_expr(f, left, prec)?;
            write!(f, " {op} ")?;
            write_expr(f, right, prec)?;
            if paren {
                write!(f, ")")?;
            }
            Ok(())
        }
        Expr::CompareSelect { op, left, right } => {
            write!(f, "(")?;
            write_expr(f, left, 0)?;
            write!(f, "{op}")?;
            write_expr(f, right, 0)?;
            write!(f, " ? 1 : 0)")
        }
        Expr::Cast { scalar, value } => {
            write!(f, "{}(", scalar.cast_name())?;
            write_expr(f, value, 0)?;
            write!(f, ")")
        }
        Expr::Call { name, args, .. } => {
            write!(f, "{name}(")?;
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write_expr(f, arg, 0)?;
            }
            write!(f, ")")
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_stmt(f, self, 0)
    }
}

/// Returns `true` if `stmt` produces no output, so enclosing loops can
/// skip the line it would otherwise occupy.
fn renders_empty(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Block(stmts) => stmts.iter().all(renders_empty),
        Stmt::For { .. } | Stmt::Store { .. } => false,
    }
}

/// Writes `stmt` at the given nesting depth, two spaces per level, with
/// no trailing newline.
fn write_stmt(f: &mut fmt::Formatter<'_>, stmt: &Stmt, indent: usize) -> fmt::Result {
    let pad = "  ".repeat(indent);
    match stmt {
        Stmt::For {
            var,
            start,
            stop,
            body,
        } => {
            write!(f, "{pad}for (int {var} = ")?;
            write_expr(f, start, 0)?;
            write!(f, "; {var} < ")?;
            write_expr(f, stop, 0)?;
            writeln!(f, "; {var}++) {{")?;
            if renders_empty(body) {
                write!(f, "{pad}}}")
            } else {
                write_stmt(f, body, indent + 1)?;
                write!(f, "\n{pad}}}")
            }
        }
        Stmt::Block(stmts) => {
            for (i, s) in stmts.iter().enumerate() {
                if i > 0 {
                    writeln!(f)?;
                }
                write_stmt(f, s, indent)?;
            }
            Ok(())
        }
        Stmt::Store {
            target,
            indices,
            value,
        } => {
            write!(f, "{pad}{target}[")?;
            for (i, idx) in indices.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write_expr(f, idx, 0)?;
            }
            write!(f, "] = ")?;
            write_expr(f, value, 0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IrError;

    fn f(v: f32) -> Expr {
        Expr::float(v).unwrap()
    }

    #[test]
    fn display_scalar() {
        assert_eq!(format!("{}", Scalar::F32), "f32");
        assert_eq!(format!("{}", Scalar::I32), "i32");
        assert_eq!(format!("{}", Scalar::U32), "u32");
        assert_eq!(format!("{}", Scalar::F16), "f16");
    }

    #[test]
    fn int_literals_have_no_suffix() {
        assert_eq!(format!("{}", Expr::int(2)), "2");
        assert_eq!(format!("{}", Expr::int(-7)), "-7");
        assert_eq!(format!("{}", Expr::uint(42)), "42");
    }

    #[test]
    fn float_literals_are_f_suffixed() {
        assert_eq!(format!("{}", f(2.0)), "2.f");
        assert_eq!(format!("{}", f(3.125)), "3.125f");
        assert_eq!(format!("{}", f(-4.0)), "-4.f");
    }

    #[test]
    fn double_literals_have_no_suffix() {
        assert_eq!(format!("{}", Expr::double(2.0).unwrap()), "2");
        assert_eq!(format!("{}", Expr::double(3.125).unwrap()), "3.125");
    }

    #[test]
    fn additive_siblings_are_parenthesized() -> Result<(), IrError> {
        let e = Expr::sub(Expr::add(f(2.0), f(3.0))?, Expr::add(f(4.0), f(5.0))?)?;
        assert_eq!(format!("{e}"), "(2.f + 3.f) - (4.f + 5.f)");
        Ok(())
    }

    #[test]
    fn multiplicative_terms_unparenthesized_in_additive_parent() -> Result<(), IrError> {
        let x = Expr::var("x", Scalar::F16);
        let y = Expr::var("y", Scalar::F32);
        let body = Expr::add(
            f(2.0),
            Expr::add(
                Expr::mul(Expr::cast(Scalar::F32, x), f(3.0))?,
                Expr::mul(f(4.0), y)?,
            )?,
        )?;
        assert_eq!(format!("{body}"), "2.f + (float(x) * 3.f + 4.f * y)");
        Ok(())
    }

    #[test]
    fn top_level_binary_is_bare() -> Result<(), IrError> {
        let e = Expr::add(Expr::int(2), Expr::int(3))?;
        assert_eq!(format!("{e}"), "2 + 3");
        Ok(())
    }

    #[test]
    fn compare_select_form() -> Result<(), IrError> {
        let e = Expr::compare_select(CompareOp::Lt, Expr::int(1), Expr::int(2))?;
        assert_eq!(format!("{e}"), "(1<2 ? 1 : 0)");
        Ok(())
    }

    #[test]
    fn call_arguments_are_bare() -> Result<(), IrError> {
        let i = Expr::var("i", Scalar::I32);
        let j = Expr::var("j", Scalar::I32);
        let idx = Expr::add(i.clone(), j)?;
        let e = Expr::call("producer", Scalar::F32, vec![i, idx])?;
        assert_eq!(format!("{e}"), "producer(i, i + j)");
        Ok(())
    }

    #[test]
    fn nested_loops_indent_two_spaces() -> Result<(), IrError> {
        let i = Expr::var("i", Scalar::I32);
        let j = Expr::var("j", Scalar::I32);
        let store = Stmt::store("out", vec![i.clone(), j.clone()], Expr::mul(i, j)?)?;
        let inner = Stmt::for_range("j", Expr::int(0), Expr::int(10), store)?;
        let outer = Stmt::for_range("i", Expr::int(0), Expr::int(4), inner)?;
        let expected = "\
for (int i = 0; i < 4; i++) {
  for (int j = 0; j < 10; j++) {
    out[i, j] = i * j
  }
}";
        assert_eq!(format!("{outer}"), expected);
        Ok(())
    }

    #[test]
    fn empty_loop_body_prints_without_blank_line() -> Result<(), IrError> {
        let zero_trip = Stmt::for_range("i", Expr::int(0), Expr::int(0), Stmt::block(Vec::new()))?;
        assert_eq!(format!("{zero_trip}"), "for (int i = 0; i < 0; i++) {\n}");

        // Nested empty blocks render nothing and collapse the same way.
        let nested = Stmt::for_range(
            "i",
            Expr::int(0),
            Expr::int(4),
            Stmt::block(vec![Stmt::block(Vec::new())]),
        )?;
        assert_eq!(format!("{nested}"), "for (int i = 0; i < 4; i++) {\n}");
        Ok(())
    }

    #[test]
    fn block_statements_are_newline_separated() -> Result<(), IrError> {
        let a = Stmt::store("a", vec![Expr::int(0)], Expr::int(1))?;
        let b = Stmt::store("b", vec![Expr::int(0)], Expr::int(2))?;
        let block = Stmt::block(vec![a, b]);
        assert_eq!(format!("{block}"), "a[0] = 1\nb[0] = 2");
        Ok(())
    }

    #[test]
    fn printing_is_idempotent() -> Result<(), IrError> {
        let e = Expr::sub(Expr::add(f(2.0), f(3.0))?, Expr::add(f(4.0), f(5.0))?)?;
        assert_eq!(format!("{e}"), format!("{e}"));
        Ok(())
    }
}
