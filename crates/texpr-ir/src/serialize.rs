//! Structural JSON encoding of expression and statement trees.
//!
//! Every node becomes a self-describing record (`kind`, `type` where
//! applicable, variant fields, children); encoding is plain structural
//! recursion with no sharing. Decoding rebuilds through the node
//! factories, so construction-time invariants are re-validated, and it
//! dispatches on the `kind` string so old encodings stay decodable when
//! new variants are added.
//!
//! A `call` record minted from a generator base does not keep its name:
//! decoding draws the next suffix from the [`NameRegistry`], preserving
//! uniqueness but not identity.

use serde_json::{json, Map, Value};

use crate::error::DecodeError;
use crate::expr::{BinaryOp, CompareOp, Expr, Literal};
use crate::name::NameRegistry;
use crate::stmt::Stmt;
use crate::types::Scalar;

fn binary_kind(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "add",
        BinaryOp::Sub => "sub",
        BinaryOp::Mul => "mul",
        BinaryOp::Div => "div",
        BinaryOp::Mod => "mod",
    }
}

fn compare_tag(op: CompareOp) -> &'static str {
    match op {
        CompareOp::Eq => "eq",
        CompareOp::Ne => "ne",
        CompareOp::Lt => "lt",
        CompareOp::Le => "le",
        CompareOp::Gt => "gt",
        CompareOp::Ge => "ge",
    }
}

/// Encodes an expression tree as a tagged record tree.
pub fn serialize_expr(expr: &Expr) -> Value {
    match expr {
        Expr::Literal(lit) => match *lit {
            Literal::I32(v) => json!({"kind": "int_imm", "type": "i32", "value": v}),
            Literal::I64(v) => json!({"kind": "int_imm", "type": "i64", "value": v}),
            Literal::U32(v) => json!({"kind": "int_imm", "type": "u32", "value": v}),
            Literal::F32(v) => json!({"kind": "float_imm", "type": "f32", "value": f64::from(v)}),
            Literal::F64(v) => json!({"kind": "float_imm", "type": "f64", "value": v}),
        },
        Expr::Var { name, scalar } => {
            json!({"kind": "var", "type": scalar.to_string(), "name": name})
        }
        Expr::Binary { op, left, right } => json!({
            "kind": binary_kind(*op),
            "type": expr.scalar().to_string(),
            "children": [serialize_expr(left), serialize_expr(right)],
        }),
        Expr::CompareSelect { op, left, right } => json!({
            "kind": "compare_select",
            "op": compare_tag(*op),
            "children": [serialize_expr(left), serialize_expr(right)],
        }),
        Expr::Cast { scalar, value } => json!({
            "kind": "cast",
            "type": scalar.to_string(),
            "children": [serialize_expr(value)],
        }),
        Expr::Call {
            name,
            base,
            scalar,
            args,
        } => json!({
            "kind": "call",
            "type": scalar.to_string(),
            "name": name,
            "base": base,
            "children": args.iter().map(serialize_expr).collect::<Vec<_>>(),
        }),
    }
}

/// Encodes a statement tree as a tagged record tree.
pub fn serialize_stmt(stmt: &Stmt) -> Value {
    match stmt {
        Stmt::For {
            var,
            start,
            stop,
            body,
        } => json!({
            "kind": "for",
            "var": var,
            "start": serialize_expr(start),
            "stop": serialize_expr(stop),
            "body": serialize_stmt(body),
        }),
        Stmt::Block(stmts) => json!({
            "kind": "block",
            "children": stmts.iter().map(serialize_stmt).collect::<Vec<_>>(),
        }),
        Stmt::Store {
            target,
            indices,
            value,
        } => json!({
            "kind": "store",
            "target": target,
            "indices": indices.iter().map(serialize_expr).collect::<Vec<_>>(),
            "value": serialize_expr(value),
        }),
    }
}

fn record<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>, DecodeError> {
    value.as_object().ok_or_else(|| DecodeError::Malformed {
        kind: what.to_owned(),
        detail: "record is not a JSON object".to_owned(),
    })
}

fn kind_of(rec: &Map<String, Value>) -> Result<&str, DecodeError> {
    rec.get("kind")
        .and_then(Value::as_str)
        .ok_or_else(|| DecodeError::MissingField {
            kind: "<unknown>".to_owned(),
            field: "kind".to_owned(),
        })
}

fn field<'a>(
    rec: &'a Map<String, Value>,
    kind: &str,
    name: &str,
) -> Result<&'a Value, DecodeError> {
    rec.get(name).ok_or_else(|| DecodeError::MissingField {
        kind: kind.to_owned(),
        field: name.to_owned(),
    })
}

fn str_field<'a>(
    rec: &'a Map<String, Value>,
    kind: &str,
    name: &str,
) -> Result<&'a str, DecodeError> {
    field(rec, kind, name)?
        .as_str()
        .ok_or_else(|| DecodeError::Malformed {
            kind: kind.to_owned(),
            detail: format!("field `{name}` is not a string"),
        })
}

fn scalar_field(rec: &Map<String, Value>, kind: &str) -> Result<Scalar, DecodeError> {
    let tag = str_field(rec, kind, "type")?;
    parse_scalar(tag)
}

fn parse_scalar(tag: &str) -> Result<Scalar, DecodeError> {
    match tag {
        "i8" => Ok(Scalar::I8),
        "i16" => Ok(Scalar::I16),
        "i32" => Ok(Scalar::I32),
        "i64" => Ok(Scalar::I64),
        "u8" => Ok(Scalar::U8),
        "u32" => Ok(Scalar::U32),
        "f16" => Ok(Scalar::F16),
        "f32" => Ok(Scalar::F32),
        "f64" => Ok(Scalar::F64),
        other => Err(DecodeError::UnknownScalar(other.to_owned())),
    }
}

fn child_exprs(
    rec: &Map<String, Value>,
    kind: &str,
    field_name: &str,
    names: &mut NameRegistry,
) -> Result<Vec<Expr>, DecodeError> {
    let children = field(rec, kind, field_name)?
        .as_array()
        .ok_or_else(|| DecodeError::Malformed {
            kind: kind.to_owned(),
            detail: format!("field `{field_name}` is not an array"),
        })?;
    children
        .iter()
        .map(|c| deserialize_expr(c, names))
        .collect()
}

fn binary_operands(
    rec: &Map<String, Value>,
    kind: &str,
    names: &mut NameRegistry,
) -> Result<(Expr, Expr), DecodeError> {
    let children = child_exprs(rec, kind, "children", names)?;
    let count = children.len();
    let mut children = children.into_iter();
    match (children.next(), children.next(), children.next()) {
        (Some(left), Some(right), None) => Ok((left, right)),
        _ => Err(DecodeError::Malformed {
            kind: kind.to_owned(),
            detail: format!("expected 2 children, found {count}"),
        }),
    }
}

/// Decodes an expression record, re-validating all construction-time
/// invariants. Auto-named `call` targets get fresh names from `names`.
pub fn deserialize_expr(value: &Value, names: &mut NameRegistry) -> Result<Expr, DecodeError> {
    let rec = record(value, "expr")?;
    let kind = kind_of(rec)?;
    match kind {
        "int_imm" => {
            let scalar = scalar_field(rec, kind)?;
            let raw = field(rec, kind, "value")?
                .as_i64()
                .ok_or_else(|| DecodeError::Malformed {
                    kind: kind.to_owned(),
                    detail: "field `value` is not an integer".to_owned(),
                })?;
            let lit = match scalar {
                Scalar::I32 => {
                    Literal::I32(i32::try_from(raw).map_err(|_| DecodeError::Malformed {
                        kind: kind.to_owned(),
                        detail: format!("value {raw} out of range for i32"),
                    })?)
                }
                Scalar::I64 => Literal::I64(raw),
                Scalar::U32 => {
                    Literal::U32(u32::try_from(raw).map_err(|_| DecodeError::Malformed {
                        kind: kind.to_owned(),
                        detail: format!("value {raw} out of range for u32"),
                    })?)
                }
                other => {
                    return Err(DecodeError::BadType {
                        kind: kind.to_owned(),
                        ty: other.to_string(),
                    })
                }
            };
            Ok(Expr::Literal(lit))
        }
        "float_imm" => {
            let scalar = scalar_field(rec, kind)?;
            let raw = field(rec, kind, "value")?
                .as_f64()
                .ok_or_else(|| DecodeError::Malformed {
                    kind: kind.to_owned(),
                    detail: "field `value` is not a number".to_owned(),
                })?;
            match scalar {
                Scalar::F32 => Ok(Expr::float(raw as f32)?),
                Scalar::F64 => Ok(Expr::double(raw)?),
                other => Err(DecodeError::BadType {
                    kind: kind.to_owned(),
                    ty: other.to_string(),
                }),
            }
        }
        "var" => {
            let scalar = scalar_field(rec, kind)?;
            let name = str_field(rec, kind, "name")?;
            Ok(Expr::var(name, scalar))
        }
        "add" | "sub" | "mul" | "div" | "mod" => {
            let op = match kind {
                "add" => BinaryOp::Add,
                "sub" => BinaryOp::Sub,
                "mul" => BinaryOp::Mul,
                "div" => BinaryOp::Div,
                _ => BinaryOp::Mod,
            };
            let (left, right) = binary_operands(rec, kind, names)?;
            let expr = Expr::binary(op, left, right)?;
            // The declared type is redundant with the operand types, but a
            // disagreement means the record was forged or corrupted.
            if rec.contains_key("type") {
                let declared = scalar_field(rec, kind)?;
                if declared != expr.scalar() {
                    return Err(DecodeError::BadType {
                        kind: kind.to_owned(),
                        ty: declared.to_string(),
                    });
                }
            }
            Ok(expr)
        }
        "compare_select" => {
            let op = match str_field(rec, kind, "op")? {
                "eq" => CompareOp::Eq,
                "ne" => CompareOp::Ne,
                "lt" => CompareOp::Lt,
                "le" => CompareOp::Le,
                "gt" => CompareOp::Gt,
                "ge" => CompareOp::Ge,
                other => {
                    return Err(DecodeError::Malformed {
                        kind: kind.to_owned(),
                        detail: format!("unknown comparison `{other}`"),
                    })
                }
            };
            let (left, right) = binary_operands(rec, kind, names)?;
            Ok(Expr::compare_select(op, left, right)?)
        }
        "cast" => {
            let scalar = scalar_field(rec, kind)?;
            let children = child_exprs(rec, kind, "children", names)?;
            let count = children.len();
            let mut children = children.into_iter();
            match (children.next(), children.next()) {
                (Some(value), None) => Ok(Expr::cast(scalar, value)),
                _ => Err(DecodeError::Malformed {
                    kind: kind.to_owned(),
                    detail: format!("expected 1 child, found {count}"),
                }),
            }
        }
        "call" => {
            let scalar = scalar_field(rec, kind)?;
            let name = str_field(rec, kind, "name")?.to_owned();
            let base = match rec.get("base").unwrap_or(&Value::Null) {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                _ => {
                    return Err(DecodeError::Malformed {
                        kind: kind.to_owned(),
                        detail: "field `base` is not a string or null".to_owned(),
                    })
                }
            };
            let args = child_exprs(rec, kind, "children", names)?;
            match base {
                Some(base) => {
                    let rebuilt = Expr::call_generated(names, &base, scalar, args)?;
                    if let Expr::Call { name: minted, .. } = &rebuilt {
                        log::debug!("re-registered computation `{name}` as `{minted}`");
                    }
                    Ok(rebuilt)
                }
                None => Ok(Expr::call(name, scalar, args)?),
            }
        }
        other => Err(DecodeError::UnknownKind(other.to_owned())),
    }
}

/// Decodes a statement record, re-validating all construction-time
/// invariants.
pub fn deserialize_stmt(value: &Value, names: &mut NameRegistry) -> Result<Stmt, DecodeError> {
    let rec = record(value, "stmt")?;
    let kind = kind_of(rec)?;
    match kind {
        "for" => {
            let var = str_field(rec, kind, "var")?.to_owned();
            let start = deserialize_expr(field(rec, kind, "start")?, names)?;
            let stop = deserialize_expr(field(rec, kind, "stop")?, names)?;
            let body = deserialize_stmt(field(rec, kind, "body")?, names)?;
            Ok(Stmt::for_range(var, start, stop, body)?)
        }
        "block" => {
            let children = field(rec, kind, "children")?
                .as_array()
                .ok_or_else(|| DecodeError::Malformed {
                    kind: kind.to_owned(),
                    detail: "field `children` is not an array".to_owned(),
                })?;
            let stmts = children
                .iter()
                .map(|c| deserialize_stmt(c, names))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Stmt::block(stmts))
        }
        "store" => {
            let target = str_field(rec, kind, "target")?.to_owned();
            let indices = child_exprs(rec, kind, "indices", names)?;
            let value = deserialize_expr(field(rec, kind, "value")?, names)?;
            Ok(Stmt::store(target, indices, value)?)
        }
        other => Err(DecodeError::UnknownKind(other.to_owned())),
    }
}
