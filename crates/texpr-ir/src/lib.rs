//! Tensor expression intermediate representation.
//!
//! A tree-based, typed IR for scalar element computations inside tensor
//! kernels, with a canonical text printer and a structural JSON
//! serializer/deserializer. Trees are built bottom-up through validating
//! factory operations and are immutable afterwards.
//!
//! Names of derived computations (`Call` targets minted through
//! [`NameRegistry`]) are unique but not stable: decoding a serialized tree
//! draws fresh suffixes, so a round trip preserves structure and values
//! while generated names may advance (`chunk_1` may come back as
//! `chunk_2`).

mod error;
mod expr;
mod name;
mod printer;
mod serialize;
mod stmt;
mod types;

pub use error::{DecodeError, IrError};
pub use expr::{BinaryOp, CompareOp, Expr, Literal};
pub use name::NameRegistry;
pub use serialize::{deserialize_expr, deserialize_stmt, serialize_expr, serialize_stmt};
pub use stmt::Stmt;
pub use types::{Bytes, Scalar, ScalarKind};
