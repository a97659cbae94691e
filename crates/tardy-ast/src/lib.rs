// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Tree vocabulary for synthesized accessor bodies.
//!
//! The lowering engine only ever builds trees out of these nodes. The
//! interpreter and the pretty printer consume them.

pub mod span;
pub mod ty;
pub mod expr;
pub mod stmt;
mod display;

pub use span::Span;
pub use ty::{Nullability, Ty};
pub use expr::{Expr, ExprKind};
pub use stmt::{Stmt, StmtKind};
