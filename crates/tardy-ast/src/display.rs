// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Display implementations for synthesized trees.
//!
//! Output is for humans and golden tests, not for reparsing.

use crate::{Expr, ExprKind, Nullability, Stmt, StmtKind, Ty};
use std::fmt;

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.nullability {
            Nullability::Nullable => write!(f, "{}?", self.name),
            Nullability::NonNullable => write!(f, "{}", self.name),
            // Same short form `Ty::parse` accepts
            Nullability::Undetermined => write!(f, "<{}>", self.name),
        }
    }
}

/// Operands that never need parentheses.
fn is_atomic(expr: &Expr) -> bool {
    matches!(
        expr.kind,
        ExprKind::Null
            | ExprKind::Bool(_)
            | ExprKind::Int(_)
            | ExprKind::String(_)
            | ExprKind::Var(_)
            | ExprKind::FieldGet { .. }
            | ExprKind::Promote { .. }
            | ExprKind::Call { .. }
    )
}

struct Operand<'a>(&'a Expr);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if is_atomic(self.0) {
            write!(f, "{}", self.0)
        } else {
            write!(f, "({})", self.0)
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Null => write!(f, "null"),
            ExprKind::Bool(v) => write!(f, "{}", v),
            ExprKind::Int(v) => write!(f, "{}", v),
            ExprKind::String(s) => write!(f, "{:?}", s),
            ExprKind::Var(name) => write!(f, "{}", name),
            ExprKind::Assign { name, value } => write!(f, "{} = {}", name, value),
            ExprKind::FieldGet { receiver, field } => {
                write!(f, "{}.{}", Operand(receiver), field)
            }
            ExprKind::FieldSet { receiver, field, value } => {
                write!(f, "{}.{} = {}", Operand(receiver), field, value)
            }
            ExprKind::Not(operand) => write!(f, "!{}", Operand(operand)),
            ExprKind::EqualsNull(operand) => write!(f, "{} == null", Operand(operand)),
            ExprKind::Promote { expr, ty } => write!(f, "{}{{{}}}", Operand(expr), ty),
            ExprKind::Conditional { cond, then_branch, else_branch } => write!(
                f,
                "{} ? {} : {}",
                Operand(cond),
                Operand(then_branch),
                Operand(else_branch)
            ),
            ExprKind::Let { name, ty, init, body } => {
                write!(f, "let {} {} = {} in {}", ty, name, init, body)
            }
            ExprKind::Throw(value) => write!(f, "throw {}", Operand(value)),
            ExprKind::Call { func, args } => {
                write!(f, "{}(", func)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

fn write_stmt(f: &mut fmt::Formatter<'_>, stmt: &Stmt, depth: usize) -> fmt::Result {
    let pad = "  ".repeat(depth);
    match &stmt.kind {
        StmtKind::Expr(e) => writeln!(f, "{}{};", pad, e),
        StmtKind::Return(Some(e)) => writeln!(f, "{}return {};", pad, e),
        StmtKind::Return(None) => writeln!(f, "{}return;", pad),
        StmtKind::Let { name, ty, init } => writeln!(f, "{}{} {} = {};", pad, ty, name, init),
        StmtKind::Block(stmts) => {
            writeln!(f, "{}{{", pad)?;
            for s in stmts {
                write_stmt(f, s, depth + 1)?;
            }
            writeln!(f, "{}}}", pad)
        }
        StmtKind::If { cond, then_branch, else_branch } => {
            write!(f, "{}if ({})", pad, cond)?;
            write_branch(f, then_branch, depth)?;
            if let Some(else_branch) = else_branch {
                write!(f, "{}else", pad)?;
                write_branch(f, else_branch, depth)?;
            }
            Ok(())
        }
    }
}

/// Branch bodies: blocks open on the same line, single statements indent.
fn write_branch(f: &mut fmt::Formatter<'_>, stmt: &Stmt, depth: usize) -> fmt::Result {
    match &stmt.kind {
        StmtKind::Block(stmts) => {
            writeln!(f, " {{")?;
            for s in stmts {
                write_stmt(f, s, depth + 1)?;
            }
            writeln!(f, "{}}}", "  ".repeat(depth))
        }
        _ => {
            writeln!(f)?;
            write_stmt(f, stmt, depth + 1)
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_stmt(f, self, 0)
    }
}
