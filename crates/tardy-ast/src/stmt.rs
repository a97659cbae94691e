// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statement nodes.

use crate::expr::Expr;
use crate::{Span, Ty};

/// A statement in a synthesized tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

/// The kind of statement.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Expression statement
    Expr(Expr),
    /// Block of statements
    Block(Vec<Stmt>),
    /// If statement with optional else
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    /// Return statement
    Return(Option<Expr>),
    /// Local binding, visible to the rest of the enclosing block
    Let {
        name: String,
        ty: Ty,
        init: Expr,
    },
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn expr(expr: Expr) -> Self {
        let span = expr.span;
        Self::new(StmtKind::Expr(expr), span)
    }

    pub fn block(stmts: Vec<Stmt>, span: Span) -> Self {
        Self::new(StmtKind::Block(stmts), span)
    }

    pub fn if_then(cond: Expr, then_branch: Stmt) -> Self {
        let span = cond.span;
        Self::new(
            StmtKind::If { cond, then_branch: Box::new(then_branch), else_branch: None },
            span,
        )
    }

    pub fn if_else(cond: Expr, then_branch: Stmt, else_branch: Stmt) -> Self {
        let span = cond.span;
        Self::new(
            StmtKind::If {
                cond,
                then_branch: Box::new(then_branch),
                else_branch: Some(Box::new(else_branch)),
            },
            span,
        )
    }

    pub fn let_decl(name: impl Into<String>, ty: Ty, init: Expr) -> Self {
        let span = init.span;
        Self::new(StmtKind::Let { name: name.into(), ty, init }, span)
    }

    pub fn ret(value: Expr) -> Self {
        let span = value.span;
        Self::new(StmtKind::Return(Some(value)), span)
    }

    /// Whether control can fall off the end of this statement.
    ///
    /// Getter bodies must not: every path returns or throws.
    pub fn can_complete_normally(&self) -> bool {
        match &self.kind {
            StmtKind::Return(_) => false,
            StmtKind::Expr(e) => !e.always_throws(),
            StmtKind::Let { init, .. } => !init.always_throws(),
            StmtKind::Block(stmts) => stmts.iter().all(|s| s.can_complete_normally()),
            StmtKind::If { cond, then_branch, else_branch } => {
                if cond.always_throws() {
                    return false;
                }
                match else_branch {
                    Some(else_branch) => {
                        then_branch.can_complete_normally() || else_branch.can_complete_normally()
                    }
                    None => true,
                }
            }
        }
    }
}
