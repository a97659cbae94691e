// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression nodes.

use crate::{Span, Ty};

/// An expression in a synthesized tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

/// The kind of expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// `null` literal
    Null,
    /// Boolean literal
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// String literal
    String(String),
    /// Variable reference
    Var(String),
    /// Variable assignment; evaluates to the assigned value
    Assign {
        name: String,
        value: Box<Expr>,
    },
    /// Field read (`receiver.field`)
    FieldGet {
        receiver: Box<Expr>,
        field: String,
    },
    /// Field write; evaluates to the assigned value
    FieldSet {
        receiver: Box<Expr>,
        field: String,
        value: Box<Expr>,
    },
    /// Logical not (!)
    Not(Box<Expr>),
    /// `expr == null`
    EqualsNull(Box<Expr>),
    /// Narrowing read: the operand is known to hold a value of `ty`.
    Promote {
        expr: Box<Expr>,
        ty: Ty,
    },
    /// `cond ? then_branch : else_branch`
    Conditional {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    /// `let name = init in body`, `name` visible only in `body`
    Let {
        name: String,
        ty: Ty,
        init: Box<Expr>,
        body: Box<Expr>,
    },
    /// Throw expression
    Throw(Box<Expr>),
    /// Static function call
    Call {
        func: String,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Replace the span of this node. Children keep theirs.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn null(span: Span) -> Self {
        Self::new(ExprKind::Null, span)
    }

    pub fn bool(value: bool, span: Span) -> Self {
        Self::new(ExprKind::Bool(value), span)
    }

    pub fn int(value: i64, span: Span) -> Self {
        Self::new(ExprKind::Int(value), span)
    }

    pub fn string(value: impl Into<String>, span: Span) -> Self {
        Self::new(ExprKind::String(value.into()), span)
    }

    pub fn var(name: impl Into<String>, span: Span) -> Self {
        Self::new(ExprKind::Var(name.into()), span)
    }

    pub fn assign(name: impl Into<String>, value: Expr) -> Self {
        let span = value.span;
        Self::new(ExprKind::Assign { name: name.into(), value: Box::new(value) }, span)
    }

    pub fn field_get(receiver: Expr, field: impl Into<String>) -> Self {
        let span = receiver.span;
        Self::new(
            ExprKind::FieldGet { receiver: Box::new(receiver), field: field.into() },
            span,
        )
    }

    pub fn field_set(receiver: Expr, field: impl Into<String>, value: Expr) -> Self {
        let span = receiver.span;
        Self::new(
            ExprKind::FieldSet {
                receiver: Box::new(receiver),
                field: field.into(),
                value: Box::new(value),
            },
            span,
        )
    }

    pub fn not(operand: Expr) -> Self {
        let span = operand.span;
        Self::new(ExprKind::Not(Box::new(operand)), span)
    }

    pub fn equals_null(operand: Expr) -> Self {
        let span = operand.span;
        Self::new(ExprKind::EqualsNull(Box::new(operand)), span)
    }

    pub fn promote(expr: Expr, ty: Ty) -> Self {
        let span = expr.span;
        Self::new(ExprKind::Promote { expr: Box::new(expr), ty }, span)
    }

    pub fn conditional(cond: Expr, then_branch: Expr, else_branch: Expr) -> Self {
        let span = cond.span;
        Self::new(
            ExprKind::Conditional {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            span,
        )
    }

    pub fn let_in(name: impl Into<String>, ty: Ty, init: Expr, body: Expr) -> Self {
        let span = init.span;
        Self::new(
            ExprKind::Let {
                name: name.into(),
                ty,
                init: Box::new(init),
                body: Box::new(body),
            },
            span,
        )
    }

    pub fn throw(value: Expr) -> Self {
        let span = value.span;
        Self::new(ExprKind::Throw(Box::new(value)), span)
    }

    pub fn call(func: impl Into<String>, args: Vec<Expr>, span: Span) -> Self {
        Self::new(ExprKind::Call { func: func.into(), args }, span)
    }

    /// True if evaluating this expression always raises.
    pub fn always_throws(&self) -> bool {
        match &self.kind {
            ExprKind::Throw(_) => true,
            ExprKind::Conditional { cond, then_branch, else_branch } => {
                cond.always_throws() || (then_branch.always_throws() && else_branch.always_throws())
            }
            ExprKind::Let { init, body, .. } => init.always_throws() || body.always_throws(),
            ExprKind::Not(e) | ExprKind::EqualsNull(e) => e.always_throws(),
            ExprKind::Promote { expr, .. } => expr.always_throws(),
            _ => false,
        }
    }
}
