// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! BodyBuilder - shared helpers for accessor synthesis.

use tardy_ast::{Expr, Span, Stmt, Ty};

use crate::{LateVariable, LateViolation, RuntimeNames, UnsetMarker};

/// Per-call synthesis state. Owns the fresh-name counter, so separate
/// synthesis calls never share anything.
pub(crate) struct BodyBuilder<'a> {
    var: &'a LateVariable,
    runtime: &'a RuntimeNames,
    next_temp: u32,
}

impl<'a> BodyBuilder<'a> {
    pub fn new(var: &'a LateVariable, runtime: &'a RuntimeNames) -> Self {
        Self { var, runtime, next_temp: 0 }
    }

    pub fn span(&self) -> Span {
        self.var.span
    }

    /// `%` never starts a storage name (`#x`, `_#x`), so a temporary cannot
    /// shadow the slot it guards.
    pub fn fresh_temp(&mut self) -> String {
        let name = format!("%t{}", self.next_temp);
        self.next_temp += 1;
        name
    }

    pub fn var(&self, name: &str) -> Expr {
        Expr::var(name, self.span())
    }

    /// Declared type widened to admit the unset marker.
    pub fn storage_type(&self) -> Ty {
        self.var.declared_type.with_nullable()
    }

    pub fn declared_type(&self) -> Ty {
        self.var.declared_type.clone()
    }

    /// Read of a scoped temporary known to hold an initialized value.
    pub fn initialized_read(&self, temp: &str) -> Expr {
        let read = self.var(temp);
        if self.var.needs_promotion() {
            Expr::promote(read, self.declared_type())
        } else {
            read
        }
    }

    /// True when `value` is the uninitialized marker.
    pub fn is_unset(&self, marker: UnsetMarker, value: Expr) -> Expr {
        match marker {
            UnsetMarker::Null => Expr::equals_null(value),
            UnsetMarker::Sentinel => Expr::call(self.runtime.is_sentinel.clone(), vec![value], self.span()),
        }
    }

    /// `throw LateError("<Label> '<name>' ...")`
    pub fn violation(&self, violation: LateViolation) -> Expr {
        let message = violation.message(self.var.kind_label(), &self.var.name);
        Expr::throw(Expr::call(
            self.runtime.late_error.clone(),
            vec![Expr::string(message, self.span())],
            self.span(),
        ))
    }

    pub fn block(&self, stmts: Vec<Stmt>) -> Stmt {
        Stmt::block(stmts, self.span())
    }

    /// Scoped binding spanned at the variable, not at its initializer.
    pub fn let_in(&self, name: String, ty: Ty, init: Expr, body: Expr) -> Expr {
        Expr::let_in(name, ty, init, body).with_span(self.span())
    }

    pub fn let_decl(&self, name: String, ty: Ty, init: Expr) -> Stmt {
        Stmt::let_decl(name, ty, init).with_span(self.span())
    }
}
