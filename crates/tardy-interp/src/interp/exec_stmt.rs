// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statement execution.

use tardy_ast::{Stmt, StmtKind};

use crate::value::Value;

use super::{Interpreter, RuntimeError};

impl Interpreter {
    pub fn exec_stmt(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        match &stmt.kind {
            StmtKind::Expr(expr) => {
                self.eval_expr(expr)?;
                Ok(())
            }

            StmtKind::Let { name, init, .. } => {
                let value = self.eval_expr(init)?;
                self.env.define(name.clone(), value);
                Ok(())
            }

            StmtKind::Block(stmts) => {
                self.env.push_scope();
                let result = stmts.iter().try_for_each(|s| self.exec_stmt(s));
                self.env.pop_scope();
                result
            }

            StmtKind::If { cond, then_branch, else_branch } => {
                if self.eval_condition(cond)? {
                    self.exec_stmt(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec_stmt(else_branch)
                } else {
                    Ok(())
                }
            }

            StmtKind::Return(expr) => {
                let value = match expr {
                    Some(e) => self.eval_expr(e)?,
                    None => Value::Null,
                };
                Err(RuntimeError::Return(value))
            }
        }
    }
}
