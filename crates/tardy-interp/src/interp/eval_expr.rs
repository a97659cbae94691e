// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression evaluation. Operands are evaluated strictly left to right.

use tardy_ast::{Expr, ExprKind, Nullability, Ty};

use crate::value::Value;

use super::{Interpreter, RuntimeError};

impl Interpreter {
    pub fn eval_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match &expr.kind {
            ExprKind::Null => Ok(Value::Null),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Int(i) => Ok(Value::Int(*i)),
            ExprKind::String(s) => Ok(Value::String(s.clone())),

            ExprKind::Var(name) => self
                .env
                .get(name)
                .cloned()
                .ok_or_else(|| RuntimeError::UndefinedVariable(name.clone())),

            ExprKind::Assign { name, value } => {
                let value = self.eval_expr(value)?;
                if !self.env.assign(name, value.clone()) {
                    return Err(RuntimeError::UndefinedVariable(name.clone()));
                }
                Ok(value)
            }

            ExprKind::FieldGet { receiver, field } => {
                let object = self.eval_object(receiver)?;
                let value = object.borrow().get(field).cloned();
                value.ok_or_else(|| RuntimeError::NoSuchField(field.clone()))
            }

            ExprKind::FieldSet { receiver, field, value } => {
                let object = self.eval_object(receiver)?;
                // The value may re-enter and touch this same object, so no
                // borrow is held while it runs.
                let value = self.eval_expr(value)?;
                let mut fields = object.borrow_mut();
                let slot = fields
                    .get_mut(field)
                    .ok_or_else(|| RuntimeError::NoSuchField(field.clone()))?;
                *slot = value.clone();
                Ok(value)
            }

            ExprKind::Not(operand) => {
                let b = self.eval_condition(operand)?;
                Ok(Value::Bool(!b))
            }

            ExprKind::EqualsNull(operand) => {
                let value = self.eval_expr(operand)?;
                Ok(Value::Bool(matches!(value, Value::Null)))
            }

            ExprKind::Promote { expr, ty } => {
                let value = self.eval_expr(expr)?;
                check_promotion(&value, ty)?;
                Ok(value)
            }

            ExprKind::Conditional { cond, then_branch, else_branch } => {
                if self.eval_condition(cond)? {
                    self.eval_expr(then_branch)
                } else {
                    self.eval_expr(else_branch)
                }
            }

            ExprKind::Let { name, init, body, .. } => {
                let value = self.eval_expr(init)?;
                self.env.push_scope();
                self.env.define(name.clone(), value);
                let result = self.eval_expr(body);
                self.env.pop_scope();
                result
            }

            ExprKind::Throw(value) => {
                let value = self.eval_expr(value)?;
                Err(RuntimeError::Thrown(value))
            }

            ExprKind::Call { func, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.eval_expr(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                self.call_function(func, args)
            }
        }
    }

    pub(super) fn eval_condition(&mut self, expr: &Expr) -> Result<bool, RuntimeError> {
        match self.eval_expr(expr)? {
            Value::Bool(b) => Ok(b),
            other => Err(RuntimeError::TypeError(format!(
                "condition must be bool, got {}",
                other.type_name()
            ))),
        }
    }

    fn eval_object(&mut self, expr: &Expr) -> Result<crate::Object, RuntimeError> {
        match self.eval_expr(expr)? {
            Value::Object(object) => Ok(object),
            other => Err(RuntimeError::TypeError(format!(
                "field access on non-object {}",
                other.type_name()
            ))),
        }
    }
}

/// A narrowing read must never observe the unset marker.
fn check_promotion(value: &Value, ty: &Ty) -> Result<(), RuntimeError> {
    match value {
        Value::Sentinel => Err(RuntimeError::TypeError(format!(
            "uninitialized sentinel read as {}",
            ty
        ))),
        Value::Null if ty.nullability == Nullability::NonNullable => Err(RuntimeError::TypeError(
            format!("null read as non-nullable {}", ty),
        )),
        _ => Ok(()),
    }
}
