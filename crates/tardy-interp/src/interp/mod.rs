// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The interpreter implementation.
//!
//! Function bodies run against the caller's environment with a fresh scope
//! pushed for parameters, so they see globals and anything the caller has
//! in scope.

use std::collections::HashMap;
use std::rc::Rc;

mod eval_expr;
mod exec_stmt;

use tardy_ast::Stmt;
use tardy_lower::RuntimeNames;
use thiserror::Error;
use tracing::trace;

use crate::env::Environment;
use crate::value::Value;

/// Native function callable from interpreted code.
pub type HostFn = Rc<dyn Fn(&mut Interpreter, Vec<Value>) -> Result<Value, RuntimeError>>;

struct UserFunction {
    params: Vec<String>,
    body: Stmt,
}

#[derive(Clone)]
enum Callable {
    User(Rc<UserFunction>),
    Host(HostFn),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("undefined variable `{0}`")]
    UndefinedVariable(String),

    #[error("undefined function `{0}`")]
    UndefinedFunction(String),

    #[error("no field `{0}` on object")]
    NoSuchField(String),

    #[error("{0}")]
    TypeError(String),

    #[error("`{name}` expects {expected} argument{}, got {got}", if *.expected == 1 { "" } else { "s" })]
    ArityMismatch { name: String, expected: usize, got: usize },

    #[error("uncaught {0}")]
    Thrown(Value),

    // Control flow (not an actual error)
    #[error("return")]
    Return(Value),
}

impl RuntimeError {
    /// Message of a thrown late initialization error, if that is what this is.
    pub fn late_error_message(&self) -> Option<&str> {
        match self {
            RuntimeError::Thrown(Value::Error { kind, message }) if kind == "LateError" => {
                Some(message)
            }
            _ => None,
        }
    }
}

/// The tree-walk interpreter.
pub struct Interpreter {
    pub(crate) env: Environment,
    functions: HashMap<String, Callable>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_runtime(&RuntimeNames::default())
    }

    /// Interpreter whose runtime entry points use the given names.
    pub fn with_runtime(runtime: &RuntimeNames) -> Self {
        let mut interp = Self { env: Environment::new(), functions: HashMap::new() };
        interp.register_runtime(runtime);
        interp
    }

    fn register_runtime(&mut self, runtime: &RuntimeNames) {
        self.define_host_function(&runtime.create_sentinel, |_, args| {
            expect_arity("createSentinel", &args, 0)?;
            Ok(Value::Sentinel)
        });
        self.define_host_function(&runtime.is_sentinel, |_, args| {
            expect_arity("isSentinel", &args, 1)?;
            Ok(Value::Bool(matches!(args[0], Value::Sentinel)))
        });
        self.define_host_function(&runtime.late_error, |_, mut args| {
            expect_arity("LateError", &args, 1)?;
            match args.remove(0) {
                Value::String(message) => Ok(Value::Error { kind: "LateError".to_string(), message }),
                other => Err(RuntimeError::TypeError(format!(
                    "LateError expects a String message, got {}",
                    other.type_name()
                ))),
            }
        });
    }

    pub fn define_global(&mut self, name: impl Into<String>, value: Value) {
        self.env.define_global(name.into(), value);
    }

    pub fn get_var(&self, name: &str) -> Option<&Value> {
        self.env.get(name)
    }

    pub fn define_function(&mut self, name: impl Into<String>, params: Vec<String>, body: Stmt) {
        self.functions
            .insert(name.into(), Callable::User(Rc::new(UserFunction { params, body })));
    }

    pub fn define_host_function<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&mut Interpreter, Vec<Value>) -> Result<Value, RuntimeError> + 'static,
    {
        self.functions.insert(name.into(), Callable::Host(Rc::new(f)));
    }

    pub fn call_function(&mut self, name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let callable = self
            .functions
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedFunction(name.to_string()))?;
        trace!(function = name, args = args.len(), depth = self.env.depth(), "call");

        match callable {
            Callable::Host(f) => f(self, args),
            Callable::User(func) => {
                expect_arity(name, &args, func.params.len())?;
                self.env.push_scope();
                for (param, arg) in func.params.iter().zip(args) {
                    self.env.define(param.clone(), arg);
                }
                let result = self.exec_stmt(&func.body);
                self.env.pop_scope();
                match result {
                    Ok(()) => Ok(Value::Null),
                    Err(RuntimeError::Return(value)) => Ok(value),
                    Err(e) => Err(e),
                }
            }
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn expect_arity(name: &str, args: &[Value], expected: usize) -> Result<(), RuntimeError> {
    if args.len() != expected {
        return Err(RuntimeError::ArityMismatch {
            name: name.to_string(),
            expected,
            got: args.len(),
        });
    }
    Ok(())
}
