// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Runtime values.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Shared mutable field storage of an object.
pub type Object = Rc<RefCell<HashMap<String, Value>>>;

/// A runtime value in the interpreter.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    String(String),
    /// The runtime's "not yet initialized" marker. Never a legitimate value.
    Sentinel,
    /// Object with named fields, compared by identity
    Object(Object),
    /// Error value built by the runtime, usually thrown
    Error { kind: String, message: String },
}

impl Value {
    pub fn object<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        Value::Object(Rc::new(RefCell::new(fields.into_iter().collect())))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::String(_) => "String",
            Value::Sentinel => "Sentinel",
            Value::Object(_) => "Object",
            Value::Error { .. } => "Error",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) | (Value::Sentinel, Value::Sentinel) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (
                Value::Error { kind: k1, message: m1 },
                Value::Error { kind: k2, message: m2 },
            ) => k1 == k2 && m1 == m2,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::String(s) => write!(f, "{}", s),
            Value::Sentinel => write!(f, "<sentinel>"),
            Value::Object(_) => write!(f, "<object>"),
            Value::Error { kind, message } => write!(f, "{}: {}", kind, message),
        }
    }
}
