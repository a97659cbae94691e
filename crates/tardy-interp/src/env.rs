// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Environment for variable bindings.

use std::collections::HashMap;
use crate::value::Value;

/// A scope in the environment.
#[derive(Debug, Default)]
struct Scope {
    bindings: HashMap<String, Value>,
}

/// Scoped variable bindings. Lookups walk from the innermost scope out, so
/// the bottom scope holds globals.
#[derive(Debug)]
pub struct Environment {
    scopes: Vec<Scope>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Pop the current scope. The global scope is never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Define a variable in the current scope, shadowing outer ones.
    pub fn define(&mut self, name: String, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.bindings.insert(name, value);
        }
    }

    pub fn define_global(&mut self, name: String, value: Value) {
        if let Some(scope) = self.scopes.first_mut() {
            scope.bindings.insert(name, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.bindings.get(name))
    }

    /// Assign to the innermost existing binding. Returns false if unbound.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(slot) = scope.bindings.get_mut(name) {
                *slot = value;
                return true;
            }
        }
        false
    }
}
