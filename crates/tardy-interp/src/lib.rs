// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Tree-walk interpreter for synthesized accessor bodies.
//!
//! Executes lowered getters and setters directly, strictly left to right,
//! so the re-entrancy behaviour of generated code can be observed.

mod value;
mod env;
mod interp;

pub use interp::{HostFn, Interpreter, RuntimeError};
pub use value::{Object, Value};
