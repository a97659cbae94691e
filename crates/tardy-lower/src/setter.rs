// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Setter synthesis.

use tardy_ast::{Expr, Stmt};
use tracing::trace;

use crate::builder::BodyBuilder;
use crate::{AccessorBinding, IsSetSignal, LateVariable, LateViolation, LoweringConfig};

/// `return <write>` or `<write>;` depending on the setter convention.
fn finish_write(write: Expr, config: &LoweringConfig) -> Stmt {
    if config.setter_returns_value {
        Stmt::ret(write)
    } else {
        Stmt::expr(write)
    }
}

/// Setter for a non-final late variable. Always writes.
pub fn create_setter_body(
    var: &LateVariable,
    value: Expr,
    binding: &AccessorBinding<'_>,
    config: &LoweringConfig,
) -> Stmt {
    trace!(name = %var.name, encoding = %binding.encoding(), "setter");
    let b = BodyBuilder::new(var, &config.runtime);
    let assignment = finish_write(binding.storage().write(value), config);

    match binding.signal() {
        // isSet = true; storage = value;
        IsSetSignal::Flag(flag) => b.block(vec![Stmt::expr(flag.write_flag(true)), assignment]),
        // storage = value;
        IsSetSignal::Marker(_) => assignment,
    }
}

/// Setter for a final late variable. Accepts one write.
///
/// The check reads before it writes, so a write nested inside an earlier
/// write's evaluation is still caught.
pub fn create_setter_body_final(
    var: &LateVariable,
    value: Expr,
    binding: &AccessorBinding<'_>,
    config: &LoweringConfig,
) -> Stmt {
    trace!(name = %var.name, encoding = %binding.encoding(), "final setter");
    let b = BodyBuilder::new(var, &config.runtime);
    let storage = binding.storage();
    let assignment = finish_write(storage.write(value), config);

    match binding.signal() {
        IsSetSignal::Flag(flag) => {
            // if (isSet) throw ...; else { isSet = true; storage = value; }
            Stmt::if_else(
                flag.read_flag(),
                Stmt::expr(b.violation(LateViolation::AlreadyInitialized)),
                b.block(vec![Stmt::expr(flag.write_flag(true)), assignment]),
            )
        }
        IsSetSignal::Marker(marker) => {
            // if (isUnset(storage)) storage = value; else throw ...;
            Stmt::if_else(
                b.is_unset(marker, storage.read(false)),
                assignment,
                Stmt::expr(b.violation(LateViolation::AlreadyInitialized)),
            )
        }
    }
}
