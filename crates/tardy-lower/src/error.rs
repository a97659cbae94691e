// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lowering errors.
//!
//! These are contract violations by the caller, reported when the accessor
//! is built. Errors raised by the generated code at run time are described
//! by [`crate::LateViolation`] instead.

use thiserror::Error;

use crate::IsSetEncoding;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LowerError {
    #[error("unsupported lowering configuration: {0}")]
    UnsupportedConfiguration(String),

    #[error("late variable `{name}` uses an is-set flag but no flag storage was supplied")]
    MissingFlagStorage { name: String },

    #[error("late variable `{name}` is encoded with {encoding} and has no flag storage, but flag storage was supplied")]
    UnexpectedFlagStorage { name: String, encoding: IsSetEncoding },

    #[error("late variable `{name}` needs {expected} but its accessor binding was built for {found}")]
    EncodingMismatch {
        name: String,
        expected: IsSetEncoding,
        found: IsSetEncoding,
    },
}
