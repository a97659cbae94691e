// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Accessor bindings: the only place that knows where a late variable lives.
//!
//! Synthesizers talk to storage through [`StorageAccess`] and, for the flag
//! encoding only, [`FlagAccess`]. They never look at whether the variable is
//! a field or a local.

use tardy_ast::{Expr, Span, Ty};

use crate::{IsSetEncoding, LowerError};

/// Read and write the main storage slot.
pub trait StorageAccess {
    /// Read the slot. With `needs_promotion`, narrow the read back to the
    /// declared type; the slot itself is typed nullable.
    fn read(&self, needs_promotion: bool) -> Expr;
    /// Write the slot. The resulting expression evaluates to `value`.
    fn write(&self, value: Expr) -> Expr;
}

/// Read and write the separate is-set flag.
pub trait FlagAccess {
    fn read_flag(&self) -> Expr;
    fn write_flag(&self, value: bool) -> Expr;
}

/// Value stored in the main slot while it is uninitialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsetMarker {
    Null,
    Sentinel,
}

/// How the synthesizer learns whether the slot is set.
#[derive(Clone, Copy)]
pub enum IsSetSignal<'a> {
    Flag(&'a dyn FlagAccess),
    Marker(UnsetMarker),
}

#[derive(Clone, Copy)]
pub struct AccessorBinding<'a> {
    storage: &'a dyn StorageAccess,
    signal: IsSetSignal<'a>,
}

impl<'a> AccessorBinding<'a> {
    pub fn with_flag(storage: &'a dyn StorageAccess, flag: &'a dyn FlagAccess) -> Self {
        Self { storage, signal: IsSetSignal::Flag(flag) }
    }

    pub fn with_marker(storage: &'a dyn StorageAccess, marker: UnsetMarker) -> Self {
        Self { storage, signal: IsSetSignal::Marker(marker) }
    }

    /// Build a binding for `encoding`. Flag storage must be supplied exactly
    /// when the encoding needs it.
    pub fn for_encoding(
        name: &str,
        encoding: IsSetEncoding,
        storage: &'a dyn StorageAccess,
        flag: Option<&'a dyn FlagAccess>,
    ) -> Result<Self, LowerError> {
        match (encoding, flag) {
            (IsSetEncoding::UseIsSetField, Some(flag)) => Ok(Self::with_flag(storage, flag)),
            (IsSetEncoding::UseIsSetField, None) => {
                Err(LowerError::MissingFlagStorage { name: name.to_string() })
            }
            (IsSetEncoding::UseNull | IsSetEncoding::UseSentinel, Some(_)) => {
                Err(LowerError::UnexpectedFlagStorage { name: name.to_string(), encoding })
            }
            (IsSetEncoding::UseNull, None) => Ok(Self::with_marker(storage, UnsetMarker::Null)),
            (IsSetEncoding::UseSentinel, None) => {
                Ok(Self::with_marker(storage, UnsetMarker::Sentinel))
            }
        }
    }

    pub fn storage(&self) -> &'a dyn StorageAccess {
        self.storage
    }

    pub fn signal(&self) -> IsSetSignal<'a> {
        self.signal
    }

    pub fn encoding(&self) -> IsSetEncoding {
        match self.signal {
            IsSetSignal::Flag(_) => IsSetEncoding::UseIsSetField,
            IsSetSignal::Marker(UnsetMarker::Null) => IsSetEncoding::UseNull,
            IsSetSignal::Marker(UnsetMarker::Sentinel) => IsSetEncoding::UseSentinel,
        }
    }
}

/// Instance field storage: `receiver.field`.
#[derive(Debug, Clone)]
pub struct FieldStorage {
    pub receiver: Expr,
    pub field: String,
    pub declared_type: Ty,
}

impl StorageAccess for FieldStorage {
    fn read(&self, needs_promotion: bool) -> Expr {
        let get = Expr::field_get(self.receiver.clone(), self.field.clone());
        if needs_promotion {
            Expr::promote(get, self.declared_type.clone())
        } else {
            get
        }
    }

    fn write(&self, value: Expr) -> Expr {
        Expr::field_set(self.receiver.clone(), self.field.clone(), value)
    }
}

/// Instance field flag: `receiver.flag_field`.
#[derive(Debug, Clone)]
pub struct FieldFlag {
    pub receiver: Expr,
    pub field: String,
}

impl FlagAccess for FieldFlag {
    fn read_flag(&self) -> Expr {
        Expr::field_get(self.receiver.clone(), self.field.clone())
    }

    fn write_flag(&self, value: bool) -> Expr {
        let span = self.receiver.span;
        Expr::field_set(self.receiver.clone(), self.field.clone(), Expr::bool(value, span))
    }
}

/// Storage in a named variable. Used for locals and for static fields.
#[derive(Debug, Clone)]
pub struct VariableStorage {
    pub name: String,
    pub declared_type: Ty,
    pub span: Span,
}

impl StorageAccess for VariableStorage {
    fn read(&self, needs_promotion: bool) -> Expr {
        let get = Expr::var(self.name.clone(), self.span);
        if needs_promotion {
            Expr::promote(get, self.declared_type.clone())
        } else {
            get
        }
    }

    fn write(&self, value: Expr) -> Expr {
        Expr::assign(self.name.clone(), value).with_span(self.span)
    }
}

#[derive(Debug, Clone)]
pub struct VariableFlag {
    pub name: String,
    pub span: Span,
}

impl FlagAccess for VariableFlag {
    fn read_flag(&self) -> Expr {
        Expr::var(self.name.clone(), self.span)
    }

    fn write_flag(&self, value: bool) -> Expr {
        Expr::assign(self.name.clone(), Expr::bool(value, self.span))
    }
}
