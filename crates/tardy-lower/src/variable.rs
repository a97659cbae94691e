// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Late variable descriptors and the run-time violations they can raise.

use std::fmt;

use tardy_ast::{Expr, Span, Ty};

/// Where a late variable lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LateKind {
    /// Instance field, stored on the receiver.
    Field,
    /// Static or top-level field, stored in a global slot.
    StaticField,
    /// Function-local variable.
    Local,
}

impl LateKind {
    /// Label interpolated into error messages.
    pub fn label(self) -> &'static str {
        match self {
            LateKind::Field | LateKind::StaticField => "Field",
            LateKind::Local => "Local",
        }
    }
}

/// A variable the front-end decided is late. Read-only to lowering.
#[derive(Debug, Clone)]
pub struct LateVariable {
    pub name: String,
    pub declared_type: Ty,
    pub kind: LateKind,
    pub is_final: bool,
    pub initializer: Option<Expr>,
    pub span: Span,
}

impl LateVariable {
    pub fn new(name: impl Into<String>, declared_type: Ty, kind: LateKind) -> Self {
        Self {
            name: name.into(),
            declared_type,
            kind,
            is_final: false,
            initializer: None,
            span: Span::default(),
        }
    }

    pub fn with_final(mut self, is_final: bool) -> Self {
        self.is_final = is_final;
        self
    }

    pub fn with_initializer(mut self, initializer: Expr) -> Self {
        self.initializer = Some(initializer);
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn has_initializer(&self) -> bool {
        self.initializer.is_some()
    }

    pub fn kind_label(&self) -> &'static str {
        self.kind.label()
    }

    /// Reads narrow back to the declared type only when it may exclude null.
    pub fn needs_promotion(&self) -> bool {
        self.declared_type.is_potentially_non_nullable()
    }
}

/// The three ways generated accessors can fail at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LateViolation {
    /// Read before any write, and no initializer.
    NotInitialized,
    /// Second write to a final variable.
    AlreadyInitialized,
    /// A final variable was written while its own initializer ran.
    AssignedDuringInitialization,
}

impl LateViolation {
    pub fn message(self, kind_label: &str, name: &str) -> String {
        format!("{} '{}' {}", kind_label, name, self)
    }
}

impl fmt::Display for LateViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LateViolation::NotInitialized => write!(f, "has not been initialized."),
            LateViolation::AlreadyInitialized => write!(f, "has already been initialized."),
            LateViolation::AssignedDuringInitialization => {
                write!(f, "has been assigned during initialization.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            LateViolation::NotInitialized.message("Field", "count"),
            "Field 'count' has not been initialized."
        );
        assert_eq!(
            LateViolation::AlreadyInitialized.message("Local", "x"),
            "Local 'x' has already been initialized."
        );
        assert_eq!(
            LateViolation::AssignedDuringInitialization.message("Field", "cache"),
            "Field 'cache' has been assigned during initialization."
        );
    }

    #[test]
    fn promotion_follows_declared_type() {
        let field = |ty| LateVariable::new("x", ty, LateKind::Field);
        assert!(field(Ty::non_nullable("int")).needs_promotion());
        assert!(field(Ty::type_param("T")).needs_promotion());
        assert!(!field(Ty::nullable("int")).needs_promotion());
    }

    #[test]
    fn static_fields_report_as_fields() {
        assert_eq!(LateKind::StaticField.label(), "Field");
        assert_eq!(LateKind::Local.label(), "Local");
    }
}
