// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Static types, as far as late lowering cares about them.
//!
//! The front-end owns real type representation. Lowering only needs a name
//! to print and a nullability classification.

/// Nullability classification supplied by the type collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Nullability {
    /// `T?` - `null` is a legitimate value.
    Nullable,
    /// `T` - `null` is never a legitimate value.
    NonNullable,
    /// A type variable whose bound admits `null`. Instantiation decides,
    /// so it is both potentially nullable and potentially non-nullable.
    Undetermined,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ty {
    pub name: String,
    pub nullability: Nullability,
}

impl Ty {
    pub fn new(name: impl Into<String>, nullability: Nullability) -> Self {
        Self { name: name.into(), nullability }
    }

    pub fn non_nullable(name: impl Into<String>) -> Self {
        Self::new(name, Nullability::NonNullable)
    }

    pub fn nullable(name: impl Into<String>) -> Self {
        Self::new(name, Nullability::Nullable)
    }

    /// A type parameter with a nullable bound.
    pub fn type_param(name: impl Into<String>) -> Self {
        Self::new(name, Nullability::Undetermined)
    }

    pub fn bool() -> Self {
        Self::non_nullable("bool")
    }

    /// Parse the short form used by tools: `int`, `int?`, or `<T>` for a
    /// type parameter.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(inner) = text.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
            return valid_name(inner).then(|| Self::type_param(inner));
        }
        if let Some(inner) = text.strip_suffix('?') {
            return valid_name(inner).then(|| Self::nullable(inner));
        }
        valid_name(text).then(|| Self::non_nullable(text))
    }

    pub fn is_potentially_nullable(&self) -> bool {
        matches!(self.nullability, Nullability::Nullable | Nullability::Undetermined)
    }

    pub fn is_potentially_non_nullable(&self) -> bool {
        matches!(self.nullability, Nullability::NonNullable | Nullability::Undetermined)
    }

    /// The same type with `null` admitted. Late storage slots use this.
    pub fn with_nullable(&self) -> Self {
        Self::new(self.name.clone(), Nullability::Nullable)
    }
}

fn valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}
