// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Choosing how "is this late variable initialized yet?" is represented.
//!
//! The strategy is fixed per compilation unit. Each variable then gets an
//! encoding from its declared type alone.

use std::fmt;

use tardy_ast::Ty;
use tracing::debug;

use crate::SoundnessMode;

/// Compilation-unit wide policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IsSetStrategy {
    /// Always materialize a separate boolean flag.
    ForceIsSetField,
    /// Flag for potentially nullable types, `null` marker otherwise.
    IsSetFieldOrNull,
    /// Sentinel marker for potentially nullable types, `null` otherwise.
    SentinelOrNull,
}

impl IsSetStrategy {
    pub const ALL: [IsSetStrategy; 3] = [
        IsSetStrategy::ForceIsSetField,
        IsSetStrategy::IsSetFieldOrNull,
        IsSetStrategy::SentinelOrNull,
    ];
}

/// Per-variable physical encoding of the is-set signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IsSetEncoding {
    /// Separate boolean flag next to the storage.
    UseIsSetField,
    /// Storage holds `null` until initialized.
    UseNull,
    /// Storage holds a runtime sentinel until initialized.
    UseSentinel,
}

impl IsSetEncoding {
    /// Only the flag encoding needs storage besides the value slot.
    pub fn needs_flag_storage(self) -> bool {
        matches!(self, IsSetEncoding::UseIsSetField)
    }
}

impl fmt::Display for IsSetStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IsSetStrategy::ForceIsSetField => "force-is-set-field",
            IsSetStrategy::IsSetFieldOrNull => "is-set-field-or-null",
            IsSetStrategy::SentinelOrNull => "sentinel-or-null",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for IsSetEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IsSetEncoding::UseIsSetField => "is-set field",
            IsSetEncoding::UseNull => "null marker",
            IsSetEncoding::UseSentinel => "sentinel marker",
        };
        write!(f, "{}", name)
    }
}

pub fn compute_is_set_strategy(soundness: SoundnessMode, target_supports_sentinel: bool) -> IsSetStrategy {
    let strategy = if target_supports_sentinel {
        IsSetStrategy::SentinelOrNull
    } else if soundness != SoundnessMode::Sound {
        // Legacy code may store null into a non-nullable slot, so null
        // cannot mean "uninitialized".
        IsSetStrategy::ForceIsSetField
    } else {
        IsSetStrategy::IsSetFieldOrNull
    };
    debug!(?soundness, target_supports_sentinel, %strategy, "selected is-set strategy");
    strategy
}

pub fn compute_is_set_encoding(ty: &Ty, strategy: IsSetStrategy) -> IsSetEncoding {
    match strategy {
        IsSetStrategy::ForceIsSetField => IsSetEncoding::UseIsSetField,
        IsSetStrategy::IsSetFieldOrNull => {
            if ty.is_potentially_nullable() {
                IsSetEncoding::UseIsSetField
            } else {
                IsSetEncoding::UseNull
            }
        }
        IsSetStrategy::SentinelOrNull => {
            if ty.is_potentially_nullable() {
                IsSetEncoding::UseSentinel
            } else {
                IsSetEncoding::UseNull
            }
        }
    }
}
