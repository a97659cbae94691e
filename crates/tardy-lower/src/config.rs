// SPDX-License-Identifier: (MIT OR Apache-2.0)

use std::str::FromStr;

use crate::LowerError;

/// Names of the runtime entry points generated code calls into.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuntimeNames {
    /// Zero-argument function returning a fresh sentinel value.
    pub create_sentinel: String,
    /// One-argument predicate: is the value the sentinel?
    pub is_sentinel: String,
    /// One-argument constructor for the late initialization error value.
    pub late_error: String,
}

impl Default for RuntimeNames {
    fn default() -> Self {
        Self {
            create_sentinel: "createSentinel".to_string(),
            is_sentinel: "isSentinel".to_string(),
            late_error: "LateError".to_string(),
        }
    }
}

/// Surface conventions of the generated accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoweringConfig {
    /// Setters end in `return <write>` instead of `<write>;`.
    pub setter_returns_value: bool,
    /// Name of the setter's incoming value parameter.
    pub setter_parameter: String,
    /// Receiver used for instance field storage.
    pub receiver: String,
    pub runtime: RuntimeNames,
}

impl Default for LoweringConfig {
    fn default() -> Self {
        Self {
            setter_returns_value: false,
            setter_parameter: "value".to_string(),
            receiver: "this".to_string(),
            runtime: RuntimeNames::default(),
        }
    }
}

/// Null-safety soundness of the compilation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SoundnessMode {
    /// Fully sound null safety: non-nullable slots never observe `null`.
    Sound,
    /// Legacy-compatible mode: unmigrated code can store `null` anywhere.
    Unsound,
}

impl FromStr for SoundnessMode {
    type Err = LowerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sound" | "strong" => Ok(SoundnessMode::Sound),
            "unsound" | "weak" => Ok(SoundnessMode::Unsound),
            other => Err(LowerError::UnsupportedConfiguration(format!(
                "unknown soundness mode `{}` (expected `sound` or `unsound`)",
                other
            ))),
        }
    }
}

/// What the compilation target can do, as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetConfig {
    pub soundness: SoundnessMode,
    /// Runtime offers cheap create/check sentinel primitives.
    pub supports_sentinel: bool,
}

impl TargetConfig {
    pub fn new(soundness: SoundnessMode, supports_sentinel: bool) -> Self {
        Self { soundness, supports_sentinel }
    }
}
