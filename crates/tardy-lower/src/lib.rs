// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Late variable lowering.
//!
//! Rewrites a late field or local into explicit storage plus getter and
//! setter bodies built from plain control flow. How "not yet initialized"
//! is represented depends on the declared type and on what the target can
//! do; see [`compute_is_set_strategy`] and [`compute_is_set_encoding`].

mod binding;
mod builder;
mod config;
mod error;
mod getter;
mod lowering;
mod plan;
mod setter;
mod strategy;
mod variable;

pub use binding::{
    AccessorBinding, FieldFlag, FieldStorage, FlagAccess, IsSetSignal, StorageAccess, UnsetMarker,
    VariableFlag, VariableStorage,
};
pub use config::{LoweringConfig, RuntimeNames, SoundnessMode, TargetConfig};
pub use error::LowerError;
pub use getter::{
    create_getter_body_without_initializer, create_getter_with_initializer,
    create_getter_with_initializer_with_recheck,
};
pub use lowering::{LateLowering, LoweredAccessors};
pub use plan::{InitialValue, StoragePlan};
pub use setter::{create_setter_body, create_setter_body_final};
pub use strategy::{compute_is_set_encoding, compute_is_set_strategy, IsSetEncoding, IsSetStrategy};
pub use variable::{LateKind, LateViolation, LateVariable};
