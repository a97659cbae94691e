// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Storage layout for a lowered late variable.

use tardy_ast::{Expr, Span, Ty};

use crate::{IsSetEncoding, LateKind, LateVariable, RuntimeNames};

/// What the main slot holds before the first write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InitialValue {
    Null,
    Sentinel,
}

/// Storage the caller must declare next to the synthesized accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StoragePlan {
    pub encoding: IsSetEncoding,
    pub storage_name: String,
    /// Always nullable: the slot must hold the unset marker.
    pub storage_type: Ty,
    pub initial_value: InitialValue,
    /// Present iff the encoding is `UseIsSetField`. Starts out `false`.
    pub flag_name: Option<String>,
}

impl StoragePlan {
    pub fn new(var: &LateVariable, encoding: IsSetEncoding) -> Self {
        let storage_name = match var.kind {
            LateKind::Field | LateKind::StaticField => format!("_#{}", var.name),
            LateKind::Local => format!("#{}", var.name),
        };
        let flag_name = encoding.needs_flag_storage().then(|| format!("{}#isSet", storage_name));
        let initial_value = match encoding {
            IsSetEncoding::UseSentinel => InitialValue::Sentinel,
            IsSetEncoding::UseIsSetField | IsSetEncoding::UseNull => InitialValue::Null,
        };
        Self {
            encoding,
            storage_name,
            storage_type: var.declared_type.with_nullable(),
            initial_value,
            flag_name,
        }
    }

    /// Initializer expression for the main slot.
    pub fn initial_value_expr(&self, runtime: &RuntimeNames, span: Span) -> Expr {
        match self.initial_value {
            InitialValue::Null => Expr::null(span),
            InitialValue::Sentinel => Expr::call(runtime.create_sentinel.clone(), vec![], span),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_with_flag() {
        let var = LateVariable::new("count", Ty::nullable("int"), LateKind::Field);
        let plan = StoragePlan::new(&var, IsSetEncoding::UseIsSetField);
        assert_eq!(plan.storage_name, "_#count");
        assert_eq!(plan.flag_name.as_deref(), Some("_#count#isSet"));
        assert_eq!(plan.initial_value, InitialValue::Null);
    }

    #[test]
    fn local_with_sentinel() {
        let var = LateVariable::new("x", Ty::type_param("T"), LateKind::Local);
        let plan = StoragePlan::new(&var, IsSetEncoding::UseSentinel);
        assert_eq!(plan.storage_name, "#x");
        assert_eq!(plan.flag_name, None);
        assert_eq!(plan.storage_type, Ty::nullable("T"));
        let init = plan.initial_value_expr(&RuntimeNames::default(), Span::default());
        assert_eq!(init.to_string(), "createSentinel()");
    }

    #[test]
    fn null_encoding_widens_storage() {
        let var = LateVariable::new("name", Ty::non_nullable("String"), LateKind::StaticField);
        let plan = StoragePlan::new(&var, IsSetEncoding::UseNull);
        assert_eq!(plan.storage_type, Ty::nullable("String"));
        assert_eq!(plan.flag_name, None);
    }
}
