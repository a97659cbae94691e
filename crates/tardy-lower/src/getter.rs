// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Getter synthesis.
//!
//! Three shapes, picked by the caller from (has initializer, is final):
//! - no initializer: read or throw "has not been initialized"
//! - initializer, not final: initialize on first read
//! - initializer, final: initialize on first read, and reject a write that
//!   happened while the initializer ran
//!
//! Every shape ends in a return or a throw on all paths.

use tardy_ast::{Expr, Stmt};
use tracing::trace;

use crate::builder::BodyBuilder;
use crate::{AccessorBinding, IsSetSignal, LateVariable, LateViolation, LoweringConfig};

pub fn create_getter_body_without_initializer(
    var: &LateVariable,
    binding: &AccessorBinding<'_>,
    config: &LoweringConfig,
) -> Stmt {
    trace!(name = %var.name, encoding = %binding.encoding(), "getter without initializer");
    let mut b = BodyBuilder::new(var, &config.runtime);
    let storage = binding.storage();

    match binding.signal() {
        IsSetSignal::Flag(flag) => {
            // if (!isSet) throw ...; return storage;
            b.block(vec![
                Stmt::if_then(
                    Expr::not(flag.read_flag()),
                    Stmt::expr(b.violation(LateViolation::NotInitialized)),
                ),
                Stmt::ret(storage.read(var.needs_promotion())),
            ])
        }
        IsSetSignal::Marker(marker) => {
            // return let %t = storage in isUnset(%t) ? throw ... : %t;
            let temp = b.fresh_temp();
            Stmt::ret(b.let_in(
                temp.clone(),
                b.storage_type(),
                storage.read(false),
                Expr::conditional(
                    b.is_unset(marker, b.var(&temp)),
                    b.violation(LateViolation::NotInitialized),
                    b.initialized_read(&temp),
                ),
            ))
        }
    }
}

pub fn create_getter_with_initializer(
    var: &LateVariable,
    initializer: &Expr,
    binding: &AccessorBinding<'_>,
    config: &LoweringConfig,
) -> Stmt {
    trace!(name = %var.name, encoding = %binding.encoding(), "getter with initializer");
    let mut b = BodyBuilder::new(var, &config.runtime);
    let storage = binding.storage();

    match binding.signal() {
        IsSetSignal::Flag(flag) => {
            // if (!isSet) { storage = init; isSet = true; } return storage;
            b.block(vec![
                Stmt::if_then(
                    Expr::not(flag.read_flag()),
                    b.block(vec![
                        Stmt::expr(storage.write(initializer.clone())),
                        Stmt::expr(flag.write_flag(true)),
                    ]),
                ),
                Stmt::ret(storage.read(var.needs_promotion())),
            ])
        }
        IsSetSignal::Marker(marker) => {
            // return let %t = storage in isUnset(%t) ? storage = init : %t;
            let temp = b.fresh_temp();
            Stmt::ret(b.let_in(
                temp.clone(),
                b.storage_type(),
                storage.read(false),
                Expr::conditional(
                    b.is_unset(marker, b.var(&temp)),
                    storage.write(initializer.clone()),
                    b.initialized_read(&temp),
                ),
            ))
        }
    }
}

pub fn create_getter_with_initializer_with_recheck(
    var: &LateVariable,
    initializer: &Expr,
    binding: &AccessorBinding<'_>,
    config: &LoweringConfig,
) -> Stmt {
    trace!(name = %var.name, encoding = %binding.encoding(), "getter with initializer and recheck");
    let mut b = BodyBuilder::new(var, &config.runtime);
    let storage = binding.storage();

    match binding.signal() {
        IsSetSignal::Flag(flag) => {
            // if (!isSet) {
            //   T %t = init;
            //   if (isSet) throw ...;
            //   storage = %t;
            //   isSet = true;
            // }
            // return storage;
            let temp = b.fresh_temp();
            b.block(vec![
                Stmt::if_then(
                    Expr::not(flag.read_flag()),
                    b.block(vec![
                        b.let_decl(temp.clone(), b.declared_type(), initializer.clone()),
                        Stmt::if_then(
                            flag.read_flag(),
                            Stmt::expr(b.violation(LateViolation::AssignedDuringInitialization)),
                        ),
                        Stmt::expr(storage.write(b.var(&temp))),
                        Stmt::expr(flag.write_flag(true)),
                    ]),
                ),
                Stmt::ret(storage.read(var.needs_promotion())),
            ])
        }
        IsSetSignal::Marker(marker) => {
            // return let %t0 = storage in isUnset(%t0)
            //   ? let %t1 = init in isUnset(storage) ? storage = %t1 : throw ...
            //   : %t0;
            //
            // The inner check reads storage again: %t0 is stale once the
            // initializer has run.
            let outer = b.fresh_temp();
            let inner = b.fresh_temp();
            let commit = b.let_in(
                inner.clone(),
                b.declared_type(),
                initializer.clone(),
                Expr::conditional(
                    b.is_unset(marker, storage.read(false)),
                    storage.write(b.var(&inner)),
                    b.violation(LateViolation::AssignedDuringInitialization),
                ),
            );
            Stmt::ret(b.let_in(
                outer.clone(),
                b.storage_type(),
                storage.read(false),
                Expr::conditional(b.is_unset(marker, b.var(&outer)), commit, b.initialized_read(&outer)),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldFlag, FieldStorage, LateKind, UnsetMarker};
    use tardy_ast::{Span, Ty};

    fn this() -> Expr {
        Expr::var("this", Span::default())
    }

    fn storage(ty: &Ty) -> FieldStorage {
        FieldStorage { receiver: this(), field: "_#x".into(), declared_type: ty.clone() }
    }

    fn flag() -> FieldFlag {
        FieldFlag { receiver: this(), field: "_#x#isSet".into() }
    }

    fn init() -> Expr {
        Expr::call("compute", vec![], Span::default())
    }

    #[test]
    fn no_initializer_flag_shape() {
        let ty = Ty::non_nullable("int");
        let var = LateVariable::new("x", ty.clone(), LateKind::Field);
        let (storage, flag) = (storage(&ty), flag());
        let binding = AccessorBinding::with_flag(&storage, &flag);
        let body = create_getter_body_without_initializer(&var, &binding, &LoweringConfig::default());
        assert_eq!(
            body.to_string(),
            "{\n  if (!this._#x#isSet)\n    throw LateError(\"Field 'x' has not been initialized.\");\n  return this._#x{int};\n}\n"
        );
        assert!(!body.can_complete_normally());
    }

    #[test]
    fn no_initializer_null_shape_reads_once() {
        let ty = Ty::non_nullable("int");
        let var = LateVariable::new("x", ty.clone(), LateKind::Field);
        let storage = storage(&ty);
        let binding = AccessorBinding::with_marker(&storage, UnsetMarker::Null);
        let body = create_getter_body_without_initializer(&var, &binding, &LoweringConfig::default());
        assert_eq!(
            body.to_string(),
            "return let int? %t0 = this._#x in (%t0 == null) ? (throw LateError(\"Field 'x' has not been initialized.\")) : %t0{int};\n"
        );
    }

    #[test]
    fn nullable_sentinel_read_is_not_promoted() {
        let ty = Ty::nullable("int");
        let var = LateVariable::new("x", ty.clone(), LateKind::Local);
        let storage = storage(&ty);
        let binding = AccessorBinding::with_marker(&storage, UnsetMarker::Sentinel);
        let body = create_getter_body_without_initializer(&var, &binding, &LoweringConfig::default());
        assert_eq!(
            body.to_string(),
            "return let int? %t0 = this._#x in isSentinel(%t0) ? (throw LateError(\"Local 'x' has not been initialized.\")) : %t0;\n"
        );
    }

    #[test]
    fn type_parameter_sentinel_read_is_promoted() {
        let ty = Ty::type_param("T");
        let var = LateVariable::new("x", ty.clone(), LateKind::Field);
        let storage = storage(&ty);
        let binding = AccessorBinding::with_marker(&storage, UnsetMarker::Sentinel);
        let body = create_getter_body_without_initializer(&var, &binding, &LoweringConfig::default());
        assert!(body.to_string().ends_with(": %t0{<T>};\n"), "{}", body);
    }

    #[test]
    fn initializer_null_shape_collapses_to_one_expression() {
        let ty = Ty::non_nullable("int");
        let var = LateVariable::new("x", ty.clone(), LateKind::Field).with_initializer(init());
        let storage = storage(&ty);
        let binding = AccessorBinding::with_marker(&storage, UnsetMarker::Null);
        let body = create_getter_with_initializer(&var, &init(), &binding, &LoweringConfig::default());
        assert_eq!(
            body.to_string(),
            "return let int? %t0 = this._#x in (%t0 == null) ? (this._#x = compute()) : %t0{int};\n"
        );
    }

    #[test]
    fn initializer_flag_shape() {
        let ty = Ty::nullable("int");
        let var = LateVariable::new("x", ty.clone(), LateKind::Field).with_initializer(init());
        let (storage, flag) = (storage(&ty), flag());
        let binding = AccessorBinding::with_flag(&storage, &flag);
        let body = create_getter_with_initializer(&var, &init(), &binding, &LoweringConfig::default());
        assert_eq!(
            body.to_string(),
            "{\n  if (!this._#x#isSet) {\n    this._#x = compute();\n    this._#x#isSet = true;\n  }\n  return this._#x;\n}\n"
        );
    }

    #[test]
    fn recheck_flag_shape_evaluates_initializer_before_commit() {
        let ty = Ty::non_nullable("int");
        let var = LateVariable::new("x", ty.clone(), LateKind::Field)
            .with_final(true)
            .with_initializer(init());
        let (storage, flag) = (storage(&ty), flag());
        let binding = AccessorBinding::with_flag(&storage, &flag);
        let body = create_getter_with_initializer_with_recheck(&var, &init(), &binding, &LoweringConfig::default());
        assert_eq!(
            body.to_string(),
            "{\n  if (!this._#x#isSet) {\n    int %t0 = compute();\n    if (this._#x#isSet)\n      throw LateError(\"Field 'x' has been assigned during initialization.\");\n    this._#x = %t0;\n    this._#x#isSet = true;\n  }\n  return this._#x{int};\n}\n"
        );
        assert!(!body.can_complete_normally());
    }

    #[test]
    fn recheck_marker_shape_rereads_storage() {
        let ty = Ty::non_nullable("int");
        let var = LateVariable::new("x", ty.clone(), LateKind::Field)
            .with_final(true)
            .with_initializer(init());
        let storage = storage(&ty);
        let binding = AccessorBinding::with_marker(&storage, UnsetMarker::Null);
        let body = create_getter_with_initializer_with_recheck(&var, &init(), &binding, &LoweringConfig::default());
        assert_eq!(
            body.to_string(),
            "return let int? %t0 = this._#x in (%t0 == null) ? (let int %t1 = compute() in (this._#x == null) ? (this._#x = %t1) : (throw LateError(\"Field 'x' has been assigned during initialization.\"))) : %t0{int};\n"
        );
    }
}
