// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Entry point tying strategy, bindings and synthesizers together.

use tardy_ast::{Expr, Stmt};
use tracing::debug;

use crate::{
    compute_is_set_encoding, compute_is_set_strategy, create_getter_body_without_initializer,
    create_getter_with_initializer, create_getter_with_initializer_with_recheck,
    create_setter_body, create_setter_body_final, AccessorBinding, FieldFlag, FieldStorage,
    FlagAccess, IsSetEncoding, IsSetStrategy, LateKind, LateVariable, LowerError,
    LoweringConfig, StorageAccess, StoragePlan, TargetConfig, VariableFlag, VariableStorage,
};

/// Accessors and storage for one late variable.
#[derive(Debug, Clone)]
pub struct LoweredAccessors {
    pub plan: StoragePlan,
    pub getter: Stmt,
    /// Write-once for final variables. For a final variable with an
    /// initializer the front-end may choose not to install it.
    pub setter: Stmt,
}

/// Lowers late variables for one compilation unit.
///
/// Holds no mutable state; one instance can be shared across threads.
pub struct LateLowering {
    strategy: IsSetStrategy,
    config: LoweringConfig,
}

impl LateLowering {
    pub fn new(target: &TargetConfig, config: LoweringConfig) -> Self {
        let strategy = compute_is_set_strategy(target.soundness, target.supports_sentinel);
        Self { strategy, config }
    }

    pub fn with_strategy(strategy: IsSetStrategy, config: LoweringConfig) -> Self {
        Self { strategy, config }
    }

    pub fn strategy(&self) -> IsSetStrategy {
        self.strategy
    }

    pub fn config(&self) -> &LoweringConfig {
        &self.config
    }

    pub fn encoding_for(&self, var: &LateVariable) -> IsSetEncoding {
        compute_is_set_encoding(&var.declared_type, self.strategy)
    }

    pub fn plan(&self, var: &LateVariable) -> StoragePlan {
        StoragePlan::new(var, self.encoding_for(var))
    }

    fn check_binding(&self, var: &LateVariable, binding: &AccessorBinding<'_>) -> Result<(), LowerError> {
        let expected = self.encoding_for(var);
        let found = binding.encoding();
        if expected != found {
            return Err(LowerError::EncodingMismatch { name: var.name.clone(), expected, found });
        }
        Ok(())
    }

    /// Getter body, shaped by whether there is an initializer and whether
    /// the variable is final.
    pub fn getter(&self, var: &LateVariable, binding: &AccessorBinding<'_>) -> Result<Stmt, LowerError> {
        self.check_binding(var, binding)?;
        let body = match &var.initializer {
            None => create_getter_body_without_initializer(var, binding, &self.config),
            Some(init) if var.is_final => {
                create_getter_with_initializer_with_recheck(var, init, binding, &self.config)
            }
            Some(init) => create_getter_with_initializer(var, init, binding, &self.config),
        };
        Ok(body)
    }

    pub fn setter(&self, var: &LateVariable, binding: &AccessorBinding<'_>) -> Result<Stmt, LowerError> {
        self.check_binding(var, binding)?;
        let value = Expr::var(self.config.setter_parameter.clone(), var.span);
        let body = if var.is_final {
            create_setter_body_final(var, value, binding, &self.config)
        } else {
            create_setter_body(var, value, binding, &self.config)
        };
        Ok(body)
    }

    /// Plan storage, bind it by variable kind, and synthesize both accessors.
    pub fn lower(&self, var: &LateVariable) -> Result<LoweredAccessors, LowerError> {
        let plan = self.plan(var);
        debug!(
            name = %var.name,
            kind = ?var.kind,
            encoding = %plan.encoding,
            is_final = var.is_final,
            has_initializer = var.has_initializer(),
            "lowering late variable"
        );

        let (storage, flag): (Box<dyn StorageAccess>, Option<Box<dyn FlagAccess>>) = match var.kind {
            LateKind::Field => {
                let receiver = Expr::var(self.config.receiver.clone(), var.span);
                let flag = plan.flag_name.as_ref().map(|field| {
                    Box::new(FieldFlag { receiver: receiver.clone(), field: field.clone() })
                        as Box<dyn FlagAccess>
                });
                let storage = FieldStorage {
                    receiver,
                    field: plan.storage_name.clone(),
                    declared_type: var.declared_type.clone(),
                };
                (Box::new(storage) as Box<dyn StorageAccess>, flag)
            }
            LateKind::StaticField | LateKind::Local => {
                let flag = plan.flag_name.as_ref().map(|name| {
                    Box::new(VariableFlag { name: name.clone(), span: var.span }) as Box<dyn FlagAccess>
                });
                let storage = VariableStorage {
                    name: plan.storage_name.clone(),
                    declared_type: var.declared_type.clone(),
                    span: var.span,
                };
                (Box::new(storage) as Box<dyn StorageAccess>, flag)
            }
        };

        let binding = AccessorBinding::for_encoding(&var.name, plan.encoding, storage.as_ref(), flag.as_deref())?;
        let getter = self.getter(var, &binding)?;
        let setter = self.setter(var, &binding)?;
        Ok(LoweredAccessors { plan, getter, setter })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SoundnessMode, UnsetMarker};
    use tardy_ast::{ExprKind, Span, StmtKind, Ty};

    fn lowering(mode: SoundnessMode, sentinel: bool) -> LateLowering {
        LateLowering::new(&TargetConfig::new(mode, sentinel), LoweringConfig::default())
    }

    fn init() -> Expr {
        Expr::int(42, Span::default())
    }

    #[test]
    fn final_with_initializer_rechecks() {
        let var = LateVariable::new("x", Ty::non_nullable("int"), LateKind::Field)
            .with_final(true)
            .with_initializer(init());
        let lowered = lowering(SoundnessMode::Sound, false).lower(&var).unwrap();
        assert!(lowered.getter.to_string().contains("has been assigned during initialization"));
        assert!(lowered.setter.to_string().contains("has already been initialized"));
    }

    #[test]
    fn final_without_initializer_gets_write_once_setter() {
        let var = LateVariable::new("x", Ty::non_nullable("int"), LateKind::Local).with_final(true);
        let lowered = lowering(SoundnessMode::Sound, true).lower(&var).unwrap();
        let setter = lowered.setter.to_string();
        assert!(setter.contains("has already been initialized"), "{}", setter);
        assert!(lowered.getter.to_string().contains("has not been initialized"));
    }

    #[test]
    fn non_final_initializer_does_not_recheck() {
        let var = LateVariable::new("x", Ty::nullable("int"), LateKind::StaticField).with_initializer(init());
        let lowered = lowering(SoundnessMode::Unsound, false).lower(&var).unwrap();
        assert_eq!(lowered.plan.encoding, IsSetEncoding::UseIsSetField);
        assert!(!lowered.getter.to_string().contains("LateError"));
        assert_eq!(lowered.setter.to_string(), "{\n  _#x#isSet = true;\n  _#x = value;\n}\n");
    }

    #[test]
    fn mismatched_binding_is_rejected() {
        let var = LateVariable::new("x", Ty::nullable("int"), LateKind::Local);
        let lowering = lowering(SoundnessMode::Sound, false);
        let storage = VariableStorage { name: "#x".into(), declared_type: var.declared_type.clone(), span: var.span };
        let binding = AccessorBinding::with_marker(&storage, UnsetMarker::Null);
        let err = lowering.getter(&var, &binding).unwrap_err();
        assert_eq!(
            err,
            LowerError::EncodingMismatch {
                name: "x".into(),
                expected: IsSetEncoding::UseIsSetField,
                found: IsSetEncoding::UseNull,
            }
        );
        assert!(lowering.setter(&var, &binding).is_err());
    }

    #[test]
    fn every_getter_exits_on_all_paths() {
        let types = [Ty::nullable("int"), Ty::non_nullable("int"), Ty::type_param("T")];
        for strategy in IsSetStrategy::ALL {
            let lowering = LateLowering::with_strategy(strategy, LoweringConfig::default());
            for ty in &types {
                for kind in [LateKind::Field, LateKind::StaticField, LateKind::Local] {
                    for is_final in [false, true] {
                        for initializer in [None, Some(init())] {
                            let mut var = LateVariable::new("v", ty.clone(), kind).with_final(is_final);
                            var.initializer = initializer;
                            let lowered = lowering.lower(&var).unwrap();
                            assert!(
                                !lowered.getter.can_complete_normally(),
                                "{strategy} {ty} {kind:?}: {}",
                                lowered.getter
                            );
                        }
                    }
                }
            }
        }
    }

    /// Every node must carry `span`, except the embedded initializer, which
    /// keeps its own.
    fn assert_spans_stmt(stmt: &Stmt, span: Span, init: &Expr) {
        assert_eq!(stmt.span, span, "statement {}", stmt);
        match &stmt.kind {
            StmtKind::Expr(e) | StmtKind::Let { init: e, .. } => assert_spans_expr(e, span, init),
            StmtKind::Return(value) => {
                if let Some(e) = value {
                    assert_spans_expr(e, span, init);
                }
            }
            StmtKind::Block(stmts) => {
                for s in stmts {
                    assert_spans_stmt(s, span, init);
                }
            }
            StmtKind::If { cond, then_branch, else_branch } => {
                assert_spans_expr(cond, span, init);
                assert_spans_stmt(then_branch, span, init);
                if let Some(e) = else_branch {
                    assert_spans_stmt(e, span, init);
                }
            }
        }
    }

    fn assert_spans_expr(expr: &Expr, span: Span, init: &Expr) {
        if expr == init {
            return;
        }
        assert_eq!(expr.span, span, "expression {}", expr);
        let children: Vec<&Expr> = match &expr.kind {
            ExprKind::Null | ExprKind::Bool(_) | ExprKind::Int(_) | ExprKind::String(_) | ExprKind::Var(_) => vec![],
            ExprKind::Assign { value, .. } => vec![value.as_ref()],
            ExprKind::FieldGet { receiver, .. } => vec![receiver.as_ref()],
            ExprKind::FieldSet { receiver, value, .. } => vec![receiver.as_ref(), value.as_ref()],
            ExprKind::Not(e) | ExprKind::EqualsNull(e) | ExprKind::Throw(e) => vec![e.as_ref()],
            ExprKind::Promote { expr, .. } => vec![expr.as_ref()],
            ExprKind::Conditional { cond, then_branch, else_branch } => {
                vec![cond.as_ref(), then_branch.as_ref(), else_branch.as_ref()]
            }
            ExprKind::Let { init: bound, body, .. } => vec![bound.as_ref(), body.as_ref()],
            ExprKind::Call { args, .. } => args.iter().collect(),
        };
        for child in children {
            assert_spans_expr(child, span, init);
        }
    }

    #[test]
    fn synthesized_nodes_carry_the_variable_span() {
        let span = Span::new(10, 20);
        let initializer = Expr::call("compute", vec![], Span::new(40, 49));
        let types = [Ty::nullable("int"), Ty::non_nullable("int"), Ty::type_param("T")];
        for strategy in IsSetStrategy::ALL {
            let lowering = LateLowering::with_strategy(strategy, LoweringConfig::default());
            for ty in &types {
                for kind in [LateKind::Field, LateKind::StaticField, LateKind::Local] {
                    for is_final in [false, true] {
                        for with_init in [false, true] {
                            let mut var = LateVariable::new("x", ty.clone(), kind)
                                .with_final(is_final)
                                .with_span(span);
                            if with_init {
                                var = var.with_initializer(initializer.clone());
                            }
                            let lowered = lowering.lower(&var).unwrap();
                            assert_eq!(lowered.getter.span, span);
                            assert_eq!(lowered.setter.span, span);
                            assert_spans_stmt(&lowered.getter, span, &initializer);
                            assert_spans_stmt(&lowered.setter, span, &initializer);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn temporaries_never_name_local_storage() {
        // Locals store in `#<name>`; temporaries must stay out of that space
        for name in ["t0", "t1", "x"] {
            let var = LateVariable::new(name, Ty::nullable("int"), LateKind::Local)
                .with_final(true)
                .with_initializer(init());
            for strategy in IsSetStrategy::ALL {
                let lowering = LateLowering::with_strategy(strategy, LoweringConfig::default());
                let lowered = lowering.lower(&var).unwrap();
                let getter = lowered.getter.to_string();
                assert!(getter.contains("%t0"), "{}", getter);
                assert!(!lowered.plan.storage_name.starts_with('%'));
                if let Some(flag) = &lowered.plan.flag_name {
                    assert!(!flag.starts_with('%'));
                }
            }
        }
    }

    #[test]
    fn lowering_is_shareable_across_threads() {
        let lowering = lowering(SoundnessMode::Sound, true);
        let names: Vec<String> = (0..8).map(|i| format!("v{}", i)).collect();
        let bodies: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = names
                .iter()
                .map(|name| {
                    let lowering = &lowering;
                    scope.spawn(move || {
                        let var = LateVariable::new(name.clone(), Ty::nullable("int"), LateKind::Field);
                        lowering.lower(&var).unwrap().getter.to_string()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for (name, body) in names.iter().zip(&bodies) {
            assert!(body.contains(&format!("this._#{}", name)), "{}", body);
        }
    }
}
