// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Shared harness: lower one late variable and run its accessors.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use tardy_ast::{Expr, Span, Ty};
use tardy_interp::{Interpreter, RuntimeError, Value};
use tardy_lower::{
    IsSetEncoding, IsSetStrategy, LateKind, LateLowering, LateVariable, LateViolation,
    LoweringConfig,
};

pub const GET: &str = "get";
pub const SET: &str = "set";
pub const INIT: &str = "init";

/// A lowered late variable installed in a fresh interpreter.
pub struct Late {
    pub interp: Interpreter,
    pub encoding: IsSetEncoding,
    pub kind: LateKind,
    pub init_calls: Rc<Cell<u32>>,
}

impl Late {
    pub fn install(strategy: IsSetStrategy, var: &LateVariable) -> Self {
        Self::install_with(strategy, var, LoweringConfig::default())
    }

    pub fn install_with(strategy: IsSetStrategy, var: &LateVariable, config: LoweringConfig) -> Self {
        let lowering = LateLowering::with_strategy(strategy, config);
        let lowered = lowering.lower(var).expect("lowering failed");
        let runtime = &lowering.config().runtime;
        let mut interp = Interpreter::with_runtime(runtime);

        let initial = interp
            .eval_expr(&lowered.plan.initial_value_expr(runtime, var.span))
            .expect("initial storage value");
        let mut slots = vec![(lowered.plan.storage_name.clone(), initial)];
        if let Some(flag) = &lowered.plan.flag_name {
            slots.push((flag.clone(), Value::Bool(false)));
        }
        match var.kind {
            LateKind::Field => interp.define_global(lowering.config().receiver.clone(), Value::object(slots)),
            LateKind::StaticField | LateKind::Local => {
                for (name, value) in slots {
                    interp.define_global(name, value);
                }
            }
        }

        interp.define_function(GET, vec![], lowered.getter);
        interp.define_function(SET, vec![lowering.config().setter_parameter.clone()], lowered.setter);

        Late {
            interp,
            encoding: lowered.plan.encoding,
            kind: var.kind,
            init_calls: Rc::new(Cell::new(0)),
        }
    }

    pub fn get(&mut self) -> Result<Value, RuntimeError> {
        self.interp.call_function(GET, vec![])
    }

    pub fn set(&mut self, value: Value) -> Result<Value, RuntimeError> {
        self.interp.call_function(SET, vec![value])
    }

    /// Install the initializer. `f` gets the 1-based call number.
    pub fn on_init<F>(&mut self, f: F)
    where
        F: Fn(&mut Interpreter, u32) -> Result<Value, RuntimeError> + 'static,
    {
        let calls = Rc::clone(&self.init_calls);
        self.interp.define_host_function(INIT, move |interp, _| {
            calls.set(calls.get() + 1);
            f(interp, calls.get())
        });
    }

    pub fn init_calls(&self) -> u32 {
        self.init_calls.get()
    }

    pub fn message(&self, violation: LateViolation) -> String {
        violation.message(self.kind.label(), "x")
    }

    pub fn describe(&self) -> String {
        format!("{:?} via {}", self.kind, self.encoding)
    }
}

pub fn initializer() -> Expr {
    Expr::call(INIT, vec![], Span::default())
}

pub fn variable(ty: &Ty, kind: LateKind, is_final: bool, with_init: bool) -> LateVariable {
    named_variable("x", ty, kind, is_final, with_init)
}

pub fn named_variable(name: &str, ty: &Ty, kind: LateKind, is_final: bool, with_init: bool) -> LateVariable {
    let var = LateVariable::new(name, ty.clone(), kind).with_final(is_final);
    if with_init {
        var.with_initializer(initializer())
    } else {
        var
    }
}

pub fn types() -> [Ty; 3] {
    [Ty::nullable("int"), Ty::non_nullable("int"), Ty::type_param("T")]
}

pub const KINDS: [LateKind; 3] = [LateKind::Field, LateKind::StaticField, LateKind::Local];

/// Every strategy x type x kind combination.
pub fn for_each_case(mut f: impl FnMut(IsSetStrategy, &Ty, LateKind)) {
    for strategy in IsSetStrategy::ALL {
        for ty in &types() {
            for kind in KINDS {
                f(strategy, ty, kind);
            }
        }
    }
}

pub fn expect_violation(result: Result<Value, RuntimeError>, expected: &str, case: &str) {
    match result {
        Err(err) => assert_eq!(err.late_error_message(), Some(expected), "{}: {}", case, err),
        Ok(value) => panic!("{}: expected `{}`, got value {}", case, expected, value),
    }
}
