//! Dynamically typed runtime value (spec §3.2).

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use smol_str::SmolStr;

use crate::ast::{FuncDef, Lambda};
use crate::handle::Handle;

#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Str(SmolStr),
    Bool(bool),
    Nil,
    /// A specific overload, resolved from the function registry.
    Func(Rc<FuncDef>),
    /// A lambda together with its mutable, per-closure capture map.
    Closure(Handle<ClosureData>),
}

/// A lambda's captured bindings (spec §4.4 step 3/5).
///
/// Owned by the closure value itself: captures are snapshotted by value at
/// lambda-creation time and written back at the exit of every call, giving
/// the closure persistent, per-instance state across invocations (spec §4.4,
/// "Closures are mutable cells of captured state").
#[derive(Debug)]
pub struct ClosureData {
    pub lambda: Rc<Lambda>,
    pub captures: HashMap<SmolStr, Value>,
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Str(_) => "string",
            Self::Bool(_) => "bool",
            Self::Nil => "nil",
            Self::Func(_) => "function",
            Self::Closure(_) => "closure",
        }
    }

    /// Coerce to a boolean: `bool` as itself, `int` as nonzero (spec §4.6).
    /// `None` for every other kind.
    pub fn as_bool_coerced(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(n) => Some(*n != 0),
            _ => None,
        }
    }

    /// Coerce to an integer: `int` as itself, `bool` as 0/1 (spec §4.6).
    /// `None` for every other kind.
    pub fn as_int_coerced(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Bool(b) => Some(if *b { 1 } else { 0 }),
            _ => None,
        }
    }

    /// Text form used by `print`/`inputi`/`inputs` prompt formatting (spec
    /// §4.7). Unspecified for `func`/`closure`; see `SPEC_FULL.md`'s
    /// resolution of that open question.
    pub fn format(&self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Str(s) => s.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Nil => "nil".to_string(),
            Self::Func(_) => "function".to_string(),
            Self::Closure(_) => "closure".to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.format())
    }
}

/// `==`/`!=` semantics (spec §4.6): `int`/`bool` cross-coerce and compare;
/// otherwise mismatched kinds are simply unequal; `function`/`closure`
/// compare by identity, everything else by value. Never fails.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(_), Value::Bool(_)) | (Value::Bool(_), Value::Int(_)) => {
            a.as_bool_coerced() == b.as_bool_coerced()
        }
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Nil, Value::Nil) => true,
        (Value::Func(x), Value::Func(y)) => Rc::ptr_eq(x, y),
        (Value::Closure(x), Value::Closure(y)) => x.ptr_eq(y),
        _ => false,
    }
}
