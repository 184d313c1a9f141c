//! Function registry: name → arity → definition (spec §3.4).
//!
//! Enables same-name overloads distinguished by parameter count. A name
//! with exactly one overload is also addressable as a first-class value;
//! a name with several is ambiguous in that position (spec §4.5).

use std::collections::HashMap;
use std::rc::Rc;

use smol_str::SmolStr;

use crate::ast::FuncDef;
use crate::error::{Error, ErrorKind, Result};

#[derive(Default)]
pub struct Registry {
    functions: HashMap<SmolStr, HashMap<usize, Rc<FuncDef>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, def: Rc<FuncDef>) {
        self.functions
            .entry(def.name.clone())
            .or_default()
            .insert(def.params.len(), def);
    }

    /// Overload of `name` taking exactly `arity` arguments, if registered.
    pub fn lookup(&self, name: &str, arity: usize) -> Option<Rc<FuncDef>> {
        self.functions.get(name)?.get(&arity).cloned()
    }

    /// Resolve a bare name to a first-class function value: legal only when
    /// the name has exactly one overload (spec §4.5).
    pub fn resolve_first_class(&self, name: &str, line: Option<usize>) -> Result<Option<Rc<FuncDef>>> {
        let Some(overloads) = self.functions.get(name) else {
            return Ok(None);
        };

        let mut values = overloads.values();
        let Some(only) = values.next() else {
            return Ok(None);
        };

        if values.next().is_some() {
            return Err(Error::runtime(
                ErrorKind::Name,
                format!("{name}() function is ambiguous"),
                line,
            ));
        }

        Ok(Some(only.clone()))
    }
}
