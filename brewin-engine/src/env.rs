//! Execution environment: variable bindings and scope-frame bookkeeping
//! (spec §3.3).
//!
//! A variable name maps to a stack of cells; the topmost cell is the live
//! binding, and popping restores whatever binding it shadowed. A scope frame
//! records which names were introduced while it was innermost, so exiting a
//! block or call pops exactly those names' top cells.

use std::collections::HashMap;

use smol_str::SmolStr;

use crate::handle::Handle;
use crate::value::Value;

pub struct Env {
    /// Per-name stack of cells. The last element is the live binding.
    bindings: HashMap<SmolStr, Vec<Handle<Value>>>,
    /// Stack of scope frames; each frame lists the names it introduced.
    frames: Vec<Vec<SmolStr>>,
}

impl Env {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            frames: Vec::new(),
        }
    }

    /// Number of live scope frames. Used by property tests asserting that a
    /// completed `run` leaves no frames behind (spec §8).
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Whether any variable is currently bound. Used by the same property
    /// tests to assert the variable map empties out.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn push_scope(&mut self) {
        self.frames.push(Vec::new());
    }

    /// Pop the innermost scope frame, releasing one cell for every name it
    /// introduced.
    pub fn pop_scope(&mut self) {
        let frame = self
            .frames
            .pop()
            .expect("pop_scope called with no open frame");

        for name in frame {
            if let Some(stack) = self.bindings.get_mut(&name) {
                stack.pop();
                if stack.is_empty() {
                    self.bindings.remove(&name);
                }
            }
        }
    }

    pub fn is_live(&self, name: &str) -> bool {
        self.bindings
            .get(name)
            .is_some_and(|stack| !stack.is_empty())
    }

    /// The live cell for `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<Handle<Value>> {
        self.bindings
            .get(name)
            .and_then(|stack| stack.last())
            .cloned()
    }

    /// Introduce a fresh cell for `name` in the current (innermost) frame.
    pub fn declare(&mut self, name: SmolStr, value: Value) {
        self.bind_cell(name, Handle::new(value));
    }

    /// Introduce `name` in the current frame as an alias of an existing cell
    /// — the mechanism behind reference-parameter binding and closure
    /// capture install (spec §4.4 steps 2-3).
    pub fn bind_cell(&mut self, name: SmolStr, cell: Handle<Value>) {
        let frame = self
            .frames
            .last_mut()
            .expect("bind_cell called with no open frame");
        frame.push(name.clone());
        self.bindings.entry(name).or_default().push(cell);
    }

    /// Overwrite the live binding for `name`, or introduce it fresh in the
    /// current frame if it has none (spec §4.2's assignment semantics:
    /// mutate the existing binding, never shadow it).
    pub fn assign(&mut self, name: &str, value: Value) {
        if let Some(cell) = self.lookup(name) {
            *cell.borrow_mut() = value;
        } else {
            self.declare(SmolStr::new(name), value);
        }
    }

    /// Snapshot of every currently-live binding's top-cell value, by value —
    /// the lambda-capture mechanism of spec §4.3.
    pub fn live_snapshot(&self) -> HashMap<SmolStr, Value> {
        self.bindings
            .iter()
            .filter_map(|(name, stack)| {
                stack
                    .last()
                    .map(|cell| (name.clone(), cell.borrow().clone()))
            })
            .collect()
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_shadow_and_restore() {
        let mut env = Env::new();
        env.push_scope();
        env.declare("x".into(), Value::Int(1));
        assert_eq!(env.lookup("x").unwrap().borrow().kind_name(), "int");

        env.push_scope();
        env.declare("x".into(), Value::Str("shadow".into()));
        assert!(matches!(&*env.lookup("x").unwrap().borrow(), Value::Str(s) if s == "shadow"));
        env.pop_scope();

        assert!(matches!(&*env.lookup("x").unwrap().borrow(), Value::Int(1)));
        env.pop_scope();
        assert!(!env.is_live("x"));
        assert!(env.is_empty());
        assert_eq!(env.frame_count(), 0);
    }

    #[test]
    fn test_assign_mutates_without_shadowing() {
        let mut env = Env::new();
        env.push_scope();
        env.declare("x".into(), Value::Int(1));
        env.push_scope();
        // Assigning inside a nested block, to an already-live name, mutates
        // the existing cell rather than introducing a new one.
        env.assign("x", Value::Int(2));
        env.pop_scope();
        assert!(matches!(&*env.lookup("x").unwrap().borrow(), Value::Int(2)));
    }

    #[test]
    fn test_reference_alias_shares_cell() {
        let mut env = Env::new();
        env.push_scope();
        env.declare("x".into(), Value::Int(10));
        let cell = env.lookup("x").unwrap();

        env.push_scope();
        env.bind_cell("a".into(), cell.clone());
        *env.lookup("a").unwrap().borrow_mut() = Value::Int(11);
        env.pop_scope();

        assert!(matches!(&*env.lookup("x").unwrap().borrow(), Value::Int(11)));
    }
}
