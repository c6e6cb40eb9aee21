//! Tree-walking interpreter
//!
//! Statements return a [`Control`] (fall through or return), errors travel as
//! `Err(ScriptError)` and unwind until a `try` block or the engine boundary.
//! Calls recurse on the Rust stack, which is what lets script code re-enter the
//! host and be re-entered by it.

pub mod expressions;
pub mod statements;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::types::{Namespace, Val};
use crate::script::ScriptError;

/* ===================== Control Flow ===================== */

#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    None,
    Return(Val),
}

pub type ExecResult = Result<Control, ScriptError>;

/* ===================== Environment ===================== */

/// Name resolution context: function locals (if any) over a namespace
pub struct Env<'a> {
    pub globals: &'a Rc<Namespace>,
    pub locals: Option<&'a RefCell<HashMap<String, Val>>>,
}

impl<'a> Env<'a> {
    /// Top-level environment of a namespace
    pub fn global(globals: &'a Rc<Namespace>) -> Self {
        Self {
            globals,
            locals: None,
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Val> {
        if let Some(locals) = self.locals {
            if let Some(value) = locals.borrow().get(name) {
                return Some(value.clone());
            }
        }
        self.globals.get(name)
    }

    pub fn assign(&self, name: &str, value: Val) {
        match self.locals {
            Some(locals) => {
                locals.borrow_mut().insert(name.to_string(), value);
            }
            None => self.globals.set(name, value),
        }
    }
}
