//! Runtime value types

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use super::ast::Stmt;
use crate::script::ScriptError;

/// Shared, mutable string-keyed map (module registries, `exported_functions`)
pub type SharedMap = Rc<RefCell<BTreeMap<String, Val>>>;

/// Native function body. The first argument is the caller's namespace name.
pub type NativeImpl = dyn Fn(&str, Vec<Val>) -> Result<Val, ScriptError>;

/// Runtime value type
#[derive(Clone)]
pub enum Val {
    None,
    Bool(bool),
    Int(i64),
    Str(String),
    /// A string marked to be passed to the host unescaped
    Literal(String),
    List(Vec<Val>),
    Map(SharedMap),
    Func(Rc<Function>),
    Native(Rc<NativeFunc>),
    Module(Rc<Namespace>),
}

impl Val {
    /// Check if value is truthy (for conditionals)
    pub fn is_truthy(&self) -> bool {
        match self {
            Val::None => false,
            Val::Bool(b) => *b,
            Val::Int(n) => *n != 0,
            Val::Str(s) | Val::Literal(s) => !s.is_empty(),
            Val::List(items) => !items.is_empty(),
            Val::Map(map) => !map.borrow().is_empty(),
            Val::Func(_) | Val::Native(_) | Val::Module(_) => true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Val::None => "none",
            Val::Bool(_) => "bool",
            Val::Int(_) => "int",
            Val::Str(_) => "str",
            Val::Literal(_) => "literal",
            Val::List(_) => "list",
            Val::Map(_) => "map",
            Val::Func(_) | Val::Native(_) => "function",
            Val::Module(_) => "module",
        }
    }

    /// String conversion used by `str()` and when passing values to the host
    pub fn render(&self) -> String {
        match self {
            Val::None => "none".to_string(),
            Val::Bool(b) => b.to_string(),
            Val::Int(n) => n.to_string(),
            Val::Str(s) | Val::Literal(s) => s.clone(),
            Val::List(items) => {
                let inner: Vec<String> = items.iter().map(Val::render).collect();
                format!("[{}]", inner.join(", "))
            }
            Val::Map(map) => {
                let inner: Vec<String> = map.borrow().keys().cloned().collect();
                format!("{{{}}}", inner.join(", "))
            }
            Val::Func(f) => format!("<fn {}>", f.name),
            Val::Native(f) => format!("<native fn {}>", f.name),
            Val::Module(ns) => format!("<module {}>", ns.name()),
        }
    }

    /// Structural equality for plain values, identity for callables and containers
    pub fn equals(&self, other: &Val) -> bool {
        match (self, other) {
            (Val::None, Val::None) => true,
            (Val::Bool(a), Val::Bool(b)) => a == b,
            (Val::Int(a), Val::Int(b)) => a == b,
            (Val::Str(a), Val::Str(b)) | (Val::Literal(a), Val::Literal(b)) => a == b,
            (Val::List(a), Val::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equals(y))
            }
            (Val::Map(a), Val::Map(b)) => Rc::ptr_eq(a, b),
            (Val::Func(a), Val::Func(b)) => Rc::ptr_eq(a, b),
            (Val::Native(a), Val::Native(b)) => Rc::ptr_eq(a, b),
            (Val::Module(a), Val::Module(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Val {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Val::Str(s) => write!(f, "Str({s:?})"),
            Val::Literal(s) => write!(f, "Literal({s:?})"),
            other => write!(f, "{}", other.render()),
        }
    }
}

impl PartialEq for Val {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

/* ===================== Callables ===================== */

/// A function defined in script code
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    pub rest: Option<String>,
    pub body: Rc<Vec<Stmt>>,
    /// Namespace the function was defined in
    pub globals: Rc<Namespace>,
}

pub struct NativeFunc {
    pub name: String,
    pub call: Box<NativeImpl>,
}

impl NativeFunc {
    pub fn new<F>(name: &str, call: F) -> Rc<Self>
    where
        F: Fn(&str, Vec<Val>) -> Result<Val, ScriptError> + 'static,
    {
        Rc::new(Self {
            name: name.to_string(),
            call: Box::new(call),
        })
    }
}

/* ===================== Namespaces ===================== */

/// A named top-level scope (`__main__` or a module)
pub struct Namespace {
    name: String,
    vars: RefCell<HashMap<String, Val>>,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            vars: RefCell::new(HashMap::new()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, name: &str) -> Option<Val> {
        self.vars.borrow().get(name).cloned()
    }

    pub fn set(&self, name: impl Into<String>, value: Val) {
        self.vars.borrow_mut().insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.borrow().contains_key(name)
    }

    /// Drop every binding. Functions hold their defining namespace, so this
    /// breaks the namespace/function reference cycles at engine teardown.
    pub fn clear(&self) {
        let vars = std::mem::take(&mut *self.vars.borrow_mut());
        drop(vars);
    }
}
