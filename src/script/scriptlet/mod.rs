//! # Scriptlet - embedded script engine
//!
//! A small brace-delimited scripting language used as the script side of the
//! bridge. It has functions with rest parameters, modules resolved through a
//! search path, `try`/`catch`, and a native `bridge` module wired to the host.
//!
//! ```text
//! import host
//!
//! fn configure(name, *sources) {
//!     host.call("add_target", name, *sources)
//! }
//! host.export_function(configure)
//! ```
//!
//! Every file run through [`ScriptEngine::run_file`] executes in the same
//! `__main__` namespace, so definitions from earlier runs stay visible.

pub mod interpreter;
pub mod parser;
pub mod stdlib;
pub mod types;

#[cfg(test)]
mod tests;

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;

use crate::script::{EngineFactory, HostCalls, ScriptEngine, ScriptError};
use interpreter::Env;
use types::{Namespace, SharedMap, Stmt, Val};

pub use parser::{parse_program, ParseError};

/// Engine name used in diagnostics
pub const ENGINE_NAME: &str = "Scriptlet";

/// File extension of importable modules
pub const MODULE_EXTENSION: &str = "sl";

/* ===================== Engine ===================== */

pub struct Scriptlet {
    main: Rc<Namespace>,
    module_path: RefCell<Vec<PathBuf>>,
    modules: RefCell<HashMap<String, Rc<Namespace>>>,
    exported: SharedMap,
    builtins: HashMap<String, Val>,
    calls: Rc<dyn HostCalls>,
}

impl Scriptlet {
    /// Create an engine whose `bridge` module calls into `calls`
    pub fn new(calls: Rc<dyn HostCalls>) -> Self {
        let exported: SharedMap = Rc::new(RefCell::new(BTreeMap::new()));

        let mut modules = HashMap::new();
        modules.insert(
            stdlib::bridge::MODULE_NAME.to_string(),
            stdlib::bridge::module(Rc::clone(&calls), Rc::clone(&exported)),
        );

        Self {
            main: Namespace::new("__main__"),
            module_path: RefCell::new(Vec::new()),
            modules: RefCell::new(modules),
            exported,
            builtins: stdlib::core::builtins(),
            calls,
        }
    }

    /// Factory for [`crate::bridge::Runtime`]
    pub fn factory() -> EngineFactory {
        Box::new(|calls| Ok(Box::new(Scriptlet::new(calls)) as Box<dyn ScriptEngine>))
    }

    /// The shared top-level namespace
    pub fn main_namespace(&self) -> &Rc<Namespace> {
        &self.main
    }

    /// Names currently in the exported function registry
    pub fn exported_names(&self) -> Vec<String> {
        self.exported.borrow().keys().cloned().collect()
    }

    pub fn module_path(&self) -> Vec<PathBuf> {
        self.module_path.borrow().clone()
    }

    /* ===================== Modules ===================== */

    /// Resolve a module: cached/native first, then `<dir>/<name>.sl` along the search path
    pub(crate) fn import(&self, name: &str) -> Result<Rc<Namespace>, ScriptError> {
        if let Some(ns) = self.modules.borrow().get(name) {
            return Ok(Rc::clone(ns));
        }

        let path = self
            .find_module(name)
            .ok_or_else(|| ScriptError::Import(name.to_string()))?;
        let program = load_program(&path)?;
        debug!(module = name, path = %path.display(), "importing module");

        // registered before running so circular imports see the partial module
        let ns = Namespace::new(name);
        self.modules
            .borrow_mut()
            .insert(name.to_string(), Rc::clone(&ns));

        if let Err(err) = self.exec_block(&program, &Env::global(&ns)) {
            self.modules.borrow_mut().remove(name);
            return Err(err);
        }
        Ok(ns)
    }

    fn find_module(&self, name: &str) -> Option<PathBuf> {
        self.module_path
            .borrow()
            .iter()
            .map(|dir| dir.join(format!("{name}.{MODULE_EXTENSION}")))
            .find(|candidate| candidate.is_file())
    }

    pub(crate) fn builtin(&self, name: &str) -> Option<Val> {
        self.builtins.get(name).cloned()
    }

    pub(crate) fn calls(&self) -> &Rc<dyn HostCalls> {
        &self.calls
    }
}

/* ===================== ScriptEngine ===================== */

impl ScriptEngine for Scriptlet {
    fn name(&self) -> &str {
        ENGINE_NAME
    }

    fn insert_module_path(&self, index: usize, dir: PathBuf) {
        let mut path = self.module_path.borrow_mut();
        let index = index.min(path.len());
        path.insert(index, dir);
    }

    fn run_file(&self, path: &Path) -> Result<(), ScriptError> {
        let program = load_program(path)?;
        debug!(path = %path.display(), statements = program.len(), "running script file");
        self.exec_block(&program, &Env::global(&self.main))?;
        Ok(())
    }

    fn call_exported(&self, name: &str, args: &[String]) -> Result<(), ScriptError> {
        let function = self
            .exported
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| ScriptError::Key(name.to_string()))?;

        let args = args.iter().cloned().map(Val::Str).collect();
        self.call_value(&function, args, self.main.name())?;
        Ok(())
    }
}

impl Drop for Scriptlet {
    fn drop(&mut self) {
        let modules: Vec<Rc<Namespace>> = self.modules.borrow_mut().drain().map(|(_, ns)| ns).collect();
        for ns in modules {
            ns.clear();
        }
        self.main.clear();
        let exported = std::mem::take(&mut *self.exported.borrow_mut());
        drop(exported);
        debug!("scriptlet engine torn down");
    }
}

/* ===================== Loading ===================== */

fn load_program(path: &Path) -> Result<Vec<Stmt>, ScriptError> {
    let source = std::fs::read_to_string(path).map_err(|e| ScriptError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_program(&source)
        .map_err(|e| ScriptError::Syntax(format!("{}: {e}", path.display())))
}
