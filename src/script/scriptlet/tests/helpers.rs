//! Test helpers for scriptlet tests
//!
//! A recording `HostCalls` stand-in and shortcuts for running source text.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;
use tempfile::TempDir;

use crate::error::BridgeError;
use crate::script::scriptlet::types::Val;
use crate::script::scriptlet::Scriptlet;
use crate::script::{HostCalls, ScriptArg, ScriptEngine, ScriptError};

/// One recorded `invoke`
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub caller: String,
    pub command: String,
    pub args: Vec<ScriptArg>,
}

/// Records every call; commands named in `failing` fail with "boom"
#[derive(Default)]
pub struct RecordingCalls {
    pub calls: RefCell<Vec<Call>>,
    pub vars: RefCell<HashMap<String, String>>,
    pub failing: RefCell<Vec<String>>,
    pub debug: Cell<bool>,
}

impl HostCalls for RecordingCalls {
    fn invoke(&self, caller: &str, command: &str, args: &[ScriptArg]) -> Result<(), BridgeError> {
        self.calls.borrow_mut().push(Call {
            caller: caller.to_string(),
            command: command.to_string(),
            args: args.to_vec(),
        });
        if self.failing.borrow().iter().any(|name| name == command) {
            return Err(BridgeError::Command {
                command: command.to_string(),
                message: "boom".to_string(),
            });
        }
        Ok(())
    }

    fn get(&self, name: &str) -> Result<Option<String>, BridgeError> {
        Ok(self.vars.borrow().get(name).cloned())
    }

    fn enable_debug(&self, enable: bool) {
        self.debug.set(enable);
    }
}

/// An engine wired to a fresh recorder, with the support modules on its path
pub fn engine() -> (Scriptlet, Rc<RecordingCalls>) {
    let calls = Rc::new(RecordingCalls::default());
    let engine = Scriptlet::new(Rc::clone(&calls) as Rc<dyn HostCalls>);
    engine.insert_module_path(0, PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/modules")));
    (engine, calls)
}

/// Write `source` as `<name>` inside `dir`
pub fn write_script(dir: &TempDir, name: &str, source: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, source).expect("write script");
    path
}

/// Run source text as a file in the engine's main namespace
pub fn run(engine: &Scriptlet, source: &str) -> Result<(), ScriptError> {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_script(&dir, "main.sl", source);
    engine.run_file(&path)
}

/// Value of a top-level variable after a run
pub fn global(engine: &Scriptlet, name: &str) -> Val {
    engine
        .main_namespace()
        .get(name)
        .unwrap_or_else(|| panic!("global '{name}' not set"))
}

pub fn s(v: &str) -> Val {
    Val::Str(v.to_string())
}
