//! Script engine contract
//!
//! The bridge drives the embedded script engine through [`ScriptEngine`], and
//! the engine calls back into the host through the [`HostCalls`] object it is
//! handed when it starts.

pub mod error;
pub mod scriptlet;

use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::BridgeError;
use crate::host::Argument;

pub use error::ScriptError;

/* ===================== Script -> Host ===================== */

/// An argument passed from script code to a host command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptArg {
    pub value: String,
    /// Pass through unescaped instead of as one quoted token
    pub literal: bool,
}

impl ScriptArg {
    pub fn quoted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            literal: false,
        }
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            literal: true,
        }
    }
}

impl From<&ScriptArg> for Argument {
    fn from(arg: &ScriptArg) -> Self {
        if arg.literal {
            Argument::unquoted(arg.value.clone())
        } else {
            Argument::quoted(arg.value.clone())
        }
    }
}

/// Host calls available to script code
pub trait HostCalls {
    /// Execute a host command. `caller` is the calling namespace's name.
    fn invoke(&self, caller: &str, command: &str, args: &[ScriptArg]) -> Result<(), BridgeError>;

    /// Read a host variable
    fn get(&self, name: &str) -> Result<Option<String>, BridgeError>;

    /// Toggle per-invocation tracing
    fn enable_debug(&self, enable: bool);

    /// Script code caught a failure. Anything still recorded for it is stale.
    fn failure_handled(&self) {}
}

/* ===================== Engine ===================== */

pub trait ScriptEngine {
    /// Engine name used in diagnostics
    fn name(&self) -> &str;

    /// Insert a directory into the module search path
    fn insert_module_path(&self, index: usize, dir: PathBuf);

    /// Evaluate a file in the engine's shared top-level namespace
    fn run_file(&self, path: &Path) -> Result<(), ScriptError>;

    /// Call a function from the exported function registry
    fn call_exported(&self, name: &str, args: &[String]) -> Result<(), ScriptError>;
}

/// Creates a started engine wired to the given host calls
pub type EngineFactory = Box<dyn Fn(Rc<dyn HostCalls>) -> Result<Box<dyn ScriptEngine>, BridgeError>>;
