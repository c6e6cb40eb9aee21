//! # Call bridge
//!
//! Connects a [`HostEngine`] and a [`ScriptEngine`] so each can call the other
//! to any depth, with one diagnostic per root-cause failure.
//!
//! ```text
//! host ──run_file──▶ guard ──▶ script ──invoke──▶ host command
//!                                                   │
//!        guard ◀──__invoke_scriptfunc───────────────┘
//!          │
//!          ▼
//!        script (exported function) ...
//! ```
//!
//! Components:
//! - [`frame`]: frame stack, pending-failure slot and the entry point guard
//! - [`invoke`]: script → host (`invoke`, `get`, `enable_debug`)
//! - [`dispatch`]: host → script through the `__invoke_scriptfunc` command
//! - [`runtime`]: reference-counted engine lifecycle
//!
//! [`ScriptEngine`]: crate::script::ScriptEngine

pub mod dispatch;
pub mod frame;
pub mod invoke;
pub mod runtime;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, error};

use crate::error::BridgeError;
use crate::host::{HostEngine, Status};

pub use dispatch::INVOKE_COMMAND;
pub use frame::{CallContext, FrameContext};
pub use runtime::Runtime;

/// Source of a script run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    File(PathBuf),
    Inline(String),
}

/// A handle keeping the script engine alive for one host
///
/// Creating a bridge registers [`INVOKE_COMMAND`] on the host and acquires the
/// runtime; dropping it releases the runtime.
pub struct Bridge {
    runtime: Rc<Runtime>,
    host: Rc<dyn HostEngine>,
}

impl Bridge {
    pub fn new(runtime: &Rc<Runtime>, host: Rc<dyn HostEngine>) -> Result<Self, BridgeError> {
        runtime.acquire()?;
        host.add_builtin_command(INVOKE_COMMAND, dispatch::builtin(Rc::downgrade(runtime)));
        Ok(Self {
            runtime: Rc::clone(runtime),
            host,
        })
    }

    pub fn runtime(&self) -> &Rc<Runtime> {
        &self.runtime
    }

    pub fn host(&self) -> &Rc<dyn HostEngine> {
        &self.host
    }

    /// A fresh top-level status for this bridge's host
    pub fn status(&self) -> Status {
        Status::new(Rc::clone(&self.host))
    }

    /* ===================== Entry Points ===================== */

    /// Run a script file in the engine's shared top-level namespace
    pub fn run_file(&self, path: &Path, status: &mut Status) -> bool {
        debug!(path = %path.display(), "running script");
        self.runtime.calls().guard(status, || {
            let engine = self.runtime.engine()?;
            engine.run_file(path)?;
            Ok(())
        })
    }

    /// Run a script from any source. Only files are supported.
    pub fn run(&self, source: &ScriptSource, status: &mut Status) -> Result<bool, BridgeError> {
        match source {
            ScriptSource::File(path) => Ok(self.run_file(path, status)),
            ScriptSource::Inline(_) => {
                let err = BridgeError::NotImplemented("running scripts from a string".to_string());
                error!(error = %err, "inline script rejected");
                status.set_error(err.to_string());
                self.host.issue_message(&format!(
                    "[{}] {err}",
                    self.runtime.calls().engine_label()
                ));
                Err(err)
            }
        }
    }

    /// Call an exported script function as the host would
    pub fn invoke_exported(&self, name: &str, args: &[String], status: &mut Status) -> bool {
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push(name.to_string());
        full.extend_from_slice(args);
        dispatch::invoke_exported(&self.runtime, &full, status)
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        self.runtime.release();
    }
}
