//! Host calling into script: the exported-function dispatch command

use std::rc::{Rc, Weak};
use tracing::debug;

use super::runtime::Runtime;
use crate::error::BridgeError;
use crate::host::{BuiltinCommand, Status};

/// Host command that calls a function from the exported function registry
pub const INVOKE_COMMAND: &str = "__invoke_scriptfunc";

/// The builtin registered on the host. It holds the runtime weakly so a host
/// outliving its bridges does not keep the engine alive.
pub(crate) fn builtin(runtime: Weak<Runtime>) -> BuiltinCommand {
    Rc::new(move |args: &[String], status: &mut Status| match runtime.upgrade() {
        Some(runtime) => invoke_exported(&runtime, args, status),
        None => {
            status.set_error(BridgeError::EngineNotRunning.to_string());
            false
        }
    })
}

/// `args[0]` names the function, the rest are passed positionally
pub fn invoke_exported(runtime: &Runtime, args: &[String], status: &mut Status) -> bool {
    let Some((name, rest)) = args.split_first() else {
        status.set_error("called with incorrect number of arguments");
        return false;
    };

    debug!(function = %name, args = rest.len(), "dispatching to exported function");
    runtime.calls().guard(status, || {
        let engine = runtime.engine()?;
        engine.call_exported(name, rest)?;
        Ok(())
    })
}
