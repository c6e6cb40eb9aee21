//! Script code calling into the host

use std::rc::Rc;
use tracing::{error, info, trace};

use super::frame::CallContext;
use crate::error::BridgeError;
use crate::host::{Argument, HostEngine, Invocation, Status};
use crate::script::{HostCalls, ScriptArg};

impl CallContext {
    /// Host of the frame in scope, or the internal-logic failure
    fn active_host(&self, operation: &str) -> Result<Rc<dyn HostEngine>, BridgeError> {
        match self.frame() {
            Some(frame) => Ok(Rc::clone(frame.host())),
            None => {
                error!(operation, "INTERNAL ERROR: no active host frame");
                Err(BridgeError::NoActiveFrame {
                    operation: operation.to_string(),
                })
            }
        }
    }
}

impl HostCalls for CallContext {
    fn invoke(&self, caller: &str, command: &str, args: &[ScriptArg]) -> Result<(), BridgeError> {
        if self.debug_enabled() {
            let values: Vec<&str> = args.iter().map(|arg| arg.value.as_str()).collect();
            info!(command, caller, args = ?values, "invoke");
        }

        let host = self.active_host("invoke")?;

        // script code only gets here once any earlier failure was caught
        self.set_pending_failure(None);

        let invocation = Invocation::new(command, args.iter().map(Argument::from).collect());
        let mut status = Status::new(Rc::clone(&host));
        let succeeded = host.execute_command(&invocation, &mut status);

        // a failure from further down was already described there
        if let Some(err) = self.pending_failure() {
            return Err(err);
        }

        if !succeeded || status.nested_error() {
            let err = BridgeError::Command {
                command: command.to_string(),
                message: status.error().to_string(),
            };
            self.set_pending_failure(Some(err.clone()));
            return Err(err);
        }
        Ok(())
    }

    fn get(&self, name: &str) -> Result<Option<String>, BridgeError> {
        let host = self.active_host("get")?;
        Ok(host.get_definition(name))
    }

    fn enable_debug(&self, enable: bool) {
        self.set_debug(enable);
    }

    fn failure_handled(&self) {
        if self.has_pending_failure() {
            trace!("pending failure cleared by script handler");
            self.set_pending_failure(None);
        }
    }
}
