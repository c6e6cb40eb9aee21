//! The native `bridge` module
//!
//! | name | purpose |
//! |---|---|
//! | `invoke(command, *args)` | run a host command |
//! | `get(name)` | read a host variable, `none` if unset |
//! | `enable_debug(flag)` | trace every `invoke` |
//! | `literal(value)` | mark an argument to be passed unescaped |
//! | `exported_functions` | registry consulted when the host calls into script |

use std::rc::Rc;

use super::{expect_args, expect_str};
use crate::error::BridgeError;
use crate::script::scriptlet::types::{Namespace, NativeFunc, SharedMap, Val};
use crate::script::{HostCalls, ScriptArg, ScriptError};

pub const MODULE_NAME: &str = "bridge";

/// Build the module namespace around the given host calls and registry
pub fn module(calls: Rc<dyn HostCalls>, exported: SharedMap) -> Rc<Namespace> {
    let ns = Namespace::new(MODULE_NAME);

    let host = Rc::clone(&calls);
    ns.set(
        "invoke",
        Val::Native(NativeFunc::new("invoke", move |caller, args| {
            invoke(host.as_ref(), caller, args)
        })),
    );

    let host = Rc::clone(&calls);
    ns.set(
        "get",
        Val::Native(NativeFunc::new("get", move |_, args| {
            let args = expect_args("get", args, 1)?;
            let name = expect_str("get", &args[0])?;
            match host.get(&name).map_err(into_script_error)? {
                Some(value) => Ok(Val::Str(value)),
                None => Ok(Val::None),
            }
        })),
    );

    let host = calls;
    ns.set(
        "enable_debug",
        Val::Native(NativeFunc::new("enable_debug", move |_, args| {
            let args = expect_args("enable_debug", args, 1)?;
            host.enable_debug(args[0].is_truthy());
            Ok(Val::None)
        })),
    );

    ns.set(
        "literal",
        Val::Native(NativeFunc::new("literal", |_, args| {
            let args = expect_args("literal", args, 1)?;
            Ok(Val::Literal(args[0].render()))
        })),
    );

    ns.set("exported_functions", Val::Map(exported));
    ns
}

fn invoke(calls: &dyn HostCalls, caller: &str, args: Vec<Val>) -> Result<Val, ScriptError> {
    let mut args = args.into_iter();
    let command = match args.next() {
        Some(Val::Str(name)) | Some(Val::Literal(name)) => name,
        Some(other) => {
            return Err(ScriptError::Type(format!(
                "invoke() command name must be a string, not {}",
                other.type_name()
            )))
        }
        None => {
            return Err(ScriptError::Type(
                "invoke() missing required argument 'command'".to_string(),
            ))
        }
    };

    let args: Vec<ScriptArg> = args
        .map(|value| match value {
            Val::Literal(text) => ScriptArg::literal(text),
            other => ScriptArg::quoted(other.render()),
        })
        .collect();

    calls
        .invoke(caller, &command, &args)
        .map_err(into_script_error)?;
    Ok(Val::None)
}

/// A failure coming back out of the bridge keeps its message unchanged
fn into_script_error(err: BridgeError) -> ScriptError {
    match err {
        BridgeError::Script(inner) => inner,
        other => ScriptError::Host(other.to_string()),
    }
}
