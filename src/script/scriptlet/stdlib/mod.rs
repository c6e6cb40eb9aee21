//! Standard library
//!
//! - `core`: global builtins (`str`, `len`, `split`, ...)
//! - `bridge`: the native module wired to the host

pub mod bridge;
pub mod core;

use super::types::Val;
use crate::script::ScriptError;

/// Check the argument count of a native function
pub(crate) fn expect_args(name: &str, args: Vec<Val>, count: usize) -> Result<Vec<Val>, ScriptError> {
    if args.len() != count {
        return Err(ScriptError::Type(format!(
            "{name}() takes exactly {count} argument{} ({} given)",
            if count == 1 { "" } else { "s" },
            args.len()
        )));
    }
    Ok(args)
}

/// Extract a string argument (plain or literal)
pub(crate) fn expect_str(name: &str, value: &Val) -> Result<String, ScriptError> {
    match value {
        Val::Str(s) | Val::Literal(s) => Ok(s.clone()),
        other => Err(ScriptError::Type(format!(
            "{name}() expected a string, got {}",
            other.type_name()
        ))),
    }
}
