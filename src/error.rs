//! Bridge error types
//!
//! `BridgeError` is the failure value that travels through the pending-failure
//! slot. It is `Clone` because the slot hands the same failure back out when a
//! frame further up re-raises it.

use thiserror::Error;

use crate::script::ScriptError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// `invoke`/`get` reached with no host frame in scope. Always a bridge
    /// integration bug, never a user mistake.
    #[error("INTERNAL ERROR: no active host frame for '{operation}'")]
    NoActiveFrame { operation: String },

    /// A host command failed (or reported a nested failure) when called from script.
    #[error("invoke error: {command}: {message}")]
    Command { command: String, message: String },

    /// Failure raised inside the script engine.
    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error("{0} is not implemented")]
    NotImplemented(String),

    #[error("script engine is not running")]
    EngineNotRunning,

    #[error("failed to start script engine: {0}")]
    EngineStart(String),
}

impl BridgeError {
    /// True for failures that signal a misuse of the bridge itself.
    pub fn is_internal(&self) -> bool {
        matches!(self, BridgeError::NoActiveFrame { .. })
    }
}
