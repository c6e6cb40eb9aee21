//! Script engine failure values

use thiserror::Error;

/// A failure raised inside the script engine
///
/// `Raised` and `Host` render as their bare message so that a failure keeps the
/// same text however many frames it crosses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    /// Raised by script code
    #[error("{0}")]
    Raised(String),

    /// A bridge failure surfaced inside script code
    #[error("{0}")]
    Host(String),

    #[error("NameError: name '{0}' is not defined")]
    Name(String),

    #[error("TypeError: {0}")]
    Type(String),

    #[error("KeyError: '{0}'")]
    Key(String),

    #[error("AttributeError: {0}")]
    Attribute(String),

    #[error("ImportError: no module named '{0}'")]
    Import(String),

    #[error("IOError: {path}: {message}")]
    Io { path: String, message: String },

    #[error("SyntaxError: {0}")]
    Syntax(String),
}
