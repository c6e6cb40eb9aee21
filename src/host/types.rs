//! Invocation and status types shared by host and bridge

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

use super::HostEngine;

/* ===================== Arguments ===================== */

/// How an argument is delimited in the host language.
///
/// `Quoted` arguments reach the command as one token. `Unquoted` arguments are
/// passed through unescaped and are subject to the host's list splitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Delimiter {
    #[default]
    Quoted,
    Unquoted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub value: String,
    pub delim: Delimiter,
}

impl Argument {
    pub fn quoted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            delim: Delimiter::Quoted,
        }
    }

    pub fn unquoted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            delim: Delimiter::Unquoted,
        }
    }
}

/* ===================== Invocation ===================== */

/// A synthetic command call: name plus ordered arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub name: String,
    pub args: Vec<Argument>,
}

impl Invocation {
    pub fn new(name: impl Into<String>, args: Vec<Argument>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Build an invocation whose arguments are all quoted
    pub fn quoted<I, S>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, args.into_iter().map(Argument::quoted).collect())
    }
}

/* ===================== Status ===================== */

/// Per-call execution status
///
/// Carries the error message of a failed command and the "nested" flag, which
/// means the failure was already reported deeper in the chain. The success flag
/// itself is the `bool` returned by [`HostEngine::execute_command`].
pub struct Status {
    id: Uuid,
    host: Rc<dyn HostEngine>,
    error: String,
    nested: bool,
}

impl Status {
    pub fn new(host: Rc<dyn HostEngine>) -> Self {
        Self {
            id: Uuid::new_v4(),
            host,
            error: String::new(),
            nested: false,
        }
    }

    /// Identity of this status, used as the frame identity by the bridge
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The host engine this status is scoped to
    pub fn host(&self) -> &Rc<dyn HostEngine> {
        &self.host
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = message.into();
    }

    pub fn nested_error(&self) -> bool {
        self.nested
    }

    pub fn set_nested_error(&mut self) {
        self.nested = true;
    }
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Status")
            .field("id", &self.id)
            .field("error", &self.error)
            .field("nested", &self.nested)
            .finish_non_exhaustive()
    }
}
