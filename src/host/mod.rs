//! Host command engine contract
//!
//! The bridge only talks to the host through [`HostEngine`]. The host executes
//! [`Invocation`]s against a [`Status`], exposes its variables, accepts builtin
//! commands and owns the user-visible diagnostics channel.
//!
//! [`CommandHost`] is an in-memory implementation used by the CLI and tests.

pub mod command_host;
pub mod expand;
pub mod types;

#[cfg(test)]
mod tests;

use std::rc::Rc;

pub use command_host::CommandHost;
pub use types::{Argument, Delimiter, Invocation, Status};

/// Builtin command signature: expanded arguments in, success flag out.
pub type BuiltinCommand = Rc<dyn Fn(&[String], &mut Status) -> bool>;

pub trait HostEngine {
    /// Execute one command. Errors are written into `status`.
    fn execute_command(&self, invocation: &Invocation, status: &mut Status) -> bool;

    /// Look up a variable in the current scope.
    fn get_definition(&self, name: &str) -> Option<String>;

    /// Register (or replace) a builtin command.
    fn add_builtin_command(&self, name: &str, command: BuiltinCommand);

    /// Emit a user-visible diagnostic.
    fn issue_message(&self, text: &str);

    fn set_fatal_error_occurred(&self);

    fn fatal_error_occurred(&self) -> bool;
}
