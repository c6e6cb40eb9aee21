//! In-memory host command engine
//!
//! A small command interpreter with the shape of a build-description engine:
//!
//! - a case-insensitive command table (intrinsics plus registered builtins),
//! - a stack of variable scopes,
//! - user functions recorded between `function(...)` and `endfunction()`,
//! - project settings and the executable targets declared so far,
//! - a diagnostics log, an error-occurred flag and a process-wide fatal flag.
//!
//! Commands are executed re-entrantly: a builtin may call back into the bridge,
//! which may call `execute_command` again. No `RefCell` borrow is held while a
//! command runs.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use tracing::{debug, trace};

use super::expand::expand_arguments;
use super::types::{Invocation, Status};
use super::{BuiltinCommand, HostEngine};

/* ===================== Command Table ===================== */

#[derive(Clone)]
enum Command {
    Set,
    Message,
    MinimumRequired,
    Project,
    AddExecutable,
    Builtin(BuiltinCommand),
    User(Rc<UserFunction>),
}

#[derive(Debug, Clone)]
struct UserFunction {
    name: String,
    params: Vec<String>,
    body: Vec<Invocation>,
}

/// A function definition being recorded. `depth` counts nested
/// `function()` blocks so their `endfunction()` is recorded, not executed.
struct Recording {
    function: UserFunction,
    depth: usize,
}

/* ===================== CommandHost ===================== */

pub struct CommandHost {
    commands: RefCell<HashMap<String, Command>>,
    scopes: RefCell<Vec<HashMap<String, String>>>,
    recording: RefCell<Option<Recording>>,
    targets: RefCell<BTreeMap<String, Vec<String>>>,
    messages: RefCell<Vec<String>>,
    error_occurred: Cell<bool>,
    fatal: Cell<bool>,
    echo: bool,
}

impl CommandHost {
    /// Create a host that only records its messages
    pub fn new() -> Rc<Self> {
        Rc::new(Self::create(false))
    }

    /// Create a host that also prints every message to stderr
    pub fn with_echo() -> Rc<Self> {
        Rc::new(Self::create(true))
    }

    fn create(echo: bool) -> Self {
        let mut commands = HashMap::new();
        commands.insert("set".to_string(), Command::Set);
        commands.insert("message".to_string(), Command::Message);
        commands.insert("minimum_required".to_string(), Command::MinimumRequired);
        commands.insert("project".to_string(), Command::Project);
        commands.insert("add_executable".to_string(), Command::AddExecutable);

        Self {
            commands: RefCell::new(commands),
            scopes: RefCell::new(vec![HashMap::new()]),
            recording: RefCell::new(None),
            targets: RefCell::new(BTreeMap::new()),
            messages: RefCell::new(Vec::new()),
            error_occurred: Cell::new(false),
            fatal: Cell::new(false),
            echo,
        }
    }

    /// Set a variable in the current scope
    pub fn define(&self, name: &str, value: &str) {
        if let Some(scope) = self.scopes.borrow_mut().last_mut() {
            scope.insert(name.to_string(), value.to_string());
        }
    }

    /// Every diagnostic issued so far, in order
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    /// True once any command failure has been reported, including ones the
    /// script side recovered from. Only an unhandled failure sets the fatal flag.
    pub fn error_occurred(&self) -> bool {
        self.error_occurred.get()
    }

    /// True if a command (intrinsic, builtin or user function) has this name
    pub fn has_command(&self, name: &str) -> bool {
        self.commands
            .borrow()
            .contains_key(&name.to_ascii_lowercase())
    }

    /// Executable targets and their sources, by name
    pub fn targets(&self) -> BTreeMap<String, Vec<String>> {
        self.targets.borrow().clone()
    }

    /// Nesting depth of variable scopes (1 at top level)
    pub fn scope_depth(&self) -> usize {
        self.scopes.borrow().len()
    }

    /* ===================== Recording ===================== */

    /// Record `invocation` into the function being defined, if any.
    /// Returns true when the invocation was consumed by the recorder.
    fn record(&self, invocation: &Invocation) -> bool {
        let mut recording = self.recording.borrow_mut();
        let Some(active) = recording.as_mut() else {
            return false;
        };

        match invocation.name.to_ascii_lowercase().as_str() {
            "function" => active.depth += 1,
            "endfunction" if active.depth == 0 => {
                if let Some(done) = recording.take() {
                    let function = done.function;
                    debug!(function = %function.name, commands = function.body.len(), "defined host function");
                    self.commands.borrow_mut().insert(
                        function.name.to_ascii_lowercase(),
                        Command::User(Rc::new(function)),
                    );
                }
                return true;
            }
            "endfunction" => active.depth -= 1,
            _ => {}
        }
        active.function.body.push(invocation.clone());
        true
    }

    fn begin_function(&self, args: &[String], status: &mut Status) -> bool {
        let Some((name, params)) = args.split_first() else {
            status.set_error("called with incorrect number of arguments");
            return false;
        };
        *self.recording.borrow_mut() = Some(Recording {
            function: UserFunction {
                name: name.clone(),
                params: params.to_vec(),
                body: Vec::new(),
            },
            depth: 0,
        });
        true
    }

    /* ===================== Intrinsics ===================== */

    fn set(&self, args: &[String], status: &mut Status) -> bool {
        let Some((name, values)) = args.split_first() else {
            status.set_error("called with incorrect number of arguments");
            return false;
        };

        let (values, parent) = match values.split_last() {
            Some((last, head)) if last == "PARENT_SCOPE" => (head, true),
            _ => (values, false),
        };

        let mut scopes = self.scopes.borrow_mut();
        let depth = scopes.len();
        let target = if parent {
            if depth < 2 {
                // no parent scope at top level: silently ignored
                return true;
            }
            &mut scopes[depth - 2]
        } else {
            &mut scopes[depth - 1]
        };

        if values.is_empty() {
            target.remove(name);
        } else {
            target.insert(name.clone(), values.join(";"));
        }
        true
    }

    fn message(&self, args: &[String], status: &mut Status) -> bool {
        match args.split_first() {
            Some((mode, text)) if mode == "FATAL_ERROR" || mode == "SEND_ERROR" => {
                status.set_error(text.concat());
                false
            }
            Some((mode, text)) if mode == "STATUS" || mode == "WARNING" => {
                self.issue_message(&text.concat());
                true
            }
            _ => {
                self.issue_message(&args.concat());
                true
            }
        }
    }

    /// `minimum_required(VERSION <version> [FATAL_ERROR])`
    fn minimum_required(&self, args: &[String], status: &mut Status) -> bool {
        match args {
            [keyword, version, rest @ ..]
                if keyword == "VERSION" && rest.iter().all(|arg| arg == "FATAL_ERROR") =>
            {
                self.define("MINIMUM_REQUIRED_VERSION", version);
                true
            }
            _ => {
                status.set_error("called with invalid arguments, expected VERSION <version>");
                false
            }
        }
    }

    /// `project(<name> [VERSION <version>] [DESCRIPTION <text>] [LANGUAGES <lang>...])`
    fn project(&self, args: &[String], status: &mut Status) -> bool {
        let Some((name, mut rest)) = args.split_first() else {
            status.set_error("called with incorrect number of arguments");
            return false;
        };

        let mut settings = vec![("PROJECT_NAME", name.clone())];
        while let Some((keyword, tail)) = rest.split_first() {
            match keyword.as_str() {
                "VERSION" | "DESCRIPTION" => {
                    let Some((value, tail)) = tail.split_first() else {
                        status.set_error(format!("{keyword} keyword not followed by a value"));
                        return false;
                    };
                    let var = if keyword == "VERSION" {
                        "PROJECT_VERSION"
                    } else {
                        "PROJECT_DESCRIPTION"
                    };
                    settings.push((var, value.clone()));
                    rest = tail;
                }
                "LANGUAGES" => {
                    settings.push(("PROJECT_LANGUAGES", tail.join(";")));
                    rest = &[];
                }
                other => {
                    status.set_error(format!("called with unknown argument \"{other}\""));
                    return false;
                }
            }
        }

        for (var, value) in settings {
            self.define(var, &value);
        }
        true
    }

    /// `add_executable(<name> <source>...)`
    fn add_executable(&self, args: &[String], status: &mut Status) -> bool {
        let Some((name, sources)) = args.split_first() else {
            status.set_error("called with incorrect number of arguments");
            return false;
        };
        if sources.is_empty() {
            status.set_error(format!("no sources given to target: {name}"));
            return false;
        }

        let mut targets = self.targets.borrow_mut();
        if targets.contains_key(name) {
            status.set_error(format!(
                "cannot create target \"{name}\" because another target with the same name already exists"
            ));
            return false;
        }
        debug!(target = %name, sources = sources.len(), "added executable");
        targets.insert(name.clone(), sources.to_vec());
        true
    }

    fn call_function(&self, function: &UserFunction, args: &[String], status: &mut Status) -> bool {
        if args.len() < function.params.len() {
            status.set_error(format!(
                "Function invoked with incorrect arguments for function named: {}",
                function.name
            ));
            return false;
        }

        let mut scope = self.scopes.borrow().last().cloned().unwrap_or_default();
        for (param, value) in function.params.iter().zip(args) {
            scope.insert(param.clone(), value.clone());
        }
        for (idx, value) in args.iter().enumerate() {
            scope.insert(format!("ARGV{idx}"), value.clone());
        }
        scope.insert("ARGC".to_string(), args.len().to_string());
        scope.insert("ARGV".to_string(), args.join(";"));
        scope.insert("ARGN".to_string(), args[function.params.len()..].join(";"));
        self.scopes.borrow_mut().push(scope);

        let host = Rc::clone(status.host());
        let mut succeeded = true;
        for command in &function.body {
            let mut inner = Status::new(Rc::clone(&host));
            if !host.execute_command(command, &mut inner) {
                // the failing command reported itself
                status.set_nested_error();
                succeeded = false;
                break;
            }
        }

        self.scopes.borrow_mut().pop();
        succeeded
    }
}

/* ===================== HostEngine ===================== */

impl HostEngine for CommandHost {
    fn execute_command(&self, invocation: &Invocation, status: &mut Status) -> bool {
        if self.record(invocation) {
            return true;
        }

        let key = invocation.name.to_ascii_lowercase();
        let args = expand_arguments(&invocation.args, |name| self.get_definition(name));
        trace!(command = %invocation.name, ?args, "executing host command");

        let command = self.commands.borrow().get(&key).cloned();
        let succeeded = match command {
            Some(Command::Set) => self.set(&args, status),
            Some(Command::Message) => self.message(&args, status),
            Some(Command::MinimumRequired) => self.minimum_required(&args, status),
            Some(Command::Project) => self.project(&args, status),
            Some(Command::AddExecutable) => self.add_executable(&args, status),
            Some(Command::Builtin(builtin)) => builtin(&args, status),
            Some(Command::User(function)) => self.call_function(&function, &args, status),
            None if key == "function" => self.begin_function(&args, status),
            None if key == "endfunction" => {
                status.set_error("endfunction() without a matching function()");
                false
            }
            None => {
                status.set_error(format!("Unknown command \"{}\".", invocation.name));
                false
            }
        };

        // after an unhandled failure the bridge diagnostic already covers it
        if !succeeded && !status.nested_error() && !self.fatal_error_occurred() {
            self.issue_message(&format!("Error in {}: {}", invocation.name, status.error()));
            self.error_occurred.set(true);
        }
        succeeded
    }

    fn get_definition(&self, name: &str) -> Option<String> {
        self.scopes
            .borrow()
            .last()
            .and_then(|scope| scope.get(name).cloned())
    }

    fn add_builtin_command(&self, name: &str, command: BuiltinCommand) {
        self.commands
            .borrow_mut()
            .insert(name.to_ascii_lowercase(), Command::Builtin(command));
    }

    fn issue_message(&self, text: &str) {
        if self.echo {
            eprintln!("{text}");
        }
        self.messages.borrow_mut().push(text.to_string());
    }

    fn set_fatal_error_occurred(&self) {
        self.fatal.set(true);
    }

    fn fatal_error_occurred(&self) -> bool {
        self.fatal.get()
    }
}
