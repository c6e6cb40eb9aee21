//! Test helpers for bridge tests
//!
//! A fixture wiring a `CommandHost` to a scriptlet runtime, with scripts
//! written into a temporary directory.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use tempfile::TempDir;

use crate::bridge::{Bridge, Runtime};
use crate::config::BridgeConfig;
use crate::host::{CommandHost, HostEngine, Invocation, Status};

pub struct Fixture {
    pub host: Rc<CommandHost>,
    pub runtime: Rc<Runtime>,
    pub bridge: Bridge,
    pub dir: TempDir,
}

pub fn fixture() -> Fixture {
    let host = CommandHost::new();
    let runtime = Runtime::with_scriptlet(BridgeConfig::default());
    let bridge = Bridge::new(&runtime, Rc::clone(&host) as Rc<dyn HostEngine>).expect("bridge");
    Fixture {
        host,
        runtime,
        bridge,
        dir: tempfile::tempdir().expect("tempdir"),
    }
}

impl Fixture {
    /// Write a script file into the fixture directory
    pub fn script(&self, name: &str, source: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, source).expect("write script");
        path
    }

    /// Write and run a script as an outermost guarded call
    pub fn run(&self, name: &str, source: &str) -> (bool, Status) {
        let path = self.script(name, source);
        let mut status = self.bridge.status();
        let succeeded = self.bridge.run_file(&path, &mut status);
        (succeeded, status)
    }

    /// Execute a host command at top level, outside any guarded call
    pub fn execute(&self, invocation: Invocation) -> (bool, Status) {
        let mut status = self.bridge.status();
        let succeeded = self.host.execute_command(&invocation, &mut status);
        (succeeded, status)
    }

    /// Diagnostics issued by the bridge for unhandled failures
    pub fn unhandled(&self) -> Vec<String> {
        self.host
            .messages()
            .into_iter()
            .filter(|m| m.starts_with("Unhandled "))
            .collect()
    }

    /// Register a host builtin recording the arguments it receives
    pub fn recorder(&self, name: &str) -> Rc<RefCell<Vec<Vec<String>>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        self.host.add_builtin_command(
            name,
            Rc::new(move |args: &[String], _status: &mut Status| {
                sink.borrow_mut().push(args.to_vec());
                true
            }),
        );
        seen
    }
}
