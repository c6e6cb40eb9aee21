//! Reference-counted script engine lifecycle
//!
//! A [`Runtime`] owns at most one started engine. Each [`super::Bridge`]
//! holds one reference: the first acquire starts the engine, the last release
//! tears it down, and the count may return to zero and rise again any number
//! of times.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, info};

use super::frame::CallContext;
use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::script::scriptlet::Scriptlet;
use crate::script::{EngineFactory, HostCalls, ScriptEngine};

pub struct Runtime {
    config: BridgeConfig,
    factory: EngineFactory,
    calls: Rc<CallContext>,
    engine: RefCell<Option<Rc<dyn ScriptEngine>>>,
    instances: Cell<usize>,
}

impl Runtime {
    pub fn new(config: BridgeConfig, factory: EngineFactory) -> Rc<Self> {
        Rc::new(Self {
            config,
            factory,
            calls: CallContext::new(),
            engine: RefCell::new(None),
            instances: Cell::new(0),
        })
    }

    /// Runtime backed by the built-in scriptlet engine
    pub fn with_scriptlet(config: BridgeConfig) -> Rc<Self> {
        Self::new(config, Scriptlet::factory())
    }

    /// Pick the engine named in the configuration
    pub fn from_config(config: BridgeConfig) -> Result<Rc<Self>, BridgeError> {
        match config.engine.to_ascii_lowercase().as_str() {
            "scriptlet" => Ok(Self::with_scriptlet(config)),
            other => Err(BridgeError::EngineStart(format!("unknown script engine '{other}'"))),
        }
    }

    /* ===================== Reference Count ===================== */

    pub(super) fn acquire(&self) -> Result<(), BridgeError> {
        let count = self.instances.get() + 1;
        if count == 1 {
            self.start()?;
        }
        self.instances.set(count);
        debug!(instances = count, "script runtime acquired");
        Ok(())
    }

    pub(super) fn release(&self) {
        let count = self.instances.get().saturating_sub(1);
        self.instances.set(count);
        debug!(instances = count, "script runtime released");
        if count == 0 {
            self.stop();
        }
    }

    fn start(&self) -> Result<(), BridgeError> {
        self.calls.reset();
        let calls: Rc<dyn HostCalls> = Rc::clone(&self.calls) as Rc<dyn HostCalls>;
        let engine: Rc<dyn ScriptEngine> = Rc::from((self.factory)(calls)?);

        engine.insert_module_path(0, self.config.support_module_dir.clone());
        self.calls.set_engine_label(engine.name());
        self.calls.set_debug(self.config.debug);

        info!(
            engine = engine.name(),
            support_dir = %self.config.support_module_dir.display(),
            "script engine started"
        );
        self.engine.replace(Some(engine));
        Ok(())
    }

    fn stop(&self) {
        let engine = self.engine.borrow_mut().take();
        if let Some(engine) = engine {
            info!(engine = engine.name(), "script engine stopped");
        }
    }

    /* ===================== Accessors ===================== */

    /// The running engine
    pub fn engine(&self) -> Result<Rc<dyn ScriptEngine>, BridgeError> {
        self.engine
            .borrow()
            .as_ref()
            .map(Rc::clone)
            .ok_or(BridgeError::EngineNotRunning)
    }

    pub fn is_running(&self) -> bool {
        self.engine.borrow().is_some()
    }

    /// Number of live bridge handles
    pub fn instances(&self) -> usize {
        self.instances.get()
    }

    pub fn calls(&self) -> &Rc<CallContext> {
        &self.calls
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }
}
