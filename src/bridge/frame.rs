//! Call context: the frame stack and the pending-failure slot
//!
//! Every boundary crossing runs through [`CallContext::guard`]. The guard
//! installs a [`FrameContext`] for the status it reports into and restores the
//! previous one on the way out, so the saved values on the Rust stack form the
//! frame stack. The pending-failure slot tells a frame whether a failure it sees
//! was already described deeper down.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{trace, warn};
use uuid::Uuid;

use crate::error::BridgeError;
use crate::host::{HostEngine, Status};

/// The host command currently being serviced
#[derive(Clone)]
pub struct FrameContext {
    status_id: Uuid,
    host: Rc<dyn HostEngine>,
}

impl FrameContext {
    fn for_status(status: &Status) -> Self {
        Self {
            status_id: status.id(),
            host: Rc::clone(status.host()),
        }
    }

    pub fn status_id(&self) -> Uuid {
        self.status_id
    }

    pub fn host(&self) -> &Rc<dyn HostEngine> {
        &self.host
    }
}

/// Mutable state of one logical call stack
pub struct CallContext {
    frame: RefCell<Option<FrameContext>>,
    pending: RefCell<Option<BridgeError>>,
    depth: Cell<usize>,
    debug: Cell<bool>,
    engine_label: RefCell<String>,
}

impl CallContext {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            frame: RefCell::new(None),
            pending: RefCell::new(None),
            depth: Cell::new(0),
            debug: Cell::new(false),
            engine_label: RefCell::new(String::from("script")),
        })
    }

    /* ===================== Entry Point Guard ===================== */

    /// Run `callee` as a boundary crossing reporting into `status`.
    ///
    /// Returns the success flag. A failure is written to `status` as a
    /// first-hand error, or flagged as nested when a deeper frame already
    /// recorded it. At the outermost frame the failure is issued to the host
    /// once and the host is marked fatal.
    pub fn guard<F>(&self, status: &mut Status, callee: F) -> bool
    where
        F: FnOnce() -> Result<(), BridgeError>,
    {
        let previous = self.frame.replace(Some(FrameContext::for_status(status)));
        self.pending.replace(None);

        let depth = self.depth.get() + 1;
        self.depth.set(depth);
        trace!(status = %status.id(), depth, "entering guarded call");

        let succeeded = match callee() {
            Ok(()) => {
                self.pending.replace(None);
                true
            }
            Err(err) => {
                self.record_failure(err, status, previous.is_none());
                false
            }
        };

        self.depth.set(depth - 1);
        trace!(status = %status.id(), depth, succeeded, "leaving guarded call");
        self.frame.replace(previous);
        succeeded
    }

    fn record_failure(&self, err: BridgeError, status: &mut Status, outermost: bool) {
        let inherited = self.pending.borrow().is_some();
        if inherited {
            status.set_nested_error();
        } else {
            status.set_error(err.to_string());
        }

        if !outermost {
            self.pending.replace(Some(err));
            return;
        }

        self.pending.replace(None);
        let label = self.engine_label();
        warn!(engine = %label, error = %err, inherited, "unhandled script failure");
        let host = Rc::clone(status.host());
        host.issue_message(&format!("Unhandled {label} exception:\n{err}"));
        host.set_fatal_error_occurred();
    }

    /* ===================== Slots ===================== */

    /// Status id of the frame currently in scope
    pub fn current_frame(&self) -> Option<Uuid> {
        self.frame.borrow().as_ref().map(FrameContext::status_id)
    }

    pub(super) fn frame(&self) -> Option<FrameContext> {
        self.frame.borrow().clone()
    }

    pub fn has_pending_failure(&self) -> bool {
        self.pending.borrow().is_some()
    }

    pub(super) fn pending_failure(&self) -> Option<BridgeError> {
        self.pending.borrow().clone()
    }

    pub(super) fn set_pending_failure(&self, err: Option<BridgeError>) {
        self.pending.replace(err);
    }

    /// Number of guarded calls currently on the stack
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug.get()
    }

    pub fn set_debug(&self, enable: bool) {
        self.debug.set(enable);
    }

    pub fn engine_label(&self) -> String {
        self.engine_label.borrow().clone()
    }

    pub fn set_engine_label(&self, label: &str) {
        self.engine_label.replace(label.to_string());
    }

    /// Forget all per-stack state. Only valid with no guarded call running.
    pub(super) fn reset(&self) {
        self.frame.replace(None);
        self.pending.replace(None);
        self.depth.set(0);
        self.debug.set(false);
    }
}
