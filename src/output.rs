//! Output port with a single-assignment deferred value.
//!
//! An output produces exactly one value per production cycle. The value is
//! exposed through [`Deferred`] handles so that any number of readers can
//! request the value before the producer has supplied it and suspend until
//! it resolves. The single-assignment invariant (one `set_output` between
//! two `clean_output` calls) is the concurrency contract; no locking is
//! needed on top of it.

use crate::error::PortError;
use crate::port::{Port, PortInfo};
use serde_json::Value;
use tokio::sync::watch;
use tracing::trace;

/// Output port: one writer per cycle, any number of deferred readers.
///
/// Lifecycle per cycle: [`clean_output`](Output::clean_output) resets the
/// cell, readers obtain handles via [`get_output`](Output::get_output) (and
/// may await them before the value exists), then
/// [`set_output`](Output::set_output) resolves the cell exactly once.
/// A freshly constructed output is already in the "cleaned" state.
#[derive(Debug)]
pub struct Output {
    info: PortInfo,
    cell: watch::Sender<Option<Value>>,
}

impl Output {
    /// Create an output with an unresolved value cell.
    pub fn new(info: PortInfo) -> Self {
        let (cell, _) = watch::channel(None);
        Self { info, cell }
    }

    /// Reset the value cell for a new production cycle.
    ///
    /// The cell is replaced with a fresh unresolved one. Handles obtained
    /// before the reset belong to the previous cycle: if such a handle is
    /// still awaiting, it observes [`PortError::Disconnected`] rather than
    /// the next cycle's value. Readers of the new cycle must acquire their
    /// handle after this call.
    pub fn clean_output(&mut self) {
        trace!(port = %self.info.name, "output cleaned");
        let (cell, _) = watch::channel(None);
        self.cell = cell;
    }

    /// Resolve the value cell with `value`.
    ///
    /// Fails with [`PortError::AlreadySet`] if the cell was already
    /// resolved since the last [`clean_output`](Output::clean_output);
    /// the first value is kept.
    pub fn set_output(&mut self, value: impl Into<Value>) -> Result<(), PortError> {
        if self.cell.borrow().is_some() {
            return Err(PortError::AlreadySet(self.info.name.clone()));
        }
        self.cell.send_replace(Some(value.into()));
        trace!(port = %self.info.name, "output set");
        Ok(())
    }

    /// Obtain a handle to the current cycle's value cell.
    ///
    /// The handle can be held across the producer's `set_output` call:
    /// awaiting it before resolution suspends the reader, awaiting it after
    /// resolution returns immediately.
    pub fn get_output(&self) -> Deferred {
        Deferred {
            cell: self.cell.subscribe(),
        }
    }

    /// Whether the current cycle's value has been set.
    pub fn is_set(&self) -> bool {
        self.cell.borrow().is_some()
    }
}

impl Port for Output {
    fn port_info(&self) -> &PortInfo {
        &self.info
    }
}

/// Read handle to an output's single-assignment value cell.
///
/// Cloneable; every clone observes the same resolution. Holding a handle
/// does not keep the producing output alive.
#[derive(Debug, Clone)]
pub struct Deferred {
    cell: watch::Receiver<Option<Value>>,
}

impl Deferred {
    /// Wait until the producer resolves the cell, then return the value.
    ///
    /// Returns immediately if the cell is already resolved. There is no
    /// timeout: a never-resolved output suspends the caller indefinitely,
    /// and callers needing bounded waits must layer their own. Fails with
    /// [`PortError::Disconnected`] if the producing output is reset or
    /// dropped while this handle is outstanding.
    pub async fn wait(&mut self) -> Result<Value, PortError> {
        loop {
            let current = self.cell.borrow_and_update().clone();
            if let Some(value) = current {
                return Ok(value);
            }
            self.cell
                .changed()
                .await
                .map_err(|_| PortError::Disconnected)?;
        }
    }

    /// Non-suspending peek: the resolved value, or `None` while pending.
    pub fn try_get(&self) -> Option<Value> {
        self.cell.borrow().clone()
    }
}
