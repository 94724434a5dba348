//! Input port with a late-bound link to a producing output.
//!
//! An input never owns the output it reads from. It records a
//! (node id, output name) pair and dereferences it at read time through an
//! injected [`NodeLookup`], so a read always reflects the producing node's
//! most recent value. Link existence is not validated at link time;
//! validation is deferred to the read.

use crate::error::PortError;
use crate::output::Deferred;
use crate::port::{Port, PortInfo};
use crate::registry::NodeLookup;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Named edge to a producing node's output: relation plus lookup, never
/// ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Id of the producing node
    pub node_id: String,

    /// Name of the output port on that node
    pub output: String,
}

/// Input port: consumes a value produced elsewhere via a late-bound link.
#[derive(Debug)]
pub struct Input {
    info: PortInfo,
    link: Option<Link>,
}

impl Input {
    /// Create an unlinked input.
    pub fn new(info: PortInfo) -> Self {
        Self { info, link: None }
    }

    /// Link this input to `output_name` on the node registered as `node_id`.
    ///
    /// At most one link exists at a time; a second call overwrites the
    /// previous link silently. Nothing is validated here: a dangling pair
    /// only surfaces when [`get_input`](Input::get_input) is called.
    pub fn add_link(&mut self, node_id: impl Into<String>, output_name: impl Into<String>) {
        let link = Link {
            node_id: node_id.into(),
            output: output_name.into(),
        };
        if let Some(old) = self.link.replace(link) {
            debug!(
                port = %self.info.name,
                old_node = %old.node_id,
                old_output = %old.output,
                "input link overwritten"
            );
        }
    }

    /// Clear the link. No-op if no link is set.
    pub fn remove_link(&mut self) {
        self.link = None;
    }

    /// The current link, if any.
    pub fn link(&self) -> Option<&Link> {
        self.link.as_ref()
    }

    /// Resolve the link and return the producing output's deferred handle.
    ///
    /// Resolution happens at read time: the node id is looked up in
    /// `nodes`, then the output name on the resolved node. A missing link,
    /// unknown node, or unknown output fails with
    /// [`PortError::LinkNotFound`] — a configuration error for the caller,
    /// not a transient condition.
    pub fn get_input(&self, nodes: &impl NodeLookup) -> Result<Deferred, PortError> {
        let link = self.link.as_ref().ok_or_else(|| {
            PortError::LinkNotFound(format!("input '{}' has no link", self.info.name))
        })?;

        let node = nodes.node(&link.node_id).ok_or_else(|| {
            PortError::LinkNotFound(format!(
                "input '{}' links to unknown node '{}'",
                self.info.name, link.node_id
            ))
        })?;

        let output = node.outputs().get(&link.output).ok_or_else(|| {
            PortError::LinkNotFound(format!(
                "node '{}' has no output '{}'",
                link.node_id, link.output
            ))
        })?;

        Ok(output.get_output())
    }
}

impl Port for Input {
    fn port_info(&self) -> &PortInfo {
        &self.info
    }
}
