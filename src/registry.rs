//! Node collaborator contract and registry.
//!
//! The data model never owns nodes. Inputs record a (node id, output name)
//! pair and resolve it at read time through a [`NodeLookup`]; any node that
//! wants to be linkable exposes its outputs through [`OutputSource`].
//! [`NodeRegistry`] is the HashMap-backed default lookup for hosts that
//! have no registry of their own.

use crate::error::PortError;
use crate::output::Output;
use std::collections::HashMap;
use tracing::debug;

/// Contract for any node an input can link to: a mapping from output-port
/// name to [`Output`] instance.
pub trait OutputSource {
    /// The node's outputs, keyed by port name.
    fn outputs(&self) -> &HashMap<String, Output>;
}

/// Resolution interface injected into [`Input::get_input`](crate::Input::get_input).
///
/// Implemented by [`NodeRegistry`]; hosts with their own node storage
/// implement it directly.
pub trait NodeLookup {
    /// Resolve a node id to its output source, if registered.
    fn node(&self, node_id: &str) -> Option<&dyn OutputSource>;
}

/// Registry of linkable nodes, keyed by node id.
///
/// Owns the nodes it holds: producers mutate their outputs through
/// [`get_mut`](NodeRegistry::get_mut), readers resolve links through the
/// [`NodeLookup`] impl.
#[derive(Debug, Default)]
pub struct NodeRegistry<N> {
    nodes: HashMap<String, N>,
}

impl<N: OutputSource> NodeRegistry<N> {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    /// Register a node under `node_id`.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if registered successfully
    /// * `Err(PortError::DuplicateNode)` if the id is already taken
    pub fn register(&mut self, node_id: impl Into<String>, node: N) -> Result<(), PortError> {
        let node_id = node_id.into();
        if self.nodes.contains_key(&node_id) {
            return Err(PortError::DuplicateNode(node_id));
        }
        debug!(node = %node_id, "node registered");
        self.nodes.insert(node_id, node);
        Ok(())
    }

    /// Get a node by id
    pub fn get(&self, node_id: &str) -> Option<&N> {
        self.nodes.get(node_id)
    }

    /// Get mutable access to a node, for producers driving its outputs
    pub fn get_mut(&mut self, node_id: &str) -> Option<&mut N> {
        self.nodes.get_mut(node_id)
    }

    /// Remove a node, returning it if it was registered
    pub fn remove(&mut self, node_id: &str) -> Option<N> {
        self.nodes.remove(node_id)
    }

    /// Check if a node id is registered
    pub fn contains(&self, node_id: &str) -> bool {
        self.nodes.contains_key(node_id)
    }

    /// Count of registered nodes
    pub fn count(&self) -> usize {
        self.nodes.len()
    }
}

impl<N: OutputSource> NodeLookup for NodeRegistry<N> {
    fn node(&self, node_id: &str) -> Option<&dyn OutputSource> {
        self.nodes.get(node_id).map(|n| n as &dyn OutputSource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortInfo;

    struct TestNode {
        outputs: HashMap<String, Output>,
    }

    impl TestNode {
        fn new(output_name: &str) -> Self {
            let mut outputs = HashMap::new();
            outputs.insert(output_name.to_string(), Output::new(PortInfo::new(output_name)));
            Self { outputs }
        }
    }

    impl OutputSource for TestNode {
        fn outputs(&self) -> &HashMap<String, Output> {
            &self.outputs
        }
    }

    #[test]
    fn test_register_node() {
        let mut registry = NodeRegistry::new();
        assert!(registry.register("pump", TestNode::new("flow")).is_ok());
        assert_eq!(registry.count(), 1);
        assert!(registry.contains("pump"));
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry = NodeRegistry::new();
        registry.register("pump", TestNode::new("flow")).unwrap();

        let result = registry.register("pump", TestNode::new("flow"));
        assert!(matches!(result, Err(PortError::DuplicateNode(id)) if id == "pump"));
    }

    #[test]
    fn test_lookup_resolves_outputs() {
        let mut registry = NodeRegistry::new();
        registry.register("pump", TestNode::new("flow")).unwrap();

        let node = registry.node("pump").unwrap();
        assert!(node.outputs().contains_key("flow"));
        assert!(registry.node("valve").is_none());
    }

    #[test]
    fn test_remove() {
        let mut registry = NodeRegistry::new();
        registry.register("pump", TestNode::new("flow")).unwrap();

        assert!(registry.remove("pump").is_some());
        assert!(!registry.contains("pump"));
        assert!(registry.remove("pump").is_none());
    }
}
