//! Node registry
//!
//! Owns every registered participant and its mutable accounting state.
//! Identities register at most once and are never removed, only
//! deactivated; `node_count` counts ever-registered nodes and is monotone.

use crate::error::{Error, Result};
use crate::types::{Node, NodeId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Registry of microgrid nodes
#[derive(Debug)]
pub struct NodeRegistry {
    /// Node records keyed by identity
    nodes: HashMap<NodeId, Node>,

    /// Identities in registration order
    order: Vec<NodeId>,

    /// Privileged principal allowed to toggle activation
    owner: NodeId,
}

impl NodeRegistry {
    /// Create an empty registry with a fixed owner principal
    pub fn new(owner: NodeId) -> Self {
        Self {
            nodes: HashMap::new(),
            order: Vec::new(),
            owner,
        }
    }

    /// Register a new node
    ///
    /// The node starts active with zero accumulators. Fails if the
    /// identity is already present or the name is empty.
    pub fn register(&mut self, id: NodeId, name: &str, now: DateTime<Utc>) -> Result<()> {
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        if self.nodes.contains_key(&id) {
            return Err(Error::AlreadyRegistered(id));
        }

        self.nodes
            .insert(id.clone(), Node::new(id.clone(), name.to_string(), now));
        self.order.push(id);
        Ok(())
    }

    /// Toggle a node's participation gate
    ///
    /// Owner-only. Balances and history are untouched.
    pub fn set_active(&mut self, caller: &NodeId, id: &NodeId, value: bool) -> Result<()> {
        if caller != &self.owner {
            return Err(Error::Unauthorized(caller.clone()));
        }
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(id.clone()))?;
        node.active = value;
        Ok(())
    }

    /// Read-only lookup
    pub fn get(&self, id: &NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or_else(|| Error::NotFound(id.clone()))
    }

    /// Mutable lookup, crate-internal: all external mutation goes through
    /// the credit ledger and trade settlement
    pub(crate) fn get_mut(&mut self, id: &NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(id.clone()))
    }

    /// Whether the identity is registered
    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Guard used by mint and trade: registered and active
    pub fn require_active(&self, id: &NodeId) -> Result<()> {
        if !self.get(id)?.active {
            return Err(Error::Inactive(id.clone()));
        }
        Ok(())
    }

    /// Ever-registered node count (monotone)
    pub fn node_count(&self) -> u64 {
        self.order.len() as u64
    }

    /// Count of currently active nodes
    pub fn active_node_count(&self) -> u64 {
        self.nodes.values().filter(|n| n.active).count() as u64
    }

    /// Nodes in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Owner principal fixed at construction
    pub fn owner(&self) -> &NodeId {
        &self.owner
    }
}
