//! Core types for the microgrid ledger
//!
//! All types are designed for:
//! - Deterministic serialization (serde)
//! - Memory safety (no unsafe code)
//! - Exact arithmetic (checked u64 for energy and credits)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Node identifier (wallet address, account principal, etc.)
///
/// Opaque to the ledger: the execution environment authenticates the caller
/// and hands us an equality-comparable token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(String);

impl NodeId {
    /// Create new node ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Registered microgrid participant
///
/// `energy_generated` and `energy_consumed` are monotone accumulators;
/// `credit_balance` is mutated only through [`crate::credits::CreditLedger`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identity, immutable after registration
    pub id: NodeId,

    /// Display name, non-empty, immutable after registration
    pub name: String,

    /// Total energy units this node has claimed to produce
    pub energy_generated: u64,

    /// Total energy units this node has consumed via trades
    pub energy_consumed: u64,

    /// Current spendable credit balance
    pub credit_balance: u64,

    /// Participation gate: inactive nodes can neither mint nor trade
    pub active: bool,

    /// Registration timestamp, immutable
    pub registered_at: DateTime<Utc>,
}

impl Node {
    /// Create a freshly registered node with zero accumulators
    pub fn new(id: NodeId, name: String, registered_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            energy_generated: 0,
            energy_consumed: 0,
            credit_balance: 0,
            active: true,
            registered_at,
        }
    }
}

/// Completed peer-to-peer trade record
///
/// Transactions are created only on success; there is no pending state.
/// Once appended to the [`crate::log::TransactionLog`] the record is
/// immutable and its id is never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Sequential id assigned by the log, starting at 0
    pub id: u64,

    /// Credit seller (credits flow out of this node)
    pub seller: NodeId,

    /// Credit buyer (energy consumption is recorded against this node)
    pub buyer: NodeId,

    /// Energy units traded, always positive
    pub energy_amount: u64,

    /// Credits moved, `energy_amount * rate` at trade time
    pub credit_amount: u64,

    /// Settlement timestamp
    pub timestamp: DateTime<Utc>,

    /// Always true: records exist only for settled trades
    pub completed: bool,
}

/// Aggregate ledger statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridStats {
    /// Count of ever-registered nodes (monotone)
    pub node_count: u64,

    /// Sum of all credits minted via production (monotone)
    pub total_credits: u64,

    /// Length of the transaction log
    pub transaction_count: u64,
}

/// Outbound event emitted after a state transition
///
/// Events are appended to the outbound queue in call order and consumed by
/// an external sink; they carry no acknowledgment and never block mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A new node joined the grid
    NodeRegistered {
        /// Registered identity
        node: NodeId,
        /// Display name
        name: String,
    },

    /// A node reported production and was credited
    EnergyProduced {
        /// Producing node
        node: NodeId,
        /// Energy units claimed
        amount: u64,
        /// Credits minted for the claim
        credits_earned: u64,
    },

    /// A trade settled
    EnergyTraded {
        /// Credit seller
        seller: NodeId,
        /// Credit buyer
        buyer: NodeId,
        /// Energy units traded
        energy_amount: u64,
        /// Credits moved
        credit_amount: u64,
    },

    /// Credits moved between two balances
    CreditTransfer {
        /// Debited node
        from: NodeId,
        /// Credited node
        to: NodeId,
        /// Credits moved
        amount: u64,
    },
}
