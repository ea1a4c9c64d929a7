//! Error types for the microgrid ledger

use crate::types::NodeId;
use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
///
/// All variants are local, synchronous, and recoverable: every operation
/// either fully succeeds or fails with no partial mutation. The offending
/// identity is carried where it exists so callers can distinguish, e.g.,
/// an inactive buyer from an inactive seller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Identity already registered
    #[error("node already registered: {0}")]
    AlreadyRegistered(NodeId),

    /// Registration with an empty display name
    #[error("node name must be non-empty")]
    EmptyName,

    /// Unknown identity
    #[error("node not found: {0}")]
    NotFound(NodeId),

    /// Node is deactivated
    #[error("node is inactive: {0}")]
    Inactive(NodeId),

    /// Energy amount of zero
    #[error("amount must be positive")]
    ZeroAmount,

    /// Seller and buyer are the same node
    #[error("seller and buyer must differ")]
    SelfTrade,

    /// Seller cannot cover the trade
    #[error("insufficient balance for {node}: have {balance}, need {required}")]
    InsufficientBalance {
        /// Node whose balance fell short
        node: NodeId,
        /// Current balance
        balance: u64,
        /// Credits the operation required
        required: u64,
    },

    /// Non-owner calling an admin operation
    #[error("unauthorized caller: {0}")]
    Unauthorized(NodeId),

    /// Transaction id beyond the end of the log
    #[error("transaction id {id} out of range (log length {len})")]
    OutOfRange {
        /// Requested id
        id: u64,
        /// Current log length
        len: u64,
    },

    /// Accumulator would wrap its integer width
    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),

    /// Concurrency error (actor mailbox closed, etc.)
    #[error("concurrency error: {0}")]
    Concurrency(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}
