//! Microgrid Credit Ledger Core
//!
//! Single-ledger accounting engine for a decentralized microgrid: node
//! registration, production-to-credit minting, and atomic peer-to-peer
//! credit trades recorded in an append-only transaction log.
//!
//! # Architecture
//!
//! - **Single Writer**: All mutation funnels through [`GridLedger`], one
//!   exclusive section per state-changing call
//! - **Validate Then Settle**: Every precondition is checked before any
//!   state is written; a failed call changes nothing
//! - **Append-Only**: Transaction records are immutable and their ids are
//!   never reused
//!
//! # Invariants
//!
//! - Conservation: `total_credits` == Σ minted credits == Σ node balances;
//!   trades redistribute, minting is the only inflow
//! - Monotone accumulators: energy and count fields only grow, with checked
//!   arithmetic (overflow is an error, never a wrap)
//! - Registration is permanent: nodes deactivate, never disappear

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod clock;
pub mod config;
pub mod credits;
pub mod error;
pub mod events;
pub mod ledger;
pub mod log;
pub mod metrics;
pub mod registry;
pub mod trade;
pub mod types;

// Re-exports
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use credits::{CreditLedger, DEFAULT_CREDITS_PER_UNIT};
pub use error::{Error, Result};
pub use ledger::GridLedger;
pub use log::TransactionLog;
pub use metrics::Metrics;
pub use registry::NodeRegistry;
pub use trade::{TradeRequest, ValidatedTrade};
pub use types::{GridStats, LedgerEvent, Node, NodeId, Transaction};
