//! Microgrid Ledger Service
//!
//! Async service layer over [`grid_ledger`]: a single Tokio actor owns the
//! ledger and serializes every state-changing operation, and a cloneable
//! handle exposes the API surface. Ledger events are forwarded to an
//! external sink channel in call order.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod actor;

// Re-exports
pub use actor::{spawn_grid, spawn_grid_with_ledger, GridActor, GridHandle, GridMessage};
pub use grid_ledger::{Config, Error, GridStats, LedgerEvent, Node, NodeId, Result, Transaction};
