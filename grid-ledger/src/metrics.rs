//! Metrics collection for observability
//!
//! Prometheus metrics recorded by the ledger facade.
//!
//! # Metrics
//!
//! - `grid_nodes_registered_total` - Nodes ever registered
//! - `grid_credits_minted_total` - Credits minted via production
//! - `grid_trades_total` - Settled trades
//! - `grid_trades_rejected_total` - Trades rejected during validation
//! - `grid_transaction_log_length` - Current transaction log length

use prometheus::{IntCounter, IntGauge, Registry};
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Nodes ever registered
    pub nodes_registered: IntCounter,

    /// Credits minted via production
    pub credits_minted: IntCounter,

    /// Settled trades
    pub trades_settled: IntCounter,

    /// Trades rejected during validation
    pub trades_rejected: IntCounter,

    /// Transaction log length
    pub log_length: IntGauge,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let nodes_registered = IntCounter::new(
            "grid_nodes_registered_total",
            "Nodes ever registered",
        )?;
        registry.register(Box::new(nodes_registered.clone()))?;

        let credits_minted = IntCounter::new(
            "grid_credits_minted_total",
            "Credits minted via production",
        )?;
        registry.register(Box::new(credits_minted.clone()))?;

        let trades_settled = IntCounter::new("grid_trades_total", "Settled trades")?;
        registry.register(Box::new(trades_settled.clone()))?;

        let trades_rejected = IntCounter::new(
            "grid_trades_rejected_total",
            "Trades rejected during validation",
        )?;
        registry.register(Box::new(trades_rejected.clone()))?;

        let log_length = IntGauge::new(
            "grid_transaction_log_length",
            "Current transaction log length",
        )?;
        registry.register(Box::new(log_length.clone()))?;

        Ok(Self {
            nodes_registered,
            credits_minted,
            trades_settled,
            trades_rejected,
            log_length,
            registry,
        })
    }

    /// Record a registration
    pub fn record_registration(&self) {
        self.nodes_registered.inc();
    }

    /// Record minted credits
    pub fn record_mint(&self, credits: u64) {
        self.credits_minted.inc_by(credits);
    }

    /// Record a settled trade and the new log length
    pub fn record_trade(&self, log_length: u64) {
        self.trades_settled.inc();
        self.log_length.set(log_length as i64);
    }

    /// Record a rejected trade
    pub fn record_trade_rejected(&self) {
        self.trades_rejected.inc();
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics").finish_non_exhaustive()
    }
}
