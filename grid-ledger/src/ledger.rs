//! Main ledger orchestration layer
//!
//! This module ties together the node registry, credit ledger, transaction
//! log, and event queue into a high-level API for microgrid accounting.
//!
//! Every state-changing operation takes `&mut self`: one exclusive section
//! per call, validated fully before anything is written, so each call is a
//! single atomic step with no partially-applied state visible anywhere.
//!
//! # Example
//!
//! ```
//! use grid_ledger::{Config, GridLedger, NodeId};
//!
//! fn main() -> grid_ledger::Result<()> {
//!     let mut ledger = GridLedger::new(Config::default());
//!
//!     ledger.register_node(NodeId::new("alice"), "Alice")?;
//!     let earned = ledger.record_production(&NodeId::new("alice"), 5)?;
//!     assert_eq!(earned, 50);
//!
//!     Ok(())
//! }
//! ```

use crate::{
    clock::{Clock, SystemClock},
    credits::CreditLedger,
    events::EventQueue,
    log::TransactionLog,
    metrics::Metrics,
    registry::NodeRegistry,
    trade::{TradeRequest, ValidatedTrade},
    types::{GridStats, LedgerEvent, Node, NodeId, Transaction},
    Config, Result,
};

/// Single-ledger accounting engine for the microgrid
#[derive(Debug)]
pub struct GridLedger {
    /// Registered nodes and their accounting state
    registry: NodeRegistry,

    /// Conversion rate and conservation-preserving balance mutation
    credits: CreditLedger,

    /// Append-only record of settled trades
    log: TransactionLog,

    /// Outbound events awaiting the sink
    events: EventQueue,

    /// Injected time source
    clock: Box<dyn Clock>,

    /// Prometheus counters
    metrics: Metrics,

    /// Configuration
    config: Config,
}

impl GridLedger {
    /// Create a ledger from configuration with the system clock
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, Box::new(SystemClock))
    }

    /// Create a ledger with an injected clock (tests, replay)
    pub fn with_clock(config: Config, clock: Box<dyn Clock>) -> Self {
        Self {
            registry: NodeRegistry::new(config.owner.clone()),
            credits: CreditLedger::new(config.credits_per_unit),
            log: TransactionLog::new(),
            events: EventQueue::new(),
            clock,
            metrics: Metrics::default(),
            config,
        }
    }

    /// Register a new participant
    pub fn register_node(&mut self, id: NodeId, name: &str) -> Result<()> {
        let now = self.clock.now();
        self.registry.register(id.clone(), name, now)?;

        self.metrics.record_registration();
        tracing::info!(node = %id, name, "node registered");
        self.emit(LedgerEvent::NodeRegistered {
            node: id,
            name: name.to_string(),
        });
        Ok(())
    }

    /// Record a claimed production event, minting credits
    ///
    /// The claim is trust-based: the caller's execution environment is
    /// responsible for authenticating the reporting node. Returns the
    /// credits earned.
    pub fn record_production(&mut self, id: &NodeId, energy_amount: u64) -> Result<u64> {
        let credits_earned = self.credits.mint(&mut self.registry, id, energy_amount)?;

        self.metrics.record_mint(credits_earned);
        tracing::info!(node = %id, energy_amount, credits_earned, "production recorded");
        self.emit(LedgerEvent::EnergyProduced {
            node: id.clone(),
            amount: energy_amount,
            credits_earned,
        });
        Ok(credits_earned)
    }

    /// Execute an atomic two-party trade
    ///
    /// Validates every precondition, then settles: credits move from seller
    /// to buyer, the buyer's consumption accumulator grows, and an immutable
    /// transaction record is appended. Returns the new transaction id. A
    /// failed trade changes nothing.
    pub fn trade(&mut self, seller: NodeId, buyer: NodeId, energy_amount: u64) -> Result<u64> {
        let request = TradeRequest {
            seller,
            buyer,
            energy_amount,
        };
        let validated = request
            .validate(&self.registry, &self.credits)
            .inspect_err(|err| {
                self.metrics.record_trade_rejected();
                tracing::warn!(%err, "trade rejected");
            })?;

        Ok(self.settle(validated))
    }

    /// Apply a validated trade
    ///
    /// Every step here is infallible: validation already proved the seller
    /// balance, the buyer-side headroom, and the conversion product.
    fn settle(&mut self, trade: ValidatedTrade) -> u64 {
        let ValidatedTrade {
            seller,
            buyer,
            energy_amount,
            credit_amount,
        } = trade;

        self.credits
            .transfer(&mut self.registry, &seller, &buyer, credit_amount)
            .expect("transfer was validated");
        self.registry
            .get_mut(&buyer)
            .expect("buyer was validated")
            .energy_consumed += energy_amount;

        let id = self.log.next_id();
        self.log.append(Transaction {
            id,
            seller: seller.clone(),
            buyer: buyer.clone(),
            energy_amount,
            credit_amount,
            timestamp: self.clock.now(),
            completed: true,
        });

        self.metrics.record_trade(self.log.len());
        tracing::info!(
            transaction = id,
            seller = %seller,
            buyer = %buyer,
            energy_amount,
            credit_amount,
            "trade settled"
        );
        self.emit(LedgerEvent::EnergyTraded {
            seller: seller.clone(),
            buyer: buyer.clone(),
            energy_amount,
            credit_amount,
        });
        self.emit(LedgerEvent::CreditTransfer {
            from: seller,
            to: buyer,
            amount: credit_amount,
        });
        id
    }

    /// Toggle a node's participation gate (owner-only)
    pub fn set_node_active(&mut self, caller: &NodeId, id: &NodeId, value: bool) -> Result<()> {
        self.registry.set_active(caller, id, value)?;
        tracing::info!(node = %id, active = value, "node activation changed");
        Ok(())
    }

    /// Read a node's current state
    pub fn node(&self, id: &NodeId) -> Result<&Node> {
        self.registry.get(id)
    }

    /// Read a settled transaction by id
    pub fn transaction(&self, id: u64) -> Result<&Transaction> {
        self.log.get(id)
    }

    /// Count of currently active nodes
    pub fn active_node_count(&self) -> u64 {
        self.registry.active_node_count()
    }

    /// Aggregate statistics snapshot
    pub fn stats(&self) -> GridStats {
        GridStats {
            node_count: self.registry.node_count(),
            total_credits: self.credits.total_credits(),
            transaction_count: self.log.len(),
        }
    }

    /// Length of the transaction log
    pub fn transaction_count(&self) -> u64 {
        self.log.len()
    }

    /// Sum of all credits minted so far
    pub fn total_credits(&self) -> u64 {
        self.credits.total_credits()
    }

    /// Nodes in registration order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.registry.iter()
    }

    /// Take all outbound events, oldest first
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        self.events.drain()
    }

    /// Metrics registry for scraping
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn emit(&mut self, event: LedgerEvent) {
        self.events.emit(event);
        if self.events.len() > self.config.event_queue_warn_depth {
            tracing::warn!(depth = self.events.len(), "event queue backlog");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn owner() -> NodeId {
        Config::default().owner
    }

    fn ledger() -> GridLedger {
        GridLedger::with_clock(
            Config::default(),
            Box::new(ManualClock::starting_at(1_700_000_000)),
        )
    }

    fn ledger_with_nodes() -> GridLedger {
        let mut ledger = ledger();
        ledger.register_node(NodeId::new("a"), "Alice").unwrap();
        ledger.register_node(NodeId::new("b"), "Bob").unwrap();
        ledger.drain_events();
        ledger
    }

    #[test]
    fn test_scenario_a_production_mints_credits() {
        let mut ledger = ledger();
        ledger.register_node(NodeId::new("a"), "Alice").unwrap();

        let earned = ledger.record_production(&NodeId::new("a"), 5).unwrap();
        assert_eq!(earned, 50);
        assert_eq!(ledger.node(&NodeId::new("a")).unwrap().credit_balance, 50);
        assert_eq!(ledger.total_credits(), 50);
    }

    #[test]
    fn test_scenario_b_trade_settles() {
        let mut ledger = ledger_with_nodes();
        ledger.record_production(&NodeId::new("a"), 5).unwrap();

        let id = ledger
            .trade(NodeId::new("a"), NodeId::new("b"), 2)
            .unwrap();
        assert_eq!(id, 0);

        let a = ledger.node(&NodeId::new("a")).unwrap();
        let b = ledger.node(&NodeId::new("b")).unwrap();
        assert_eq!(a.credit_balance, 30);
        assert_eq!(b.credit_balance, 20);
        assert_eq!(b.energy_consumed, 2);

        let tx = ledger.transaction(0).unwrap();
        assert_eq!(tx.credit_amount, 20);
        assert!(tx.completed);
    }

    #[test]
    fn test_scenario_c_insufficient_balance_atomic() {
        let mut ledger = ledger_with_nodes();
        ledger.record_production(&NodeId::new("a"), 1).unwrap(); // 10 credits

        let before_a = ledger.node(&NodeId::new("a")).unwrap().clone();
        let before_b = ledger.node(&NodeId::new("b")).unwrap().clone();

        let err = ledger
            .trade(NodeId::new("a"), NodeId::new("b"), 2)
            .unwrap_err();
        assert!(matches!(err, crate::Error::InsufficientBalance { .. }));

        assert_eq!(ledger.node(&NodeId::new("a")).unwrap(), &before_a);
        assert_eq!(ledger.node(&NodeId::new("b")).unwrap(), &before_b);
        assert_eq!(ledger.transaction_count(), 0);
    }

    #[test]
    fn test_scenario_d_reactivation_allows_trade() {
        let mut ledger = ledger_with_nodes();
        ledger.record_production(&NodeId::new("a"), 5).unwrap();

        ledger
            .set_node_active(&owner(), &NodeId::new("b"), false)
            .unwrap();
        let err = ledger
            .trade(NodeId::new("a"), NodeId::new("b"), 2)
            .unwrap_err();
        assert_eq!(err, crate::Error::Inactive(NodeId::new("b")));
        assert_eq!(ledger.transaction_count(), 0);

        ledger
            .set_node_active(&owner(), &NodeId::new("b"), true)
            .unwrap();
        let id = ledger
            .trade(NodeId::new("a"), NodeId::new("b"), 2)
            .unwrap();
        assert_eq!(id, 0);
    }

    #[test]
    fn test_self_trade_always_fails() {
        let mut ledger = ledger_with_nodes();
        ledger.record_production(&NodeId::new("a"), 5).unwrap();

        let err = ledger
            .trade(NodeId::new("a"), NodeId::new("a"), 2)
            .unwrap_err();
        assert_eq!(err, crate::Error::SelfTrade);
    }

    #[test]
    fn test_events_ordered_like_calls() {
        let mut ledger = ledger();
        ledger.register_node(NodeId::new("a"), "Alice").unwrap();
        ledger.register_node(NodeId::new("b"), "Bob").unwrap();
        ledger.record_production(&NodeId::new("a"), 5).unwrap();
        ledger.trade(NodeId::new("a"), NodeId::new("b"), 2).unwrap();

        let events = ledger.drain_events();
        assert_eq!(events.len(), 5);
        assert!(matches!(events[0], LedgerEvent::NodeRegistered { .. }));
        assert!(matches!(events[1], LedgerEvent::NodeRegistered { .. }));
        assert!(matches!(events[2], LedgerEvent::EnergyProduced { .. }));
        assert!(matches!(events[3], LedgerEvent::EnergyTraded { .. }));
        assert!(matches!(
            events[4],
            LedgerEvent::CreditTransfer { amount: 20, .. }
        ));
    }

    #[test]
    fn test_rejected_trade_emits_nothing() {
        let mut ledger = ledger_with_nodes();
        let _ = ledger.trade(NodeId::new("a"), NodeId::new("b"), 2);
        assert!(ledger.drain_events().is_empty());
    }

    #[test]
    fn test_stats_snapshot() {
        let mut ledger = ledger_with_nodes();
        ledger.record_production(&NodeId::new("a"), 5).unwrap();
        ledger.trade(NodeId::new("a"), NodeId::new("b"), 2).unwrap();

        let stats = ledger.stats();
        assert_eq!(
            stats,
            GridStats {
                node_count: 2,
                total_credits: 50,
                transaction_count: 1,
            }
        );
        assert_eq!(ledger.active_node_count(), 2);
    }

    #[test]
    fn test_trade_ids_sequential() {
        let mut ledger = ledger_with_nodes();
        ledger.record_production(&NodeId::new("a"), 10).unwrap();

        for expected in 0..3 {
            let id = ledger
                .trade(NodeId::new("a"), NodeId::new("b"), 1)
                .unwrap();
            assert_eq!(id, expected);
        }
        assert_eq!(ledger.transaction_count(), 3);
    }

    #[test]
    fn test_timestamps_come_from_clock() {
        let mut ledger = GridLedger::with_clock(
            Config::default(),
            Box::new(ManualClock::starting_at(1_700_000_000)),
        );
        ledger.register_node(NodeId::new("a"), "Alice").unwrap();
        assert_eq!(
            ledger
                .node(&NodeId::new("a"))
                .unwrap()
                .registered_at
                .timestamp(),
            1_700_000_000
        );
    }
}
