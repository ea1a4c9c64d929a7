//! Property-based tests for ledger invariants
//!
//! These tests verify properties that must hold for all operation
//! sequences, not just specific test cases.

use grid_ledger::{Config, Error, GridLedger, LedgerEvent, ManualClock, NodeId};
use proptest::prelude::*;

/// An arbitrary state-changing operation against a small node population
#[derive(Debug, Clone)]
enum Op {
    Register(u8),
    Produce(u8, u64),
    Trade(u8, u8, u64),
    SetActive(u8, bool),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..6).prop_map(Op::Register),
        (0u8..6, 1u64..1000).prop_map(|(n, e)| Op::Produce(n, e)),
        (0u8..6, 0u8..6, 0u64..100).prop_map(|(s, b, e)| Op::Trade(s, b, e)),
        (0u8..6, any::<bool>()).prop_map(|(n, v)| Op::SetActive(n, v)),
    ]
}

fn node(n: u8) -> NodeId {
    NodeId::new(format!("node-{}", n))
}

fn fresh_ledger() -> GridLedger {
    GridLedger::with_clock(
        Config::default(),
        Box::new(ManualClock::starting_at(1_700_000_000)),
    )
}

fn apply(ledger: &mut GridLedger, owner: &NodeId, op: &Op) -> Result<(), Error> {
    match op {
        Op::Register(n) => ledger.register_node(node(*n), &format!("Node {}", n)),
        Op::Produce(n, e) => ledger.record_production(&node(*n), *e).map(|_| ()),
        Op::Trade(s, b, e) => ledger.trade(node(*s), node(*b), *e).map(|_| ()),
        Op::SetActive(n, v) => ledger.set_node_active(owner, &node(*n), *v),
    }
}

proptest! {
    /// Conservation: total_credits equals the sum of minted credits and the
    /// sum of all node balances after any operation sequence
    #[test]
    fn conservation_holds_for_all_sequences(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let owner = Config::default().owner;
        let mut ledger = fresh_ledger();
        let mut minted: u64 = 0;

        for op in &ops {
            let result = apply(&mut ledger, &owner, op);
            if let (Op::Produce(_, e), Ok(())) = (op, &result) {
                minted += e * 10;
            }
        }

        prop_assert_eq!(ledger.total_credits(), minted);
        let balance_sum: u64 = ledger.nodes().map(|n| n.credit_balance).sum();
        prop_assert_eq!(balance_sum, minted);
    }

    /// Atomicity: a failed trade leaves node state and the log untouched
    #[test]
    fn failed_trade_changes_nothing(
        ops in prop::collection::vec(op_strategy(), 0..40),
        seller in 0u8..6,
        buyer in 0u8..6,
        energy in 0u64..10_000,
    ) {
        let owner = Config::default().owner;
        let mut ledger = fresh_ledger();
        for op in &ops {
            let _ = apply(&mut ledger, &owner, op);
        }
        ledger.drain_events();

        let before: Vec<_> = ledger.nodes().cloned().collect();
        let log_len = ledger.transaction_count();
        let total = ledger.total_credits();

        if ledger.trade(node(seller), node(buyer), energy).is_err() {
            let after: Vec<_> = ledger.nodes().cloned().collect();
            prop_assert_eq!(before, after);
            prop_assert_eq!(ledger.transaction_count(), log_len);
            prop_assert_eq!(ledger.total_credits(), total);
            prop_assert!(ledger.drain_events().is_empty());
        }
    }

    /// Self-trade always fails for any registered node and positive amount
    #[test]
    fn self_trade_always_rejected(n in 0u8..6, energy in 1u64..10_000) {
        let mut ledger = fresh_ledger();
        ledger.register_node(node(n), "Self").unwrap();
        ledger.record_production(&node(n), 1_000).unwrap();

        prop_assert_eq!(
            ledger.trade(node(n), node(n), energy).unwrap_err(),
            Error::SelfTrade
        );
    }

    /// Monotonic log: length never decreases and each settled trade is
    /// assigned the pre-append length as its id
    #[test]
    fn log_ids_are_sequential(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let owner = Config::default().owner;
        let mut ledger = fresh_ledger();
        let mut prev_len = 0u64;

        for op in &ops {
            let len_before = ledger.transaction_count();
            if let Op::Trade(s, b, e) = op {
                if let Ok(id) = ledger.trade(node(*s), node(*b), *e) {
                    prop_assert_eq!(id, len_before);
                }
            } else {
                let _ = apply(&mut ledger, &owner, op);
            }
            prop_assert!(ledger.transaction_count() >= prev_len);
            prev_len = ledger.transaction_count();
        }

        // Every log entry is retrievable and ids match positions
        for id in 0..ledger.transaction_count() {
            prop_assert_eq!(ledger.transaction(id).unwrap().id, id);
        }
        prop_assert!(
            matches!(
                ledger.transaction(ledger.transaction_count()),
                Err(Error::OutOfRange { .. })
            ),
            "expected Err(Error::OutOfRange) past end of log"
        );
    }

    /// Registering twice fails and leaves the first registration intact
    #[test]
    fn re_registration_is_rejected(n in 0u8..6, name in "[a-z]{1,12}") {
        let mut ledger = fresh_ledger();
        ledger.register_node(node(n), &name).unwrap();
        let snapshot = ledger.node(&node(n)).unwrap().clone();
        let count = ledger.stats().node_count;

        let err = ledger.register_node(node(n), "other").unwrap_err();
        prop_assert_eq!(err, Error::AlreadyRegistered(node(n)));
        prop_assert_eq!(ledger.node(&node(n)).unwrap(), &snapshot);
        prop_assert_eq!(ledger.stats().node_count, count);
    }

    /// Events mirror successful mutations one-to-one, in call order
    #[test]
    fn events_match_successful_ops(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let owner = Config::default().owner;
        let mut ledger = fresh_ledger();
        let mut expected = 0usize;

        for op in &ops {
            if apply(&mut ledger, &owner, op).is_ok() {
                expected += match op {
                    Op::Register(_) | Op::Produce(_, _) => 1,
                    Op::Trade(_, _, _) => 2, // EnergyTraded + CreditTransfer
                    Op::SetActive(_, _) => 0,
                };
            }
        }

        let events = ledger.drain_events();
        prop_assert_eq!(events.len(), expected);
        // A trade's pair arrives adjacent and in order
        for pair in events.windows(2) {
            if let LedgerEvent::EnergyTraded { seller, buyer, credit_amount, .. } = &pair[0] {
                if let LedgerEvent::CreditTransfer { from, to, amount } = &pair[1] {
                    prop_assert_eq!(from, seller);
                    prop_assert_eq!(to, buyer);
                    prop_assert_eq!(amount, credit_amount);
                }
            }
        }
    }
}
