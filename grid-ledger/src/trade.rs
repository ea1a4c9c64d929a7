//! Trade validation
//!
//! A trade moves through Requested → Validated → Settled, or terminates at
//! Rejected with nothing persisted. The phases are encoded in types: a
//! [`TradeRequest`] can only become a [`ValidatedTrade`] by passing every
//! precondition against the registry and credit ledger, and settlement in
//! [`crate::ledger::GridLedger`] accepts only a `ValidatedTrade`. Validation
//! performs no mutation, so a rejection leaves no trace.

use crate::credits::CreditLedger;
use crate::error::{Error, Result};
use crate::registry::NodeRegistry;
use crate::types::NodeId;

/// A trade as submitted by the caller
#[derive(Debug, Clone)]
pub struct TradeRequest {
    /// Credit seller
    pub seller: NodeId,
    /// Credit buyer
    pub buyer: NodeId,
    /// Energy units to trade
    pub energy_amount: u64,
}

/// A trade that has passed every precondition and is safe to settle
///
/// Constructed only by [`TradeRequest::validate`]; fields are crate-private
/// so callers cannot assemble one by hand.
#[derive(Debug)]
pub struct ValidatedTrade {
    pub(crate) seller: NodeId,
    pub(crate) buyer: NodeId,
    pub(crate) energy_amount: u64,
    pub(crate) credit_amount: u64,
}

impl ValidatedTrade {
    /// Credits the settlement will move
    pub fn credit_amount(&self) -> u64 {
        self.credit_amount
    }
}

impl TradeRequest {
    /// Check every trade precondition without mutating anything
    ///
    /// Order: self-trade, zero amount, buyer registered and active, seller
    /// registered and active, conversion overflow, seller balance, buyer
    /// balance headroom. The returned errors carry the offending identity
    /// so callers can tell a buyer failure from a seller failure.
    pub fn validate(
        self,
        registry: &NodeRegistry,
        credits: &CreditLedger,
    ) -> Result<ValidatedTrade> {
        if self.seller == self.buyer {
            return Err(Error::SelfTrade);
        }
        if self.energy_amount == 0 {
            return Err(Error::ZeroAmount);
        }

        registry.require_active(&self.buyer)?;
        registry.require_active(&self.seller)?;

        let credit_amount = credits.credits_for(self.energy_amount)?;

        let seller = registry.get(&self.seller)?;
        if seller.credit_balance < credit_amount {
            return Err(Error::InsufficientBalance {
                node: self.seller.clone(),
                balance: seller.credit_balance,
                required: credit_amount,
            });
        }

        // Settlement must not be able to fail: check the buyer-side
        // accumulations here too
        let buyer = registry.get(&self.buyer)?;
        buyer
            .credit_balance
            .checked_add(credit_amount)
            .ok_or(Error::Overflow("credit_balance"))?;
        buyer
            .energy_consumed
            .checked_add(self.energy_amount)
            .ok_or(Error::Overflow("energy_consumed"))?;

        Ok(ValidatedTrade {
            seller: self.seller,
            buyer: self.buyer,
            energy_amount: self.energy_amount,
            credit_amount,
        })
    }
}
