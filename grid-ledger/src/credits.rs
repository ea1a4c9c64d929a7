//! Credit ledger
//!
//! Single source of truth for the energy-to-credit conversion rate and for
//! conservation-preserving balance mutation.
//!
//! # Invariant
//!
//! `total_credits` grows only through [`CreditLedger::mint`]; transfers
//! redistribute balances and never touch it. At every point
//! `total_credits == Σ node.credit_balance`.

use crate::error::{Error, Result};
use crate::registry::NodeRegistry;
use crate::types::NodeId;

/// Default policy: 10 credits per energy unit
pub const DEFAULT_CREDITS_PER_UNIT: u64 = 10;

/// Mint and transfer credits under the conservation invariant
#[derive(Debug)]
pub struct CreditLedger {
    /// Conversion rate, injected at construction
    credits_per_unit: u64,

    /// Sum of all credits ever minted (monotone)
    total_credits: u64,
}

impl CreditLedger {
    /// Create a ledger with an explicit conversion rate
    pub fn new(credits_per_unit: u64) -> Self {
        Self {
            credits_per_unit,
            total_credits: 0,
        }
    }

    /// Conversion rate in credits per energy unit
    pub fn credits_per_unit(&self) -> u64 {
        self.credits_per_unit
    }

    /// Sum of all minted credits
    pub fn total_credits(&self) -> u64 {
        self.total_credits
    }

    /// Credits corresponding to an energy amount
    pub fn credits_for(&self, energy_amount: u64) -> Result<u64> {
        energy_amount
            .checked_mul(self.credits_per_unit)
            .ok_or(Error::Overflow("credit conversion"))
    }

    /// Mint credits against a claimed production event
    ///
    /// The only path by which credits enter the system. The claim is
    /// trust-based: no verification of actual production is performed.
    /// Returns the credits earned.
    pub fn mint(
        &mut self,
        registry: &mut NodeRegistry,
        node_id: &NodeId,
        energy_amount: u64,
    ) -> Result<u64> {
        if energy_amount == 0 {
            return Err(Error::ZeroAmount);
        }
        registry.require_active(node_id)?;

        let credits = self.credits_for(energy_amount)?;

        // Validate every accumulation before writing any of them
        let node = registry.get(node_id)?;
        let new_generated = node
            .energy_generated
            .checked_add(energy_amount)
            .ok_or(Error::Overflow("energy_generated"))?;
        let new_balance = node
            .credit_balance
            .checked_add(credits)
            .ok_or(Error::Overflow("credit_balance"))?;
        let new_total = self
            .total_credits
            .checked_add(credits)
            .ok_or(Error::Overflow("total_credits"))?;

        let node = registry.get_mut(node_id)?;
        node.energy_generated = new_generated;
        node.credit_balance = new_balance;
        self.total_credits = new_total;

        Ok(credits)
    }

    /// Move credits between two registered nodes
    ///
    /// Both sides are validated before either balance is written, so the
    /// operation is all-or-nothing. `total_credits` is untouched.
    pub fn transfer(
        &mut self,
        registry: &mut NodeRegistry,
        from: &NodeId,
        to: &NodeId,
        amount: u64,
    ) -> Result<()> {
        let from_balance = registry.get(from)?.credit_balance;
        let to_balance = registry.get(to)?.credit_balance;

        let new_from = from_balance
            .checked_sub(amount)
            .ok_or_else(|| Error::InsufficientBalance {
                node: from.clone(),
                balance: from_balance,
                required: amount,
            })?;
        let new_to = to_balance
            .checked_add(amount)
            .ok_or(Error::Overflow("credit_balance"))?;

        registry.get_mut(from)?.credit_balance = new_from;
        registry.get_mut(to)?.credit_balance = new_to;
        Ok(())
    }
}

impl Default for CreditLedger {
    fn default() -> Self {
        Self::new(DEFAULT_CREDITS_PER_UNIT)
    }
}
