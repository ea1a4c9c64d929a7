//! Append-only transaction log
//!
//! Ids are assigned sequentially from 0 and never reused or reassigned;
//! records are immutable once appended.

use crate::error::{Error, Result};
use crate::types::Transaction;

/// Ordered log of completed trades
#[derive(Debug, Default)]
pub struct TransactionLog {
    entries: Vec<Transaction>,
}

impl TransactionLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id to be assigned, equal to the current length
    pub fn next_id(&self) -> u64 {
        self.entries.len() as u64
    }

    /// Append a record, returning its assigned id
    ///
    /// The caller supplies the record with `id` already set to
    /// [`TransactionLog::next_id`]; settlement obtains the id first so the
    /// record it emits matches what the log stores.
    pub fn append(&mut self, tx: Transaction) -> u64 {
        debug_assert_eq!(tx.id, self.next_id());
        let id = tx.id;
        self.entries.push(tx);
        id
    }

    /// Fetch a record by id
    pub fn get(&self, id: u64) -> Result<&Transaction> {
        self.entries.get(id as usize).ok_or(Error::OutOfRange {
            id,
            len: self.len(),
        })
    }

    /// Number of records
    pub fn len(&self) -> u64 {
        self.entries.len() as u64
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records in append order
    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeId;
    use chrono::Utc;

    fn tx(id: u64) -> Transaction {
        Transaction {
            id,
            seller: NodeId::new("a"),
            buyer: NodeId::new("b"),
            energy_amount: 2,
            credit_amount: 20,
            timestamp: Utc::now(),
            completed: true,
        }
    }

    #[test]
    fn test_append_assigns_sequential_ids() {
        let mut log = TransactionLog::new();
        assert_eq!(log.next_id(), 0);

        assert_eq!(log.append(tx(0)), 0);
        assert_eq!(log.append(tx(1)), 1);
        assert_eq!(log.len(), 2);
        assert_eq!(log.next_id(), 2);
    }

    #[test]
    fn test_get_out_of_range() {
        let mut log = TransactionLog::new();
        log.append(tx(0));

        assert!(log.get(0).is_ok());
        assert_eq!(log.get(1).unwrap_err(), Error::OutOfRange { id: 1, len: 1 });
        assert_eq!(
            log.get(u64::MAX).unwrap_err(),
            Error::OutOfRange { id: u64::MAX, len: 1 }
        );
    }

    #[test]
    fn test_records_immutable_in_order() {
        let mut log = TransactionLog::new();
        log.append(tx(0));
        log.append(tx(1));

        let ids: Vec<u64> = log.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![0, 1]);
        assert!(log.iter().all(|t| t.completed));
    }
}
