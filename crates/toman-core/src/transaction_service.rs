//! Business logic helpers for managing transactions.

use chrono::{DateTime, Utc};
use toman_domain::{Ledger, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::{
    validator::{TransactionDraft, TransactionValidator},
    CoreError,
};

/// Append-only transaction log helpers with id-based edits.
pub struct TransactionService;

impl TransactionService {
    /// Appends an already-built transaction without validation.
    pub fn add(ledger: &mut Ledger, transaction: Transaction) -> Uuid {
        debug!(id = %transaction.id, kind = %transaction.kind, "appending transaction");
        ledger.add_transaction(transaction)
    }

    /// Validates `draft` against the ledger's categories and appends the result.
    pub fn submit(
        ledger: &mut Ledger,
        draft: &TransactionDraft,
        date: DateTime<Utc>,
    ) -> Result<Uuid, CoreError> {
        let transaction = TransactionValidator::validate(draft, &ledger.categories, date)?;
        Ok(Self::add(ledger, transaction))
    }

    /// Updates the transaction identified by `id` via the provided mutator.
    pub fn update<F>(ledger: &mut Ledger, id: Uuid, mutator: F) -> Result<(), CoreError>
    where
        F: FnOnce(&mut Transaction),
    {
        let txn = ledger
            .transaction_mut(id)
            .ok_or(CoreError::TransactionNotFound(id))?;
        mutator(txn);
        Ok(())
    }

    /// Removes the transaction identified by `id`, returning the removed instance.
    pub fn remove(ledger: &mut Ledger, id: Uuid) -> Result<Transaction, CoreError> {
        ledger
            .remove_transaction(id)
            .ok_or(CoreError::TransactionNotFound(id))
    }

    pub fn list(ledger: &Ledger) -> Vec<&Transaction> {
        ledger.transactions.iter().collect()
    }
}
