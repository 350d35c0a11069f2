//! Authoritative in-memory ledger backed by a [`KeyValueStore`].
//!
//! Each collection lives under its own key and loads independently: a missing
//! key yields the default, an unreadable or corrupt one yields the default plus
//! a [`StoreWarning`]. Every mutation rewrites only the key it touched. Write
//! failures never undo the in-memory change; they are logged and queued as
//! warnings for the caller to surface.

use serde::{de::DeserializeOwned, Serialize};
use toman_domain::{
    Amount, Category, CategoryKind, FrequentTransaction, Ledger, Theme, Transaction,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    aggregate::SummaryService,
    category_service::CategoryService,
    frequent_service::{FrequentService, RescaleOutcome},
    storage::{
        ledger_warnings, KeyValueStore, CATEGORIES_KEY, FREQUENT_TRANSACTIONS_KEY,
        INITIAL_BALANCE_KEY, THEME_KEY, TRANSACTIONS_KEY,
    },
    time::Clock,
    transaction_service::TransactionService,
    validator::TransactionDraft,
    CoreError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreWarningKind {
    ReadFailed,
    Corrupt,
    WriteFailed,
}

/// Non-fatal persistence problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreWarning {
    pub key: String,
    pub kind: StoreWarningKind,
    pub message: String,
}

pub struct LedgerStore<B: KeyValueStore> {
    backend: B,
    ledger: Ledger,
    warnings: Vec<StoreWarning>,
}

impl<B: KeyValueStore> LedgerStore<B> {
    /// Loads every key from `backend`. Never fails.
    pub fn open(backend: B) -> Self {
        let mut warnings = Vec::new();
        let ledger = Ledger {
            categories: load_key(&backend, CATEGORIES_KEY, &mut warnings),
            transactions: load_key(&backend, TRANSACTIONS_KEY, &mut warnings),
            frequent_transactions: load_key(&backend, FREQUENT_TRANSACTIONS_KEY, &mut warnings),
            initial_balance: load_key(&backend, INITIAL_BALANCE_KEY, &mut warnings),
            theme: load_theme(&backend, &mut warnings),
        };
        for problem in ledger_warnings(&ledger) {
            debug!(%problem, "ledger inconsistency");
        }
        info!(
            categories = ledger.categories.len(),
            transactions = ledger.transactions.len(),
            frequent = ledger.frequent_transactions.len(),
            warnings = warnings.len(),
            "ledger opened"
        );
        Self {
            backend,
            ledger,
            warnings,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn categories(&self) -> &[Category] {
        &self.ledger.categories
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.ledger.transactions
    }

    pub fn frequent_transactions(&self) -> &[FrequentTransaction] {
        &self.ledger.frequent_transactions
    }

    pub fn initial_balance(&self) -> Amount {
        self.ledger.initial_balance
    }

    pub fn theme(&self) -> Theme {
        self.ledger.theme
    }

    pub fn current_balance(&self) -> Amount {
        SummaryService::current_balance(self.ledger.initial_balance, &self.ledger.transactions)
    }

    /// Appends without validation. No dedup, no reorder.
    pub fn append(&mut self, transaction: Transaction) -> Uuid {
        let id = TransactionService::add(&mut self.ledger, transaction);
        self.persist(TRANSACTIONS_KEY);
        id
    }

    /// Validates `draft` and appends it dated by `clock`.
    pub fn submit(&mut self, draft: &TransactionDraft, clock: &dyn Clock) -> Result<Uuid, CoreError> {
        let id = TransactionService::submit(&mut self.ledger, draft, clock.now())?;
        self.persist(TRANSACTIONS_KEY);
        Ok(id)
    }

    pub fn update_transaction<F>(&mut self, id: Uuid, mutator: F) -> Result<(), CoreError>
    where
        F: FnOnce(&mut Transaction),
    {
        TransactionService::update(&mut self.ledger, id, mutator)?;
        self.persist(TRANSACTIONS_KEY);
        Ok(())
    }

    pub fn remove_transaction(&mut self, id: Uuid) -> Result<Transaction, CoreError> {
        let removed = TransactionService::remove(&mut self.ledger, id)?;
        self.persist(TRANSACTIONS_KEY);
        Ok(removed)
    }

    pub fn add_category(&mut self, category: Category) -> Result<Uuid, CoreError> {
        let id = CategoryService::add(&mut self.ledger, category)?;
        self.persist(CATEGORIES_KEY);
        Ok(id)
    }

    /// Removes a category; its transactions are kept and become orphaned.
    pub fn remove_category(&mut self, id: Uuid) -> Result<Category, CoreError> {
        let removed = CategoryService::remove(&mut self.ledger, id)?;
        self.persist(CATEGORIES_KEY);
        Ok(removed)
    }

    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        self.ledger.category_by_name(name)
    }

    pub fn categories_of(&self, kind: CategoryKind) -> Vec<&Category> {
        self.ledger.categories_of(kind).collect()
    }

    pub fn orphaned_transactions(&self) -> Vec<&Transaction> {
        self.ledger.orphaned_transactions()
    }

    pub fn add_frequent(&mut self, template: FrequentTransaction) -> Result<Uuid, CoreError> {
        let id = FrequentService::add(&mut self.ledger, template)?;
        self.persist(FREQUENT_TRANSACTIONS_KEY);
        Ok(id)
    }

    pub fn save_as_frequent(&mut self, transaction_id: Uuid, name: &str) -> Result<Uuid, CoreError> {
        let id = FrequentService::save_from_transaction(&mut self.ledger, transaction_id, name)?;
        self.persist(FREQUENT_TRANSACTIONS_KEY);
        Ok(id)
    }

    pub fn remove_frequent(&mut self, id: Uuid) -> Result<FrequentTransaction, CoreError> {
        let removed = FrequentService::remove(&mut self.ledger, id)?;
        self.persist(FREQUENT_TRANSACTIONS_KEY);
        Ok(removed)
    }

    pub fn set_frequent_total(
        &mut self,
        id: Uuid,
        new_total: Amount,
    ) -> Result<RescaleOutcome, CoreError> {
        let outcome = FrequentService::set_total(&mut self.ledger, id, new_total)?;
        self.persist(FREQUENT_TRANSACTIONS_KEY);
        Ok(outcome)
    }

    /// Appends a copy of template `id` dated now.
    pub fn instantiate_frequent(&mut self, id: Uuid, clock: &dyn Clock) -> Result<Uuid, CoreError> {
        let txn_id = FrequentService::add_instance(&mut self.ledger, id, clock.now())?;
        self.persist(TRANSACTIONS_KEY);
        Ok(txn_id)
    }

    pub fn set_initial_balance(&mut self, amount: Amount) {
        self.ledger.initial_balance = amount;
        self.persist(INITIAL_BALANCE_KEY);
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.ledger.theme = theme;
        self.persist(THEME_KEY);
    }

    /// Dangling references and unbalanced entries found in the current state.
    pub fn diagnostics(&self) -> Vec<String> {
        ledger_warnings(&self.ledger)
    }

    pub fn warnings(&self) -> &[StoreWarning] {
        &self.warnings
    }

    /// Drains queued warnings.
    pub fn take_warnings(&mut self) -> Vec<StoreWarning> {
        std::mem::take(&mut self.warnings)
    }

    fn persist(&mut self, key: &'static str) {
        let encoded = match key {
            CATEGORIES_KEY => serde_json::to_string(&self.ledger.categories),
            TRANSACTIONS_KEY => serde_json::to_string(&self.ledger.transactions),
            FREQUENT_TRANSACTIONS_KEY => serde_json::to_string(&self.ledger.frequent_transactions),
            INITIAL_BALANCE_KEY => serde_json::to_string(&self.ledger.initial_balance),
            _ => serde_json::to_string(&self.ledger.theme),
        };
        let result = encoded
            .map_err(CoreError::from)
            .and_then(|json| self.backend.write(key, &json));
        match result {
            Ok(()) => debug!(key, "persisted"),
            Err(err) => {
                warn!(key, error = %err, "failed to persist ledger key");
                self.warnings.push(StoreWarning {
                    key: key.to_string(),
                    kind: StoreWarningKind::WriteFailed,
                    message: err.to_string(),
                });
            }
        }
    }
}

fn read_key<B: KeyValueStore>(
    backend: &B,
    key: &str,
    warnings: &mut Vec<StoreWarning>,
) -> Option<String> {
    match backend.read(key) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(key, error = %err, "failed to read ledger key; using default");
            warnings.push(StoreWarning {
                key: key.to_string(),
                kind: StoreWarningKind::ReadFailed,
                message: err.to_string(),
            });
            None
        }
    }
}

fn load_key<B, T>(backend: &B, key: &str, warnings: &mut Vec<StoreWarning>) -> T
where
    B: KeyValueStore,
    T: DeserializeOwned + Default,
{
    let Some(raw) = read_key(backend, key, warnings) else {
        return T::default();
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(key, error = %err, "corrupt ledger key; using default");
            warnings.push(StoreWarning {
                key: key.to_string(),
                kind: StoreWarningKind::Corrupt,
                message: err.to_string(),
            });
            T::default()
        }
    }
}

// The theme may have been stored as a bare word rather than a JSON string.
fn load_theme<B: KeyValueStore>(backend: &B, warnings: &mut Vec<StoreWarning>) -> Theme {
    read_key(backend, THEME_KEY, warnings)
        .map(|raw| serde_json::from_str(&raw).unwrap_or_else(|_| Theme::from_str(&raw)))
        .unwrap_or_default()
}
