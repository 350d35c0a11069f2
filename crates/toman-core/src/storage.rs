use std::{
    collections::HashMap,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use toman_domain::{Displayable, Ledger, TransactionType};

use crate::CoreError;

pub const CATEGORIES_KEY: &str = "categories";
pub const TRANSACTIONS_KEY: &str = "transactions";
pub const FREQUENT_TRANSACTIONS_KEY: &str = "frequentTransactions";
pub const INITIAL_BALANCE_KEY: &str = "initialBalance";
pub const THEME_KEY: &str = "theme";

/// Every key the ledger persists, in load order.
pub const LEDGER_KEYS: [&str; 5] = [
    CATEGORIES_KEY,
    TRANSACTIONS_KEY,
    FREQUENT_TRANSACTIONS_KEY,
    INITIAL_BALANCE_KEY,
    THEME_KEY,
];

/// Abstraction over string-valued key/value backends holding one JSON blob per key.
pub trait KeyValueStore: Send + Sync {
    /// Returns `Ok(None)` when nothing has been stored under `key`.
    fn read(&self, key: &str) -> Result<Option<String>, CoreError>;
    fn write(&self, key: &str, value: &str) -> Result<(), CoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn read(&self, key: &str) -> Result<Option<String>, CoreError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CoreError> {
        (**self).write(key, value)
    }
}

/// Replaces `path` with `data` through a synced sibling `.tmp` file and a rename.
pub fn write_atomic(path: &Path, data: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    drop(file);
    fs::rename(&tmp, path)
}

/// `theme.json` becomes `theme.json.tmp`.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|name| name.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// In-memory backend. Writes can be made to fail for exercising error paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, key: &str, value: impl Into<String>) -> Self {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.into());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, CoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::Storage(format!("write to `{key}` rejected")));
        }
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Detects dangling references and other anomalies within a ledger snapshot.
pub fn ledger_warnings(ledger: &Ledger) -> Vec<String> {
    let mut warnings = Vec::new();

    for txn in &ledger.transactions {
        if ledger.category_by_name(&txn.category).is_none() {
            warnings.push(format!(
                "transaction {} `{}` references missing category `{}`",
                txn.id,
                txn.display_label(),
                txn.category
            ));
        }
        if txn.kind == TransactionType::Cost && !txn.is_balanced() {
            warnings.push(format!(
                "transaction {} `{}` items total {} differs from total {}",
                txn.id,
                txn.display_label(),
                txn.items_total().to_display(),
                txn.total_amount.to_display()
            ));
        }
    }
    for template in &ledger.frequent_transactions {
        if ledger.category_by_name(&template.category).is_none() {
            warnings.push(format!(
                "frequent transaction `{}` references missing category `{}`",
                template.display_label(),
                template.category
            ));
        }
    }
    warnings
}
