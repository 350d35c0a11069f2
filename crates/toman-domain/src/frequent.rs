//! Reusable transaction templates.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    common::*,
    currency::Amount,
    transaction::{items_total, Item, Transaction, TransactionType},
};

/// Undated transaction shape that can be instantiated on demand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FrequentTransaction {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub total_amount: Amount,
    pub items: Vec<Item>,
    pub category: String,
}

impl FrequentTransaction {
    pub fn new(
        name: impl Into<String>,
        kind: TransactionType,
        total_amount: Amount,
        items: Vec<Item>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            total_amount,
            items,
            category: category.into(),
        }
    }

    /// Captures an existing transaction as a template, dropping its date.
    pub fn from_transaction(name: impl Into<String>, transaction: &Transaction) -> Self {
        Self::new(
            name,
            transaction.kind,
            transaction.total_amount,
            transaction.items.clone(),
            transaction.category.clone(),
        )
    }

    pub fn items_total(&self) -> Amount {
        items_total(&self.items)
    }

    pub fn is_balanced(&self) -> bool {
        self.items_total() == self.total_amount
    }
}

impl Identifiable for FrequentTransaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for FrequentTransaction {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for FrequentTransaction {
    fn display_label(&self) -> String {
        format!("{} ({} in {})", self.name, self.kind, self.category)
    }
}
