//! In-memory ledger aggregate holding every persisted collection.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    category::{Category, CategoryKind},
    common::{Identifiable, NamedEntity},
    currency::Amount,
    frequent::FrequentTransaction,
    theme::Theme,
    transaction::Transaction,
};

/// Categories, transactions (append order), templates, opening balance and theme.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub frequent_transactions: Vec<FrequentTransaction>,
    #[serde(default)]
    pub initial_balance: Amount,
    #[serde(default)]
    pub theme: Theme,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_category(&mut self, category: Category) -> Uuid {
        let id = category.id;
        self.categories.push(category);
        id
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> Uuid {
        let id = transaction.id;
        self.transactions.push(transaction);
        id
    }

    pub fn add_frequent(&mut self, template: FrequentTransaction) -> Uuid {
        let id = template.id;
        self.frequent_transactions.push(template);
        id
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn category(&self, id: Uuid) -> Option<&Category> {
        self.categories.get(position_of(&self.categories, id)?)
    }

    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        find_by_name(&self.categories, name)
    }

    pub fn categories_of(&self, kind: CategoryKind) -> impl Iterator<Item = &Category> {
        self.categories
            .iter()
            .filter(move |category| category.kind == kind)
    }

    pub fn remove_category(&mut self, id: Uuid) -> Option<Category> {
        let index = position_of(&self.categories, id)?;
        Some(self.categories.remove(index))
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.get(position_of(&self.transactions, id)?)
    }

    pub fn transaction_mut(&mut self, id: Uuid) -> Option<&mut Transaction> {
        let index = position_of(&self.transactions, id)?;
        self.transactions.get_mut(index)
    }

    pub fn remove_transaction(&mut self, id: Uuid) -> Option<Transaction> {
        let index = position_of(&self.transactions, id)?;
        Some(self.transactions.remove(index))
    }

    pub fn frequent(&self, id: Uuid) -> Option<&FrequentTransaction> {
        self.frequent_transactions
            .get(position_of(&self.frequent_transactions, id)?)
    }

    pub fn frequent_by_name(&self, name: &str) -> Option<&FrequentTransaction> {
        find_by_name(&self.frequent_transactions, name)
    }

    pub fn frequent_mut(&mut self, id: Uuid) -> Option<&mut FrequentTransaction> {
        let index = position_of(&self.frequent_transactions, id)?;
        self.frequent_transactions.get_mut(index)
    }

    pub fn remove_frequent(&mut self, id: Uuid) -> Option<FrequentTransaction> {
        let index = position_of(&self.frequent_transactions, id)?;
        Some(self.frequent_transactions.remove(index))
    }

    /// Transactions whose category name no longer resolves to a category.
    pub fn orphaned_transactions(&self) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|txn| self.category_by_name(&txn.category).is_none())
            .collect()
    }
}

fn position_of<T: Identifiable>(items: &[T], id: Uuid) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

fn find_by_name<'a, T: NamedEntity>(items: &'a [T], name: &str) -> Option<&'a T> {
    items.iter().find(|item| item.name() == name)
}
