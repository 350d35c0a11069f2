//! Include/exclude toggles applied to the daily series.
//!
//! A transaction-level override wins over a category-level override; with
//! neither present a transaction is included.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use toman_domain::{Transaction, TransactionKey};

/// Visual state of a category checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckState {
    Checked,
    Unchecked,
    Indeterminate,
}

impl CheckState {
    pub fn is_checked(self) -> bool {
        self == CheckState::Checked
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionFilter {
    categories: HashMap<String, bool>,
    transactions: HashMap<TransactionKey, bool>,
}

impl InclusionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_included(&self, transaction: &Transaction) -> bool {
        if let Some(included) = self.transactions.get(&transaction.key()) {
            return *included;
        }
        self.categories
            .get(&transaction.category)
            .copied()
            .unwrap_or(true)
    }

    /// Toggles a category and every one of its transactions in `transactions`.
    pub fn set_category<'a, I>(&mut self, category: &str, included: bool, transactions: I)
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        self.categories.insert(category.to_string(), included);
        for txn in transactions {
            if txn.category == category {
                self.transactions.insert(txn.key(), included);
            }
        }
    }

    pub fn set_transaction(&mut self, key: TransactionKey, included: bool) {
        self.transactions.insert(key, included);
    }

    /// Checked when every transaction of the category is included, unchecked
    /// when none are, indeterminate otherwise. A category without transactions
    /// reports its own override.
    pub fn category_state<'a, I>(&self, category: &str, transactions: I) -> CheckState
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let (mut included, mut total) = (0usize, 0usize);
        for txn in transactions.into_iter().filter(|txn| txn.category == category) {
            total += 1;
            if self.is_included(txn) {
                included += 1;
            }
        }
        if total == 0 {
            return match self.categories.get(category) {
                Some(false) => CheckState::Unchecked,
                _ => CheckState::Checked,
            };
        }
        match included {
            0 => CheckState::Unchecked,
            n if n == total => CheckState::Checked,
            _ => CheckState::Indeterminate,
        }
    }

    pub fn clear(&mut self) {
        self.categories.clear();
        self.transactions.clear();
    }
}

/// Case-insensitive substring match used by the category filter search box.
pub fn category_matches_search(category: &str, term: &str) -> bool {
    category.to_lowercase().contains(&term.to_lowercase())
}

/// Matches a transaction by category name or any item name.
pub fn transaction_matches_search(transaction: &Transaction, term: &str) -> bool {
    let term = term.to_lowercase();
    transaction.category.to_lowercase().contains(&term)
        || transaction
            .items
            .iter()
            .any(|item| item.name.to_lowercase().contains(&term))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use toman_domain::{Amount, Item};

    use super::*;

    fn cost(category: &str, name: &str, day: u32) -> Transaction {
        let date = Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap();
        Transaction::new_cost(
            vec![Item::new(name, Amount::new(1_000), 1)],
            Amount::new(1_000),
            category,
            date,
        )
    }

    #[test]
    fn everything_is_included_by_default() {
        let filter = InclusionFilter::new();
        assert!(filter.is_included(&cost("Food", "Bread", 1)));
    }

    #[test]
    fn transaction_override_beats_category_override() {
        let txns = vec![cost("Food", "Bread", 1), cost("Food", "Milk", 2)];
        let mut filter = InclusionFilter::new();
        filter.set_category("Food", false, &txns);
        assert_eq!(filter.category_state("Food", &txns), CheckState::Unchecked);

        filter.set_transaction(txns[1].key(), true);
        assert!(!filter.is_included(&txns[0]));
        assert!(filter.is_included(&txns[1]));
        assert_eq!(filter.category_state("Food", &txns), CheckState::Indeterminate);

        filter.set_category("Food", true, &txns);
        assert_eq!(filter.category_state("Food", &txns), CheckState::Checked);
    }

    #[test]
    fn toggling_one_category_leaves_others_alone() {
        let txns = vec![cost("Food", "Bread", 1), cost("Transport", "Taxi", 1)];
        let mut filter = InclusionFilter::new();
        filter.set_category("Transport", false, &txns);
        assert!(filter.is_included(&txns[0]));
        assert!(!filter.is_included(&txns[1]));
    }

    #[test]
    fn empty_category_reports_its_override() {
        let none: Vec<Transaction> = Vec::new();
        let mut filter = InclusionFilter::new();
        assert_eq!(filter.category_state("Rent", &none), CheckState::Checked);
        filter.set_category("Rent", false, &none);
        assert_eq!(filter.category_state("Rent", &none), CheckState::Unchecked);
    }

    #[test]
    fn search_matches_category_or_item_names() {
        let txn = cost("Food", "Bread", 1);
        assert!(transaction_matches_search(&txn, "bre"));
        assert!(transaction_matches_search(&txn, "FOO"));
        assert!(!transaction_matches_search(&txn, "taxi"));
        assert!(category_matches_search("Transport", "port"));
    }
}
