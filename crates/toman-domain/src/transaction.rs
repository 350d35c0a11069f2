//! Dated ledger transactions and their line items.

use std::fmt;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    calendar::DayCalendar,
    category::CategoryKind,
    common::{Displayable, Identifiable},
    currency::Amount,
};

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Cost,
}

impl TransactionType {
    /// The category kind a transaction of this type must be filed under.
    pub fn category_kind(self) -> CategoryKind {
        match self {
            TransactionType::Income => CategoryKind::Income,
            TransactionType::Cost => CategoryKind::Expense,
        }
    }

    pub fn accepts(self, kind: CategoryKind) -> bool {
        self.category_kind() == kind
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionType::Income => "income",
            TransactionType::Cost => "cost",
        };
        f.write_str(label)
    }
}

/// A line entry; `price` is per unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub name: String,
    pub price: Amount,
    pub count: u32,
}

impl Item {
    pub fn new(name: impl Into<String>, price: Amount, count: u32) -> Self {
        Self {
            name: name.into(),
            price,
            count,
        }
    }

    pub fn subtotal(&self) -> Amount {
        self.price.times(self.count)
    }
}

/// Sum of `price * count` over the given items.
pub fn items_total(items: &[Item]) -> Amount {
    items.iter().map(Item::subtotal).sum()
}

/// Like [`items_total`], but `None` when any subtotal or the sum overflows.
pub fn checked_items_total(items: &[Item]) -> Option<Amount> {
    items.iter().try_fold(Amount::ZERO, |total, item| {
        total.checked_add(item.price.checked_times(item.count)?)
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub total_amount: Amount,
    pub items: Vec<Item>,
    pub category: String,
    pub date: DateTime<Utc>,
}

impl Transaction {
    /// Builds an income record carrying its single synthetic item.
    pub fn new_income(
        label: impl Into<String>,
        total: Amount,
        category: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: TransactionType::Income,
            total_amount: total,
            items: vec![Item::new(label, total, 1)],
            category: category.into(),
            date,
        }
    }

    pub fn new_cost(
        items: Vec<Item>,
        total: Amount,
        category: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: TransactionType::Cost,
            total_amount: total,
            items,
            category: category.into(),
            date,
        }
    }

    /// Contribution to the running balance: positive for income, negative for cost.
    pub fn signed_amount(&self) -> Amount {
        match self.kind {
            TransactionType::Income => self.total_amount,
            TransactionType::Cost => -self.total_amount,
        }
    }

    pub fn items_total(&self) -> Amount {
        items_total(&self.items)
    }

    pub fn is_balanced(&self) -> bool {
        self.items_total() == self.total_amount
    }

    pub fn key(&self) -> TransactionKey {
        TransactionKey::of(self)
    }

    /// Calendar day of the transaction under the given calendar.
    pub fn day(&self, calendar: &DayCalendar) -> NaiveDate {
        calendar.day_of(self.date)
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Transaction {
    /// `Food: Bread, Milk (cost, 2024-03-10)`
    fn display_label(&self) -> String {
        let names: Vec<&str> = self.items.iter().map(|item| item.name.as_str()).collect();
        format!(
            "{}: {} ({}, {})",
            self.category,
            names.join(", "),
            self.kind,
            self.date.date_naive()
        )
    }
}

/// Composite identity used by inclusion toggles: `{date}-{category}-{item names}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionKey(String);

impl TransactionKey {
    pub fn of(transaction: &Transaction) -> Self {
        let names = transaction
            .items
            .iter()
            .map(|item| item.name.as_str())
            .collect::<Vec<_>>()
            .join(",");
        Self(format!(
            "{}-{}-{}",
            transaction.date.to_rfc3339_opts(SecondsFormat::Millis, true),
            transaction.category,
            names
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, hour, 0, 0).unwrap()
    }

    #[test]
    fn income_carries_single_item_equal_to_total() {
        let txn = Transaction::new_income("Salary", Amount::new(5_000_000), "Salary", at(9));
        assert_eq!(txn.items.len(), 1);
        assert_eq!(txn.items[0].price, txn.total_amount);
        assert_eq!(txn.items[0].count, 1);
        assert!(txn.is_balanced());
        assert_eq!(txn.signed_amount(), Amount::new(5_000_000));
    }

    #[test]
    fn cost_is_negative_and_sums_subtotals() {
        let items = vec![
            Item::new("Bread", Amount::new(50_000), 2),
            Item::new("Milk", Amount::new(100_000), 1),
        ];
        let txn = Transaction::new_cost(items, Amount::new(200_000), "Food", at(12));
        assert_eq!(txn.items_total(), Amount::new(200_000));
        assert_eq!(txn.signed_amount(), Amount::new(-200_000));
        assert_eq!(checked_items_total(&txn.items), Some(Amount::new(200_000)));
    }

    #[test]
    fn display_label_names_category_items_and_day() {
        let items = vec![
            Item::new("Bread", Amount::new(50_000), 2),
            Item::new("Milk", Amount::new(100_000), 1),
        ];
        let txn = Transaction::new_cost(items, Amount::new(200_000), "Food", at(12));
        assert_eq!(txn.display_label(), "Food: Bread, Milk (cost, 2024-03-10)");
    }

    #[test]
    fn checked_total_reports_overflow() {
        let items = vec![Item::new("Car", Amount::new(i64::MAX / 2 + 1), 2)];
        assert_eq!(checked_items_total(&items), None);
        assert_eq!(items_total(&items), Amount::new(i64::MAX));

        let pair = vec![
            Item::new("Car", Amount::new(i64::MAX / 2 + 1), 1),
            Item::new("Boat", Amount::new(i64::MAX / 2 + 1), 1),
        ];
        assert_eq!(checked_items_total(&pair), None);
    }

    #[test]
    fn key_uses_millisecond_instant_and_item_names() {
        let items = vec![
            Item::new("Bread", Amount::new(50_000), 2),
            Item::new("Milk", Amount::new(100_000), 1),
        ];
        let txn = Transaction::new_cost(items, Amount::new(200_000), "Food", at(12));
        assert_eq!(txn.key().as_str(), "2024-03-10T12:00:00.000Z-Food-Bread,Milk");
    }

    #[test]
    fn parses_stored_json_shape() {
        let json = r#"{
            "type": "cost",
            "totalAmount": 200000,
            "items": [{"name": "Food", "price": 200000, "count": 1}],
            "category": "Food",
            "date": "2024-03-10T12:00:00.000Z"
        }"#;
        let txn: Transaction = serde_json::from_str(json).expect("parse transaction");
        assert_eq!(txn.kind, TransactionType::Cost);
        assert_eq!(txn.total_amount, Amount::new(200_000));
        assert_eq!(txn.date, at(12));
    }

    #[test]
    fn type_maps_to_category_kind() {
        assert!(TransactionType::Cost.accepts(CategoryKind::Expense));
        assert!(!TransactionType::Income.accepts(CategoryKind::Expense));
    }
}
