//! Acceptance rules for candidate transactions and their line items.

use chrono::{DateTime, Utc};
use thiserror::Error;
use toman_domain::{
    checked_items_total, Amount, Category, CategoryKind, Item, Transaction, TransactionType,
};

/// Reason a candidate item or transaction was rejected. Messages are user-facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Choose a category")]
    MissingCategory,
    #[error("Category `{0}` does not exist")]
    UnknownCategory(String),
    #[error("Category `{category}` holds {kind} entries and cannot take a {transaction} transaction")]
    CategoryTypeMismatch {
        category: String,
        kind: CategoryKind,
        transaction: TransactionType,
    },
    #[error("Income needs a label")]
    MissingIncomeLabel,
    #[error("Total must be greater than zero")]
    NonPositiveTotal,
    #[error("Add at least one item")]
    NoItems,
    #[error(
        "Items add up to {} but the total is {}",
        .items_total.to_display(),
        .total.to_display()
    )]
    ItemsTotalMismatch { items_total: Amount, total: Amount },
    #[error("Item name cannot be empty")]
    EmptyItemName,
    #[error("Item price must be greater than zero")]
    NonPositivePrice,
    #[error("Item count must be greater than zero")]
    NonPositiveCount,
    #[error("Amount is too large")]
    AmountTooLarge,
}

/// Item as typed into the entry row, before it joins the in-progress list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub price: Amount,
    pub count: u32,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>, price: Amount, count: u32) -> Self {
        Self {
            name: name.into(),
            price,
            count,
        }
    }
}

/// Candidate transaction assembled by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub kind: TransactionType,
    pub total_amount: Amount,
    pub items: Vec<Item>,
    pub category: String,
    /// Only read for income; becomes the name of the synthetic item.
    pub income_label: String,
}

impl TransactionDraft {
    pub fn income(label: impl Into<String>, total: Amount, category: impl Into<String>) -> Self {
        Self {
            kind: TransactionType::Income,
            total_amount: total,
            items: Vec::new(),
            category: category.into(),
            income_label: label.into(),
        }
    }

    pub fn cost(items: Vec<Item>, total: Amount, category: impl Into<String>) -> Self {
        Self {
            kind: TransactionType::Cost,
            total_amount: total,
            items,
            category: category.into(),
            income_label: String::new(),
        }
    }
}

pub struct TransactionValidator;

impl TransactionValidator {
    /// Gates a single item entry. Income items always carry a count of one.
    pub fn validate_item(kind: TransactionType, draft: &ItemDraft) -> Result<Item, ValidationError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyItemName);
        }
        if !draft.price.is_positive() {
            return Err(ValidationError::NonPositivePrice);
        }
        let count = match kind {
            TransactionType::Income => 1,
            TransactionType::Cost if draft.count == 0 => {
                return Err(ValidationError::NonPositiveCount)
            }
            TransactionType::Cost => draft.count,
        };
        match draft.price.checked_times(count) {
            Some(subtotal) if subtotal.is_within_limit() => {}
            _ => return Err(ValidationError::AmountTooLarge),
        }
        Ok(Item::new(name, draft.price, count))
    }

    /// Checks `draft` against the category list and builds the dated transaction.
    /// The first failing rule is reported.
    pub fn validate(
        draft: &TransactionDraft,
        categories: &[Category],
        date: DateTime<Utc>,
    ) -> Result<Transaction, ValidationError> {
        Self::check_category(draft, categories)?;

        match draft.kind {
            TransactionType::Income => {
                let label = draft.income_label.trim();
                if label.is_empty() {
                    return Err(ValidationError::MissingIncomeLabel);
                }
                if !draft.total_amount.is_positive() {
                    return Err(ValidationError::NonPositiveTotal);
                }
                if !draft.total_amount.is_within_limit() {
                    return Err(ValidationError::AmountTooLarge);
                }
                Ok(Transaction::new_income(
                    label,
                    draft.total_amount,
                    draft.category.clone(),
                    date,
                ))
            }
            TransactionType::Cost => {
                if draft.items.is_empty() {
                    return Err(ValidationError::NoItems);
                }
                for item in &draft.items {
                    Self::validate_item(
                        TransactionType::Cost,
                        &ItemDraft::new(item.name.clone(), item.price, item.count),
                    )?;
                }
                let items_total = checked_items_total(&draft.items)
                    .filter(|total| total.is_within_limit())
                    .ok_or(ValidationError::AmountTooLarge)?;
                if items_total != draft.total_amount {
                    return Err(ValidationError::ItemsTotalMismatch {
                        items_total,
                        total: draft.total_amount,
                    });
                }
                Ok(Transaction::new_cost(
                    draft.items.clone(),
                    draft.total_amount,
                    draft.category.clone(),
                    date,
                ))
            }
        }
    }

    fn check_category(
        draft: &TransactionDraft,
        categories: &[Category],
    ) -> Result<(), ValidationError> {
        if draft.category.trim().is_empty() {
            return Err(ValidationError::MissingCategory);
        }
        let category = categories
            .iter()
            .find(|category| category.name == draft.category)
            .ok_or_else(|| ValidationError::UnknownCategory(draft.category.clone()))?;
        if !draft.kind.accepts(category.kind) {
            return Err(ValidationError::CategoryTypeMismatch {
                category: category.name.clone(),
                kind: category.kind,
                transaction: draft.kind,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn categories() -> Vec<Category> {
        vec![
            Category::new("Food", CategoryKind::Expense),
            Category::new("Salary", CategoryKind::Income),
        ]
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn cost_total_must_match_items_exactly() {
        let items = vec![Item::new("Food", Amount::new(150_000), 1)];
        let draft = TransactionDraft::cost(items, Amount::new(200_000), "Food");
        let err = TransactionValidator::validate(&draft, &categories(), noon())
            .expect_err("mismatch must be rejected");
        assert_eq!(
            err,
            ValidationError::ItemsTotalMismatch {
                items_total: Amount::new(150_000),
                total: Amount::new(200_000),
            }
        );
        assert_eq!(err.to_string(), "Items add up to 150 but the total is 200");

        let off_by_one = TransactionDraft::cost(
            vec![Item::new("Food", Amount::new(200_000), 1)],
            Amount::new(200_001),
            "Food",
        );
        assert!(TransactionValidator::validate(&off_by_one, &categories(), noon()).is_err());
    }

    #[test]
    fn balanced_cost_is_accepted_with_clock_date() {
        let items = vec![
            Item::new("Bread", Amount::new(50_000), 2),
            Item::new("Milk", Amount::new(100_000), 1),
        ];
        let draft = TransactionDraft::cost(items, Amount::new(200_000), "Food");
        let txn = TransactionValidator::validate(&draft, &categories(), noon()).unwrap();
        assert_eq!(txn.date, noon());
        assert_eq!(txn.items.len(), 2);
    }

    #[test]
    fn income_synthesizes_single_item() {
        let draft = TransactionDraft::income(" March pay ", Amount::new(5_000_000), "Salary");
        let txn = TransactionValidator::validate(&draft, &categories(), noon()).unwrap();
        assert_eq!(txn.items, vec![Item::new("March pay", Amount::new(5_000_000), 1)]);
    }

    #[test]
    fn income_requires_label_and_positive_total() {
        let unlabeled = TransactionDraft::income("  ", Amount::new(10), "Salary");
        assert_eq!(
            TransactionValidator::validate(&unlabeled, &categories(), noon()),
            Err(ValidationError::MissingIncomeLabel)
        );
        let zero = TransactionDraft::income("Pay", Amount::ZERO, "Salary");
        assert_eq!(
            TransactionValidator::validate(&zero, &categories(), noon()),
            Err(ValidationError::NonPositiveTotal)
        );
    }

    #[test]
    fn category_rules_run_first() {
        let mut draft = TransactionDraft::cost(Vec::new(), Amount::ZERO, "");
        assert_eq!(
            TransactionValidator::validate(&draft, &categories(), noon()),
            Err(ValidationError::MissingCategory)
        );
        draft.category = "Rent".into();
        assert_eq!(
            TransactionValidator::validate(&draft, &categories(), noon()),
            Err(ValidationError::UnknownCategory("Rent".into()))
        );
        draft.category = "Salary".into();
        let err = TransactionValidator::validate(&draft, &categories(), noon()).unwrap_err();
        assert!(matches!(err, ValidationError::CategoryTypeMismatch { .. }));
        assert!(err.to_string().contains("Salary"));
    }

    #[test]
    fn item_gate_rejects_bad_entries() {
        let cost = TransactionType::Cost;
        assert_eq!(
            TransactionValidator::validate_item(cost, &ItemDraft::new(" ", Amount::new(1), 1)),
            Err(ValidationError::EmptyItemName)
        );
        assert_eq!(
            TransactionValidator::validate_item(cost, &ItemDraft::new("Tea", Amount::ZERO, 1)),
            Err(ValidationError::NonPositivePrice)
        );
        assert_eq!(
            TransactionValidator::validate_item(cost, &ItemDraft::new("Tea", Amount::new(5), 0)),
            Err(ValidationError::NonPositiveCount)
        );
        let income = TransactionValidator::validate_item(
            TransactionType::Income,
            &ItemDraft::new("Bonus", Amount::new(5), 4),
        )
        .unwrap();
        assert_eq!(income.count, 1);
    }

    #[test]
    fn oversized_amounts_are_rejected_without_overflow() {
        let cost = TransactionType::Cost;
        let huge = toman_domain::parse_display_input("99999999999999999999");
        assert_eq!(
            TransactionValidator::validate_item(cost, &ItemDraft::new("Car", huge, 2)),
            Err(ValidationError::AmountTooLarge)
        );
        assert_eq!(
            TransactionValidator::validate_item(cost, &ItemDraft::new("Car", Amount::MAX, 2)),
            Err(ValidationError::AmountTooLarge)
        );
        assert!(TransactionValidator::validate_item(cost, &ItemDraft::new("Car", Amount::MAX, 1)).is_ok());

        let half = Amount::new(i64::MAX / 2 + 1);
        let wrapped = TransactionDraft::cost(
            vec![Item::new("Car", half, 2)],
            Amount::new(i64::MIN),
            "Food",
        );
        assert_eq!(
            TransactionValidator::validate(&wrapped, &categories(), noon()),
            Err(ValidationError::AmountTooLarge)
        );

        let split = TransactionDraft::cost(
            vec![Item::new("Car", Amount::MAX, 1), Item::new("Boat", Amount::MAX, 1)],
            Amount::MAX + Amount::MAX,
            "Food",
        );
        assert_eq!(
            TransactionValidator::validate(&split, &categories(), noon()),
            Err(ValidationError::AmountTooLarge)
        );

        let rich = TransactionDraft::income("Lottery", huge, "Salary");
        let err = TransactionValidator::validate(&rich, &categories(), noon())
            .expect_err("oversized income must be rejected");
        assert!(matches!(err, ValidationError::AmountTooLarge));
        assert_eq!(err.to_string(), "Amount is too large");
    }
}
