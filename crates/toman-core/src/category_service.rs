use toman_domain::{Category, Ledger};
use tracing::debug;
use uuid::Uuid;

use crate::CoreError;

pub struct CategoryService;

impl CategoryService {
    pub fn add(ledger: &mut Ledger, mut category: Category) -> Result<Uuid, CoreError> {
        Self::validate_name(ledger, &category.name)?;
        category.name = category.name.trim().to_string();
        debug!(name = %category.name, kind = %category.kind, "adding category");
        Ok(ledger.add_category(category))
    }

    /// Deletes a category. Transactions filed under it keep their category name.
    pub fn remove(ledger: &mut Ledger, id: Uuid) -> Result<Category, CoreError> {
        let removed = ledger
            .remove_category(id)
            .ok_or_else(|| CoreError::CategoryNotFound(id.to_string()))?;
        let orphaned = ledger
            .transactions
            .iter()
            .filter(|txn| txn.category == removed.name)
            .count();
        debug!(name = %removed.name, orphaned, "removed category");
        Ok(removed)
    }

    pub fn list(ledger: &Ledger) -> Vec<&Category> {
        ledger.categories.iter().collect()
    }

    fn validate_name(ledger: &Ledger, candidate: &str) -> Result<(), CoreError> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidCategory(
                "Category name cannot be empty".into(),
            ));
        }
        let normalized = trimmed.to_lowercase();
        let duplicate = ledger
            .categories
            .iter()
            .any(|category| category.name.trim().to_lowercase() == normalized);
        if duplicate {
            Err(CoreError::InvalidCategory(format!(
                "Category `{}` already exists",
                trimmed
            )))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use toman_domain::{Amount, CategoryKind, Transaction};

    use super::*;

    #[test]
    fn rejects_blank_and_duplicate_names() {
        let mut ledger = Ledger::new();
        CategoryService::add(&mut ledger, Category::new("Food", CategoryKind::Expense)).unwrap();

        let err = CategoryService::add(&mut ledger, Category::new("   ", CategoryKind::Expense))
            .expect_err("blank name must fail");
        assert!(
            matches!(err, CoreError::InvalidCategory(ref message) if message.contains("empty")),
            "unexpected error: {err:?}"
        );

        let err = CategoryService::add(&mut ledger, Category::new(" food ", CategoryKind::Income))
            .expect_err("duplicate name must fail");
        assert!(
            matches!(err, CoreError::InvalidCategory(ref message) if message.contains("already exists")),
            "unexpected error: {err:?}"
        );
        assert_eq!(CategoryService::list(&ledger).len(), 1);
    }

    #[test]
    fn remove_does_not_cascade() {
        let mut ledger = Ledger::new();
        let id =
            CategoryService::add(&mut ledger, Category::new("Salary", CategoryKind::Income)).unwrap();
        let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        ledger.add_transaction(Transaction::new_income("Pay", Amount::new(5), "Salary", date));

        CategoryService::remove(&mut ledger, id).unwrap();
        assert_eq!(ledger.transactions.len(), 1);
        assert_eq!(ledger.orphaned_transactions().len(), 1);

        let err = CategoryService::remove(&mut ledger, id).expect_err("already removed");
        assert!(matches!(err, CoreError::CategoryNotFound(_)));
    }
}
