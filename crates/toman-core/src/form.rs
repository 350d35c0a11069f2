//! In-progress transaction entry.

use toman_domain::{checked_items_total, items_total, Amount, Item, TransactionType};
use tracing::debug;
use uuid::Uuid;

use crate::{
    storage::KeyValueStore,
    store::LedgerStore,
    time::Clock,
    validator::{ItemDraft, TransactionDraft, TransactionValidator, ValidationError},
    CoreError,
};

/// Mutable form state. Rejected submissions leave it untouched; accepted ones reset it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionForm {
    pub kind: TransactionType,
    pub total_amount: Amount,
    pub category: String,
    pub income_label: String,
    items: Vec<Item>,
}

impl TransactionForm {
    pub fn new(kind: TransactionType) -> Self {
        Self {
            kind,
            total_amount: Amount::ZERO,
            category: String::new(),
            income_label: String::new(),
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Runs the item gate and appends the accepted item.
    pub fn add_item(&mut self, draft: &ItemDraft) -> Result<(), ValidationError> {
        let item = TransactionValidator::validate_item(self.kind, draft)?;
        self.items.push(item);
        Ok(())
    }

    pub fn remove_item(&mut self, index: usize) -> Option<Item> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Copies the form total into the entry row's price. Only offered while
    /// the item list is empty; returns whether the price was filled.
    pub fn fill_price_from_total(&self, draft: &mut ItemDraft) -> bool {
        if !self.items.is_empty() {
            return false;
        }
        draft.price = self.total_amount;
        true
    }

    pub fn items_total(&self) -> Amount {
        items_total(&self.items)
    }

    pub fn to_draft(&self) -> TransactionDraft {
        TransactionDraft {
            kind: self.kind,
            total_amount: self.total_amount,
            items: self.items.clone(),
            category: self.category.clone(),
            income_label: self.income_label.clone(),
        }
    }

    /// Whether the submit action should be enabled.
    pub fn is_submittable(&self) -> bool {
        if self.category.trim().is_empty() {
            return false;
        }
        match self.kind {
            TransactionType::Income => {
                !self.income_label.trim().is_empty() && self.total_amount.is_positive()
            }
            TransactionType::Cost => {
                !self.items.is_empty()
                    && checked_items_total(&self.items) == Some(self.total_amount)
                    && self.total_amount.is_within_limit()
            }
        }
    }

    /// Validates and appends to `store`, then resets the form keeping its type.
    pub fn submit<B: KeyValueStore>(
        &mut self,
        store: &mut LedgerStore<B>,
        clock: &dyn Clock,
    ) -> Result<Uuid, CoreError> {
        let id = store.submit(&self.to_draft(), clock)?;
        debug!(%id, "form submitted");
        *self = Self::new(self.kind);
        Ok(id)
    }
}

impl Default for TransactionForm {
    fn default() -> Self {
        Self::new(TransactionType::Cost)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use toman_domain::{Category, CategoryKind};

    use super::*;
    use crate::{storage::MemoryStore, time::FixedClock};

    fn store() -> LedgerStore<MemoryStore> {
        let mut store = LedgerStore::open(MemoryStore::new());
        store
            .add_category(Category::new("Food", CategoryKind::Expense))
            .unwrap();
        store
    }

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap())
    }

    #[test]
    fn rejected_submit_keeps_form_state() {
        let mut store = store();
        let mut form = TransactionForm::new(TransactionType::Cost);
        form.category = "Food".into();
        form.total_amount = Amount::new(200_000);
        form.add_item(&ItemDraft::new("Food", Amount::new(150_000), 1))
            .unwrap();
        assert!(!form.is_submittable());

        let before = form.clone();
        let err = form.submit(&mut store, &clock()).expect_err("mismatch");
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::ItemsTotalMismatch { .. })
        ));
        assert_eq!(form, before);
        assert!(store.transactions().is_empty());
    }

    #[test]
    fn accepted_submit_resets_form() {
        let mut store = store();
        let mut form = TransactionForm::new(TransactionType::Cost);
        form.category = "Food".into();
        form.total_amount = Amount::new(200_000);
        let mut entry = ItemDraft::new("Food", Amount::ZERO, 1);
        assert!(form.fill_price_from_total(&mut entry));
        form.add_item(&entry).unwrap();
        assert!(form.is_submittable());

        form.submit(&mut store, &clock()).unwrap();
        assert_eq!(form, TransactionForm::new(TransactionType::Cost));
        assert_eq!(store.transactions().len(), 1);
    }

    #[test]
    fn price_shortcut_only_before_first_item() {
        let mut form = TransactionForm::new(TransactionType::Cost);
        form.total_amount = Amount::new(10);
        form.add_item(&ItemDraft::new("Tea", Amount::new(4), 1))
            .unwrap();
        let mut entry = ItemDraft::new("Sugar", Amount::new(6), 1);
        assert!(!form.fill_price_from_total(&mut entry));
        assert_eq!(entry.price, Amount::new(6));
        assert_eq!(form.remove_item(0).map(|item| item.name), Some("Tea".to_string()));
        assert!(form.remove_item(3).is_none());
    }

    #[test]
    fn invalid_item_never_enters_the_list() {
        let mut form = TransactionForm::new(TransactionType::Cost);
        let err = form
            .add_item(&ItemDraft::new("", Amount::new(5), 1))
            .expect_err("empty name");
        assert_eq!(err, ValidationError::EmptyItemName);
        assert!(form.items().is_empty());
    }

    #[test]
    fn oversized_items_are_refused_and_totals_never_overflow() {
        let mut form = TransactionForm::new(TransactionType::Cost);
        let huge = toman_domain::parse_display_input("99999999999999999999");
        let err = form
            .add_item(&ItemDraft::new("Car", huge, 2))
            .expect_err("oversized price");
        assert_eq!(err, ValidationError::AmountTooLarge);
        assert!(form.items().is_empty());

        form.add_item(&ItemDraft::new("Car", Amount::MAX, 1)).unwrap();
        form.add_item(&ItemDraft::new("Boat", Amount::MAX, 1)).unwrap();
        form.category = "Food".into();
        form.total_amount = form.items_total();
        assert!(!form.is_submittable());
    }
}
