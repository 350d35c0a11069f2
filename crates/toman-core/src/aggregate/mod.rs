//! Pure folds over the transaction log.
//!
//! Nothing here caches; every call walks the slice it is given. Sums are
//! taken in storage units and converted to display units at the end.

mod series;

pub use series::*;

use serde::Serialize;
use toman_domain::{Amount, DateRange, DayCalendar, Transaction, TransactionType};

/// Income and expense sums over a date range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeTotals {
    pub income: Amount,
    pub expenses: Amount,
    pub net: Amount,
}

/// One slice of a per-category breakdown, in display units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAggregate {
    pub id: String,
    pub label: String,
    pub value: f64,
}

/// A transaction with its share of its category's total.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub display_amount: f64,
    pub percentage: f64,
}

pub struct SummaryService;

impl SummaryService {
    /// Initial balance plus every income minus every cost. Order does not matter.
    pub fn current_balance(initial: Amount, transactions: &[Transaction]) -> Amount {
        initial + transactions.iter().map(Transaction::signed_amount).sum::<Amount>()
    }

    pub fn in_range<'a>(
        transactions: &'a [Transaction],
        range: &'a DateRange,
        calendar: &'a DayCalendar,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        transactions
            .iter()
            .filter(move |txn| range.contains(txn.day(calendar)))
    }

    pub fn range_totals(
        transactions: &[Transaction],
        range: &DateRange,
        calendar: &DayCalendar,
    ) -> RangeTotals {
        let mut totals = RangeTotals::default();
        for txn in Self::in_range(transactions, range, calendar) {
            match txn.kind {
                TransactionType::Income => totals.income += txn.total_amount,
                TransactionType::Cost => totals.expenses += txn.total_amount,
            }
        }
        totals.net = totals.income - totals.expenses;
        totals
    }

    /// Groups in-range transactions of `kind` by category name, in order of first appearance.
    pub fn category_totals(
        transactions: &[Transaction],
        kind: TransactionType,
        range: &DateRange,
        calendar: &DayCalendar,
    ) -> Vec<CategoryAggregate> {
        let mut groups: Vec<(&str, Amount)> = Vec::new();
        for txn in Self::in_range(transactions, range, calendar).filter(|txn| txn.kind == kind) {
            match groups.iter_mut().find(|(name, _)| *name == txn.category) {
                Some((_, sum)) => *sum += txn.total_amount,
                None => groups.push((txn.category.as_str(), txn.total_amount)),
            }
        }
        groups
            .into_iter()
            .map(|(name, sum)| CategoryAggregate {
                id: name.to_string(),
                label: name.to_string(),
                value: sum.to_display(),
            })
            .collect()
    }

    /// In-range transactions of one category with their percentage of the category total.
    pub fn category_transactions(
        transactions: &[Transaction],
        category: &str,
        kind: TransactionType,
        range: &DateRange,
        calendar: &DayCalendar,
    ) -> Vec<CategoryTransaction> {
        let matching: Vec<&Transaction> = Self::in_range(transactions, range, calendar)
            .filter(|txn| txn.kind == kind && txn.category == category)
            .collect();
        let total: f64 = matching.iter().map(|txn| txn.total_amount.to_display()).sum();
        matching
            .into_iter()
            .map(|txn| {
                let display_amount = txn.total_amount.to_display();
                let percentage = if total > 0.0 {
                    display_amount / total * 100.0
                } else {
                    0.0
                };
                CategoryTransaction {
                    transaction: txn.clone(),
                    display_amount,
                    percentage,
                }
            })
            .collect()
    }

    /// Up to `limit` in-range transactions, most recent first.
    pub fn recent<'a>(
        transactions: &'a [Transaction],
        range: &DateRange,
        calendar: &DayCalendar,
        limit: usize,
    ) -> Vec<&'a Transaction> {
        let mut matching: Vec<&Transaction> = transactions
            .iter()
            .filter(|txn| range.contains(txn.day(calendar)))
            .collect();
        matching.sort_by(|a, b| b.date.cmp(&a.date));
        matching.truncate(limit);
        matching
    }
}
