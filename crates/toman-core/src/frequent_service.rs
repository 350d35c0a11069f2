//! Reusable transaction templates: instantiation and total edits.

use chrono::{DateTime, Utc};
use serde::Serialize;
use toman_domain::{Amount, FrequentTransaction, Ledger, Transaction, TransactionType};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::CoreError;

/// How item prices were brought in line with a new template total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RescaleOutcome {
    /// Every price scaled without rounding.
    Exact,
    /// Prices were rounded and still add up to the new total.
    Rounded,
    /// Rounding left a residual that was folded into the item at `index`.
    Adjusted { index: usize },
    /// Rounding left a residual no item could absorb; items differ from the total by `residual`.
    Approximate { residual: Amount },
    /// Prices were left untouched (no items, or the old items total was zero).
    Skipped,
}

pub struct FrequentService;

impl FrequentService {
    pub fn add(ledger: &mut Ledger, template: FrequentTransaction) -> Result<Uuid, CoreError> {
        if template.name.trim().is_empty() {
            return Err(CoreError::InvalidOperation(
                "Frequent transaction name cannot be empty".into(),
            ));
        }
        debug!(name = %template.name, "adding frequent transaction");
        Ok(ledger.add_frequent(template))
    }

    /// Saves an existing transaction as a named template.
    pub fn save_from_transaction(
        ledger: &mut Ledger,
        transaction_id: Uuid,
        name: &str,
    ) -> Result<Uuid, CoreError> {
        let txn = ledger
            .transaction(transaction_id)
            .ok_or(CoreError::TransactionNotFound(transaction_id))?;
        let template = FrequentTransaction::from_transaction(name.trim(), txn);
        Self::add(ledger, template)
    }

    pub fn remove(ledger: &mut Ledger, id: Uuid) -> Result<FrequentTransaction, CoreError> {
        ledger
            .remove_frequent(id)
            .ok_or(CoreError::TemplateNotFound(id))
    }

    /// Builds a dated transaction from a template. The template is copied as-is.
    pub fn instantiate(template: &FrequentTransaction, now: DateTime<Utc>) -> Transaction {
        if !template.is_balanced() {
            warn!(
                template = %template.name,
                items_total = %template.items_total(),
                total = %template.total_amount,
                "instantiating unbalanced frequent transaction"
            );
        }
        Transaction {
            id: Uuid::new_v4(),
            kind: template.kind,
            total_amount: template.total_amount,
            items: template.items.clone(),
            category: template.category.clone(),
            date: now,
        }
    }

    /// Instantiates the template `id` and appends the result to the ledger.
    pub fn add_instance(
        ledger: &mut Ledger,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Uuid, CoreError> {
        let template = ledger.frequent(id).ok_or(CoreError::TemplateNotFound(id))?;
        let transaction = Self::instantiate(template, now);
        Ok(ledger.add_transaction(transaction))
    }

    /// Changes a template's total and rescales its item prices to match.
    pub fn set_total(
        ledger: &mut Ledger,
        id: Uuid,
        new_total: Amount,
    ) -> Result<RescaleOutcome, CoreError> {
        if !new_total.is_positive() {
            return Err(CoreError::InvalidOperation(
                "Frequent transaction total must be greater than zero".into(),
            ));
        }
        let template = ledger
            .frequent_mut(id)
            .ok_or(CoreError::TemplateNotFound(id))?;
        let outcome = Self::rescale(template, new_total);
        match outcome {
            RescaleOutcome::Approximate { residual } => warn!(
                template = %template.name,
                %residual,
                "rescaled prices do not add up to the new total"
            ),
            RescaleOutcome::Skipped if template.kind == TransactionType::Cost => warn!(
                template = %template.name,
                "item prices left unchanged; template items no longer match its total"
            ),
            _ => debug!(template = %template.name, ?outcome, "rescaled frequent transaction"),
        }
        Ok(outcome)
    }

    /// Sets `total_amount` to `new_total` and adjusts item prices.
    ///
    /// Cost prices scale by `new_total / old_items_total`, rounded half away
    /// from zero in storage units. Income updates its single synthetic item.
    pub fn rescale(template: &mut FrequentTransaction, new_total: Amount) -> RescaleOutcome {
        template.total_amount = new_total;
        match template.kind {
            TransactionType::Income => match template.items.first_mut() {
                Some(item) => {
                    item.price = new_total;
                    RescaleOutcome::Exact
                }
                None => RescaleOutcome::Skipped,
            },
            TransactionType::Cost => rescale_cost(template, new_total),
        }
    }
}

fn rescale_cost(template: &mut FrequentTransaction, new_total: Amount) -> RescaleOutcome {
    let old_total = i128::from(template.items_total().units());
    if template.items.is_empty() || old_total == 0 {
        return RescaleOutcome::Skipped;
    }
    let target = i128::from(new_total.units());

    let mut exact = true;
    for item in &mut template.items {
        let numerator = i128::from(item.price.units()) * target;
        if numerator % old_total != 0 {
            exact = false;
        }
        item.price = Amount::new(clamp_units(div_round(numerator, old_total)));
    }
    if exact {
        return RescaleOutcome::Exact;
    }

    let residual = new_total.units() - template.items_total().units();
    if residual == 0 {
        return RescaleOutcome::Rounded;
    }

    let absorber = template.items.iter().rposition(|item| {
        let count = i64::from(item.count);
        count > 0 && residual % count == 0 && item.price.units() + residual / count > 0
    });
    match absorber {
        Some(index) => {
            let item = &mut template.items[index];
            item.price += Amount::new(residual / i64::from(item.count));
            RescaleOutcome::Adjusted { index }
        }
        None => RescaleOutcome::Approximate {
            residual: Amount::new(residual),
        },
    }
}

/// Integer division rounding half away from zero.
fn div_round(numerator: i128, denominator: i128) -> i128 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder.abs() * 2 >= denominator.abs() {
        if (numerator < 0) == (denominator < 0) {
            quotient + 1
        } else {
            quotient - 1
        }
    } else {
        quotient
    }
}

fn clamp_units(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}
