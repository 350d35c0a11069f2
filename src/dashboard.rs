//! One-shot composition of every dashboard view over a date range.

use chrono::NaiveDate;
use serde::Serialize;
use toman_core::{
    CategoryAggregate, DailySeries, InclusionFilter, RangeTotals, SummaryService,
};
use toman_domain::{
    format_toman, Amount, DateRange, DayCalendar, DigitStyle, Ledger, Theme, Transaction,
    TransactionType,
};

use crate::AppError;

/// Settings that shape a [`Dashboard`] without being part of the ledger.
#[derive(Debug, Clone, Copy)]
pub struct DashboardOptions<'a> {
    pub today: NaiveDate,
    pub calendar: &'a DayCalendar,
    pub filter: &'a InclusionFilter,
    pub recent_limit: usize,
    pub digits: DigitStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub range: DateRange,
    pub theme: Theme,
    pub balance: Amount,
    pub balance_label: String,
    pub totals: RangeTotals,
    pub income_categories: Vec<CategoryAggregate>,
    pub expense_categories: Vec<CategoryAggregate>,
    pub series: DailySeries,
    pub recent: Vec<Transaction>,
}

impl Dashboard {
    pub fn build(ledger: &Ledger, range: DateRange, options: DashboardOptions<'_>) -> Self {
        let transactions = &ledger.transactions;
        let calendar = options.calendar;
        let balance = SummaryService::current_balance(ledger.initial_balance, transactions);
        Self {
            range,
            theme: ledger.theme,
            balance,
            balance_label: format_toman(balance, options.digits),
            totals: SummaryService::range_totals(transactions, &range, calendar),
            income_categories: SummaryService::category_totals(
                transactions,
                TransactionType::Income,
                &range,
                calendar,
            ),
            expense_categories: SummaryService::category_totals(
                transactions,
                TransactionType::Cost,
                &range,
                calendar,
            ),
            series: DailySeries::build(
                ledger.initial_balance,
                transactions,
                &range,
                options.today,
                calendar,
                options.filter,
            ),
            recent: SummaryService::recent(transactions, &range, calendar, options.recent_limit)
                .into_iter()
                .cloned()
                .collect(),
        }
    }

    /// Pretty JSON for a view layer.
    pub fn to_json(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
