use chrono::NaiveDate;
use serde::Serialize;
use toman_domain::{Amount, DateRange, DayCalendar, Transaction, TransactionType};

use crate::inclusion::InclusionFilter;

pub const SERIES_LABEL_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub x: String,
    /// `None` for days after today.
    pub y: Option<f64>,
}

/// Per-day expenses and end-of-day balance over an inclusive range.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailySeries {
    pub days: Vec<NaiveDate>,
    pub labels: Vec<String>,
    pub expenses: Vec<SeriesPoint>,
    pub balance: Vec<SeriesPoint>,
}

impl DailySeries {
    /// Builds the series for `range`, which needs both bounds.
    ///
    /// The balance is a running total over the entire included history seeded
    /// with `initial`, so the first day already reflects everything before it.
    pub fn build(
        initial: Amount,
        transactions: &[Transaction],
        range: &DateRange,
        today: NaiveDate,
        calendar: &DayCalendar,
        filter: &InclusionFilter,
    ) -> Self {
        let days = range.days();
        if days.is_empty() {
            return Self::default();
        }

        let mut history: Vec<(NaiveDate, &Transaction)> = transactions
            .iter()
            .filter(|txn| filter.is_included(txn))
            .map(|txn| (txn.day(calendar), txn))
            .collect();
        history.sort_by(|(_, a), (_, b)| a.date.cmp(&b.date));

        let mut pending = history.into_iter().peekable();
        let mut running = initial;
        let first = days[0];
        while let Some((_, txn)) = pending.next_if(|(day, _)| *day < first) {
            running += txn.signed_amount();
        }

        let mut series = Self {
            days: Vec::with_capacity(days.len()),
            labels: Vec::with_capacity(days.len()),
            expenses: Vec::with_capacity(days.len()),
            balance: Vec::with_capacity(days.len()),
        };
        for day in days {
            let mut spent = Amount::ZERO;
            while let Some((_, txn)) = pending.next_if(|(txn_day, _)| *txn_day == day) {
                running += txn.signed_amount();
                if txn.kind == TransactionType::Cost {
                    spent += txn.total_amount;
                }
            }

            let label = day.format(SERIES_LABEL_FORMAT).to_string();
            let future = day > today;
            series.expenses.push(SeriesPoint {
                x: label.clone(),
                y: (!future).then(|| spent.to_display()),
            });
            series.balance.push(SeriesPoint {
                x: label.clone(),
                y: (!future).then(|| running.to_display()),
            });
            series.labels.push(label);
            series.days.push(day);
        }
        series
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
