//! Transaction data aggregation for the reporting endpoints.
//!
//! Provides pure functions to group transactions by category and month, to
//! compute income/expense/savings summaries, and to compare metrics between
//! two periods. All monetary outputs are rounded to cents.

use std::collections::BTreeMap;

use serde::Serialize;
use time::Date;

use crate::transaction::{Transaction, TransactionType};

/// Round a monetary value to two decimal places.
pub(crate) fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Income, expense, and savings totals over a set of transactions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    /// The sum of income amounts.
    pub total_income: f64,
    /// The sum of expense amounts, as a non-negative value.
    pub total_expenses: f64,
    /// Income minus expenses. Negative when more was spent than earned.
    pub total_savings: f64,
    /// Savings as a percentage of income, or exactly 0 when there is no
    /// income. This avoids dividing by zero; a period with expenses but no
    /// income reports a rate of 0, not negative infinity.
    pub savings_rate: f64,
}

/// Compute summary statistics over `transactions`.
pub fn summarize(transactions: &[Transaction]) -> SummaryStats {
    let mut income = 0.0;
    let mut expenses = 0.0;

    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Income => income += transaction.amount,
            TransactionType::Expense => expenses += transaction.amount.abs(),
        }
    }

    let savings = income - expenses;

    SummaryStats {
        total_income: round_to_cents(income),
        total_expenses: round_to_cents(expenses),
        total_savings: round_to_cents(savings),
        savings_rate: round_to_cents(savings_rate(income, savings)),
    }
}

fn savings_rate(income: f64, savings: f64) -> f64 {
    if income > 0.0 {
        savings / income * 100.0
    } else {
        0.0
    }
}

/// Sum expense amounts (as absolute values) per category.
///
/// Income transactions are ignored. The map is ordered by category name so
/// the JSON output is deterministic.
pub fn category_spending(transactions: &[Transaction]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();

    for transaction in transactions {
        if transaction.transaction_type != TransactionType::Expense {
            continue;
        }

        *totals
            .entry(transaction.category.as_ref().to_owned())
            .or_insert(0.0) += transaction.amount.abs();
    }

    for total in totals.values_mut() {
        *total = round_to_cents(*total);
    }

    totals
}

/// The income, expenses, and savings of one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    /// The month, formatted as `YYYY-MM`.
    pub month: String,
    /// The sum of income amounts within the month.
    pub income: f64,
    /// The sum of expense amounts within the month, as a non-negative value.
    pub expenses: f64,
    /// Income minus expenses within the month.
    pub savings: f64,
    /// Savings as a percentage of income, 0 when the month had no income.
    pub savings_rate: f64,
}

/// Group transactions by calendar month and compute per-month summaries.
///
/// Months are returned in chronological order. Months with no transactions
/// are omitted; the output never contains synthetic zero-filled months.
pub fn monthly_breakdown(transactions: &[Transaction]) -> Vec<MonthlySummary> {
    // Keyed by the first day of the month; BTreeMap keeps months ordered.
    let mut totals: BTreeMap<Date, (f64, f64)> = BTreeMap::new();

    for transaction in transactions {
        let month = transaction.date.replace_day(1).unwrap();
        let (income, expenses) = totals.entry(month).or_insert((0.0, 0.0));

        match transaction.transaction_type {
            TransactionType::Income => *income += transaction.amount,
            TransactionType::Expense => *expenses += transaction.amount.abs(),
        }
    }

    totals
        .into_iter()
        .map(|(month, (income, expenses))| {
            let savings = income - expenses;

            MonthlySummary {
                month: format_month(month),
                income: round_to_cents(income),
                expenses: round_to_cents(expenses),
                savings: round_to_cents(savings),
                savings_rate: round_to_cents(savings_rate(income, savings)),
            }
        })
        .collect()
}

fn format_month(month: Date) -> String {
    format!("{:04}-{:02}", month.year(), u8::from(month.month()))
}

/// The absolute and relative change of one metric between two periods.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricChange {
    /// The period-2 value minus the period-1 value.
    pub change: f64,
    /// The change as a percentage of the period-1 value, or `None` when the
    /// period-1 value is 0 (a percentage change from zero is undefined, not
    /// infinite).
    pub percentage: Option<f64>,
}

/// Compute the change of a metric from `from` (period 1) to `to` (period 2).
pub fn metric_change(from: f64, to: f64) -> MetricChange {
    let percentage = if from == 0.0 {
        None
    } else {
        Some(round_to_cents((to - from) / from * 100.0))
    };

    MetricChange {
        change: round_to_cents(to - from),
        percentage,
    }
}
