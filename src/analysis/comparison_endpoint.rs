//! Endpoint for comparing summary statistics between two time periods.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    transaction::{TransactionFilter, get_transactions, parse_required_date},
};

use super::aggregation::{MetricChange, SummaryStats, metric_change, summarize};

/// The query parameters for a period comparison. All four are required.
#[derive(Debug, Default, Deserialize)]
pub struct ComparisonQuery {
    /// The start of the first period (`YYYY-MM-DD`).
    pub period1_start: Option<String>,
    /// The end of the first period (`YYYY-MM-DD`).
    pub period1_end: Option<String>,
    /// The start of the second period (`YYYY-MM-DD`).
    pub period2_start: Option<String>,
    /// The end of the second period (`YYYY-MM-DD`).
    pub period2_end: Option<String>,
}

#[derive(Debug, Serialize)]
struct PeriodSummary {
    start_date: Date,
    end_date: Date,
    #[serde(flatten)]
    stats: SummaryStats,
}

#[derive(Debug, Serialize)]
struct ComparisonChanges {
    income: MetricChange,
    expenses: MetricChange,
    savings: MetricChange,
}

#[derive(Debug, Serialize)]
struct ComparisonResponse {
    period1: PeriodSummary,
    period2: PeriodSummary,
    changes: ComparisonChanges,
}

fn summarize_period(
    start_date: Date,
    end_date: Date,
    connection: &Connection,
) -> Result<PeriodSummary, Error> {
    let filter = TransactionFilter::date_range(Some(start_date), Some(end_date))?;
    let transactions = get_transactions(&filter, connection)?;

    Ok(PeriodSummary {
        start_date,
        end_date,
        stats: summarize(&transactions),
    })
}

/// Handle requests for the period comparison report.
///
/// Computes summary statistics independently for both periods and the change
/// in each metric from period 1 to period 2. A percentage change is reported
/// as `null` when the period-1 value is 0.
pub async fn get_comparison_endpoint(
    State(state): State<AppState>,
    Query(params): Query<ComparisonQuery>,
) -> Result<Response, Error> {
    let period1_start = parse_required_date("period1_start", params.period1_start.as_deref())?;
    let period1_end = parse_required_date("period1_end", params.period1_end.as_deref())?;
    let period2_start = parse_required_date("period2_start", params.period2_start.as_deref())?;
    let period2_end = parse_required_date("period2_end", params.period2_end.as_deref())?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let period1 = summarize_period(period1_start, period1_end, &connection)?;
    let period2 = summarize_period(period2_start, period2_end, &connection)?;

    let changes = ComparisonChanges {
        income: metric_change(period1.stats.total_income, period2.stats.total_income),
        expenses: metric_change(period1.stats.total_expenses, period2.stats.total_expenses),
        savings: metric_change(period1.stats.total_savings, period2.stats.total_savings),
    };

    Ok(Json(ComparisonResponse {
        period1,
        period2,
        changes,
    })
    .into_response())
}
